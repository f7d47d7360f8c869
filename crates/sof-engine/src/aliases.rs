// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Nuclide Alias Map
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Raw nuclide names → canonical identifiers.
//!
//! Lookup order: exact alias, case-insensitive alias, separator-free alias
//! key, then the `Element-Mass[m]` pattern. Anything left over is returned
//! trimmed and flagged [`MatchSource::Unmapped`].

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sof_types::config::SessionConfig;
use sof_types::constants::ALIAS_PATH_ENV;
use sof_types::error::{SofError, SofResult};
use tracing::{debug, info};

use crate::canon::canonical_pattern;

/// File names probed under the data directory during session loading.
pub const DEFAULT_ALIAS_FILES: [&str; 2] = ["nuclide_aliases.csv", "nuclide_aliases.json"];

/// Which step of the lookup produced a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Exact,
    CaseInsensitive,
    Normalized,
    Pattern,
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub name: String,
    pub source: MatchSource,
}

impl Canonical {
    pub fn is_unmapped(&self) -> bool {
        self.source == MatchSource::Unmapped
    }
}

fn alias_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Alias table. Read-only once loaded; share it by reference.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    exact: HashMap<String, String>,
    folded: HashMap<String, String>,
    keyed: HashMap<String, String>,
    /// Accepted `(alias, canonical)` pairs in load order.
    entries: Vec<(String, String)>,
    sources: Vec<PathBuf>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: AsRef<str>,
    {
        let mut map = Self::new();
        for (alias, canonical) in pairs {
            map.insert(alias.as_ref(), canonical.as_ref());
        }
        map
    }

    /// Add one alias. Later inserts of the same alias replace earlier ones.
    /// Blank aliases or canonicals are ignored.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let alias = alias.trim();
        let canonical = canonical.trim();
        if alias.is_empty() || canonical.is_empty() {
            return;
        }
        self.exact.insert(alias.to_string(), canonical.to_string());
        self.folded
            .insert(alias.to_lowercase(), canonical.to_string());
        self.keyed.insert(alias_key(alias), canonical.to_string());
        self.entries.push((alias.to_string(), canonical.to_string()));
    }

    /// True when `alias` already resolves at the exact, case-insensitive
    /// or separator-free level.
    fn defines(&self, alias: &str) -> bool {
        let alias = alias.trim();
        self.exact.contains_key(alias)
            || self.folded.contains_key(&alias.to_lowercase())
            || self.keyed.contains_key(&alias_key(alias))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    /// Files this map was loaded from, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Parse `alias,canonical` CSV. A header row is recognized when it names
    /// both columns; otherwise the first two columns are used as data.
    pub fn from_csv_reader<R: Read>(reader: R) -> SofResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut map = Self::new();
        let mut columns = (0usize, 1usize);
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            if i == 0 {
                let names: Vec<String> = record
                    .iter()
                    .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
                    .collect();
                let alias_col = names.iter().position(|h| h == "alias");
                let canon_col = names.iter().position(|h| h == "canonical");
                if let (Some(a), Some(c)) = (alias_col, canon_col) {
                    columns = (a, c);
                    continue;
                }
            }
            let (Some(alias), Some(canonical)) = (record.get(columns.0), record.get(columns.1))
            else {
                continue;
            };
            map.insert(alias.trim_start_matches('\u{feff}'), canonical);
        }
        Ok(map)
    }

    /// Parse a JSON object map or a list of `{alias, canonical}` objects.
    pub fn from_json_str(text: &str) -> SofResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let mut map = Self::new();
        match value {
            Value::Object(entries) => {
                for (alias, canonical) in &entries {
                    if let Some(canonical) = canonical.as_str() {
                        map.insert(alias, canonical);
                    }
                }
            }
            Value::Array(items) => {
                for item in &items {
                    let alias = item.get("alias").and_then(Value::as_str);
                    let canonical = item.get("canonical").and_then(Value::as_str);
                    if let (Some(alias), Some(canonical)) = (alias, canonical) {
                        map.insert(alias, canonical);
                    }
                }
            }
            other => {
                return Err(SofError::Config(format!(
                    "alias JSON must be an object or a list, got {}",
                    json_kind(&other)
                )))
            }
        }
        Ok(map)
    }

    /// Load one file, choosing the parser from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> SofResult<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let mut map = if is_json {
            Self::from_json_str(&std::fs::read_to_string(path)?)?
        } else {
            Self::from_csv_reader(std::fs::File::open(path)?)?
        };
        map.sources.push(path.to_path_buf());
        Ok(map)
    }

    /// Merge every alias file available to a session. Candidates, highest
    /// precedence first: the configured path, `SOF_ALIAS_PATH`, then
    /// [`DEFAULT_ALIAS_FILES`] under `data_dir`. Missing files are skipped;
    /// malformed ones are errors.
    pub fn load_session(config: &SessionConfig, data_dir: &Path) -> SofResult<Self> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(p) = &config.alias_path {
            candidates.push(p.clone());
        }
        if let Some(p) = std::env::var_os(ALIAS_PATH_ENV).filter(|p| !p.is_empty()) {
            candidates.push(PathBuf::from(p));
        }
        candidates.extend(DEFAULT_ALIAS_FILES.iter().map(|f| data_dir.join(f)));

        let mut merged = Self::new();
        for path in candidates {
            if merged.sources.contains(&path) {
                continue;
            }
            if !path.is_file() {
                debug!(path = %path.display(), "alias file not present, skipping");
                continue;
            }
            let loaded = Self::from_path(&path)?;
            info!(path = %path.display(), aliases = loaded.len(), "loaded alias file");
            merged.merge_missing(loaded);
        }
        Ok(merged)
    }

    /// Take aliases from `other` that this map does not resolve yet, at any
    /// lookup level. Conflicts are judged against the map as it was before
    /// the merge; accepted aliases go in in `other`'s load order.
    fn merge_missing(&mut self, other: AliasMap) {
        let accepted: Vec<(String, String)> = other
            .entries
            .into_iter()
            .filter(|(alias, _)| !self.defines(alias))
            .collect();
        for (alias, canonical) in &accepted {
            self.insert(alias, canonical);
        }
        self.sources.extend(other.sources);
    }

    pub fn canonicalize(&self, raw: &str) -> Canonical {
        let trimmed = raw.trim();
        let hit = |name: &String, source| Canonical {
            name: name.clone(),
            source,
        };

        if let Some(name) = self.exact.get(trimmed) {
            return hit(name, MatchSource::Exact);
        }
        if let Some(name) = self.folded.get(&trimmed.to_lowercase()) {
            return hit(name, MatchSource::CaseInsensitive);
        }
        if let Some(name) = self.keyed.get(&alias_key(trimmed)) {
            return hit(name, MatchSource::Normalized);
        }
        if let Some(name) = canonical_pattern(trimmed) {
            return Canonical {
                name,
                source: MatchSource::Pattern,
            };
        }
        Canonical {
            name: trimmed.to_string(),
            source: MatchSource::Unmapped,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Free-function form of [`AliasMap::canonicalize`].
pub fn canonicalize(raw: &str, aliases: &AliasMap) -> Canonical {
    aliases.canonicalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn site_aliases() -> AliasMap {
        AliasMap::from_pairs([
            ("Cesium-137", "Cs-137"),
            ("Sr90+Y90", "Sr-90"),
            ("gross beta", "Gross-Beta"),
        ])
    }

    #[test]
    fn test_lookup_order() {
        let m = site_aliases();
        let c = m.canonicalize("Cesium-137");
        assert_eq!(c.name, "Cs-137");
        assert_eq!(c.source, MatchSource::Exact);

        let c = m.canonicalize("CESIUM-137");
        assert_eq!(c.source, MatchSource::CaseInsensitive);
        assert_eq!(c.name, "Cs-137");

        let c = m.canonicalize("cesium 137");
        assert_eq!(c.source, MatchSource::Normalized);
        assert_eq!(c.name, "Cs-137");

        let c = m.canonicalize("Gross_Beta");
        assert_eq!(c.name, "Gross-Beta");
    }

    #[test]
    fn test_pattern_fallback() {
        let m = AliasMap::new();
        for (raw, want) in [
            ("137Cs", "Cs-137"),
            ("cs137", "Cs-137"),
            ("99mTc", "Tc-99m"),
            ("TC99M", "Tc-99m"),
        ] {
            let c = canonicalize(raw, &m);
            assert_eq!(c.name, want, "{raw}");
            assert_eq!(c.source, MatchSource::Pattern);
        }
    }

    #[test]
    fn test_unmapped_returns_trimmed_raw() {
        let m = site_aliases();
        let c = m.canonicalize("  mystery mix ");
        assert!(c.is_unmapped());
        assert_eq!(c.name, "mystery mix");
    }

    #[test]
    fn test_csv_with_bom_and_headers() {
        let data = "\u{feff}alias,canonical\ncs137,Cs-137\n  Co60 , Co-60 \n";
        let m = AliasMap::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.canonicalize("Co60").name, "Co-60");
        assert_eq!(m.canonicalize("cs137").source, MatchSource::Exact);
    }

    #[test]
    fn test_csv_reordered_headers() {
        let data = "canonical,alias\nAm-241,Americium\n";
        let m = AliasMap::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(m.canonicalize("americium").name, "Am-241");
    }

    #[test]
    fn test_csv_without_headers_uses_first_two_columns() {
        let data = "radium,Ra-226,site note\nthoron,Rn-220\n";
        let m = AliasMap::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.canonicalize("radium").name, "Ra-226");
    }

    #[test]
    fn test_json_object_and_list() {
        let obj = AliasMap::from_json_str(r#"{"strontium": "Sr-90"}"#).unwrap();
        assert_eq!(obj.canonicalize("Strontium").name, "Sr-90");

        let list = AliasMap::from_json_str(
            r#"[{"alias": "tritium", "canonical": "H-3"}, {"alias": "bad"}]"#,
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.canonicalize("TRITIUM").name, "H-3");

        assert!(matches!(
            AliasMap::from_json_str("42"),
            Err(SofError::Config(_))
        ));
    }

    #[test]
    fn test_session_prefers_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut default_csv = std::fs::File::create(dir.path().join("nuclide_aliases.csv")).unwrap();
        writeln!(default_csv, "alias,canonical\nradon,Rn-222\ncesium,Cs-134").unwrap();

        let explicit = dir.path().join("site.json");
        std::fs::write(&explicit, r#"{"cesium": "Cs-137"}"#).unwrap();

        let config = SessionConfig {
            alias_path: Some(explicit.clone()),
            ..SessionConfig::default()
        };
        let m = AliasMap::load_session(&config, dir.path()).unwrap();
        assert_eq!(m.canonicalize("cesium").name, "Cs-137");
        assert_eq!(m.canonicalize("radon").name, "Rn-222");
        assert_eq!(m.sources().first(), Some(&explicit));
        assert_eq!(m.sources().len(), 2);
    }

    #[test]
    fn test_session_lower_precedence_cannot_shadow_folded_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("nuclide_aliases.csv"),
            "alias,canonical\nCESIUM,Cs-134\ncesium_,Cs-134\nradon,Rn-222\n",
        )
        .unwrap();
        let explicit = dir.path().join("site.json");
        std::fs::write(&explicit, r#"{"Cesium": "Cs-137"}"#).unwrap();

        let config = SessionConfig {
            alias_path: Some(explicit),
            ..SessionConfig::default()
        };
        let m = AliasMap::load_session(&config, dir.path()).unwrap();
        for spelling in ["cesium", "CESIUM", "Cesium", "ce-sium", "cesium_"] {
            assert_eq!(m.canonicalize(spelling).name, "Cs-137", "{spelling}");
        }
        assert_eq!(m.canonicalize("radon").name, "Rn-222");
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_later_rows_of_one_file_win_deterministically() {
        let data = "alias,canonical\nCESIUM,Cs-134\nCesium,Cs-137\n";
        for _ in 0..8 {
            let m = AliasMap::from_csv_reader(data.as_bytes()).unwrap();
            assert_eq!(m.canonicalize("cesium").name, "Cs-137");
            assert_eq!(m.canonicalize("CESIUM").name, "Cs-134");
        }
    }

    #[test]
    fn test_session_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            alias_path: Some(dir.path().join("absent.csv")),
            ..SessionConfig::default()
        };
        let m = AliasMap::load_session(&config, dir.path()).unwrap();
        assert!(m.is_empty());
        assert!(m.sources().is_empty());
    }
}
