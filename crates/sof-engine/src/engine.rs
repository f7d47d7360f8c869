// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Sum-of-Fractions Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parse → canonicalize → convert to limit units → combine duplicates →
//! divide by limit → accumulate.
//!
//! `compute` stops at the first row failure. `compute_collecting` records
//! row failures and reports on the rows that succeeded. A missing limit with
//! `treat_missing_as_zero = false` aborts either call.

use std::collections::HashMap;

use sof_types::config::SofOptions;
use sof_types::constants::UNSPECIFIED_RULE;
use sof_types::error::{SofError, SofResult};
use sof_types::models::{LimitRow, NuclideResult, SampleRow, SofReport, SofSummary};
use sof_units::{combine, convert_to_unit, parse_quantity, Quantity, UnitRegistry};
use tracing::{debug, info, warn};

use crate::aliases::{AliasMap, Canonical};

/// Outcome of one sample row in a collecting run. Rows are 1-based.
#[derive(Debug)]
pub struct RowOutcome {
    pub row: usize,
    pub nuclide: String,
    pub error: Option<SofError>,
}

impl RowOutcome {
    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }
}

/// Report over the accepted rows plus the fate of every row.
#[derive(Debug)]
pub struct CollectedRun {
    pub report: SofReport,
    pub outcomes: Vec<RowOutcome>,
}

impl CollectedRun {
    pub fn rejected(&self) -> impl Iterator<Item = &RowOutcome> {
        self.outcomes.iter().filter(|o| !o.is_accepted())
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(RowOutcome::is_accepted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Collecting,
}

/// A limit resolved to a quantity in the regulator's unit.
struct Limit<'l> {
    quantity: Quantity,
    row: &'l LimitRow,
}

/// One sample row, converted to its limit unit when a limit exists.
struct Contribution<'l> {
    canonical: String,
    raw: String,
    quantity: Quantity,
    limit: Option<Limit<'l>>,
}

struct Group<'l> {
    canonical: String,
    raw_names: Vec<String>,
    quantities: Vec<Quantity>,
    limit: Option<Limit<'l>>,
}

/// SOF computation over an injected unit registry and alias map.
pub struct SofEngine<'a> {
    registry: &'a UnitRegistry,
    aliases: &'a AliasMap,
}

impl<'a> SofEngine<'a> {
    pub fn new(registry: &'a UnitRegistry, aliases: &'a AliasMap) -> Self {
        SofEngine { registry, aliases }
    }

    /// Strict computation: the first failing row aborts with its row context.
    pub fn compute(
        &self,
        samples: &[SampleRow],
        limits: &[LimitRow],
        options: &SofOptions,
    ) -> SofResult<SofReport> {
        self.run(samples, limits, options, Mode::Strict)
            .map(|run| run.report)
    }

    /// Collecting computation: failing rows are recorded and skipped.
    pub fn compute_collecting(
        &self,
        samples: &[SampleRow],
        limits: &[LimitRow],
        options: &SofOptions,
    ) -> SofResult<CollectedRun> {
        self.run(samples, limits, options, Mode::Collecting)
    }

    fn run(
        &self,
        samples: &[SampleRow],
        limits: &[LimitRow],
        options: &SofOptions,
        mode: Mode,
    ) -> SofResult<CollectedRun> {
        options.validate()?;
        let table = self.limit_table(limits, options.category.as_deref())?;

        let mut unmapped: Vec<String> = Vec::new();
        let mut outcomes = Vec::with_capacity(samples.len());
        let mut contributions = Vec::with_capacity(samples.len());

        for (i, sample) in samples.iter().enumerate() {
            let row = i + 1;
            let raw = sample.nuclide.trim();
            let canonical = self.aliases.canonicalize(raw);
            if canonical.is_unmapped() && !raw.is_empty() && !unmapped.iter().any(|u| u == raw) {
                warn!(row, nuclide = raw, "nuclide not matched by alias table or pattern");
                unmapped.push(raw.to_string());
            }

            match self.contribution(sample, canonical, &table, options) {
                Ok(c) => {
                    debug!(
                        row,
                        nuclide = %c.canonical,
                        value = c.quantity.value(),
                        unit = %c.quantity.unit(),
                        has_limit = c.limit.is_some(),
                        "sample row accepted"
                    );
                    contributions.push(c);
                    outcomes.push(RowOutcome {
                        row,
                        nuclide: raw.to_string(),
                        error: None,
                    });
                }
                Err(err @ SofError::MissingLimit { .. }) => return Err(err),
                Err(err) => {
                    let err = err.at_row(row, raw);
                    if mode == Mode::Strict {
                        return Err(err);
                    }
                    warn!(error = %err, "sample row rejected");
                    outcomes.push(RowOutcome {
                        row,
                        nuclide: raw.to_string(),
                        error: Some(err),
                    });
                }
            }
        }

        let groups = group_contributions(contributions, options.combine_duplicates);
        let mut report = summarize(groups, options)?;
        unmapped.sort();
        report.unmapped_aliases = unmapped;

        for nuclide in &report.missing_limits {
            warn!(nuclide = %nuclide, "no limit for nuclide, counted as zero");
        }
        info!(
            sof_total = report.summary.sof_total,
            pass = report.summary.pass_limit,
            banner = ?report.summary.banner,
            nuclides = report.rows.len(),
            "SOF computed"
        );
        Ok(CollectedRun { report, outcomes })
    }

    /// Canonical nuclide → limit row, after the optional category filter.
    fn limit_table<'l>(
        &self,
        limits: &'l [LimitRow],
        category: Option<&str>,
    ) -> SofResult<HashMap<String, &'l LimitRow>> {
        let wanted = category.map(|c| c.trim().to_lowercase());
        let mut table: HashMap<String, &'l LimitRow> = HashMap::new();
        let mut duplicates: Vec<String> = Vec::new();

        for row in limits {
            if let Some(wanted) = &wanted {
                let row_category = row.category.as_deref().map(|c| c.trim().to_lowercase());
                if row_category.as_ref() != Some(wanted) {
                    continue;
                }
            }
            let canonical = self.aliases.canonicalize(&row.nuclide).name;
            if table.contains_key(&canonical) {
                if !duplicates.contains(&canonical) {
                    duplicates.push(canonical);
                }
                continue;
            }
            table.insert(canonical, row);
        }

        if let Some(category) = category {
            if table.is_empty() {
                return Err(SofError::CategoryNotFound {
                    category: category.to_string(),
                });
            }
        }
        if !duplicates.is_empty() {
            duplicates.sort();
            return Err(SofError::DuplicateLimit {
                nuclides: duplicates,
            });
        }
        Ok(table)
    }

    fn contribution<'l>(
        &self,
        sample: &SampleRow,
        canonical: Canonical,
        table: &HashMap<String, &'l LimitRow>,
        options: &SofOptions,
    ) -> SofResult<Contribution<'l>> {
        if canonical.name.is_empty() {
            return Err(SofError::InvalidValue {
                what: "nuclide name".to_string(),
                value: "(blank)".to_string(),
            });
        }
        let measured = parse_quantity(self.registry, sample.value, &sample.unit, sample.sigma)?;
        let raw = sample.nuclide.trim().to_string();

        let Some(limit_row) = table.get(&canonical.name).copied() else {
            if !options.treat_missing_as_zero {
                return Err(SofError::MissingLimit {
                    nuclide: canonical.name,
                });
            }
            return Ok(Contribution {
                canonical: canonical.name,
                raw,
                quantity: measured,
                limit: None,
            });
        };

        let limit = self.limit_quantity(limit_row, &canonical.name)?;
        let quantity = convert_to_unit(&measured, limit.unit())?;
        Ok(Contribution {
            canonical: canonical.name,
            raw,
            quantity,
            limit: Some(Limit {
                quantity: limit,
                row: limit_row,
            }),
        })
    }

    /// The limit in the unit the limits table states it in.
    fn limit_quantity(&self, row: &LimitRow, nuclide: &str) -> SofResult<Quantity> {
        if row.limit_value.is_nan() || row.limit_value <= 0.0 {
            return Err(SofError::NonPositiveLimit {
                nuclide: nuclide.to_string(),
                value: row.limit_value,
                unit: row.limit_unit.trim().to_string(),
            });
        }
        let unit = self.registry.resolve_str(&row.limit_unit)?;
        Quantity::new(row.limit_value, unit, None)
    }
}

/// Merge contributions of the same canonical nuclide when they share a
/// limit. Rows without a limit stay separate since their units may differ.
fn group_contributions(contributions: Vec<Contribution<'_>>, combine_duplicates: bool) -> Vec<Group<'_>> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for c in contributions {
        if combine_duplicates && c.limit.is_some() {
            if let Some(&i) = index.get(&c.canonical) {
                let group = &mut groups[i];
                if !group.raw_names.contains(&c.raw) {
                    group.raw_names.push(c.raw);
                }
                group.quantities.push(c.quantity);
                continue;
            }
            index.insert(c.canonical.clone(), groups.len());
        }
        groups.push(Group {
            canonical: c.canonical,
            raw_names: vec![c.raw],
            quantities: vec![c.quantity],
            limit: c.limit,
        });
    }
    groups
}

fn summarize(groups: Vec<Group<'_>>, options: &SofOptions) -> SofResult<SofReport> {
    let mut totals = Vec::with_capacity(groups.len());
    for group in &groups {
        let quantity = match group.quantities.as_slice() {
            [single] => single.clone(),
            many => combine(many)?,
        };
        if group.quantities.len() > 1 {
            debug!(
                nuclide = %group.canonical,
                rows = group.quantities.len(),
                combined = quantity.value(),
                "combined duplicate rows"
            );
        }
        totals.push(quantity);
    }

    let (fractions, sigmas): (Vec<f64>, Vec<Option<f64>>) = groups
        .iter()
        .zip(&totals)
        .map(|(group, q)| match &group.limit {
            Some(limit) => {
                let l = limit.quantity.value();
                (q.value() / l, q.sigma().map(|s| s / l))
            }
            None => (0.0, None),
        })
        .unzip();

    let matched = || groups.iter().filter_map(|g| g.limit.as_ref().map(|l| l.row));
    let rule_name = matched()
        .filter_map(|row| row.rule_name.as_deref().map(str::trim))
        .find(|name| !name.is_empty())
        .unwrap_or(UNSPECIFIED_RULE)
        .to_string();
    let category = options.category.clone().or_else(|| {
        matched()
            .filter_map(|row| row.category.as_deref().map(str::trim))
            .find(|c| !c.is_empty())
            .map(str::to_string)
    });

    let summary = SofSummary::from_fractions(
        &fractions,
        &sigmas,
        options.warn_threshold,
        rule_name,
        category,
    );
    let headroom = (1.0 - summary.sof_total).max(0.0);

    let mut missing_limits: Vec<String> = Vec::new();
    let rows = groups
        .into_iter()
        .zip(totals)
        .enumerate()
        .map(|(i, (group, q))| {
            let limit_value = group.limit.as_ref().map(|l| l.quantity.value());
            if limit_value.is_none() && !missing_limits.contains(&group.canonical) {
                missing_limits.push(group.canonical.clone());
            }
            NuclideResult {
                nuclide: group.canonical,
                raw_names: group.raw_names,
                concentration: q.value(),
                concentration_sigma: q.sigma(),
                unit: q.unit().symbol.clone(),
                limit_value,
                fraction: fractions[i],
                fraction_sigma: sigmas[i],
                allowed_additional: limit_value.map(|l| headroom * l),
                missing_limit: limit_value.is_none(),
            }
        })
        .collect();
    missing_limits.sort();

    Ok(SofReport {
        rows,
        summary,
        unmapped_aliases: Vec::new(),
        missing_limits,
    })
}

/// Strict computation with the standard unit registry.
pub fn compute(
    samples: &[SampleRow],
    limits: &[LimitRow],
    aliases: &AliasMap,
    options: &SofOptions,
) -> SofResult<SofReport> {
    let registry = UnitRegistry::standard();
    SofEngine::new(&registry, aliases).compute(samples, limits, options)
}
