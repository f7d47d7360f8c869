// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Nuclide Name Pattern
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `Element-MassNumber[m]` canonical form from loose spellings such as
//! `Cs137`, `cs-137`, `137Cs`, `99mTc`, `TC99M` or `Tc-99(m)`.

use std::sync::LazyLock;

use regex::Regex;

const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

static RE_ELEMENT_FIRST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?P<elem>[A-Za-z]{1,2})-?(?P<mass>\d{1,3})(?P<meta>[mM]?)$").ok()
});

static RE_MASS_FIRST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?P<mass>\d{1,3})(?P<meta>m?)-?(?P<elem>[A-Za-z]{1,2})$").ok()
});

/// `cS` → `Cs`, validated against the periodic table.
fn element_symbol(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();
    let symbol = format!("{first}{rest}");
    ELEMENTS.contains(&symbol.as_str()).then_some(symbol)
}

/// Canonical `Element-Mass[m]` form, or `None` when `raw` is not a
/// recognizable nuclide spelling.
pub fn canonical_pattern(raw: &str) -> Option<String> {
    let mut s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    s = s.replace('_', "-").replace("(m)", "m").replace("(M)", "m");
    while s.contains("--") {
        s = s.replace("--", "-");
    }

    for re in [&RE_ELEMENT_FIRST, &RE_MASS_FIRST] {
        let Some(caps) = re.as_ref().and_then(|r| r.captures(&s)) else {
            continue;
        };
        let Some(elem) = element_symbol(&caps["elem"]) else {
            continue;
        };
        let mass = caps["mass"].trim_start_matches('0');
        if mass.is_empty() {
            continue;
        }
        let meta = if caps["meta"].is_empty() { "" } else { "m" };
        return Some(format!("{elem}-{mass}{meta}"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms() {
        assert_eq!(canonical_pattern("137Cs").as_deref(), Some("Cs-137"));
        assert_eq!(canonical_pattern("cs137").as_deref(), Some("Cs-137"));
        assert_eq!(canonical_pattern("Cs-137").as_deref(), Some("Cs-137"));
        assert_eq!(canonical_pattern("cs-137").as_deref(), Some("Cs-137"));
        assert_eq!(canonical_pattern("Cs_137").as_deref(), Some("Cs-137"));
        assert_eq!(canonical_pattern(" Cs 137 ").as_deref(), Some("Cs-137"));
        assert_eq!(canonical_pattern("99mTc").as_deref(), Some("Tc-99m"));
        assert_eq!(canonical_pattern("TC99M").as_deref(), Some("Tc-99m"));
        assert_eq!(canonical_pattern("Tc-99(m)").as_deref(), Some("Tc-99m"));
        assert_eq!(canonical_pattern("H-3").as_deref(), Some("H-3"));
        assert_eq!(canonical_pattern("U238").as_deref(), Some("U-238"));
        assert_eq!(canonical_pattern("Am--241").as_deref(), Some("Am-241"));
    }

    #[test]
    fn test_metal_symbols_not_mistaken_for_metastable() {
        assert_eq!(canonical_pattern("Mn54").as_deref(), Some("Mn-54"));
        assert_eq!(canonical_pattern("99Mo").as_deref(), Some("Mo-99"));
        assert_eq!(canonical_pattern("MO-99").as_deref(), Some("Mo-99"));
    }

    #[test]
    fn test_rejects_non_nuclides() {
        assert_eq!(canonical_pattern("Xx-12"), None);
        assert_eq!(canonical_pattern("gross alpha"), None);
        assert_eq!(canonical_pattern("Cs-000"), None);
        assert_eq!(canonical_pattern(""), None);
        assert_eq!(canonical_pattern("Pu-239/240"), None);
    }
}
