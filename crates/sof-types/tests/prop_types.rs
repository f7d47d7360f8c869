// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Property-Based Tests (proptest) for sof-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for sof-types using proptest.
//!
//! Covers: banner classification bands, summary aggregation invariants,
//! options serialization roundtrip.

use proptest::prelude::*;
use sof_types::config::SofOptions;
use sof_types::models::{Banner, SofSummary};

// ── Banner Classification ────────────────────────────────────────────

proptest! {
    /// Anything above 1 is red regardless of threshold.
    #[test]
    fn banner_red_above_one(total in 1.000001f64..100.0, warn in 0.01f64..1.0) {
        prop_assert_eq!(Banner::classify(total, warn), Banner::Red);
    }

    /// Anything below the threshold is green.
    #[test]
    fn banner_green_below_threshold(warn in 0.01f64..1.0, frac in 0.0f64..0.999) {
        let total = warn * frac;
        prop_assert_eq!(Banner::classify(total, warn), Banner::Green);
    }

    /// The amber band is closed on both ends.
    #[test]
    fn banner_amber_band(warn in 0.01f64..1.0, t in 0.0f64..=1.0) {
        let total = (warn + (1.0 - warn) * t).min(1.0);
        prop_assert_eq!(Banner::classify(total, warn), Banner::Amber);
    }
}

// ── Summary Invariants ───────────────────────────────────────────────

proptest! {
    /// Total is the sum of fractions and margin complements it to one.
    #[test]
    fn summary_total_and_margin(fractions in prop::collection::vec(0.0f64..2.0, 0..16)) {
        let sigmas = vec![None; fractions.len()];
        let s = SofSummary::from_fractions(&fractions, &sigmas, 0.9, String::new(), None);
        let expected: f64 = fractions.iter().sum();

        prop_assert!((s.sof_total - expected).abs() < 1e-9);
        prop_assert!((s.margin_to_1 - (1.0 - expected)).abs() < 1e-9);
        prop_assert_eq!(s.pass_limit, expected <= 1.0);
        prop_assert!(s.sof_sigma.is_none());
    }

    /// Combined sigma is never smaller than the largest component.
    #[test]
    fn summary_sigma_dominates_components(sigmas in prop::collection::vec(0.0f64..5.0, 1..16)) {
        let fractions = vec![0.0; sigmas.len()];
        let wrapped: Vec<Option<f64>> = sigmas.iter().copied().map(Some).collect();
        let s = SofSummary::from_fractions(&fractions, &wrapped, 0.9, String::new(), None);
        let combined = s.sof_sigma.unwrap();
        let max = sigmas.iter().copied().fold(0.0f64, f64::max);
        let sum: f64 = sigmas.iter().sum();

        prop_assert!(combined + 1e-12 >= max);
        prop_assert!(combined <= sum + 1e-12);
    }
}

// ── Options Roundtrip ────────────────────────────────────────────────

proptest! {
    #[test]
    fn options_json_roundtrip(
        combine in any::<bool>(),
        missing_zero in any::<bool>(),
        warn in 0.01f64..=1.0,
        sigfigs in 1usize..12,
    ) {
        let opts = SofOptions {
            combine_duplicates: combine,
            treat_missing_as_zero: missing_zero,
            warn_threshold: warn,
            display_sigfigs: sigfigs,
            category: None,
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: SofOptions = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.combine_duplicates, opts.combine_duplicates);
        prop_assert_eq!(back.treat_missing_as_zero, opts.treat_missing_as_zero);
        prop_assert_eq!(back.display_sigfigs, opts.display_sigfigs);
        prop_assert!((back.warn_threshold - opts.warn_threshold).abs() <= 1e-15);
        back.validate().unwrap();
    }
}
