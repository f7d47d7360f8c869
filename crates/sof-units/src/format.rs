// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — Display Formatting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Significant-figure rounding for display. Quantities themselves keep
//! full `f64` precision; only the strings produced here are rounded.

use crate::quantity::Quantity;

/// Format like C's `%.{sigfigs}g`: fixed notation for exponents in
/// `[-4, sigfigs)`, scientific otherwise, trailing zeros removed.
pub fn format_significant(value: f64, sigfigs: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let precision = sigfigs.max(1);

    // The exponent after rounding decides the notation (9.9996 → 10.00).
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exp.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `"<value> <unit>"`, or `"<value> ± <sigma> <unit>"` when sigma is known.
pub fn display_quantity(q: &Quantity, sigfigs: usize) -> String {
    match q.sigma() {
        Some(s) => format!(
            "{} ± {} {}",
            format_significant(q.value(), sigfigs),
            format_significant(s, sigfigs),
            q.unit()
        ),
        None => format!("{} {}", format_significant(q.value(), sigfigs), q.unit()),
    }
}
