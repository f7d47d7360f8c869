// ─────────────────────────────────────────────────────────────────────
// SCPN SOF Core — SOF Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nuclide canonicalization, the sum-of-fractions computation, and the
//! table loaders and exporters around it.

pub mod aliases;
pub mod audit;
pub mod canon;
pub mod engine;
pub mod export;
pub mod io;

pub use aliases::{canonicalize, AliasMap, Canonical, MatchSource};
pub use audit::{AuditInputs, AuditRecord, InputFile};
pub use engine::{compute, CollectedRun, RowOutcome, SofEngine};
pub use export::write_results_csv;
pub use io::{load_limits, load_samples};
