//! Computation core for the Slovak personal income tax declaration
//! (daňové priznanie k dani z príjmov fyzickej osoby, typ B).
//!
//! A pure, synchronous pipeline: the raw wizard record is validated
//! ([`validators`]), resolved into per-section eligibility facts
//! ([`eligibility`]), and combined into the full declaration
//! ([`calculations`]). Statutory constants travel in [`TaxYearConfig`], so
//! the engine is reusable across tax years without code change. Serializing
//! the resulting [`Declaration`] into the submission XML lives in the
//! `dpfo-xml` crate.

pub mod calculations;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod validators;

pub use calculations::{DeclarationEngine, compute_declaration};
pub use eligibility::{EligibilityFacts, SectionStatus, resolve_facts};
pub use error::TaxFormError;
pub use models::*;
