//! Statutory tax computations for the DPFO typ B declaration.

pub mod allowances;
pub mod common;
pub mod declaration;

pub use allowances::{partner_allowance, personal_allowance};
pub use declaration::{DeclarationEngine, compute_declaration};
