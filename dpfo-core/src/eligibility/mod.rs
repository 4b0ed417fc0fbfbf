//! Resolution of the conditional declaration sections.
//!
//! Each optional section (employment, partner allowance, per-child bonus,
//! mortgage interest, pension contributions, spa expenses) resolves exactly
//! once into a tagged [`SectionStatus`] plus validated amounts. Downstream
//! code never re-checks the raw flags.

mod facts;
mod resolve;

pub use facts::{
    ChildFacts, EligibilityFacts, EmploymentFacts, MortgageFacts, PartnerFacts, SectionStatus,
    SpaFacts,
};
pub use resolve::resolve_facts;
