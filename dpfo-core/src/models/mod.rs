mod declaration;
mod form_input;
mod tax_year_config;

pub use declaration::{ChildLine, Declaration, PartnerLine, Settlement};
pub use form_input::{ChildInput, TaxFormInput};
pub use tax_year_config::{TaxYearConfig, TaxYearConfigError};
