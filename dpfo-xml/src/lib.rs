//! Serialization of a computed DPFO typ B declaration into the Financial
//! Administration submission XML.
//!
//! Pure structural mapping: fixed element names, fixed order, fixed decimal
//! and date formats, UTF-8. The byte output is handed to the delivery layer
//! verbatim.

mod dpfo_b;
mod writer;

pub use dpfo_b::{DPFO_B_NAMESPACE, to_xml};
pub use writer::{XmlError, XmlWriter, format_date, format_decimal};
