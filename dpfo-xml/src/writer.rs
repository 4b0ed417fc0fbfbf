//! Thin ordered-XML writing layer over quick-xml, plus the schema's fixed
//! value formats.

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Errors raised while producing the submission document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The declaration lacks a field the schema mandates.
    #[error("declaration is missing schema-mandatory field '{field}'")]
    IncompleteDeclaration { field: &'static str },

    /// Writing the byte stream failed.
    #[error("xml write failed: {0}")]
    Write(String),
}

fn write_err<E: std::fmt::Display>(e: E) -> XmlError {
    XmlError::Write(e.to_string())
}

/// Event writer that keeps element emission in document order.
///
/// The receiving portal's validator is positional, so the serializer emits
/// every element explicitly, in schema order, through this wrapper.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Starts a UTF-8 document with the XML declaration.
    pub fn new() -> Result<Self, XmlError> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_err)?;
        Ok(Self { inner })
    }

    pub fn start_element(&mut self, name: &str) -> Result<(), XmlError> {
        self.inner
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(write_err)?;
        Ok(())
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<(), XmlError> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, *value));
        }
        self.inner.write_event(Event::Start(start)).map_err(write_err)?;
        Ok(())
    }

    pub fn end_element(&mut self, name: &str) -> Result<(), XmlError> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(write_err)?;
        Ok(())
    }

    /// Emits `<name>text</name>`; an empty string yields an empty element,
    /// the schema's representation for absent values.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        self.start_element(name)?;
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_err)?;
        self.end_element(name)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// The schema's fixed decimal format: exactly two decimal places, period as
/// decimal marker, no grouping. Distinct from any on-screen formatting.
pub fn format_decimal(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// The schema's fixed calendar format, `DD.MM.YYYY`.
pub fn format_date(value: NaiveDate) -> String {
    value.format("%d.%m.%Y").to_string()
}
