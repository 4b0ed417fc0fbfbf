//! Mapping of a computed [`Declaration`] onto the DPFO typ B submission
//! schema.
//!
//! The mapping is purely structural: a whitelist of declaration fields is
//! emitted in fixed schema order, every schema element is present even when
//! its value is absent (empty element), amounts use the fixed two-decimal
//! period format and dates the `DD.MM.YYYY` form. No business logic happens
//! here; the only failure mode is a declaration missing a schema-mandatory
//! field.

use dpfo_core::Declaration;
use rust_decimal::Decimal;
use tracing::debug;

use crate::writer::{XmlError, XmlWriter, format_date, format_decimal};

/// Namespace of the DPFO typ B document type.
pub const DPFO_B_NAMESPACE: &str = "http://www.drsr.sk/xml/DPFOBv20";

/// Serializes a declaration into the submission document bytes.
///
/// # Errors
///
/// [`XmlError::IncompleteDeclaration`] when a schema-mandatory identity field
/// (tax ID, first name, last name, municipality) is missing, and write errors
/// from the underlying stream.
pub fn to_xml(declaration: &Declaration) -> Result<Vec<u8>, XmlError> {
    let tax_id = mandatory(declaration.tax_id.as_deref(), "tax_id")?;
    let first_name = mandatory(declaration.first_name.as_deref(), "first_name")?;
    let last_name = mandatory(declaration.last_name.as_deref(), "last_name")?;
    let municipality = mandatory(declaration.municipality.as_deref(), "municipality")?;

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs("dokument", &[("xmlns", DPFO_B_NAMESPACE)])?;

    w.start_element("hlavicka")?;
    w.text_element("dic", tax_id)?;
    w.text_element("typDP", "B")?;
    w.text_element("rok", &declaration.tax_year.to_string())?;
    w.start_element("danovnik")?;
    w.text_element("priezvisko", last_name)?;
    w.text_element("meno", first_name)?;
    w.text_element("titul", text_or_empty(declaration.title.as_deref()))?;
    w.end_element("danovnik")?;
    w.start_element("adresaTrvPobytu")?;
    w.text_element("ulica", text_or_empty(declaration.street.as_deref()))?;
    w.text_element(
        "supisneCislo",
        text_or_empty(declaration.house_number.as_deref()),
    )?;
    w.text_element("psc", text_or_empty(declaration.postal_code.as_deref()))?;
    w.text_element("obec", municipality)?;
    w.text_element("stat", text_or_empty(declaration.country.as_deref()))?;
    w.end_element("adresaTrvPobytu")?;
    w.text_element("skNace", text_or_empty(declaration.nace_code.as_deref()))?;
    w.text_element(
        "datumPodania",
        &declaration
            .filing_date
            .map(format_date)
            .unwrap_or_default(),
    )?;
    w.end_element("hlavicka")?;

    w.start_element("telo")?;

    // VI. oddiel: self-employment income and insurance.
    w.text_element("t1r10_prijmy", &format_decimal(declaration.se_income))?;
    w.text_element(
        "priloha3_r11_socialne",
        &format_decimal(declaration.se_social_insurance),
    )?;
    w.text_element(
        "priloha3_r13_zdravotne",
        &format_decimal(declaration.se_health_insurance),
    )?;

    // V. oddiel: employment.
    w.text_element(
        "r38_uhrnPrijmovZamestnanie",
        &format_decimal(declaration.employment_income),
    )?;
    w.text_element(
        "r39_uhrnPoistneho",
        &format_decimal(declaration.employment_contributions),
    )?;

    // III. oddiel: partner.
    let partner = declaration.partner.as_ref();
    w.start_element("r31_partner")?;
    w.text_element(
        "priezviskoMeno",
        text_or_empty(partner.map(|p| p.full_name.as_str())),
    )?;
    w.text_element(
        "rodneCislo",
        text_or_empty(partner.map(|p| p.national_id.as_str())),
    )?;
    w.text_element(
        "vlastnePrijmy",
        &amount_or_empty(partner.map(|p| p.own_income)),
    )?;
    w.text_element(
        "pocetMesiacov",
        &partner.map(|p| p.months.to_string()).unwrap_or_default(),
    )?;
    w.end_element("r31_partner")?;

    // IV. oddiel: dependent children.
    w.start_element("r33_deti")?;
    for child in &declaration.children {
        w.start_element("dieta")?;
        w.text_element("priezviskoMeno", &child.full_name)?;
        w.text_element("rodneCislo", &child.national_id)?;
        w.text_element("mesiacOd", &child.month_from.to_string())?;
        w.text_element("mesiacDo", &child.month_to.to_string())?;
        w.end_element("dieta")?;
    }
    w.end_element("r33_deti")?;

    // Income base and allowances.
    w.text_element("r43_zakladDane", &format_decimal(declaration.income_base))?;
    w.text_element(
        "r73_nezdanitelnaCastDanovnik",
        &format_decimal(declaration.personal_allowance),
    )?;
    w.text_element(
        "r74_nezdanitelnaCastPartner",
        &format_decimal(declaration.partner_allowance),
    )?;
    w.text_element(
        "r75_prispevkyNaDochodok",
        &format_decimal(declaration.pension_deduction),
    )?;
    w.start_element("r76_kupele")?;
    w.text_element(
        "danovnik",
        &format_decimal(declaration.spa_deduction_taxpayer),
    )?;
    w.text_element(
        "partner",
        &format_decimal(declaration.spa_deduction_partner),
    )?;
    w.text_element("deti", &format_decimal(declaration.spa_deduction_children))?;
    w.end_element("r76_kupele")?;
    w.start_element("r77_hypoteka")?;
    w.text_element(
        "zaplateneUroky",
        &format_decimal(declaration.mortgage_interest_deduction),
    )?;
    w.text_element("pocetMesiacov", &declaration.mortgage_months.to_string())?;
    w.end_element("r77_hypoteka")?;

    // Tax, bonus and settlement.
    w.text_element(
        "r80_zakladDaneZnizeny",
        &format_decimal(declaration.taxable_base),
    )?;
    w.text_element("r81_dan", &format_decimal(declaration.tax))?;
    w.text_element(
        "r95_danovyBonus",
        &format_decimal(declaration.child_bonus_total),
    )?;
    w.text_element(
        "r108_danovyBonusZamestnavatel",
        &format_decimal(declaration.partner_bonus_from_employer),
    )?;
    w.text_element(
        "r120_preddavkyZamestnanie",
        &format_decimal(declaration.employment_advance_tax),
    )?;
    w.text_element(
        "r122_zaplatenePreddavky",
        &format_decimal(declaration.tax_prepayments),
    )?;
    w.text_element(
        "r125_danNaUhradu",
        &format_decimal(declaration.settlement.amount_due()),
    )?;
    w.text_element(
        "r126_danovyPreplatok",
        &format_decimal(declaration.settlement.refund()),
    )?;

    // Payout request.
    w.start_element("ziadostVyplatenie")?;
    w.text_element(
        "ziada",
        if declaration.refund_iban.is_some() {
            "1"
        } else {
            "0"
        },
    )?;
    w.text_element("iban", text_or_empty(declaration.refund_iban.as_deref()))?;
    w.end_element("ziadostVyplatenie")?;

    w.end_element("telo")?;
    w.end_element("dokument")?;

    let bytes = w.into_bytes();
    debug!(len = bytes.len(), "serialized declaration document");
    Ok(bytes)
}

fn mandatory<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, XmlError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(XmlError::IncompleteDeclaration { field })
}

fn text_or_empty(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn amount_or_empty(value: Option<Decimal>) -> String {
    value.map(format_decimal).unwrap_or_default()
}
