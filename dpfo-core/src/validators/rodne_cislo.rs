use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offset added to the birth month for women.
const FEMALE_MONTH_OFFSET: u32 = 50;

/// Nine-digit numbers were issued only to people born before 1954.
const LEGACY_LAST_TWO_DIGIT_YEAR: u32 = 54;

/// Errors raised when a rodné číslo (national ID number) fails validation.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum RodneCisloError {
    /// Wrong number of digits (9 and 10 are the only valid lengths).
    #[error("expected 9 or 10 digits, got {0}")]
    BadLength(usize),

    /// Characters other than digits and one optional `/` separator.
    #[error("may contain only digits and an optional '/' separator")]
    BadCharacter,

    /// The embedded month (after removing the female offset) is not 1-12.
    #[error("embedded month {0} is not a calendar month")]
    BadMonth(u32),

    /// The embedded day does not exist in the embedded month and year.
    #[error("day {day} does not exist in {year}-{month:02}")]
    BadDay { year: i32, month: u32, day: u32 },

    /// A nine-digit number encodes a birth year of 1954 or later.
    #[error("nine-digit numbers were only issued for births before 1954")]
    LegacyYearOutOfRange,

    /// The ten-digit form failed the modulus-11 check.
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Sex encoded in the national ID's month field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

/// A validated rodné číslo with its decoded birth date and sex.
///
/// The raw form is `YYMMDD/SSSC` (the separator is optional on input): two
/// digit year, month with +50 added for women, day, serial, and for the
/// ten-digit form a check digit making the whole number divisible by 11. The
/// historical exception where the first nine digits leave remainder 10 and
/// the check digit is 0 is accepted as well. Nine-digit numbers predate the
/// checksum and are validated on the date pattern alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RodneCislo {
    digits: String,
    birth_date: NaiveDate,
    sex: Sex,
}

impl RodneCislo {
    /// Parses and validates a national ID string.
    ///
    /// # Errors
    ///
    /// Returns [`RodneCisloError`] describing the first check that failed:
    /// charset, length, month, day-in-month, legacy year range, or checksum.
    pub fn parse(s: &str) -> Result<Self, RodneCisloError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.replacen('/', "", 1);
        if compact.chars().any(|c| !c.is_ascii_digit()) {
            return Err(RodneCisloError::BadCharacter);
        }
        if compact.len() != 9 && compact.len() != 10 {
            return Err(RodneCisloError::BadLength(compact.len()));
        }

        let digit = |i: usize| -> u32 { compact.as_bytes()[i] as u32 - '0' as u32 };
        let yy = digit(0) * 10 + digit(1);
        let raw_month = digit(2) * 10 + digit(3);
        let day = digit(4) * 10 + digit(5);

        let (month, sex) = if raw_month > FEMALE_MONTH_OFFSET {
            (raw_month - FEMALE_MONTH_OFFSET, Sex::Female)
        } else {
            (raw_month, Sex::Male)
        };
        if !(1..=12).contains(&month) {
            return Err(RodneCisloError::BadMonth(raw_month));
        }

        let year = match compact.len() {
            9 => {
                if yy >= LEGACY_LAST_TWO_DIGIT_YEAR {
                    return Err(RodneCisloError::LegacyYearOutOfRange);
                }
                1900 + yy as i32
            }
            _ => {
                if yy >= LEGACY_LAST_TWO_DIGIT_YEAR {
                    1900 + yy as i32
                } else {
                    2000 + yy as i32
                }
            }
        };

        let birth_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(RodneCisloError::BadDay { year, month, day })?;

        if compact.len() == 10 && !checksum_holds(&compact) {
            return Err(RodneCisloError::ChecksumMismatch);
        }

        Ok(Self {
            digits: compact,
            birth_date,
            sex,
        })
    }

    /// The normalized digit string, without separator.
    pub fn as_digits(&self) -> &str {
        &self.digits
    }

    /// Decoded birth date.
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Sex decoded from the month offset.
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Display form with the conventional separator, `YYMMDD/SSSC`.
    pub fn formatted(&self) -> String {
        format!("{}/{}", &self.digits[..6], &self.digits[6..])
    }
}

/// Modulus-11 check over the full ten-digit number, with the historical
/// remainder-10 exception.
fn checksum_holds(digits: &str) -> bool {
    // Ten digits always fit in u64.
    let value: u64 = digits.parse().unwrap_or(0);
    if value % 11 == 0 {
        return true;
    }
    let first_nine: u64 = digits[..9].parse().unwrap_or(0);
    first_nine % 11 == 10 && digits.ends_with('0')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accepts_valid_ten_digit_numbers() {
        let rc = RodneCislo::parse("9609226286").unwrap();

        assert_eq!(rc.birth_date(), NaiveDate::from_ymd_opt(1996, 9, 22).unwrap());
        assert_eq!(rc.sex(), Sex::Male);
        assert_eq!(rc.formatted(), "960922/6286");
    }

    #[test]
    fn decodes_female_month_offset() {
        let rc = RodneCislo::parse("1057201167").unwrap();

        assert_eq!(rc.birth_date(), NaiveDate::from_ymd_opt(2010, 7, 20).unwrap());
        assert_eq!(rc.sex(), Sex::Female);
    }

    #[test]
    fn accepts_separator_form() {
        let rc = RodneCislo::parse("160720/1167").unwrap();

        assert_eq!(rc.as_digits(), "1607201167");
        assert_eq!(rc.sex(), Sex::Male);
    }

    #[test]
    fn rejects_checksum_mismatch() {
        // Valid number with the last digit changed.
        assert_eq!(
            RodneCislo::parse("9609226287"),
            Err(RodneCisloError::ChecksumMismatch)
        );
    }

    #[test]
    fn single_digit_mutations_rarely_keep_the_checksum() {
        // Changing any one digit must flip acceptance for at least 9 of the
        // 10 possible replacements.
        let valid = "9609226286";
        for position in 0..valid.len() {
            let mut accepted = 0;
            for replacement in b'0'..=b'9' {
                let mut candidate = valid.as_bytes().to_vec();
                candidate[position] = replacement;
                let candidate = String::from_utf8(candidate).unwrap();
                if RodneCislo::parse(&candidate).is_ok() {
                    accepted += 1;
                }
            }
            assert!(accepted <= 1, "position {position}: {accepted} accepted");
        }
    }

    #[test]
    fn rejects_bad_month() {
        assert_eq!(
            RodneCislo::parse("9613226286"),
            Err(RodneCisloError::BadMonth(13))
        );
        // Female offset applies before the range check: month 63 decodes to 13.
        assert_eq!(
            RodneCislo::parse("9663226286"),
            Err(RodneCisloError::BadMonth(63))
        );
    }

    #[test]
    fn rejects_day_not_in_month() {
        assert_eq!(
            RodneCislo::parse("9602306286"),
            Err(RodneCisloError::BadDay {
                year: 1996,
                month: 2,
                day: 30
            })
        );
    }

    #[test]
    fn nine_digit_legacy_form_skips_checksum() {
        // Pre-1954 birth, any serial: only the date pattern is checked.
        let rc = RodneCislo::parse("530101123").unwrap();

        assert_eq!(rc.birth_date(), NaiveDate::from_ymd_opt(1953, 1, 1).unwrap());
    }

    #[test]
    fn nine_digit_form_rejects_post_1953_years() {
        assert_eq!(
            RodneCislo::parse("540101123"),
            Err(RodneCisloError::LegacyYearOutOfRange)
        );
    }

    #[test]
    fn rejects_wrong_length_and_charset() {
        assert_eq!(RodneCislo::parse("12345678"), Err(RodneCisloError::BadLength(8)));
        assert_eq!(RodneCislo::parse("96O9226286"), Err(RodneCisloError::BadCharacter));
    }
}
