use crate::CardError;
use chrono::{Datelike, NaiveDate};
use std::fmt;

// GB 11643 mod-11-2 check scheme for the 18-character citizen ID number
const WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];
const CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

/// The holder's sex, read from the parity of the 17th digit of the number
/// (even is female, odd is male)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// The label printed on the card face
    pub fn description(self) -> &'static str {
        match self {
            Sex::Female => "女",
            Sex::Male => "男",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A validated 18-character citizen ID number. Construction goes through
/// [IdNumber::parse] or [IdNumber::from_parts], so holding one implies the
/// structure, the embedded birth date, and the checksum have all been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdNumber {
    digits: String,
}

impl IdNumber {
    /// Parse and validate a raw ID number string. Lowercase `x` check
    /// characters and surrounding whitespace are accepted
    pub fn parse(raw: &str) -> Result<IdNumber, CardError> {
        let digits = raw.trim().to_ascii_uppercase();

        if digits.chars().count() != 18 {
            return Err(CardError::InvalidIdNumber(format!(
                "expected 18 characters, got {}",
                digits.chars().count()
            )));
        }
        if !digits.chars().take(17).all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidIdNumber(
                "the first 17 characters must be digits".into(),
            ));
        }
        let check = digits.chars().nth(17).expect("length was checked above");
        if !check.is_ascii_digit() && check != 'X' {
            return Err(CardError::InvalidIdNumber(
                "the check character must be a digit or X".into(),
            ));
        }

        let id = IdNumber { digits };

        if id.birth_date_opt().is_none() {
            return Err(CardError::InvalidIdNumber(
                "the embedded birth date is not a real date".into(),
            ));
        }
        let expected = check_char(&id.digits[..17]);
        if check != expected {
            return Err(CardError::InvalidIdNumber(format!(
                "checksum mismatch, expected {expected}"
            )));
        }

        Ok(id)
    }

    /// Assemble a valid number from its parts, computing the check character.
    /// The region code is taken modulo one million and the sequence modulo one
    /// thousand, so any inputs produce a well-formed number
    pub fn from_parts(region: u32, birth: NaiveDate, sequence: u16) -> IdNumber {
        let mut digits = format!(
            "{:06}{:04}{:02}{:02}{:03}",
            region % 1_000_000,
            birth.year().clamp(1000, 9999),
            birth.month(),
            birth.day(),
            sequence % 1000
        );
        digits.push(check_char(&digits));
        IdNumber { digits }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// The six-digit administrative-division code the number was issued under
    pub fn region_code(&self) -> u32 {
        self.digits[..6].parse().unwrap_or(0)
    }

    fn birth_date_opt(&self) -> Option<NaiveDate> {
        let year = self.digits[6..10].parse().ok()?;
        let month = self.digits[10..12].parse().ok()?;
        let day = self.digits[12..14].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// The holder's birth date, embedded at positions 6 through 13
    pub fn birth_date(&self) -> NaiveDate {
        // validated at construction
        self.birth_date_opt().expect("birth date was validated")
    }

    pub fn sex(&self) -> Sex {
        let digit = self.digits[16..17].parse::<u32>().unwrap_or(0);
        if digit % 2 == 0 {
            Sex::Female
        } else {
            Sex::Male
        }
    }

    /// The holder's age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let birth = self.birth_date();
        let mut age = date.year() - birth.year();
        if (date.month(), date.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        age
    }
}

impl fmt::Display for IdNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// The check character for the first 17 digits
fn check_char(first_17: &str) -> char {
    let sum: u32 = first_17
        .chars()
        .zip(WEIGHTS)
        .map(|(c, w)| c.to_digit(10).unwrap_or(0) * w)
        .sum();
    CHECK_CHARS[(sum % 11) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_known_valid_number() {
        let id = IdNumber::parse("11010519491231002X").unwrap();
        assert_eq!(id.as_str(), "11010519491231002X");
        assert_eq!(id.region_code(), 110105);
        assert_eq!(id.birth_date(), NaiveDate::from_ymd_opt(1949, 12, 31).unwrap());
        assert_eq!(id.sex(), Sex::Female);
    }

    #[test]
    fn accepts_lowercase_check_character() {
        assert!(IdNumber::parse("11010519491231002x").is_ok());
    }

    #[test]
    fn rejects_a_tampered_checksum() {
        assert!(matches!(
            IdNumber::parse("110105194912310021"),
            Err(CardError::InvalidIdNumber(_))
        ));
    }

    #[test]
    fn rejects_wrong_length_and_bad_characters() {
        assert!(IdNumber::parse("1101051949123100").is_err());
        assert!(IdNumber::parse("1101051949123100XX").is_err());
        assert!(IdNumber::parse("").is_err());
    }

    #[test]
    fn rejects_an_impossible_birth_date() {
        // the 13th month does not exist; checksum is irrelevant by then
        assert!(matches!(
            IdNumber::parse("11010519491331002X"),
            Err(CardError::InvalidIdNumber(_))
        ));
    }

    #[test]
    fn assembled_numbers_validate() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let id = IdNumber::from_parts(310115, birth, 123);
        assert_eq!(id.as_str().len(), 18);
        assert!(IdNumber::parse(id.as_str()).is_ok());
        assert_eq!(id.birth_date(), birth);
        assert_eq!(id.sex(), Sex::Male);
    }

    #[test]
    fn sex_follows_the_parity_of_the_seventeenth_digit() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        assert_eq!(IdNumber::from_parts(310115, birth, 124).sex(), Sex::Female);
        assert_eq!(IdNumber::from_parts(310115, birth, 125).sex(), Sex::Male);
    }

    #[test]
    fn age_counts_whole_years_only() {
        let id = IdNumber::parse("11010519491231002X").unwrap();
        let before_birthday = NaiveDate::from_ymd_opt(2000, 12, 30).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2000, 12, 31).unwrap();
        assert_eq!(id.age_on(before_birthday), 50);
        assert_eq!(id.age_on(on_birthday), 51);
    }
}
