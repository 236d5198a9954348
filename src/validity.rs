use crate::idno::IdNumber;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// When a card stops being valid: on a date, or never (printed as 长期)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Expiry {
    On(NaiveDate),
    LongTerm,
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiry::On(date) => f.write_str(&format_card_date(*date)),
            Expiry::LongTerm => f.write_str("长期"),
        }
    }
}

/// The validity window printed on the emblem face
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValidityPeriod {
    pub start: NaiveDate,
    pub expiry: Expiry,
}

impl ValidityPeriod {
    /// Derive the validity window, filling unspecified ends from the holder's
    /// particulars:
    ///
    /// - the start date falls on the birth anniversary five years before
    ///   `today`, clamped forward to the birth date itself for holders
    ///   younger than five;
    /// - the expiry extends the start by the elapsed years, held between 20
    ///   and 30; windows that would span more than 30 years are long-term;
    /// - holders older than 46 always carry a long-term card, even when an
    ///   explicit expiry was given.
    pub fn derive(
        start: Option<NaiveDate>,
        expiry: Option<NaiveDate>,
        id: Option<&IdNumber>,
        today: NaiveDate,
    ) -> ValidityPeriod {
        let start = start.unwrap_or_else(|| default_start(id, today));

        let expiry = match expiry {
            Some(date) => Expiry::On(date),
            None => {
                let elapsed = today.year() - start.year();
                if elapsed > 30 {
                    Expiry::LongTerm
                } else {
                    let year = start.year() + elapsed.clamp(20, 30);
                    Expiry::On(anniversary(year, start.month(), start.day()))
                }
            }
        };

        let expiry = match id {
            Some(id) if id.age_on(today) > 46 => Expiry::LongTerm,
            _ => expiry,
        };

        ValidityPeriod { start, expiry }
    }
}

fn default_start(id: Option<&IdNumber>, today: NaiveDate) -> NaiveDate {
    let mut year = today.year() - 5;
    let (month, day) = match id {
        Some(id) => {
            let birth = id.birth_date();
            if birth.year() > year {
                year = birth.year();
            }
            (birth.month(), birth.day())
        }
        None => (1, 1),
    };
    anniversary(year, month, day)
}

/// The anniversary of a month and day in the given year. A February 29th that
/// does not exist rolls over to March 1st
fn anniversary(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .expect("month and day come from a real date")
}

/// The date format used on the card face, `yyyy.MM.dd`
pub fn format_card_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn id_born(y: i32, m: u32, d: u32) -> IdNumber {
        IdNumber::from_parts(310115, date(y, m, d), 123)
    }

    #[test]
    fn default_start_is_the_birth_anniversary_five_years_back() {
        let id = id_born(1990, 6, 15);
        let period = ValidityPeriod::derive(None, None, Some(&id), date(2020, 1, 1));
        assert_eq!(period.start, date(2015, 6, 15));
    }

    #[test]
    fn start_never_precedes_the_birth_date() {
        let id = id_born(2018, 3, 2);
        let period = ValidityPeriod::derive(None, None, Some(&id), date(2020, 1, 1));
        assert_eq!(period.start, date(2018, 3, 2));
    }

    #[test]
    fn expiry_extends_the_start_by_at_least_twenty_years() {
        let id = id_born(1990, 6, 15);
        let period = ValidityPeriod::derive(None, None, Some(&id), date(2020, 1, 1));
        assert_eq!(period.expiry, Expiry::On(date(2035, 6, 15)));
    }

    #[test]
    fn holders_over_forty_six_carry_long_term_cards() {
        let id = id_born(1960, 1, 1);
        let period = ValidityPeriod::derive(None, None, Some(&id), date(2020, 1, 1));
        assert_eq!(period.expiry, Expiry::LongTerm);

        // even an explicit expiry is overridden
        let period =
            ValidityPeriod::derive(None, Some(date(2030, 1, 1)), Some(&id), date(2020, 1, 1));
        assert_eq!(period.expiry, Expiry::LongTerm);
    }

    #[test]
    fn windows_spanning_more_than_thirty_years_are_long_term() {
        let period =
            ValidityPeriod::derive(Some(date(1985, 5, 1)), None, None, date(2020, 1, 1));
        assert_eq!(period.expiry, Expiry::LongTerm);
    }

    #[test]
    fn explicit_dates_pass_through_for_younger_holders() {
        let id = id_born(1995, 2, 10);
        let period = ValidityPeriod::derive(
            Some(date(2015, 2, 10)),
            Some(date(2035, 2, 10)),
            Some(&id),
            date(2020, 1, 1),
        );
        assert_eq!(period.start, date(2015, 2, 10));
        assert_eq!(period.expiry, Expiry::On(date(2035, 2, 10)));
    }

    #[test]
    fn card_dates_format_with_dots() {
        assert_eq!(format_card_date(date(2015, 6, 5)), "2015.06.05");
        assert_eq!(Expiry::LongTerm.to_string(), "长期");
    }
}
