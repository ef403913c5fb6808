//! Month arithmetic behind the calendar
//! navigation controls.
//!
//! Months are 1-indexed everywhere they
//! leave this module (data attributes,
//! query strings). Shifting goes through
//! a 0-indexed month count so that year
//! rollover falls out of euclidean
//! division instead of special cases.

use chrono::{
  Datelike,
  NaiveDate
};
use learnlog_shared::CalendarQuery;

use crate::ClientError;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct MonthRef {
  year:  i32,
  month: u32
}

/// Targets the prev/next controls must
/// point at while `displayed` is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTargets {
  pub displayed: MonthRef,
  pub prev:      MonthRef,
  pub next:      MonthRef
}

impl MonthRef {
  pub fn new(
    year: i32,
    month: u32
  ) -> Result<Self, ClientError> {
    // Both neighbours must still be
    // representable dates.
    let bracketed = |shown: MonthRef| {
      NaiveDate::from_ymd_opt(
        shown.year, shown.month, 1
      )
      .is_some()
    };
    let candidate = Self { year, month };
    if !(1..=12).contains(&month)
      || !bracketed(candidate)
      || !bracketed(candidate.previous())
      || !bracketed(candidate.next())
    {
      return Err(
        ClientError::InvalidMonth {
          year:  year.to_string(),
          month: month.to_string()
        }
      );
    }
    Ok(candidate)
  }

  /// Parses the raw `data-year` /
  /// `data-month` attribute pair.
  pub fn from_attrs(
    year: &str,
    month: &str
  ) -> Result<Self, ClientError> {
    let invalid = || {
      ClientError::InvalidMonth {
        year:  year.to_string(),
        month: month.to_string()
      }
    };
    let parsed_year = year
      .trim()
      .parse::<i32>()
      .map_err(|_| invalid())?;
    let parsed_month = month
      .trim()
      .parse::<u32>()
      .map_err(|_| invalid())?;
    Self::new(parsed_year, parsed_month)
      .map_err(|_| invalid())
  }

  pub fn containing(
    date: NaiveDate
  ) -> Self {
    Self {
      year:  date.year(),
      month: date.month()
    }
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn month(&self) -> u32 {
    self.month
  }

  pub fn shifted(
    &self,
    delta: i32
  ) -> Self {
    let zero_based = i64::from(self.year)
      * 12
      + i64::from(self.month) - 1
      + i64::from(delta);
    let year = zero_based
      .div_euclid(12)
      .clamp(
        i64::from(i32::MIN),
        i64::from(i32::MAX)
      ) as i32;
    Self {
      year,
      month: zero_based.rem_euclid(12)
        as u32
        + 1
    }
  }

  pub fn previous(&self) -> Self {
    self.shifted(-1)
  }

  pub fn next(&self) -> Self {
    self.shifted(1)
  }

  pub fn nav_targets(
    &self
  ) -> NavTargets {
    NavTargets {
      displayed: *self,
      prev:      self.previous(),
      next:      self.next()
    }
  }

  pub fn query(&self) -> CalendarQuery {
    CalendarQuery {
      year:  self.year,
      month: self.month
    }
  }
}

/// Works out which month is on screen
/// from whatever navigation controls the
/// page still carries.
pub fn displayed_month(
  prev_control: Option<MonthRef>,
  next_control: Option<MonthRef>,
  today: NaiveDate
) -> MonthRef {
  match (prev_control, next_control) {
    | (Some(prev), _) => prev.next(),
    | (None, Some(next)) => {
      next.previous()
    }
    | (None, None) => {
      MonthRef::containing(today)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn month(
    year: i32,
    month: u32
  ) -> MonthRef {
    MonthRef::new(year, month)
      .expect("valid month")
  }

  #[test]
  fn january_rolls_back_into_previous_december()
  {
    let targets =
      month(2024, 1).nav_targets();

    assert_eq!(
      targets.prev,
      month(2023, 12)
    );
    assert_eq!(
      targets.next,
      month(2024, 2)
    );
  }

  #[test]
  fn december_rolls_forward_into_next_january()
  {
    let targets =
      month(2023, 12).nav_targets();

    assert_eq!(
      targets.prev,
      month(2023, 11)
    );
    assert_eq!(
      targets.next,
      month(2024, 1)
    );
  }

  #[test]
  fn every_month_is_bracketed_by_its_neighbours()
  {
    for year in [1999, 2000, 2024, 2025]
    {
      for m in 1..=12 {
        let shown = month(year, m);
        let targets = shown.nav_targets();
        assert_eq!(
          targets.prev.next(),
          shown
        );
        assert_eq!(
          targets.next.previous(),
          shown
        );
        assert!(targets.prev < shown);
        assert!(shown < targets.next);
      }
    }
  }

  #[test]
  fn repeated_navigation_does_not_drift()
  {
    let start = month(2024, 5);
    let mut cursor = start;
    for _ in 0..37 {
      cursor = cursor.next();
    }
    for _ in 0..37 {
      cursor = cursor.previous();
    }

    assert_eq!(cursor, start);
    assert_eq!(
      start.shifted(37),
      month(2027, 6)
    );
    assert_eq!(
      start.shifted(-17),
      month(2022, 12)
    );
  }

  #[test]
  fn attrs_are_trimmed_and_validated() {
    assert_eq!(
      MonthRef::from_attrs(" 2024", "3 ")
        .expect("parse attrs"),
      month(2024, 3)
    );
    assert!(
      MonthRef::from_attrs("2024", "13")
        .is_err()
    );
    assert!(
      MonthRef::from_attrs("2024", "0")
        .is_err()
    );
    assert!(
      MonthRef::from_attrs("next", "1")
        .is_err()
    );
  }

  #[test]
  fn years_beyond_calendar_range_are_refused()
  {
    assert_eq!(
      MonthRef::from_attrs("2000000000", "6"),
      Err(ClientError::InvalidMonth {
        year:  "2000000000".to_string(),
        month: "6".to_string()
      })
    );
    assert!(
      MonthRef::new(i32::MIN, 1).is_err()
    );

    let last = NaiveDate::MAX;
    assert!(
      MonthRef::new(
        last.year(),
        last.month()
      )
      .is_err()
    );
    let shown = month(last.year(), 1);
    assert_eq!(
      shown.nav_targets().next,
      month(last.year(), 2)
    );
  }

  #[test]
  fn displayed_month_prefers_prev_control()
  {
    let today =
      NaiveDate::from_ymd_opt(2030, 7, 4)
        .expect("valid date");

    assert_eq!(
      displayed_month(
        Some(month(2023, 12)),
        Some(month(2024, 2)),
        today
      ),
      month(2024, 1)
    );
    assert_eq!(
      displayed_month(
        None,
        Some(month(2024, 1)),
        today
      ),
      month(2023, 12)
    );
    assert_eq!(
      displayed_month(None, None, today),
      month(2030, 7)
    );
  }
}
