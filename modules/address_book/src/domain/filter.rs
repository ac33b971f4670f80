//! Contact search predicate built from listing parameters and "today".
//!
//! The same [`ContactFilter`] is evaluated in memory via [`ContactFilter::matches`]
//! and translated into SQL by the storage adapter, so both paths must agree.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};

use crate::contract::model::{Contact, ContactQuery};

/// Birthday projection with the year dropped. Orders like its `MM-DD` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    /// `MM-DD`, the format persisted in the `birthday_md` column.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Inclusive month-day window `[today, today + 7 days]`.
///
/// When the window crosses Dec 31 the end sorts before the start; such a
/// window matches `md >= start || md <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    start: MonthDay,
    end: MonthDay,
}

impl BirthdayWindow {
    pub const SPAN_DAYS: u64 = 7;

    pub fn starting(today: NaiveDate) -> Self {
        let last = today
            .checked_add_days(Days::new(Self::SPAN_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self {
            start: MonthDay::of(today),
            end: MonthDay::of(last),
        }
    }

    pub fn start(&self) -> MonthDay {
        self.start
    }

    pub fn end(&self) -> MonthDay {
        self.end
    }

    pub fn wraps_year_end(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, md: MonthDay) -> bool {
        if self.wraps_year_end() {
            md >= self.start || md <= self.end
        } else {
            self.start <= md && md <= self.end
        }
    }
}

/// Conjunction of every supplied criterion. Owner scoping is applied by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub birthday_window: Option<BirthdayWindow>,
}

impl ContactFilter {
    pub fn build(query: &ContactQuery, today: NaiveDate) -> Self {
        Self {
            name: non_empty(query.name.as_deref()),
            surname: non_empty(query.surname.as_deref()),
            email: non_empty(query.email.as_deref()),
            birthday_window: query.birthdays.then(|| BirthdayWindow::starting(today)),
        }
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        contains(&contact.name, self.name.as_deref())
            && contains(&contact.surname, self.surname.as_deref())
            && contains(&contact.email, self.email.as_deref())
            && self
                .birthday_window
                .is_none_or(|w| w.contains(MonthDay::of(contact.birthday)))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

fn contains(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|n| haystack.contains(n))
}
