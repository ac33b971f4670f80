//! Outbound ports the domain depends on besides the contact store.

use chrono::{DateTime, Local, NaiveDate, Utc};
use thiserror::Error;

use crate::contract::model::OwnerId;

/// Source of "now" and "today" for timestamps and the birthday window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for birthday checks.
    fn today(&self) -> NaiveDate;
}

/// Wall clock; "today" follows the server's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date. Timestamps still advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token subject is not a valid owner id")]
    InvalidSubject,
}

/// Resolves a bearer token into the identity of the caller.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<OwnerId, AuthError>;
}
