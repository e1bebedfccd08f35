use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The person credited with a revision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    /// Create an author, rejecting values that would corrupt a signature line.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        let email = email.into();
        if name.trim().is_empty() {
            return Err(TypeError::InvalidAuthor("name is empty".into()));
        }
        for value in [&name, &email] {
            if value.contains(['<', '>', '\n', '\0']) {
                return Err(TypeError::InvalidAuthor(format!(
                    "forbidden character in {value:?}"
                )));
            }
        }
        Ok(Self { name, email })
    }

    /// The author used for the root revision of a new repository.
    pub fn system() -> Self {
        Self {
            name: "folio".into(),
            email: "folio@localhost".into(),
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Revision timestamp: whole seconds since the UNIX epoch, UTC.
///
/// Whole seconds keep revision ids stable across serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a timestamp from seconds since the epoch.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    /// The epoch (used for the root revision so its id is reproducible).
    pub const fn epoch() -> Self {
        Self(0)
    }

    /// Seconds since the epoch.
    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Convert to a `chrono` UTC datetime.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.0, 0)
            .single()
            .unwrap_or_default()
    }

    /// RFC 3339 form with a `Z` suffix, e.g. `2024-05-01T12:00:00Z`.
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime().to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}
