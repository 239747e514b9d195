use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("player id cannot be empty")]
    Empty,
    #[error("player id {0:?} contains control characters")]
    Malformed(String),
}

/// Player identifier as issued by the identity provider.
///
/// Never empty and never contains control characters, so any `PlayerId`
/// that reaches the resolver is already well-formed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdError::Empty);
        }
        if raw.chars().any(char::is_control) {
            return Err(IdError::Malformed(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PlayerId::new(s)
    }
}

macro_rules! numeric_id {
    ($name:ident, $prefix:expr) => {
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

numeric_id!(AllianceId, "alliance");
numeric_id!(JobId, "job");

/// Monotonic generator for alliance and job ids.
/// Both kinds draw from one counter, so an alliance and a job never share a number.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn next_alliance_id(&mut self) -> AllianceId {
        AllianceId(self.bump())
    }

    pub fn next_job_id(&mut self) -> JobId {
        JobId(self.bump())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
