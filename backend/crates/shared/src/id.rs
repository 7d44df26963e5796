//! Common ID Types
//!
//! Type-safe wrappers around the `serial` primary keys of the relational
//! store. A `FarmId` cannot be passed where a `LivestockId` is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Generic typed ID wrapper over a positive `i32`.
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type FarmId = Id<markers::Farm>;
///
/// let id = FarmId::parse("42").unwrap();
/// assert_eq!(id.get(), 42);
/// assert!(FarmId::parse("abc").is_none());
/// ```
pub struct Id<T> {
    value: i32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap a value read from the database.
    pub const fn new(value: i32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Parse a path segment. Non-numeric and non-positive input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<i32>() {
            Ok(value) if value > 0 => Some(Self::new(value)),
            _ => None,
        }
    }

    /// Raw value for query binding.
    pub const fn get(&self) -> i32 {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i32> for Id<T> {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i32::deserialize(deserializer)?;
        if value <= 0 {
            return Err(serde::de::Error::custom("id must be a positive integer"));
        }
        Ok(Self::new(value))
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct User;
    pub struct Farm;
    pub struct Livestock;
    pub struct Reading;
    pub struct Notification;
}

pub type UserId = Id<markers::User>;
pub type FarmId = Id<markers::Farm>;
pub type LivestockId = Id<markers::Livestock>;
pub type ReadingId = Id<markers::Reading>;
pub type NotificationId = Id<markers::Notification>;
