//! Job handles and caller-assigned job keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque locator issued by the remote service for an in-flight job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier a caller assigns to each job in a batch.
///
/// Any ordered, printable, thread-safe value works: role names, attachment
/// ids, `(id, field)` tuples wrapped in a newtype, and so on.
pub trait JobKey: Clone + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> JobKey for T where T: Clone + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {}
