//! Jobs: handles, keys, results and submission outcomes.

pub mod handle;
pub mod result;
