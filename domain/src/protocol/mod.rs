//! Wire protocol boundary: one decoding step turns a raw body into a
//! [`response::ParsedResponse`], and [`extract`] reads results out of it.

pub mod extract;
pub mod response;
