//! Analysis requests and the rules a resource must pass before submission.

pub mod request;
pub mod resource;
