//! Core domain concepts shared across all subdomains.
//!
//! - [`error::JobError`] — terminal failure of a single job, tagged with a [`error::JobErrorKind`]
//! - [`string::truncate_at_word_boundary`] — display truncation for generated text

pub mod error;
pub mod string;
