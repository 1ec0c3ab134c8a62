//! Resource encoding for transport.

mod encoder_cache;

pub use encoder_cache::{EncodedPayload, EncoderCache};
