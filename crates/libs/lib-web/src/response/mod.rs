//! # Response Envelopes
//!
//! Pure pieces of the response pipeline, driven by the response-map
//! middleware:
//!
//! - [`normalize`]: wraps successful handler output in the success envelope, once.
//! - [`translate`]: turns any escaped [`Error`](crate::Error) into the error envelope.

pub mod normalize;
pub mod translate;

pub use normalize::{normalize, Normalized};
pub use translate::{translate, Translation};
