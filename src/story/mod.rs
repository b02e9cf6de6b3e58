//! Story generation
//!
//! Validated user requests and the chunked extension loop that turns a
//! short prompt into a long-form story.

pub mod extender;
pub mod request;

pub use extender::{Extension, StopReason, StoryExtender};
pub use request::{validate_length, GenerationRequest};
