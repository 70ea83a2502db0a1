//! Provider error types.
//!
//! The enum is defined in `studybuddy-core` so question generation can
//! classify failures; backends here construct and return it.

pub use studybuddy_core::error::ProviderError;
