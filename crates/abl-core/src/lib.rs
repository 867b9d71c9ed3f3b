//! abl-core: shared foundation for ablview.
//!
//! Contains:
//! - numeric (Real + missing-aware series helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

pub use error::{AblError, AblResult};
pub use numeric::*;
