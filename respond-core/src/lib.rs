//! Core types for respond pipelines.
//!
//! This crate provides the transport-agnostic pieces used by the
//! `respond` pipeline crate.
//!
//! ## Modules
//!
//! - [`error`]: Failure kinds, status classification and the pipeline error type
//! - [`codec`]: Structured-data codec trait and the JSON codec

mod codec;
mod error;

pub use codec::*;
pub use error::*;
