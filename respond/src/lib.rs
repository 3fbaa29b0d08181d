//! # respond
//!
//! A fluent pipeline for handling one HTTP exchange: read the request body,
//! decode it, run handler logic, encode the response and write it out.
//!
//! Each step either runs or, once an earlier step has failed, does nothing.
//! The first failure is kept and turned into a status code when the pipeline
//! is finalized:
//!
//! | Failure | Status |
//! |---|---|
//! | malformed syntax, invalid text encoding | `400 Bad Request` |
//! | read, schema mismatch, encode, custom step | `500 Internal Server Error` |
//!
//! ## Features
//!
//! - **Single chain per handler:** no branching between steps; failures short-circuit.
//! - **Exactly one write:** [`Pipeline::finalize`] writes once and reports transport errors separately.
//! - **Pluggable codec:** JSON by default via [`JsonCodec`], or any [`Codec`].
//! - **Axum-native:** [`BufferedRequest`] extractor and `IntoResponse` for [`Pipeline`].

pub mod config;
pub mod exchange;
pub mod extract;
pub mod limits;
pub mod pipeline;
pub mod response;

pub use config::PipelineConfig;
pub use exchange::{BodyReader, Inbound, Outbound, ResponseRecorder, WriteError};
pub use extract::BufferedRequest;
pub use limits::MessageLimits;
pub use pipeline::{Finalized, Pipeline};

// Re-export core types
pub use respond_core::{BoxError, Codec, JsonCodec, Kind, PipelineError};

pub mod prelude {
    //! A prelude for `respond` providing the most common types.
    pub use crate::exchange::{Inbound, Outbound, ResponseRecorder};
    pub use crate::extract::BufferedRequest;
    pub use crate::pipeline::Pipeline;
    pub use respond_core::{Codec, Kind, PipelineError};
}
