//! An abstraction layer for different LLMs.
//!
//! This crate establishes an unified protocol for the agent to interact
//! with the model provider, so that the agent loop never depends on the
//! wire format of one particular vendor.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to. Provider crates
//! are responsible for converting them from and to their own payloads.

#![deny(missing_docs)]

mod error;
mod message;
mod provider;
mod request;
mod response;

pub use error::*;
pub use message::*;
pub use provider::*;
pub use request::*;
pub use response::*;
