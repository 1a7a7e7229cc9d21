//! A small coding agent for the terminal.
//!
//! The crate bundles a CLI tool, and a library that wires the built-in
//! file tools into an agent, so you can drive the same session from your own
//! host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`tiny_agent_core`] crate.
pub mod core {
    pub use tiny_agent_core::*;
}
