//! Core logic including the turn loop, tool dispatch and the inference
//! client.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod model_client;
pub mod tool;

pub use agent::{
    Agent, AgentBuilder, AgentError, AgentEvent, BuildError, UserInput,
};
