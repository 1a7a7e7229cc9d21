use std::error::Error;
use std::fmt::{self, Display};

use tiny_agent_model::ModelProviderError;

/// An error that ends a run of the agent.
#[derive(Debug)]
pub enum AgentError {
    /// The request to the model could not be completed.
    Inference(Box<dyn ModelProviderError>),
}

impl Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::Inference(err) => {
                write!(f, "error running inference: {err}")
            }
        }
    }
}

impl Error for AgentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AgentError::Inference(err) => {
                let err: &(dyn Error + 'static) = &**err;
                Some(err)
            }
        }
    }
}

/// An error returned when an agent cannot be built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// Two tools were registered with the same name.
    DuplicateTool(String),
}

impl Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::DuplicateTool(name) => {
                write!(f, "tool `{name}` is registered more than once")
            }
        }
    }
}

impl Error for BuildError {}
