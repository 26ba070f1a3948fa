//! Error taxonomy for the pipeline simulator.
//!
//! Every failure is unrecoverable for the current invocation: loading,
//! resolution and simulation either complete fully or abort with one of
//! these variants. There is no partial-success mode.

use thiserror::Error;

/// Errors raised while loading a pipeline definition, resolving an
/// execution line, or running the scheduling simulation.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("component with name {0} already exists")]
    DuplicateIdentity(String),

    #[error("component {component} references unknown dependency {dependency}")]
    UnknownDependency {
        component: String,
        dependency: String,
    },

    #[error("component {0} not in the available components")]
    UnknownComponent(String),

    #[error("cycle detected in group dependencies; unresolved groups: {0:?}")]
    CyclicGroupDependency(Vec<String>),

    #[error("cycle detected in component dependencies; unresolved components: {0:?}")]
    CyclicComponentDependency(Vec<String>),

    #[error("scheduling invariant violated: {0}")]
    SchedulingInvariantViolation(String),

    #[error("malformed pipeline definition: {0}")]
    MalformedDefinition(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::DuplicateIdentity("train".to_string());
        assert!(err.to_string().contains("train"));

        let err = PipelineError::UnknownDependency {
            component: "fit".to_string(),
            dependency: "load".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fit"));
        assert!(msg.contains("load"));
    }

    #[test]
    fn test_io_error_conversion() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(PipelineError::Io(_))));
    }
}
