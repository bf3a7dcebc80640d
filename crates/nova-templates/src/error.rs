use std::io;

use thiserror::Error;

use crate::tree::NodeId;

/// Conditions that abandon a call site and surface to the caller.
///
/// Everything recoverable is reported as a warning diagnostic instead.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template lambda has no enclosing class declaration; the tree is
    /// malformed.
    #[error("expected to find an enclosing class for template at {node:?}")]
    MissingEnclosingClass { node: NodeId },
    #[error("failed to write generated template `{name}`: {source}")]
    ArtifactWrite {
        name: String,
        #[source]
        source: io::Error,
    },
}
