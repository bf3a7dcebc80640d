//! Template source generation.
//!
//! Finds `expression`/`statement` template factory calls whose last argument
//! is a lambda, and generates one class per call that rebuilds the lambda body
//! as a parameterized template string:
//!
//! ```text
//! statement(this, "before", (Path p) -> Files.delete(p))
//!     => foo.Foo_before: JavaTemplate.builder("Files.delete(#{any(java.nio.file.Path)})")
//! ```
//!
//! Parsing and type attribution are supplied by the caller through
//! [`CompilationUnit`] and [`Resolver`]; generated files go to a [`Filer`].

pub mod deps;
pub mod emit;
mod error;
pub mod filer;
pub mod matcher;
pub mod owner;
pub mod params;
pub mod primitives;
pub mod processor;
pub mod resolve;
pub mod rewrite;
pub mod tree;

pub use deps::{collect_dependencies, DependencySet};
pub use emit::{emit_artifact, parameter_imports, GeneratedArtifact};
pub use error::TemplateError;
pub use filer::{Filer, FsFiler, MemoryFiler};
pub use matcher::{CallSite, CallSites, MatchEvent};
pub use owner::{resolve_owner, Owner, OwnerKind, OwnerResolution};
pub use params::{locate_parameters, Parameter, TemplateLambda};
pub use primitives::PrimitiveTable;
pub use processor::{DiagnosticSink, ProcessSummary, TemplateProcessor};
pub use resolve::{
    Attr, MemoryResolver, ResolveError, Resolution, Resolver, Symbol, SymbolId, SymbolKey,
};
pub use rewrite::{
    escape_template, placeholder, rewrite_template, unescape_template, RewriteError,
};
pub use tree::{CompilationUnit, Literal, NodeId, NodeKind, TreeBuilder};
