//! Utilities shared by template generator tests.
//!
//! Tests describe a compilation unit by writing the real Java text and then
//! building the syntax tree over it bottom-up with [`Fixture`], locating each
//! node's range by searching the text. Attributes go straight into the
//! fixture's [`MemoryResolver`](nova_templates::MemoryResolver), so a test
//! states exactly what the front end would have resolved.

mod fixture;
mod markers;
mod world;

pub use fixture::Fixture;
pub use markers::extract_range;
pub use world::{openrewrite_types, GUAVA_JAR, REWRITE_JAVA_JAR};
