//! Destinations for generated artifacts.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use nova_config::GeneratedSourcesConfig;
use nova_core::fs::write_file_atomic;

use crate::emit::GeneratedArtifact;

/// Receives each artifact exactly once.
pub trait Filer {
    fn create(&mut self, artifact: &GeneratedArtifact) -> io::Result<()>;
}

/// Writes artifacts below a generated-sources root.
///
/// A second artifact with the same qualified name in one run is refused with
/// [`io::ErrorKind::AlreadyExists`].
#[derive(Debug)]
pub struct FsFiler {
    root: PathBuf,
    written: HashSet<String>,
}

impl FsFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: HashSet::new(),
        }
    }

    pub fn from_config(config: &GeneratedSourcesConfig, project_root: &Path) -> Self {
        Self::new(config.resolve_output_dir(project_root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, artifact: &GeneratedArtifact) -> PathBuf {
        self.root.join(artifact.relative_path())
    }
}

impl Filer for FsFiler {
    fn create(&mut self, artifact: &GeneratedArtifact) -> io::Result<()> {
        if self.written.contains(&artifact.qualified_name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} was already generated", artifact.qualified_name),
            ));
        }

        let dest = self.path_for(artifact);
        write_file_atomic(&dest, |out| out.write_all(artifact.text.as_bytes()))?;
        self.written.insert(artifact.qualified_name.clone());
        tracing::debug!(target: "nova.templates", path = %dest.display(), "wrote generated template");
        Ok(())
    }
}

/// Keeps artifacts in memory, in creation order.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    artifacts: IndexMap<String, GeneratedArtifact>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.get(qualified_name)
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.values()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl Filer for MemoryFiler {
    fn create(&mut self, artifact: &GeneratedArtifact) -> io::Result<()> {
        if self.artifacts.contains_key(&artifact.qualified_name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} was already generated", artifact.qualified_name),
            ));
        }
        self.artifacts
            .insert(artifact.qualified_name.clone(), artifact.clone());
        Ok(())
    }
}
