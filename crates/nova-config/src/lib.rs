use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Once;

use thiserror::Error;
use tracing_subscriber::prelude::*;

mod diagnostics;
mod schema;
mod validation;

pub use diagnostics::{ConfigDiagnostics, ConfigValidationError, ConfigWarning, ValidationDiagnostics};
pub use schema::json_schema;

/// Default canonical name of the template builder returned by template call sites.
pub const DEFAULT_BUILDER_TYPE: &str = "org.openrewrite.java.JavaTemplate.Builder";
/// Default canonical name of the visitor base type hosting templates.
pub const DEFAULT_VISITOR_TYPE: &str = "org.openrewrite.java.JavaVisitor";
/// Default marker annotation requesting primitive placeholder types.
pub const DEFAULT_PRIMITIVE_ANNOTATION: &str = "org.openrewrite.java.template.Primitive";

/// Root configuration (`templates.toml`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct TemplatingConfig {
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub generated_sources: GeneratedSourcesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Recognized names that drive call-site matching and owner resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Canonical name of the builder type a template call site must return.
    #[serde(default = "TemplatesConfig::default_builder_type")]
    pub builder_type: String,

    /// Canonical name of the visitor base type; templates outside a subclass
    /// of it are skipped.
    #[serde(default = "TemplatesConfig::default_visitor_type")]
    pub visitor_type: String,

    /// Canonical name of the annotation that asks for a primitive placeholder
    /// type on a boxed lambda parameter.
    #[serde(default = "TemplatesConfig::default_primitive_annotation")]
    pub primitive_annotation: String,

    /// Invocation names recognized as template factories.
    #[serde(default = "TemplatesConfig::default_method_names")]
    pub method_names: Vec<String>,

    /// Package whose types are visible without an import.
    #[serde(default = "TemplatesConfig::default_implicit_package")]
    pub implicit_package: String,
}

impl TemplatesConfig {
    fn default_builder_type() -> String {
        DEFAULT_BUILDER_TYPE.to_owned()
    }

    fn default_visitor_type() -> String {
        DEFAULT_VISITOR_TYPE.to_owned()
    }

    fn default_primitive_annotation() -> String {
        DEFAULT_PRIMITIVE_ANNOTATION.to_owned()
    }

    fn default_method_names() -> Vec<String> {
        vec!["expression".to_owned(), "statement".to_owned()]
    }

    fn default_implicit_package() -> String {
        "java.lang".to_owned()
    }

    /// Package of the builder type; generated sources import it with a wildcard.
    pub fn builder_package(&self) -> &str {
        split_package(&self.builder_type).0
    }

    /// Builder type relative to its package (`JavaTemplate.Builder`).
    pub fn builder_simple_name(&self) -> &str {
        split_package(&self.builder_type).1
    }

    /// Outermost class of the builder type (`JavaTemplate`), which hosts the
    /// static `builder` factory.
    pub fn template_class_name(&self) -> &str {
        let name = self.builder_simple_name();
        name.split('.').next().unwrap_or(name)
    }

    /// Visitor type relative to its package (`JavaVisitor`).
    pub fn visitor_simple_name(&self) -> &str {
        split_package(&self.visitor_type).1
    }

    pub fn is_template_method(&self, name: &str) -> bool {
        self.method_names.iter().any(|candidate| candidate == name)
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            builder_type: Self::default_builder_type(),
            visitor_type: Self::default_visitor_type(),
            primitive_annotation: Self::default_primitive_annotation(),
            method_names: Self::default_method_names(),
            implicit_package: Self::default_implicit_package(),
        }
    }
}

/// Split a canonical name at the first segment that starts with an uppercase
/// letter, following the Java naming convention for types.
fn split_package(fqn: &str) -> (&str, &str) {
    let mut offset = 0;
    for segment in fqn.split('.') {
        if segment.starts_with(|c: char| c.is_ascii_uppercase()) {
            let package = fqn[..offset].trim_end_matches('.');
            return (package, &fqn[offset..]);
        }
        offset += segment.len() + 1;
    }
    match fqn.rfind('.') {
        Some(idx) => (&fqn[..idx], &fqn[idx + 1..]),
        None => ("", fqn),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct GeneratedSourcesConfig {
    /// Directory generated template sources are written to (relative to the
    /// project root unless absolute).
    #[serde(default = "GeneratedSourcesConfig::default_output_dir")]
    #[schemars(with = "String")]
    pub output_dir: PathBuf,
}

impl GeneratedSourcesConfig {
    fn default_output_dir() -> PathBuf {
        PathBuf::from("target/generated-sources/templates")
    }

    /// Resolve `output_dir` against `project_root`.
    pub fn resolve_output_dir(&self, project_root: &Path) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            project_root.join(&self.output_dir)
        }
    }
}

impl Default for GeneratedSourcesConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Effective filter: the configured level merged with `RUST_LOG`.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        match env_directives {
            Some(env_directives) => {
                let config_directives = Self::normalize_level_directives(&self.level);
                tracing_subscriber::EnvFilter::try_new(format!(
                    "{config_directives},{env_directives}"
                ))
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value.message().to_owned())
    }
}

impl TemplatingConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str(&text)
    }

    /// Strict load: unknown keys are an error. Use
    /// [`TemplatingConfig::load_from_str_with_diagnostics`] to get them back as
    /// warnings instead.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<TemplatingConfig>(text)?;
        match unknown_keys.into_iter().next() {
            Some(key) => Err(ConfigError::UnknownKey(key)),
            None => Ok(config),
        }
    }

    /// Load a config and report unknown keys and semantic problems alongside it.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<TemplatingConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate());

        Ok((config, diagnostics))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber (stderr, plain or JSON).
///
/// Only the first call has an effect; later calls, and calls made after some
/// other global subscriber was installed, are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(target: "nova.config", level = %config.level, "tracing initialized");
        }
    });
}
