use std::collections::HashSet;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{LoggingConfig, TemplatingConfig};

impl TemplatingConfig {
    /// Validate semantic invariants, reporting as many problems as possible
    /// in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_templates(self, &mut out);
        validate_logging(self, &mut out);

        out
    }
}

fn validate_templates(config: &TemplatingConfig, out: &mut ValidationDiagnostics) {
    let templates = &config.templates;
    for (toml_path, value) in [
        ("templates.builder_type", &templates.builder_type),
        ("templates.visitor_type", &templates.visitor_type),
        ("templates.primitive_annotation", &templates.primitive_annotation),
    ] {
        if !is_qualified_name(value) {
            out.errors.push(ConfigValidationError::InvalidTypeName {
                toml_path: toml_path.to_owned(),
                value: value.clone(),
            });
        }
    }

    if templates.method_names.is_empty() {
        out.errors.push(ConfigValidationError::NoTemplateMethods);
    }
    let mut seen = HashSet::new();
    for name in &templates.method_names {
        if !seen.insert(name.as_str()) {
            out.warnings.push(ConfigWarning::DuplicateMethodName { name: name.clone() });
        }
    }

    if templates.implicit_package.trim().is_empty() {
        out.errors.push(ConfigValidationError::EmptyImplicitPackage);
    }
}

fn validate_logging(config: &TemplatingConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}

/// At least two dot-separated Java identifiers.
fn is_qualified_name(value: &str) -> bool {
    let mut segments = 0;
    for segment in value.split('.') {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_alphabetic() || first == '_' || first == '$')
            || !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}
