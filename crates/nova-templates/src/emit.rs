//! Generated source text.

use std::path::PathBuf;

use indexmap::IndexSet;
use nova_config::TemplatesConfig;
use nova_types::{Type, TypeStore};

use crate::deps::DependencySet;
use crate::owner::Owner;
use crate::params::TemplateLambda;

const CHAIN_INDENT: &str = "                ";

/// One generated source file. Immutable once emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub qualified_name: String,
    /// Empty for the unnamed package.
    pub package: String,
    pub simple_name: String,
    pub text: String,
}

impl GeneratedArtifact {
    /// `foo/bar/Foo_before.java`
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.package.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.java", self.simple_name));
        path
    }
}

/// Imports for class-typed parameters, in declaration order, skipping types
/// under `implicit_package`.
pub fn parameter_imports(
    lambda: &TemplateLambda,
    store: &TypeStore,
    implicit_package: &str,
) -> Vec<String> {
    let mut imports = IndexSet::new();
    for param in &lambda.params {
        let Type::Class { class, .. } = &param.ty else {
            continue;
        };
        let Some(def) = store.class(*class) else {
            continue;
        };
        let name = def.qualified_name();
        if !name.starts_with(implicit_package) {
            imports.insert(name);
        }
    }
    imports.into_iter().collect()
}

/// Render the generated class for one template.
///
/// `template` must already be escaped for a string literal.
pub fn emit_artifact(
    config: &TemplatesConfig,
    owner: &Owner,
    template: &str,
    param_imports: &[String],
    deps: &DependencySet,
) -> GeneratedArtifact {
    let mut text = String::new();
    if !owner.package.is_empty() {
        text.push_str(&format!("package {};\n", owner.package));
    }
    text.push_str(&format!("import {}.*;\n", config.builder_package()));
    for import in param_imports {
        text.push_str(&format!("import {import};\n"));
    }
    text.push('\n');

    text.push_str(&format!("public class {} {{\n", owner.simple_name));
    text.push_str(&format!(
        "    public static {} getTemplate({}<?> visitor) {{\n",
        config.builder_simple_name(),
        config.visitor_simple_name()
    ));
    text.push_str(&format!("        return {}\n", config.template_class_name()));
    text.push_str(&format!("{CHAIN_INDENT}.builder(\"{template}\")"));

    let classpath = deps.classpath_descriptor();
    if !classpath.is_empty() {
        text.push_str(&format!(
            "\n{CHAIN_INDENT}.javaParser(JavaParser.fromJavaVersion().classpath({classpath}))"
        ));
    }
    for import in &deps.imports {
        text.push_str(&format!("\n{CHAIN_INDENT}.imports(\"{import}\")"));
    }
    for import in &deps.static_imports {
        text.push_str(&format!("\n{CHAIN_INDENT}.staticImports(\"{import}\")"));
    }
    text.push_str(";\n    }\n}\n");

    GeneratedArtifact {
        qualified_name: owner.qualified_name.clone(),
        package: owner.package.clone(),
        simple_name: owner.simple_name.clone(),
        text,
    }
}
