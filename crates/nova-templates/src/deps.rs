//! Imports and classpath entries a generated template needs.

use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexSet;
use nova_types::{ClassId, ClassOrigin, TypeStore};
use regex::Regex;

use crate::resolve::{Resolution, Symbol};
use crate::tree::{CompilationUnit, NodeId, NodeKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencySet {
    /// Canonical class names referenced by simple name, first occurrence first.
    pub imports: IndexSet<String>,
    /// `Owner.member` for static members referenced by simple name.
    pub static_imports: IndexSet<String>,
    /// Jar names (version suffix removed) backing referenced classes.
    pub classpath: IndexSet<String>,
}

impl DependencySet {
    /// `"a", "b"`, or the empty string when every referenced class is
    /// visible without extra jars.
    pub fn classpath_descriptor(&self) -> String {
        self.classpath
            .iter()
            .map(|entry| format!("\"{entry}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Scan the attributed subtree at `lambda` for referenced symbols.
///
/// Simple-name class references become imports unless they live in
/// `implicit_package`; simple-name static member references, including
/// receiver-less calls of static methods, become static imports. Every referenced class, qualified references included, is
/// checked for a jar origin. Subtrees rooted at `excluded` (removed marker
/// annotations) contribute nothing.
pub fn collect_dependencies(
    unit: &CompilationUnit,
    resolution: &Resolution,
    lambda: NodeId,
    excluded: &[NodeId],
    store: &TypeStore,
    implicit_package: &str,
) -> DependencySet {
    let implicit_prefix = format!("{implicit_package}.");
    let skipped: HashSet<NodeId> = excluded
        .iter()
        .flat_map(|&root| unit.descendants(root))
        .collect();
    let mut deps = DependencySet::default();

    for node in unit.descendants(lambda) {
        if skipped.contains(&node) {
            continue;
        }
        let Some(symbol) = resolution.symbol_of(node) else {
            continue;
        };
        if let Some(class) = symbol.class() {
            if let Some(entry) = classpath_entry(store, class) {
                deps.classpath.insert(entry);
            }
        }

        // Unqualified calls carry the method symbol on the call node itself.
        let simple_name = matches!(
            unit.kind(node),
            NodeKind::Ident { .. } | NodeKind::MethodCall { receiver: None, .. }
        );
        if !simple_name {
            continue;
        }
        match symbol {
            Symbol::Class(id) => {
                let Some(def) = store.class(*id) else {
                    continue;
                };
                let name = def.qualified_name();
                if !name.starts_with(&implicit_prefix) {
                    deps.imports.insert(name);
                }
            }
            Symbol::Field {
                owner,
                name,
                is_static: true,
            }
            | Symbol::Method {
                owner,
                name,
                is_static: true,
            } => {
                if let Some(def) = store.class(*owner) {
                    deps.static_imports
                        .insert(format!("{}.{name}", def.qualified_name()));
                }
            }
            _ => {}
        }
    }

    deps
}

/// Jar name for the outermost class enclosing `class`, if it comes from a jar.
fn classpath_entry(store: &TypeStore, class: ClassId) -> Option<String> {
    let def = store.class(store.outermost(class))?;
    let ClassOrigin::Jar(path) = &def.origin else {
        return None;
    };
    let stem = path.file_stem()?.to_string_lossy();
    Some(strip_version(&stem))
}

/// `guava-31.1-jre` -> `guava`
fn strip_version(jar_stem: &str) -> String {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    let re = VERSION.get_or_init(|| Regex::new(r"-\d.*$").expect("valid regex"));
    re.replace(jar_stem, "").into_owned()
}
