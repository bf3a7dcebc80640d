//! Which declaration a generated template belongs to.

use nova_config::TemplatesConfig;
use nova_types::{is_of_class_type, ClassId, TypeStore};

use crate::error::TemplateError;
use crate::resolve::{ResolveError, Resolver};
use crate::tree::{CompilationUnit, NodeId, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerKind {
    /// A named class that extends the visitor type.
    VisitorClass,
    /// An anonymous visitor instantiated inside some other class.
    AnonymousVisitor,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owner {
    /// Qualified name of the generated class (`foo.Foo_before`).
    pub qualified_name: String,
    /// Empty for the unnamed package.
    pub package: String,
    pub simple_name: String,
    pub kind: OwnerKind,
}

impl Owner {
    fn new(qualified_name: String, package: String, kind: OwnerKind) -> Self {
        let simple_name = match qualified_name.rfind('.') {
            Some(idx) => qualified_name[idx + 1..].to_owned(),
            None => qualified_name.clone(),
        };
        Self {
            qualified_name,
            package,
            simple_name,
            kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OwnerResolution {
    Found(Owner),
    /// Neither the enclosing class nor an enclosing instantiation is a visitor.
    OutsideVisitor,
    /// The enclosing instantiation could not be attributed.
    Unresolved(ResolveError),
}

/// Resolve the owner of the template whose root-to-lambda path is `path`.
///
/// The innermost class declaration on the path wins when it is a visitor;
/// its canonical name is used. Otherwise the innermost instantiation on the
/// path is attributed, and if it constructs a visitor the binary name of the
/// constructed (anonymous) class is used, keeping `$` separators.
pub fn resolve_owner(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    config: &TemplatesConfig,
    path: &[NodeId],
    template_name: &str,
) -> Result<OwnerResolution, TemplateError> {
    let types = resolver.types();
    let Some(class) = path.iter().rev().find_map(|&id| match unit.kind(id) {
        NodeKind::ClassDecl { class, .. } => Some(*class),
        _ => None,
    }) else {
        let node = path.last().copied().unwrap_or_else(|| unit.root());
        return Err(TemplateError::MissingEnclosingClass { node });
    };

    let package = class
        .and_then(|id| types.class(id))
        .map(|def| def.package().to_owned())
        .or_else(|| unit.package().map(str::to_owned))
        .unwrap_or_default();

    if let Some(def) = class
        .filter(|&id| types.is_subclass_of(id, &config.visitor_type))
        .and_then(|id| types.class(id))
    {
        return Ok(OwnerResolution::Found(Owner::new(
            format!("{}_{template_name}", def.qualified_name()),
            package,
            OwnerKind::VisitorClass,
        )));
    }

    let Some(new_class) = path
        .iter()
        .rev()
        .copied()
        .find(|&id| matches!(unit.kind(id), NodeKind::NewClass { .. }))
    else {
        return Ok(OwnerResolution::OutsideVisitor);
    };
    let NodeKind::NewClass { class: clazz, .. } = unit.kind(new_class) else {
        return Ok(OwnerResolution::OutsideVisitor);
    };

    let resolution = match resolver.resolve_all(unit, &[new_class]) {
        Ok(resolution) => resolution,
        Err(error) => return Ok(OwnerResolution::Unresolved(error)),
    };
    let constructs_visitor = resolution
        .ty(*clazz)
        .is_some_and(|ty| is_of_class_type(types, ty, &config.visitor_type));
    let constructed = resolution.ty(new_class).and_then(|ty| ty.class_id());

    match constructed.filter(|_| constructs_visitor) {
        Some(id) => Ok(binary_owner(types, id, template_name, package)
            .map_or(OwnerResolution::OutsideVisitor, OwnerResolution::Found)),
        None => Ok(OwnerResolution::OutsideVisitor),
    }
}

fn binary_owner(
    types: &TypeStore,
    class: ClassId,
    template_name: &str,
    package: String,
) -> Option<Owner> {
    let def = types.class(class)?;
    Some(Owner::new(
        format!("{}_{template_name}", def.binary_name),
        package,
        OwnerKind::AnonymousVisitor,
    ))
}
