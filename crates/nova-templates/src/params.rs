//! Lambda parameters and the places the lambda body refers to them.

use std::collections::{BTreeMap, HashMap};

use nova_core::{TextRange, TextSize};
use nova_types::Type;

use crate::resolve::{ResolveError, Resolution, Resolver, SymbolId};
use crate::tree::{CompilationUnit, NodeId, NodeKind};

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub node: NodeId,
    pub name: String,
    /// Attributed declared type; `Type::Unknown` when attribution produced none.
    pub ty: Type,
    /// Carries the primitive marker annotation.
    pub prefer_primitive: bool,
    /// Annotations other than the marker, in declaration order.
    pub annotations: Vec<NodeId>,
    /// Marker annotations removed from `annotations`.
    pub markers: Vec<NodeId>,
    pub symbol: Option<SymbolId>,
}

#[derive(Clone, Debug)]
pub struct TemplateLambda {
    pub node: NodeId,
    pub params: Vec<Parameter>,
    pub body: NodeId,
    pub body_range: TextRange,
    /// Start offset of each parameter reference in the body, mapped to the
    /// index of the referenced parameter in `params`.
    pub references: BTreeMap<TextSize, usize>,
    /// The pass that attributed parameters and body; `None` for lambdas
    /// without parameters.
    pub resolution: Option<Resolution>,
}

impl TemplateLambda {
    /// Parameter behind a reference recorded in `references`.
    pub fn parameter_at(&self, offset: TextSize) -> Option<&Parameter> {
        self.references.get(&offset).map(|&idx| &self.params[idx])
    }

    /// Every removed marker annotation, across all parameters.
    pub fn markers(&self) -> Vec<NodeId> {
        self.params
            .iter()
            .flat_map(|param| param.markers.iter().copied())
            .collect()
    }
}

/// Attribute the parameters of `lambda` together with its body and record
/// every identifier in the body that denotes one of those parameters.
///
/// Matching is by symbol identity within the single pass, so an inner
/// declaration shadowing a parameter name is not mistaken for it.
/// `marker` is the canonical name of the primitive marker annotation.
pub fn locate_parameters(
    unit: &CompilationUnit,
    resolver: &dyn Resolver,
    lambda: NodeId,
    marker: &str,
) -> Result<TemplateLambda, ResolveError> {
    let NodeKind::Lambda { params, body } = unit.kind(lambda) else {
        return Err(ResolveError::Internal(format!("{lambda:?} is not a lambda")));
    };
    let body = *body;
    let body_range = unit.range(body);

    if params.is_empty() {
        return Ok(TemplateLambda {
            node: lambda,
            params: Vec::new(),
            body,
            body_range,
            references: BTreeMap::new(),
            resolution: None,
        });
    }

    let mut requested = params.clone();
    requested.push(lambda);
    let resolution = resolver.resolve_all(unit, &requested)?;

    let mut parameters = Vec::with_capacity(params.len());
    for &node in params {
        let NodeKind::Param {
            name, annotations, ..
        } = unit.kind(node)
        else {
            return Err(ResolveError::Internal(format!(
                "{node:?} is not a lambda parameter"
            )));
        };

        let (markers, kept): (Vec<NodeId>, Vec<NodeId>) =
            annotations.iter().copied().partition(|&annotation| {
                is_annotation_of(unit, &resolution, resolver, annotation, marker)
            });

        parameters.push(Parameter {
            node,
            name: name.clone(),
            ty: resolution.ty(node).cloned().unwrap_or(Type::Unknown),
            prefer_primitive: !markers.is_empty(),
            annotations: kept,
            markers,
            symbol: resolution.symbol(node),
        });
    }

    let by_symbol: HashMap<SymbolId, usize> = parameters
        .iter()
        .enumerate()
        .filter_map(|(idx, param)| Some((param.symbol?, idx)))
        .collect();

    let mut references = BTreeMap::new();
    for node in unit.descendants(body) {
        if !matches!(unit.kind(node), NodeKind::Ident { .. }) {
            continue;
        }
        if let Some(&idx) = resolution.symbol(node).and_then(|sym| by_symbol.get(&sym)) {
            references.insert(unit.range(node).start(), idx);
        }
    }

    tracing::trace!(
        target: "nova.templates",
        ?lambda,
        params = parameters.len(),
        references = references.len(),
        "located template parameters"
    );

    Ok(TemplateLambda {
        node: lambda,
        params: parameters,
        body,
        body_range,
        references,
        resolution: Some(resolution),
    })
}

fn is_annotation_of(
    unit: &CompilationUnit,
    resolution: &Resolution,
    resolver: &dyn Resolver,
    annotation: NodeId,
    fqn: &str,
) -> bool {
    let NodeKind::Annotation { ty } = unit.kind(annotation) else {
        return false;
    };
    let Some(class) = resolution
        .ty(annotation)
        .or_else(|| resolution.ty(*ty))
        .and_then(Type::class_id)
    else {
        return false;
    };
    resolver
        .types()
        .class(class)
        .is_some_and(|def| def.qualified_name() == fqn)
}
