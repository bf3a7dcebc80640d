//! Discovery of template call sites.
//!
//! A call site qualifies when it invokes one of the configured factory names
//! with exactly three arguments, its attributed return type is the builder
//! type (or a subclass of it), and its third argument is a lambda, optionally
//! wrapped in a cast.

use nova_config::TemplatesConfig;
use nova_types::is_of_class_type;

use crate::resolve::{ResolveError, Resolution, Resolver};
use crate::tree::{CompilationUnit, NodeId, NodeKind, Preorder};

/// A matched template factory invocation.
#[derive(Clone, Debug)]
pub struct CallSite {
    pub call: NodeId,
    /// Factory name (`expression`, `statement`).
    pub name: String,
    /// Second argument; expected to be the template-name literal.
    pub template_name: NodeId,
    pub lambda: NodeId,
    /// The cast wrapping the lambda, if any.
    pub cast: Option<NodeId>,
    /// Attribution of the whole invocation subtree.
    pub resolution: Resolution,
}

#[derive(Clone, Debug)]
pub enum MatchEvent {
    Candidate(CallSite),
    /// A call with a template factory shape that could not be attributed.
    Unresolved { call: NodeId, error: ResolveError },
}

/// Lazy pre-order scan over one unit. Each call is attributed at most once,
/// when the walk reaches it.
pub struct CallSites<'a> {
    unit: &'a CompilationUnit,
    resolver: &'a dyn Resolver,
    config: &'a TemplatesConfig,
    walk: Preorder<'a>,
}

impl<'a> CallSites<'a> {
    pub fn new(
        unit: &'a CompilationUnit,
        resolver: &'a dyn Resolver,
        config: &'a TemplatesConfig,
    ) -> Self {
        Self {
            unit,
            resolver,
            config,
            walk: unit.preorder(),
        }
    }

    fn classify(&self, call: NodeId) -> Option<MatchEvent> {
        let NodeKind::MethodCall { name, args, .. } = self.unit.kind(call) else {
            return None;
        };
        if !self.config.is_template_method(name) || args.len() != 3 {
            return None;
        }

        let resolution = match self.resolver.resolve_all(self.unit, &[call]) {
            Ok(resolution) => resolution,
            Err(error) => return Some(MatchEvent::Unresolved { call, error }),
        };

        let returns_builder = resolution.ty(call).is_some_and(|ty| {
            is_of_class_type(self.resolver.types(), ty, &self.config.builder_type)
        });
        if !returns_builder {
            return None;
        }

        let (lambda, cast) = lambda_argument(self.unit, args[2])?;
        tracing::trace!(target: "nova.templates", ?call, name = %name, "template call site");
        Some(MatchEvent::Candidate(CallSite {
            call,
            name: name.clone(),
            template_name: args[1],
            lambda,
            cast,
            resolution,
        }))
    }
}

impl Iterator for CallSites<'_> {
    type Item = MatchEvent;

    fn next(&mut self) -> Option<MatchEvent> {
        loop {
            let node = self.walk.next()?;
            if let Some(event) = self.classify(node) {
                return Some(event);
            }
        }
    }
}

/// `(lambda, cast)` when `arg` is a lambda or a cast of one.
fn lambda_argument(unit: &CompilationUnit, arg: NodeId) -> Option<(NodeId, Option<NodeId>)> {
    match unit.kind(arg) {
        NodeKind::Lambda { .. } => Some((arg, None)),
        NodeKind::TypeCast { expr, .. } => match unit.kind(*expr) {
            NodeKind::Lambda { .. } => Some((*expr, Some(arg))),
            _ => None,
        },
        _ => None,
    }
}
