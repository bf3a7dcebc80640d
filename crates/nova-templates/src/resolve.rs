//! Seam to the type-attribution collaborator.
//!
//! A [`Resolver`] attributes any set of subtrees of a [`CompilationUnit`] and
//! returns the result keyed by original node identity. Symbols handed out by
//! one call are only comparable with symbols from the same call: every
//! [`Resolution`] is its own pass.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use nova_types::{ClassId, Type, TypeStore};
use thiserror::Error;

use crate::tree::{CompilationUnit, NodeId};

static NEXT_PASS: AtomicU32 = AtomicU32::new(0);

/// Handle to a declaration, valid within a single resolution pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    pass: u32,
    index: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    Class(ClassId),
    Field {
        owner: ClassId,
        name: String,
        is_static: bool,
    },
    Method {
        owner: ClassId,
        name: String,
        is_static: bool,
    },
    /// Local variables and lambda parameters.
    Local {
        name: String,
    },
    Package {
        name: String,
    },
}

impl Symbol {
    /// The class this symbol names, or for members the class declaring them.
    pub fn class(&self) -> Option<ClassId> {
        match self {
            Symbol::Class(id) => Some(*id),
            Symbol::Field { owner, .. } | Symbol::Method { owner, .. } => Some(*owner),
            Symbol::Local { .. } | Symbol::Package { .. } => None,
        }
    }
}

/// Attributes recorded for one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attr {
    pub ty: Option<Type>,
    pub symbol: Option<SymbolId>,
}

/// Output of one resolution pass.
#[derive(Clone, Debug)]
pub struct Resolution {
    pass: u32,
    attrs: HashMap<NodeId, Attr>,
    symbols: Vec<Symbol>,
}

impl Resolution {
    /// An empty resolution with a fresh pass id.
    pub fn new() -> Self {
        Self {
            pass: NEXT_PASS.fetch_add(1, Ordering::Relaxed),
            attrs: HashMap::new(),
            symbols: Vec::new(),
        }
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId {
            pass: self.pass,
            index: self.symbols.len() as u32,
        };
        self.symbols.push(symbol);
        id
    }

    pub fn set_attr(&mut self, node: NodeId, attr: Attr) {
        self.attrs.insert(node, attr);
    }

    /// Whether `node` was part of a subtree covered by this pass.
    pub fn contains(&self, node: NodeId) -> bool {
        self.attrs.contains_key(&node)
    }

    pub fn attr(&self, node: NodeId) -> Option<&Attr> {
        self.attrs.get(&node)
    }

    pub fn ty(&self, node: NodeId) -> Option<&Type> {
        self.attr(node)?.ty.as_ref()
    }

    pub fn symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.attr(node)?.symbol
    }

    /// Symbol data for a handle of this pass; handles from other passes are
    /// never found.
    pub fn symbol_data(&self, symbol: SymbolId) -> Option<&Symbol> {
        if symbol.pass != self.pass {
            return None;
        }
        self.symbols.get(symbol.index as usize)
    }

    /// Convenience for `symbol_data(symbol(node))`.
    pub fn symbol_of(&self, node: NodeId) -> Option<&Symbol> {
        self.symbol_data(self.symbol(node)?)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("failed to attribute {node:?}: {reason}")]
    Unresolvable { node: NodeId, reason: String },
    #[error("resolver failure: {0}")]
    Internal(String),
}

/// Type attribution for subtrees of a compilation unit.
pub trait Resolver {
    /// Attribute every node below (and including) each of `nodes` in a single
    /// pass, so declarations and their references share symbol handles.
    fn resolve_all(
        &self,
        unit: &CompilationUnit,
        nodes: &[NodeId],
    ) -> Result<Resolution, ResolveError>;

    /// Class model backing the types in every [`Resolution`].
    fn types(&self) -> &TypeStore;
}

/// Stable name for a declaration registered with a [`MemoryResolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolKey(u32);

/// A [`Resolver`] backed by attributes recorded up front.
///
/// Used by fixtures and by harnesses whose front end attributes the whole
/// unit eagerly. Each `resolve_all` call copies the recorded attributes of the
/// requested subtrees into a fresh pass.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    types: TypeStore,
    symbols: Vec<Symbol>,
    attrs: HashMap<NodeId, (Option<Type>, Option<SymbolKey>)>,
    failures: HashMap<NodeId, String>,
    passes: Cell<usize>,
}

impl MemoryResolver {
    pub fn new(types: TypeStore) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    pub fn types_mut(&mut self) -> &mut TypeStore {
        &mut self.types
    }

    pub fn declare(&mut self, symbol: Symbol) -> SymbolKey {
        let key = SymbolKey(self.symbols.len() as u32);
        self.symbols.push(symbol);
        key
    }

    pub fn set_type(&mut self, node: NodeId, ty: Type) {
        self.attrs.entry(node).or_default().0 = Some(ty);
    }

    pub fn set_symbol(&mut self, node: NodeId, symbol: SymbolKey) {
        self.attrs.entry(node).or_default().1 = Some(symbol);
    }

    /// Make every pass covering `node` fail.
    pub fn fail_on(&mut self, node: NodeId, reason: impl Into<String>) {
        self.failures.insert(node, reason.into());
    }

    /// Number of `resolve_all` calls made so far, failed ones included.
    pub fn passes(&self) -> usize {
        self.passes.get()
    }
}

impl Resolver for MemoryResolver {
    fn resolve_all(
        &self,
        unit: &CompilationUnit,
        nodes: &[NodeId],
    ) -> Result<Resolution, ResolveError> {
        self.passes.set(self.passes.get() + 1);

        let mut resolution = Resolution::new();
        let mut mapped: HashMap<SymbolKey, SymbolId> = HashMap::new();
        for &root in nodes {
            if unit.get(root).is_none() {
                return Err(ResolveError::Internal(format!(
                    "{root:?} is not part of {:?}",
                    unit.file()
                )));
            }
            for node in unit.descendants(root) {
                if let Some(reason) = self.failures.get(&node) {
                    return Err(ResolveError::Unresolvable {
                        node,
                        reason: reason.clone(),
                    });
                }
                let (ty, key) = self.attrs.get(&node).cloned().unwrap_or_default();
                let symbol = match key {
                    Some(key) => {
                        let data = self.symbols.get(key.0 as usize).ok_or_else(|| {
                            ResolveError::Internal(format!("undeclared symbol {key:?}"))
                        })?;
                        Some(
                            *mapped
                                .entry(key)
                                .or_insert_with(|| resolution.add_symbol(data.clone())),
                        )
                    }
                    None => None,
                };
                resolution.set_attr(node, Attr { ty, symbol });
            }
        }
        Ok(resolution)
    }

    fn types(&self) -> &TypeStore {
        &self.types
    }
}
