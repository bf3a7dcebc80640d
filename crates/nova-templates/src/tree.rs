//! Read-only syntax tree of one compilation unit.
//!
//! The tree is produced by the compiler front end; the generator only walks
//! it. Nodes live in an arena owned by [`CompilationUnit`] and are addressed
//! by [`NodeId`], which doubles as node identity for resolution results.

use std::fmt;
use std::sync::Arc;

use nova_core::{FileId, TextRange, TextSize};
use nova_types::ClassId;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    String(String),
    Char(char),
    Int(i64),
    Long(i64),
    Bool(bool),
    /// Floating point literals, kept as written.
    Number(String),
    Null,
}

impl Literal {
    /// Text of the constant value, or `None` for `null`.
    pub fn constant_text(&self) -> Option<String> {
        match self {
            Literal::String(value) => Some(value.clone()),
            Literal::Char(value) => Some(value.to_string()),
            Literal::Int(value) | Literal::Long(value) => Some(value.to_string()),
            Literal::Bool(value) => Some(value.to_string()),
            Literal::Number(value) => Some(value.clone()),
            Literal::Null => None,
        }
    }
}

/// Node shapes the generator distinguishes. Every `NodeId` stored in a kind
/// is also one of the node's children.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    CompilationUnit,
    /// A named class, interface, enum or record declaration. `class` is the
    /// symbol entered for it by the front end, available before attribution.
    ClassDecl {
        name: String,
        class: Option<ClassId>,
    },
    MethodDecl {
        name: String,
    },
    Block,
    MethodCall {
        name: String,
        receiver: Option<NodeId>,
        args: Vec<NodeId>,
    },
    /// `new T(args) { body }`. Anonymous class members are children of this
    /// node; there is no separate declaration node for the anonymous class.
    NewClass {
        class: NodeId,
        args: Vec<NodeId>,
        body: Option<Vec<NodeId>>,
    },
    Lambda {
        params: Vec<NodeId>,
        body: NodeId,
    },
    Param {
        name: String,
        ty: Option<NodeId>,
        annotations: Vec<NodeId>,
    },
    Annotation {
        ty: NodeId,
    },
    Ident {
        name: String,
    },
    FieldAccess {
        target: NodeId,
        name: String,
    },
    Literal(Literal),
    TypeCast {
        ty: NodeId,
        expr: NodeId,
    },
    /// Any other statement or expression; the label is informational.
    Other(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// One parsed source file: its tree and the exact bytes backing it.
#[derive(Clone, Debug)]
pub struct CompilationUnit {
    file: FileId,
    package: Option<String>,
    source: Arc<[u8]>,
    nodes: Vec<Node>,
    root: NodeId,
}

impl CompilationUnit {
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Declared package, `None` for the unnamed package.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn source_bytes(&self) -> &[u8] {
        &self.source
    }

    /// Bytes covered by `range`, or `None` if it exceeds the buffer.
    pub fn source_slice(&self, range: TextRange) -> Option<&[u8]> {
        let start = u32::from(range.start()) as usize;
        let end = u32::from(range.end()) as usize;
        self.source.get(start..end)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this unit.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Every node of the unit in pre-order (parents before children,
    /// children in source order).
    pub fn preorder(&self) -> Preorder<'_> {
        self.descendants(self.root)
    }

    /// `id` and everything below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Preorder<'_> {
        Preorder {
            unit: self,
            stack: vec![id],
        }
    }

    /// Path from the root down to `id`, both inclusive.
    pub fn ancestor_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

/// Lazy pre-order walk over a subtree.
pub struct Preorder<'a> {
    unit: &'a CompilationUnit,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.unit.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Bottom-up construction of a [`CompilationUnit`].
///
/// Children must be built before their parent; attaching a node to a parent
/// records the parent link used by [`CompilationUnit::ancestor_path`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: NodeKind, range: TextRange, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in &children {
            let node = &mut self.nodes[child.idx()];
            debug_assert!(node.parent.is_none(), "{child:?} attached twice");
            node.parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            range,
            parent: None,
            children,
        });
        id
    }

    pub fn ident(&mut self, name: impl Into<String>, range: TextRange) -> NodeId {
        self.alloc(NodeKind::Ident { name: name.into() }, range, Vec::new())
    }

    pub fn literal(&mut self, literal: Literal, range: TextRange) -> NodeId {
        self.alloc(NodeKind::Literal(literal), range, Vec::new())
    }

    pub fn field_access(
        &mut self,
        target: NodeId,
        name: impl Into<String>,
        range: TextRange,
    ) -> NodeId {
        self.alloc(
            NodeKind::FieldAccess {
                target,
                name: name.into(),
            },
            range,
            vec![target],
        )
    }

    pub fn method_call(
        &mut self,
        name: impl Into<String>,
        receiver: Option<NodeId>,
        args: Vec<NodeId>,
        range: TextRange,
    ) -> NodeId {
        let children = receiver.into_iter().chain(args.iter().copied()).collect();
        self.alloc(
            NodeKind::MethodCall {
                name: name.into(),
                receiver,
                args,
            },
            range,
            children,
        )
    }

    pub fn annotation(&mut self, ty: NodeId, range: TextRange) -> NodeId {
        self.alloc(NodeKind::Annotation { ty }, range, vec![ty])
    }

    pub fn param(
        &mut self,
        name: impl Into<String>,
        ty: Option<NodeId>,
        annotations: Vec<NodeId>,
        range: TextRange,
    ) -> NodeId {
        let children = annotations.iter().copied().chain(ty).collect();
        self.alloc(
            NodeKind::Param {
                name: name.into(),
                ty,
                annotations,
            },
            range,
            children,
        )
    }

    pub fn lambda(&mut self, params: Vec<NodeId>, body: NodeId, range: TextRange) -> NodeId {
        let children = params.iter().copied().chain([body]).collect();
        self.alloc(NodeKind::Lambda { params, body }, range, children)
    }

    pub fn type_cast(&mut self, ty: NodeId, expr: NodeId, range: TextRange) -> NodeId {
        self.alloc(NodeKind::TypeCast { ty, expr }, range, vec![ty, expr])
    }

    pub fn new_class(
        &mut self,
        class: NodeId,
        args: Vec<NodeId>,
        body: Option<Vec<NodeId>>,
        range: TextRange,
    ) -> NodeId {
        let children = [class]
            .into_iter()
            .chain(args.iter().copied())
            .chain(body.iter().flatten().copied())
            .collect();
        self.alloc(NodeKind::NewClass { class, args, body }, range, children)
    }

    pub fn class_decl(
        &mut self,
        name: impl Into<String>,
        class: Option<ClassId>,
        members: Vec<NodeId>,
        range: TextRange,
    ) -> NodeId {
        self.alloc(
            NodeKind::ClassDecl {
                name: name.into(),
                class,
            },
            range,
            members,
        )
    }

    pub fn method_decl(
        &mut self,
        name: impl Into<String>,
        children: Vec<NodeId>,
        range: TextRange,
    ) -> NodeId {
        self.alloc(NodeKind::MethodDecl { name: name.into() }, range, children)
    }

    pub fn block(&mut self, statements: Vec<NodeId>, range: TextRange) -> NodeId {
        self.alloc(NodeKind::Block, range, statements)
    }

    pub fn other(&mut self, label: &'static str, children: Vec<NodeId>, range: TextRange) -> NodeId {
        self.alloc(NodeKind::Other(label), range, children)
    }

    /// Wrap `members` in the root node, which spans the whole source.
    pub fn finish(
        mut self,
        file: FileId,
        package: Option<String>,
        source: impl Into<Arc<[u8]>>,
        members: Vec<NodeId>,
    ) -> CompilationUnit {
        let source = source.into();
        let range = TextRange::new(TextSize::from(0), TextSize::from(source.len() as u32));
        let root = self.alloc(NodeKind::CompilationUnit, range, members);
        CompilationUnit {
            file,
            package,
            source,
            nodes: self.nodes,
            root,
        }
    }
}
