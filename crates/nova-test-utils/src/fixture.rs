use nova_core::{FileId, TextRange, TextSize};
use nova_templates::{
    CompilationUnit, Literal, MemoryResolver, NodeId, Symbol, SymbolKey, TreeBuilder,
};
use nova_types::{ClassDef, ClassId, ClassOrigin, Type, TypeStore};

const BUILDER: &str = "org.openrewrite.java.JavaTemplate.Builder";
const SEMANTICS: &str = "org.openrewrite.java.template.Semantics";

/// Java text plus the tree and attributes being built over it.
///
/// Every helper panics when the text it looks for is missing; fixtures are
/// expected to be written together with the test using them.
pub struct Fixture {
    text: String,
    tree: TreeBuilder,
    resolver: MemoryResolver,
}

impl Fixture {
    pub fn new(text: impl Into<String>, types: TypeStore) -> Self {
        Self {
            text: text.into(),
            tree: TreeBuilder::new(),
            resolver: MemoryResolver::new(types),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&mut self) -> &mut TreeBuilder {
        &mut self.tree
    }

    pub fn resolver(&mut self) -> &mut MemoryResolver {
        &mut self.resolver
    }

    /// Range of the only occurrence of `needle`.
    pub fn find(&self, needle: &str) -> TextRange {
        let mut matches = self.text.match_indices(needle);
        let (start, _) = matches
            .next()
            .unwrap_or_else(|| panic!("`{needle}` not found in fixture"));
        assert!(
            matches.next().is_none(),
            "`{needle}` is ambiguous in fixture; use find_nth or find_in"
        );
        range_at(start, needle)
    }

    /// Range of the `nth` (zero-based) occurrence of `needle`.
    pub fn find_nth(&self, needle: &str, nth: usize) -> TextRange {
        let (start, _) = self
            .text
            .match_indices(needle)
            .nth(nth)
            .unwrap_or_else(|| panic!("occurrence {nth} of `{needle}` not found in fixture"));
        range_at(start, needle)
    }

    /// Range of the first occurrence of `needle` inside `within`.
    pub fn find_in(&self, within: TextRange, needle: &str) -> TextRange {
        let offset = u32::from(within.start()) as usize;
        let start = self.text[within]
            .find(needle)
            .unwrap_or_else(|| panic!("`{needle}` not found in {:?}", &self.text[within]));
        range_at(offset + start, needle)
    }

    /// Range of the first whole-identifier occurrence of `name` inside
    /// `within`.
    pub fn find_ident_in(&self, within: TextRange, name: &str) -> TextRange {
        let offset = u32::from(within.start()) as usize;
        let haystack = &self.text[within];
        let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
        let (start, _) = haystack
            .match_indices(name)
            .find(|&(start, _)| {
                let before = haystack[..start].chars().next_back();
                let after = haystack[start + name.len()..].chars().next();
                !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
            })
            .unwrap_or_else(|| panic!("identifier `{name}` not found in {haystack:?}"));
        range_at(offset + start, name)
    }

    /// Range from the only occurrence of `head` through the brace closing the
    /// first block that follows it.
    pub fn braced(&self, head: &str) -> TextRange {
        let start = self.find(head).start();
        TextRange::new(start, self.matching_brace(start))
    }

    pub fn class(&self, name: &str) -> ClassId {
        self.resolver_types()
            .class_id(name)
            .unwrap_or_else(|| panic!("unknown class `{name}`"))
    }

    pub fn class_type(&self, name: &str) -> Type {
        Type::class(self.class(name), vec![])
    }

    fn resolver_types(&self) -> &TypeStore {
        nova_templates::Resolver::types(&self.resolver)
    }

    /// Add a source class `binary_name` extending `superclass` to the class
    /// model.
    pub fn declare_class(&mut self, binary_name: &str, superclass: &str) -> ClassId {
        let superclass = self.class(superclass);
        self.resolver.types_mut().add_class(
            ClassDef::class(binary_name)
                .with_superclass(superclass)
                .with_origin(ClassOrigin::Source),
        )
    }

    /// Declaration of `class <name>`, spanning up to its matching closing
    /// brace.
    pub fn class_decl(&mut self, name: &str, class: Option<ClassId>, members: Vec<NodeId>) -> NodeId {
        let range = self.braced(&format!("class {name}"));
        self.tree.class_decl(name, class, members, range)
    }

    fn matching_brace(&self, from: TextSize) -> TextSize {
        let mut depth = 0usize;
        for (idx, byte) in self.text.bytes().enumerate().skip(u32::from(from) as usize) {
            match byte {
                b'{' => depth += 1,
                b'}' if depth == 1 => return TextSize::from(idx as u32 + 1),
                b'}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        panic!("unbalanced braces after {from:?}");
    }

    /// Identifier whose name is the text at `range`, without attributes.
    pub fn ident(&mut self, range: TextRange) -> NodeId {
        let name = self.text[range].to_owned();
        self.tree.ident(name, range)
    }

    /// Simple-name reference to the class `name`.
    pub fn class_ref(&mut self, range: TextRange, name: &str) -> NodeId {
        let class = self.class(name);
        let node = self.ident(range);
        let key = self.resolver.declare(Symbol::Class(class));
        self.resolver.set_symbol(node, key);
        self.resolver.set_type(node, Type::class(class, vec![]));
        node
    }

    /// Receiver-less call `name(args)` spanning `range` of a static method
    /// declared by `owner`. The method symbol sits on the call node.
    pub fn static_call(&mut self, range: TextRange, owner: &str, args: Vec<NodeId>) -> NodeId {
        let owner = self.class(owner);
        let text = &self.text[range];
        let name = text[..text.find('(').expect("argument list")].to_owned();
        let node = self.tree.method_call(name.clone(), None, args, range);
        let key = self.resolver.declare(Symbol::Method {
            owner,
            name,
            is_static: true,
        });
        self.resolver.set_symbol(node, key);
        node
    }

    /// String literal at `range`, quotes included in the range.
    pub fn string_literal(&mut self, range: TextRange) -> NodeId {
        let value = self.text[range].trim_matches('"').to_owned();
        self.tree.literal(Literal::String(value), range)
    }

    pub fn null_literal(&mut self, range: TextRange) -> NodeId {
        self.tree.literal(Literal::Null, range)
    }

    /// Lambda parameter declared by the text at `range`, such as `Path p` or
    /// `@Primitive Integer i`, with declared type `class`.
    ///
    /// `annotation` is the canonical name of the single annotation present in
    /// the text, if any. Returns the parameter and its declaration symbol.
    pub fn param(
        &mut self,
        range: TextRange,
        class: &str,
        annotation: Option<&str>,
    ) -> (NodeId, SymbolKey) {
        let decl = self.text[range].to_owned();
        let mut tokens: Vec<&str> = decl.split_whitespace().collect();
        let name = tokens.pop().expect("parameter name").to_owned();
        let ty_text = tokens.pop().expect("parameter type").to_owned();

        let annotations = match annotation {
            Some(fqn) => {
                let at = self.find_in(range, "@");
                let simple = tokens
                    .first()
                    .map(|t| t.trim_start_matches('@').to_owned())
                    .expect("annotation in parameter text");
                let ty_range = self.find_in(range, &simple);
                let ty = self.class_ref(ty_range, fqn);
                let node = self.tree.annotation(ty, TextRange::new(at.start(), ty_range.end()));
                let annotation_ty = self.class_type(fqn);
                self.resolver.set_type(node, annotation_ty);
                vec![node]
            }
            None => Vec::new(),
        };

        let ty_range = self.find_in(range, &ty_text);
        let ty = self.class_ref(ty_range, class);
        let node = self.tree.param(name.clone(), Some(ty), annotations, range);
        let key = self.resolver.declare(Symbol::Local { name });
        let declared = self.class_type(class);
        self.resolver.set_symbol(node, key);
        self.resolver.set_type(node, declared);
        (node, key)
    }

    /// Reference to a local or parameter declared as `symbol`.
    pub fn local_ref(&mut self, range: TextRange, symbol: SymbolKey, ty: Type) -> NodeId {
        let node = self.ident(range);
        self.resolver.set_symbol(node, symbol);
        self.resolver.set_type(node, ty);
        node
    }

    /// `Semantics.<method>(this, <name>, <template>)` spanning `range`, typed
    /// as the template builder. The name argument is the string or `null`
    /// literal following `this,`.
    pub fn template_call(&mut self, range: TextRange, template: NodeId) -> NodeId {
        let text = self.text[range].to_owned();
        let base = u32::from(range.start()) as usize;

        let dot = text.find('.').expect("`Semantics.` receiver");
        let paren = text.find('(').expect("argument list");
        let method = text[dot + 1..paren].to_owned();
        let receiver = self.class_ref(range_at(base, &text[..dot]), SEMANTICS);

        let this_range = self.find_in(range, "this");
        let this = self.ident(this_range);
        let object = self.class_type("java.lang.Object");
        self.resolver.set_type(this, object);

        let after_this = u32::from(this_range.end()) as usize - base;
        let rest = &text[after_this..];
        let name_start = after_this + rest.find(|c: char| c == '"' || c == 'n').expect("name");
        let name = if text[name_start..].starts_with('"') {
            let len = text[name_start + 1..].find('"').expect("closing quote") + 2;
            self.string_literal(range_at(base + name_start, &text[name_start..name_start + len]))
        } else {
            self.null_literal(range_at(base + name_start, "null"))
        };

        let call = self
            .tree
            .method_call(method, Some(receiver), vec![this, name, template], range);
        let builder = self.class_type(BUILDER);
        self.resolver.set_type(call, builder);
        call
    }

    pub fn finish(self, package: Option<&str>, members: Vec<NodeId>) -> (CompilationUnit, MemoryResolver) {
        let unit = self.tree.finish(
            FileId::from_raw(0),
            package.map(str::to_owned),
            self.text.into_bytes(),
            members,
        );
        (unit, self.resolver)
    }
}

fn range_at(start: usize, text: &str) -> TextRange {
    TextRange::at(TextSize::from(start as u32), TextSize::of(text))
}
