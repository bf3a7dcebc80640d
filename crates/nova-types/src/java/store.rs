use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn from_raw(raw: u32) -> Self {
        ClassId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

/// Where the class file backing a class symbol was loaded from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassOrigin {
    /// Platform classes (`jrt:` image or `ct.sym`).
    Jdk,
    /// A class file inside a jar on the compile classpath.
    Jar(PathBuf),
    /// Declared in a source file of the current compilation.
    Source,
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary ("flat") name, e.g. `java.util.Map$Entry` or `foo.Recipes$1`.
    pub binary_name: String,
    pub kind: ClassKind,
    pub superclass: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    /// Directly enclosing class for nested, inner, local and anonymous classes.
    pub outer: Option<ClassId>,
    pub origin: ClassOrigin,
}

impl ClassDef {
    pub fn new(binary_name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            binary_name: binary_name.into(),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            outer: None,
            origin: ClassOrigin::Unknown,
        }
    }

    pub fn class(binary_name: impl Into<String>) -> Self {
        Self::new(binary_name, ClassKind::Class)
    }

    pub fn with_superclass(mut self, superclass: ClassId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn with_interfaces(mut self, interfaces: impl IntoIterator<Item = ClassId>) -> Self {
        self.interfaces.extend(interfaces);
        self
    }

    pub fn nested_in(mut self, outer: ClassId) -> Self {
        self.outer = Some(outer);
        self
    }

    pub fn with_origin(mut self, origin: ClassOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Package portion of the binary name; empty for the unnamed package.
    pub fn package(&self) -> &str {
        match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[..idx],
            None => "",
        }
    }

    /// Canonical dotted name (`java.util.Map.Entry`).
    pub fn qualified_name(&self) -> String {
        self.binary_name.replace('$', ".")
    }

    /// Binary name without the package (`Map$Entry`).
    pub fn flat_simple_name(&self) -> &str {
        match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[idx + 1..],
            None => &self.binary_name,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
}

/// Arena of known classes, addressable by [`ClassId`] or by name.
#[derive(Clone, Debug, Default)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    by_binary_name: HashMap<String, ClassId>,
    by_qualified_name: HashMap<String, ClassId>,
    well_known: Option<WellKnownTypes>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with `java.lang.Object`, `String`, `Number` and the
    /// boxed primitive wrappers, all with [`ClassOrigin::Jdk`].
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::new();
        let object = store.add_class(
            ClassDef::class("java.lang.Object").with_origin(ClassOrigin::Jdk),
        );
        let string = store.add_class(
            ClassDef::class("java.lang.String")
                .with_superclass(object)
                .with_origin(ClassOrigin::Jdk),
        );
        let number = store.add_class(
            ClassDef::class("java.lang.Number")
                .with_superclass(object)
                .with_origin(ClassOrigin::Jdk),
        );
        for name in ["Byte", "Short", "Integer", "Long", "Float", "Double"] {
            store.add_class(
                ClassDef::class(format!("java.lang.{name}"))
                    .with_superclass(number)
                    .with_origin(ClassOrigin::Jdk),
            );
        }
        for name in ["Boolean", "Character", "Void"] {
            store.add_class(
                ClassDef::class(format!("java.lang.{name}"))
                    .with_superclass(object)
                    .with_origin(ClassOrigin::Jdk),
            );
        }
        store.well_known = Some(WellKnownTypes { object, string });
        store
    }

    /// Insert a class, replacing any existing definition with the same binary
    /// name. The existing id is kept in that case.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        if let Some(&id) = self.by_binary_name.get(&def.binary_name) {
            self.by_qualified_name.insert(def.qualified_name(), id);
            self.classes[id.idx()] = def;
            return id;
        }

        let id = ClassId::from_raw(self.classes.len() as u32);
        self.by_binary_name.insert(def.binary_name.clone(), id);
        self.by_qualified_name.insert(def.qualified_name(), id);
        self.classes.push(def);
        id
    }

    /// Convenience for tests and fixtures: a `Jar`-backed class.
    pub fn add_jar_class(
        &mut self,
        binary_name: &str,
        superclass: Option<ClassId>,
        jar: impl AsRef<Path>,
    ) -> ClassId {
        let mut def = ClassDef::class(binary_name).with_origin(ClassOrigin::Jar(jar.as_ref().into()));
        def.superclass = superclass.or_else(|| self.well_known.map(|wk| wk.object));
        self.add_class(def)
    }

    /// Look up a class by binary (`a.B$C`) or canonical (`a.B.C`) name.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_binary_name
            .get(name)
            .or_else(|| self.by_qualified_name.get(name))
            .copied()
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.idx())
    }

    pub fn well_known(&self) -> Option<WellKnownTypes> {
        self.well_known
    }

    /// Outermost class enclosing `id` (or `id` itself for top-level classes).
    pub fn outermost(&self, id: ClassId) -> ClassId {
        let mut current = id;
        for _ in 0..=self.classes.len() {
            match self.class(current).and_then(|def| def.outer) {
                Some(outer) if outer != current => current = outer,
                _ => break,
            }
        }
        current
    }

    /// Reflexive walk up the superclass chain looking for `fqn`.
    ///
    /// `fqn` is compared against the canonical dotted name. The walk is
    /// bounded by the number of known classes so a malformed cyclic hierarchy
    /// terminates.
    pub fn is_subclass_of(&self, id: ClassId, fqn: &str) -> bool {
        let mut current = Some(id);
        for _ in 0..=self.classes.len() {
            let Some(def) = current.and_then(|id| self.class(id)) else {
                return false;
            };
            if def.qualified_name() == fqn {
                return true;
            }
            current = def.superclass;
        }
        false
    }
}
