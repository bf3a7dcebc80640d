use std::fmt;

use super::{ClassId, TypeStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Canonical name of the `java.lang` wrapper class.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }
}

/// A resolved Java type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Class { class: ClassId, args: Vec<Type> },
    Array(Box<Type>),
    TypeVar(String),
    Null,
    /// Attribution failed or was not attempted.
    Unknown,
}

impl Type {
    pub fn class(class: ClassId, args: Vec<Type>) -> Self {
        Type::Class { class, args }
    }

    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            Type::Class { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Render the type the way `javac` prints it: canonical class names and
    /// type arguments separated by a bare comma (`java.util.Map<K,V>`).
    pub fn display<'a>(&'a self, store: &'a TypeStore) -> impl fmt::Display + 'a {
        DisplayType { ty: self, store }
    }
}

struct DisplayType<'a> {
    ty: &'a Type,
    store: &'a TypeStore,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Void => f.write_str("void"),
            Type::Primitive(prim) => f.write_str(prim.name()),
            Type::Class { class, args } => {
                match self.store.class(*class) {
                    Some(def) => f.write_str(&def.qualified_name())?,
                    None => write!(f, "<unknown class {}>", class.idx())?,
                }
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{}", arg.display(self.store))?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Array(elem) => write!(f, "{}[]", elem.display(self.store)),
            Type::TypeVar(name) => f.write_str(name),
            Type::Null => f.write_str("<nulltype>"),
            Type::Unknown => f.write_str("<any>"),
        }
    }
}
