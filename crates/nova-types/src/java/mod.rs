//! Java class model.
//!
//! Only nominal class information is tracked. Subclass checks follow
//! superclass links exclusively; implemented interfaces are recorded for
//! completeness but never consulted by [`is_of_class_type`].

mod store;
mod ty;

pub use store::{ClassDef, ClassId, ClassKind, ClassOrigin, TypeStore, WellKnownTypes};
pub use ty::{PrimitiveType, Type};

/// Whether `ty` is the class named `fqn` or one of its subclasses.
///
/// The walk is reflexive and follows superclass links only. A type that
/// merely implements an interface named `fqn` does not match.
pub fn is_of_class_type(store: &TypeStore, ty: &Type, fqn: &str) -> bool {
    match ty {
        Type::Class { class, .. } => store.is_subclass_of(*class, fqn),
        _ => false,
    }
}
