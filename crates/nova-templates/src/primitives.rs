use std::collections::HashMap;

use nova_types::PrimitiveType;

/// Boxed wrapper name to primitive name, for parameters that ask for a
/// primitive placeholder type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimitiveTable {
    by_boxed: HashMap<&'static str, &'static str>,
}

impl PrimitiveTable {
    /// The eight `java.lang` wrappers plus `java.lang.Void`.
    pub fn java() -> Self {
        let by_boxed = PrimitiveType::ALL
            .iter()
            .map(|prim| (prim.boxed_name(), prim.name()))
            .chain([("java.lang.Void", "void")])
            .collect();
        Self { by_boxed }
    }

    pub fn primitive_for(&self, boxed: &str) -> Option<&'static str> {
        self.by_boxed.get(boxed).copied()
    }

    pub fn len(&self) -> usize {
        self.by_boxed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_boxed.is_empty()
    }
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        Self::java()
    }
}
