//! Template text: placeholder substitution and string-literal escaping.

use nova_core::{apply_text_edits, EditError, TextEdit, TextRange, TextSize};
use nova_types::TypeStore;
use thiserror::Error;

use crate::params::{Parameter, TemplateLambda};
use crate::primitives::PrimitiveTable;
use crate::tree::CompilationUnit;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("template body {range:?} lies outside the source buffer")]
    BodyOutOfBounds { range: TextRange },
    #[error("template body is not valid UTF-8")]
    InvalidUtf8,
    #[error("reference to `{name}` at {offset:?} lies outside the template body")]
    OutsideBody { name: String, offset: TextSize },
    #[error("reference at {offset:?} reads `{found}`, expected `{name}`")]
    NameMismatch {
        name: String,
        offset: TextSize,
        found: String,
    },
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// One parameter occurrence to replace, in source coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Substitution<'a> {
    pub offset: TextSize,
    pub name: &'a str,
    pub type_name: &'a str,
}

/// `#{any(<type>)}`
pub fn placeholder(type_name: &str) -> String {
    format!("#{{any({type_name})}}")
}

/// Type name used in the placeholders for `param`.
///
/// A parameter carrying the primitive marker gets the primitive for its boxed
/// type; when the declared type has no primitive counterpart it is kept.
pub fn placeholder_type(param: &Parameter, store: &TypeStore, table: &PrimitiveTable) -> String {
    let declared = param.ty.display(store).to_string();
    if !param.prefer_primitive {
        return declared;
    }
    match table.primitive_for(&declared) {
        Some(primitive) => primitive.to_owned(),
        None => {
            tracing::debug!(
                target: "nova.templates",
                param = %param.name,
                ty = %declared,
                "primitive marker on a type without a primitive counterpart"
            );
            declared
        }
    }
}

/// Replace each occurrence in `subs` within `text`, which starts at source
/// offset `base`.
///
/// Every occurrence must lie inside `text` and read exactly its parameter
/// name. Replacements are applied from the highest offset down, so earlier
/// offsets stay valid while the text changes length.
pub fn substitute_references(
    text: &str,
    base: TextSize,
    subs: &[Substitution<'_>],
) -> Result<String, RewriteError> {
    let mut edits = Vec::with_capacity(subs.len());
    for sub in subs {
        let outside = || RewriteError::OutsideBody {
            name: sub.name.to_owned(),
            offset: sub.offset,
        };
        let relative = sub.offset.checked_sub(base).ok_or_else(outside)?;
        let range = TextRange::at(relative, TextSize::of(sub.name));
        let start = u32::from(range.start()) as usize;
        let end = u32::from(range.end()) as usize;
        if end > text.len() {
            return Err(outside());
        }
        // `get` is `None` when the range splits a character.
        let found = text.get(start..end).unwrap_or_default();
        if found != sub.name {
            return Err(RewriteError::NameMismatch {
                name: sub.name.to_owned(),
                offset: sub.offset,
                found: String::from_utf8_lossy(&text.as_bytes()[start..end]).into_owned(),
            });
        }
        edits.push(TextEdit::new(range, placeholder(sub.type_name)));
    }
    Ok(apply_text_edits(text, &edits)?)
}

/// Body text of `lambda` with every parameter reference replaced by its
/// placeholder, escaped for use inside a string literal.
pub fn rewrite_template(
    unit: &CompilationUnit,
    lambda: &TemplateLambda,
    store: &TypeStore,
    table: &PrimitiveTable,
) -> Result<String, RewriteError> {
    let range = lambda.body_range;
    let bytes = unit
        .source_slice(range)
        .ok_or(RewriteError::BodyOutOfBounds { range })?;
    let text = std::str::from_utf8(bytes).map_err(|_| RewriteError::InvalidUtf8)?;

    let type_names: Vec<String> = lambda
        .params
        .iter()
        .map(|param| placeholder_type(param, store, table))
        .collect();
    let subs: Vec<Substitution<'_>> = lambda
        .references
        .iter()
        .map(|(&offset, &idx)| Substitution {
            offset,
            name: &lambda.params[idx].name,
            type_name: &type_names[idx],
        })
        .collect();

    let substituted = substitute_references(text, range.start(), &subs)?;
    Ok(escape_template(&substituted))
}

/// Escape `text` for the inside of a Java string literal.
pub fn escape_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_template`]. Unknown escapes are kept verbatim.
pub fn unescape_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
