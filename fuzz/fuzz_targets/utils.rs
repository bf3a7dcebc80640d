use std::str;

/// Template bodies are single expressions or statements; anything larger only
/// slows the fuzzer down.
pub const MAX_INPUT_SIZE: usize = 16 * 1024;

/// UTF-8 view of at most `MAX_INPUT_SIZE` bytes of `data`.
///
/// When the cap lands inside a multibyte character the cut is moved back to
/// the preceding character boundary. Inputs that are not UTF-8 are skipped.
pub fn truncate_utf8(data: &[u8]) -> Option<&str> {
    let capped = &data[..data.len().min(MAX_INPUT_SIZE)];
    match str::from_utf8(capped) {
        Ok(text) => Some(text),
        Err(err) if err.error_len().is_none() => str::from_utf8(&capped[..err.valid_up_to()]).ok(),
        Err(_) => None,
    }
}
