#![no_main]

mod utils;

use libfuzzer_sys::fuzz_target;
use nova_core::TextSize;
use nova_templates::rewrite::{substitute_references, Substitution};
use nova_templates::{escape_template, unescape_template};

use utils::truncate_utf8;

const NAMES: [&str; 3] = ["x", "xy", "value"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Some(text) = truncate_utf8(rest) else {
        return;
    };

    let escaped = escape_template(text);
    assert!(!escaped.contains('\n') && !escaped.contains('\r'));
    assert_eq!(unescape_template(&escaped), text);

    // Offsets come from the input so that misaligned, overlapping and
    // out-of-range references all get exercised; they must fail cleanly.
    let base = u32::from(selector % 8);
    let subs: Vec<Substitution<'_>> = rest
        .iter()
        .take(8)
        .enumerate()
        .map(|(i, &b)| Substitution {
            offset: TextSize::from(u32::from(b) % (text.len() as u32 + 16)),
            name: NAMES[i % NAMES.len()],
            type_name: "int",
        })
        .collect();
    if let Ok(out) = substitute_references(text, TextSize::from(base), &subs) {
        assert!(out.len() >= text.len());
    }
});
