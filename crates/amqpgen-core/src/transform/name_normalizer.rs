use heck::ToShoutySnakeCase;

use crate::ir::NormalizedName;

/// Rust strict and reserved keywords. A field identifier equal to one of
/// these is prefixed with `_`.
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Create a `NormalizedName` from a spec identifier, computing all target forms.
pub fn normalize_name(name: &str) -> NormalizedName {
    NormalizedName {
        original: name.to_string(),
        snake_case: field_identifier(name),
        pascal_case: type_identifier(name),
        screaming_snake: name.to_shouty_snake_case(),
    }
}

/// `frame-max` -> `frame_max`; keywords gain a leading underscore (`type` -> `_type`).
pub fn field_identifier(name: &str) -> String {
    let ident = name.replace('-', "_");
    if is_reserved(&ident) {
        format!("_{ident}")
    } else {
        ident
    }
}

/// `start-ok` -> `StartOk`: every hyphen segment capitalized, hyphens dropped.
///
/// Only the first character of each segment changes case, so `get-empty` and
/// `getEmpty` stay distinguishable.
pub fn type_identifier(name: &str) -> String {
    name.split('-').map(capitalize).collect()
}

pub fn is_reserved(ident: &str) -> bool {
    RESERVED.contains(&ident)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
