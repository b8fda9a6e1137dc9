//! Naming utilities for code generation

use heck::{ToPascalCase, ToSnakeCase};

/// Derive a type identifier from a table name.
///
/// `prefix` is removed once when the name starts with it (an empty prefix
/// never strips). The rest is split on `_`; each non-empty segment gets its
/// first character uppercased, the remainder is kept as is, and segments
/// are joined without a separator. Empty segments from leading, trailing or
/// doubled underscores contribute nothing.
///
/// This is a single-pass transform: applying it to its own output is a
/// no-op only because no underscores are left.
///
/// ```
/// use modelgen::codegen::normalize;
///
/// assert_eq!(normalize("t_user_profile", "t_"), "UserProfile");
/// assert_eq!(normalize("user", "nomatch_"), "User");
/// ```
pub fn normalize(table_name: &str, prefix: &str) -> String {
    let stripped = if prefix.is_empty() {
        table_name
    } else {
        table_name.strip_prefix(prefix).unwrap_or(table_name)
    };

    stripped.split('_').map(capitalize_first).collect()
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether a normalized identifier can name a Rust type.
///
/// Empty identifiers and ones starting with a digit are rejected. Callers
/// report these as warnings; normalization itself never fails.
pub fn is_valid_identifier(identifier: &str) -> bool {
    identifier
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && identifier.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Struct name for a table: PascalCase of the raw name.
///
/// `self` would give `Self` and gets a trailing `_`; a name with no
/// letters or digits becomes `Table`.
pub fn to_struct_name(table_name: &str) -> String {
    let name = table_name.to_pascal_case();
    if name.is_empty() {
        "Table".to_string()
    } else if is_rust_keyword(&name) {
        format!("{}_", name)
    } else {
        name
    }
}

pub fn to_field_name(column_name: &str) -> String {
    column_name.to_snake_case()
}

/// `Invoices` + `billing_state` -> `InvoicesBillingState`
pub fn to_enum_name(struct_name: &str, column_name: &str) -> String {
    format!(
        "{}{}",
        struct_name.to_pascal_case(),
        column_name.to_pascal_case()
    )
}

/// Variant for a stored ENUM value. Values with no letters or digits
/// become `Empty`; digit-leading ones get a `V` prefix.
pub fn to_enum_variant(value: &str) -> String {
    let variant = value.to_pascal_case();
    match variant.chars().next() {
        None => "Empty".to_string(),
        Some(c) if c.is_ascii_digit() => format!("V{}", variant),
        Some(_) => variant,
    }
}

/// Strict and reserved Rust keywords
pub fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "Self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "abstract"
            | "become"
            | "box"
            | "do"
            | "final"
            | "macro"
            | "override"
            | "priv"
            | "try"
            | "typeof"
            | "unsized"
            | "virtual"
            | "yield"
    )
}

/// snake_case field or module name that is a legal Rust identifier.
///
/// Keywords get `r#`; `self`, `Self`, `super` and `crate` cannot be raw
/// and get a trailing `_`; a leading digit gets a leading `_`.
pub fn escape_field_name(name: &str) -> String {
    let snake = to_field_name(name);
    if matches!(snake.as_str(), "self" | "Self" | "super" | "crate") {
        // Not allowed as raw identifiers
        format!("{}_", snake)
    } else if is_rust_keyword(&snake) {
        format!("r#{}", snake)
    } else if snake.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{}", snake)
    } else {
        snake
    }
}
