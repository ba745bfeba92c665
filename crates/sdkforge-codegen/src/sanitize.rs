//! Identifier and doc-text sanitization for emitted source.
//!
//! Document names have already passed the identifier rule, but emission
//! still guards against collisions with Rust keywords and cleans free text
//! before it lands in doc comments.

/// Rust keywords that cannot appear as bare identifiers.
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

/// Keywords that cannot be raw identifiers either; these get a trailing
/// underscore instead of an `r#` prefix.
const NO_RAW: &[&str] = &["self", "Self", "super", "crate"];

/// Sanitizes an arbitrary string into a valid identifier: invalid characters
/// become underscores, a digit prefix is guarded, empty input becomes
/// `_unnamed`. Keyword escaping is separate -- apply [`escape_keyword`] at
/// the emission site, after any case conversion.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push_str("_unnamed");
    }
    out
}

/// Escapes Rust keywords with `r#`, or a trailing underscore for the few
/// that cannot be raw.
pub fn escape_keyword(name: &str) -> String {
    if NO_RAW.contains(&name) {
        format!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Converts a name to snake_case for module and function names.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            out.push(c);
        }
    }
    out
}

/// Converts a name to PascalCase for type names.
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Cleans free text for doc comments: control characters stripped, newlines
/// collapsed to spaces.
pub fn clean_doc(doc: &str) -> String {
    doc.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
