//! Naming utilities for table lookups and generated identifiers.
//!
//! # Supported Conversions
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `Vec<i64>` | [`normalize_type_name`] | `[]i64` |
//! | `PascalCase` | [`to_snake_case`] | `pascal_case` |
//! | `[]UserId` | [`ident_fragment`] | `vec_user_id` |
//! | `word` | [`capitalize`] | `Word` |

use crate::ty::Ty;

/// Canonical name of a type for well-known conversion lookups.
///
/// Basic types use their primitive name, `Vec<T>` becomes `"[]"` followed by
/// the element name, and named types use their declared name. Any other type
/// has no canonical name.
///
/// # Examples
///
/// ```
/// use convgen_core::naming::normalize_type_name;
/// use convgen_core::ty::Ty;
///
/// let ty = Ty::parse("Vec<Vec<String>>").unwrap();
/// assert_eq!(normalize_type_name(&ty).as_deref(), Some("[][]String"));
/// ```
pub fn normalize_type_name(ty: &Ty) -> Option<String> {
    match ty {
        Ty::Basic(basic) => Some(basic.name().to_string()),
        Ty::Seq(inner) => normalize_type_name(inner).map(|name| format!("[]{name}")),
        Ty::Named { ident, .. } => Some(ident.clone()),
        _ => None,
    }
}

/// Convert a normalized type name to a snake_case identifier fragment.
///
/// # Examples
///
/// ```
/// use convgen_core::naming::ident_fragment;
///
/// assert_eq!(ident_fragment("String"), "string");
/// assert_eq!(ident_fragment("[]UserId"), "vec_user_id");
/// ```
pub fn ident_fragment(normalized: &str) -> String {
    match normalized.strip_prefix("[]") {
        Some(rest) => format!("vec_{}", ident_fragment(rest)),
        None => to_snake_case(normalized),
    }
}

/// Convert PascalCase or camelCase to snake_case.
///
/// Runs of capitals are kept together as one word (`HTTPServer` becomes
/// `http_server`).
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Capitalize the first letter of a string.
///
/// # Examples
///
/// ```
/// use convgen_core::naming::capitalize;
///
/// assert_eq!(capitalize("hello"), "Hello");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
