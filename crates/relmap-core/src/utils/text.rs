//! String utility functions.
//!
//! [`pluralize`] implements the naming convention used for default table
//! names: a model named `User` maps to the `users` table unless an explicit
//! name is registered.

/// Returns the English plural of a (lowercase) noun.
///
/// This intentionally covers only the regular inflections that identifier
/// names use; it is a naming convention, not a linguistics library.
///
/// # Examples
///
/// ```
/// use relmap_core::utils::text::pluralize;
///
/// assert_eq!(pluralize("user"), "users");
/// assert_eq!(pluralize("box"), "boxes");
/// assert_eq!(pluralize("category"), "categories");
/// ```
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    if let Some(stem) = s.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{stem}ies");
        }
    }
    if s.ends_with('s')
        || s.ends_with('x')
        || s.ends_with('z')
        || s.ends_with("ch")
        || s.ends_with("sh")
    {
        return format!("{s}es");
    }
    format!("{s}s")
}
