//! Version-segment reconciliation.
//!
//! API packages carry a release-stage token (`v1`, `v1alpha`, `v2beta1`,
//! `v1p1beta1`, ...) that also tends to show up in namespaces, file paths and
//! fully-qualified names. Bumping that token is expected when an API moves
//! between release stages, so comparisons of such strings go through the
//! helpers below.
//!
//! A version token is a whole alphanumeric run; anything else (`.`, `\`,
//! `::`, `/`, `;`, `_`) separates tokens.

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^v\d+(p\d+)?((alpha|beta)\d*)?$").unwrap());

/// Returns true when `token` is a release-stage token such as `v1` or `V2beta1`.
pub fn is_version_token(token: &str) -> bool {
    VERSION_TOKEN.is_match(token)
}

/// Splits `s` into alternating alphanumeric runs and separator runs.
fn segments(s: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;
    for (index, ch) in s.char_indices() {
        let alnum = ch.is_ascii_alphanumeric();
        if current.is_some_and(|kind| kind != alnum) {
            segments.push(&s[start..index]);
            start = index;
        }
        current = Some(alnum);
    }
    if start < s.len() {
        segments.push(&s[start..]);
    }
    segments
}

/// Removes every version token from `s`, keeping separators in place.
pub fn strip_version(s: &str) -> String {
    segments(s)
        .into_iter()
        .filter(|segment| !is_version_token(segment))
        .collect()
}

/// True when `a` and `b` only differ in their version tokens.
pub fn equal_ignoring_version(a: &str, b: &str) -> bool {
    a == b || strip_version(a) == strip_version(b)
}

/// True when `a` and `b` are equal except for the capitalization of their
/// version tokens (`Example.V1Alpha` and `Example.V1alpha`).
pub fn equal_ignoring_version_case(a: &str, b: &str) -> bool {
    let (a, b) = (segments(a), segments(b));
    a.len() == b.len()
        && a.iter()
            .zip(&b)
            .all(|(x, y)| x == y || (is_version_token(x) && x.eq_ignore_ascii_case(y)))
}

/// The last version component of a dotted package name, if any.
pub fn package_version(package: &str) -> Option<&str> {
    package
        .trim_start_matches('.')
        .split('.')
        .filter(|component| is_version_token(component))
        .last()
}

/// Replaces every token equal (ignoring ASCII case) to `from` with `to`,
/// following the capitalization of the replaced token.
pub fn replace_version(s: &str, from: &str, to: &str) -> String {
    segments(s)
        .into_iter()
        .map(|segment| {
            if !segment.eq_ignore_ascii_case(from) {
                return segment.to_string();
            }
            let capitalized = segment.starts_with(|c: char| c.is_ascii_uppercase());
            let mut chars = to.chars();
            match chars.next() {
                Some(first) if capitalized => first.to_ascii_uppercase().to_string() + chars.as_str(),
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Drops version components from the package part of a dotted reference:
/// `.example.v1beta1.Foo` becomes `.example.Foo`.
///
/// Without a declared package to go by, the package part is the run of
/// components before the first capitalized one; the last component is
/// always kept, so a message named `V2` stays distinct from `V1`.
pub fn normalize_full_name(name: &str) -> String {
    let components: Vec<&str> = name.split('.').collect();
    let last = components.len().saturating_sub(1);
    let mut in_package = true;
    components
        .iter()
        .enumerate()
        .filter(|(index, component)| {
            in_package &= !component.starts_with(|c: char| c.is_ascii_uppercase());
            !(in_package && *index < last && is_version_token(component))
        })
        .map(|(_, component)| *component)
        .collect::<Vec<_>>()
        .join(".")
}

/// Version-normalized full name of a type declared in `package`: only the
/// package prefix is normalized, the nested type path is kept as is.
pub fn normalize_type_name(package: &str, full_name: &str) -> String {
    let package = package.trim_start_matches('.');
    let prefix = if package.is_empty() {
        ".".to_string()
    } else {
        format!(".{package}.")
    };
    let Some(path) = full_name.strip_prefix(&prefix) else {
        return normalize_full_name(full_name);
    };
    match normalize_package(package).as_str() {
        "" => format!(".{path}"),
        normalized => format!(".{normalized}.{path}"),
    }
}

/// Package name without leading dot and without version components.
pub fn normalize_package(package: &str) -> String {
    package
        .trim_start_matches('.')
        .split('.')
        .filter(|component| !is_version_token(component))
        .collect::<Vec<_>>()
        .join(".")
}
