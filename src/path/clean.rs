//! Path cleaning
//!
//! Collapses repeated separators and dot runs, strips leading characters that
//! cannot start a path segment, and keeps `scheme://` markers intact.

use regex::Regex;
use std::sync::LazyLock;

/// A valid first character for a cleaned relative path
static LEADING_CHAR: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z0-9_]"));

/// Two or more consecutive dots
static DOT_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"\.{2,}"));

/// Two or more consecutive separators
static SLASH_RUN: LazyLock<Regex> = LazyLock::new(|| compile(r"/{2,}"));

/// A URI scheme followed by its `//` marker at the start of the raw input
static SCHEME_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z][A-Za-z0-9+.\-]*:/{2,}"));

/// A scheme whose marker lost a separator during collapsing
static COLLAPSED_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([A-Za-z][A-Za-z0-9+.\-]*):/"));

#[allow(clippy::expect_used)] // Patterns are literals; a failure is a programming error
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("path cleaning pattern must compile")
}

/// Normalize a local path or storage URI
///
/// - runs of `/` become a single `/`
/// - runs of `.` become a single `.`, so `..` can never act as a parent step
/// - leading characters are dropped until the path starts with `[A-Za-z0-9_]`;
///   for absolute paths this happens after the root `/`, which is kept
/// - an input that started with `scheme://` keeps exactly that marker
///
/// The function is pure and idempotent.
///
/// # Examples
///
/// ```
/// use bucketcp::path::clean;
///
/// assert_eq!(clean("/tmp//out/../logs/1.log"), "/tmp/out/./logs/1.log");
/// assert_eq!(clean("s3://bucket//a/b.txt"), "s3://bucket/a/b.txt");
/// assert_eq!(clean("./relative"), "relative");
/// ```
#[must_use]
pub fn clean(path: &str) -> String {
    let is_absolute = path.starts_with('/');
    let had_scheme = SCHEME_MARKER.is_match(path);

    let collapsed = DOT_RUN.replace_all(path, ".");
    let collapsed = SLASH_RUN.replace_all(&collapsed, "/");

    let body = if is_absolute {
        &collapsed[1..]
    } else {
        &collapsed[..]
    };
    let stripped = strip_leading(body);

    let cleaned = if is_absolute {
        format!("/{stripped}")
    } else {
        stripped.to_string()
    };

    if had_scheme {
        COLLAPSED_SCHEME.replace(&cleaned, "$1://").into_owned()
    } else {
        cleaned
    }
}

fn strip_leading(mut path: &str) -> &str {
    while !path.is_empty() && !LEADING_CHAR.is_match(path) {
        let mut chars = path.chars();
        chars.next();
        path = chars.as_str();
    }
    path
}
