//! Route normalization.
//!
//! Routes are user-declared strings; two routes address the same record
//! iff their normalized forms are equal.

/// Normalize a route into its canonical storage key.
///
/// Replaces any run of whitespace with a single hyphen and lowercases the
/// result. Total (empty and odd inputs pass through without failing) and
/// idempotent: `normalize_route(normalize_route(x)) == normalize_route(x)`.
/// Normalization is a comparison convention, not a security boundary.
#[must_use]
pub fn normalize_route(route: &str) -> String {
    let mut result = String::with_capacity(route.len());
    let mut in_whitespace = false;

    for c in route.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                result.push('-');
                in_whitespace = true;
            }
        } else {
            result.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }

    result
}
