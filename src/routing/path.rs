//! Path fragment rules.
//!
//! # Responsibilities
//! - Decide whether a string is a well-formed sub-path
//! - Collapse doubled separators produced by concatenating fragments
//!
//! # Design Decisions
//! - Single linear scan, no regex
//! - Case and percent-encoding are left untouched

/// Returns true if `sub_path` can be attached below another node.
///
/// A sub-path must be non-empty, start with `/` and must not be the bare
/// separator `/`.
pub fn is_valid_sub_path(sub_path: &str) -> bool {
    sub_path.starts_with('/') && sub_path != "/"
}

/// Collapse every run of two or more `/` into a single `/`.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;

    for c in path.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(c);
    }

    out
}

/// Concatenate a prefix and a fragment and normalize the result.
pub fn join(prefix: &str, fragment: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + fragment.len());
    joined.push_str(prefix);
    joined.push_str(fragment);
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_path_validation() {
        assert!(is_valid_sub_path("/auth"));
        assert!(is_valid_sub_path("/userinfo/{id}"));
        assert!(is_valid_sub_path("//double"));

        assert!(!is_valid_sub_path(""));
        assert!(!is_valid_sub_path("/"));
        assert!(!is_valid_sub_path("no-leading-slash"));
    }

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize("//auth"), "/auth");
        assert_eq!(normalize("/auth///login"), "/auth/login");
        assert_eq!(normalize("/auth/"), "/auth/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/", "/auth"), "/auth");
        assert_eq!(join("/auth", "/"), "/auth/");
        assert_eq!(join("/", "/"), "/");
        assert_eq!(join("/auth/", "/login"), "/auth/login");
    }
}
