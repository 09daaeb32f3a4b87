use std::ffi::OsStr;
use std::path::Path;

pub trait PathExt {
    fn is_json_document(&self) -> bool;
}

impl PathExt for Path {
    fn is_json_document(&self) -> bool {
        self.extension() == Some(OsStr::new("json"))
    }
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~` for the home directory.
/// Unresolvable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_json_extension_then_is_document() {
        assert!(Path::new("plans/q3.json").is_json_document());
        assert!(!Path::new("plans/q3.toml").is_json_document());
        assert!(!Path::new("plans").is_json_document());
    }

    #[test]
    fn given_unknown_variable_when_expanding_then_returns_input() {
        let input = "$ORGTREE_SURELY_UNSET_VARIABLE/tree.json";
        assert_eq!(expand_env_vars(input), input);
    }
}
