//! Filename comparison

use std::ffi::OsStr;

/// Check whether `candidate` names the same file as `target`
///
/// Case-sensitive comparison is byte-exact. Case-insensitive comparison
/// folds ASCII letters only, so the result never depends on the locale;
/// other bytes must be identical.
#[must_use]
pub fn matches(candidate: &[u8], target: &[u8], case_insensitive: bool) -> bool {
    if case_insensitive {
        candidate.eq_ignore_ascii_case(target)
    } else {
        candidate == target
    }
}

/// Check a directory entry name against a target filename
#[must_use]
pub fn matches_name(name: &OsStr, target: &str, case_insensitive: bool) -> bool {
    matches(name.as_encoded_bytes(), target.as_bytes(), case_insensitive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflexive() {
        for name in ["a.txt", "Makefile", ".hidden", "", "ümlaut.md"] {
            assert!(matches(name.as_bytes(), name.as_bytes(), false));
            assert!(matches(name.as_bytes(), name.as_bytes(), true));
        }
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(matches(b"A.txt", b"a.txt", true));
        assert!(!matches(b"A.txt", b"a.txt", false));
        assert!(matches(b"README.MD", b"readme.md", true));
    }

    #[test]
    fn test_length_must_agree() {
        assert!(!matches(b"a.txt", b"a.txt~", true));
        assert!(!matches(b"a.txt", b"a.tx", false));
        assert!(!matches(b"", b"a", true));
    }

    #[test]
    fn test_non_ascii_is_not_folded() {
        assert!(!matches("Ä.txt".as_bytes(), "ä.txt".as_bytes(), true));
        assert!(matches("Ä.TXT".as_bytes(), "Ä.txt".as_bytes(), true));
    }

    #[test]
    fn test_arbitrary_bytes() {
        assert!(matches(b"\xff\xfe", b"\xff\xfe", false));
        assert!(!matches(b"\xff\xfe", b"\xfe\xff", true));
    }

    #[test]
    fn test_matches_name() {
        assert!(matches_name(OsStr::new("Cargo.toml"), "cargo.TOML", true));
        assert!(!matches_name(OsStr::new("Cargo.toml"), "cargo.toml", false));
    }
}
