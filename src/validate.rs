//! Username validation against the forum's naming rules.
//!
//! Mirrors Discourse's own username validator: bounded length, a small
//! ASCII alphabet, restrictions on the first and last character, no runs
//! of punctuation and no names that look like static file paths. None of
//! the rules depend on letter case.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters other than these make a username invalid.
static ALLOWED_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]*$").unwrap());

/// Two or more punctuation characters in a row.
static REPEATED_SPECIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_.\-]{2,}").unwrap());

/// Suffixes that would make a profile URL look like a static asset.
static CONFUSING_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(js|json|css|htm|html|xml|jpg|jpeg|png|gif|bmp|ico|tif|tiff|woff)$")
        .unwrap()
});

/// The first rule a username breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameViolation {
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidCharacter,
    InvalidFirstCharacter,
    InvalidLastCharacter,
    RepeatedSpecialCharacter,
    ConfusingExtension,
}

impl fmt::Display for UsernameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsernameViolation::TooShort { min } => {
                write!(f, "must be at least {min} characters")
            }
            UsernameViolation::TooLong { max } => {
                write!(f, "must be no more than {max} characters")
            }
            UsernameViolation::InvalidCharacter => {
                write!(f, "must only include letters, numbers, dashes, dots and underscores")
            }
            UsernameViolation::InvalidFirstCharacter => {
                write!(f, "must begin with a letter, a number or an underscore")
            }
            UsernameViolation::InvalidLastCharacter => {
                write!(f, "must end with a letter or a number")
            }
            UsernameViolation::RepeatedSpecialCharacter => {
                write!(f, "must not contain a sequence of 2 or more special characters")
            }
            UsernameViolation::ConfusingExtension => {
                write!(f, "must not end with a confusing suffix like .json or .png")
            }
        }
    }
}

/// Length bounds for usernames. The character rules are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsernamePolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for UsernamePolicy {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 15,
        }
    }
}

impl UsernamePolicy {
    /// Return the first rule `username` violates, or `None` if it is valid.
    pub fn violation(&self, username: &str) -> Option<UsernameViolation> {
        let length = username.chars().count();
        if length < self.min_length {
            return Some(UsernameViolation::TooShort {
                min: self.min_length,
            });
        }
        if length > self.max_length {
            return Some(UsernameViolation::TooLong {
                max: self.max_length,
            });
        }
        if !ALLOWED_CHARS_RE.is_match(username) {
            return Some(UsernameViolation::InvalidCharacter);
        }

        // Only ASCII remains past this point.
        let first = username.chars().next();
        if !first.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Some(UsernameViolation::InvalidFirstCharacter);
        }
        let last = username.chars().last();
        if !last.is_some_and(|c| c.is_ascii_alphanumeric()) {
            return Some(UsernameViolation::InvalidLastCharacter);
        }
        if REPEATED_SPECIAL_RE.is_match(username) {
            return Some(UsernameViolation::RepeatedSpecialCharacter);
        }
        if CONFUSING_EXTENSION_RE.is_match(username) {
            return Some(UsernameViolation::ConfusingExtension);
        }
        None
    }

    pub fn is_valid(&self, username: &str) -> bool {
        self.violation(username).is_none()
    }

    /// The invalid subset of `usernames`, in input order.
    pub fn check_usernames<S: AsRef<str>>(&self, usernames: &[S]) -> Vec<String> {
        usernames
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|u| !self.is_valid(u))
            .map(str::to_string)
            .collect()
    }
}

/// [`UsernamePolicy::check_usernames`] with the forum's default bounds.
pub fn check_usernames<S: AsRef<str>>(usernames: &[S]) -> Vec<String> {
    UsernamePolicy::default().check_usernames(usernames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_only_invalid_names() {
        let usernames = ["timtroendle", "TIMTROENDLE", "abcdefghijk654321", "Wolf"];
        assert_eq!(check_usernames(&usernames), vec!["abcdefghijk654321"]);
    }

    #[test]
    fn all_valid_yields_empty() {
        let usernames = vec!["tom_brown".to_string(), "a.b-c".to_string(), "_x1".to_string()];
        assert!(check_usernames(&usernames).is_empty());
    }

    #[test]
    fn invalid_subset_keeps_input_order() {
        let usernames = ["zz", "good_name", "bad name", "ab"];
        assert_eq!(check_usernames(&usernames), vec!["zz", "bad name", "ab"]);
    }

    #[test]
    fn validity_ignores_case() {
        let names = ["timtroendle", "tom", "abc123", "abcdefghijk654321", "x", "Wolf42"];
        for name in names {
            assert_eq!(
                check_usernames(&[name]).is_empty(),
                check_usernames(&[name.to_uppercase()]).is_empty(),
                "case changed the verdict for {name}"
            );
        }
    }

    #[test]
    fn length_bounds() {
        let policy = UsernamePolicy::default();
        assert_eq!(
            policy.violation("ab"),
            Some(UsernameViolation::TooShort { min: 3 })
        );
        assert!(policy.is_valid("abc"));
        assert!(policy.is_valid("abcdefghijklmno"));
        assert_eq!(
            policy.violation("abcdefghijklmnop"),
            Some(UsernameViolation::TooLong { max: 15 })
        );
    }

    #[test]
    fn configured_bounds_are_honoured() {
        let policy = UsernamePolicy {
            min_length: 2,
            max_length: 20,
        };
        assert!(policy.is_valid("ab"));
        assert!(policy.is_valid("abcdefghijk654321"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let policy = UsernamePolicy::default();
        // 15 characters, 30 bytes: too long would be wrong, bad charset is right.
        let name = "ééééééééééééééé";
        assert_eq!(policy.violation(name), Some(UsernameViolation::InvalidCharacter));
    }

    #[test]
    fn character_rules() {
        let policy = UsernamePolicy::default();
        assert_eq!(policy.violation("tim troendle"), Some(UsernameViolation::InvalidCharacter));
        assert_eq!(policy.violation("tim@home"), Some(UsernameViolation::InvalidCharacter));
        assert_eq!(policy.violation(".tim"), Some(UsernameViolation::InvalidFirstCharacter));
        assert_eq!(policy.violation("-tim"), Some(UsernameViolation::InvalidFirstCharacter));
        assert!(policy.is_valid("_tim"));
        assert_eq!(policy.violation("tim_"), Some(UsernameViolation::InvalidLastCharacter));
        assert_eq!(
            policy.violation("tim__troendle"),
            Some(UsernameViolation::RepeatedSpecialCharacter)
        );
        assert_eq!(
            policy.violation("tim.-x"),
            Some(UsernameViolation::RepeatedSpecialCharacter)
        );
    }

    #[test]
    fn confusing_extensions_rejected_in_any_case() {
        let policy = UsernamePolicy::default();
        assert_eq!(policy.violation("avatar.png"), Some(UsernameViolation::ConfusingExtension));
        assert_eq!(policy.violation("DATA.JSON"), Some(UsernameViolation::ConfusingExtension));
        assert!(policy.is_valid("tim.pngx"));
    }

    #[test]
    fn violation_messages_are_readable() {
        assert_eq!(
            UsernameViolation::TooLong { max: 15 }.to_string(),
            "must be no more than 15 characters"
        );
    }
}
