//! Utility functions and types.

use std::fmt;

/// Redacts a secret so it can be printed in `Debug` output and logs.
///
/// - Values shorter than 12 characters are replaced entirely.
/// - Longer values keep their first and last three characters.
///
/// Access key ids stay distinguishable from each other while the secret
/// access key never shows up in full.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl Redact<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        match s.chars().count() {
            0 => f.write_str("EMPTY"),
            n if n < 12 => f.write_str("***"),
            n => {
                let head: String = s.chars().take(3).collect();
                let tail: String = s.chars().skip(n - 3).collect();
                write!(f, "{head}***{tail}")
            }
        }
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}

impl fmt::Display for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}
