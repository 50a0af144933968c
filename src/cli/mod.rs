//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use std::path::Path;

use anyhow::{Context, Result};

/// Read usernames from a file, one per line.
///
/// Blank lines and lines starting with `#` are skipped; a leading `@`
/// (as in a forum mention) is dropped.
pub fn read_usernames(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_usernames(&content))
}

fn parse_usernames(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.strip_prefix('@').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blanks_and_comments() {
        let content = "# attendees\ntimtroendle\n\n  @tom_brown  \n#wolf\n";
        assert_eq!(parse_usernames(content), vec!["timtroendle", "tom_brown"]);
    }

    #[test]
    fn read_usernames_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.txt");
        std::fs::write(&path, "Wolf\nabcdefghijk654321\n").unwrap();
        assert_eq!(
            read_usernames(&path).unwrap(),
            vec!["Wolf", "abcdefghijk654321"]
        );
    }

    #[test]
    fn read_usernames_missing_file() {
        let err = read_usernames(Path::new("/nonexistent/attendees.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
