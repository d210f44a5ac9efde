//! Pure formatting functions for UI output.
//!
//! All display logic lives here, separated from user interaction. Functions
//! are side-effect free beyond printing.

use crate::domain::{CommitMessage, Version};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Format and print a non-fatal warning.
pub fn display_warning(message: &str) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", message);
}

/// Print the usage example shown after validation failures.
pub fn display_usage_example() {
    println!(
        "\x1b[33mExample:\x1b[0m \x1b[32mgit-autocommit -a \"feat(auth): add login - supports oauth\"\x1b[0m"
    );
}

/// Display the pre-confirmation summary: message, staged files and the
/// version change (or the reason there is none).
pub fn display_commit_summary(
    message: &CommitMessage,
    files: &[String],
    current_version: &Version,
    new_version: Option<&Version>,
) {
    println!("\n\x1b[1mCommit message:\x1b[0m");
    println!("  \x1b[32m{}\x1b[0m", message.to_conventional_string());
    for detail in message.details() {
        println!("  - {}", detail);
    }

    println!("\n\x1b[4mStaged files ({}):\x1b[0m", files.len());
    for file in files.iter().take(10) {
        println!("  {}", file);
    }
    if files.len() > 10 {
        println!("  ... and {} more files", files.len() - 10);
    }

    match new_version {
        Some(new_version) => {
            println!("\n\x1b[1mVersion change:\x1b[0m");
            println!("  From: \x1b[31m{}\x1b[0m", current_version);
            println!("  To:   \x1b[32m{}\x1b[0m", new_version);
        }
        None => {
            println!(
                "\n\x1b[33m→\x1b[0m Commit type '{}' does not trigger a version bump",
                message.commit_type()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Visual verification tests - output goes to stdout/stderr

    #[test]
    fn test_display_error() {
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        display_success("test success");
    }

    #[test]
    fn test_display_summary_with_bump() {
        let msg = CommitMessage::parse("feat(auth): add login - supports oauth").unwrap();
        display_commit_summary(
            &msg,
            &["src/auth.rs".to_string()],
            &Version::new(1, 4, 2),
            Some(&Version::new(1, 5, 0)),
        );
    }

    #[test]
    fn test_display_summary_without_bump() {
        let msg = CommitMessage::parse("chore: cleanup").unwrap();
        display_commit_summary(&msg, &[], &Version::ZERO, None);
    }
}
