//! Remote commit-message rewrite collaborator.
//!
//! Sends the parsed description plus the staged diff to an OpenAI-compatible
//! chat-completions endpoint and substitutes the answer when it is non-empty
//! and still parses as a valid commit description. Every failure mode - missing
//! credentials, network error, timeout, non-success status, malformed payload -
//! degrades to the original message. This call can never fail the workflow.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{MessageStyle, RewriteConfig};
use crate::domain::CommitMessage;
use crate::ui;

/// Cap on how much diff text is sent along with the description.
const MAX_DIFF_CHARS: usize = 100_000;

/// Chat API request message
#[derive(Serialize, Debug)]
struct Message {
    role: String,
    content: String,
}

/// Chat API request body
#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

/// Chat API response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat API response choice
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

/// Chat API response
#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

/// Revise a commit description through the configured endpoint.
///
/// Returns the revised description, or the original unchanged when the
/// rewrite is disabled, unconfigured, or fails in any way.
pub fn revise_commit_message(original: &str, diff: &str, config: &RewriteConfig) -> String {
    if !config.enabled {
        return original.to_string();
    }

    let api_key = match resolve_api_key(config) {
        Some(key) => key,
        None => {
            ui::display_status("OPENAI_API_KEY not set; keeping the original message");
            return original.to_string();
        }
    };

    match request_rewrite(original, diff, config, &api_key) {
        Ok(candidate) => accept_rewrite(original, &candidate),
        Err(reason) => {
            ui::display_warning(&format!(
                "Message rewrite failed ({}); keeping the original message",
                reason
            ));
            original.to_string()
        }
    }
}

fn resolve_api_key(config: &RewriteConfig) -> Option<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
}

fn request_rewrite(
    original: &str,
    diff: &str,
    config: &RewriteConfig,
    api_key: &str,
) -> Result<String, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs()))
        .build()
        .map_err(|e| e.to_string())?;

    let request = ChatRequest {
        model: config.model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system_prompt(config.style).to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user_prompt(original, diff),
            },
        ],
    };

    let response = client
        .post(&config.endpoint)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                format!("timed out after {}s", config.timeout_secs())
            } else {
                e.to_string()
            }
        })?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    let body: ChatResponse = response.json().map_err(|e| e.to_string())?;
    extract_content(&body).ok_or_else(|| "response carried no message content".to_string())
}

/// System prompt, varying only in the configured verb style.
fn system_prompt(style: MessageStyle) -> &'static str {
    match style {
        MessageStyle::Imperative => {
            "You generate commit messages. Given a diff and a context comment, \
             produce a single short, clear commit message in the imperative mood. \
             Keep or add a conventional prefix such as feat:, fix: or chore: at \
             the start. Output only the commit message, without quotes, without \
             explanations and without hyphens."
        }
        MessageStyle::Present => {
            "You generate commit messages. Given a diff and a context comment, \
             produce a single short, clear commit message in the present tense. \
             Keep or add a conventional prefix such as feat:, fix: or chore: at \
             the start. Output only the commit message, without quotes, without \
             explanations and without hyphens."
        }
    }
}

fn user_prompt(original: &str, diff: &str) -> String {
    let truncated: String = diff.chars().take(MAX_DIFF_CHARS).collect();
    format!("diff:\n{}\ncomment:\n{}", truncated, original)
}

/// First choice's trimmed content, if any.
fn extract_content(response: &ChatResponse) -> Option<String> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// Substitute the candidate only when it still parses as a valid description;
/// a malformed rewrite silently keeps the original.
fn accept_rewrite(original: &str, candidate: &str) -> String {
    if CommitMessage::parse(candidate).is_ok() {
        candidate.to_string()
    } else {
        original.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_disabled_returns_original() {
        let config = RewriteConfig {
            enabled: false,
            ..RewriteConfig::default()
        };
        assert_eq!(
            revise_commit_message("feat: add thing", "", &config),
            "feat: add thing"
        );
    }

    #[test]
    #[serial]
    fn test_missing_api_key_returns_original() {
        std::env::remove_var("OPENAI_API_KEY");
        let config = RewriteConfig::default();
        assert_eq!(
            revise_commit_message("fix: broken thing", "some diff", &config),
            "fix: broken thing"
        );
    }

    #[test]
    #[serial]
    fn test_explicit_api_key_wins_over_env() {
        std::env::remove_var("OPENAI_API_KEY");
        let config = RewriteConfig {
            api_key: Some("sk-test".to_string()),
            ..RewriteConfig::default()
        };
        assert_eq!(resolve_api_key(&config), Some("sk-test".to_string()));
    }

    #[test]
    #[serial]
    fn test_blank_api_key_counts_as_missing() {
        std::env::remove_var("OPENAI_API_KEY");
        let config = RewriteConfig {
            api_key: Some("   ".to_string()),
            ..RewriteConfig::default()
        };
        assert_eq!(resolve_api_key(&config), None);
    }

    #[test]
    fn test_extract_content() {
        let response = ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some("  feat: cleaner message  ".to_string()),
                },
            }],
        };
        assert_eq!(
            extract_content(&response),
            Some("feat: cleaner message".to_string())
        );
    }

    #[test]
    fn test_extract_content_empty_cases() {
        let no_choices = ChatResponse { choices: vec![] };
        assert_eq!(extract_content(&no_choices), None);

        let blank = ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some("   ".to_string()),
                },
            }],
        };
        assert_eq!(extract_content(&blank), None);

        let missing = ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage { content: None },
            }],
        };
        assert_eq!(extract_content(&missing), None);
    }

    #[test]
    fn test_accept_rewrite_valid_candidate() {
        assert_eq!(
            accept_rewrite("feat: original", "fix: better wording"),
            "fix: better wording"
        );
    }

    #[test]
    fn test_accept_rewrite_malformed_candidate_keeps_original() {
        assert_eq!(
            accept_rewrite("feat: original", "A freeform sentence"),
            "feat: original"
        );
        assert_eq!(accept_rewrite("feat: original", "feat:"), "feat: original");
    }

    #[test]
    fn test_user_prompt_truncates_diff() {
        let diff = "x".repeat(MAX_DIFF_CHARS + 500);
        let prompt = user_prompt("feat: msg", &diff);
        assert!(prompt.len() < diff.len());
        assert!(prompt.ends_with("comment:\nfeat: msg"));
    }
}
