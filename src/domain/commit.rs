use regex::Regex;
use std::fmt;
use thiserror::Error;

/// The closed set of commit types accepted as a description prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Refactor,
    Test,
    Chore,
}

impl CommitType {
    /// All valid commit types, in matching order.
    pub const ALL: [CommitType; 6] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Chore,
    ];

    /// The literal keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }

    /// Find the type whose keyword is a literal prefix of the message.
    ///
    /// No member of the set is a prefix of another, so first match wins.
    pub fn matching_prefix(message: &str) -> Option<CommitType> {
        CommitType::ALL
            .iter()
            .copied()
            .find(|t| message.starts_with(t.as_str()))
    }

    /// Comma-separated list of valid keywords, for error hints
    pub fn valid_list() -> String {
        CommitType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a raw description fails to parse
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid type prefix - valid prefixes are: {valid}", valid = CommitType::valid_list())]
    InvalidPrefix,

    #[error("message has no description after the type - expected 'type(scope): subject'")]
    EmptyMessage,

    #[error("commit subject is empty")]
    EmptySubject,
}

/// Parsed, immutable representation of a commit description.
///
/// Built once from the raw CLI argument (or from a revised description
/// returned by the rewrite collaborator) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    commit_type: CommitType,
    scope: String,
    subject: String,
    details: Vec<String>,
}

impl CommitMessage {
    /// Parse a raw description of the form `type(scope): subject - detail - detail`.
    ///
    /// The type must be a literal prefix of the trimmed input. The scope is the
    /// first parenthesized group before the colon, empty when absent. Everything
    /// after the first colon is split on every `-` (hyphenated words split too,
    /// matching the historical splitting behavior); the first segment is the
    /// subject, the remaining non-empty segments become detail lines.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let message = raw.trim();

        let commit_type = CommitType::matching_prefix(message).ok_or(ParseError::InvalidPrefix)?;

        let (head, tail) = match message.split_once(':') {
            Some((head, tail)) if !tail.trim().is_empty() => (head, tail),
            _ => return Err(ParseError::EmptyMessage),
        };

        let scope = Regex::new(r"\(([^)]*)\)")
            .ok()
            .and_then(|re| re.captures(head))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let mut segments = tail.split('-').map(str::trim);

        let subject = segments.next().unwrap_or("").to_string();
        if subject.is_empty() {
            return Err(ParseError::EmptySubject);
        }

        let details: Vec<String> = segments
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(CommitMessage {
            commit_type,
            scope,
            subject,
            details,
        })
    }

    pub fn commit_type(&self) -> CommitType {
        self.commit_type
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Conventional commit string: `type(scope): subject`, parentheses omitted
    /// when the scope is empty. Total - never fails.
    pub fn to_conventional_string(&self) -> String {
        if self.scope.is_empty() {
            format!("{}: {}", self.commit_type, self.subject)
        } else {
            format!("{}({}): {}", self.commit_type, self.scope, self.subject)
        }
    }

    /// The commit title line. Identical to the conventional string.
    pub fn commit_title(&self) -> String {
        self.to_conventional_string()
    }

    /// The commit body: one `- ` bullet per detail line, or `None` when the
    /// description carried no details.
    ///
    /// The title/body split is relied upon by changelog tooling and must stay
    /// a two-part shape: a detail-less description commits with title only.
    pub fn commit_body(&self) -> Option<String> {
        if self.details.is_empty() {
            return None;
        }

        Some(
            self.details
                .iter()
                .map(|d| format!("- {}", d))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_conventional_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_scope_and_details() {
        let msg =
            CommitMessage::parse("feat(auth): adicionar login - suporta oauth - suporta senha")
                .unwrap();
        assert_eq!(msg.commit_type(), CommitType::Feat);
        assert_eq!(msg.scope(), "auth");
        assert_eq!(msg.subject(), "adicionar login");
        assert_eq!(msg.details(), &["suporta oauth", "suporta senha"]);
        assert_eq!(msg.to_conventional_string(), "feat(auth): adicionar login");
    }

    #[test]
    fn test_parse_without_scope() {
        let msg = CommitMessage::parse("fix: resolve login issue").unwrap();
        assert_eq!(msg.commit_type(), CommitType::Fix);
        assert_eq!(msg.scope(), "");
        assert_eq!(msg.subject(), "resolve login issue");
        assert_eq!(msg.to_conventional_string(), "fix: resolve login issue");
    }

    #[test]
    fn test_parse_trims_input() {
        let msg = CommitMessage::parse("  chore: limpeza  ").unwrap();
        assert_eq!(msg.commit_type(), CommitType::Chore);
        assert_eq!(msg.subject(), "limpeza");
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert_eq!(
            CommitMessage::parse("wip: something"),
            Err(ParseError::InvalidPrefix)
        );
        assert_eq!(
            CommitMessage::parse("random message"),
            Err(ParseError::InvalidPrefix)
        );
    }

    #[test]
    fn test_parse_missing_colon() {
        assert_eq!(
            CommitMessage::parse("feat add something"),
            Err(ParseError::EmptyMessage)
        );
    }

    #[test]
    fn test_parse_empty_tail() {
        assert_eq!(CommitMessage::parse("feat:"), Err(ParseError::EmptyMessage));
        assert_eq!(
            CommitMessage::parse("feat:   "),
            Err(ParseError::EmptyMessage)
        );
    }

    #[test]
    fn test_parse_whitespace_subject_rejected() {
        // subject is only whitespace before the first delimiter
        assert_eq!(
            CommitMessage::parse("feat:  - detail"),
            Err(ParseError::EmptySubject)
        );
    }

    #[test]
    fn test_hyphen_splits_unconditionally() {
        // hyphenated words are split too - historical behavior, kept as-is
        let msg = CommitMessage::parse("feat: add auto-commit support").unwrap();
        assert_eq!(msg.subject(), "add auto");
        assert_eq!(msg.details(), &["commit support"]);
    }

    #[test]
    fn test_no_details_means_no_body() {
        let msg = CommitMessage::parse("docs: update readme").unwrap();
        assert!(msg.details().is_empty());
        assert_eq!(msg.commit_body(), None);
        assert_eq!(msg.commit_title(), "docs: update readme");
    }

    #[test]
    fn test_body_joins_bullet_lines() {
        let msg = CommitMessage::parse("feat(ui): new panel - resizable - keyboard nav").unwrap();
        assert_eq!(
            msg.commit_body().unwrap(),
            "- resizable\n- keyboard nav"
        );
    }

    #[test]
    fn test_trailing_delimiter_produces_no_empty_detail() {
        let msg = CommitMessage::parse("feat: thing - one -").unwrap();
        assert_eq!(msg.details(), &["one"]);
    }

    #[test]
    fn test_conventional_string_round_trip() {
        let original = CommitMessage::parse("feat(core): add parser").unwrap();
        let reparsed = CommitMessage::parse(&original.to_conventional_string()).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_display_matches_conventional_string() {
        let msg = CommitMessage::parse("refactor(git): simplify push").unwrap();
        assert_eq!(msg.to_string(), msg.to_conventional_string());
    }

    #[test]
    fn test_all_types_parse() {
        for t in CommitType::ALL {
            let raw = format!("{}: do the thing", t.as_str());
            let msg = CommitMessage::parse(&raw).unwrap();
            assert_eq!(msg.commit_type(), t);
        }
    }

    #[test]
    fn test_valid_list_mentions_all_types() {
        let list = CommitType::valid_list();
        assert!(list.contains("feat"));
        assert!(list.contains("chore"));
    }
}
