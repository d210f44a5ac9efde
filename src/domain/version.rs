use std::fmt;

use super::CommitType;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Version bump decision derived from a commit type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl Version {
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
    };

    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version from a tag name (e.g., "v1.2.3" -> Version(1,2,3)).
    ///
    /// Accepts an optional `v`/`V` prefix and exactly three numeric components.
    /// Anything else yields `None`: a malformed tag is treated as the absence
    /// of a tag, never as a fatal error.
    pub fn parse_tag(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        let clean_tag = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = clean_tag.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let major = parts[0].parse::<u32>().ok()?;
        let minor = parts[1].parse::<u32>().ok()?;
        let patch = parts[2].parse::<u32>().ok()?;

        Some(Version::new(major, minor, patch))
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => Version::new(self.major + 1, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor + 1, 0),
            VersionBump::Patch => Version::new(self.major, self.minor, self.patch + 1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl VersionBump {
    /// Decide the bump for a commit type.
    ///
    /// `force_major` wins over the type. `feat` bumps minor, `fix` bumps patch;
    /// docs/refactor/test/chore do not warrant a release and yield `None`,
    /// which downstream must treat as "skip versioning and tagging", not as
    /// an error.
    pub fn decide(commit_type: CommitType, force_major: bool) -> Option<VersionBump> {
        if force_major {
            return Some(VersionBump::Major);
        }

        match commit_type {
            CommitType::Feat => Some(VersionBump::Minor),
            CommitType::Fix => Some(VersionBump::Patch),
            CommitType::Docs | CommitType::Refactor | CommitType::Test | CommitType::Chore => None,
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}
