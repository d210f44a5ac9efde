//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod version;

pub use commit::{CommitMessage, CommitType, ParseError};
pub use version::{Version, VersionBump};
