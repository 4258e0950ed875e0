// src/export/mod.rs
// =============================================================================
// This module writes collected records to CSV files.
//
// Every record type lists its own columns. The header comes from the type,
// not from the first record, so an empty list still produces a valid file
// with just the header row.
//
// Rust concepts:
// - Traits with associated constants: per-type metadata without an instance
// - Generics: one export function for every record type
// =============================================================================

mod writer;

pub use writer::export_to_csv;

use chrono::SecondsFormat;

use crate::records::{Commit, Repository};

// A record that can be written as one CSV row
pub trait CsvRecord {
    /// Used in the file name: `{user}-{TYPE_NAME}s-{date}.csv`
    const TYPE_NAME: &'static str;

    /// Column names, in the same order as `row()`
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl CsvRecord for Repository {
    const TYPE_NAME: &'static str = "Repo";
    const HEADERS: &'static [&'static str] = &["id", "name", "url", "default_branch"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.url.clone(),
            self.default_branch.clone(),
        ]
    }
}

impl CsvRecord for Commit {
    const TYPE_NAME: &'static str = "Commit";
    const HEADERS: &'static [&'static str] = &[
        "repository",
        "sha",
        "author_name",
        "author_email",
        "commit_message",
        "commit_date",
        "additions",
        "deletions",
        "url",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.repository.clone(),
            self.sha.clone(),
            self.author_name.clone(),
            self.author_email.clone(),
            self.message.clone(),
            // Same shape GitHub sends: 2020-01-01T00:00:00Z
            self.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.additions.to_string(),
            self.deletions.to_string(),
            self.url.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_headers_match_row_width() {
        let repo = Repository {
            id: 1,
            name: "r".to_string(),
            url: "u".to_string(),
            default_branch: "main".to_string(),
            owner: None,
        };
        assert_eq!(repo.row().len(), Repository::HEADERS.len());

        let commit = Commit {
            repository: "r".to_string(),
            sha: "abc".to_string(),
            author_name: "A".to_string(),
            author_email: "a@x.com".to_string(),
            message: "m".to_string(),
            date: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            additions: 3,
            deletions: 1,
            url: "h".to_string(),
        };
        assert_eq!(commit.row().len(), Commit::HEADERS.len());
        assert_eq!(commit.row()[5], "2020-01-01T00:00:00Z");
    }
}
