// src/export/writer.rs
// =============================================================================
// Writes a list of records to `{user}-{Type}s-{MM-DD-YYYY}.csv`.
//
// Existing files with the same name are overwritten.
// =============================================================================

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use super::CsvRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// Builds the export file name, e.g. "octocat-Repos-01-31-2024.csv"
pub fn export_file_name<R: CsvRecord>(user: &str, date: NaiveDate) -> String {
    format!("{}-{}s-{}.csv", user, R::TYPE_NAME, date.format("%m-%d-%Y"))
}

// Writes a header row followed by one row per record
pub fn write_records<R: CsvRecord, W: io::Write>(records: &[R], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(R::HEADERS)?;
    for record in records {
        writer.write_record(record.row())?;
    }
    writer.flush()?;
    Ok(())
}

// Exports `records` into `dir` and returns the path of the new file
pub fn export_to_csv<R: CsvRecord>(
    records: &[R],
    user: &str,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name::<R>(user, date));

    let file = File::create(&path).map_err(|source| ExportError::Create {
        path: path.clone(),
        source,
    })?;

    write_records(records, file).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), rows = records.len(), "wrote CSV export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Commit, Repository};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn repo(id: u64, name: &str) -> Repository {
        Repository {
            id,
            name: name.to_string(),
            url: format!("https://github.com/octocat/{}", name),
            default_branch: "main".to_string(),
            owner: Some("octocat".to_string()),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name::<Repository>("octocat", date()), "octocat-Repos-01-31-2024.csv");
        assert_eq!(export_file_name::<Commit>("octocat", date()), "octocat-Commits-01-31-2024.csv");
    }

    #[test]
    fn test_export_two_repositories() {
        let dir = TempDir::new().unwrap();
        let repos = vec![repo(1, "alpha"), repo(2, "beta")];

        let path = export_to_csv(&repos, "octocat", dir.path(), date()).unwrap();
        assert_eq!(path, dir.path().join("octocat-Repos-01-31-2024.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), Repository::HEADERS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "alpha");
        assert_eq!(&rows[1][2], "https://github.com/octocat/beta");
        assert_eq!(&rows[1][3], "main");
    }

    #[test]
    fn test_commit_message_with_newlines_and_commas() {
        let commits = vec![Commit {
            repository: "alpha".to_string(),
            sha: "abc".to_string(),
            author_name: "Mona, Lisa".to_string(),
            author_email: "mona@example.com".to_string(),
            message: "Fix bug\n\nDetails, \"quoted\"".to_string(),
            date: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            additions: 3,
            deletions: 1,
            url: "h".to_string(),
        }];

        let mut out = Vec::new();
        write_records(&commits, &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "Mona, Lisa");
        assert_eq!(&rows[0][4], "Fix bug\n\nDetails, \"quoted\"");
        assert_eq!(&rows[0][5], "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_empty_export_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = export_to_csv::<Commit>(&[], "octocat", dir.path(), date()).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("repository,sha,"));
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        export_to_csv(&[repo(1, "a"), repo(2, "b"), repo(3, "c")], "octocat", dir.path(), date()).unwrap();
        let path = export_to_csv(&[repo(4, "d")], "octocat", dir.path(), date()).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_export_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = export_to_csv(&[repo(1, "a")], "octocat", &missing, date()).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }
}
