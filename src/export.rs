//! CSV export and file-level database backup

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::storage::ContactStore;
use crate::{Error, Result};

/// Most contacts a single export will write
pub const EXPORT_LIMIT: usize = 10_000;

/// Export file used when nothing else is configured
pub const DEFAULT_EXPORT_FILE: &str = "contacts_export.csv";

/// Header row of every export
pub const CSV_HEADER: [&str; 6] = ["id", "name", "email", "phone", "notes", "created_at"];

/// Write up to [`EXPORT_LIMIT`] of the most recent contacts to `destination`
/// as UTF-8 CSV, replacing any existing file. Absent fields become empty cells.
pub fn export_csv(store: &ContactStore, destination: &Path) -> Result<PathBuf> {
    export_most_recent(store, destination, EXPORT_LIMIT)
}

pub(crate) fn export_most_recent(
    store: &ContactStore,
    destination: &Path,
    limit: usize,
) -> Result<PathBuf> {
    let contacts = store.list(limit)?;

    let mut writer = csv::Writer::from_path(destination)?;
    writer.write_record(CSV_HEADER)?;
    for contact in &contacts {
        let id = contact.id.to_string();
        writer.write_record([
            id.as_str(),
            contact.name.as_str(),
            contact.email.as_deref().unwrap_or_default(),
            contact.phone.as_deref().unwrap_or_default(),
            contact.notes.as_deref().unwrap_or_default(),
            contact.created_at.as_str(),
        ])?;
    }
    writer.flush()?;

    tracing::info!(rows = contacts.len(), "exported contacts to {}", destination.display());
    Ok(destination.to_path_buf())
}

/// `backup_<YYYYMMDD_HHMMSS>.db` for the given local time
pub fn backup_file_name(at: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("backup_{}.db", at.format("%Y%m%d_%H%M%S")))
}

/// Copy the database file byte-for-byte, keeping its permissions and
/// modification time.
///
/// Without a destination the copy is named after the current local time.
/// Nothing is written when `source` does not exist.
pub fn backup_database(source: &Path, destination: Option<&Path>) -> Result<PathBuf> {
    if !source.exists() {
        return Err(Error::SourceMissing(source.to_path_buf()));
    }

    let destination = destination
        .map(Path::to_path_buf)
        .unwrap_or_else(|| backup_file_name(Local::now().naive_local()));

    if destination.exists() && fs::canonicalize(&destination)? == fs::canonicalize(source)? {
        return Err(Error::InvalidInput(format!(
            "backup destination {} is the database itself",
            destination.display()
        )));
    }

    fs::copy(source, &destination)?;
    let modified = fs::metadata(source)?.modified()?;
    fs::File::options()
        .write(true)
        .open(&destination)?
        .set_modified(modified)?;

    tracing::info!("backed up {} to {}", source.display(), destination.display());
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::NewContact;
    use chrono::NaiveDate;

    #[test]
    fn test_export_matches_listing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::open(dir.path().join("contacts.db")).unwrap();
        store.create(&NewContact::new("Ana").email("ana@x.com")).unwrap();
        store
            .create(&NewContact::new("Lima, Bob").notes("says \"hi\"\nsecond line"))
            .unwrap();
        store.create(&NewContact::new("Cid").phone("555")).unwrap();

        let path = export_csv(&store, &dir.path().join("out.csv")).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(CSV_HEADER.to_vec()));

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        let contacts = store.list(EXPORT_LIMIT).unwrap();
        assert_eq!(records.len(), contacts.len());

        for (record, contact) in records.iter().zip(&contacts) {
            assert_eq!(&record[0], contact.id.to_string());
            assert_eq!(&record[1], contact.name);
            assert_eq!(&record[2], contact.email.as_deref().unwrap_or_default());
            assert_eq!(&record[3], contact.phone.as_deref().unwrap_or_default());
            assert_eq!(&record[4], contact.notes.as_deref().unwrap_or_default());
            assert_eq!(&record[5], contact.created_at);
        }
    }

    #[test]
    fn test_export_keeps_only_most_recent_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::open(dir.path().join("contacts.db")).unwrap();
        for name in ["Ana", "Bob", "Cid"] {
            store.create(&NewContact::new(name)).unwrap();
        }

        let path = export_most_recent(&store, &dir.path().join("out.csv"), 2).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let names: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(names, ["Cid", "Bob"]);
        assert_eq!(EXPORT_LIMIT, 10_000);
    }

    #[test]
    fn test_export_overwrites_destination() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::open(dir.path().join("contacts.db")).unwrap();
        let destination = dir.path().join("out.csv");
        fs::write(&destination, "stale content that is much longer than the export\n".repeat(20))
            .unwrap();

        export_csv(&store, &destination).unwrap();

        let written = fs::read_to_string(&destination).unwrap();
        assert_eq!(written.trim_end(), "id,name,email,phone,notes,created_at");
    }

    #[test]
    fn test_backup_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("copy.db");

        let err = backup_database(&dir.path().join("absent.db"), Some(&destination)).unwrap_err();

        assert!(matches!(err, Error::SourceMissing(_)));
        assert!(!destination.exists());
    }

    #[test]
    fn test_backup_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::open(dir.path().join("contacts.db")).unwrap();
        store.create(&NewContact::new("Ana")).unwrap();
        let destination = dir.path().join("copy.db");

        let written = backup_database(store.path(), Some(&destination)).unwrap();

        assert_eq!(written, destination);
        assert_eq!(fs::read(store.path()).unwrap(), fs::read(&destination).unwrap());
        assert_eq!(
            fs::metadata(store.path()).unwrap().modified().unwrap(),
            fs::metadata(&destination).unwrap().modified().unwrap()
        );

        let copy = ContactStore::open(&destination).unwrap();
        assert_eq!(copy.list(10).unwrap().len(), 1);
    }

    #[test]
    fn test_backup_refuses_to_overwrite_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::open(dir.path().join("contacts.db")).unwrap();
        store.create(&NewContact::new("Ana")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = backup_database(store.path(), Some(store.path())).unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_backup_file_name_pattern() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(backup_file_name(at), PathBuf::from("backup_20240309_070501.db"));
    }
}
