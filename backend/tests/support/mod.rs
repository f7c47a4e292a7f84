//! Shared helpers for integration tests backed by a temporary SQLite file.

use placement_backend::domain::{RawForm, Username};
use placement_backend::outbound::persistence::SqliteConnector;
use tempfile::TempDir;

/// Migrated database living in a temporary directory.
pub struct TempDatabase {
    // Keeps the directory alive for the life of the test.
    _dir: TempDir,
    pub connector: SqliteConnector,
}

impl TempDatabase {
    /// Create and migrate a fresh database file.
    pub fn migrated() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("placement.db");
        let connector = SqliteConnector::new(path.display().to_string());
        connector.run_migrations().expect("migrations apply");
        Self {
            _dir: dir,
            connector,
        }
    }
}

pub fn username(raw: &str) -> Username {
    Username::new(raw).expect("valid username")
}

/// A prediction form with every collected field filled in.
pub fn complete_form() -> RawForm {
    RawForm::from_pairs([
        ("Age", "21"),
        ("Gender", "Male"),
        ("Branch", "CS"),
        ("Average GPA", "8.4"),
        ("Sem1 GPA", "8.0"),
        ("Sem2 GPA", "8.2"),
        ("Sem3 GPA", "8.5"),
        ("Sem4 GPA", "8.6"),
        ("Sem5 GPA", "8.7"),
        ("Sem6 GPA", "8.8"),
        ("Sem7 GPA", "8.9"),
        ("Sem8 GPA", "9.0"),
        ("Backlogs", "0"),
        ("Attendance (%)", "92"),
        ("Skills", "python, sql, ml"),
        ("Clubs", "coding"),
        ("Internship Done", "Yes"),
        ("Internship Domain", "Data Science"),
    ])
}
