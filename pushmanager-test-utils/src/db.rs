use std::{io, path::Path};

use tempfile::TempPath;

use crate::error::TestError;

/// A sqlite database file that belongs to exactly one test.
///
/// The file is created empty in the system temp directory under a unique name. It is
/// removed by [`remove`](Self::remove) or, if the test unwinds first, when the handle is
/// dropped.
#[derive(Debug)]
pub struct EphemeralDatabase {
    path: TempPath,
}

impl EphemeralDatabase {
    /// Creates a new, empty database file
    pub fn provision() -> Result<Self, TestError> {
        let file = tempfile::Builder::new()
            .prefix("pushmanager-test-")
            .suffix(".db")
            .tempfile()
            .map_err(TestError::setup("provisioning database file"))?;
        let path = file.into_temp_path();

        tracing::debug!(path = %path.display(), "provisioned test database");

        Ok(Self { path })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection string for the database file
    pub fn uri(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }

    /// Deletes the database file.
    ///
    /// A file that is already gone is logged and otherwise ignored.
    pub fn remove(self) -> Result<(), TestError> {
        let path = self.path.to_path_buf();

        match self.path.close() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed test database");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "test database was already removed");
                Ok(())
            }
            Err(e) => Err(TestError::teardown("removing database file")(e)),
        }
    }
}
