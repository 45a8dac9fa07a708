use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, Result};

/// Append-only failure log shared by every file of a run.
///
/// Each record is a single `"<message> <file>\n"` write to a file opened in
/// append mode, so concurrent writers never interleave within a line.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, message: &str, file: &Path) -> Result<()> {
        let line = format!("{message} {}\n", file.display());
        let io_error = |source| MigrateError::Io {
            path: self.path.clone(),
            source,
        };

        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        out.write_all(line.as_bytes()).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn records_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.txt"));

        log.record("first failure", Path::new("src/A.tsx")).unwrap();
        log.record("first failure", Path::new("src/A.tsx")).unwrap();
        log.record("second", Path::new("src/B.tsx")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents,
            "first failure src/A.tsx\nfirst failure src/A.tsx\nsecond src/B.tsx\n"
        );
    }

    #[test]
    fn concurrent_writers_keep_lines_whole() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.txt"));

        std::thread::scope(|scope| {
            for i in 0..8 {
                let log = &log;
                scope.spawn(move || {
                    for _ in 0..25 {
                        log.record(&format!("failure {i}"), Path::new("x.tsx")).unwrap();
                    }
                });
            }
        });

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 200);
        assert!(contents.lines().all(|line| line.starts_with("failure ") && line.ends_with(" x.tsx")));
    }
}
