#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// A bilingual chargeback log covering the FEB W2 and FEB W3 2026 review
/// weeks, with one row outside both windows and one unparseable date.
pub fn sample_log() -> String {
    let mut csv = String::from("Date,Amount,Currency,PG,Product,Reason,Market\n");
    // FEB W2 (2026-02-07 ~ 2026-02-13)
    csv.push_str("2026-02-07,$100.00,USD,PG-A,Pro,fraud,US\n");
    csv.push_str("2026-02-09,₩50000,KRW,PG-B,Basic,duplicate,KR\n");
    csv.push_str("02/10/2026,25.50,USD,PG-A,Pro,fraud,US\n");
    // FEB W3 (2026-02-14 ~ 2026-02-20)
    csv.push_str("2026-02-14,\"1,000.00\",USD,PG-A,Pro,fraud,US\n");
    csv.push_str("2026/02/18,200,USD,PG-C,Basic,,JP\n");
    csv.push_str("2026-02-20,abc,USD,PG-A,Pro,credit,US\n");
    // outside both windows
    csv.push_str("2026-03-01,75,USD,PG-A,Pro,fraud,US\n");
    // unparseable date, always dropped by range filtering
    csv.push_str("soon,10,USD,PG-A,Pro,fraud,US\n");
    csv
}
