// Namespace stored as a single JSON document on disk

use crate::backend::{Backend, validate_namespace};
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `<dir>/<namespace>.json` by replacing it wholesale.
///
/// Each write lands in a temp file that is synced and renamed over the target
/// under an exclusive lock on `<dir>/<namespace>.lock`. The lock covers one
/// write only: two processes running a read-modify-write cycle at the same
/// time still race, and the last write wins.
///
/// Every write also bumps a counter in `<dir>/<namespace>.rev`, which is the
/// backend's revision. A document without a counter file reads as revision 0.
pub struct JsonFileBackend {
    dir: PathBuf,
    namespace: String,
}

impl JsonFileBackend {
    /// Open the namespace under `dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(dir: P, namespace: &str) -> Result<Self> {
        validate_namespace(namespace)?;
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create store directory")?;

        Ok(Self {
            dir,
            namespace: namespace.to_string(),
        })
    }

    /// Path of the JSON document
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.namespace))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.lock", self.namespace))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", self.namespace))
    }

    fn rev_path(&self) -> PathBuf {
        self.dir.join(format!("{}.rev", self.namespace))
    }

    fn read_counter(&self) -> Result<i64> {
        let rev_path = self.rev_path();
        if !rev_path.exists() {
            return Ok(0);
        }
        let raw = fs::read_to_string(&rev_path).with_context(|| format!("Failed to read {}", rev_path.display()))?;
        raw.trim()
            .parse()
            .with_context(|| format!("Invalid revision in {}", rev_path.display()))
    }
}

/// Sync `contents` into `temp` and rename it over `target`
fn replace_file(temp: &Path, target: &Path, contents: &[u8]) -> Result<()> {
    let mut file = File::create(temp).context("Failed to create temp file")?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(temp, target).with_context(|| format!("Failed to replace {}", target.display()))
}

impl Backend for JsonFileBackend {
    fn load(&self) -> Result<Option<String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(contents))
    }

    fn persist(&mut self, payload: &str) -> Result<()> {
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .context("Failed to open lock file")?;

        // Acquire exclusive lock before writing
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        // A corrupt counter restarts from 0 rather than blocking the write
        let next = self.read_counter().unwrap_or(0) + 1;

        let path = self.path();
        replace_file(&self.temp_path(), &path, payload.as_bytes())?;

        // Document first, counter second: a reader may see new contents under
        // the old revision and reload once more, never the reverse
        let rev_path = self.rev_path();
        let rev_temp = self.dir.join(format!(".{}.rev.tmp", self.namespace));
        replace_file(&rev_temp, &rev_path, next.to_string().as_bytes())?;
        debug!(path = ?path, bytes = payload.len(), revision = next, "Wrote namespace file");

        // Lock is released when `lock` is dropped
        Ok(())
    }

    fn revision(&self) -> Result<Option<i64>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.read_counter()?))
    }
}
