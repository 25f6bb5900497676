// Durable namespace abstraction

use eyre::{Result, eyre};

/// A single named slot holding the serialized record set.
///
/// Backends move opaque text; encoding and decoding the records is the store's
/// job. Each backend is bound to one namespace when it is opened.
pub trait Backend {
    /// Raw slot contents, or `None` when the slot has never been written
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the slot. A reader must never observe a partial write.
    fn persist(&mut self, payload: &str) -> Result<()>;

    /// Opaque marker that changes whenever the slot is rewritten.
    ///
    /// `None` when the slot does not exist.
    fn revision(&self) -> Result<Option<i64>>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn persist(&mut self, payload: &str) -> Result<()> {
        (**self).persist(payload)
    }

    fn revision(&self) -> Result<Option<i64>> {
        (**self).revision()
    }
}

/// In-process backend for tests and ephemeral catalogs
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Option<String>,
    revision: i64,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-existing slot contents
    pub fn with_contents(payload: impl Into<String>) -> Self {
        Self {
            slot: Some(payload.into()),
            revision: 1,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Replace the slot from outside the store, as another process would
    pub fn set_contents(&mut self, payload: impl Into<String>) {
        self.slot = Some(payload.into());
        self.revision += 1;
    }

    /// Make every subsequent `load` fail
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent `persist` fail, like an exhausted storage quota
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(eyre!("memory backend read rejected"));
        }
        Ok(self.slot.clone())
    }

    fn persist(&mut self, payload: &str) -> Result<()> {
        if self.fail_writes {
            return Err(eyre!("memory backend write rejected: quota exceeded"));
        }
        self.slot = Some(payload.to_string());
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> Result<Option<i64>> {
        Ok(self.slot.as_ref().map(|_| self.revision))
    }
}

/// Namespace names become file names and row keys
pub(crate) fn validate_namespace(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(eyre!("Namespace cannot be empty"));
    }
    if name.len() > 64 {
        return Err(eyre!("Namespace too long: {} (max 64 chars)", name));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid namespace: {} (must be alphanumeric with _/-)", name));
    }
    Ok(())
}
