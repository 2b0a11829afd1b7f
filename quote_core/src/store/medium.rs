//! Key-value media the project store can sit on.

use std::collections::HashMap;

use crate::errors::{QuoteError, QuoteResult};

/// A durable (or fake) string-keyed blob store.
///
/// Implementations are synchronous and single-writer. Reads of a key that
/// was never written return `Ok(None)`.
pub trait KeyValueMedium {
    /// Read the blob stored under `key`.
    fn read(&self, key: &str) -> QuoteResult<Option<String>>;

    /// Replace the blob stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> QuoteResult<()>;
}

/// In-process medium backed by a `HashMap`.
///
/// Can be set to reject writes, which is how tests simulate a full medium.
#[derive(Debug, Default, Clone)]
pub struct MemoryMedium {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Medium pre-loaded with one blob.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryMedium {
            entries,
            read_only: false,
        }
    }

    /// When set, every write fails with a persistence error.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Raw blob under `key`, for inspection.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueMedium for MemoryMedium {
    fn read(&self, key: &str) -> QuoteResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> QuoteResult<()> {
        if self.read_only {
            return Err(QuoteError::persistence("write", key, "medium quota exceeded"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
