//! Flat memo of retrieved file descriptions.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use open_midrange_access::{HostSystem, QualifiedName};

use crate::describe::FileDescription;
use crate::format::RecordFormat;
use crate::Result;

/// Caches retrieved descriptions per qualified file name.
///
/// A plain key-value memo: no expiry, no size bound. Descriptions change
/// only when the remote file is recompiled, so callers invalidate
/// explicitly when they know that happened.
#[derive(Debug, Default)]
pub struct DescriptionCache {
    entries: Mutex<HashMap<String, Arc<Vec<RecordFormat>>>>,
}

impl DescriptionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached description, if present.
    pub fn get(&self, file: &QualifiedName) -> Option<Arc<Vec<RecordFormat>>> {
        self.entries.lock().get(&file.to_string()).cloned()
    }

    /// Cached description, retrieving and memoizing on miss.
    pub fn get_or_retrieve(
        &self,
        system: &HostSystem,
        file: &QualifiedName,
    ) -> Result<Arc<Vec<RecordFormat>>> {
        if let Some(formats) = self.get(file) {
            return Ok(formats);
        }
        debug!(file = %file, "description cache miss");
        let formats = Arc::new(FileDescription::retrieve(system, file)?);
        self.entries
            .lock()
            .insert(file.to_string(), Arc::clone(&formats));
        Ok(formats)
    }

    /// Drop one entry.
    pub fn invalidate(&self, file: &QualifiedName) {
        self.entries.lock().remove(&file.to_string());
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FieldDescription;
    use open_midrange_record::FieldKind;

    fn format(file: &QualifiedName) -> RecordFormat {
        RecordFormat {
            name: "REC".to_string(),
            file: file.clone(),
            text: String::new(),
            record_length: 10,
            fields: vec![FieldDescription {
                name: "F1".to_string(),
                kind: FieldKind::Char(10),
                text: String::new(),
                buffer_offset: 0,
                key_sequence: None,
            }],
        }
    }

    #[test]
    fn memoizes_by_qualified_name() {
        let cache = DescriptionCache::new();
        let file = QualifiedName::new("LIB", "FILE").unwrap();
        assert!(cache.get(&file).is_none());

        cache
            .entries
            .lock()
            .insert(file.to_string(), Arc::new(vec![format(&file)]));
        assert_eq!(cache.get(&file).unwrap().len(), 1);
        assert_eq!(cache.len(), 1);

        let other = QualifiedName::new("LIB2", "FILE").unwrap();
        assert!(cache.get(&other).is_none());

        cache.invalidate(&file);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = DescriptionCache::new();
        for lib in ["A", "B", "C"] {
            let file = QualifiedName::new(lib, "FILE").unwrap();
            cache
                .entries
                .lock()
                .insert(file.to_string(), Arc::new(vec![format(&file)]));
        }
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
    }
}
