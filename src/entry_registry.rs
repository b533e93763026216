use parking_lot::Mutex;
use std::collections::HashMap;

/// Id reserved for control records.
pub const CONTROL_ENTRY_ID: u32 = 0;

/// A named data stream within one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    pub type_tag: String,
    pub metadata: String,
}

/// Outcome of [`EntryRegistry::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub id: u32,
    /// True when this call allocated the id and the caller must emit Start.
    pub is_new: bool,
}

#[derive(Default)]
struct Inner {
    by_name: HashMap<String, Entry>,
    next_id: u32,
}

/// Maps entry names to stable numeric ids.
///
/// Ids start at 1 and are handed out in first-use order; they are never
/// reused or reassigned while the registry lives. The name table and the id
/// counter share one lock, so two threads racing on the first use of a name
/// observe the same id and the counter neither skips nor repeats.
///
/// # Examples
///
/// ```
/// # use wpilog_logger::entry_registry::EntryRegistry;
/// let registry = EntryRegistry::new();
///
/// let first = registry.resolve("speed", "double");
/// assert_eq!(first.id, 1);
/// assert!(first.is_new);
///
/// // Resolving again returns the same id
/// let again = registry.resolve("speed", "double");
/// assert_eq!(again.id, 1);
/// assert!(!again.is_new);
///
/// // A different name gets the next id
/// assert_eq!(registry.resolve("heading", "double").id, 2);
/// ```
pub struct EntryRegistry {
    inner: Mutex<Inner>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                by_name: HashMap::new(),
                next_id: CONTROL_ENTRY_ID + 1,
            }),
        }
    }

    /// Returns the id for `name`, allocating one on first use.
    ///
    /// `type_tag` is recorded only when the entry is created; later calls do
    /// not change it. Use [`EntryRegistry::get`] to compare tags.
    pub fn resolve(&self, name: &str, type_tag: &str) -> Resolved {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.by_name.get(name) {
            return Resolved {
                id: entry.id,
                is_new: false,
            };
        }

        let id = inner.next_id;
        inner.next_id += 1;
        inner.by_name.insert(
            name.to_string(),
            Entry {
                id,
                name: name.to_string(),
                type_tag: type_tag.to_string(),
                metadata: String::new(),
            },
        );
        Resolved { id, is_new: true }
    }

    /// Looks up an existing entry by name.
    pub fn get(&self, name: &str) -> Option<Entry> {
        self.inner.lock().by_name.get(name).cloned()
    }

    /// Looks up an entry by id.
    pub fn get_by_id(&self, id: u32) -> Option<Entry> {
        if id == CONTROL_ENTRY_ID {
            return None;
        }
        self.inner
            .lock()
            .by_name
            .values()
            .find(|entry| entry.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EntryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
