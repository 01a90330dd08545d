//! Durable per-section state.
//!
//! Sections are keyed by an explicit identity supplied by the host, so state
//! survives the section being torn down and rebuilt at a different position.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Stable identity of one sticky section.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SectionKey(Rc<str>);

impl SectionKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Rc::from(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for SectionKey {
    fn from(value: u64) -> Self {
        Self::new(value.to_string())
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-value store for section state. Writes are last-writer-wins per key.
pub trait SaveableStateRegistry {
    fn read_bool(&self, key: &SectionKey) -> Option<bool>;

    fn write_bool(&self, key: &SectionKey, value: bool);

    /// Forgets everything stored for `key`.
    fn remove(&self, key: &SectionKey);
}

/// In-memory registry, shared by cloning.
#[derive(Clone, Debug, Default)]
pub struct MemorySaveableRegistry {
    values: Rc<RefCell<FxHashMap<SectionKey, bool>>>,
}

impl MemorySaveableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SaveableStateRegistry for MemorySaveableRegistry {
    fn read_bool(&self, key: &SectionKey) -> Option<bool> {
        self.values.borrow().get(key).copied()
    }

    fn write_bool(&self, key: &SectionKey, value: bool) {
        self.values.borrow_mut().insert(key.clone(), value);
    }

    fn remove(&self, key: &SectionKey) {
        self.values.borrow_mut().remove(key);
    }
}
