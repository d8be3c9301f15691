//! Shared catalog of filter definitions.
//!
//! Columns never hold their own copy of a catalog entry once bound; they hold a
//! [`FilterHandle`] and read through the catalog, so an edit to an entry is seen by
//! every column bound to it.

use crate::model::{ConfigMap, FilterRecord};
use std::cell::RefCell;
use std::rc::Rc;

/// Matching identity of a filter definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    pub name: String,
    pub filter_type: String,
}

impl FilterKey {
    pub fn new(name: impl Into<String>, filter_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filter_type: filter_type.into(),
        }
    }

    pub fn of(record: &FilterRecord) -> Self {
        Self::new(record.name.clone(), record.filter_type.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDefinition {
    record: FilterRecord,
}

impl FilterDefinition {
    pub fn new(record: FilterRecord) -> Self {
        Self { record }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn filter_type(&self) -> &str {
        &self.record.filter_type
    }

    pub fn key(&self) -> FilterKey {
        FilterKey::of(&self.record)
    }

    pub fn matches(&self, key: &FilterKey) -> bool {
        self.record.name == key.name && self.record.filter_type == key.filter_type
    }

    pub fn config(&self) -> &ConfigMap {
        &self.record.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigMap {
        &mut self.record.config
    }

    pub fn to_record(&self) -> FilterRecord {
        self.record.clone()
    }
}

impl From<FilterRecord> for FilterDefinition {
    fn from(record: FilterRecord) -> Self {
        Self::new(record)
    }
}

/// Position of an entry inside a [`FilterCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterHandle(usize);

impl FilterHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered filter catalog. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct FilterCatalog {
    entries: Rc<RefCell<Vec<FilterDefinition>>>,
}

impl FilterCatalog {
    pub fn from_records(records: impl IntoIterator<Item = FilterRecord>) -> Self {
        let entries = records.into_iter().map(FilterDefinition::new).collect();
        Self {
            entries: Rc::new(RefCell::new(entries)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// First entry whose `(name, filterType)` equals `key`.
    pub fn find(&self, key: &FilterKey) -> Option<FilterHandle> {
        self.entries
            .borrow()
            .iter()
            .position(|entry| entry.matches(key))
            .map(FilterHandle)
    }

    pub fn get(&self, handle: FilterHandle) -> Option<FilterDefinition> {
        self.entries.borrow().get(handle.0).cloned()
    }

    pub fn records(&self) -> Vec<FilterRecord> {
        self.entries
            .borrow()
            .iter()
            .map(FilterDefinition::to_record)
            .collect()
    }

    /// Mutate one entry in place. Returns `false` when the handle is out of range.
    pub fn update(&self, handle: FilterHandle, f: impl FnOnce(&mut FilterDefinition)) -> bool {
        match self.entries.borrow_mut().get_mut(handle.0) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    /// Whether both values refer to the same underlying entries.
    pub fn same_catalog(&self, other: &FilterCatalog) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}
