use super::catalog::{FilterCatalog, FilterDefinition, FilterHandle, FilterKey};
use crate::model::{AppliedFilterRecord, ConfigMap};

/// What an applied filter's definition resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRef {
    /// Own copy, used when no catalog was supplied.
    Detached(FilterDefinition),
    /// Shared catalog entry.
    Bound(FilterHandle),
    /// A catalog was supplied but nothing in it matched.
    Unset,
}

/// A filter attached to one column, with its type-specific configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedFilter {
    filter: FilterRef,
    config: ConfigMap,
}

impl AppliedFilter {
    pub fn new(record: AppliedFilterRecord, available_filters: Option<&FilterCatalog>) -> Self {
        let filter = match (record.filter, available_filters) {
            (Some(def), Some(catalog)) => catalog
                .find(&FilterKey::of(&def))
                .map_or(FilterRef::Unset, FilterRef::Bound),
            (Some(def), None) => FilterRef::Detached(def.into()),
            (None, _) => FilterRef::Unset,
        };
        Self {
            filter,
            config: record.config,
        }
    }

    pub fn filter_ref(&self) -> &FilterRef {
        &self.filter
    }

    pub fn handle(&self) -> Option<FilterHandle> {
        match self.filter {
            FilterRef::Bound(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.filter, FilterRef::Unset)
    }

    /// Point this filter at another catalog entry, e.g. after a selection change.
    pub fn select(&mut self, handle: FilterHandle) {
        self.filter = FilterRef::Bound(handle);
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigMap {
        &mut self.config
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        self.config.get("value")
    }

    /// Resolve the definition. Bound filters read through `catalog`.
    pub fn definition(&self, catalog: Option<&FilterCatalog>) -> Option<FilterDefinition> {
        match &self.filter {
            FilterRef::Detached(def) => Some(def.clone()),
            FilterRef::Bound(handle) => catalog.and_then(|c| c.get(*handle)),
            FilterRef::Unset => None,
        }
    }

    pub fn to_record(&self, catalog: Option<&FilterCatalog>) -> AppliedFilterRecord {
        AppliedFilterRecord {
            filter: self.definition(catalog).map(|def| def.to_record()),
            config: self.config.clone(),
        }
    }
}
