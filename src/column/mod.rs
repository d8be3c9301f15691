//! Column model.
//!
//! A [`Column`] is the editable form of a [`ColumnRecord`]. When built against a
//! [`FilterCatalog`] every applied filter is rebound to the catalog entry with the
//! same `(name, filterType)`; `unwrap` flattens it back to a record.

mod catalog;
mod filter;

pub use catalog::{FilterCatalog, FilterDefinition, FilterHandle, FilterKey};
pub use filter::{AppliedFilter, FilterRef};

use crate::model::{AppliedFilterRecord, ColumnRecord};

pub const DEFAULT_WIDTH: u32 = 200;

#[derive(Debug, Clone)]
pub struct Column {
    title: String,
    slug: String,
    width: u32,
    applied_filters: Vec<AppliedFilter>,
    catalog: Option<FilterCatalog>,
}

impl Column {
    /// Build a column from plain data. A zero or missing width becomes [`DEFAULT_WIDTH`].
    pub fn new(data: ColumnRecord, available_filters: Option<&FilterCatalog>) -> Self {
        let applied_filters = data
            .applied_filters
            .into_iter()
            .map(|record| AppliedFilter::new(record, available_filters))
            .collect();
        Self {
            title: data.title.unwrap_or_default(),
            slug: data.slug.unwrap_or_default(),
            width: data.width.filter(|w| *w != 0).unwrap_or(DEFAULT_WIDTH),
            applied_filters,
            catalog: available_filters.cloned(),
        }
    }

    /// Empty column. Filters added later are bound to `available_filters`.
    pub fn blank(available_filters: Option<&FilterCatalog>) -> Self {
        Self::new(ColumnRecord::default(), available_filters)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn applied_filters(&self) -> &[AppliedFilter] {
        &self.applied_filters
    }

    pub fn applied_filter_mut(&mut self, index: usize) -> Option<&mut AppliedFilter> {
        self.applied_filters.get_mut(index)
    }

    /// Catalog this column's filters are bound to, if any.
    pub fn catalog(&self) -> Option<&FilterCatalog> {
        self.catalog.as_ref()
    }

    pub fn filter_definition(&self, index: usize) -> Option<FilterDefinition> {
        self.applied_filters
            .get(index)
            .and_then(|applied| applied.definition(self.catalog.as_ref()))
    }

    /// Attach a filter at the end, binding it to this column's catalog. Returns its index.
    pub fn add_filter(&mut self, record: AppliedFilterRecord) -> usize {
        self.applied_filters
            .push(AppliedFilter::new(record, self.catalog.as_ref()));
        self.applied_filters.len() - 1
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<AppliedFilter> {
        (index < self.applied_filters.len()).then(|| self.applied_filters.remove(index))
    }

    pub fn move_filter(&mut self, from: usize, to: usize) -> bool {
        let len = self.applied_filters.len();
        if from >= len || to >= len {
            return false;
        }
        let applied = self.applied_filters.remove(from);
        self.applied_filters.insert(to, applied);
        true
    }

    /// Flatten to plain data. Bound filters are written out from their catalog entry.
    pub fn unwrap(&self) -> ColumnRecord {
        ColumnRecord {
            title: Some(self.title.clone()),
            slug: Some(self.slug.clone()),
            width: Some(self.width),
            applied_filters: self
                .applied_filters
                .iter()
                .map(|applied| applied.to_record(self.catalog.as_ref()))
                .collect(),
        }
    }
}
