pub mod cli;
pub mod column;
pub mod logging;
pub mod model;
pub mod session;
mod text_summary;
#[cfg(test)]
mod test_support;

pub use column::{
    AppliedFilter, Column, FilterCatalog, FilterDefinition, FilterHandle, FilterKey, FilterRef,
};
pub use model::{ColumnRecord, FilterRecord, SessionEvent, SessionMode};
pub use session::{ControllerOptions, EditColumnController, ReportContext, SlugClient};
