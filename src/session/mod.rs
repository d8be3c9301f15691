//! Column edit session.
//!
//! The controller is the only entry point UI layers talk to. It owns the filter
//! catalog, the live column, and slug suggestion refreshes against the remote
//! endpoint.

mod context;
mod controller;
mod slug;

pub use context::ReportContext;
pub use controller::{ControllerOptions, EditColumnController};
pub use slug::{SlugClient, SlugEndpoint};
