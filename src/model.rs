//! Core data model for service logs.
//!
//! Drafts hold raw [`FormValues`]; service logs hold validated
//! [`ServiceLogFields`]. The two stores never share an entity: promotion
//! copies values into a new log and discards the draft.

mod draft;
mod form_values;
mod service_log;
mod service_type;

pub use draft::Draft;
pub use form_values::FormValues;
pub use service_log::{ServiceLog, ServiceLogFields};
pub use service_type::{DraftSaveStatus, ServiceType};
