//! `fleetbook` - Keep track of a fleet of vehicles
//!
//! This library provides the form controller that edits vehicle records and
//! keeps them in sync with a document collection, together with the
//! collection backends, validation, and configuration it relies on.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod record;
pub mod session;
pub mod store;
pub mod validate;

pub use cache::RecordCache;
pub use config::{Config, RefreshPolicy, SessionConfig};
pub use controller::{FormController, FormView, SubmitOutcome};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Draft, Field, Record, RecordFields, RecordId};
pub use session::{EditMode, EditSession};
pub use store::{DocumentStore, InMemoryStore, SqliteStore, StoreError};
pub use validate::{validate, ValidationError};
