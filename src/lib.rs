//! Mera Paudha: plant profile lookup
//!
//! Looks a plant up by common name in a local CSV store. On a miss it asks a
//! text-generation model for a profile, stores the parsed result and serves it
//! from the store from then on.
//!
//! - `store/`: CSV-backed sparse table, label rules, starred-column cleanup
//! - `lookup`: case-insensitive exists/fetch over the store
//! - `profile/`: prompt assembly + chat-completions client
//! - `ingest`: response parsing and store append
//! - `sync`: git commit + push of the store file
//! - `service`: the detail-lookup flow used by the pages
//! - `api_server` / `web/`: Axum router and Askama pages (feature `api`)

pub mod config;
pub mod error;
pub mod ingest;
pub mod lookup;
pub mod profile;
pub mod service;
pub mod store;
pub mod sync;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{PlantError, Result};
pub use ingest::{IngestReport, ResponseIngestor};
pub use lookup::LookupService;
pub use profile::{ProfileGenerator, TextGenerator};
pub use service::{DetailSource, PlantDetails, PlantService};
pub use store::{PlantRecord, PlantTable, RecordStore};
pub use sync::{DisabledPublisher, GitPublisher, Publisher};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
