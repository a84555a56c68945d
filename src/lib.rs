// BCI signal retrieval
// Main library entry point

pub mod client;
pub mod core;
pub mod models;
pub mod utils;

// Re-export main types
pub use crate::client::http::HttpTreeClient;
pub use crate::client::path_spec::PathSpec;
pub use crate::client::{TreeClient, TreeConnection};
pub use crate::core::channel::{Beam, ChannelSpec, Chord};
pub use crate::core::correction::plasma_induced_phase;
pub use crate::core::error::{BciError, Result, RetrievalCause};
pub use crate::core::retriever::{SignalRequest, SignalRetriever};
pub use crate::core::signal::Signal;
pub use crate::core::window::{TimeWindow, WindowPolicy};
pub use crate::models::config_model::{CorrectionSource, RetrieverConfig};
