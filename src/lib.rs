pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod lifecycle;
pub mod logger;
pub mod models;
pub mod pagination;
pub mod router;

pub use app::AppState;
pub use catalog::{ImageCatalog, LibraryPage, LibraryView};
pub use config::{Config, GeminiConfig};
pub use error::{ImaginaError, Result};
pub use generator::{GeminiImageClient, ImageGenerator};
pub use lifecycle::{GenerationLifecycle, GenerationOutcome, GenerationState};
pub use models::*;
pub use router::{Router, View};
