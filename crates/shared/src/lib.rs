// Public modules
pub mod classifier;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod http;
pub mod io;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use classifier::Classifier;
pub use config::{Config, ProviderConfig, ProviderKind};
pub use error::{ExtractError, HttpError, ParseError, ProviderError};
pub use extractor::ContentExtractor;
pub use fallback::KeywordClassifier;
pub use http::{HttpClient, MockClient, ReqwestClient};
pub use io::{default_exports_dir, export_filename, export_saves, load_export};
pub use models::{Category, ClassificationResult, ExtractedContent, Platform, SavedItem};
pub use parser::parse_classification;
pub use pipeline::{find_first_url, IngestOutcome, LinkIngestor, ProcessedLink};
pub use providers::ClassificationProvider;
pub use store::{NewSave, SaveStore};
