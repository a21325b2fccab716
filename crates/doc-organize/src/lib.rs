pub mod callouts;
pub mod constants;
pub mod date;
pub mod document;
pub mod geometry;
mod host;
pub mod layout;
pub mod numbering;
mod options;
mod organize;
pub mod rounding;
mod summary;
pub mod toc;
mod types;

pub use document::{Document, MemoryDocument, TextMetrics};
pub use host::{Command, HostEvent, Report, dispatch_command, dispatch_event};
pub use options::*;
pub use organize::{
    PageSetup, check_page_setup, on_document_saved, on_layers_resized, organize_document,
    organize_document_async, update_callouts_on_selected_artboard,
};
pub use summary::{Summary, SummaryEntry};
pub use types::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("The current page contains no artboards.")]
    NoArtboards,
    #[error("No symbol with override {slot} found.")]
    MissingTemplate { slot: String },
    #[error("Group named {name} not found on any artboard.")]
    MissingMarker { name: String },
    #[error("{container} must contain a rectangle named {rect}.")]
    MissingSizingRect { container: String, rect: String },
    #[error("No artboard selected")]
    NoSelection,
    #[error("Unknown layer: {0}")]
    UnknownLayer(LayerId),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, OrganizeError>;
