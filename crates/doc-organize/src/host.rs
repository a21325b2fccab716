//! Commands and events raised by the host
//!
//! Menu commands and lifecycle notifications arrive here and are routed to
//! the pipeline. Settings are read from the store once per call.

use crate::document::Document;
use crate::options::{Settings, SettingsStore};
use crate::organize::{
    on_document_saved, on_layers_resized, organize_document,
    update_callouts_on_selected_artboard,
};
use crate::summary::Summary;
use crate::types::LayerId;
use crate::{OrganizeError, Result};
use chrono::NaiveDateTime;

/// Menu commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// The settings dialog closed; `None` when it was cancelled
    Settings(Option<Settings>),
    OrganizeDocument,
    UpdateCalloutsOnArtboard,
}

/// Lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    DocumentSaved { autosaved: bool },
    LayersResized { layers: Vec<LayerId> },
}

/// What the host should show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Summary(Summary),
    /// Blocking alert
    Alert { title: String, message: String },
    Nothing,
}

impl From<Summary> for Report {
    fn from(summary: Summary) -> Self {
        if summary.is_empty() {
            Report::Nothing
        } else {
            Report::Summary(summary)
        }
    }
}

pub fn dispatch_command<D, S>(
    doc: &mut D,
    store: &mut S,
    command: Command,
    now: &NaiveDateTime,
) -> Result<Report>
where
    D: Document + ?Sized,
    S: SettingsStore + ?Sized,
{
    match command {
        Command::Settings(None) => {
            log::debug!("Settings dialog cancelled");
            Ok(Report::Nothing)
        }
        Command::Settings(Some(settings)) => {
            settings.write_to(store)?;
            Ok(organize_document(doc, &settings, now).into())
        }
        Command::OrganizeDocument => {
            let settings = Settings::from_store(store)?;
            Ok(organize_document(doc, &settings, now).into())
        }
        Command::UpdateCalloutsOnArtboard => {
            let settings = Settings::from_store(store)?;
            match update_callouts_on_selected_artboard(doc, &settings) {
                Ok(summary) => Ok(summary.into()),
                Err(e @ OrganizeError::NoSelection) => Ok(Report::Alert {
                    title: "Update Callouts".to_string(),
                    message: e.to_string(),
                }),
                Err(e) => Err(e),
            }
        }
    }
}

pub fn dispatch_event<D, S>(
    doc: &mut D,
    store: &S,
    event: HostEvent,
    now: &NaiveDateTime,
) -> Result<Report>
where
    D: Document + ?Sized,
    S: SettingsStore + ?Sized,
{
    let settings = Settings::from_store(store)?;
    let summary = match event {
        HostEvent::DocumentSaved { autosaved } => {
            on_document_saved(doc, &settings, autosaved, now)
        }
        HostEvent::LayersResized { layers } => on_layers_resized(doc, &settings, &layers),
    };
    Ok(summary.into())
}
