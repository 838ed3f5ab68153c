use std::fs::{ self, File };
use std::io::{ BufWriter, Write };
use std::path::{ Path, PathBuf };
use log::info;
use thiserror::Error;
use crate::history::ConversationStore;
use crate::models::chat::ChatExport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No chat history to export.")]
    EmptyConversation,
    #[error("Export file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn build_export(store: &ConversationStore) -> Result<ChatExport, ExportError> {
    if store.is_empty() {
        return Err(ExportError::EmptyConversation);
    }
    Ok(ChatExport::new(store.snapshot()))
}

/// Writes `export` as pretty JSON into `dir`, returning the file path.
pub fn write_export(export: &ChatExport, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export.file_name());
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writer.flush()?;
    info!("Exported {} messages to {}", export.messages.len(), path.display());
    Ok(path)
}
