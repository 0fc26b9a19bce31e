//! File I/O for exported cards

use crate::{CardStorage, KeyValueStore, Result, StoreError};
use std::path::Path;

fn stored_pdf<S: KeyValueStore>(storage: &CardStorage<S>, pdf_path: &str) -> Result<Vec<u8>> {
    storage
        .get_card_pdf_bytes(pdf_path)?
        .ok_or_else(|| StoreError::FileNotFound(pdf_path.to_string()))
}

/// Write a stored card PDF to a file
pub async fn save_card_pdf_file<S: KeyValueStore>(
    storage: &CardStorage<S>,
    pdf_path: &str,
    destination: impl AsRef<Path>,
) -> Result<()> {
    let bytes = stored_pdf(storage, pdf_path)?;
    tokio::fs::write(destination, bytes).await?;
    Ok(())
}

/// Write a stored card PDF to a file synchronously
pub fn save_card_pdf_file_sync<S: KeyValueStore>(
    storage: &CardStorage<S>,
    pdf_path: &str,
    destination: impl AsRef<Path>,
) -> Result<()> {
    let bytes = stored_pdf(storage, pdf_path)?;
    std::fs::write(destination, bytes)?;
    Ok(())
}
