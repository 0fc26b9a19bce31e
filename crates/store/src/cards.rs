//! Exported card storage
//!
//! Every exported card is a PDF stored as a base64 data URI under
//! `cards/<file name>`, plus an entry in the manifest list stored under
//! [`MANIFEST_KEY`].

use crate::pdf::{render_card_pdf, PdfExportOptions};
use crate::{KeyValueStore, Result, StoreError};
use base64::Engine;
use card_model::{CardData, CardTemplate};
use chrono::{DateTime, SecondsFormat, Utc};
use render_model::CardRender;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Key of the manifest list
pub const MANIFEST_KEY: &str = "card-manifest";

/// Key prefix of stored PDFs
pub const CARD_DIRECTORY: &str = "cards";

/// Prefix of stored PDF data URIs
pub const PDF_DATA_URI_PREFIX: &str = "data:application/pdf;filename=generated.pdf;base64,";

/// Card name used in file names when the card has no `name` value
pub const UNNAMED_CARD: &str = "unnamed";

/// One exported card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardManifestEntry {
    pub id: String,
    pub template_id: String,
    /// The card's `name` value, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pdf_path: String,
    /// ISO-8601 UTC timestamp with milliseconds
    pub created_at: String,
    pub data: CardData,
}

/// Characters that cannot appear inside a single file name component
const PATH_UNSAFE: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Lowercase and replace runs of whitespace or path-unsafe characters with `-`.
///
/// The result is always usable as one path component of a storage key.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() || c.is_control() || PATH_UNSAFE.contains(&c) {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// File name of an exported card: `{template}_{card}_{timestamp}.pdf`
pub fn card_file_name(template: &CardTemplate, data: &CardData, at: DateTime<Utc>) -> String {
    let card_name = data
        .text("name")
        .filter(|name| !name.is_empty())
        .unwrap_or(UNNAMED_CARD);
    let timestamp = iso_timestamp(at).replace([':', '.'], "-");
    format!("{}_{}_{}.pdf", slugify(&template.name), slugify(card_name), timestamp)
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Stores exported cards and their manifest
pub struct CardStorage<S: KeyValueStore> {
    store: S,
    options: PdfExportOptions,
}

impl<S: KeyValueStore> CardStorage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: PdfExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PdfExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PdfExportOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PdfExportOptions) {
        self.options = options;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Export a card to PDF, store it and record it in the manifest.
    ///
    /// Returns the storage path of the PDF.
    pub fn save_card_as_pdf(
        &mut self,
        template: &CardTemplate,
        data: &CardData,
        render: &CardRender,
    ) -> Result<String> {
        let name = data.text("name").filter(|n| !n.is_empty()).map(str::to_string);
        let mut options = self.options.clone();
        if options.title.is_none() {
            options = options.with_title(name.clone().unwrap_or_else(|| template.name.clone()));
        }
        let pdf = render_card_pdf(render, &options)?;
        let mut manifest = self.get_card_manifest()?;

        let now = Utc::now();
        let pdf_path = self.unused_path(&card_file_name(template, data, now))?;
        let data_uri = format!(
            "{}{}",
            PDF_DATA_URI_PREFIX,
            base64::engine::general_purpose::STANDARD.encode(&pdf)
        );
        self.store.set(&pdf_path, &data_uri)?;

        let entry = CardManifestEntry {
            id: format!("card-{}", uuid::Uuid::new_v4().simple()),
            template_id: template.id.clone(),
            name,
            pdf_path: pdf_path.clone(),
            created_at: iso_timestamp(now),
            data: data.clone(),
        };
        manifest.push(entry);
        if let Err(e) = self.save_manifest(&manifest) {
            // Leave no orphaned payload behind
            if let Err(remove_err) = self.store.remove(&pdf_path) {
                warn!(
                    path = %pdf_path,
                    error = %remove_err,
                    "Failed to remove PDF after manifest write error"
                );
            }
            return Err(e);
        }

        info!(path = %pdf_path, bytes = pdf.len(), template = %template.id, "Saved card PDF");
        Ok(pdf_path)
    }

    /// `cards/{file_name}`, with a numeric suffix if that key is taken
    fn unused_path(&self, file_name: &str) -> Result<String> {
        let path = format!("{}/{}", CARD_DIRECTORY, file_name);
        if !self.store.contains(&path)? {
            return Ok(path);
        }
        let stem = file_name.trim_end_matches(".pdf");
        let mut n = 2;
        loop {
            let candidate = format!("{}/{}-{}.pdf", CARD_DIRECTORY, stem, n);
            if !self.store.contains(&candidate)? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// All exported cards, oldest first
    pub fn get_card_manifest(&self) -> Result<Vec<CardManifestEntry>> {
        match self.store.get(MANIFEST_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_manifest(&mut self, manifest: &[CardManifestEntry]) -> Result<()> {
        let json = serde_json::to_string(manifest)?;
        self.store.set(MANIFEST_KEY, &json)
    }

    /// Find a manifest entry by card id
    pub fn find_card(&self, card_id: &str) -> Result<Option<CardManifestEntry>> {
        Ok(self
            .get_card_manifest()?
            .into_iter()
            .find(|entry| entry.id == card_id))
    }

    /// The stored data URI of a PDF
    pub fn get_card_pdf(&self, pdf_path: &str) -> Result<Option<String>> {
        self.store.get(pdf_path)
    }

    /// The decoded bytes of a stored PDF
    pub fn get_card_pdf_bytes(&self, pdf_path: &str) -> Result<Option<Vec<u8>>> {
        let Some(uri) = self.store.get(pdf_path)? else {
            return Ok(None);
        };
        let payload = uri
            .split_once(";base64,")
            .map(|(_, payload)| payload)
            .ok_or_else(|| StoreError::InvalidFormat(format!("{} is not a base64 data URI", pdf_path)))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| StoreError::InvalidFormat(format!("{}: {}", pdf_path, e)))?;
        Ok(Some(bytes))
    }

    /// Remove a card's manifest entry and its PDF; returns whether the card existed
    pub fn delete_card(&mut self, card_id: &str) -> Result<bool> {
        let mut manifest = self.get_card_manifest()?;
        let Some(index) = manifest.iter().position(|entry| entry.id == card_id) else {
            warn!(card = %card_id, "Delete requested for unknown card");
            return Ok(false);
        };
        let entry = manifest.remove(index);
        self.store.remove(&entry.pdf_path)?;
        self.save_manifest(&manifest)?;
        info!(card = %card_id, path = %entry.pdf_path, "Deleted card");
        Ok(true)
    }
}
