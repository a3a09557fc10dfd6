//! The uploaded résumé file and its encodings for the backend.

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
const PDF_MEDIA_TYPE: &str = "application/pdf";
/// The PDF text layer is cut to this many chars before it is sent along.
const MAX_TEXT_LAYER_CHARS: usize = 20_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    pub bytes: Bytes,
    pub media_type: String,
    pub file_name: String,
}

/// What a session snapshot reveals about the upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: usize,
}

impl ResumeDocument {
    /// Builds a document from raw bytes. Empty uploads are refused.
    pub fn new(
        bytes: Bytes,
        media_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation(
                "The uploaded resume is empty".to_string(),
            ));
        }
        let file_name = file_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("resume")
            .to_string();
        let media_type = media_type
            .map(str::trim)
            .filter(|m| !m.is_empty() && *m != DEFAULT_MEDIA_TYPE)
            .map(str::to_string)
            .or_else(|| guess_media_type(&file_name).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());

        Ok(Self {
            bytes,
            media_type,
            file_name,
        })
    }

    /// Decodes raw base64 or a `data:<mime>;base64,<payload>` URL.
    /// An explicit `media_type` wins over the one embedded in the URL.
    pub fn from_base64(
        encoded: &str,
        media_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, AppError> {
        let encoded = encoded.trim();
        let (url_media_type, payload) = match encoded.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    AppError::Validation("Malformed data URL for resume".to_string())
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    AppError::Validation("Resume data URL must be base64-encoded".to_string())
                })?;
                (Some(mime), payload)
            }
            None => (None, encoded),
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::Validation(format!("Resume is not valid base64: {e}")))?;

        let media_type = media_type
            .filter(|m| !m.trim().is_empty())
            .or(url_media_type.filter(|m| !m.is_empty()));
        Self::new(Bytes::from(bytes), media_type, file_name)
    }

    /// Inline form the chat-completion backend accepts as an image part.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            STANDARD.encode(&self.bytes)
        )
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            file_name: self.file_name.clone(),
            media_type: self.media_type.clone(),
            size_bytes: self.bytes.len(),
        }
    }

    /// Embedded text of a PDF, if it has one.
    ///
    /// Runs on the blocking pool; the PDF parser may panic on hostile input,
    /// which surfaces here as a join error and reads as "no text layer".
    pub async fn pdf_text_layer(&self) -> Option<String> {
        if !self.is_pdf() {
            return None;
        }
        let bytes = self.bytes.clone();
        let extracted =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

        match extracted {
            Ok(Ok(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(text.chars().take(MAX_TEXT_LAYER_CHARS).collect())
            }
            Ok(Err(e)) => {
                debug!("No usable PDF text layer in {}: {e}", self.file_name);
                None
            }
            Err(e) => {
                debug!("PDF text extraction aborted for {}: {e}", self.file_name);
                None
            }
        }
    }
}

fn guess_media_type(file_name: &str) -> Option<&'static str> {
    let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(PDF_MEDIA_TYPE),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}
