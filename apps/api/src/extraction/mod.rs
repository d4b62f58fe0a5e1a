//! Text extraction: turns an uploaded résumé into plain text.
//!
//! The document kind is resolved once from the filename and matched
//! exhaustively. PDF and DOCX parsing is CPU-bound, so it runs on the blocking
//! pool; a parser panic is reported the same way as a parser error.

mod docx;

use std::fmt;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::{panic_message, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Unsupported,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let name = filename.trim().to_lowercase();
        if name.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if name.ends_with(".docx") {
            DocumentKind::Docx
        } else if name.ends_with(".txt") {
            DocumentKind::Txt
        } else {
            DocumentKind::Unsupported
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Txt => "TXT",
            DocumentKind::Unsupported => "unsupported document",
        };
        f.write_str(label)
    }
}

/// Extracts plain text from an uploaded document.
pub async fn extract_document(filename: &str, bytes: Bytes) -> Result<String, AppError> {
    let kind = DocumentKind::from_filename(filename);
    debug!(%kind, filename, size = bytes.len(), "Extracting document text");

    let result = match kind {
        DocumentKind::Unsupported => return Err(AppError::UnsupportedFormat),
        DocumentKind::Txt => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
        DocumentKind::Pdf => {
            parse_blocking(bytes, |b| extract_pdf_text(b).map_err(|e| e.to_string())).await
        }
        DocumentKind::Docx => {
            parse_blocking(bytes, |b| {
                docx::extract_docx_text(b).map_err(|e| format!("{e:#}"))
            })
            .await
        }
    };

    result.map_err(|message| {
        warn!(%kind, filename, "Document extraction failed: {message}");
        AppError::CorruptDocument { kind, message }
    })
}

async fn parse_blocking<F>(bytes: Bytes, parse: F) -> Result<String, String>
where
    F: FnOnce(&[u8]) -> Result<String, String> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || parse(&bytes)).await {
        Ok(parsed) => parsed,
        Err(join_err) if join_err.is_panic() => Err(panic_message(join_err.into_panic())),
        Err(join_err) => Err(join_err.to_string()),
    }
}

/// Page texts joined with newlines.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, pdf_extract::OutputError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)?;
    Ok(pages.join("\n").trim().to_string())
}
