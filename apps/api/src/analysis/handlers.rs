//! Axum route handlers for the analysis API.

use axum::async_trait;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header;
use axum::{Form, Json};
use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::analyze_resume;
use crate::errors::AppError;
use crate::extraction::extract_document;
use crate::models::analysis::ResumeAnalysis;
use crate::state::AppState;

/// Where the résumé text comes from.
#[derive(Debug)]
pub enum ResumeSource {
    Document { filename: String, bytes: Bytes },
    Text(String),
}

#[derive(Debug)]
pub struct AnalysisRequest {
    pub source: ResumeSource,
    pub job_description: Option<String>,
}

/// Raw form fields before validation, from a multipart or urlencoded body.
#[derive(Debug, Default)]
pub struct AnalysisForm {
    file: Option<(String, Bytes)>,
    text: Option<String>,
    job_description: Option<String>,
}

impl AnalysisForm {
    /// The file wins when both inputs are supplied.
    fn into_request(self, require_job_description: bool) -> Result<AnalysisRequest, AppError> {
        let source = match (self.file, self.text) {
            (Some((filename, bytes)), _) => ResumeSource::Document { filename, bytes },
            (None, Some(text)) => ResumeSource::Text(text),
            (None, None) => return Err(AppError::MissingInput),
        };

        if require_job_description && self.job_description.is_none() {
            return Err(AppError::Validation(
                "jobDescription is required".to_string(),
            ));
        }

        Ok(AnalysisRequest {
            source,
            job_description: self.job_description,
        })
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart form: {}", e.body_text()))
}

fn non_blank(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

async fn read_capped(mut field: Field<'_>, max_bytes: usize) -> Result<Bytes, AppError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::FileTooLarge { max_bytes });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data.freeze())
}

async fn read_form(mut multipart: Multipart, max_bytes: usize) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = read_capped(field, max_bytes).await?;
                // browsers send an empty unnamed part when no file is chosen
                if !(filename.is_empty() && bytes.is_empty()) {
                    form.file = Some((filename, bytes));
                }
            }
            "text" => {
                form.text = non_blank(field.text().await.map_err(multipart_error)?);
            }
            "jobDescription" => {
                form.job_description = non_blank(field.text().await.map_err(multipart_error)?);
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(form)
}

/// The urlencoded body carries no file part.
#[derive(Debug, Deserialize)]
struct UrlEncodedFields {
    text: Option<String>,
    #[serde(rename = "jobDescription")]
    job_description: Option<String>,
}

#[async_trait]
impl FromRequest<AppState> for AnalysisForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let empty_body = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .is_some_and(|value| value.as_bytes() == b"0");

        if content_type.is_empty() || empty_body {
            return Err(AppError::MissingInput);
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<UrlEncodedFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            return Ok(AnalysisForm {
                file: None,
                text: fields.text.and_then(non_blank),
                job_description: fields.job_description.and_then(non_blank),
            });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_form(multipart, state.config.max_upload_bytes).await
    }
}

async fn run_analysis(state: &AppState, request: AnalysisRequest) -> Result<ResumeAnalysis, AppError> {
    let text = match request.source {
        ResumeSource::Document { filename, bytes } => {
            info!(%filename, size = bytes.len(), "Analyzing uploaded résumé");
            extract_document(&filename, bytes).await?
        }
        ResumeSource::Text(text) => {
            info!(chars = text.chars().count(), "Analyzing résumé text");
            text
        }
    };

    Ok(analyze_resume(&text, request.job_description.as_deref(), state.llm.as_ref()).await)
}

/// POST /api/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    form: AnalysisForm,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let mut request = form.into_request(false)?;
    // the plain endpoint never tailors to a job description
    request.job_description = None;
    Ok(Json(run_analysis(&state, request).await?))
}

/// POST /api/resume/analyze/jobrole
pub async fn handle_analyze_jobrole(
    State(state): State<AppState>,
    form: AnalysisForm,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let request = form.into_request(true)?;
    Ok(Json(run_analysis(&state, request).await?))
}
