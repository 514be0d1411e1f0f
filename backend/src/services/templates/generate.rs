//! # Document Generation Service
//!
//! Backend logic for `POST /api/templates/{template_id}/generate`.
//!
//! ## Workflow
//!
//! 1.  The template is loaded and its variables extracted.
//! 2.  The multipart form is read: one text field per variable plus an
//!     optional `signature` file. The whole body is capped at the configured
//!     upload limit. Fields that are not variables are ignored.
//! 3.  Blank or absent values abort with `422` naming every missing variable.
//! 4.  The signature, if any, is kept in the signatures folder.
//! 5.  Rendering and PDF composition run on the blocking thread pool.
//! 6.  The PDF is stored, an audit record with the submitted values is
//!     inserted, and the PDF is returned as an attachment.
//!
//! A failure at any step ends the request; later steps are not attempted.

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::pipeline::filename::unique_filename;
use crate::pipeline::missing_variables;
use crate::pipeline::variables::extract_variables;
use crate::state::AppState;
use crate::storage::Folder;
use actix_multipart::{Field, Multipart};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::model::audit::AuditValues;
use futures_util::StreamExt;
use log::{debug, info};
use std::collections::HashMap;

const SIGNATURE_FIELD: &str = "signature";
const DOCUMENT_ID_HEADER: &str = "X-Document-Id";

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct GenerationForm {
    values: HashMap<String, String>,
    signature: Option<Upload>,
}

/// Appends the remaining chunks of `field` to `buf`, failing once the
/// request has carried more than `limit` bytes in total.
async fn read_field(
    field: &mut Field,
    buf: &mut Vec<u8>,
    received: &mut usize,
    limit: usize,
) -> Result<(), AppError> {
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        *received += chunk.len();
        if *received > limit {
            return Err(AppError::BadRequest(format!(
                "upload exceeds the limit of {limit} bytes"
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(())
}

async fn read_form(
    payload: &mut Multipart,
    variables: &[String],
    limit: usize,
) -> Result<GenerationForm, AppError> {
    let mut form = GenerationForm::default();
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_string),
                cd.get_filename().map(str::to_string),
            ),
            None => (None, None),
        };

        let mut buf = Vec::new();
        read_field(&mut field, &mut buf, &mut received, limit).await?;

        match name.as_deref() {
            Some(SIGNATURE_FIELD) => {
                let filename = filename.unwrap_or_default();
                // Browsers send an empty part when no file was chosen.
                if !filename.is_empty() && !buf.is_empty() {
                    form.signature = Some(Upload {
                        filename,
                        bytes: buf,
                    });
                }
            }
            Some(name) if variables.iter().any(|v| v == name) => {
                let value = String::from_utf8(buf).map_err(|_| {
                    AppError::BadRequest(format!("field `{name}` is not valid UTF-8"))
                })?;
                form.values.insert(name.to_string(), value.trim().to_string());
            }
            other => debug!("Ignoring form field {:?}", other),
        }
    }
    Ok(form)
}

/// Actix web handler for `POST /api/templates/{template_id}/generate`.
///
/// # Returns
/// - `200 OK` with `application/pdf` content, an attachment disposition and
///   the new record's id in the `X-Document-Id` header.
/// - `404 Not Found` for an unknown template.
/// - `422 Unprocessable Entity` when values are missing or the template
///   cannot be rendered.
/// - `400 Bad Request` for malformed or oversized forms.
pub async fn process(
    user: CurrentUser,
    state: web::Data<AppState>,
    template_id: web::Path<i64>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let template = state
        .db
        .get_template(template_id.into_inner())?
        .ok_or(AppError::NotFound("template"))?;
    let variables = extract_variables(&template.template_text);
    let form = read_form(&mut payload, &variables, state.config.server.upload_limit).await?;

    let missing = missing_variables(&variables, &form.values);
    if !missing.is_empty() {
        return Err(AppError::MissingVariables(missing));
    }

    let signature = match form.signature {
        Some(upload) => {
            let stored = unique_filename(&upload.filename);
            state.files.save(Folder::Signatures, &stored, &upload.bytes)?;
            debug!("Signature {} saved as {}", upload.filename, stored);
            Some(upload.bytes)
        }
        None => None,
    };

    let pipeline = state.pipeline.clone();
    let body = template.template_text.clone();
    let values = form.values;
    let (pdf, values) = tokio::task::spawn_blocking(move || {
        let result = pipeline.generate(&body, &variables, &values, signature.as_deref());
        (result, values)
    })
    .await?;
    let pdf = pdf?;

    state.files.save(Folder::Pdfs, &pdf.filename, &pdf.bytes)?;
    let record = state
        .db
        .insert_document(template.id, &pdf.filename, &AuditValues::from(values))?;
    info!(
        "{} generated document {} from template {}",
        user.username, record.id, template.id
    );

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(pdf.filename)],
        })
        .insert_header((DOCUMENT_ID_HEADER, record.id.to_string()))
        .body(pdf.bytes))
}
