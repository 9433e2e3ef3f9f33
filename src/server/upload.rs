// 📤 Upload Intake - request body → RecipeSubmission
//
// Create and update accept `multipart/form-data` (the only way to attach an
// image) or `application/x-www-form-urlencoded`.

use crate::entities::RecipeImage;
use crate::intake::RecipeSubmission;
use crate::server::ApiError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use tracing::debug;

/// Name of the multipart part carrying the picture
pub const IMAGE_FIELD: &str = "image";

/// Limits applied to an uploaded image before it reaches the store.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_image_bytes: usize,
}

impl UploadPolicy {
    pub fn new(max_image_bytes: usize) -> Self {
        UploadPolicy { max_image_bytes }
    }

    /// MIME type first, then size.
    pub fn check(&self, content_type: Option<&str>, len: usize) -> Result<(), ApiError> {
        let is_image = content_type.map_or(false, |ct| ct.starts_with("image/"));
        if !is_image {
            return Err(ApiError::Upload("Only image files are allowed".to_string()));
        }

        if len > self.max_image_bytes {
            return Err(ApiError::Upload(format!(
                "Image file size must be under {}",
                format_size(self.max_image_bytes)
            )));
        }

        Ok(())
    }
}

/// Largest exact unit: "5MB", "512KB", "1500B".
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    match bytes {
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= KB && b % KB == 0 => format!("{}KB", b / KB),
        b => format!("{}B", b),
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        UploadPolicy::new(crate::config::DEFAULT_MAX_IMAGE_BYTES)
    }
}

/// Read the create/update field bundle from a request body.
pub async fn read_submission(request: Request, policy: &UploadPolicy) -> Result<RecipeSubmission, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| ApiError::rejected(rejection.status(), rejection.body_text()))?;
        read_multipart(multipart, policy).await
    } else {
        let Form(fields) = Form::<Vec<(String, String)>>::from_request(request, &())
            .await
            .map_err(|rejection| ApiError::rejected(rejection.status(), rejection.body_text()))?;
        Ok(RecipeSubmission::from_fields(fields))
    }
}

async fn read_multipart(mut multipart: Multipart, policy: &UploadPolicy) -> Result<RecipeSubmission, ApiError> {
    let mut submission = RecipeSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

            // Browsers send an empty part when no file was chosen.
            if data.is_empty() {
                continue;
            }

            policy.check(content_type.as_deref(), data.len())?;
            debug!(bytes = data.len(), content_type = ?content_type, "received recipe image");
            submission.image = Some(RecipeImage::new(data.to_vec(), content_type.unwrap_or_default()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            submission.set_field(&name, value);
        }
    }

    Ok(submission)
}
