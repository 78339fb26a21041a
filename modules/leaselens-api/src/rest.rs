use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::warn;

use leaselens_common::{
    AnalysisRequest, LeaseLensError, ListingImage, ALLOWED_IMAGE_TYPES, MAX_IMAGES,
};

use crate::AppState;

/// `POST /analyze` — multipart form: `listing_text` (required),
/// `address` (optional), `university`, and up to five `images` parts.
/// Unsupported image types and extra images are ignored, not rejected.
pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut listing_text = String::new();
    let mut address: Option<String> = None;
    let mut university = String::new();
    let mut images: Vec<ListingImage> = Vec::new();
    let mut skipped_images = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("malformed multipart body: {e}")})),
                )
                    .into_response();
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "listing_text" => listing_text = field.text().await.unwrap_or_default(),
            "address" => {
                let value = field.text().await.unwrap_or_default();
                if !value.trim().is_empty() {
                    address = Some(value);
                }
            }
            "university" => university = field.text().await.unwrap_or_default(),
            "images" => {
                let media_type = field.content_type().unwrap_or_default().to_string();
                if !ALLOWED_IMAGE_TYPES.contains(&media_type.as_str())
                    || images.len() >= MAX_IMAGES
                {
                    skipped_images += 1;
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => images.push(ListingImage {
                        media_type,
                        data: bytes.to_vec(),
                    }),
                    Err(e) => {
                        warn!(error = %e, "Failed to read image field");
                        skipped_images += 1;
                    }
                }
            }
            other => warn!(field = other, "Ignoring unknown form field"),
        }
    }

    if skipped_images > 0 {
        warn!(skipped_images, "Ignored unsupported or extra images");
    }

    let request = AnalysisRequest {
        listing_text,
        address,
        university,
        images,
    };

    match state.engine.analyze(&request).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            (
                status,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

/// Validation problems are the caller's fault; a dead text analyzer is
/// an upstream failure; everything else is ours.
fn status_for(err: &LeaseLensError) -> StatusCode {
    match err {
        LeaseLensError::Validation(_) => StatusCode::BAD_REQUEST,
        LeaseLensError::TextAnalysis(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let err = LeaseLensError::Validation("listing text must not be empty".into());
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn analyzer_failure_maps_to_bad_gateway() {
        let err = LeaseLensError::TextAnalysis("timed out".into());
        assert_eq!(status_for(&err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn other_errors_map_to_internal_error() {
        let err = LeaseLensError::Config("missing key".into());
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
