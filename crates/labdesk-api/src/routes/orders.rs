use axum::extract::{Multipart, Path, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

use labdesk_core::models::order::Order;

use crate::booking::{Identity, OrderSubmission, PlacedOrder, PreviewResult};
use crate::error::ApiError;
use crate::intake::Upload;
use crate::state::AppState;

/// Multipart field names accepted for the prescription file.
const FILE_FIELDS: &[&str] = &["prescription", "file"];

#[derive(Serialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// Collect the text fields and the single prescription file of a form.
async fn read_form(mut multipart: Multipart) -> Result<OrderSubmission, ApiError> {
    let mut form = OrderSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if FILE_FIELDS.contains(&name.as_str()) {
            let filename = field.file_name().unwrap_or("prescription").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                form.prescription = Some(Upload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "name" => form.name = Some(value),
            "phone" => form.phone = Some(value),
            "email" => form.email = Some(value),
            "doctorName" => form.doctor_name = Some(value),
            "prescriptionDate" => form.prescription_date = Some(value),
            "tests" | "tests[]" => form.tests.push(value),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// Analyze a prescription and suggest tests. Persists nothing.
pub async fn upload_prescription(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PreviewResult>, ApiError> {
    let form = read_form(multipart).await?;
    let identity = Identity {
        name: form.name,
        email: form.email,
        phone: form.phone,
    };
    let preview = state
        .booking
        .preview_tests(form.prescription, identity)
        .await?;
    Ok(Json(preview))
}

pub async fn place_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PlacedOrder>), ApiError> {
    let form = read_form(multipart).await?;
    let host = headers.get(HOST).and_then(|h| h.to_str().ok());
    let placed = state.booking.place_order(form, host).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

pub async fn list_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = state.booking.list_orders_by_email(Some(&email)).await?;
    Ok(Json(OrdersResponse {
        success: true,
        orders,
    }))
}

/// `/api/orders/by-email/` with nothing after the slash.
pub async fn list_without_email() -> ApiError {
    crate::error::ValidationError::MissingEmail.into()
}
