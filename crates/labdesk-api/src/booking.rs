//! Prescription analysis and order placement.
//!
//! Preview: upload → OCR → entity extraction, falling back to the keyword
//! table when extraction yields nothing. Placement: validate → store the
//! prescription → insert one `Pending` order → send a confirmation in the
//! background.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use labdesk_audit::events::AuditEvent;
use labdesk_core::email;
use labdesk_core::keys;
use labdesk_core::keywords;
use labdesk_core::models::entities::ExtractedEntities;
use labdesk_core::models::order::{Order, OrderFields, PrescriptionRef};
use labdesk_core::tests_list;
use labdesk_extract::entities::EntityExtractor;
use labdesk_extract::ocr::TextExtractor;
use labdesk_notify::messages;
use labdesk_notify::notifier::Notifier;
use labdesk_storage::documents;
use labdesk_storage::store::DocumentStore;

use crate::error::{ApiError, ValidationError};
use crate::intake::{self, AllowedTypes, FileIntake, Upload};

/// Who is asking for a preview. Only used for logging.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Where the suggested tests came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Entities,
    Keywords,
    None,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub extracted_text: String,
    pub entities: ExtractedEntities,
    pub suggested_tests: Vec<String>,
    /// Same list as `suggested_tests`, under the name the booking form reads.
    pub extracted_tests: Vec<String>,
    pub source: SuggestionSource,
    /// Reasons reported by degraded adapters, in call order.
    pub warnings: Vec<String>,
}

/// Raw order form, as submitted.
#[derive(Debug, Clone, Default)]
pub struct OrderSubmission {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub doctor_name: Option<String>,
    pub prescription_date: Option<String>,
    /// Every `tests` value received; each may be comma-separated.
    pub tests: Vec<String>,
    pub prescription: Option<Upload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub message: String,
    pub extracted_tests: Vec<String>,
    pub order_id: Uuid,
}

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
    intake: FileIntake,
    ocr: Arc<dyn TextExtractor>,
    entities: Arc<dyn EntityExtractor>,
    notifier: Notifier,
    public_base_url: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BookingService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        intake: FileIntake,
        ocr: Arc<dyn TextExtractor>,
        entities: Arc<dyn EntityExtractor>,
        notifier: Notifier,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            store,
            intake,
            ocr,
            entities,
            notifier,
            public_base_url,
        }
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    /// Suggest tests for a prescription. The upload is kept only while it is
    /// analyzed; no document is persisted. Never fails because an adapter
    /// did.
    pub async fn preview_tests(
        &self,
        upload: Option<Upload>,
        identity: Identity,
    ) -> Result<PreviewResult, ApiError> {
        let upload = upload.ok_or(ValidationError::MissingFile)?;
        let stored = self.intake.accept(&upload, AllowedTypes::ImagesOnly).await?;

        info!(
            file = %stored.filename,
            email = identity.email.as_deref().unwrap_or_default(),
            name = identity.name.as_deref().unwrap_or_default(),
            "analyzing prescription"
        );

        let mut warnings = Vec::new();

        let text_outcome = self
            .ocr
            .extract_text(&stored.path, &stored.content_type)
            .await;
        self.intake.discard(&stored).await;
        if let Some(reason) = text_outcome.reason() {
            warnings.push(format!("ocr: {reason}"));
        }
        let extracted_text = text_outcome.into_value();

        let entity_outcome = self.entities.classify(&extracted_text).await;
        if let Some(reason) = entity_outcome.reason() {
            warnings.push(format!("entities: {reason}"));
        }
        let entities = entity_outcome.into_value();

        let (suggested_tests, source) = suggest(&entities, &extracted_text);

        info!(
            file = %stored.filename,
            source = ?source,
            tests = suggested_tests.len(),
            degraded = warnings.len(),
            "prescription analyzed"
        );

        Ok(PreviewResult {
            extracted_text,
            entities,
            extracted_tests: suggested_tests.clone(),
            suggested_tests,
            source,
            warnings,
        })
    }

    /// Validate and persist one order, then notify the requester in the
    /// background. `host` is the request `Host`, used for the prescription
    /// URL when no public base URL is configured.
    pub async fn place_order(
        &self,
        submission: OrderSubmission,
        host: Option<&str>,
    ) -> Result<PlacedOrder, ApiError> {
        let (Some(name), Some(phone), Some(email), Some(upload)) = (
            present(submission.name),
            present(submission.phone),
            email::normalize_opt(submission.email.as_deref()),
            submission.prescription,
        ) else {
            return Err(ValidationError::MissingRequiredField(
                "name, phone, email, prescription".to_string(),
            )
            .into());
        };

        let tests = tests_list::parse_many(&submission.tests);
        if tests.is_empty() {
            return Err(ValidationError::NoTestsSpecified.into());
        }

        let stored = self.intake.accept(&upload, AllowedTypes::Any).await?;
        let base = self.public_base(host);

        let order = Order::pending(
            OrderFields {
                name,
                email,
                phone,
                doctor_name: present(submission.doctor_name),
                prescription_date: present(submission.prescription_date),
                tests,
            },
            PrescriptionRef {
                path: stored.path.display().to_string(),
                url: intake::public_url(&base, &stored.filename),
            },
        );

        let key = keys::order(&order.email, order.id);
        if let Err(e) = documents::insert(self.store.as_ref(), &key, &order).await {
            self.intake.discard(&stored).await;
            return Err(e.into());
        }

        info!(
            order_id = %order.id,
            email = %order.email,
            tests = order.tests.len(),
            "order placed"
        );
        AuditEvent::order_placed(&order).emit();

        self.spawn_confirmation(&order);

        Ok(PlacedOrder {
            message: "Order placed successfully".to_string(),
            extracted_tests: order.tests,
            order_id: order.id,
        })
    }

    /// All orders for `email`, oldest first. Unknown emails yield an empty
    /// list.
    pub async fn list_orders_by_email(&self, email: Option<&str>) -> Result<Vec<Order>, ApiError> {
        let email = email::normalize_opt(email).ok_or(ValidationError::MissingEmail)?;

        let mut orders: Vec<Order> =
            documents::list(self.store.as_ref(), &keys::orders_prefix(&email)).await?;
        orders.retain(|o| o.email == email);
        orders.sort_by_key(|o| o.created_at);

        Ok(orders)
    }

    fn public_base(&self, host: Option<&str>) -> String {
        match (&self.public_base_url, host) {
            (Some(base), _) => base.clone(),
            (None, Some(host)) => format!("http://{host}"),
            (None, None) => String::new(),
        }
    }

    fn spawn_confirmation(&self, order: &Order) {
        let notifier = self.notifier.clone();
        let to = order.email.clone();
        let order_id = order.id;
        let (subject, body) = messages::order_confirmation(order);

        tokio::spawn(async move {
            if notifier.send(&to, &subject, &body).await.is_degraded() {
                warn!(order_id = %order_id, "order confirmation not delivered");
            }
        });
    }
}

/// Tests from the extracted entities, or from the keyword table over the
/// raw text when the entities are empty or map to nothing.
pub fn suggest(entities: &ExtractedEntities, text: &str) -> (Vec<String>, SuggestionSource) {
    if !entities.is_empty() {
        let tests = keywords::suggest_from_entities(entities);
        if !tests.is_empty() {
            return (tests, SuggestionSource::Entities);
        }
    }

    let tests = keywords::match_tests(text);
    if tests.is_empty() {
        (tests, SuggestionSource::None)
    } else {
        (tests, SuggestionSource::Keywords)
    }
}
