use labdesk_core::models::order::Order;
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// State-changing actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    #[serde(rename = "user.registered")]
    UserRegistered,
    #[serde(rename = "profile.updated")]
    ProfileUpdated,
    #[serde(rename = "order.placed")]
    OrderPlaced,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::UserRegistered => "user.registered",
            Action::ProfileUpdated => "profile.updated",
            Action::OrderPlaced => "order.placed",
        }
    }

    /// The collection the action writes to.
    pub fn collection(self) -> &'static str {
        match self {
            Action::UserRegistered => "users",
            Action::ProfileUpdated => "profiles",
            Action::OrderPlaced => "orders",
        }
    }
}

/// One audited write, emitted through `tracing` with `audit.*` fields so a
/// JSON log pipeline can split it from the request log.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: Action,
    /// Document identifier within the action's collection.
    pub document: String,
    /// Normalized email of the account the action was taken for.
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn user_registered(email: &str) -> Self {
        Self {
            action: Action::UserRegistered,
            document: email.to_string(),
            actor: email.to_string(),
            details: None,
        }
    }

    pub fn profile_updated(email: &str) -> Self {
        Self {
            action: Action::ProfileUpdated,
            document: email.to_string(),
            actor: email.to_string(),
            details: None,
        }
    }

    pub fn order_placed(order: &Order) -> Self {
        Self {
            action: Action::OrderPlaced,
            document: order.id.to_string(),
            actor: order.email.clone(),
            details: Some(json!({
                "tests": order.tests,
                "prescription": order.prescription_url,
            })),
        }
    }

    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        info!(
            audit.action = self.action.as_str(),
            audit.collection = self.action.collection(),
            audit.document = %self.document,
            audit.actor = %self.actor,
            audit.details = %details,
            "audit event"
        );
    }
}
