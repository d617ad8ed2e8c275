use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A test-booking request. Orders are append-only: written once when the
/// booking is placed and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub name: String,
    /// Normalized (trimmed, lower-cased).
    pub email: String,
    pub phone: String,
    pub doctor_name: Option<String>,
    /// Free text, as entered by the requester.
    pub prescription_date: Option<String>,
    pub tests: Vec<String>,
    pub prescription_path: String,
    pub prescription_url: String,
    pub status: OrderStatus,
    pub created_at: jiff::Timestamp,
}

/// Nothing in the system moves an order past `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
}

/// Validated requester fields for a new order.
#[derive(Debug, Clone)]
pub struct OrderFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub doctor_name: Option<String>,
    pub prescription_date: Option<String>,
    pub tests: Vec<String>,
}

/// Where the uploaded prescription lives on disk and how clients reach it.
#[derive(Debug, Clone)]
pub struct PrescriptionRef {
    pub path: String,
    pub url: String,
}

impl Order {
    pub fn pending(fields: OrderFields, prescription: PrescriptionRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            doctor_name: fields.doctor_name,
            prescription_date: fields.prescription_date,
            tests: fields.tests,
            prescription_path: prescription.path,
            prescription_url: prescription.url,
            status: OrderStatus::Pending,
            created_at: jiff::Timestamp::now(),
        }
    }
}
