use labdesk_audit::events::{Action, AuditEvent};
use labdesk_core::models::order::{Order, OrderFields, PrescriptionRef};

#[test]
fn order_placed_carries_tests() {
    let order = Order::pending(
        OrderFields {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: "123".to_string(),
            doctor_name: None,
            prescription_date: None,
            tests: vec!["CBC".to_string()],
        },
        PrescriptionRef {
            path: "uploads/rx.png".to_string(),
            url: "http://localhost/uploads/rx.png".to_string(),
        },
    );

    let event = AuditEvent::order_placed(&order);
    assert_eq!(event.action, Action::OrderPlaced);
    assert_eq!(event.action.collection(), "orders");
    assert_eq!(event.document, order.id.to_string());
    assert_eq!(event.actor, "asha@example.com");

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["action"], "order.placed");
    assert_eq!(value["details"]["tests"][0], "CBC");
    event.emit();
}

#[test]
fn registration_event_is_keyed_by_email() {
    let event = AuditEvent::user_registered("a@x.com");
    assert_eq!(event.action.as_str(), "user.registered");
    assert_eq!(event.document, "a@x.com");

    let value = serde_json::to_value(&event).unwrap();
    assert!(value.get("details").is_none());
}
