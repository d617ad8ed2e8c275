use labdesk_core::models::order::Order;

pub const ORDER_SUBJECT: &str = "Order received";

/// Subject and plain-text body confirming a placed order.
pub fn order_confirmation(order: &Order) -> (String, String) {
    let mut body = format!(
        "Hello {},\n\nWe have received your test booking.\n\nTests:\n",
        order.name
    );
    for test in &order.tests {
        body.push_str(&format!("  - {test}\n"));
    }
    if let Some(doctor) = order.doctor_name.as_deref().filter(|d| !d.is_empty()) {
        body.push_str(&format!("\nReferring doctor: {doctor}\n"));
    }
    body.push_str(&format!(
        "\nStatus: {:?}\nOrder reference: {}\n",
        order.status, order.id
    ));

    (ORDER_SUBJECT.to_string(), body)
}
