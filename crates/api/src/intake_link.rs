//! Customer redirect after intake: a WhatsApp deep link carrying the order
//! summary, so the conversation with the shop starts with the details.

use florist_core::error::CoreError;
use florist_db::models::order::NewOrder;
use reqwest::Url;

/// Product types whose personalization is a printed board text rather than a card.
const BOARD_TYPES: &[&str] = &["BOARD_FLOWER", "BOARD_RUSTIC", "BOARD_ACRYLIC"];

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Chat message summarizing the order.
pub fn order_message(order: &NewOrder) -> String {
    let item = &order.item;
    let personalization = if BOARD_TYPES.contains(&item.product_type.as_str()) {
        format!(
            "*Header*: {}\n*Text*: {}\n*From*: {}",
            or_dash(item.greeting_type.as_deref()),
            or_dash(item.target_name.as_deref()),
            or_dash(item.sender_name.as_deref()),
        )
    } else {
        format!("*Card Message*: {}", or_dash(item.card_message.as_deref()))
    };

    format!(
        "Halo, saya mau pesan via Web:\n\n\
         *Order*: {id}\n\
         *Item*: {product}\n\
         *Date*: {date}\n\
         {personalization}\n\n\
         *Delivery To*:\n\
         Name: {name}\n\
         Phone: {phone}\n\
         Address: {address}\n\n\
         *Notes*: {notes}",
        id = order.id,
        product = item.product_name,
        date = order.delivery_time.format("%d %b %Y %H:%M"),
        name = order.recipient_name,
        phone = order.recipient_phone,
        address = order.delivery_address,
        notes = or_dash(item.notes.as_deref()),
    )
}

/// `https://wa.me/<number>?text=<message>`.
pub fn whatsapp_link(number: &str, order: &NewOrder) -> Result<Url, CoreError> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let base = format!("https://wa.me/{digits}");
    Url::parse_with_params(&base, &[("text", order_message(order))])
        .map_err(|e| CoreError::Internal(format!("Invalid WhatsApp link for '{number}': {e}")))
}
