use crate::types::BookingStatus;

/// Label shown for status codes this client does not know.
pub const UNKNOWN_STATUS_TEXT: &str = "未知";

/// Render a price with two decimals.
///
/// `is_fen` marks the amount as cents (fen) rather than yuan.
pub fn format_price(price: Option<f64>, is_fen: bool) -> String {
    match price {
        Some(value) if is_fen => format!("{:.2}", value / 100.0),
        Some(value) => format!("{:.2}", value),
        None => "0.00".to_string(),
    }
}

pub fn booking_status_text(code: i32) -> &'static str {
    BookingStatus::from_code(code).map_or(UNKNOWN_STATUS_TEXT, BookingStatus::text)
}

pub fn booking_status_class(code: i32) -> &'static str {
    BookingStatus::from_code(code).map_or("", BookingStatus::style_class)
}
