//! Caption formatting (card → Telegram HTML).

use crate::domain::Card;

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build the caption text for a card.
///
/// Holiday cards get a celebratory banner around the holiday name; everything
/// else is bold-title-plus-message. Pure and deterministic — the same card
/// always formats to the same string.
pub fn format_caption(card: &Card) -> String {
    match (card.is_holiday, card.holiday_name.as_deref()) {
        (true, Some(holiday)) => {
            format!(
                "\u{1F389} <b>{}</b> \u{1F389}\n\n{}",
                escape_html(holiday),
                escape_html(&card.message)
            )
        }
        _ => format!(
            "<b>{}</b>\n\n{}",
            escape_html(&card.title),
            escape_html(&card.message)
        ),
    }
}
