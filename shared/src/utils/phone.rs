//! Phone number utilities

/// Normalize a phone number the way contacts arrive from the messaging channel.
///
/// Only a single leading `+` is stripped. No country code inference and no
/// digit-count validation is performed, so `"++1"` becomes `"+1"` and
/// `"8 (999) 123"` is kept as-is.
pub fn normalize_phone_number(phone: &str) -> String {
    phone.strip_prefix('+').unwrap_or(phone).to_string()
}

/// Mask a phone number for logging (e.g., ***4567)
pub fn mask_phone_number(phone: &str) -> String {
    let char_count = phone.chars().count();
    if char_count <= 4 {
        "****".to_string()
    } else {
        let tail: String = phone.chars().skip(char_count - 4).collect();
        format!("***{}", tail)
    }
}
