//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// 11-digit mainland China mobile number
///
/// Prefixes: 130-139, 145, 147, 150-153, 155-159, 170, 176-178, 180-189.
static CN_CELL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(13[0-9]|14[57]|15[0-35-9]|17[0678]|18[0-9])[0-9]{8}$")
        .expect("mainland China mobile regex is valid")
});

/// Check whether `phone` is an 11-digit mainland China mobile number
pub fn is_cn_cell_phone_number(phone: &str) -> bool {
    CN_CELL_PHONE_REGEX.is_match(phone)
}

/// Mask a phone number for logs (e.g., 138****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() >= 7 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}
