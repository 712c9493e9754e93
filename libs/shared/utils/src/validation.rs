use std::sync::LazyLock;

use regex::Regex;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const PHONE_PATTERN: &str = r"^\+?[0-9\s\-\.\(\)]+$";

static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN));
static PHONE_RE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(PHONE_PATTERN));

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.len() <= 254 && EMAIL_RE.as_ref().is_ok_and(|re| re.is_match(email))
}

/// Accepts common formatting (`+7 (912) 345-67-89`) with 5 to 20 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (5..=20).contains(&digits) && PHONE_RE.as_ref().is_ok_and(|re| re.is_match(phone))
}
