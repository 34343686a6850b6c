use std::sync::OnceLock;

use regex::Regex;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex"))
}

/// A deliberately loose check: one `@`, no whitespace, and a dot somewhere in the domain.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(format!("'{email}' is not a valid email address"))
    }
}

/// Prices must be finite and strictly positive.
pub fn validate_price(price: f64) -> Result<(), String> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(format!("Price must be a positive number, but was {price}"))
    }
}
