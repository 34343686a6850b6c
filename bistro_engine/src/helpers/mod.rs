mod validation;

pub use validation::{is_valid_email, validate_email, validate_price};
