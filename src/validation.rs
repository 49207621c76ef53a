//! Client-side form schemas. A failure here annotates the offending fields and
//! the request is never sent.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{ClientError, FieldErrors};
use crate::models::{
    ForgotPasswordRequest, LoginRequest, OtpRequest, ProductForm, ProductPayload, SignupForm,
    SignupRequest,
};

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]{2,30}$").expect("valid regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid regex"));
static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid regex"));
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[!@#$%^&*(),.?":{}|<>]"#).expect("valid regex"));

pub const OTP_MAX_LEN: usize = 6;

/// Server column is `DECIMAL(10, 2)`
pub const PRICE_MAX_DIGITS: u32 = 10;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Smallest whole part that no longer fits: 10^(max digits - decimal places)
fn max_whole_price() -> Decimal {
    Decimal::from(10u64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES))
}

/// Collects the first error per field
#[derive(Debug, Default)]
struct FieldCheck {
    errors: FieldErrors,
}

impl FieldCheck {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    fn required_text(&mut self, field: &str, label: &str, value: &str, max_len: usize) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.fail(field, format!("{} is required", label));
        } else if value.chars().count() > max_len {
            self.fail(field, format!("{} must not exceed {} characters", label, max_len));
        }
        value.to_string()
    }

    fn email(&mut self, value: &str) -> String {
        let value = value.trim();
        if value.is_empty() {
            self.fail("email", "Email is required");
        } else if !EMAIL_RE.is_match(value) {
            self.fail("email", "Invalid email address");
        }
        value.to_string()
    }

    fn finish<T>(self, message: &str, value: T) -> Result<T, ClientError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ClientError::validation(message, self.errors))
        }
    }
}

/// Validate an add/edit form into a request payload (price numeric, stock integral)
pub fn validate_product(form: &ProductForm) -> Result<ProductPayload, ClientError> {
    let mut check = FieldCheck::default();

    let name = check.required_text("name", "Name", &form.name, 100);
    let model = check.required_text("model", "Model", &form.model, 50);
    let product_type = check.required_text("type", "Type", &form.product_type, 30);
    let store = check.required_text("store", "Store", &form.store, 50);
    let image = check.required_text("image", "Image URL", &form.image, usize::MAX);

    let price = match form.price.trim() {
        "" => {
            check.fail("price", "Price is required");
            Decimal::ZERO
        }
        raw => match Decimal::from_str(raw) {
            Ok(p) if p.is_sign_negative() && !p.is_zero() => {
                check.fail("price", "Price must be at least 0");
                p
            }
            Ok(p) if p.normalize().scale() > PRICE_DECIMAL_PLACES => {
                check.fail("price", format!("Price must have at most {} decimal places", PRICE_DECIMAL_PLACES));
                p
            }
            Ok(p) if p.trunc().abs() >= max_whole_price() => {
                check.fail(
                    "price",
                    format!(
                        "Price must have no more than {} digits before the decimal point",
                        PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
                    ),
                );
                p
            }
            Ok(p) => p,
            Err(_) => {
                check.fail("price", "Price must be a number");
                Decimal::ZERO
            }
        },
    };

    let stock = match form.stock.trim() {
        "" => {
            check.fail("stock", "Stock is required");
            0
        }
        raw => match raw.parse::<i64>() {
            Ok(n) if n < 1 => {
                check.fail("stock", "Stock must be at least 1");
                0
            }
            Ok(n) => u32::try_from(n).unwrap_or_else(|_| {
                check.fail("stock", "Stock is too large");
                0
            }),
            Err(_) => {
                check.fail("stock", "Stock must be a whole number");
                0
            }
        },
    };

    check.finish(
        "Invalid product fields",
        ProductPayload {
            name,
            model,
            product_type,
            store,
            price,
            image,
            stock,
            user: None,
        },
    )
}

pub fn validate_signup(form: &SignupForm) -> Result<SignupRequest, ClientError> {
    let mut check = FieldCheck::default();

    let name = form.name.trim().to_string();
    if name.is_empty() {
        check.fail("name", "Name is required");
    } else if !NAME_RE.is_match(&name) {
        check.fail("name", "Name must contain only letters and spaces");
    }

    let email = check.email(&form.email);

    let password = &form.password;
    if password.is_empty() {
        check.fail("password", "Password is required");
    } else if password.chars().count() < 8 {
        check.fail("password", "Password must be at least 8 characters");
    } else if password.chars().count() > 20 {
        check.fail("password", "Password must not exceed 20 characters");
    } else if !DIGIT_RE.is_match(password) {
        check.fail("password", "Password must contain at least one number");
    } else if !UPPER_RE.is_match(password) {
        check.fail("password", "Password must contain at least one uppercase letter");
    } else if !SPECIAL_RE.is_match(password) {
        check.fail("password", "Password must contain at least one special character");
    }

    if form.confirm_password.is_empty() {
        check.fail("confirmPassword", "Please confirm your password");
    } else if &form.confirm_password != password {
        check.fail("confirmPassword", "Passwords must match");
    }

    check.finish(
        "Invalid signup details",
        SignupRequest {
            name,
            email,
            password: password.clone(),
        },
    )
}

pub fn validate_login(email: &str, password: &str, remember_me: bool) -> Result<LoginRequest, ClientError> {
    let mut check = FieldCheck::default();
    let email = check.email(email);
    if password.is_empty() {
        check.fail("password", "Password is required");
    }
    check.finish(
        "Invalid login details",
        LoginRequest {
            email,
            password: password.to_string(),
            remember_me,
        },
    )
}

pub fn validate_forgot_password(email: &str) -> Result<ForgotPasswordRequest, ClientError> {
    let mut check = FieldCheck::default();
    let email = check.email(email);
    check.finish("Invalid email address", ForgotPasswordRequest { email })
}

pub fn validate_otp(otp: &str) -> Result<OtpRequest, ClientError> {
    let mut check = FieldCheck::default();
    let otp = check.required_text("otp", "OTP code", otp, OTP_MAX_LEN);
    check.finish("Invalid OTP code", OtpRequest { otp })
}
