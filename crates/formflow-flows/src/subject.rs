//! Locators and canned input values for the registration form under test.
//!
//! The form itself is the subject: the harness only knows its observable DOM
//! surface, collected here in one place so a markup change is a one-file fix.

use std::time::Duration;

/// How long a dependent dropdown gets to repopulate after the selection that
/// drives it.
pub const CASCADE_BUDGET: Duration = Duration::from_secs(2);

/// CSS locators of the subject form.
pub mod sel {
    pub const FORM: &str = "#regForm";
    pub const FIRST_NAME: &str = "#firstName";
    pub const LAST_NAME: &str = "#lastName";
    pub const EMAIL: &str = "#email";
    pub const PHONE: &str = "#phone";
    pub const ADDRESS: &str = "#address";
    pub const COUNTRY: &str = "#country";
    pub const STATE: &str = "#state";
    pub const CITY: &str = "#city";
    pub const PASSWORD: &str = "#password";
    pub const CONFIRM_PASSWORD: &str = "#confirmPassword";
    pub const TERMS: &str = "#terms";
    pub const SUBMIT: &str = "#submitBtn";
    pub const PW_METER: &str = "#pwMeter";
    pub const INLINE_ERRORS: &str = "small.error";
    pub const LAST_NAME_ERROR: &str = "small.error[data-for='lastName']";
    pub const SUCCESS_BANNER: &str = ".messages .successTop";

    pub fn gender(value: &str) -> String {
        format!("input[name='gender'][value='{value}']")
    }
}

/// Inline styles applied before screenshots.
pub mod style {
    pub const ERROR_HIGHLIGHT: &str =
        "border:3px solid #e74c3c; background:#fff3f3; padding:6px;";
    pub const SUCCESS_HIGHLIGHT: &str =
        "border:3px solid #27ae60; background:#e9f9ef; padding:8px;";
}

/// A (logical field, locator, value) triple used to populate the form; one
/// value per field per fill.
#[derive(Clone, Copy, Debug)]
pub struct FieldValue {
    pub field: &'static str,
    pub locator: &'static str,
    pub value: &'static str,
}

impl FieldValue {
    const fn new(field: &'static str, locator: &'static str, value: &'static str) -> Self {
        Self {
            field,
            locator,
            value,
        }
    }
}

/// A password the subject's strength policy accepts: length, case, digit,
/// symbol.
pub const STRONG_PASSWORD: &str = "GoodPassw0rd!";

/// Text inputs of the known-good profile used by the positive flow and the
/// gating check. Selections (gender, cascade, terms) are applied separately
/// because they are not plain text fields.
pub fn valid_text_fields() -> Vec<FieldValue> {
    vec![
        FieldValue::new("firstName", sel::FIRST_NAME, "HappyFirst"),
        FieldValue::new("lastName", sel::LAST_NAME, "HappyLast"),
        FieldValue::new("email", sel::EMAIL, "happy@example.com"),
        FieldValue::new("phone", sel::PHONE, "+911234567890"),
        FieldValue::new("address", sel::ADDRESS, "123 Sample Street"),
        FieldValue::new("password", sel::PASSWORD, STRONG_PASSWORD),
        FieldValue::new("confirmPassword", sel::CONFIRM_PASSWORD, STRONG_PASSWORD),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile_covers_every_text_field() {
        let fields = valid_text_fields();
        let names: Vec<_> = fields.iter().map(|f| f.field).collect();
        for required in [
            "firstName",
            "lastName",
            "email",
            "phone",
            "address",
            "password",
            "confirmPassword",
        ] {
            assert!(names.contains(&required), "missing {required}");
        }
    }

    #[test]
    fn test_valid_profile_password_matches_confirmation() {
        let fields = valid_text_fields();
        let get = |name: &str| fields.iter().find(|f| f.field == name).unwrap().value;
        assert_eq!(get("password"), get("confirmPassword"));
        assert_eq!(get("password"), STRONG_PASSWORD);
    }

    #[test]
    fn test_gender_locator_targets_the_radio_group() {
        assert_eq!(
            sel::gender("Female"),
            "input[name='gender'][value='Female']"
        );
    }
}
