//! Form boundary validation.
//!
//! Raw form payloads are checked here and turned into [`Credentials`]
//! before anything reaches the session store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::Credentials;

/// Message shown when the login form is incomplete.
pub const LOGIN_INCOMPLETE: &str = "Please enter both email and password.";

/// Per-field validation messages, keyed by form field name.
///
/// The `form` key carries errors that are not tied to a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Login form payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Both email and password must be filled in. The password is collected
    /// but not checked against anything.
    pub fn validate(self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::new();
        if is_blank(&self.email) || self.password.is_empty() {
            errors.insert("form", LOGIN_INCOMPLETE);
        }

        errors.into_result(|| Credentials {
            name: self.name,
            email: self.email.trim().to_string(),
        })
    }
}

/// Sign-up form payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub agree: bool,
}

impl SignupForm {
    /// Check every field, collecting one message per failing field.
    pub fn validate(self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::new();

        if is_blank(&self.name) {
            errors.insert("name", "Full Name is required.");
        }
        if is_blank(&self.email) {
            errors.insert("email", "Email address is required.");
        }
        if self.phone.is_empty() {
            errors.insert("phone", "Phone Number is required.");
        } else if !is_phone_number(&self.phone) {
            errors.insert("phone", "Phone Number must be exactly 10 digits.");
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required.");
        }
        if self.confirm_password.is_empty() {
            errors.insert("confirmPassword", "Please confirm your password.");
        } else if !self.password.is_empty() && self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match.");
        }
        if !self.agree {
            errors.insert(
                "agree",
                "You must agree to the Terms and Privacy Policy to sign up.",
            );
        }

        errors.into_result(|| Credentials {
            name: Some(self.name.trim().to_string()),
            email: self.email.trim().to_string(),
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_phone_number(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            phone: "9876543210".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            agree: true,
        }
    }

    #[test]
    fn test_login_valid() {
        let form = LoginForm {
            name: None,
            email: " a@x.com ".into(),
            password: "pw".into(),
        };
        let creds = form.validate().unwrap();
        assert_eq!(creds.email, "a@x.com");
        assert!(creds.name.is_none());
    }

    #[test]
    fn test_login_missing_fields() {
        for (email, password) in [("", "pw"), ("a@x.com", ""), ("", ""), ("   ", "pw")] {
            let form = LoginForm {
                name: None,
                email: email.into(),
                password: password.into(),
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.get("form"), Some(LOGIN_INCOMPLETE));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_login_form_deserialize_loose() {
        let form: LoginForm = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(form.email, "a@x.com");
        assert!(form.password.is_empty());
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_signup_valid() {
        let creds = signup().validate().unwrap();
        assert_eq!(creds.name.as_deref(), Some("Asha Rao"));
        assert_eq!(creds.email, "asha@example.com");
    }

    #[test]
    fn test_signup_all_missing() {
        let errors = SignupForm::default().validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("Full Name is required."));
        assert_eq!(errors.get("email"), Some("Email address is required."));
        assert_eq!(errors.get("phone"), Some("Phone Number is required."));
        assert_eq!(errors.get("password"), Some("Password is required."));
        assert_eq!(
            errors.get("confirmPassword"),
            Some("Please confirm your password.")
        );
        assert!(errors.get("agree").is_some());
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_signup_bad_phone() {
        for phone in ["12345", "98765432101", "98765-4321", "９８７６５４３２１０"] {
            let form = SignupForm {
                phone: phone.into(),
                ..signup()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(
                errors.get("phone"),
                Some("Phone Number must be exactly 10 digits.")
            );
        }
    }

    #[test]
    fn test_signup_password_mismatch() {
        let form = SignupForm {
            confirm_password: "different".into(),
            ..signup()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match."));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_signup_terms_required() {
        let form = SignupForm {
            agree: false,
            ..signup()
        };
        assert!(form.validate().unwrap_err().get("agree").is_some());
    }

    #[test]
    fn test_signup_camel_case_payload() {
        let form: SignupForm = serde_json::from_str(
            r#"{"name":"A","email":"a@x.com","phone":"0123456789",
                "password":"p","confirmPassword":"p","agree":true}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_errors_display_and_json() {
        let mut errors = FormErrors::new();
        errors.insert("email", "Email address is required.");
        assert_eq!(errors.to_string(), "email: Email address is required.");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"email": "Email address is required."}));
    }
}
