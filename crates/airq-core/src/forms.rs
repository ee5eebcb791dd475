// ── Form schemas ──
//
// Declarative field rules for every form that feeds an API call. A form
// that fails here never reaches the network; `into_request` validates
// before building the wire body.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::SecretString;
use validator::{Validate, ValidationError, ValidationErrors};

use airq_api::{
    AlertChannel, LoginRequest, NewPlacementRequest, NewSensor, NewSubscription,
    RegisterRequest, SensorStatus, SensorUpdate,
};

// ── Errors ──────────────────────────────────────────────────────────

/// First failing message per field, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                // "required" outranks length, which outranks everything else.
                let first = errs
                    .iter()
                    .min_by_key(|e| match e.code.as_ref() {
                        "required" => 0,
                        "length" => 1,
                        _ => 2,
                    })?;
                let message = first
                    .message
                    .as_ref()
                    .map_or_else(|| first.code.to_string(), ToString::to_string);
                Some((field.to_string(), message))
            })
            .collect();
        Self(fields)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

fn check(form: &impl Validate) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

// ── Rules ───────────────────────────────────────────────────────────

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn letter_and_digit(value: &str) -> Result<(), ValidationError> {
    let letter = value.chars().any(char::is_alphabetic);
    let digit = value.chars().any(|c| c.is_ascii_digit());
    if letter && digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength"))
    }
}

/// NaN passes every range comparison, so coordinates also need this.
#[allow(clippy::needless_pass_by_value)]
fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(
        custom(function = "required", message = "Email is required"),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    #[validate(custom(function = "required", message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn into_request(mut self) -> Result<LoginRequest, FormErrors> {
        trim_in_place(&mut self.email);
        check(&self)?;
        Ok(LoginRequest {
            email: self.email,
            password: SecretString::from(self.password),
        })
    }
}

#[derive(Clone, Default, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters"))]
    pub name: String,
    #[validate(
        custom(function = "required", message = "Email is required"),
        email(message = "Enter a valid email address")
    )]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "letter_and_digit", message = "Password must contain a letter and a number")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn into_request(mut self) -> Result<RegisterRequest, FormErrors> {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.email);
        check(&self)?;
        Ok(RegisterRequest {
            name: self.name,
            email: self.email,
            password: SecretString::from(self.password),
        })
    }
}

// ── Sensors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Validate)]
pub struct SensorForm {
    #[validate(
        custom(function = "required", message = "Sensor name is required"),
        length(max = 100, message = "Sensor name must be at most 100 characters")
    )]
    pub name: String,
    #[validate(custom(function = "required", message = "Location is required"))]
    pub location: String,
    #[validate(
        custom(function = "finite", message = "Latitude must be between -90 and 90"),
        range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90")
    )]
    pub latitude: f64,
    #[validate(
        custom(function = "finite", message = "Longitude must be between -180 and 180"),
        range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180")
    )]
    pub longitude: f64,
    pub status: Option<SensorStatus>,
}

impl SensorForm {
    pub fn into_request(mut self) -> Result<NewSensor, FormErrors> {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.location);
        check(&self)?;
        Ok(NewSensor {
            name: self.name,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            status: self.status,
        })
    }

    /// Full replacement expressed as an update body.
    pub fn into_update(self) -> Result<SensorUpdate, FormErrors> {
        let sensor = self.into_request()?;
        Ok(SensorUpdate {
            name: Some(sensor.name),
            location: Some(sensor.location),
            latitude: Some(sensor.latitude),
            longitude: Some(sensor.longitude),
            status: sensor.status,
        })
    }
}

// ── Subscriptions ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Validate)]
pub struct SubscriptionForm {
    #[validate(custom(function = "required", message = "Select a sensor"))]
    pub sensor_id: String,
    #[validate(range(min = 0, max = 500, message = "Threshold must be between 0 and 500"))]
    pub threshold: i64,
    pub channel: AlertChannel,
}

impl SubscriptionForm {
    pub fn into_request(mut self) -> Result<NewSubscription, FormErrors> {
        trim_in_place(&mut self.sensor_id);
        check(&self)?;
        let threshold = u32::try_from(self.threshold).unwrap_or_default();
        Ok(NewSubscription {
            sensor_id: self.sensor_id,
            threshold,
            channel: self.channel,
        })
    }
}

// ── Placement requests ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Validate)]
pub struct PlacementRequestForm {
    #[validate(
        custom(function = "finite", message = "Latitude must be between -90 and 90"),
        range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90")
    )]
    pub latitude: f64,
    #[validate(
        custom(function = "finite", message = "Longitude must be between -180 and 180"),
        range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180")
    )]
    pub longitude: f64,
    pub address: Option<String>,
    #[validate(length(min = 10, max = 500, message = "Reason must be between 10 and 500 characters"))]
    pub reason: String,
}

impl PlacementRequestForm {
    pub fn into_request(mut self) -> Result<NewPlacementRequest, FormErrors> {
        trim_in_place(&mut self.reason);
        check(&self)?;
        Ok(NewPlacementRequest {
            latitude: self.latitude,
            longitude: self.longitude,
            address: self
                .address
                .map(|a| a.trim().to_owned())
                .filter(|a| !a.is_empty()),
            reason: self.reason,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn empty_login_reports_required_first() {
        let errors = LoginForm::default().into_request().err().unwrap();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert_eq!(
            errors.to_string(),
            "email: Email is required\npassword: Password is required"
        );
    }

    #[test]
    fn login_rejects_malformed_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "x".into(),
        };
        let errors = form.into_request().err().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
    }

    #[test]
    fn login_builds_request() {
        let form = LoginForm {
            email: "ada@example.com".into(),
            password: "hunter22".into(),
        };
        let req = form.into_request().unwrap();
        assert_eq!(req.email, "ada@example.com");
        assert_eq!(req.password.expose_secret(), "hunter22");
    }

    #[test]
    fn register_password_rules() {
        let base = RegisterForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "short1".into(),
            confirm_password: "short1".into(),
        };
        let errors = base.clone().into_request().err().unwrap();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );

        let letters_only = RegisterForm {
            password: "abcdefghij".into(),
            confirm_password: "abcdefghij".into(),
            ..base.clone()
        };
        let errors = letters_only.into_request().err().unwrap();
        assert_eq!(
            errors.get("password"),
            Some("Password must contain a letter and a number")
        );

        let mismatch = RegisterForm {
            password: "abcdefgh1".into(),
            confirm_password: "abcdefgh2".into(),
            ..base
        };
        let errors = mismatch.into_request().err().unwrap();
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn register_name_length() {
        let form = RegisterForm {
            name: "A".into(),
            email: "ada@example.com".into(),
            password: "abcdefgh1".into(),
            confirm_password: "abcdefgh1".into(),
        };
        let errors = form.into_request().err().unwrap();
        assert_eq!(
            errors.get("name"),
            Some("Name must be between 2 and 50 characters")
        );
    }

    #[test]
    fn sensor_bounds() {
        let form = SensorForm {
            name: "x".repeat(101),
            location: "  ".into(),
            latitude: 91.0,
            longitude: -180.5,
            status: None,
        };
        let errors = form.into_request().err().unwrap();
        assert_eq!(
            errors.get("name"),
            Some("Sensor name must be at most 100 characters")
        );
        assert_eq!(errors.get("location"), Some("Location is required"));
        assert_eq!(errors.get("latitude"), Some("Latitude must be between -90 and 90"));
        assert_eq!(
            errors.get("longitude"),
            Some("Longitude must be between -180 and 180")
        );
    }

    #[test]
    fn sensor_edges_are_inclusive() {
        let form = SensorForm {
            name: "Pier".into(),
            location: "North pier".into(),
            latitude: -90.0,
            longitude: 180.0,
            status: Some(SensorStatus::Maintenance),
        };
        let update = form.into_update().unwrap();
        assert_eq!(update.latitude, Some(-90.0));
        assert_eq!(update.status, Some(SensorStatus::Maintenance));
    }

    #[test]
    fn subscription_rules() {
        let errors = SubscriptionForm {
            sensor_id: String::new(),
            threshold: 501,
            channel: AlertChannel::Email,
        }
        .into_request()
        .err()
        .unwrap();
        assert_eq!(errors.get("sensor_id"), Some("Select a sensor"));
        assert_eq!(
            errors.get("threshold"),
            Some("Threshold must be between 0 and 500")
        );

        let errors = SubscriptionForm {
            sensor_id: "s-1".into(),
            threshold: -1,
            channel: AlertChannel::Email,
        }
        .into_request()
        .err()
        .unwrap();
        assert_eq!(errors.len(), 1);

        let ok = SubscriptionForm {
            sensor_id: "s-1".into(),
            threshold: 500,
            channel: AlertChannel::Push,
        }
        .into_request()
        .unwrap();
        assert_eq!(ok.threshold, 500);
    }

    #[test]
    fn placement_reason_length() {
        let form = PlacementRequestForm {
            latitude: 10.0,
            longitude: 10.0,
            address: Some("   ".into()),
            reason: "too short".into(),
        };
        let errors = form.clone().into_request().err().unwrap();
        assert_eq!(
            errors.get("reason"),
            Some("Reason must be between 10 and 500 characters")
        );

        let req = PlacementRequestForm {
            reason: "School playground, heavy traffic".into(),
            ..form
        }
        .into_request()
        .unwrap();
        assert_eq!(req.address, None);
    }

    #[test]
    fn padding_does_not_count_toward_length() {
        let errors = RegisterForm {
            name: "  A  ".into(),
            email: "ada@example.com".into(),
            password: "abcdefgh1".into(),
            confirm_password: "abcdefgh1".into(),
        }
        .into_request()
        .err()
        .unwrap();
        assert_eq!(
            errors.get("name"),
            Some("Name must be between 2 and 50 characters")
        );

        let errors = PlacementRequestForm {
            latitude: 0.0,
            longitude: 0.0,
            address: None,
            reason: "   short    ".into(),
        }
        .into_request()
        .err()
        .unwrap();
        assert_eq!(
            errors.get("reason"),
            Some("Reason must be between 10 and 500 characters")
        );
    }

    #[test]
    fn padded_values_are_trimmed_before_checks() {
        let req = LoginForm {
            email: "  ada@example.com ".into(),
            password: " pw ".into(),
        }
        .into_request()
        .unwrap();
        assert_eq!(req.email, "ada@example.com");
        assert_eq!(req.password.expose_secret(), " pw ");

        let req = RegisterForm {
            name: "  Ada ".into(),
            email: " ada@example.com".into(),
            password: "abcdefgh1".into(),
            confirm_password: "abcdefgh1".into(),
        }
        .into_request()
        .unwrap();
        assert_eq!(req.name, "Ada");
        assert_eq!(req.email, "ada@example.com");
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let errors = SensorForm {
            name: "x".into(),
            location: "y".into(),
            latitude: f64::NAN,
            longitude: f64::NAN,
            status: None,
        }
        .into_request()
        .err()
        .unwrap();
        assert_eq!(errors.get("latitude"), Some("Latitude must be between -90 and 90"));
        assert_eq!(
            errors.get("longitude"),
            Some("Longitude must be between -180 and 180")
        );

        let errors = PlacementRequestForm {
            latitude: f64::INFINITY,
            longitude: f64::NEG_INFINITY,
            address: None,
            reason: "School playground, heavy traffic".into(),
        }
        .into_request()
        .err()
        .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("latitude"), Some("Latitude must be between -90 and 90"));
    }
}
