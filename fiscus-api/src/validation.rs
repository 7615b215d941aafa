/// Request validation helpers
///
/// Request DTOs implement [`validator::Validate`] (usually via derive) and
/// handlers call [`validate`] before authorization or any store access.
/// Violations are collected into a single response naming every offending
/// field, shaped as:
///
/// ```json
/// {
///   "message": "Validation failed",
///   "errors": [{ "field": "email", "message": "Must be a valid email address" }]
/// }
/// ```

use crate::error::{ApiError, ValidationErrorDetail};
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

/// Validates a request payload, mapping violations to an API error
///
/// Collects the complete list of violations rather than stopping at the
/// first, so clients can fix everything in one round trip.
pub fn validate<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|e| {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(errors)
    })
}

/// Rejects strings that are empty or whitespace-only
///
/// Used as a custom validator for required text fields such as names and
/// sources, where `""` and `"   "` are equally meaningless.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Deserializer distinguishing an absent field from an explicit null
///
/// Partial updates need three states for nullable columns: leave the column
/// alone (field absent), clear it (explicit `null`), or set it (value).
/// Plain `Option<Option<T>>` can't tell the first two apart because serde
/// maps JSON `null` straight to the outer `None`. Declaring the field as
///
/// ```ignore
/// #[serde(default, deserialize_with = "double_option")]
/// pub notes: Option<Option<String>>,
/// ```
///
/// keeps the distinction: absent stays `None`, `null` becomes `Some(None)`,
/// and a value becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct SampleRequest {
        #[validate(email(message = "Must be a valid email address"))]
        email: String,

        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    #[derive(Debug, Deserialize)]
    struct SamplePatch {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_not_blank_rejects_empty_and_whitespace() {
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
        assert!(not_blank("Rent").is_ok());
    }

    #[test]
    fn test_validate_passes_clean_payload() {
        let req = SampleRequest {
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
        };

        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_validate_collects_all_violations() {
        let req = SampleRequest {
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
        };

        let err = validate(&req).unwrap_err();
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 2);
                let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
                assert!(fields.contains(&"email"));
                assert!(fields.contains(&"password"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_double_option_absent_field() {
        let patch: SamplePatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.notes, None);
    }

    #[test]
    fn test_double_option_explicit_null() {
        let patch: SamplePatch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
    }

    #[test]
    fn test_double_option_value() {
        let patch: SamplePatch = serde_json::from_str(r#"{"notes": "emergency fund"}"#).unwrap();
        assert_eq!(patch.notes, Some(Some("emergency fund".to_string())));
    }
}
