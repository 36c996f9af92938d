//! User records as stored, and the flat form record that produces them

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::field::{FieldFormat, RecordField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned identifier of a user record
///
/// Opaque to the client; immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Nested postal address of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
}

/// One directory entry as the store returns it
///
/// Everything but the identifier may be missing at rest, so scalar fields are
/// optional and an incomplete record still decodes. Timestamps are kept in
/// their ISO-8601 wire form; see [`UserRecord::created_at_utc`] for a parsed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserRecord {
    /// A record with only its identifier set
    pub fn with_id(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            email: None,
            phone_number: None,
            image_url: None,
            address: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Get the value of a searchable/sortable field
    ///
    /// Returns `None` when the field is absent on this record.
    pub fn field_value(&self, field: RecordField) -> Option<&str> {
        let value = match field {
            RecordField::FirstName => &self.first_name,
            RecordField::LastName => &self.last_name,
            RecordField::Email => &self.email,
            RecordField::PhoneNumber => &self.phone_number,
            RecordField::CreatedAt => &self.created_at,
        };
        value.as_deref()
    }

    /// Creation timestamp, if present and well-formed
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref()?)
    }

    /// Last update timestamp, if present and well-formed
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated_at.as_deref()?)
    }

    /// "First Last", skipping whichever part is missing
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Body submitted to the store on create and update
///
/// Address fields are nested and both timestamps are present. The identifier
/// is only sent on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub image_url: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub updated_at: String,
}

impl RecordBody {
    /// The record this body describes once the store has assigned `id`
    pub fn into_record(self, id: RecordId) -> UserRecord {
        UserRecord {
            id,
            first_name: Some(self.first_name),
            last_name: Some(self.last_name),
            email: Some(self.email),
            phone_number: Some(self.phone_number),
            image_url: Some(self.image_url),
            address: Some(self.address),
            created_at: self.created_at,
            updated_at: Some(self.updated_at),
        }
    }
}

/// The flat key/value record a user form produces
///
/// Keys are fixed by contract, see [`UserForm::FIELDS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub image_url: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub street_number: String,
}

impl UserForm {
    /// Contract keys of the flat form record
    pub const FIELDS: [&'static str; 9] = [
        "firstName",
        "lastName",
        "email",
        "phoneNumber",
        "imageUrl",
        "country",
        "city",
        "street",
        "streetNumber",
    ];

    /// Build a form from submitted key/value pairs
    ///
    /// Unknown keys are ignored. Every missing contract key is reported in a
    /// single [`ValidationError::MissingFields`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = UserForm::default();
        let mut seen = [false; 9];

        for (key, value) in pairs {
            let Some(index) = Self::FIELDS.iter().position(|k| *k == key.as_ref()) else {
                continue;
            };
            seen[index] = true;
            *form.slot_mut(index) = value.into();
        }

        let missing: Vec<String> = Self::FIELDS
            .iter()
            .zip(seen)
            .filter(|(_, present)| !present)
            .map(|(key, _)| key.to_string())
            .collect();

        if missing.is_empty() {
            Ok(form)
        } else {
            Err(ValidationError::MissingFields { fields: missing })
        }
    }

    /// Prefill a form from a stored record (edit dialog)
    pub fn from_record(record: &UserRecord) -> Self {
        let address = record.address.clone().unwrap_or_default();
        Self {
            first_name: record.first_name.clone().unwrap_or_default(),
            last_name: record.last_name.clone().unwrap_or_default(),
            email: record.email.clone().unwrap_or_default(),
            phone_number: record.phone_number.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            country: address.country.unwrap_or_default(),
            city: address.city.unwrap_or_default(),
            street: address.street.unwrap_or_default(),
            street_number: address.street_number.unwrap_or_default(),
        }
    }

    /// Check required fields and formats, reporting every violation at once
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        for (key, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldValidationError::new(key, "is required"));
            }
        }

        for (key, value, format) in [
            ("email", &self.email, FieldFormat::Email),
            ("imageUrl", &self.image_url, FieldFormat::Url),
            ("phoneNumber", &self.phone_number, FieldFormat::Phone),
        ] {
            let value = value.trim();
            if !value.is_empty() && !format.validate(value) {
                errors.push(FieldValidationError::new(key, format.describe()));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }

    /// Split off the four address fields into the nested shape
    pub fn into_parts(self) -> (FormScalars, Address) {
        let address = Address {
            country: Some(self.country),
            city: Some(self.city),
            street: Some(self.street),
            street_number: Some(self.street_number),
        };
        let scalars = FormScalars {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            image_url: self.image_url,
        };
        (scalars, address)
    }

    fn slot_mut(&mut self, index: usize) -> &mut String {
        match index {
            0 => &mut self.first_name,
            1 => &mut self.last_name,
            2 => &mut self.email,
            3 => &mut self.phone_number,
            4 => &mut self.image_url,
            5 => &mut self.country,
            6 => &mut self.city,
            7 => &mut self.street,
            _ => &mut self.street_number,
        }
    }
}

/// Top-level scalar fields of a form once the address is stripped out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormScalars {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_form() -> UserForm {
        UserForm {
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            email: "ivan@abv.bg".to_string(),
            phone_number: "0888123456".to_string(),
            image_url: "https://example.com/ivan.png".to_string(),
            country: "Bulgaria".to_string(),
            city: "Sofia".to_string(),
            street: "Vitosha".to_string(),
            street_number: "12".to_string(),
        }
    }

    #[test]
    fn test_record_decodes_wire_shape() {
        let record: UserRecord = serde_json::from_value(json!({
            "_id": "8f414b4f",
            "firstName": "Peter",
            "lastName": "Johnson",
            "email": "peter@abv.bg",
            "phoneNumber": "0812345678",
            "imageUrl": "https://example.com/p.png",
            "address": {"country": "USA", "city": "LA", "street": "Main", "streetNumber": "5"},
            "createdAt": "2022-01-22T19:30:00.000Z",
            "updatedAt": "2022-01-22T19:30:00.000Z"
        }))
        .unwrap();

        assert_eq!(record.id, RecordId::from("8f414b4f"));
        assert_eq!(record.field_value(RecordField::Email), Some("peter@abv.bg"));
        assert_eq!(
            record.address.as_ref().and_then(|a| a.street_number.as_deref()),
            Some("5")
        );
        assert!(record.created_at_utc().is_some());
    }

    #[test]
    fn test_incomplete_record_still_decodes() {
        let record: UserRecord = serde_json::from_value(json!({"_id": "a1"})).unwrap();
        assert_eq!(record.field_value(RecordField::FirstName), None);
        assert_eq!(record.created_at_utc(), None);
        assert_eq!(record.full_name(), "");
    }

    #[test]
    fn test_malformed_timestamp_is_absent_not_error() {
        let mut record = UserRecord::with_id("a1");
        record.created_at = Some("yesterday".to_string());
        assert_eq!(record.field_value(RecordField::CreatedAt), Some("yesterday"));
        assert_eq!(record.created_at_utc(), None);
    }

    #[test]
    fn test_form_from_pairs() {
        let pairs = UserForm::FIELDS.iter().map(|k| (*k, format!("v-{}", k)));
        let form = UserForm::from_pairs(pairs).unwrap();
        assert_eq!(form.street_number, "v-streetNumber");
        assert_eq!(form.image_url, "v-imageUrl");
    }

    #[test]
    fn test_form_from_pairs_reports_all_missing_keys() {
        let err = UserForm::from_pairs([("firstName", "A"), ("junk", "x")]).unwrap_err();
        match err {
            ValidationError::MissingFields { fields } => {
                assert_eq!(fields.len(), 8);
                assert!(fields.contains(&"streetNumber".to_string()));
                assert!(!fields.contains(&"firstName".to_string()));
            }
            other => panic!("Expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn test_form_validation_collects_errors() {
        let mut form = sample_form();
        assert!(form.validate().is_ok());

        form.first_name = "  ".to_string();
        form.email = "nope".to_string();
        form.image_url = "ftp://x".to_string();

        match form.validate().unwrap_err() {
            ValidationError::FieldErrors(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["firstName", "email", "imageUrl"]);
            }
            other => panic!("Expected FieldErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_form_from_record_prefills() {
        let record = sample_form();
        let body = RecordBody {
            id: None,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            phone_number: record.phone_number.clone(),
            image_url: record.image_url.clone(),
            address: record.clone().into_parts().1,
            created_at: Some("2022-01-01T00:00:00.000Z".to_string()),
            updated_at: "2022-01-01T00:00:00.000Z".to_string(),
        };
        let stored = body.into_record(RecordId::from("u1"));
        assert_eq!(UserForm::from_record(&stored), record);
    }

    #[test]
    fn test_body_omits_id_on_create() {
        let (scalars, address) = sample_form().into_parts();
        let body = RecordBody {
            id: None,
            first_name: scalars.first_name,
            last_name: scalars.last_name,
            email: scalars.email,
            phone_number: scalars.phone_number,
            image_url: scalars.image_url,
            address,
            created_at: Some("2022-01-01T00:00:00.000Z".to_string()),
            updated_at: "2022-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("_id").is_none());
        assert!(value.get("country").is_none());
        assert_eq!(value["address"]["country"], "Bulgaria");
        assert_eq!(value["createdAt"], "2022-01-01T00:00:00.000Z");
    }
}
