//! Searchable/sortable field inventory and input formats

use crate::core::error::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A field the directory can be searched and sorted by
///
/// The inventory is fixed. Wire names match the JSON keys of a stored user,
/// labels match the column headers of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    CreatedAt,
}

impl RecordField {
    /// Every searchable/sortable field, in column order
    pub const ALL: [RecordField; 5] = [
        RecordField::FirstName,
        RecordField::LastName,
        RecordField::Email,
        RecordField::PhoneNumber,
        RecordField::CreatedAt,
    ];

    /// JSON key of the field on a stored record
    pub fn wire_name(self) -> &'static str {
        match self {
            RecordField::FirstName => "firstName",
            RecordField::LastName => "lastName",
            RecordField::Email => "email",
            RecordField::PhoneNumber => "phoneNumber",
            RecordField::CreatedAt => "createdAt",
        }
    }

    /// Column header label
    pub fn label(self) -> &'static str {
        match self {
            RecordField::FirstName => "First name",
            RecordField::LastName => "Last name",
            RecordField::Email => "Email",
            RecordField::PhoneNumber => "Phone",
            RecordField::CreatedAt => "Created",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Accepts either the wire name or the column label
impl FromStr for RecordField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_name(s)
            .or_else(|| Self::from_label(s))
            .ok_or_else(|| ValidationError::UnknownField {
                field: s.to_string(),
            })
    }
}

/// Format checks applied to form input before it is written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    Email,
    Url,
    Phone,
}

impl FieldFormat {
    /// Validate a raw value against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Url => Self::is_valid_url(value),
            FieldFormat::Phone => Self::is_valid_phone(value),
        }
    }

    /// Short human description used in validation messages
    pub fn describe(&self) -> &'static str {
        match self {
            FieldFormat::Email => "must be a valid email address",
            FieldFormat::Url => "must be an http(s) URL",
            FieldFormat::Phone => "must be 8 to 15 digits with an optional leading +",
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("email pattern is valid")
        });
        regex.is_match(email)
    }

    fn is_valid_url(url: &str) -> bool {
        static URL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = URL_REGEX.get_or_init(|| {
            Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern is valid")
        });
        regex.is_match(url)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX.get_or_init(|| {
            // E.164 length bounds
            Regex::new(r"^\+?[0-9]{8,15}$").expect("phone pattern is valid")
        });
        regex.is_match(phone)
    }
}
