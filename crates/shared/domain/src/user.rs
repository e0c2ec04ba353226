//! User domain entity and related types.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// User as submitted by a caller (no identifier).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Given name, also the enrichment lookup key
    pub name: String,
    /// Family name
    pub surname: String,
    /// Patronymic (optional, empty when not given)
    #[serde(default)]
    pub patronymic: String,
}

/// Demographic attributes derived for a given name.
///
/// Produced per enrichment call, never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    /// Predicted age, 0 when the provider had no prediction
    pub age: i32,
    /// Predicted gender, empty when absent
    pub gender: String,
    /// Most likely country code, empty when absent
    pub country: String,
}

/// The six mutable persisted fields of a user (a record without its id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

impl UserFields {
    /// Combine caller input with the latest enrichment result.
    pub fn enriched(user: User, attributes: AttributeSet) -> Self {
        Self {
            name: user.name,
            surname: user.surname,
            patronymic: user.patronymic,
            age: attributes.age,
            gender: attributes.gender,
            nationality: attributes.country,
        }
    }
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserRecord {
    /// Store-assigned identifier
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
}

impl UserRecord {
    /// Build a record from a store-assigned id and its fields.
    pub fn from_fields(id: i32, fields: UserFields) -> Self {
        Self {
            id,
            name: fields.name,
            surname: fields.surname,
            patronymic: fields.patronymic,
            age: fields.age,
            gender: fields.gender,
            nationality: fields.nationality,
        }
    }

    /// The record's mutable fields, without the id.
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            surname: self.surname.clone(),
            patronymic: self.patronymic.clone(),
            age: self.age,
            gender: self.gender.clone(),
            nationality: self.nationality.clone(),
        }
    }
}

/// Parse a caller-supplied user identifier.
///
/// Anything that is not a positive integer can never match a stored record,
/// so it is reported as not found rather than as malformed input.
pub fn parse_user_id(raw: &str) -> DomainResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(DomainError::not_found(format!("User '{}'", raw))),
    }
}
