//! Core data models for the archives service.
//!
//! `Item` is the only stored entity. `CreateItemRequest` and
//! `UpdateItemRequest` are the strict request schemas accepted at the HTTP
//! boundary and sent by the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// ITEM
// =============================================================================

/// A single archived record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build a new item from a validated create request.
    pub fn from_request(id: Uuid, req: CreateItemRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: req.name,
            year: req.year,
            price: req.price.map(Price::Amount),
            tag: req.tag,
            note: req.note,
            image: req.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a validated update into this item.
    ///
    /// Absent fields are left alone, explicit nulls clear the field.
    pub fn apply_update(&mut self, req: UpdateItemRequest, now: DateTime<Utc>) {
        if let Some(name) = req.name {
            self.name = name;
        }
        if let Some(year) = req.year {
            self.year = year;
        }
        if let Some(price) = req.price {
            self.price = price.map(Price::Amount);
        }
        if let Some(tag) = req.tag {
            self.tag = tag;
        }
        if let Some(note) = req.note {
            self.note = note;
        }
        if let Some(image) = req.image {
            self.image = image;
        }
        self.updated_at = now;
    }
}

/// Price as held by a client.
///
/// The store only ever writes `Amount`, but records imported from elsewhere
/// or edited by hand may carry a textual price. Text is coerced the way a
/// loosely typed client would treat it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl Price {
    /// Numeric value of the price, if it can be read as a number.
    ///
    /// May return NaN or infinities for text such as `"NaN"`; callers that
    /// need a usable amount must check `is_finite`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Price::Amount(v) => Some(*v),
            Price::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
        }
    }
}

impl From<f64> for Price {
    fn from(v: f64) -> Self {
        Price::Amount(v)
    }
}

impl From<&str> for Price {
    fn from(s: &str) -> Self {
        Price::Text(s.to_string())
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Request for creating a new item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CreateItemRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Validate and normalize the request.
    ///
    /// Trims the name and tag, drops blank optional text, and rejects an
    /// empty name or a negative/non-finite price.
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            year: self.year,
            price: self.price.map(validate_price).transpose()?,
            tag: normalize_tag(self.tag),
            note: normalize_text(self.note),
            image: normalize_text(self.image),
        })
    }
}

/// Request for updating an item (merge-by-field).
///
/// For optional fields, a missing key leaves the stored value unchanged,
/// `null` clears it, and a value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i32>)]
    pub year: Option<Option<i32>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub tag: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub note: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
}

impl UpdateItemRequest {
    /// True when the request carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.year.is_none()
            && self.price.is_none()
            && self.tag.is_none()
            && self.note.is_none()
            && self.image.is_none()
    }

    /// Validate and normalize the supplied fields.
    ///
    /// A blank tag/note/image is turned into an explicit clear.
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            name: self.name.as_deref().map(validate_name).transpose()?,
            year: self.year,
            price: match self.price {
                Some(Some(p)) => Some(Some(validate_price(p)?)),
                other => other,
            },
            tag: self.tag.map(normalize_tag),
            note: self.note.map(normalize_text),
            image: self.image.map(normalize_text),
        })
    }
}

/// Distinguishes an explicit `null` from a missing key.
fn nullable<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// VALIDATION HELPERS
// =============================================================================

/// Trim a name and reject it when empty.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("Item name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Accept only finite, non-negative prices.
pub fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        return Err(Error::InvalidInput("Price must be a finite number".to_string()));
    }
    if price < 0.0 {
        return Err(Error::InvalidInput("Price must not be negative".to_string()));
    }
    Ok(price)
}

fn normalize_tag(tag: Option<String>) -> Option<String> {
    tag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn normalize_text(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
