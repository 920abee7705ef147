//! Core record types for fleetbook.
//!
//! This module defines the vehicle record as persisted in the document
//! collection, the id-less payload sent to the store, and the editable draft
//! the form works on.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Length of generated document ids.
const ID_LEN: usize = 20;

/// Process-wide sequence mixed into generated ids.
static ID_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Opaque document identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a fresh identifier for a document in `collection`.
    ///
    /// The id is the first 20 hex characters of a BLAKE3 hash over the
    /// collection name, a process-wide sequence number, and the current time.
    #[must_use]
    pub fn generate(collection: &str) -> Self {
        let seq = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let mut hasher = blake3::Hasher::new();
        hasher.update(collection.as_bytes());
        hasher.update(&seq.to_le_bytes());
        hasher.update(&nanos.to_le_bytes());

        let mut hex = hasher.finalize().to_hex().to_string();
        hex.truncate(ID_LEN);
        Self(hex)
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
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
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The fields of a vehicle document, without its identifier.
///
/// This is the payload written by `create` and `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    /// License plate.
    pub plate: String,
    /// Manufacturer.
    pub brand: String,
    /// Paint color.
    pub color: String,
    /// Model name.
    pub model: String,
    /// Engine description, e.g. `1.8L`.
    pub engine: String,
    /// Model year, kept as entered.
    pub year: String,
    /// Asking price.
    pub price: f64,
}

/// A persisted vehicle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The document body.
    #[serde(flatten)]
    pub fields: RecordFields,
}

impl Record {
    /// Pair an id with its fields.
    #[must_use]
    pub fn new(id: RecordId, fields: RecordFields) -> Self {
        Self { id, fields }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.fields;
        write!(
            f,
            "{} - {} - {} - {} - {} - {} - {}",
            r.brand, r.model, r.color, r.plate, r.year, r.price, r.engine
        )
    }
}

/// A single editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// License plate.
    Plate,
    /// Manufacturer.
    Brand,
    /// Paint color.
    Color,
    /// Model name.
    Model,
    /// Engine description.
    Engine,
    /// Model year.
    Year,
    /// Asking price.
    Price,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 7] = [
        Field::Brand,
        Field::Model,
        Field::Color,
        Field::Plate,
        Field::Year,
        Field::Price,
        Field::Engine,
    ];

    /// Lowercase name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Plate => "plate",
            Self::Brand => "brand",
            Self::Color => "color",
            Self::Model => "model",
            Self::Engine => "engine",
            Self::Year => "year",
            Self::Price => "price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// The in-progress, possibly invalid copy of a record held by the form.
///
/// Drafts are values: every edit produces a new draft instead of mutating
/// the current one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    /// License plate.
    pub plate: String,
    /// Manufacturer.
    pub brand: String,
    /// Paint color.
    pub color: String,
    /// Model name.
    pub model: String,
    /// Engine description.
    pub engine: String,
    /// Model year.
    pub year: String,
    /// Asking price. `NaN` when the entered text was not a number.
    pub price: f64,
}

impl Draft {
    /// An empty draft, as shown in create mode.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A draft pre-filled from an existing record.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        let f = &record.fields;
        Self {
            plate: f.plate.clone(),
            brand: f.brand.clone(),
            color: f.color.clone(),
            model: f.model.clone(),
            engine: f.engine.clone(),
            year: f.year.clone(),
            price: f.price,
        }
    }

    /// Return a copy of this draft with one field replaced.
    ///
    /// No validation happens here. A price that does not parse as a number
    /// (or overflows to infinity) is stored as `NaN` and rejected later by the
    /// validator; a blank price becomes `0`.
    #[must_use]
    pub fn with_field(&self, field: Field, value: &str) -> Self {
        let mut next = self.clone();
        let value = value.to_string();
        match field {
            Field::Plate => next.plate = value,
            Field::Brand => next.brand = value,
            Field::Color => next.color = value,
            Field::Model => next.model = value,
            Field::Engine => next.engine = value,
            Field::Year => next.year = value,
            Field::Price => next.price = parse_price(&value),
        }
        next
    }

    /// Return a copy of this draft with the price replaced.
    #[must_use]
    pub fn with_price(&self, price: f64) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    /// The current text of a field, as it would be shown in the form.
    ///
    /// A blank or unparseable price shows as an empty field.
    #[must_use]
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Plate => self.plate.clone(),
            Field::Brand => self.brand.clone(),
            Field::Color => self.color.clone(),
            Field::Model => self.model.clone(),
            Field::Engine => self.engine.clone(),
            Field::Year => self.year.clone(),
            Field::Price if self.price.is_normal() => self.price.to_string(),
            Field::Price => String::new(),
        }
    }

    /// The six text fields, in no particular order.
    #[must_use]
    pub fn text_fields(&self) -> [&str; 6] {
        [
            &self.plate,
            &self.brand,
            &self.color,
            &self.model,
            &self.engine,
            &self.year,
        ]
    }

    /// Convert the draft into a store payload, values as typed.
    #[must_use]
    pub fn to_fields(&self) -> RecordFields {
        RecordFields {
            plate: self.plate.clone(),
            brand: self.brand.clone(),
            color: self.color.clone(),
            model: self.model.clone(),
            engine: self.engine.clone(),
            year: self.year.clone(),
            price: self.price,
        }
    }
}

fn parse_price(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        0.0
    } else {
        value
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .unwrap_or(f64::NAN)
    }
}
