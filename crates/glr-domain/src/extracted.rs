//! Extracted data - the complete field mapping produced by one extraction run

use crate::field::ExtractionField;
use std::collections::BTreeMap;

/// Value extracted for one field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// Text copied from the evidence
    Found(String),

    /// The evidence did not contain this field
    #[default]
    NotFound,
}

impl FieldValue {
    /// Build a value from raw model text; blank text means `NotFound`
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            FieldValue::NotFound
        } else if trimmed.len() == text.len() {
            FieldValue::Found(text)
        } else {
            FieldValue::Found(trimmed.to_string())
        }
    }

    /// The found text, if any
    pub fn as_found(&self) -> Option<&str> {
        match self {
            FieldValue::Found(text) => Some(text),
            FieldValue::NotFound => None,
        }
    }

    /// Whether a value was found
    pub fn is_found(&self) -> bool {
        matches!(self, FieldValue::Found(_))
    }

    /// Wire form: the found text, or the empty string for `NotFound`
    pub fn as_wire_str(&self) -> &str {
        self.as_found().unwrap_or("")
    }
}

/// Mapping from every [`ExtractionField`] to a [`FieldValue`]
///
/// The mapping is always complete: construction fills every field that was
/// not supplied with [`FieldValue::NotFound`], and there is no way to remove
/// an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedData {
    values: BTreeMap<ExtractionField, FieldValue>,
}

impl ExtractedData {
    /// Every field marked `NotFound`
    pub fn not_found() -> Self {
        Self {
            values: ExtractionField::ALL
                .iter()
                .map(|field| (*field, FieldValue::NotFound))
                .collect(),
        }
    }

    /// Build from a partial set of values; missing fields become `NotFound`
    ///
    /// # Examples
    ///
    /// ```
    /// use glr_domain::{ExtractedData, ExtractionField, FieldValue};
    ///
    /// let data = ExtractedData::from_values([
    ///     (ExtractionField::InsuredName, FieldValue::from_text("Jane Doe")),
    /// ]);
    /// assert_eq!(data.get(ExtractionField::InsuredName).as_found(), Some("Jane Doe"));
    /// assert!(!data.get(ExtractionField::DateLoss).is_found());
    /// assert_eq!(data.len(), ExtractionField::ALL.len());
    /// ```
    pub fn from_values(values: impl IntoIterator<Item = (ExtractionField, FieldValue)>) -> Self {
        let mut data = Self::not_found();
        for (field, value) in values {
            data.set(field, value);
        }
        data
    }

    /// Replace the value for one field
    pub fn set(&mut self, field: ExtractionField, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Get the value for a field; every field is always present
    pub fn get(&self, field: ExtractionField) -> &FieldValue {
        self.values.get(&field).unwrap_or(&FieldValue::NotFound)
    }

    /// Iterate in field declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ExtractionField, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Fields that have a value
    pub fn found(&self) -> impl Iterator<Item = (ExtractionField, &str)> {
        self.iter()
            .filter_map(|(field, value)| value.as_found().map(|text| (field, text)))
    }

    /// Number of fields with a value
    pub fn found_count(&self) -> usize {
        self.found().count()
    }

    /// Number of entries (always the full field count)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; the mapping is never empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for ExtractedData {
    fn default() -> Self {
        Self::not_found()
    }
}
