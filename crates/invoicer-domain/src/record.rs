//! CanonicalRecord module - the fixed ten-field output of one document

use crate::field::Field;

/// The extracted fields of one invoice
///
/// Every canonical field is always present. A field that could not be
/// extracted holds the empty string, never "missing".
///
/// # Examples
///
/// ```
/// use invoicer_domain::{CanonicalRecord, Field};
///
/// let mut record = CanonicalRecord::default();
/// assert_eq!(record.get(Field::Total), "");
///
/// record.set(Field::Total, "1500.00");
/// assert_eq!(record.get(Field::Total), "1500.00");
/// assert_eq!(record.iter().count(), 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CanonicalRecord {
    values: [String; 10],
}

impl CanonicalRecord {
    /// Create an all-empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a field
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Replace the value of a field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Iterate over `(field, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .iter()
            .map(move |field| (*field, self.values[field.index()].as_str()))
    }

    /// Values in canonical order
    pub fn values(&self) -> &[String; 10] {
        &self.values
    }

    /// Whether every field is empty
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_empty())
    }

    /// Number of non-empty fields
    pub fn filled_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }
}
