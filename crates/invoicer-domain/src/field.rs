//! Field module - the canonical invoice schema

use std::fmt;

/// One of the ten canonical invoice fields
///
/// The declaration order is the column order of every result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Invoice number
    InvoiceNo,

    /// Main item or service description
    Description,

    /// Item quantity
    Quantity,

    /// Invoice date
    Date,

    /// Price per unit
    UnitPrice,

    /// Line amount
    Amount,

    /// Invoice total
    Total,

    /// Contact e-mail
    Email,

    /// Contact phone number
    PhoneNumber,

    /// Postal address
    Address,
}

/// How a field's value is coerced during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Trimmed free text
    Text,

    /// Monetary value: digits, `.` and `-` only
    Money,

    /// Phone number: digits only
    Phone,
}

/// Synonyms accepted in addition to the canonical name.
///
/// Keys are already in folded form (see [`fold_key`]).
const SYNONYMS: &[(&str, Field)] = &[
    ("invoice no", Field::InvoiceNo),
    ("invoice number", Field::InvoiceNo),
    ("invoice", Field::InvoiceNo),
    ("invoice id", Field::InvoiceNo),
    ("qty", Field::Quantity),
    ("invoice date", Field::Date),
    ("price", Field::UnitPrice),
    ("line total", Field::Amount),
    ("total amount", Field::Total),
    ("grand total", Field::Total),
    ("e mail", Field::Email),
    ("email address", Field::Email),
    ("phone", Field::PhoneNumber),
    ("telephone", Field::PhoneNumber),
    ("phone no", Field::PhoneNumber),
];

impl Field {
    /// All fields in canonical column order
    pub const ALL: [Field; 10] = [
        Field::InvoiceNo,
        Field::Description,
        Field::Quantity,
        Field::Date,
        Field::UnitPrice,
        Field::Amount,
        Field::Total,
        Field::Email,
        Field::PhoneNumber,
        Field::Address,
    ];

    /// Get the field name with its exact canonical casing
    pub fn name(&self) -> &'static str {
        match self {
            Field::InvoiceNo => "Invoice no.",
            Field::Description => "Description",
            Field::Quantity => "Quantity",
            Field::Date => "Date",
            Field::UnitPrice => "Unit price",
            Field::Amount => "Amount",
            Field::Total => "Total",
            Field::Email => "Email",
            Field::PhoneNumber => "Phone number",
            Field::Address => "Address",
        }
    }

    /// Get the coercion applied to this field's values
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::UnitPrice | Field::Amount | Field::Total => FieldKind::Money,
            Field::PhoneNumber => FieldKind::Phone,
            _ => FieldKind::Text,
        }
    }

    /// Position of this field in [`Field::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Resolve a key emitted by a language model to a canonical field
    ///
    /// Matching ignores case, surrounding whitespace and the difference
    /// between `_`, `-` and spaces. The boolean is `true` when the key is
    /// the canonical name itself rather than a synonym.
    ///
    /// # Examples
    ///
    /// ```
    /// use invoicer_domain::Field;
    ///
    /// assert_eq!(Field::from_alias("  invoice NO. "), Some((Field::InvoiceNo, true)));
    /// assert_eq!(Field::from_alias("phone"), Some((Field::PhoneNumber, false)));
    /// assert_eq!(Field::from_alias("vat"), None);
    /// ```
    pub fn from_alias(key: &str) -> Option<(Field, bool)> {
        let folded = fold_key(key);
        if folded.is_empty() {
            return None;
        }

        if let Some(field) = Field::ALL
            .iter()
            .find(|f| fold_key(f.name()) == folded)
        {
            return Some((*field, true));
        }

        // Synonyms are compared without a trailing period ("invoice no." == "invoice no")
        let bare = folded.trim_end_matches('.');
        SYNONYMS
            .iter()
            .find(|(alias, _)| *alias == bare)
            .map(|(_, field)| (*field, false))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase a key and collapse `_`, `-` and whitespace runs into one space
fn fold_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending_space = false;

    for c in key.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.extend(c.to_lowercase());
    }

    out
}
