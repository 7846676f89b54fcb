//! Destruction Status Module
//!
//! Derives a document's destruction status at render time; nothing is
//! stored. The backend delivers destruction dates as `YYYY-MM-DD`-like
//! strings; dashes are normalized to slashes before parsing (the original
//! flow does this to dodge timezone-shifted date parsing) and an unparsable
//! value maps to an explicit invalid band instead of an error.

use crate::entity::PhysicalDocument;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived destruction status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionStatus {
    /// Permanent archive, never destroyed ("Permanente")
    Permanent,
    /// No destruction date set ("Não Definido")
    Undefined,
    /// Destruction date present but unparsable ("Data Inválida")
    Invalid,
    /// Destruction date before today ("Vencido")
    Overdue,
    /// Destruction date today or later ("A Vencer")
    Upcoming,
}

impl DestructionStatus {
    /// Display label, matching what the screens render.
    pub fn label(&self) -> &'static str {
        match self {
            DestructionStatus::Permanent => "Permanente",
            DestructionStatus::Undefined => "Não Definido",
            DestructionStatus::Invalid => "Data Inválida",
            DestructionStatus::Overdue => "Vencido",
            DestructionStatus::Upcoming => "A Vencer",
        }
    }
}

impl fmt::Display for DestructionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a destruction date string, tolerating both `-` and `/` separators.
fn parse_destruction_date(raw: &str) -> Option<NaiveDate> {
    let normalized = raw.trim().replace('-', "/");
    NaiveDate::parse_from_str(&normalized, "%Y/%m/%d").ok()
}

/// Derive the destruction status of a document as of `today`.
///
/// `is_permanent` wins over everything, including a malformed or missing
/// date. A date equal to `today` is not yet overdue. There is no separate
/// far-future band: anything not yet due is `Upcoming`.
pub fn destruction_status(document: &PhysicalDocument, today: NaiveDate) -> DestructionStatus {
    if document.is_permanent {
        return DestructionStatus::Permanent;
    }
    let Some(raw) = document.destruction_date.as_deref() else {
        return DestructionStatus::Undefined;
    };
    match parse_destruction_date(raw) {
        None => DestructionStatus::Invalid,
        Some(date) if date < today => DestructionStatus::Overdue,
        Some(_) => DestructionStatus::Upcoming,
    }
}

/// Derive the destruction status against the local calendar date.
pub fn destruction_status_today(document: &PhysicalDocument) -> DestructionStatus {
    destruction_status(document, chrono::Local::now().date_naive())
}
