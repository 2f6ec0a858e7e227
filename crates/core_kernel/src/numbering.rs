//! Document numbering
//!
//! Human-readable document numbers in the `PREFIX-YYYY-NNNNN` format used on
//! printed invoices, payment receipts, and claim forms. Sequences restart at
//! 1 each calendar year per document kind, and allocation is atomic so
//! concurrent writers can never be handed the same number.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

/// Errors raised when parsing or constructing document numbers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NumberError {
    #[error("Malformed document number: {0}")]
    Malformed(String),

    #[error("Unknown document prefix: {0}")]
    UnknownPrefix(String),

    #[error("Document sequence must be at least 1")]
    InvalidSequence,
}

/// The kinds of numbered documents the billing system issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Payment,
    Claim,
}

impl DocumentKind {
    /// Returns the display prefix for this document kind
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INV",
            DocumentKind::Payment => "PAY",
            DocumentKind::Claim => "CLM",
        }
    }

    /// Resolves a prefix back to a document kind
    pub fn from_prefix(prefix: &str) -> Result<Self, NumberError> {
        match prefix {
            "INV" => Ok(DocumentKind::Invoice),
            "PAY" => Ok(DocumentKind::Payment),
            "CLM" => Ok(DocumentKind::Claim),
            other => Err(NumberError::UnknownPrefix(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// A year-scoped document number such as `INV-2025-00042`
///
/// The sequence is zero-padded to five digits and keeps growing naturally
/// past 99999. Numbers order by kind, then year, then sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentNumber {
    kind: DocumentKind,
    year: i32,
    sequence: u32,
}

impl DocumentNumber {
    /// Creates a document number, validating the sequence
    pub fn new(kind: DocumentKind, year: i32, sequence: u32) -> Result<Self, NumberError> {
        if sequence == 0 {
            return Err(NumberError::InvalidSequence);
        }
        if !(1000..=9999).contains(&year) {
            return Err(NumberError::Malformed(format!(
                "year {year} is not four digits"
            )));
        }
        Ok(Self {
            kind,
            year,
            sequence,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:05}",
            self.kind.prefix(),
            self.year,
            self.sequence
        )
    }
}

impl FromStr for DocumentNumber {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        let (prefix, year, sequence) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(y), Some(n)) => (p, y, n),
            _ => return Err(NumberError::Malformed(s.to_string())),
        };

        let kind = DocumentKind::from_prefix(prefix)?;
        if year.len() != 4 {
            return Err(NumberError::Malformed(s.to_string()));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| NumberError::Malformed(s.to_string()))?;
        if sequence.len() < 5 {
            return Err(NumberError::Malformed(s.to_string()));
        }
        let sequence: u32 = sequence
            .parse()
            .map_err(|_| NumberError::Malformed(s.to_string()))?;

        Self::new(kind, year, sequence)
    }
}

impl Serialize for DocumentNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocumentNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// Thread-safe allocator of per-kind, per-year document sequences
///
/// Allocation holds a single lock across read-increment-format, so two
/// concurrent callers always receive distinct numbers. This replaces
/// count-the-existing-rows numbering, which hands out duplicates when two
/// documents are created in the same instant.
#[derive(Debug, Default)]
pub struct SequenceAllocator {
    counters: Mutex<HashMap<(DocumentKind, i32), u32>>,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next number for the given kind and year
    pub fn allocate(&self, kind: DocumentKind, year: i32) -> Result<DocumentNumber, NumberError> {
        let mut counters = self.lock();
        let counter = counters.entry((kind, year)).or_insert(0);
        *counter += 1;
        DocumentNumber::new(kind, year, *counter)
    }

    /// Advances the counter past an externally-issued number
    ///
    /// Used when seeding the store with documents numbered elsewhere, so the
    /// next allocation continues after the highest imported sequence.
    pub fn resume_from(&self, number: &DocumentNumber) {
        let mut counters = self.lock();
        let counter = counters.entry((number.kind(), number.year())).or_insert(0);
        *counter = (*counter).max(number.sequence());
    }

    /// Returns the last sequence issued for the given kind and year
    pub fn current(&self, kind: DocumentKind, year: i32) -> u32 {
        self.lock().get(&(kind, year)).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(DocumentKind, i32), u32>> {
        // The counters stay consistent even if a previous holder panicked
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
