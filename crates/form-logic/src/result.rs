// crates/form-logic/src/result.rs
// ============================================================================
// Module: Validation Result Domain
// Description: Bit-flag validation outcomes and their set algebra.
// Purpose: Represent single results and multi-child masks with one type.
// Dependencies: serde::{Deserialize, Serialize}, std::{fmt, ops}
// ============================================================================

//! ## Overview
//! A [`ValidationResult`] is a set of flag bits. A unit's cached result always
//! holds exactly one bit, while a resolution mask is the union of every
//! child's result so a parent can be resolved from the whole batch at once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::ops::BitOr;
use std::ops::BitOrAssign;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Type Aliases
// ============================================================================

/// Raw storage for result flags
pub type ResultBits = u8;

/// Every bit a result may carry
const ALL_BITS: ResultBits = 0b1_1111;

/// Flags in canonical order paired with their labels
const FLAG_LABELS: [(ValidationResult, &str); 5] = [
    (ValidationResult::UNVALIDATED, "unvalidated"),
    (ValidationResult::INVALID, "invalid"),
    (ValidationResult::VALID, "valid"),
    (ValidationResult::DEFAULT_VALID, "default_valid"),
    (ValidationResult::PENDING, "pending"),
];

/// Label used for the empty mask
const EMPTY_LABEL: &str = "empty";

// ============================================================================
// SECTION: Validation Result
// ============================================================================

/// Validation outcome flags
///
/// # Invariants
/// - Only the five defined bits may be set.
/// - Cached unit results hold exactly one bit; masks may hold several.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ValidationResult(ResultBits);

impl ValidationResult {
    /// No flags set; the identity for union
    pub const EMPTY: Self = Self(0);
    /// The field has not produced a verdict yet
    pub const UNVALIDATED: Self = Self(1 << 0);
    /// The rule rejected the field value
    pub const INVALID: Self = Self(1 << 1);
    /// The rule accepted the field value
    pub const VALID: Self = Self(1 << 2);
    /// The field still holds its default value and defaults are allowed
    pub const DEFAULT_VALID: Self = Self(1 << 3);
    /// An asynchronous rule has not completed yet
    pub const PENDING: Self = Self(1 << 4);

    /// Returns the raw flag bits
    #[must_use]
    pub const fn bits(self) -> ResultBits {
        self.0
    }

    /// Builds a result from raw bits, rejecting undefined bits
    #[must_use]
    pub const fn from_bits(bits: ResultBits) -> Option<Self> {
        if bits & !ALL_BITS == 0 { Some(Self(bits)) } else { None }
    }

    /// Builds a result from raw bits, dropping undefined bits
    #[must_use]
    pub const fn from_bits_truncate(bits: ResultBits) -> Self {
        Self(bits & ALL_BITS)
    }

    /// Returns true when every flag in `other` is present
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true when any flag in `other` is present
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the union of both flag sets
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the flags of `self` that are not in `other`
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Returns true when no flag is set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true when exactly one flag is set
    #[must_use]
    pub const fn is_single(self) -> bool {
        self.0.count_ones() == 1
    }

    /// Returns true for a single `VALID` or `DEFAULT_VALID` result
    #[must_use]
    pub const fn is_passing(self) -> bool {
        self.0 == Self::VALID.0 || self.0 == Self::DEFAULT_VALID.0
    }

    /// Iterates the set flags in canonical order
    pub fn iter(self) -> impl Iterator<Item = Self> {
        FLAG_LABELS.iter().map(|(flag, _)| *flag).filter(move |flag| self.contains(*flag))
    }

    /// Returns the label of a single flag, or `None` for masks
    #[must_use]
    pub fn flag_label(self) -> Option<&'static str> {
        FLAG_LABELS.iter().find(|(flag, _)| *flag == self).map(|(_, label)| *label)
    }
}

// ============================================================================
// SECTION: Operators
// ============================================================================

impl BitOr for ValidationResult {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for ValidationResult {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl FromIterator<Self> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::union)
    }
}

// ============================================================================
// SECTION: Labels
// ============================================================================

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(EMPTY_LABEL);
        }
        let mut first = true;
        for (flag, label) in FLAG_LABELS {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(label)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidationResult({self})")
    }
}

impl From<ValidationResult> for String {
    fn from(value: ValidationResult) -> Self {
        value.to_string()
    }
}

/// Error returned when a result label cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLabelError {
    /// The label fragment that was not recognized
    pub label: String,
}

impl fmt::Display for ResultLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown validation result label `{}`", self.label)
    }
}

impl std::error::Error for ResultLabelError {}

impl TryFrom<&str> for ValidationResult {
    type Error = ResultLabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed == EMPTY_LABEL {
            return Ok(Self::EMPTY);
        }
        trimmed
            .split('|')
            .map(|part| {
                let part = part.trim();
                FLAG_LABELS.iter().find(|(_, label)| *label == part).map(|(flag, _)| *flag).ok_or(
                    ResultLabelError {
                        label: part.to_string(),
                    },
                )
            })
            .collect()
    }
}

impl TryFrom<String> for ValidationResult {
    type Error = ResultLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}
