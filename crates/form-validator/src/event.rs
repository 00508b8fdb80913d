// crates/form-validator/src/event.rs
// ============================================================================
// Module: Validation Events
// Description: UI event flags that trigger debounced revalidation.
// Purpose: Let each unit choose which component events it reacts to.
// Dependencies: serde, std::{fmt, ops}
// ============================================================================

//! ## Overview
//! Components report edits as [`ValidationEvent`] flags. A unit's event mask
//! decides whether an event schedules revalidation; `ALL` matches anything.

use std::fmt;
use std::ops::BitOr;

use serde::Deserialize;
use serde::Serialize;

/// Component event flags
///
/// # Invariants
/// - Only the four defined bits are meaningful.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationEvent(u8);

impl ValidationEvent {
    /// The component value changed
    pub const CHANGE: Self = Self(1 << 0);
    /// The user started editing the component
    pub const BEGIN_EDITING: Self = Self(1 << 1);
    /// The user finished editing the component
    pub const END_EDITING: Self = Self(1 << 2);
    /// Every event
    pub const ALL: Self = Self(1 << 3);

    /// Returns the raw flag bits
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true when this mask reacts to `event`
    #[must_use]
    pub const fn matches(self, event: Self) -> bool {
        self.0 & Self::ALL.0 != 0 || self.0 & event.0 != 0
    }
}

impl Default for ValidationEvent {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ValidationEvent {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::CHANGE, "change"),
            (Self::BEGIN_EDITING, "begin_editing"),
            (Self::END_EDITING, "end_editing"),
            (Self::ALL, "all"),
        ];
        let mut list = f.debug_set();
        for (flag, name) in names {
            if self.0 & flag.0 != 0 {
                list.entry(&name);
            }
        }
        list.finish()
    }
}
