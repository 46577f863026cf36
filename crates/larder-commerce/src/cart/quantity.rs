//! Quantity rules for cart lines.
//!
//! Weight quantities go through two phases. While the customer is typing,
//! [`WeightDraft::edit`] keeps short values verbatim so "1" can grow into
//! "100". On confirm, [`WeightAmount::commit`] clamps and snaps strictly.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Smallest weight quantity a line may hold.
pub const MIN_WEIGHT: u32 = 25;
/// Weight quantities are multiples of this; also the +/- step.
pub const WEIGHT_STEP: u32 = 5;
/// Weight added when no quantity is given and nothing was added before.
pub const DEFAULT_WEIGHT: u32 = 100;
/// Live-edit values below this are kept verbatim.
pub const LIVE_EDIT_VERBATIM_BELOW: u32 = 100;
/// Largest weight quantity a line may hold.
pub const MAX_WEIGHT_PER_LINE: u32 = 999_995;

/// Smallest unit count a line may hold.
pub const MIN_UNITS: u32 = 1;
/// Largest unit count a line may hold.
pub const MAX_UNITS_PER_LINE: u32 = 9999;

/// Snap a value to a multiple of 5 by its last decimal digit.
///
/// 1-2 round down to the lower ten, 3-7 go to the five, 8-9 round up to
/// the next ten.
pub fn snap_to_step(value: u32) -> u32 {
    let last = value % 10;
    if last < 3 {
        value - last
    } else if last < 8 {
        value - last + 5
    } else {
        value + (10 - last)
    }
}

/// Parse quantity text as typed by a customer.
pub fn parse_quantity(text: &str) -> Result<i64, CommerceError> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| CommerceError::InvalidQuantity(trimmed.to_string()))
}

/// Strict commit of a raw weight value.
pub fn commit_weight(raw: i64) -> WeightAmount {
    WeightAmount::commit(raw)
}

/// Strict commit of a raw unit count.
pub fn commit_units(raw: i64) -> UnitCount {
    UnitCount::commit(raw)
}

/// A committed weight quantity: a multiple of 5, at least 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct WeightAmount(u32);

impl WeightAmount {
    /// Clamp to the valid range and snap to the step.
    pub fn commit(raw: i64) -> Self {
        let clamped = raw.clamp(i64::from(MIN_WEIGHT), i64::from(MAX_WEIGHT_PER_LINE));
        // clamped fits in u32 by construction
        let value = u32::try_from(clamped).unwrap_or(MIN_WEIGHT);
        Self(snap_to_step(value).clamp(MIN_WEIGHT, MAX_WEIGHT_PER_LINE))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Add `amount` and re-commit.
    pub fn plus(self, amount: u32) -> Self {
        Self::commit(i64::from(self.0) + i64::from(amount))
    }

    /// One step up.
    pub fn step_up(self) -> Self {
        self.plus(WEIGHT_STEP)
    }

    /// One step down, never below the minimum.
    pub fn step_down(self) -> Self {
        Self::commit(i64::from(self.0) - i64::from(WEIGHT_STEP))
    }
}

impl Default for WeightAmount {
    fn default() -> Self {
        Self(DEFAULT_WEIGHT)
    }
}

impl From<u32> for WeightAmount {
    fn from(value: u32) -> Self {
        Self::commit(i64::from(value))
    }
}

impl From<WeightAmount> for u32 {
    fn from(value: WeightAmount) -> Self {
        value.0
    }
}

/// A weight value while it is still being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightDraft(u32);

impl WeightDraft {
    /// Accept a keystroke-level value.
    ///
    /// Values below 100 pass through untouched; longer values are snapped.
    pub fn edit(raw: u32) -> Self {
        if raw < LIVE_EDIT_VERBATIM_BELOW {
            Self(raw)
        } else {
            Self(snap_to_step(raw))
        }
    }

    /// Accept raw text; anything unparseable or negative reads as zero.
    pub fn edit_text(text: &str) -> Self {
        let raw = parse_quantity(text)
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        Self::edit(raw)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Finish editing: clamp and snap.
    pub fn commit(self) -> WeightAmount {
        WeightAmount::commit(i64::from(self.0))
    }
}

/// A committed unit count, at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct UnitCount(u32);

impl UnitCount {
    pub fn commit(raw: i64) -> Self {
        let clamped = raw.clamp(i64::from(MIN_UNITS), i64::from(MAX_UNITS_PER_LINE));
        Self(u32::try_from(clamped).unwrap_or(MIN_UNITS))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn plus(self, amount: u32) -> Self {
        Self::commit(i64::from(self.0) + i64::from(amount))
    }

    pub fn step_up(self) -> Self {
        self.plus(1)
    }

    pub fn step_down(self) -> Self {
        Self::commit(i64::from(self.0) - 1)
    }
}

impl Default for UnitCount {
    fn default() -> Self {
        Self(MIN_UNITS)
    }
}

impl From<u32> for UnitCount {
    fn from(value: u32) -> Self {
        Self::commit(i64::from(value))
    }
}

impl From<UnitCount> for u32 {
    fn from(value: UnitCount) -> Self {
        value.0
    }
}
