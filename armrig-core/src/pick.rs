//! Pick identifiers.
//!
//! The front end renders every drawable with its id as a flat value into an
//! offscreen buffer cleared to [`PickId::BACKGROUND`], then reads the single
//! value under the cursor back through [`PickResult::from_channel`].

use std::fmt;

/// Stable small identifier written into the pick buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickId(u8);

impl PickId {
    /// Channel value of a cleared pick buffer
    pub const BACKGROUND: u8 = 255;

    /// `None` for the reserved background value
    pub fn new(value: u8) -> Option<Self> {
        (value != Self::BACKGROUND).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Decoded result of a pick readback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    Background,
    Object(PickId),
}

impl PickResult {
    pub fn from_channel(value: u8) -> Self {
        match PickId::new(value) {
            Some(id) => Self::Object(id),
            None => Self::Background,
        }
    }
}

impl fmt::Display for PickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::Object(id) => write!(f, "point {}", id.value()),
        }
    }
}
