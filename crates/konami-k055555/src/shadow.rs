//! Shadow priority tables.
//!
//! Each of the three shadow groups compares the winning priority of a pixel
//! against a threshold register. The comparison result is folded into a
//! 256-entry table so the mixer does one lookup per output pixel.

/// Number of shadow groups with their own threshold (groups 1-3).
pub const SHADOW_GROUPS: usize = 3;

/// Comparison selected by a 2-bit field of the shadow select register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowMode {
    #[default]
    Disabled,
    /// Priorities at or above the threshold are flagged.
    GreaterOrEqual,
    Equal,
    /// Priorities at or below the threshold are flagged.
    LessOrEqual,
}

impl ShadowMode {
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Self::Disabled,
            1 => Self::GreaterOrEqual,
            2 => Self::Equal,
            _ => Self::LessOrEqual,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::GreaterOrEqual => 1,
            Self::Equal => 2,
            Self::LessOrEqual => 3,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disabled => "off",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::LessOrEqual => "<=",
        }
    }

    const fn flags(self, priority: u8, threshold: u8) -> bool {
        match self {
            Self::Disabled => false,
            Self::GreaterOrEqual => priority >= threshold,
            Self::Equal => priority == threshold,
            Self::LessOrEqual => priority <= threshold,
        }
    }
}

/// Per-priority XOR values for one shadow group.
///
/// A shadow-eligible output attribute arrives with bit 0 set. XORing with the
/// table entry leaves the shadow level in bits 0-1: the group number when the
/// priority is flagged, zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowValueTable {
    group: u8,
    values: [u16; 256],
}

impl ShadowValueTable {
    /// Table for a group that never flags (group 0, or a disabled mode).
    #[must_use]
    pub const fn unflagged(group: u8) -> Self {
        Self {
            group: group & 3,
            values: [1; 256],
        }
    }

    /// Build the whole table for `group` in one go.
    #[must_use]
    pub fn build(group: u8, mode: ShadowMode, threshold: u8) -> Self {
        let group = group & 3;
        let mut values = [1u16; 256];
        if group != 0 {
            for (priority, value) in (0..=255u8).zip(values.iter_mut()) {
                if mode.flags(priority, threshold) {
                    *value = u16::from(group ^ 1);
                }
            }
        }
        Self { group, values }
    }

    #[must_use]
    pub const fn group(&self) -> u8 {
        self.group
    }

    /// XOR value for the given winning priority.
    #[must_use]
    pub const fn xor_value(&self, priority: u8) -> u16 {
        self.values[priority as usize]
    }

    #[must_use]
    pub const fn is_flagged(&self, priority: u8) -> bool {
        self.group != 0 && self.values[priority as usize] != 1
    }

    /// Number of flagged priorities.
    #[must_use]
    pub fn flagged_count(&self) -> usize {
        (0..=255u8).filter(|&p| self.is_flagged(p)).count()
    }
}
