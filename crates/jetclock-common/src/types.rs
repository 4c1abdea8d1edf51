use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of plugin slots around the clock face.
pub const SLOT_COUNT: usize = 12;

/// Order in which slots are handed out: opposite hours first so a
/// partially filled face stays balanced.
pub const SLOT_ORDER: [u8; SLOT_COUNT] = [6, 12, 3, 9, 2, 10, 4, 8, 1, 11, 5, 7];

/// A plugin slot, addressed by its clock-face hour (1..=12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotHour(u8);

impl SlotHour {
    pub fn new(hour: u8) -> Option<Self> {
        (1..=12).contains(&hour).then_some(Self(hour))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Angle of this hour on the clock face, clockwise from 12, in degrees.
    pub fn angle_degrees(self) -> f64 {
        f64::from(self.0 % 12) * 30.0
    }
}

impl fmt::Display for SlotHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

/// Wireless interface mode as reported by the native side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WifiMode {
    #[default]
    Unknown,
    Infrastructure,
    AccessPoint,
}

impl WifiMode {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Infrastructure,
            2 => Self::AccessPoint,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Infrastructure => 1,
            Self::AccessPoint => 2,
        }
    }
}

impl fmt::Display for WifiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Infrastructure => "infrastructure",
            Self::AccessPoint => "access-point",
        };
        f.write_str(s)
    }
}
