#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::frame::{FlipBit, FRAME_BITS};

pub const DEFAULT_HEADER_HIGH: u32 = 3100;
pub const DEFAULT_HEADER_LOW: u32 = 1550;
pub const DEFAULT_BIT_HIGH: u32 = 540;
pub const DEFAULT_BIT_ONE_LOW: u32 = 1070;
pub const DEFAULT_BIT_ZERO_LOW: u32 = 290;
pub const DEFAULT_TOLERANCE_PERCENT: u8 = 25;

/// Sentinel for `flip_bit_num` meaning "don't flip anything".
pub const NO_FLIP: i32 = -1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TimingError {
    #[error("{name} must be a positive duration")]
    ZeroDuration { name: &'static str },

    #[error("flip bit {bit} is outside the frame (expected -1 or 0..{max})", max = FRAME_BITS)]
    FlipBitOutOfRange { bit: i32 },

    #[error("tolerance of {percent}% is out of range (expected 0..100)")]
    ToleranceOutOfRange { percent: u8 },

    #[error("bit_one_low and bit_zero_low are both {us}us, so bits cannot be told apart")]
    IndistinguishableBits { us: u32 },
}

/// User-facing timing settings, all durations in microseconds.
///
/// This is the unvalidated form, convenient for building with struct update
/// syntax or deserializing. Convert it into a [`TimingProfile`] before use.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TimingConfig {
    pub header_high: u32,
    pub header_low: u32,
    pub bit_high: u32,
    pub bit_one_low: u32,
    pub bit_zero_low: u32,
    /// Frame bit to invert, or [`NO_FLIP`].
    pub flip_bit_num: i32,
    /// Allowed deviation when matching received durations.
    pub tolerance_percent: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            header_high: DEFAULT_HEADER_HIGH,
            header_low: DEFAULT_HEADER_LOW,
            bit_high: DEFAULT_BIT_HIGH,
            bit_one_low: DEFAULT_BIT_ONE_LOW,
            bit_zero_low: DEFAULT_BIT_ZERO_LOW,
            flip_bit_num: NO_FLIP,
            tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
        }
    }
}

/// Validated, read-only timings shared by the encoder and decoder.
///
/// ```
/// use lg_ac_ir::protocol::{TimingConfig, TimingProfile};
///
/// let timing = TimingProfile::try_from(TimingConfig {
///     flip_bit_num: 7,
///     ..TimingConfig::default()
/// }).unwrap();
///
/// assert_eq!(timing.header_high(), 3100);
/// assert_eq!(timing.flip_bit().map(|b| b.index()), Some(7));
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "TimingConfig", into = "TimingConfig")
)]
pub struct TimingProfile {
    header_high: u32,
    header_low: u32,
    bit_high: u32,
    bit_one_low: u32,
    bit_zero_low: u32,
    flip_bit: Option<FlipBit>,
    tolerance_percent: u8,
}

impl TimingProfile {
    pub fn header_high(&self) -> u32 {
        self.header_high
    }

    pub fn header_low(&self) -> u32 {
        self.header_low
    }

    pub fn bit_high(&self) -> u32 {
        self.bit_high
    }

    pub fn bit_one_low(&self) -> u32 {
        self.bit_one_low
    }

    pub fn bit_zero_low(&self) -> u32 {
        self.bit_zero_low
    }

    pub fn flip_bit(&self) -> Option<FlipBit> {
        self.flip_bit
    }

    pub fn tolerance_percent(&self) -> u8 {
        self.tolerance_percent
    }

    /// Whether `actual` lies inside the tolerance window around `expected`.
    /// Both bounds are inclusive.
    pub fn matches(&self, actual: u32, expected: u32) -> bool {
        let expected = u64::from(expected);
        let tolerance = u64::from(self.tolerance_percent);
        let lower = expected * (100 - tolerance) / 100;
        let upper = expected * (100 + tolerance) / 100;
        (lower..=upper).contains(&u64::from(actual))
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        TimingProfile {
            header_high: DEFAULT_HEADER_HIGH,
            header_low: DEFAULT_HEADER_LOW,
            bit_high: DEFAULT_BIT_HIGH,
            bit_one_low: DEFAULT_BIT_ONE_LOW,
            bit_zero_low: DEFAULT_BIT_ZERO_LOW,
            flip_bit: None,
            tolerance_percent: DEFAULT_TOLERANCE_PERCENT,
        }
    }
}

fn positive(name: &'static str, value: u32) -> Result<u32, TimingError> {
    if value == 0 {
        Err(TimingError::ZeroDuration { name })
    } else {
        Ok(value)
    }
}

impl TryFrom<TimingConfig> for TimingProfile {
    type Error = TimingError;

    fn try_from(config: TimingConfig) -> Result<Self, Self::Error> {
        let flip_bit = match config.flip_bit_num {
            NO_FLIP => None,
            bit => {
                let index = usize::try_from(bit)
                    .map_err(|_| TimingError::FlipBitOutOfRange { bit })?;
                Some(FlipBit::new(index).ok_or(TimingError::FlipBitOutOfRange { bit })?)
            }
        };

        if config.tolerance_percent >= 100 {
            return Err(TimingError::ToleranceOutOfRange { percent: config.tolerance_percent });
        }

        let profile = TimingProfile {
            header_high: positive("header_high", config.header_high)?,
            header_low: positive("header_low", config.header_low)?,
            bit_high: positive("bit_high", config.bit_high)?,
            bit_one_low: positive("bit_one_low", config.bit_one_low)?,
            bit_zero_low: positive("bit_zero_low", config.bit_zero_low)?,
            flip_bit,
            tolerance_percent: config.tolerance_percent,
        };

        if profile.bit_one_low == profile.bit_zero_low {
            return Err(TimingError::IndistinguishableBits { us: profile.bit_one_low });
        }

        Ok(profile)
    }
}

impl From<TimingProfile> for TimingConfig {
    fn from(profile: TimingProfile) -> Self {
        TimingConfig {
            header_high: profile.header_high,
            header_low: profile.header_low,
            bit_high: profile.bit_high,
            bit_one_low: profile.bit_one_low,
            bit_zero_low: profile.bit_zero_low,
            flip_bit_num: profile
                .flip_bit
                .and_then(|bit| i32::try_from(bit.index()).ok())
                .unwrap_or(NO_FLIP),
            tolerance_percent: profile.tolerance_percent,
        }
    }
}
