use core::fmt;

use log::debug;

use super::encoding::EncodeError;

/// Number of bytes in a frame, checksum included.
pub const FRAME_BYTES: usize = 14;

/// Number of bits in a frame. Bit `n` is bit `n % 8` of byte `n / 8`, which is
/// also the order the bits go out on the wire.
pub const FRAME_BITS: usize = FRAME_BYTES * 8;

/// Fixed address carried in the first four bytes of every frame (`23 CB 26 01`).
pub const ADDRESS: u32 = 0x0126_cb23;

/// Fixed value of the two-bit flag group in byte 5.
pub const HEADER_FLAGS: u32 = 0b10;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    Address,
    Power,
    TimerEnable,
    HeaderFlags,
    LightToggle,
    Mode,
    TempCelsius,
    Fan,
    Swing,
    TimerReset,
    TimerHours,
    TempFahrenheit,
    TempUnit,
    Checksum,
    Reserved,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Address => "address",
            Field::Power => "power",
            Field::TimerEnable => "timer_enable",
            Field::HeaderFlags => "header_flags",
            Field::LightToggle => "light_toggle",
            Field::Mode => "mode",
            Field::TempCelsius => "temp_celsius",
            Field::Fan => "fan",
            Field::Swing => "swing",
            Field::TimerReset => "timer_reset",
            Field::TimerHours => "timer_hours",
            Field::TempFahrenheit => "temp_fahrenheit",
            Field::TempUnit => "temp_unit",
            Field::Checksum => "checksum",
            Field::Reserved => "reserved",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of a field inside the frame, in frame bit indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldSpec {
    pub field: Field,
    pub offset: usize,
    pub width: usize,
}

impl FieldSpec {
    pub const fn new(field: Field, offset: usize, width: usize) -> Self {
        FieldSpec { field, offset, width }
    }

    const fn reserved(offset: usize, width: usize) -> Self {
        Self::new(Field::Reserved, offset, width)
    }

    /// Largest value that fits in the field.
    pub const fn max_value(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << (self.width as u32)) - 1
        }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// Named fields of the frame.
///
/// ```text
///  byte  0..=3   address (23 CB 26 01)
///  byte  5       -- -- PW TE HF HF LT --       (bit 0 on the left)
///  byte  6       mode:4
///  byte  7       31 - celsius:4
///  byte  8       fan:3 swing:3 timer_reset:1
///  byte  9       -- timer_hours:7
///  byte 12       fahrenheit:7 unit:1
///  byte 13       checksum = sum(bytes 0..=12)
/// ```
pub mod fields {
    use super::{Field, FieldSpec};

    pub const ADDRESS: FieldSpec = FieldSpec::new(Field::Address, 0, 32);
    pub const POWER: FieldSpec = FieldSpec::new(Field::Power, 42, 1);
    pub const TIMER_ENABLE: FieldSpec = FieldSpec::new(Field::TimerEnable, 43, 1);
    pub const HEADER_FLAGS: FieldSpec = FieldSpec::new(Field::HeaderFlags, 44, 2);
    pub const LIGHT_TOGGLE: FieldSpec = FieldSpec::new(Field::LightToggle, 46, 1);
    pub const MODE: FieldSpec = FieldSpec::new(Field::Mode, 48, 4);
    pub const TEMP_CELSIUS: FieldSpec = FieldSpec::new(Field::TempCelsius, 56, 4);
    pub const FAN: FieldSpec = FieldSpec::new(Field::Fan, 64, 3);
    pub const SWING: FieldSpec = FieldSpec::new(Field::Swing, 67, 3);
    pub const TIMER_RESET: FieldSpec = FieldSpec::new(Field::TimerReset, 70, 1);
    pub const TIMER_HOURS: FieldSpec = FieldSpec::new(Field::TimerHours, 73, 7);
    pub const TEMP_FAHRENHEIT: FieldSpec = FieldSpec::new(Field::TempFahrenheit, 96, 7);
    pub const TEMP_UNIT: FieldSpec = FieldSpec::new(Field::TempUnit, 103, 1);
    pub const CHECKSUM: FieldSpec = FieldSpec::new(Field::Checksum, 104, 8);

    /// Every region of the frame in bit order. The entries tile the frame
    /// without gaps or overlap.
    pub const LAYOUT: [FieldSpec; 20] = [
        ADDRESS,
        FieldSpec::reserved(32, 10),
        POWER,
        TIMER_ENABLE,
        HEADER_FLAGS,
        LIGHT_TOGGLE,
        FieldSpec::reserved(47, 1),
        MODE,
        FieldSpec::reserved(52, 4),
        TEMP_CELSIUS,
        FieldSpec::reserved(60, 4),
        FAN,
        SWING,
        TIMER_RESET,
        FieldSpec::reserved(71, 2),
        TIMER_HOURS,
        FieldSpec::reserved(80, 16),
        TEMP_FAHRENHEIT,
        TEMP_UNIT,
        CHECKSUM,
    ];
}

/// A bit position that some hardware revisions expect inverted.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FlipBit(usize);

impl FlipBit {
    pub fn new(index: usize) -> Option<Self> {
        if index < FRAME_BITS {
            Some(FlipBit(index))
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Frame([u8; FRAME_BYTES]);

impl Frame {
    /// An all-zero frame.
    pub fn new() -> Self {
        Frame([0; FRAME_BYTES])
    }

    pub fn from_bytes(bytes: [u8; FRAME_BYTES]) -> Self {
        Frame(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.0
    }

    pub fn bit(&self, index: usize) -> bool {
        self.0[index / 8] & (1 << (index % 8)) != 0
    }

    pub fn set_bit(&mut self, index: usize, value: bool) {
        let mask = 1 << (index % 8);
        if value {
            self.0[index / 8] |= mask;
        } else {
            self.0[index / 8] &= !mask;
        }
    }

    pub fn get(&self, spec: &FieldSpec) -> u32 {
        (0..spec.width).fold(0u32, |acc, i| {
            if self.bit(spec.offset + i) {
                acc | (1u32 << i)
            } else {
                acc
            }
        })
    }

    pub fn set(&mut self, spec: &FieldSpec, value: u32) -> Result<(), EncodeError> {
        if value > spec.max_value() {
            return Err(EncodeError::InvalidFieldValue { field: spec.field, value });
        }
        self.write(spec, value);
        Ok(())
    }

    fn write(&mut self, spec: &FieldSpec, value: u32) {
        for i in 0..spec.width {
            self.set_bit(spec.offset + i, (value >> i) & 1 == 1);
        }
    }

    /// Sum of every byte before the checksum byte, modulo 256.
    pub fn checksum(&self) -> u8 {
        self.0[..FRAME_BYTES - 1]
            .iter()
            .fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    pub fn received_checksum(&self) -> u8 {
        self.get(&fields::CHECKSUM) as u8
    }

    /// Stores the computed checksum in the checksum field.
    pub fn seal(&mut self) {
        let checksum = self.checksum();
        self.write(&fields::CHECKSUM, u32::from(checksum));
    }

    /// Inverts a single bit. Applying the same flip twice restores the frame.
    pub fn flip(&mut self, bit: FlipBit) {
        let index = bit.index();
        self.set_bit(index, !self.bit(index));
    }

    /// Shared by both directions: encode flips after sealing, decode flips
    /// back before checking the checksum.
    pub fn apply_flip(&mut self, bit: Option<FlipBit>) {
        if let Some(bit) = bit {
            debug!(
                "Flipping bit {} (bit {} in byte {})",
                bit.index(),
                bit.index() % 8,
                bit.index() / 8
            );
            self.flip(bit);
        }
    }
}
