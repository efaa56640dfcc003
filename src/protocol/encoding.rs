use log::debug;

use super::frame::{fields, Field, FieldSpec, Frame, ADDRESS, FRAME_BITS, HEADER_FLAGS};
use super::pulses::{CapacityError, PulseSequence};
use super::timing::TimingProfile;
use super::types::{ClimateCommand, TemperatureUnit};

/// Header pair, one pair per bit, then the footer mark.
pub const ENCODED_PULSES: usize = 2 + 2 * FRAME_BITS + 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("value {value} is out of range for field {field}")]
    InvalidFieldValue { field: Field, value: u32 },

    #[error("{field} setting has no encoding in this protocol")]
    UnsupportedCommandValue { field: Field },

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// A command setting that occupies exactly one frame field.
pub trait FieldValue: Sized {
    const SPEC: FieldSpec;

    fn to_field(&self) -> Option<u32>;
    fn from_field(value: u32) -> Option<Self>;

    fn write_to(&self, frame: &mut Frame) -> Result<(), EncodeError> {
        let value = self
            .to_field()
            .ok_or(EncodeError::UnsupportedCommandValue { field: Self::SPEC.field })?;
        frame.set(&Self::SPEC, value)
    }
}

/// Maps enum variants to field values in both directions. Variants left out
/// of the table have no encoding.
#[macro_export]
macro_rules! field_value_enum {
    ( $enum:ident, $spec:expr, { $( $variant:ident => $value:expr ),* $(,)? } ) => {
        impl $crate::protocol::FieldValue for $enum {
            const SPEC: $crate::protocol::FieldSpec = $spec;

            #[allow(unreachable_patterns)]
            fn to_field(&self) -> Option<u32> {
                match *self {
                    $( $enum::$variant => Some($value), )*
                    _ => None,
                }
            }

            fn from_field(value: u32) -> Option<Self> {
                $( if value == $value { return Some($enum::$variant); } )*
                None
            }
        }
    };
}

pub trait Encodable {
    fn encode(&self, timing: &TimingProfile) -> Result<PulseSequence, EncodeError>;
}

impl Encodable for ClimateCommand {
    fn encode(&self, timing: &TimingProfile) -> Result<PulseSequence, EncodeError> {
        encode(self, timing)
    }
}

/// Serializes the frame as is, without applying the flip bit.
impl Encodable for Frame {
    fn encode(&self, timing: &TimingProfile) -> Result<PulseSequence, EncodeError> {
        serialize(self, timing)
    }
}

/// Builds the pulse train for `command`.
///
/// The frame is assembled and checksummed, the configured flip bit (if any)
/// is inverted, and every bit is sent least significant first, byte 0 first.
pub fn encode(
    command: &ClimateCommand,
    timing: &TimingProfile,
) -> Result<PulseSequence, EncodeError> {
    let mut frame = assemble(command)?;
    frame.apply_flip(timing.flip_bit());
    debug!("Sending frame: {:02x?}", frame.as_bytes());
    serialize(&frame, timing)
}

/// Lays `command` out in a sealed frame. The flip bit is not applied.
pub fn assemble(command: &ClimateCommand) -> Result<Frame, EncodeError> {
    let temperature = command.temperature;
    if !temperature.is_valid() {
        return Err(EncodeError::InvalidFieldValue {
            field: Field::TempCelsius,
            value: u32::from(temperature.0),
        });
    }

    let mut frame = Frame::new();
    frame.set(&fields::ADDRESS, ADDRESS)?;
    frame.set(&fields::HEADER_FLAGS, HEADER_FLAGS)?;

    command.power.write_to(&mut frame)?;
    command.mode.write_to(&mut frame)?;
    command.fan.write_to(&mut frame)?;
    command.swing.write_to(&mut frame)?;

    frame.set(&fields::TEMP_CELSIUS, u32::from(temperature.encode_as_setpoint_mapped()))?;
    frame.set(&fields::TEMP_FAHRENHEIT, u32::from(temperature.to_fahrenheit()))?;
    TemperatureUnit::Fahrenheit.write_to(&mut frame)?;

    frame.seal();
    Ok(frame)
}

pub fn serialize(frame: &Frame, timing: &TimingProfile) -> Result<PulseSequence, EncodeError> {
    let mut pulses = PulseSequence::new();
    pulses.push_pair(timing.header_high(), timing.header_low())?;

    for index in 0..FRAME_BITS {
        let space = if frame.bit(index) {
            timing.bit_one_low()
        } else {
            timing.bit_zero_low()
        };
        pulses.push_pair(timing.bit_high(), space)?;
    }

    pulses.push_mark(timing.bit_high())?;
    Ok(pulses)
}
