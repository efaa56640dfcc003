use log::{debug, trace};

use super::encoding::FieldValue;
use super::frame::{fields, Field, Frame, ADDRESS, FRAME_BITS, HEADER_FLAGS};
use super::pulses::Pulse;
use super::timing::TimingProfile;
use super::types::{Celsius, ClimateCommand, TemperatureUnit};

/// Header pair plus one pair per bit. The footer mark is optional.
pub const MIN_PULSES: usize = 2 + 2 * FRAME_BITS;

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("frame truncated: expected at least {expected} pulses, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("header {mark}us/{space}us does not match the configured header")]
    HeaderMismatch { mark: u32, space: u32 },

    #[error("bit {bit}: space of {space}us is neither a one nor a zero")]
    AmbiguousBit { bit: usize, space: u32 },

    #[error("checksum mismatch (received {received:#04x}, calculated {calculated:#04x})")]
    ChecksumMismatch { received: u8, calculated: u8 },

    #[error("{field} holds unsupported value {value:#x}")]
    UnsupportedFieldValue { field: Field, value: u32 },
}

/// Turns a captured pulse train back into a command.
///
/// A failed decode means the capture was noise, truncated, or meant for
/// another device; the caller should drop it and keep listening.
pub fn decode(pulses: &[Pulse], timing: &TimingProfile) -> Result<ClimateCommand, DecodeError> {
    let result = decode_frame(pulses, timing).and_then(|frame| parse(&frame));
    if let Err(ref e) = result {
        debug!("Discarding received frame: {}", e);
    }
    result
}

/// Recovers the frame bits, undoes the flip bit and checks the checksum.
pub fn decode_frame(pulses: &[Pulse], timing: &TimingProfile) -> Result<Frame, DecodeError> {
    if pulses.len() < MIN_PULSES {
        return Err(DecodeError::TruncatedFrame { expected: MIN_PULSES, actual: pulses.len() });
    }

    let header_ok = match (pulses[0], pulses[1]) {
        (Pulse::Mark(mark), Pulse::Space(space)) => {
            timing.matches(mark, timing.header_high()) && timing.matches(space, timing.header_low())
        }
        _ => false,
    };
    if !header_ok {
        return Err(DecodeError::HeaderMismatch {
            mark: pulses[0].duration(),
            space: pulses[1].duration(),
        });
    }

    let mut frame = Frame::new();
    for (bit, pair) in pulses[2..MIN_PULSES].chunks_exact(2).enumerate() {
        // Only the space carries data.
        let value = match (pair[0], pair[1]) {
            (Pulse::Mark(_), Pulse::Space(space)) => {
                classify(space, timing).ok_or(DecodeError::AmbiguousBit { bit, space })?
            }
            (_, other) => return Err(DecodeError::AmbiguousBit { bit, space: other.duration() }),
        };
        frame.set_bit(bit, value);
    }
    trace!("Received frame: {:02x?}", frame.as_bytes());

    frame.apply_flip(timing.flip_bit());

    let received = frame.received_checksum();
    let calculated = frame.checksum();
    if received != calculated {
        return Err(DecodeError::ChecksumMismatch { received, calculated });
    }

    Ok(frame)
}

/// Reads a command out of a checked frame.
pub fn parse(frame: &Frame) -> Result<ClimateCommand, DecodeError> {
    let address = frame.get(&fields::ADDRESS);
    if address != ADDRESS {
        return Err(DecodeError::UnsupportedFieldValue { field: Field::Address, value: address });
    }

    let flags = frame.get(&fields::HEADER_FLAGS);
    if flags != HEADER_FLAGS {
        return Err(DecodeError::UnsupportedFieldValue { field: Field::HeaderFlags, value: flags });
    }

    let temperature = match read::<TemperatureUnit>(frame)? {
        TemperatureUnit::Celsius => {
            let value = frame.get(&fields::TEMP_CELSIUS);
            Some(Celsius::from_setpoint_mapped(value as u8))
                .filter(Celsius::is_valid)
                .ok_or(DecodeError::UnsupportedFieldValue { field: Field::TempCelsius, value })?
        }
        TemperatureUnit::Fahrenheit => {
            let value = frame.get(&fields::TEMP_FAHRENHEIT);
            Celsius::from_fahrenheit(value as u8)
                .filter(Celsius::is_valid)
                .ok_or(DecodeError::UnsupportedFieldValue { field: Field::TempFahrenheit, value })?
        }
    };

    Ok(ClimateCommand {
        power: read(frame)?,
        mode: read(frame)?,
        temperature,
        fan: read(frame)?,
        swing: read(frame)?,
    })
}

fn read<T: FieldValue>(frame: &Frame) -> Result<T, DecodeError> {
    let value = frame.get(&T::SPEC);
    T::from_field(value).ok_or(DecodeError::UnsupportedFieldValue { field: T::SPEC.field, value })
}

/// `Some(true)` for a one, `Some(false)` for a zero.
///
/// When the space fits both tolerance windows the nearer reference wins, and
/// an exact tie counts as a one.
fn classify(space: u32, timing: &TimingProfile) -> Option<bool> {
    let one = timing.bit_one_low();
    let zero = timing.bit_zero_low();
    match (timing.matches(space, one), timing.matches(space, zero)) {
        (true, true) => Some(space.abs_diff(one) <= space.abs_diff(zero)),
        (true, false) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
