mod frame;
mod pulses;
mod timing;

#[macro_use]
pub mod encoding;
pub mod decoding;
pub mod types;

pub use frame::{
    fields, Field, FieldSpec, FlipBit, Frame, ADDRESS, FRAME_BITS, FRAME_BYTES, HEADER_FLAGS,
};
pub use pulses::{CapacityError, Pulse, PulseSequence, MAX_PULSES};
pub use timing::{TimingConfig, TimingError, TimingProfile, NO_FLIP};
pub use encoding::{
    assemble, encode, serialize, Encodable, EncodeError, FieldValue, ENCODED_PULSES,
};
pub use decoding::{decode, decode_frame, parse, DecodeError, MIN_PULSES};
pub use types::{Celsius, ClimateCommand, Fan, Mode, Power, Swing, TemperatureUnit};
