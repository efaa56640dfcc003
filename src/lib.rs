#![cfg_attr(not(test), no_std)]

//! lg_ac_ir
//!
//! Infrared frame codec for LG-badged air conditioners whose remotes send
//! 14-byte frames addressed `23 CB 26 01`. Pulse timings are configurable, as
//! is a single "flip bit" that some hardware revisions expect inverted.
//!
//! It is intended for use on embedded hardware, and as such is `no_std` and
//! never allocates.
//!
//! There is no code to actually capture IR here. Your receiver driver hands
//! over the captured mark/space durations; your transmitter modulates the
//! encoded durations onto a 38 kHz carrier. The [`interface`] module has a
//! small bit-banging transmitter built on `embedded-hal` if you don't have
//! anything better.
//!
//! ## General Usage
//!
//! Encode a command for transmission:
//!
//! ```
//! use lg_ac_ir::protocol::{
//!     encode, Celsius, ClimateCommand, Fan, Mode, Power, Pulse, Swing, TimingProfile,
//! };
//!
//! let command = ClimateCommand {
//!     power: Power::On,
//!     mode: Mode::Cool,
//!     temperature: Celsius(24),
//!     fan: Fan::Auto,
//!     swing: Swing::Off,
//! };
//!
//! let timing = TimingProfile::default();
//! let pulses = encode(&command, &timing).unwrap();
//!
//! assert_eq!(
//!     // Header mark + space, then bit 0 of byte 0x23: a one.
//!     &pulses[..4],
//!     &[Pulse::Mark(3100), Pulse::Space(1550), Pulse::Mark(540), Pulse::Space(1070)],
//! );
//!
//! // Signed durations (marks positive) for the transmitter driver.
//! let raw: Vec<i32> = pulses.raw().collect();
//! assert_eq!(raw.len(), 227);
//! ```
//!
//! Decode whatever the receiver captured:
//!
//! ```
//! use lg_ac_ir::protocol::{
//!     decode, encode, Celsius, ClimateCommand, DecodeError, Fan, Mode, Power, PulseSequence,
//!     Swing, TimingConfig, TimingProfile,
//! };
//!
//! // One revision of the unit wants bit 9 inverted.
//! let timing = TimingProfile::try_from(TimingConfig {
//!     flip_bit_num: 9,
//!     ..TimingConfig::default()
//! }).unwrap();
//!
//! let command = ClimateCommand {
//!     power: Power::On,
//!     mode: Mode::Heat,
//!     temperature: Celsius(21),
//!     fan: Fan::High,
//!     swing: Swing::Vertical,
//! };
//! let captured: Vec<i32> = encode(&command, &timing).unwrap().raw().collect();
//!
//! let pulses = PulseSequence::from_raw(&captured).unwrap();
//! assert_eq!(decode(&pulses, &timing), Ok(command));
//!
//! // A partial capture is simply dropped.
//! let partial = PulseSequence::from_raw(&captured[..100]).unwrap();
//! assert!(matches!(decode(&partial, &timing), Err(DecodeError::TruncatedFrame { .. })));
//! ```

pub mod interface;
pub mod protocol;

#[doc(inline)]
pub use protocol::*;
