use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::protocol::{encode, ClimateCommand, EncodeError, Pulse, PulseSequence, TimingProfile};

/// Carrier the unit's receiver is tuned to.
pub const CARRIER_FREQUENCY_HZ: u32 = 38_000;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum TransmitError<E: fmt::Debug> {
    #[error("could not encode command: {0}")]
    Encode(#[from] EncodeError),

    #[error("output pin error: {0:?}")]
    Pin(E),
}

/// Replays pulse sequences on a pin that gates a [`CARRIER_FREQUENCY_HZ`]
/// carrier (e.g. the enable line of a PWM-driven IR LED).
///
/// Timing is only as good as the delay provider; anything stricter belongs in
/// a hardware-timed driver fed from [`PulseSequence::raw`].
pub struct IrTransmitter<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pin: P,
    delay: D,
}

impl<P, D> IrTransmitter<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        IrTransmitter { pin, delay }
    }

    /// Encodes `command` and sends it.
    pub fn send(
        &mut self,
        command: &ClimateCommand,
        timing: &TimingProfile,
    ) -> Result<(), TransmitError<P::Error>> {
        let pulses = encode(command, timing)?;
        debug!("Transmitting {:?}", command);
        self.transmit(&pulses).map_err(TransmitError::Pin)
    }

    /// Drives the pin through `pulses` and leaves it low.
    pub fn transmit(&mut self, pulses: &PulseSequence) -> Result<(), P::Error> {
        for pulse in pulses {
            match *pulse {
                Pulse::Mark(us) => {
                    self.pin.set_high()?;
                    self.delay.delay_us(us);
                }
                Pulse::Space(us) => {
                    self.pin.set_low()?;
                    self.delay.delay_us(us);
                }
            }
        }
        self.pin.set_low()
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Celsius, Fan, Field, Mode, Power, Swing, ENCODED_PULSES};
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Event {
        High,
        Low,
        Wait(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockPin(Log);

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Event::Low);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Event::High);
            Ok(())
        }
    }

    struct MockDelay(Log);

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().push(Event::Wait(ns / 1000));
        }

        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Event::Wait(us));
        }
    }

    #[derive(Debug, Eq, PartialEq)]
    struct Broken;

    impl embedded_hal::digital::Error for Broken {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    struct BrokenPin;

    impl embedded_hal::digital::ErrorType for BrokenPin {
        type Error = Broken;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Broken> {
            Err(Broken)
        }

        fn set_high(&mut self) -> Result<(), Broken> {
            Err(Broken)
        }
    }

    fn transmitter() -> (IrTransmitter<MockPin, MockDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        (IrTransmitter::new(MockPin(log.clone()), MockDelay(log.clone())), log)
    }

    fn command() -> ClimateCommand {
        ClimateCommand {
            power: Power::On,
            mode: Mode::Dry,
            temperature: Celsius(22),
            fan: Fan::Low,
            swing: Swing::Vertical,
        }
    }

    #[test]
    fn transmit_test() {
        let (mut tx, log) = transmitter();
        let pulses = PulseSequence::from_raw(&[3100, -1550, 540, -290, 540]).unwrap();

        tx.transmit(&pulses).unwrap();
        assert_eq!(
            *log.borrow(),
            [
                Event::High,
                Event::Wait(3100),
                Event::Low,
                Event::Wait(1550),
                Event::High,
                Event::Wait(540),
                Event::Low,
                Event::Wait(290),
                Event::High,
                Event::Wait(540),
                Event::Low,
            ]
        );
    }

    #[test]
    fn send_test() {
        let (mut tx, log) = transmitter();
        let timing = TimingProfile::default();
        tx.send(&command(), &timing).unwrap();

        let waits: Vec<u32> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Wait(us) => Some(*us),
                _ => None,
            })
            .collect();
        let expected = encode(&command(), &timing).unwrap();
        assert_eq!(waits.len(), ENCODED_PULSES);
        assert_eq!(waits, expected.iter().map(Pulse::duration).collect::<Vec<_>>());
        assert_eq!(log.borrow().last(), Some(&Event::Low));
    }

    #[test]
    fn send_rejects_unsupported_command_test() {
        let (mut tx, log) = transmitter();
        let command = ClimateCommand { swing: Swing::Horizontal, ..command() };

        assert!(matches!(
            tx.send(&command, &TimingProfile::default()),
            Err(TransmitError::Encode(EncodeError::UnsupportedCommandValue { .. }))
        ));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn pin_error_test() {
        let (_, delay) = transmitter().0.release();
        let mut tx = IrTransmitter::new(BrokenPin, delay);
        assert_eq!(tx.send(&command(), &TimingProfile::default()), Err(TransmitError::Pin(Broken)));
    }

    #[test]
    fn transmit_error_display_test() {
        let cause = EncodeError::UnsupportedCommandValue { field: Field::Swing };
        let error: TransmitError<Broken> = cause.into();

        assert_eq!(error.to_string(), std::format!("could not encode command: {}", cause));
        assert_eq!(
            std::error::Error::source(&error).map(|e| e.to_string()),
            Some(cause.to_string())
        );
        assert_eq!(TransmitError::Pin(Broken).to_string(), "output pin error: Broken");
    }
}
