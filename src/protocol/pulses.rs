use core::ops::Deref;

use heapless::Vec;

/// Room for one encoded frame (227 pulses) plus some trailing capture noise.
pub const MAX_PULSES: usize = 256;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pulse {
    /// Carrier on, in microseconds.
    Mark(u32),
    /// Carrier off, in microseconds.
    Space(u32),
}

impl Pulse {
    pub fn duration(&self) -> u32 {
        match *self {
            Pulse::Mark(us) | Pulse::Space(us) => us,
        }
    }

    pub fn is_mark(&self) -> bool {
        matches!(self, Pulse::Mark(_))
    }

    /// Signed form used by capture/transmit drivers: marks positive, spaces
    /// negative.
    pub fn to_raw(&self) -> i32 {
        let us = i32::try_from(self.duration()).unwrap_or(i32::MAX);
        match self {
            Pulse::Mark(_) => us,
            Pulse::Space(_) => -us,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("pulse sequence is full ({capacity} pulses)", capacity = MAX_PULSES)]
pub struct CapacityError;

/// Alternating marks and spaces, always starting with a mark.
///
/// The builders keep that shape: adjacent pulses of the same kind are merged,
/// zero durations are ignored and a leading space is dropped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PulseSequence {
    pulses: Vec<Pulse, MAX_PULSES>,
}

impl PulseSequence {
    pub fn new() -> Self {
        PulseSequence { pulses: Vec::new() }
    }

    /// Builds a sequence from signed durations as captured by a receiver.
    pub fn from_raw(raw: &[i32]) -> Result<Self, CapacityError> {
        let mut sequence = Self::new();
        for &us in raw {
            if us >= 0 {
                sequence.push_mark(us.unsigned_abs())?;
            } else {
                sequence.push_space(us.unsigned_abs())?;
            }
        }
        Ok(sequence)
    }

    pub fn push_mark(&mut self, us: u32) -> Result<(), CapacityError> {
        self.push(Pulse::Mark(us))
    }

    pub fn push_space(&mut self, us: u32) -> Result<(), CapacityError> {
        self.push(Pulse::Space(us))
    }

    /// Appends a mark followed by a space.
    pub fn push_pair(&mut self, mark: u32, space: u32) -> Result<(), CapacityError> {
        self.push_mark(mark)?;
        self.push_space(space)
    }

    fn push(&mut self, pulse: Pulse) -> Result<(), CapacityError> {
        if pulse.duration() == 0 {
            return Ok(());
        }

        match (self.pulses.last_mut(), pulse) {
            (None, Pulse::Space(_)) => return Ok(()),
            (Some(Pulse::Mark(last)), Pulse::Mark(us))
            | (Some(Pulse::Space(last)), Pulse::Space(us)) => {
                *last = last.saturating_add(us);
                return Ok(());
            }
            _ => {}
        }

        self.pulses.push(pulse).map_err(|_| CapacityError)
    }

    pub fn as_slice(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Signed durations for a transmitter driver.
    pub fn raw(&self) -> impl Iterator<Item = i32> + '_ {
        self.pulses.iter().map(Pulse::to_raw)
    }

    /// Total duration of the sequence in microseconds.
    pub fn total_duration(&self) -> u64 {
        self.pulses.iter().map(|p| u64::from(p.duration())).sum()
    }
}

impl Deref for PulseSequence {
    type Target = [Pulse];

    fn deref(&self) -> &[Pulse] {
        &self.pulses
    }
}

impl<'a> IntoIterator for &'a PulseSequence {
    type Item = &'a Pulse;
    type IntoIter = core::slice::Iter<'a, Pulse>;

    fn into_iter(self) -> Self::IntoIter {
        self.pulses.iter()
    }
}
