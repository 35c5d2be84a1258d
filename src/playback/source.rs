//! Position sources
//!
//! A [`PositionSource`] is anything that can be polled for the next playback position.
//! Any `Iterator<Item = f64>` already is one.

/// Pull-style supplier of playback positions, in seconds.
///
/// Returning `None` means playback stopped and no further positions follow.
pub trait PositionSource {
    fn next_position(&mut self) -> Option<f64>;
}

impl<I> PositionSource for I
where
    I: Iterator<Item = f64>,
{
    fn next_position(&mut self) -> Option<f64> {
        self.next()
    }
}

/// Simulated playback clock advancing by a fixed step.
///
/// Yields `start, start + step, ...` while the position is below `end`.
///
/// # Example
/// ```
/// use track2tabs::playback::{PositionSource, SteppedClock};
///
/// let mut clock = SteppedClock::new(0.0, 1.0, 0.25);
/// assert_eq!(clock.next_position(), Some(0.0));
/// assert_eq!(clock.next_position(), Some(0.25));
/// ```
#[derive(Debug, Clone)]
pub struct SteppedClock {
    start: f64,
    end: f64,
    step: f64,
    ticks: u64,
}

impl SteppedClock {
    /// A non-positive or non-finite `step` yields an exhausted clock.
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        SteppedClock {
            start,
            end,
            step,
            ticks: 0,
        }
    }
}

impl Iterator for SteppedClock {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return None;
        }
        // Multiply rather than accumulate so long runs don't drift.
        let position = self.start + self.step * self.ticks as f64;
        if position >= self.end {
            return None;
        }
        self.ticks += 1;
        Some(position)
    }
}
