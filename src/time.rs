// Timestamp and clock abstractions for the control loop
// Copyright © 2025 callback_pid contributors
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::fmt::Debug;
use core::ops::Add;
use core::time::Duration;

/// A trait for timestamps produced by the control loop's clock.
///
/// The controller only ever asks how much time elapsed between two
/// timestamps and compares that against its sample interval, so any
/// monotonically non-decreasing tick counter qualifies.
pub trait InstantLike:
    Sized + Add<Duration, Output = Self> + Clone + Copy + Debug + PartialEq<Self>
{
    /// Returns the amount of time elapsed from another instant to this one.
    ///
    /// The clock driving the controller must be monotonically non-decreasing;
    /// `earlier` is always a timestamp previously produced by the same clock.
    #[must_use]
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A wrapper around an unsigned 64-bit integer counting milliseconds since an
/// arbitrary epoch. This is the timestamp unit of the default wall clock and
/// the natural choice for deterministic tests and embedded tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Millis(pub u64);

impl InstantLike for Millis {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(self.0 - earlier.0)
    }
}

impl Add<Duration> for Millis {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Millis(self.0 + rhs.as_millis() as u64)
    }
}

/// The clock capability the controller reads the current time from.
///
/// A clock must produce monotonically non-decreasing timestamps. Any
/// `FnMut() -> I` closure is a clock, which is the usual way to feed a
/// simulated or recorded timeline into the controller.
pub trait Clock<I: InstantLike> {
    /// Returns the current timestamp.
    fn now(&mut self) -> I;
}

impl<I: InstantLike, F: FnMut() -> I> Clock<I> for F {
    fn now(&mut self) -> I {
        self()
    }
}

#[cfg(feature = "std")]
mod std_clock {
    use super::{Add, Clock, Duration, InstantLike};

    /// A convenient wrapper around `std::time::Instant` satisfying the
    /// `InstantLike` trait.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StdInstant(pub std::time::Instant);

    impl StdInstant {
        /// Captures the current instant from the system's monotonic clock.
        pub fn now() -> Self {
            StdInstant(std::time::Instant::now())
        }
    }

    impl InstantLike for StdInstant {
        fn duration_since(&self, earlier: Self) -> Duration {
            self.0.duration_since(earlier.0)
        }
    }

    impl Add<Duration> for StdInstant {
        type Output = Self;

        fn add(self, rhs: Duration) -> Self::Output {
            StdInstant(self.0 + rhs)
        }
    }

    /// The default clock: the system's monotonic wall clock.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock<StdInstant> for SystemClock {
        fn now(&mut self) -> StdInstant {
            StdInstant::now()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        /// StdInstant is one constructor call away from std::time::Instant and
        /// delegates duration_since to the underlying instant.
        #[test]
        fn test_std_instant_wrapper() {
            let start = StdInstant::now();
            let end = StdInstant(std::time::Instant::now());
            let result = end.duration_since(start);
            let expected = end.0.duration_since(start.0);
            assert_eq!(result, expected);
        }

        #[test]
        fn test_system_clock_is_monotonic() {
            let mut clock = SystemClock;
            let a = clock.now();
            let b = clock.now();
            assert!(b.duration_since(a) >= Duration::ZERO);
        }
    }
}

#[cfg(feature = "std")]
pub use std_clock::{StdInstant, SystemClock};
