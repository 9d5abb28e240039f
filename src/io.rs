// Capability traits connecting the controller to its process
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

//! The three capability slots tying a [`PidController`](crate::pid::PidController)
//! to its process: where the measurement comes from, where the target comes
//! from, and where the actuation command goes.
//!
//! Each trait has a blanket implementation for the matching `FnMut` closure
//! shape, so plain closures plug in directly. Implementations are invoked
//! synchronously from the controller and must return without blocking; the
//! controller never calls them concurrently with itself.

/// Source of the current process value (the quantity being controlled).
///
/// Read once per executed compute step, and once more when the controller
/// transitions from manual to automatic mode.
pub trait MeasurementSource<T> {
    /// Returns the current process value.
    fn read(&mut self) -> T;
}

impl<T, F: FnMut() -> T> MeasurementSource<T> for F {
    fn read(&mut self) -> T {
        self()
    }
}

/// Source of the current target value the controller drives the measurement
/// toward.
pub trait SetpointSource<T> {
    /// Returns the current setpoint.
    fn setpoint(&mut self) -> T;
}

impl<T, F: FnMut() -> T> SetpointSource<T> for F {
    fn setpoint(&mut self) -> T {
        self()
    }
}

/// Consumer of the actuation command.
///
/// Invoked once per executed compute step, and possibly once from
/// [`set_output_limits`](crate::pid::PidController::set_output_limits) when a
/// live output has to be pulled back inside new bounds.
pub trait OutputSink<T> {
    /// Accepts a new actuation command.
    fn write(&mut self, value: T);
}

impl<T, F: FnMut(T)> OutputSink<T> for F {
    fn write(&mut self, value: T) {
        self(value)
    }
}
