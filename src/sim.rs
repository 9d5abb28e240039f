// Synthetic process models for closed-loop testing
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

use core::time::Duration;

use std::vec::Vec;

/// A discrete first-order lag process with dead time, the classic stand-in
/// for motors, heaters and valves in control-loop testing.
///
/// Each call to [`advance`](Self::advance) pushes one actuation sample into
/// a circular delay line and steps the dynamics one tick:
///
/// ```text
/// y[k+1] = K/τ · (u[k-θ] - u₀) + (y[k] - y₀) · (1 - 1/τ) + y₀
/// ```
///
/// where `u₀`/`y₀` are the nominal operating point (the actuation level at
/// which the process rests, and the resting measurement), `τ` is the time
/// constant in ticks, and `θ` the dead time in ticks. In integrating mode
/// the decay term drops out and the process accumulates instead of
/// settling, which models level- or position-like processes.
pub struct FirstOrderLagProcess {
    gain: f64,
    time_constant: f64,
    delay_line: Vec<f64>,
    index: usize,
    nominal_input: f64,
    nominal_output: f64,
    measurement: f64,
    integrating: bool,
}

impl FirstOrderLagProcess {
    /// Creates a process resting at its nominal operating point.
    ///
    /// `time_constant` is in ticks and should be well above 1 for a
    /// meaningful lag; `dead_time_ticks` is clamped to at least one tick.
    /// The delay line starts filled with `nominal_input`, so the process
    /// holds `nominal_output` until actuation actually changes.
    pub fn new(
        gain: f64,
        time_constant: f64,
        dead_time_ticks: usize,
        nominal_input: f64,
        nominal_output: f64,
    ) -> Self {
        Self {
            gain,
            time_constant,
            delay_line: std::vec![nominal_input; dead_time_ticks.max(1)],
            index: 0,
            nominal_input,
            nominal_output,
            measurement: nominal_output,
            integrating: false,
        }
    }

    /// Switches the nature of the process between self-settling and
    /// integrating.
    pub fn set_integrating(&mut self, integrating: bool) {
        self.integrating = integrating;
    }

    /// Pushes one actuation sample and steps the dynamics one tick,
    /// returning the new measurement.
    pub fn advance(&mut self, control: f64) -> f64 {
        self.delay_line[self.index] = control;
        self.index = (self.index + 1) % self.delay_line.len();
        let delayed = self.delay_line[self.index];

        let forcing = self.gain / self.time_constant * (delayed - self.nominal_input);
        self.measurement = if self.integrating {
            forcing + self.measurement
        } else {
            forcing
                + (self.measurement - self.nominal_output) * (1.0 - 1.0 / self.time_constant)
                + self.nominal_output
        };
        self.measurement
    }

    /// Returns the current process value without stepping the dynamics.
    pub fn measurement(&self) -> f64 {
        self.measurement
    }
}

/// A piecewise-constant signal defined by step changes at fixed offsets
/// from the start of a run. Used to script setpoint profiles and similar
/// schedules for closed-loop tests and demos.
pub struct StepProgram {
    initial: f64,
    steps: Vec<(Duration, f64)>,
}

impl StepProgram {
    /// Creates a program that holds `initial` until the first step.
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            steps: Vec::new(),
        }
    }

    /// Adds a step: from `at` onward the signal takes `value` (until a
    /// later step overrides it).
    pub fn step(mut self, at: Duration, value: f64) -> Self {
        self.steps.push((at, value));
        self
    }

    /// Returns the signal value at the given elapsed time.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let mut latest: Option<Duration> = None;
        let mut value = self.initial;
        for &(at, v) in &self.steps {
            if elapsed >= at && latest.map_or(true, |l| at >= l) {
                latest = Some(at);
                value = v;
            }
        }
        value
    }
}
