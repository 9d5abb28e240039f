//! Closed-loop demo: the controller drives a simulated first-order-lag
//! process with dead time through a 60-second schedule of setpoint steps,
//! limit changes, mode toggles and retunings, printing a status line every
//! 100 ms of simulated time.
//! This example requires the `--features simulation` flag to be enabled.
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

#[cfg(feature = "simulation")]
fn main() {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use callback_pid::pid::{Direction, Mode, PidController, ProportionalMode};
    use callback_pid::sim::{FirstOrderLagProcess, StepProgram};
    use callback_pid::time::Millis;

    const TICK_MS: u64 = 10;
    const STATUS_INTERVAL_MS: u64 = 100;
    const END_MS: u64 = 60_000;

    // Shared loop state the controller's callbacks read and write
    let measurement = Rc::new(Cell::new(200.0));
    let setpoint = Rc::new(Cell::new(200.0));
    let command = Rc::new(Cell::new(50.0));
    let now = Rc::new(Cell::new(0u64));

    let meas = Rc::clone(&measurement);
    let cmd = Rc::clone(&command);
    let sp = Rc::clone(&setpoint);
    let clk = Rc::clone(&now);

    let mut pid = PidController::new(
        move || meas.get(),
        move |value| cmd.set(value),
        move || sp.get(),
        move || Millis(clk.get()),
        1.0,
        2.0,
        0.0,
        ProportionalMode::OnError,
        Direction::Direct,
    )
    .expect("valid tunings");
    pid.set_output_limits(-250.0, 250.0).expect("valid limits");
    pid.set_mode(Mode::Automatic);

    // The bench process: unit gain, half-second lag, half-second dead time,
    // resting at 200 when driven with 50
    let mut process = FirstOrderLagProcess::new(1.0, 50.0, 50, 50.0, 200.0);

    let setpoints = StepProgram::new(200.0)
        .step(Duration::from_secs(2), 150.0)
        .step(Duration::from_secs(6), 200.0)
        .step(Duration::from_secs(8), 1000.0)
        .step(Duration::from_secs(11), 100.0)
        .step(Duration::from_secs(20), 200.0)
        .step(Duration::from_secs(32), 150.0)
        .step(Duration::from_secs(36), 200.0)
        .step(Duration::from_secs(38), 500.0)
        .step(Duration::from_secs(44), 100.0)
        .step(Duration::from_secs(49), 150.0);

    println!();
    println!("Test Start");

    let mut limits = (-250.0, 250.0);
    let mut tunings = (1.0, 2.0, 0.0);
    let mut next_status = 0u64;

    let mut t = 0u64;
    while t <= END_MS {
        now.set(t);
        setpoint.set(setpoints.value_at(Duration::from_millis(t)));

        // Scheduled output-limit changes
        let wanted_limits = if t > 45_000 {
            (-100.0, 100.0)
        } else if t > 39_000 {
            (0.0, 200.0)
        } else if t > 30_000 {
            (-255.0, 255.0)
        } else if t > 15_000 {
            (-100.0, 100.0)
        } else if t > 9_000 {
            (0.0, 200.0)
        } else {
            (-250.0, 250.0)
        };
        if wanted_limits != limits {
            pid.set_output_limits(wanted_limits.0, wanted_limits.1)
                .expect("scheduled limits are valid");
            limits = wanted_limits;
        }

        // Scheduled mode toggles; redundant switches are harmless
        let wanted_mode = if t > 15_000 {
            Mode::Automatic
        } else if t > 10_900 {
            Mode::Manual
        } else if t > 8_500 {
            Mode::Automatic
        } else if t > 6_800 {
            Mode::Manual
        } else {
            Mode::Automatic
        };
        pid.set_mode(wanted_mode);

        // Scheduled retunings
        let wanted_tunings = if t > 43_000 {
            (3.0, 0.15, 0.15)
        } else if t > 39_000 {
            (0.5, 0.1, 0.05)
        } else if t > 30_000 {
            (0.1, 0.05, 0.0)
        } else if t > 13_000 {
            (0.5, 2.0, 0.15)
        } else if t > 9_000 {
            (2.0, 1.0, 0.05)
        } else {
            (1.0, 2.0, 0.0)
        };
        if wanted_tunings != tunings {
            pid.set_tunings(wanted_tunings.0, wanted_tunings.1, wanted_tunings.2)
                .expect("scheduled tunings are valid");
            tunings = wanted_tunings;
        }

        // Halfway through, the process switches nature to integrating
        process.set_integrating(t >= 30_000);

        measurement.set(process.advance(command.get()));
        pid.compute();

        if t >= next_status {
            let mode = match pid.mode() {
                Mode::Automatic => "A",
                Mode::Manual => "M",
            };
            println!(
                "{t} Kp {:.2} Ki {:.2} Kd {:.2} {mode} limits ({:.2}, {:.2}) setpoint {:.2} input {:.2} output {:.2}",
                pid.kp(),
                pid.ki(),
                pid.kd(),
                pid.output_min(),
                pid.output_max(),
                setpoint.get(),
                measurement.get(),
                command.get(),
            );
            next_status += STATUS_INTERVAL_MS;
        }

        t += TICK_MS;
    }

    println!("End Test");
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
