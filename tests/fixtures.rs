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

#[cfg(test)]
pub mod test_loop {

    use std::cell::Cell;
    use std::rc::Rc;

    use callback_pid::pid::{Direction, PidController, ProportionalMode};
    use callback_pid::time::Millis;

    /// Shared state standing in for the external process. The controller's
    /// callbacks read and write these cells; tests poke them directly to
    /// steer a scenario and observe what the controller emitted.
    pub struct ProcessState {
        pub measurement: Rc<Cell<f64>>,
        pub setpoint: Rc<Cell<f64>>,
        pub command: Rc<Cell<f64>>,
        /// Counts invocations of the output sink, so tests can tell a
        /// re-emitted value from an untouched one.
        pub writes: Rc<Cell<u32>>,
        pub now: Rc<Cell<u64>>,
    }

    pub fn make_controller(
        kp: f64,
        ki: f64,
        kd: f64,
        proportional_mode: ProportionalMode,
        direction: Direction,
    ) -> (
        PidController<
            Millis,
            f64,
            impl FnMut() -> f64,
            impl FnMut(f64),
            impl FnMut() -> f64,
            impl FnMut() -> Millis,
        >,
        ProcessState,
    ) {
        let state = ProcessState {
            measurement: Rc::new(Cell::new(0.0)),
            setpoint: Rc::new(Cell::new(0.0)),
            command: Rc::new(Cell::new(0.0)),
            writes: Rc::new(Cell::new(0)),
            now: Rc::new(Cell::new(0)),
        };

        let measurement = Rc::clone(&state.measurement);
        let setpoint = Rc::clone(&state.setpoint);
        let command = Rc::clone(&state.command);
        let writes = Rc::clone(&state.writes);
        let now = Rc::clone(&state.now);

        let pid = PidController::new(
            move || measurement.get(),
            move |value| {
                command.set(value);
                writes.set(writes.get() + 1);
            },
            move || setpoint.get(),
            move || Millis(now.get()),
            kp,
            ki,
            kd,
            proportional_mode,
            direction,
        )
        .expect("fixture gains are valid");

        (pid, state)
    }

    /// The reference scenario: Kp = 1, Ki = 2, Kd = 0, proportional on
    /// error, direct polarity, process resting at 200 with the setpoint on
    /// top of it.
    pub fn make_steady_controller() -> (
        PidController<
            Millis,
            f64,
            impl FnMut() -> f64,
            impl FnMut(f64),
            impl FnMut() -> f64,
            impl FnMut() -> Millis,
        >,
        ProcessState,
    ) {
        let (pid, state) =
            make_controller(1.0, 2.0, 0.0, ProportionalMode::OnError, Direction::Direct);
        state.measurement.set(200.0);
        state.setpoint.set(200.0);
        (pid, state)
    }
}
