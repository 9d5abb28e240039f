// Callback-driven PID controller with manual/automatic transfer

use core::time::Duration;

use num_traits::clamp;
use num_traits::float::FloatCore;

use crate::io::{MeasurementSource, OutputSink, SetpointSource};
use crate::time::{Clock, InstantLike};
#[cfg(feature = "std")]
use crate::time::{StdInstant, SystemClock};

/// Default cadence of the control computation.
const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Default output range, matching the 8-bit actuation range the controller
/// was originally tuned for.
const DEFAULT_OUTPUT_MIN: f64 = 0.0;
const DEFAULT_OUTPUT_MAX: f64 = 255.0;

// NumCast from f64 is infallible for the float types a control loop runs on.
fn cast<T: FloatCore>(value: f64) -> T {
    T::from(value).unwrap()
}

/// Selects which term the proportional action is computed from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ProportionalMode {
    /// Classic proportional-on-error, responsive to setpoint steps.
    #[default]
    OnError,
    /// Proportional-on-measurement. The proportional contribution is folded
    /// into the accumulated term, which avoids the output kick when the
    /// setpoint jumps abruptly.
    OnMeasurement,
}

/// Polarity of the controlled process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Increasing output increases the measured process value.
    Direct,
    /// Increasing output decreases the measured process value.
    Reverse,
}

/// Operating mode of the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The controller is passive; [`compute`](PidController::compute) is a
    /// no-op and the output is whatever the caller last commanded.
    Manual,
    /// The controller actively computes and writes output corrections.
    Automatic,
}

/// Errors raised by the validating setters, and by construction, which
/// applies the initial tunings through them.
///
/// Every failing setter leaves the controller completely unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum PidError {
    /// A tuning gain was negative or not finite.
    #[cfg_attr(
        feature = "std",
        error("PID gains must be non-negative and finite")
    )]
    InvalidGain,
    /// The requested sample interval was zero.
    #[cfg_attr(
        feature = "std",
        error("sample interval must be greater than zero")
    )]
    InvalidSampleInterval,
    /// The minimum output limit was not strictly below the maximum, or a
    /// limit was NaN.
    #[cfg_attr(
        feature = "std",
        error("minimum output limit must be strictly below the maximum")
    )]
    InvalidOutputLimits,
}

/// A discrete-time PID controller wired to its process through callbacks.
///
/// The controller reads the process value from a [`MeasurementSource`], the
/// target from a [`SetpointSource`], and writes the actuation command to an
/// [`OutputSink`]. The caller owns the scheduling entirely: it invokes
/// [`compute`](Self::compute) at whatever cadence it likes, and the
/// controller internally rate-limits itself to one computation per sample
/// interval using timestamps from its [`Clock`].
///
/// Two sets of gains are kept. The *display* gains are the raw values last
/// requested through [`set_tunings`](Self::set_tunings) and are what the
/// accessors report. The *working* gains are pre-scaled by the sample
/// interval (integral gain multiplied, derivative gain divided) and negated
/// for a [`Direction::Reverse`] process, so the hot compute path performs no
/// per-step conversions.
///
/// The controller starts in [`Mode::Manual`] and does nothing until switched
/// to [`Mode::Automatic`]; that transition re-seeds the integral accumulator
/// and the last measurement from live values so the loop resumes without an
/// output bump.
pub struct PidController<I, T, R, W, S, C>
where
    I: InstantLike,
    T: FloatCore,
    R: MeasurementSource<T>,
    W: OutputSink<T>,
    S: SetpointSource<T>,
    C: Clock<I>,
{
    measurement: R,
    output: W,
    setpoint: S,
    clock: C,

    mode: Mode,
    direction: Direction,
    proportional_mode: ProportionalMode,

    // Raw gains as last requested, for reporting only
    disp_kp: T,
    disp_ki: T,
    disp_kd: T,

    // Interval-scaled, polarity-adjusted gains used in compute
    kp: T,
    ki: T,
    kd: T,

    sample_interval: Duration,
    // None until the first executed compute, so that call is always eligible
    last_time: Option<I>,

    last_measurement: T,
    last_output: T,
    output_sum: T,

    out_min: T,
    out_max: T,
}

impl<I, T, R, W, S, C> PidController<I, T, R, W, S, C>
where
    I: InstantLike,
    T: FloatCore,
    R: MeasurementSource<T>,
    W: OutputSink<T>,
    S: SetpointSource<T>,
    C: Clock<I>,
{
    /// Creates a controller wired to the given capability slots.
    ///
    /// The controller starts in [`Mode::Manual`] with output limits of
    /// `[0, 255]` and a 100 ms sample interval. The first
    /// [`compute`](Self::compute) after switching to automatic mode is
    /// always eligible to run regardless of elapsed time.
    ///
    /// # Arguments
    /// - `measurement`: source of the current process value.
    /// - `output`: sink for the actuation command.
    /// - `setpoint`: source of the target value.
    /// - `clock`: source of monotonically non-decreasing timestamps.
    /// - `kp`, `ki`, `kd`: initial tuning gains, validated as in
    ///   [`set_tunings`](Self::set_tunings).
    /// - `proportional_mode`: which term the proportional action acts on.
    /// - `direction`: polarity of the controlled process.
    ///
    /// # Errors
    /// Returns [`PidError::InvalidGain`] if any gain is negative or not
    /// finite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        measurement: R,
        output: W,
        setpoint: S,
        clock: C,
        kp: T,
        ki: T,
        kd: T,
        proportional_mode: ProportionalMode,
        direction: Direction,
    ) -> Result<Self, PidError> {
        let mut pid = Self {
            measurement,
            output,
            setpoint,
            clock,
            mode: Mode::Manual,
            direction,
            proportional_mode,
            disp_kp: T::zero(),
            disp_ki: T::zero(),
            disp_kd: T::zero(),
            kp: T::zero(),
            ki: T::zero(),
            kd: T::zero(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            last_time: None,
            last_measurement: T::zero(),
            last_output: T::zero(),
            output_sum: T::zero(),
            out_min: cast(DEFAULT_OUTPUT_MIN),
            out_max: cast(DEFAULT_OUTPUT_MAX),
        };
        pid.set_tunings_and_mode(kp, ki, kd, proportional_mode)?;
        Ok(pid)
    }

    /// Performs one control step if one is due.
    ///
    /// Returns `false` without touching any state when the controller is in
    /// [`Mode::Manual`] or when less than one sample interval has elapsed
    /// since the last executed step. Otherwise reads the measurement and
    /// setpoint, updates the integral accumulator (clamped to the output
    /// limits), writes the new clamped output through the sink, and returns
    /// `true`.
    ///
    /// The integral term accumulates on error in both proportional modes; in
    /// [`ProportionalMode::OnMeasurement`] the proportional contribution is
    /// additionally folded into the accumulator from the change in
    /// measurement.
    pub fn compute(&mut self) -> bool {
        if self.mode == Mode::Manual {
            return false;
        }

        let now = self.clock.now();
        if let Some(last) = self.last_time {
            if now.duration_since(last) < self.sample_interval {
                return false;
            }
        }

        let input = self.measurement.read();
        let error = self.setpoint.setpoint() - input;
        let d_input = input - self.last_measurement;

        // The integral term always accumulates on error
        self.output_sum = self.output_sum + self.ki * error;
        if self.proportional_mode == ProportionalMode::OnMeasurement {
            self.output_sum = self.output_sum - self.kp * d_input;
        }
        self.output_sum = clamp(self.output_sum, self.out_min, self.out_max);

        let p_term = match self.proportional_mode {
            ProportionalMode::OnError => self.kp * error,
            ProportionalMode::OnMeasurement => T::zero(),
        };

        let output = clamp(
            p_term + self.output_sum - self.kd * d_input,
            self.out_min,
            self.out_max,
        );

        self.output.write(output);
        self.last_output = output;
        self.last_measurement = input;
        self.last_time = Some(now);
        true
    }

    /// Replaces the tuning gains, keeping the current proportional mode.
    ///
    /// The raw values are stored for reporting; the working gains are
    /// re-derived from the current sample interval and direction.
    ///
    /// # Errors
    /// Returns [`PidError::InvalidGain`] if any gain is negative or not
    /// finite; the controller is unchanged in that case.
    pub fn set_tunings(&mut self, kp: T, ki: T, kd: T) -> Result<(), PidError> {
        self.set_tunings_and_mode(kp, ki, kd, self.proportional_mode)
    }

    /// Replaces the tuning gains and the proportional mode together.
    ///
    /// # Errors
    /// Returns [`PidError::InvalidGain`] if any gain is negative or not
    /// finite; the controller is unchanged in that case.
    pub fn set_tunings_and_mode(
        &mut self,
        kp: T,
        ki: T,
        kd: T,
        proportional_mode: ProportionalMode,
    ) -> Result<(), PidError> {
        if kp < T::zero() || ki < T::zero() || kd < T::zero() {
            return Err(PidError::InvalidGain);
        }
        if !kp.is_finite() || !ki.is_finite() || !kd.is_finite() {
            return Err(PidError::InvalidGain);
        }

        self.proportional_mode = proportional_mode;

        self.disp_kp = kp;
        self.disp_ki = ki;
        self.disp_kd = kd;

        let interval_secs: T = cast(self.sample_interval.as_secs_f64());
        self.kp = kp;
        self.ki = ki * interval_secs;
        self.kd = kd / interval_secs;

        if self.direction == Direction::Reverse {
            self.kp = -self.kp;
            self.ki = -self.ki;
            self.kd = -self.kd;
        }
        Ok(())
    }

    /// Changes the period at which [`compute`](Self::compute) performs a
    /// control step.
    ///
    /// The working integral and derivative gains are rescaled in place by
    /// the interval ratio so the loop's behavior stays continuous across the
    /// rate change; the display gains are untouched.
    ///
    /// # Errors
    /// Returns [`PidError::InvalidSampleInterval`] for a zero interval.
    pub fn set_sample_interval(&mut self, interval: Duration) -> Result<(), PidError> {
        if interval.is_zero() {
            return Err(PidError::InvalidSampleInterval);
        }

        let ratio: T = cast(interval.as_secs_f64() / self.sample_interval.as_secs_f64());
        self.ki = self.ki * ratio;
        self.kd = self.kd / ratio;
        self.sample_interval = interval;
        Ok(())
    }

    /// Replaces the output limits.
    ///
    /// In [`Mode::Automatic`] the live output is re-clamped to the new
    /// bounds, and if it moved, the clamped value is written through the
    /// output sink immediately rather than waiting for the next compute
    /// step; the integral accumulator is re-clamped as well. In manual mode
    /// only the bounds change.
    ///
    /// # Errors
    /// Returns [`PidError::InvalidOutputLimits`] unless `min < max` (NaN
    /// bounds fail); the controller is unchanged in that case.
    pub fn set_output_limits(&mut self, min: T, max: T) -> Result<(), PidError> {
        if min >= max || min.is_nan() || max.is_nan() {
            return Err(PidError::InvalidOutputLimits);
        }

        self.out_min = min;
        self.out_max = max;

        if self.mode == Mode::Automatic {
            let clamped = clamp(self.last_output, min, max);
            if clamped != self.last_output {
                self.last_output = clamped;
                self.output.write(clamped);
            }
            self.output_sum = clamp(self.output_sum, min, max);
        }
        Ok(())
    }

    /// Switches between manual and automatic operation.
    ///
    /// The manual-to-automatic transition re-seeds the integral accumulator
    /// from the last output and the last measurement from a fresh read, so
    /// the first automatic step continues smoothly from wherever the output
    /// was left. Every other transition only sets the flag.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Automatic && self.mode == Mode::Manual {
            self.initialize();
        }
        self.mode = mode;
    }

    /// Bumpless transfer into automatic mode.
    fn initialize(&mut self) {
        self.output_sum = self.last_output;
        self.last_measurement = self.measurement.read();
        self.output_sum = clamp(self.output_sum, self.out_min, self.out_max);
    }

    /// Changes the polarity of the controlled process.
    ///
    /// In [`Mode::Automatic`] an actual change negates the three working
    /// gains in place; repeating the same direction is a no-op on the signs.
    /// A change made in manual mode only records the new direction: the
    /// working gains keep their current signs until the next
    /// [`set_tunings`](Self::set_tunings) re-derives them, so a manual-mode
    /// polarity change takes effect together with the next retuning.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.mode == Mode::Automatic && direction != self.direction {
            self.kp = -self.kp;
            self.ki = -self.ki;
            self.kd = -self.kd;
        }
        self.direction = direction;
    }

    /// Returns the proportional gain as last requested, regardless of
    /// polarity or sample interval.
    pub fn kp(&self) -> T {
        self.disp_kp
    }

    /// Returns the integral gain as last requested.
    pub fn ki(&self) -> T {
        self.disp_ki
    }

    /// Returns the derivative gain as last requested.
    pub fn kd(&self) -> T {
        self.disp_kd
    }

    /// Convenience accessor returning the three display gains together.
    pub fn gains(&self) -> (T, T, T) {
        (self.disp_kp, self.disp_ki, self.disp_kd)
    }

    /// Returns the current operating mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the current process polarity.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the current proportional mode.
    pub fn proportional_mode(&self) -> ProportionalMode {
        self.proportional_mode
    }

    /// Returns the period at which control steps execute.
    pub fn sample_interval(&self) -> Duration {
        self.sample_interval
    }

    /// Returns the minimum output limit.
    pub fn output_min(&self) -> T {
        self.out_min
    }

    /// Returns the maximum output limit.
    pub fn output_max(&self) -> T {
        self.out_max
    }

    /// Returns the last output written through the sink.
    pub fn output(&self) -> T {
        self.last_output
    }
}

#[cfg(feature = "std")]
impl<T, R, W, S> PidController<StdInstant, T, R, W, S, SystemClock>
where
    T: FloatCore,
    R: MeasurementSource<T>,
    W: OutputSink<T>,
    S: SetpointSource<T>,
{
    /// Creates a controller driven by the system's monotonic wall clock.
    ///
    /// Identical to [`new`](Self::new) otherwise.
    ///
    /// # Errors
    /// Returns [`PidError::InvalidGain`] if any gain is negative or not
    /// finite.
    #[allow(clippy::too_many_arguments)]
    pub fn with_system_clock(
        measurement: R,
        output: W,
        setpoint: S,
        kp: T,
        ki: T,
        kd: T,
        proportional_mode: ProportionalMode,
        direction: Direction,
    ) -> Result<Self, PidError> {
        Self::new(
            measurement,
            output,
            setpoint,
            SystemClock,
            kp,
            ki,
            kd,
            proportional_mode,
            direction,
        )
    }
}
