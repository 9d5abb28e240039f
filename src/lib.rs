#![warn(missing_docs)]

//! # Callback-Driven PID Controller Library
//!
//! This library provides a discrete PID (Proportional-Integral-Derivative)
//! controller that talks to its process through user-supplied callbacks: a
//! measurement provider, a setpoint provider, and an output consumer.
//!
//! ## Features
//!
//! - Respects the best practices for PID control:
//!   - Fully validated tunings, sample interval, and output limits.
//!   - Anti reset-windup: both the output and the integral accumulator are
//!     bounded by the output limits.
//!   - Optional proportional-on-measurement to mitigate the output kick on
//!     setpoint changes.
//!   - Bumpless manual-to-automatic transfer: resuming automatic control
//!     re-seeds the controller from live readings instead of stale state.
//!
//! - Explicit support for **discrete-time** control requirements:
//!   - Configurable sample interval: _calling `compute` before one interval
//!     has elapsed is a no-op_, so the driver loop can run as fast as it
//!     likes.
//!   - Direct/reverse process polarity, switchable at runtime.
//!
//! - Driver-owned scheduling: the controller performs no blocking and no
//!   internal threading; an injected clock keeps it deterministic and
//!   testable without real time passing.
//!
//! ## Usage
//!
//! The controller is wired up once with its three callbacks and a clock,
//! then stepped by the driver loop. Plain closures work for all four slots:
//!
//! ```rust
//! use core::cell::Cell;
//! use callback_pid::pid::{Direction, Mode, PidController, ProportionalMode};
//! use callback_pid::time::Millis;
//!
//! let measurement = Cell::new(20.0);
//! let setpoint = Cell::new(100.0);
//! let command = Cell::new(0.0);
//! let now = Cell::new(0u64);
//!
//! let mut pid = PidController::new(
//!     || measurement.get(),
//!     |value| command.set(value),
//!     || setpoint.get(),
//!     || Millis(now.get()),
//!     2.0,
//!     0.5,
//!     0.0,
//!     ProportionalMode::OnError,
//!     Direction::Direct,
//! )
//! .expect("gains are non-negative");
//!
//! // Nothing happens until the controller is switched to automatic
//! assert!(!pid.compute());
//!
//! pid.set_mode(Mode::Automatic);
//! now.set(100);
//! assert!(pid.compute());
//! assert!(command.get() > 0.0);
//! ```
//!
//! ### Running on the wall clock
//!
//! Outside of tests and simulations the system's monotonic clock is usually
//! what you want; `with_system_clock` fills the clock slot for you:
//!
//! ```rust
//! use core::cell::Cell;
//! use callback_pid::pid::{Direction, PidController, ProportionalMode};
//!
//! let measurement = Cell::new(0.0);
//! let command = Cell::new(0.0);
//!
//! let pid = PidController::with_system_clock(
//!     || measurement.get(),
//!     |value| command.set(value),
//!     || 42.0,
//!     1.0,
//!     0.1,
//!     0.0,
//!     ProportionalMode::OnMeasurement,
//!     Direction::Reverse,
//! )
//! .expect("gains are non-negative");
//! # drop(pid);
//! ```
//!
//! ## License
//!
//! MIT
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// The main module for the PID controller library.
pub mod pid;

/// The module defining the capability traits the controller reads from and
/// writes to.
pub mod io;

/// The module containing time-related utilities to support sample-interval
/// handling.
pub mod time;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
