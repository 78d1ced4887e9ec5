//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the rules of the pan/tilt receiver: command
//! parsing, actuator bookkeeping, inter-arrival statistics, stress
//! episode detection and the read-only views served to queries.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod actuator;
pub mod command;
pub mod events;
pub mod ingest;
pub mod ports;
pub mod service;
pub mod snapshot;
pub mod stats;
pub mod stress;
