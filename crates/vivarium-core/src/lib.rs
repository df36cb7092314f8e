//! Simulation engine for Vivarium.
//!
//! This crate ties the lower layers together into a running world. It owns
//! the configuration file format, world bootstrap, and the ten-phase tick
//! cycle that advances time, drives every entity through the AI layer,
//! steps buildings, resources, and particles, handles births and deaths,
//! and rolls world events.
//!
//! The host (a binary, a test) constructs a [`Simulation`] from a
//! [`SimConfig`] and a decision provider, calls
//! [`bootstrap`](Simulation::bootstrap) once, then calls
//! [`advance`](Simulation::advance) in a loop. Each call returns a
//! [`TickReport`] summarizing what happened.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration loading and typed sections
//! - [`tick`] -- The [`Simulation`] state machine and its tick cycle

pub mod config;
pub mod tick;

pub use config::{ConfigError, SimConfig};
pub use tick::{Simulation, TickReport};
