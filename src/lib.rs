#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Geometric alignment engine for CAD sheet layouts.
//!
//! - [`geom`] holds the vector, frame, curve and rectangle kernel.
//! - [`align`] finds grid anchors, maps model points onto sheets and recomputes 2D grid
//!   extents inside scope or crop rectangles.
//! - [`batch`] runs those operations over many sheets or views and collects reports.
//!
//! The crate logs through the `log` facade and never installs a logger itself.

pub mod align;
pub mod batch;
pub mod config;
pub mod geom;

pub use align::{AlignError, AlignResult};
pub use config::{AlignConfig, ConfigError, ExtentConfig};
