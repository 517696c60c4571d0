//! Core-descent simulation library.
//!
//! Models the free fall of a cylindrical rock core inside an inclined,
//! fluid-filled borehole annulus:
//! - a force-balance model of the axial acceleration (viscous shear, form
//!   drag, buoyancy, weight),
//! - a fixed-step RK4 integrator producing a bounded descent trace,
//! - closed-form sweep generators for the operating thresholds (critical
//!   angle, critical viscosity) across flow, angle and rheology.
//!
//! This crate is framework-agnostic: it computes traces, curves and scalar
//! summaries only. Configuration loading, logging and reporting live in the
//! `app` crate.

pub mod config;
pub mod forces;
pub mod geometry;
pub mod integrator;
pub mod physics;
pub mod thresholds;

pub use config::{ConfigError, DescentConfig, DescentInput, SweepRange};
pub use forces::{acceleration, static_load_kgf, AxialForces};
pub use geometry::BitClass;
pub use integrator::{simulate, DescentSummary, Outcome, Sample, Trajectory};
pub use thresholds::{
    critical_angle_deg, critical_angle_sweep, critical_marsh, critical_viscosity_by_angle,
    critical_viscosity_by_flow, CriticalAngleSweep, ThresholdCurve,
};
