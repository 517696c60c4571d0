//! Unified physical constants for the core-descent model.
//!
//! All simulation modules use these constants instead of defining their own.
//! This prevents drift between the force model, the integrator and the
//! threshold sweeps, and makes tuning easier.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Frontal drag coefficient of the core end face.
///
/// Used by:
/// - Form drag in the descent force balance
/// - The closed-form critical-angle and critical-viscosity solvers
pub const DRAG_COEFF: f64 = 0.8;

/// Default rock density (kg/m³).
pub const DEFAULT_ROCK_DENSITY: f64 = 2200.0;

/// Default drilling-fluid density (kg/m³).
pub const DEFAULT_FLUID_DENSITY: f64 = 1030.0;

/// Minimum pumping flow rate (L/min). Flow sweeps start here.
pub const MIN_PUMP_FLOW_LPM: f64 = 25.0;

/// Default administrative maximum pumping flow rate (L/min).
pub const DEFAULT_MAX_PUMP_FLOW_LPM: f64 = 140.0;

/// Default simulated-time budget (s). Reaching it means the core did not fall.
pub const DEFAULT_MAX_SIM_TIME: f64 = 1000.0;

/// Integrator time step (s). Fixed; there is no adaptive control.
pub const TIME_STEP: f64 = 0.01;

/// Marsh-funnel reading of plain water (s). The linear Marsh model maps this
/// reading to zero dynamic viscosity.
pub const MARSH_WATER_SECONDS: f64 = 25.0;

/// Slope of the linear Marsh-seconds to Pa·s map.
pub const MARSH_SLOPE: f64 = 1.1e-3;

/// Litres per minute in one m³/s.
pub const LPM_PER_M3S: f64 = 60_000.0;
