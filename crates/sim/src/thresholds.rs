//! Threshold sweeps: the operating limits at which the force balance pins
//! the core in the hole.
//!
//! Three curve families, all closed-form evaluations of the static balance
//! on an immutable config:
//! - critical angle vs pump flow, one curve per Marsh viscosity;
//! - critical Marsh viscosity vs pump flow, one curve per inclination;
//! - critical Marsh viscosity vs inclination, one curve per pump flow.
//!
//! Only the first family needs crossing logic: the solved angle saturates at
//! 90° and the crossing flow is refined by interpolation. Curves within a
//! family are independent and are computed in parallel.

use rayon::prelude::*;

use crate::config::{lpm_to_m3s, marsh_to_viscosity, viscosity_to_marsh, DescentConfig};
use crate::forces::shear_gap;
use crate::physics::{DRAG_COEFF, GRAVITY, MIN_PUMP_FLOW_LPM};

/// Flow resolution of the critical-angle sweep (L/min).
const ANGLE_SWEEP_FLOW_STEP: f64 = 0.5;
/// Flow resolution of the critical-viscosity sweep (L/min).
const VISCOSITY_SWEEP_FLOW_STEP: f64 = 1.0;
/// Sub-samples inserted between the two grid flows that bracket a 90° crossing.
const CROSSING_SUBSTEPS: usize = 15;
/// Flow margin added past the reference crossing so the whole curve family
/// shares a comparable axis range (L/min).
const SHARED_BOUND_MARGIN_LPM: f64 = 20.0;
/// Saturation limit: past this inclination the core cannot fall at any flow.
const MAX_ANGLE_DEG: f64 = 90.0;

/// One swept curve: ordered (control, response) samples, plus the control
/// value at which the response saturated, when it did.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdCurve {
    /// (control value, response value) pairs in sweep order.
    pub points: Vec<(f64, f64)>,
    /// Control value of the first sample pinned at the saturation limit.
    pub critical: Option<f64>,
}

/// The critical-angle family: one curve per Marsh viscosity over a shared
/// flow axis.
#[derive(Clone, Debug)]
pub struct CriticalAngleSweep {
    /// (Marsh seconds, curve), in ascending viscosity order. Flow is the
    /// control axis (L/min), angle in degrees the response, saturating at 90.
    pub curves: Vec<(f64, ThresholdCurve)>,
    /// Crossing flow of the reference (lowest) viscosity, if it saturated
    /// within the administrative pump range.
    pub reference_crossing: Option<f64>,
    /// Upper flow bound applied to the non-reference curves (L/min).
    pub shared_flow_bound: f64,
}

/// Inclination (degrees) at which the axial balance holds for a core held at
/// rest against a flow of `flow_lpm` in fluid of `marsh_s` rheology.
///
/// The balance ratio is clamped to the [-1, 1] domain of the arcsine and the
/// result floored at 0°; a stationary fluid therefore yields 0°.
pub fn critical_angle_deg(cfg: &DescentConfig, marsh_s: f64, flow_lpm: f64) -> f64 {
    let mu = marsh_to_viscosity(marsh_s);
    let v_rel = -lpm_to_m3s(flow_lpm) / cfg.annular_area;
    let tau = 4.0 * mu * v_rel.abs() / shear_gap(cfg);
    let f_viscous = -v_rel.signum() * tau * cfg.lateral_area;
    let f_drag = -0.5 * cfg.fluid_density * DRAG_COEFF * cfg.frontal_area * v_rel * v_rel.abs();
    let f_weight = (cfg.rock_density - cfg.fluid_density) * cfg.volume * GRAVITY;
    let sin_theta = ((f_viscous + f_drag) / f_weight).clamp(-1.0, 1.0);
    sin_theta.asin().to_degrees().max(0.0)
}

/// Marsh viscosity (s) at which the axial balance holds exactly for a core
/// held at rest at `angle_deg` against a flow of `flow_lpm`.
///
/// Returns NaN when the relative flow is zero: the shear term vanishes and no
/// finite viscosity can close the balance, so the result is undefined rather
/// than guessed. A balance already closed by drag alone floors the solved
/// viscosity at zero (25 s Marsh, plain water).
pub fn critical_marsh(cfg: &DescentConfig, angle_deg: f64, flow_lpm: f64) -> f64 {
    let v_rel = -lpm_to_m3s(flow_lpm) / cfg.annular_area;
    let f_drag = -0.5 * cfg.fluid_density * DRAG_COEFF * cfg.frontal_area * v_rel * v_rel.abs();
    let f_weight = (cfg.rock_density - cfg.fluid_density)
        * cfg.volume
        * GRAVITY
        * angle_deg.to_radians().sin();
    let shear_per_pa_s = 4.0 * v_rel.abs() / shear_gap(cfg) * cfg.lateral_area;
    if shear_per_pa_s == 0.0 {
        return f64::NAN;
    }
    let mu = ((f_weight - f_drag) / shear_per_pa_s).max(0.0);
    viscosity_to_marsh(mu)
}

/// Inclusive index-based flow grid from `MIN_PUMP_FLOW_LPM` to `bound_lpm`.
fn flow_grid(bound_lpm: f64, step: f64) -> Vec<f64> {
    let n = ((bound_lpm - MIN_PUMP_FLOW_LPM) / step + 1e-9).floor() as usize;
    (0..=n).map(|i| MIN_PUMP_FLOW_LPM + i as f64 * step).collect()
}

/// Sweep one viscosity's critical-angle curve over flows up to `bound_lpm`.
///
/// Once a grid sample reaches 90° the crossing is refined with
/// `CROSSING_SUBSTEPS` interpolated flows between the bracketing samples,
/// and every later sample is pinned at exactly 90° instead of recomputed.
fn sweep_angle_curve(cfg: &DescentConfig, marsh_s: f64, bound_lpm: f64) -> ThresholdCurve {
    let mut points = Vec::new();
    let mut critical = None;
    let mut prev: Option<f64> = None;

    for flow in flow_grid(bound_lpm, ANGLE_SWEEP_FLOW_STEP) {
        if critical.is_some() {
            points.push((flow, MAX_ANGLE_DEG));
        } else {
            let angle = critical_angle_deg(cfg, marsh_s, flow);
            match prev {
                Some(prev_flow) if angle >= MAX_ANGLE_DEG => {
                    for k in 1..=CROSSING_SUBSTEPS {
                        let q = prev_flow
                            + (flow - prev_flow) * k as f64 / (CROSSING_SUBSTEPS + 1) as f64;
                        let q = (q * 100.0).round() / 100.0;
                        points.push((q, critical_angle_deg(cfg, marsh_s, q)));
                    }
                    points.push((flow, MAX_ANGLE_DEG));
                    critical = Some(flow);
                }
                _ => points.push((flow, angle)),
            }
        }
        prev = Some(flow);
    }

    ThresholdCurve { points, critical }
}

/// Critical angle vs pump flow, one curve per Marsh viscosity.
///
/// Two passes. The reference (lowest) viscosity is swept over the full
/// administrative pump range; its crossing flow, when it exists, fixes the
/// explicit upper bound `min(crossing + margin, pump max)` that every other
/// viscosity is then swept against, keeping the family on one axis range.
pub fn critical_angle_sweep(cfg: &DescentConfig) -> CriticalAngleSweep {
    let mut marshes: Vec<f64> = match &cfg.viscosity_range {
        Some(range) => range.values(),
        None => vec![(cfg.marsh_seconds() * 10.0).round() / 10.0],
    };
    marshes.sort_by(f64::total_cmp);

    let reference = sweep_angle_curve(cfg, marshes[0], cfg.max_pump_flow_lpm);
    let shared_flow_bound = match reference.critical {
        Some(crossing) => (crossing + SHARED_BOUND_MARGIN_LPM).min(cfg.max_pump_flow_lpm),
        None => cfg.max_pump_flow_lpm,
    };
    let reference_crossing = reference.critical;

    let mut curves = vec![(marshes[0], reference)];
    curves.extend(
        marshes[1..]
            .par_iter()
            .map(|&marsh| (marsh, sweep_angle_curve(cfg, marsh, shared_flow_bound)))
            .collect::<Vec<_>>(),
    );

    CriticalAngleSweep { curves, reference_crossing, shared_flow_bound }
}

/// Critical Marsh viscosity vs pump flow, one curve per inclination (degrees).
///
/// Flow is swept over the full pump range at 1 L/min; the closed form
/// degrades gracefully, so no saturation or crossing logic applies.
pub fn critical_viscosity_by_angle(cfg: &DescentConfig) -> Vec<(f64, ThresholdCurve)> {
    let angles: Vec<f64> = match &cfg.angle_range {
        Some(range) => range.values(),
        None => vec![cfg.angle_deg()],
    };
    let flows = flow_grid(cfg.max_pump_flow_lpm, VISCOSITY_SWEEP_FLOW_STEP);

    angles
        .par_iter()
        .map(|&angle| {
            let points =
                flows.iter().map(|&q| (q, critical_marsh(cfg, angle, q))).collect();
            (angle, ThresholdCurve { points, critical: None })
        })
        .collect()
}

/// Critical Marsh viscosity vs inclination, one curve per pump flow (L/min).
///
/// The same closed form as [`critical_viscosity_by_angle`] with the roles of
/// flow and angle swapped: angle sweeps 0–90° at 1° resolution.
pub fn critical_viscosity_by_flow(cfg: &DescentConfig) -> Vec<(f64, ThresholdCurve)> {
    let flows: Vec<f64> = match &cfg.flow_range {
        Some(range) => range.values(),
        None => vec![cfg.flow_lpm()],
    };
    let angles: Vec<f64> = (0..=90).map(f64::from).collect();

    flows
        .par_iter()
        .map(|&flow| {
            let points =
                angles.iter().map(|&ang| (ang, critical_marsh(cfg, ang, flow))).collect();
            (flow, ThresholdCurve { points, critical: None })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DescentInput;
    use crate::geometry::BitClass;

    fn config() -> DescentConfig {
        let input = DescentInput {
            longitud_testigo_m: 1.0,
            longitud_pozo_m: 50.0,
            caudal_lpm: 60.0,
            viscosidad_marsh_seg: 40.0,
            angulo_deg: 45.0,
            rango_viscosidad: None,
            rango_angulo: None,
            rango_caudal: None,
            densidad_roca_kgm3: 2200.0,
            densidad_fluido_kgm3: 1030.0,
            caudal_max_bombeo_lpm: 140.0,
            tiempo_max_simulacion_seg: 1000.0,
        };
        DescentConfig::new(BitClass::Nq, &input).unwrap()
    }

    #[test]
    fn still_fluid_gives_zero_critical_angle() {
        let cfg = config();
        assert_eq!(critical_angle_deg(&cfg, 40.0, 0.0), 0.0);
    }

    #[test]
    fn critical_angle_grows_with_flow() {
        let cfg = config();
        let low = critical_angle_deg(&cfg, 40.0, 25.0);
        let high = critical_angle_deg(&cfg, 40.0, 30.0);
        assert!(high > low, "more flow should pin the core at steeper angles");
    }

    #[test]
    fn zero_flow_has_no_finite_critical_viscosity() {
        let cfg = config();
        assert!(critical_marsh(&cfg, 45.0, 0.0).is_nan());
    }

    #[test]
    fn drag_sufficient_balance_floors_at_water() {
        // At a near-flat angle the effective weight is tiny and form drag
        // alone holds the core; the solved viscosity floors at plain water.
        let cfg = config();
        let marsh = critical_marsh(&cfg, 0.0, 100.0);
        assert_eq!(marsh, 25.0);
    }

    #[test]
    fn flow_grid_hits_both_endpoints() {
        let grid = flow_grid(140.0, 0.5);
        assert_eq!(grid.first().copied(), Some(25.0));
        assert_eq!(grid.last().copied(), Some(140.0));
        assert_eq!(grid.len(), 231);
    }
}
