//! Axial force balance on the core.
//!
//! Position is measured along the hole axis from the bottom (0 = fully
//! exited), so gravity pulls toward negative x and the pumped annular flow
//! pushes toward positive x. All terms are evaluated against the velocity of
//! the core *relative to the fluid*; both drag terms flip sign with it.

use crate::config::DescentConfig;
use crate::physics::{DRAG_COEFF, GRAVITY};

/// Couette-gap denominator r₁·(1 − (r₁/r₂)²). Strictly positive because the
/// annulus is open (r₂ > r₁).
#[inline]
pub(crate) fn shear_gap(cfg: &DescentConfig) -> f64 {
    cfg.tube_radius * (1.0 - (cfg.tube_radius / cfg.bit_radius).powi(2))
}

/// The four axial force terms (N), evaluated at one core velocity.
#[derive(Clone, Copy, Debug)]
pub struct AxialForces {
    /// Viscous shear on the lateral surface, opposing relative motion.
    pub viscous: f64,
    /// Form drag on the core face, opposing relative motion.
    pub drag: f64,
    /// Buoyancy component along the axis (toward the wellhead).
    pub buoyancy: f64,
    /// Weight component along the axis (toward the bottom).
    pub weight: f64,
}

impl AxialForces {
    /// Evaluate all four terms at core velocity `v` (m/s).
    pub fn at_velocity(cfg: &DescentConfig, v: f64) -> Self {
        let v_rel = v - cfg.fluid_velocity();
        let tau = 4.0 * cfg.viscosity * v_rel.abs() / shear_gap(cfg);
        let sin_theta = cfg.angle.sin();
        Self {
            viscous: -v_rel.signum() * tau * cfg.lateral_area,
            drag: -0.5 * cfg.fluid_density * DRAG_COEFF * cfg.frontal_area * v_rel * v_rel.abs(),
            buoyancy: cfg.fluid_density * cfg.volume * GRAVITY * sin_theta,
            weight: -cfg.rock_density * cfg.volume * GRAVITY * sin_theta,
        }
    }

    /// Net axial force (N).
    #[inline]
    pub fn net(&self) -> f64 {
        self.viscous + self.drag + self.buoyancy + self.weight
    }
}

/// Instantaneous axial acceleration (m/s²) of the core at velocity `v`.
/// Pure: depends only on `cfg` and `v`.
#[inline]
pub fn acceleration(cfg: &DescentConfig, v: f64) -> f64 {
    AxialForces::at_velocity(cfg, v).net() / cfg.mass
}

/// Static annular load on a seated core, in kilograms-force.
///
/// Effective weight against the form drag and viscous shear of the steady
/// annular flow, evaluated with the core at rest. Reporting convention for
/// the impact line of the descent summary.
pub fn static_load_kgf(cfg: &DescentConfig) -> f64 {
    let v_fluid = cfg.fluid_velocity();
    let effective_weight = (cfg.rock_density - cfg.fluid_density) * cfg.volume * GRAVITY;
    let flow_drag = 0.5 * cfg.fluid_density * DRAG_COEFF * cfg.frontal_area * v_fluid * v_fluid.abs();
    let shear = 4.0 * cfg.viscosity * v_fluid / shear_gap(cfg) * cfg.lateral_area;
    (-effective_weight + flow_drag + shear) / GRAVITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DescentInput;
    use crate::geometry::BitClass;

    fn config(angle_deg: f64, marsh_s: f64, flow_lpm: f64, rock: f64, fluid: f64) -> DescentConfig {
        let input = DescentInput {
            longitud_testigo_m: 1.0,
            longitud_pozo_m: 50.0,
            caudal_lpm: flow_lpm,
            viscosidad_marsh_seg: marsh_s,
            angulo_deg: angle_deg,
            rango_viscosidad: None,
            rango_angulo: None,
            rango_caudal: None,
            densidad_roca_kgm3: rock,
            densidad_fluido_kgm3: fluid,
            caudal_max_bombeo_lpm: 140.0,
            tiempo_max_simulacion_seg: 1000.0,
        };
        DescentConfig::new(BitClass::Nq, &input).unwrap()
    }

    #[test]
    fn gravity_and_buoyancy_cancel_in_horizontal_hole() {
        // At zero inclination neither weight nor buoyancy has an axial
        // component; only the flow-relative terms remain.
        let cfg = config(0.0, 40.0, 60.0, 2200.0, 1030.0);
        let f = AxialForces::at_velocity(&cfg, 0.0);
        assert_eq!(f.buoyancy, 0.0);
        assert_eq!(f.weight, 0.0);
        assert!(f.viscous > 0.0, "upward shear from the pumped flow");
        assert!(f.drag > 0.0, "upward form drag from the pumped flow");
    }

    #[test]
    fn no_relative_motion_means_no_drag() {
        // A core moving with the fluid feels neither shear nor form drag,
        // and with matched densities the net force vanishes at any angle.
        let cfg = config(37.0, 80.0, 60.0, 1030.0, 1030.0);
        let a = acceleration(&cfg, cfg.fluid_velocity());
        assert!(a.abs() < 1e-12, "expected equilibrium, got a = {a}");
    }

    #[test]
    fn denser_core_sinks_in_near_still_fluid() {
        // Vertical hole, water-thin mud, barely any pumping: the sign of the
        // acceleration at rest follows the density difference.
        let sinking = config(90.0, 25.0, 1.0, 2200.0, 1030.0);
        assert!(acceleration(&sinking, 0.0) < 0.0);

        let floating = config(90.0, 25.0, 1.0, 900.0, 1030.0);
        assert!(acceleration(&floating, 0.0) > 0.0);
    }

    #[test]
    fn drag_opposes_relative_motion() {
        let cfg = config(45.0, 60.0, 0.0, 2200.0, 1030.0);
        // Still fluid: a descending core (v < 0) is braked upward.
        let down = AxialForces::at_velocity(&cfg, -1.0);
        assert!(down.viscous > 0.0);
        assert!(down.drag > 0.0);
        // And a rising core is braked downward.
        let up = AxialForces::at_velocity(&cfg, 1.0);
        assert!(up.viscous < 0.0);
        assert!(up.drag < 0.0);
    }

    #[test]
    fn static_load_turns_positive_with_strong_pumping() {
        // With no pumping the seated core rests on its effective weight.
        let still = config(90.0, 40.0, 0.0, 2200.0, 1030.0);
        assert!(static_load_kgf(&still) < 0.0);
        // Heavy pumping through the narrow NQ annulus overwhelms it.
        let pumped = config(90.0, 40.0, 120.0, 2200.0, 1030.0);
        assert!(static_load_kgf(&pumped) > 0.0);
    }
}
