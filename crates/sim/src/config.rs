//! Per-class configuration: the raw JSON record and the validated, derived
//! simulation parameters.
//!
//! [`DescentInput`] mirrors the configuration wire format one-to-one (struct
//! fields are the JSON keys). [`DescentConfig`] owns every derived scalar the
//! model needs and is immutable once built, so it can be shared read-only by
//! the integrator and all sweep generators at the same time.

use serde::{Deserialize, Deserializer};

use crate::geometry::BitClass;
use crate::physics::{
    DEFAULT_FLUID_DENSITY, DEFAULT_MAX_PUMP_FLOW_LPM, DEFAULT_MAX_SIM_TIME, DEFAULT_ROCK_DENSITY,
    LPM_PER_M3S, MARSH_SLOPE, MARSH_WATER_SECONDS,
};

/// Convert a Marsh funnel reading (s) to dynamic viscosity (Pa·s).
#[inline]
pub fn marsh_to_viscosity(marsh_s: f64) -> f64 {
    MARSH_SLOPE * (marsh_s - MARSH_WATER_SECONDS)
}

/// Convert a dynamic viscosity (Pa·s) back to a Marsh funnel reading (s).
#[inline]
pub fn viscosity_to_marsh(mu_pa_s: f64) -> f64 {
    mu_pa_s / MARSH_SLOPE + MARSH_WATER_SECONDS
}

/// Convert a pump flow in L/min to m³/s.
#[inline]
pub fn lpm_to_m3s(lpm: f64) -> f64 {
    lpm / LPM_PER_M3S
}

/// Inclusive `[start, stop, step]` sweep over one physical parameter.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(from = "[f64; 3]")]
pub struct SweepRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl From<[f64; 3]> for SweepRange {
    fn from(raw: [f64; 3]) -> Self {
        Self { start: raw[0], stop: raw[1], step: raw[2] }
    }
}

impl SweepRange {
    /// Expand to concrete values. Index-based so repeated float addition
    /// cannot drift the endpoint; `stop` is included when the step divides
    /// the span.
    pub fn values(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.stop < self.start {
            return vec![self.start];
        }
        let n = ((self.stop - self.start) / self.step + 1e-9).floor() as usize;
        (0..=n).map(|i| self.start + i as f64 * self.step).collect()
    }
}

/// Raw per-class record, as read from the configuration file.
///
/// The sweep ranges select which threshold families produce more than one
/// curve: an absent or `null` range means "use the single configured value".
/// `rango_viscosidad` must be present in the record (it may be `null`); the
/// other two ranges may be omitted entirely.
#[derive(Clone, Debug, Deserialize)]
pub struct DescentInput {
    /// Core length (m).
    pub longitud_testigo_m: f64,
    /// Well length (m). Descent starts at the wellhead end.
    pub longitud_pozo_m: f64,
    /// Pump flow rate (L/min).
    pub caudal_lpm: f64,
    /// Fluid rheology as a Marsh funnel reading (s).
    pub viscosidad_marsh_seg: f64,
    /// Hole inclination (degrees from horizontal).
    pub angulo_deg: f64,
    /// Marsh-seconds sweep for the critical-angle family.
    #[serde(deserialize_with = "nullable_range")]
    pub rango_viscosidad: Option<SweepRange>,
    /// Inclination sweep (degrees) for the critical-viscosity-vs-flow family.
    #[serde(default)]
    pub rango_angulo: Option<SweepRange>,
    /// Flow sweep (L/min) for the critical-viscosity-vs-angle family.
    #[serde(default)]
    pub rango_caudal: Option<SweepRange>,
    /// Rock density (kg/m³).
    #[serde(default = "default_rock_density")]
    pub densidad_roca_kgm3: f64,
    /// Fluid density (kg/m³).
    #[serde(default = "default_fluid_density")]
    pub densidad_fluido_kgm3: f64,
    /// Administrative maximum pump flow (L/min).
    #[serde(default = "default_max_pump_flow")]
    pub caudal_max_bombeo_lpm: f64,
    /// Integrator time budget (s).
    #[serde(default = "default_max_sim_time")]
    pub tiempo_max_simulacion_seg: f64,
}

fn default_rock_density() -> f64 {
    DEFAULT_ROCK_DENSITY
}

fn default_fluid_density() -> f64 {
    DEFAULT_FLUID_DENSITY
}

fn default_max_pump_flow() -> f64 {
    DEFAULT_MAX_PUMP_FLOW_LPM
}

fn default_max_sim_time() -> f64 {
    DEFAULT_MAX_SIM_TIME
}

/// Requires the key to be present while still accepting `null`.
fn nullable_range<'de, D>(d: D) -> Result<Option<SweepRange>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<SweepRange>::deserialize(d)
}

/// Errors raised while building a [`DescentConfig`]. All of these are fatal
/// and occur before any simulation runs.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// The diameter-class code is not in the geometry catalog.
    #[error("unknown diameter class `{0}` (expected one of NQ, HQ, PQ)")]
    UnknownClass(String),
    /// Tube/bit diameters violate the annulus invariant.
    #[error("{code}: bit diameter {bit_m} m must exceed tube diameter {tube_m} m")]
    Geometry {
        code: &'static str,
        tube_m: f64,
        bit_m: f64,
    },
    /// A field value is outside its physical range.
    #[error("field `{field}`: {reason}")]
    Field {
        field: &'static str,
        reason: String,
    },
}

fn ensure(cond: bool, field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
    if cond {
        Ok(())
    } else {
        Err(ConfigError::Field { field, reason: reason.into() })
    }
}

/// Validated, derived parameters for one diameter class.
///
/// Geometry fields follow the annulus model: `tube_radius` (r₁) bounds the
/// core, `bit_radius` (r₂) bounds the hole, and r₂ > r₁ always holds here,
/// so the viscous-gap denominator is strictly positive.
#[derive(Clone, Debug)]
pub struct DescentConfig {
    /// Diameter class this config was built for.
    pub class: BitClass,
    /// Core radius r₁ (m).
    pub tube_radius: f64,
    /// Hole radius r₂ (m).
    pub bit_radius: f64,
    /// Frontal area of the core face, π·r₁² (m²).
    pub frontal_area: f64,
    /// Annular flow area, π·(r₂² − r₁²) (m²).
    pub annular_area: f64,
    /// Lateral (shear) surface of the core, 2π·r₁·L (m²).
    pub lateral_area: f64,
    /// Core volume (m³).
    pub volume: f64,
    /// Core mass (kg).
    pub mass: f64,
    /// Dynamic viscosity μ (Pa·s), derived from the Marsh reading.
    pub viscosity: f64,
    /// Pump flow rate (m³/s).
    pub flow: f64,
    /// Hole inclination (rad).
    pub angle: f64,
    /// Well length (m).
    pub well_length: f64,
    /// Core length (m).
    pub core_length: f64,
    /// Rock density (kg/m³).
    pub rock_density: f64,
    /// Fluid density (kg/m³).
    pub fluid_density: f64,
    /// Administrative maximum pump flow (L/min).
    pub max_pump_flow_lpm: f64,
    /// Integrator time budget (s).
    pub max_sim_time: f64,
    /// Marsh-seconds sweep for the critical-angle family.
    pub viscosity_range: Option<SweepRange>,
    /// Inclination sweep (degrees) for the critical-viscosity-vs-flow family.
    pub angle_range: Option<SweepRange>,
    /// Flow sweep (L/min) for the critical-viscosity-vs-angle family.
    pub flow_range: Option<SweepRange>,
}

impl DescentConfig {
    /// Build and validate the configuration for `class` from a raw record.
    pub fn new(class: BitClass, input: &DescentInput) -> Result<Self, ConfigError> {
        ensure(
            input.longitud_testigo_m > 0.0,
            "longitud_testigo_m",
            format!("core length must be positive, got {}", input.longitud_testigo_m),
        )?;
        ensure(
            input.longitud_pozo_m > 0.0,
            "longitud_pozo_m",
            format!("well length must be positive, got {}", input.longitud_pozo_m),
        )?;
        ensure(
            input.caudal_lpm >= 0.0,
            "caudal_lpm",
            format!("pump flow cannot be negative, got {}", input.caudal_lpm),
        )?;
        ensure(
            input.viscosidad_marsh_seg >= MARSH_WATER_SECONDS,
            "viscosidad_marsh_seg",
            format!(
                "Marsh reading must be at least {MARSH_WATER_SECONDS} s (water), got {}",
                input.viscosidad_marsh_seg
            ),
        )?;
        ensure(
            input.densidad_roca_kgm3 > 0.0,
            "densidad_roca_kgm3",
            format!("rock density must be positive, got {}", input.densidad_roca_kgm3),
        )?;
        ensure(
            input.densidad_fluido_kgm3 > 0.0,
            "densidad_fluido_kgm3",
            format!("fluid density must be positive, got {}", input.densidad_fluido_kgm3),
        )?;
        ensure(
            input.tiempo_max_simulacion_seg > 0.0,
            "tiempo_max_simulacion_seg",
            format!("time budget must be positive, got {}", input.tiempo_max_simulacion_seg),
        )?;

        let tube = class.tube_diameter();
        let bit = class.bit_diameter();
        if bit <= tube {
            return Err(ConfigError::Geometry { code: class.code(), tube_m: tube, bit_m: bit });
        }

        let r1 = tube / 2.0;
        let r2 = bit / 2.0;
        let frontal_area = std::f64::consts::PI * r1 * r1;
        let annular_area = std::f64::consts::PI * (r2 * r2 - r1 * r1);
        let lateral_area = 2.0 * std::f64::consts::PI * r1 * input.longitud_testigo_m;
        let volume = frontal_area * input.longitud_testigo_m;

        Ok(Self {
            class,
            tube_radius: r1,
            bit_radius: r2,
            frontal_area,
            annular_area,
            lateral_area,
            volume,
            mass: input.densidad_roca_kgm3 * volume,
            viscosity: marsh_to_viscosity(input.viscosidad_marsh_seg),
            flow: lpm_to_m3s(input.caudal_lpm),
            angle: input.angulo_deg.to_radians(),
            well_length: input.longitud_pozo_m,
            core_length: input.longitud_testigo_m,
            rock_density: input.densidad_roca_kgm3,
            fluid_density: input.densidad_fluido_kgm3,
            max_pump_flow_lpm: input.caudal_max_bombeo_lpm,
            max_sim_time: input.tiempo_max_simulacion_seg,
            viscosity_range: input.rango_viscosidad,
            angle_range: input.rango_angulo,
            flow_range: input.rango_caudal,
        })
    }

    /// Look the diameter class up by code, then build.
    pub fn from_code(code: &str, input: &DescentInput) -> Result<Self, ConfigError> {
        let class =
            BitClass::from_code(code).ok_or_else(|| ConfigError::UnknownClass(code.to_owned()))?;
        Self::new(class, input)
    }

    /// Annular fluid velocity Q/Aa (m/s), positive toward the wellhead.
    #[inline]
    pub fn fluid_velocity(&self) -> f64 {
        self.flow / self.annular_area
    }

    /// Configured rheology as a Marsh funnel reading (s).
    #[inline]
    pub fn marsh_seconds(&self) -> f64 {
        viscosity_to_marsh(self.viscosity)
    }

    /// Configured pump flow in L/min.
    #[inline]
    pub fn flow_lpm(&self) -> f64 {
        self.flow * LPM_PER_M3S
    }

    /// Configured inclination in degrees.
    #[inline]
    pub fn angle_deg(&self) -> f64 {
        self.angle.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> DescentInput {
        DescentInput {
            longitud_testigo_m: 1.0,
            longitud_pozo_m: 50.0,
            caudal_lpm: 60.0,
            viscosidad_marsh_seg: 40.0,
            angulo_deg: 45.0,
            rango_viscosidad: None,
            rango_angulo: None,
            rango_caudal: None,
            densidad_roca_kgm3: DEFAULT_ROCK_DENSITY,
            densidad_fluido_kgm3: DEFAULT_FLUID_DENSITY,
            caudal_max_bombeo_lpm: DEFAULT_MAX_PUMP_FLOW_LPM,
            tiempo_max_simulacion_seg: DEFAULT_MAX_SIM_TIME,
        }
    }

    #[test]
    fn derived_geometry_is_consistent() {
        let cfg = DescentConfig::new(BitClass::Nq, &base_input()).unwrap();
        assert!(cfg.annular_area > 0.0);
        assert!(cfg.frontal_area > 0.0);
        assert!(cfg.bit_radius > cfg.tube_radius);
        // mass = ρ · V and V = Af · L
        assert!((cfg.volume - cfg.frontal_area * cfg.core_length).abs() < 1e-12);
        assert!((cfg.mass - cfg.rock_density * cfg.volume).abs() < 1e-9);
    }

    #[test]
    fn unknown_code_is_a_config_error() {
        let err = DescentConfig::from_code("BQ", &base_input()).unwrap_err();
        assert_eq!(err, ConfigError::UnknownClass("BQ".to_owned()));
    }

    #[test]
    fn invalid_fields_are_named() {
        let mut input = base_input();
        input.longitud_pozo_m = 0.0;
        match DescentConfig::new(BitClass::Nq, &input).unwrap_err() {
            ConfigError::Field { field, .. } => assert_eq!(field, "longitud_pozo_m"),
            other => panic!("expected a field error, got {other:?}"),
        }

        let mut input = base_input();
        input.viscosidad_marsh_seg = 10.0;
        match DescentConfig::new(BitClass::Nq, &input).unwrap_err() {
            ConfigError::Field { field, .. } => assert_eq!(field, "viscosidad_marsh_seg"),
            other => panic!("expected a field error, got {other:?}"),
        }
    }

    #[test]
    fn water_maps_to_zero_viscosity() {
        assert_eq!(marsh_to_viscosity(MARSH_WATER_SECONDS), 0.0);
        let mu = marsh_to_viscosity(40.0);
        assert!((mu - 0.0165).abs() < 1e-12);
        assert!((viscosity_to_marsh(mu) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn sweep_range_includes_endpoint() {
        let r = SweepRange { start: 40.0, stop: 120.0, step: 20.0 };
        assert_eq!(r.values(), vec![40.0, 60.0, 80.0, 100.0, 120.0]);
        // A step that does not divide the span stops below it.
        let r = SweepRange { start: 0.0, stop: 90.0, step: 25.0 };
        assert_eq!(r.values(), vec![0.0, 25.0, 50.0, 75.0]);
        // Degenerate step falls back to the single start value.
        let r = SweepRange { start: 30.0, stop: 60.0, step: 0.0 };
        assert_eq!(r.values(), vec![30.0]);
    }

    #[test]
    fn wire_format_round_trips() {
        let raw = r#"{
            "longitud_testigo_m": 1.5,
            "longitud_pozo_m": 120.0,
            "caudal_lpm": 80,
            "viscosidad_marsh_seg": 45,
            "angulo_deg": 30,
            "rango_viscosidad": [40, 120, 20],
            "rango_caudal": [40, 100, 20]
        }"#;
        let input: DescentInput = serde_json::from_str(raw).unwrap();
        assert_eq!(
            input.rango_viscosidad,
            Some(SweepRange { start: 40.0, stop: 120.0, step: 20.0 })
        );
        assert_eq!(input.rango_angulo, None);
        // defaults fill in
        assert_eq!(input.densidad_roca_kgm3, DEFAULT_ROCK_DENSITY);
        assert_eq!(input.caudal_max_bombeo_lpm, DEFAULT_MAX_PUMP_FLOW_LPM);

        let cfg = DescentConfig::from_code("HQ", &input).unwrap();
        assert_eq!(cfg.class, BitClass::Hq);
        assert!((cfg.flow - 80.0 / 60_000.0).abs() < 1e-15);
    }

    #[test]
    fn viscosity_range_key_is_required_but_nullable() {
        let missing = r#"{
            "longitud_testigo_m": 1.0,
            "longitud_pozo_m": 50.0,
            "caudal_lpm": 60,
            "viscosidad_marsh_seg": 40,
            "angulo_deg": 45
        }"#;
        assert!(serde_json::from_str::<DescentInput>(missing).is_err());

        let null_range = r#"{
            "longitud_testigo_m": 1.0,
            "longitud_pozo_m": 50.0,
            "caudal_lpm": 60,
            "viscosidad_marsh_seg": 40,
            "angulo_deg": 45,
            "rango_viscosidad": null
        }"#;
        let input: DescentInput = serde_json::from_str(null_range).unwrap();
        assert_eq!(input.rango_viscosidad, None);
    }
}
