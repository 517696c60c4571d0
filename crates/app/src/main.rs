//! Descent report driver.
//!
//! Loads a JSON configuration (one record per diameter class), runs the
//! descent integrator and the three threshold sweeps for each class, and
//! logs the numeric results. Diameter classes are independent and run in
//! parallel. Rendering is left to downstream tooling; this binary reports
//! the numbers the plots are built from.
//!
//! Run: cargo run -p app -- config.json [--trajectory] [--critical-angle]
//!      [--critical-viscosity] [--viscosity-by-angle]
//!
//! With no mode flags, everything runs.

use std::collections::BTreeMap;
use std::process::ExitCode;

use rayon::prelude::*;
use sim::{
    critical_angle_sweep, critical_viscosity_by_angle, critical_viscosity_by_flow, simulate,
    ConfigError, DescentConfig, DescentInput, Outcome,
};

/// Which reports to produce.
#[derive(Clone, Copy, Debug, Default)]
struct Modes {
    trajectory: bool,
    critical_angle: bool,
    critical_viscosity: bool,
    viscosity_by_angle: bool,
}

impl Modes {
    fn any(self) -> bool {
        self.trajectory || self.critical_angle || self.critical_viscosity || self.viscosity_by_angle
    }

    fn all() -> Self {
        Self {
            trajectory: true,
            critical_angle: true,
            critical_viscosity: true,
            viscosity_by_angle: true,
        }
    }
}

fn usage() {
    eprintln!(
        "usage: app <config.json> [--trajectory] [--critical-angle] \
         [--critical-viscosity] [--viscosity-by-angle]"
    );
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        usage();
        return ExitCode::FAILURE;
    };

    let mut modes = Modes::default();
    for flag in args {
        match flag.as_str() {
            "--trajectory" => modes.trajectory = true,
            "--critical-angle" => modes.critical_angle = true,
            "--critical-viscosity" => modes.critical_viscosity = true,
            "--viscosity-by-angle" => modes.viscosity_by_angle = true,
            other => {
                eprintln!("unknown flag: {other}");
                usage();
                return ExitCode::FAILURE;
            }
        }
    }
    if !modes.any() {
        modes = Modes::all();
    }

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let records: BTreeMap<String, DescentInput> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            log::error!("{path} is not a valid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    let failures: Vec<ConfigError> = records
        .par_iter()
        .filter_map(|(code, input)| run_class(code, input, modes).err())
        .collect();

    for err in &failures {
        log::error!("{err}");
    }
    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run every requested report for one diameter class.
fn run_class(code: &str, input: &DescentInput, modes: Modes) -> Result<(), ConfigError> {
    let cfg = DescentConfig::from_code(code, input)?;
    log::info!(
        "{code}: well {} m at {}°, core {} m, {} L/min, {} s Marsh",
        cfg.well_length,
        cfg.angle_deg(),
        cfg.core_length,
        cfg.flow_lpm(),
        cfg.marsh_seconds(),
    );

    if modes.trajectory {
        report_trajectory(code, &cfg);
    }
    if modes.critical_angle {
        report_critical_angle(code, &cfg);
    }
    if modes.critical_viscosity {
        report_critical_viscosity(code, &cfg);
    }
    if modes.viscosity_by_angle {
        report_viscosity_by_angle(code, &cfg);
    }
    Ok(())
}

fn report_trajectory(code: &str, cfg: &DescentConfig) {
    let traj = simulate(cfg);
    let Some(summary) = traj.summary(cfg) else {
        log::warn!("{code}: trajectory produced no samples");
        return;
    };
    match traj.outcome {
        Outcome::Exited => log::info!(
            "{code}: core exits after {:.1} s at {:.2} m/s \
             (net force {:.1} N, static load {:.1} kgf, {} samples)",
            summary.final_time,
            summary.final_velocity,
            summary.net_force,
            summary.static_load_kgf,
            traj.samples.len(),
        ),
        Outcome::TimedOut => {
            // Expected stall, not an error: the core did not fall.
            let last = traj.samples.last().map(|s| s.x).unwrap_or(cfg.well_length);
            log::warn!(
                "{code}: core still at {:.1} m when the {:.0} s budget expired",
                last,
                cfg.max_sim_time,
            );
        }
    }
}

fn report_critical_angle(code: &str, cfg: &DescentConfig) {
    let sweep = critical_angle_sweep(cfg);
    match sweep.reference_crossing {
        Some(crossing) => log::info!(
            "{code}: reference viscosity saturates at 90° from {crossing:.1} L/min \
             (family swept to {:.1} L/min)",
            sweep.shared_flow_bound,
        ),
        None => log::info!(
            "{code}: no saturation inside the pump range, swept to {:.1} L/min",
            sweep.shared_flow_bound,
        ),
    }
    for (marsh, curve) in &sweep.curves {
        match curve.critical {
            Some(flow) => {
                log::info!("{code}: {marsh:>5.1} s Marsh pins the core from {flow:.1} L/min")
            }
            None => log::info!("{code}: {marsh:>5.1} s Marsh never pins the core"),
        }
    }
}

fn report_critical_viscosity(code: &str, cfg: &DescentConfig) {
    for (angle, curve) in critical_viscosity_by_angle(cfg) {
        let (q_lo, marsh_lo) = curve.points[0];
        let (q_hi, marsh_hi) = curve.points[curve.points.len() - 1];
        log::info!(
            "{code}: at {angle:.0}° the critical viscosity runs {marsh_lo:.1} s \
             ({q_lo:.0} L/min) to {marsh_hi:.1} s ({q_hi:.0} L/min)",
        );
    }
}

fn report_viscosity_by_angle(code: &str, cfg: &DescentConfig) {
    for (flow, curve) in critical_viscosity_by_flow(cfg) {
        // The 0° end is always water-thin; report the steep end instead.
        let (angle, marsh) = curve.points[curve.points.len() - 1];
        if marsh.is_nan() {
            // No finite critical viscosity exists at zero relative flow.
            log::info!(
                "{code}: at {flow:.1} L/min the critical viscosity is undefined (no flow)",
            );
        } else {
            log::info!(
                "{code}: at {flow:.1} L/min the vertical-hole ({angle:.0}°) critical \
                 viscosity is {marsh:.1} s Marsh",
            );
        }
    }
}
