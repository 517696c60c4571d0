//! Fixed-step RK4 integration of the descent.
//!
//! The core starts seated at the wellhead (x = well length) and the coupled
//! (x, v) system is integrated with the classic 4-stage Runge–Kutta scheme:
//! the force balance supplies dv/dt and the velocity itself supplies dx/dt.
//! Two clamps bound the trace: overshooting the wellhead re-seats the core,
//! and reaching the bottom ends the run with one synthetic terminal sample.

use crate::config::DescentConfig;
use crate::forces::{acceleration, static_load_kgf};
use crate::physics::TIME_STEP;

/// One recorded integration sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Elapsed time (s).
    pub t: f64,
    /// Axial position from the hole bottom (m). 0 means fully exited.
    pub x: f64,
    /// Core velocity (m/s). Negative while descending.
    pub v: f64,
    /// Core acceleration (m/s²).
    pub a: f64,
}

/// Terminal state of a descent run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The core reached the hole bottom (final position clamped to 0).
    Exited,
    /// The time budget expired with the core still in the hole. This is the
    /// expected "did not fall" result, not an error.
    TimedOut,
}

/// Ordered, append-only trace of one descent run.
///
/// Each sample reflects the state at the start of its step, except the
/// synthetic terminal sample of an [`Outcome::Exited`] run, which reflects
/// the clamped exit state with the acceleration recomputed at rest.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub samples: Vec<Sample>,
    pub outcome: Outcome,
}

/// Scalar results of a run, reported to the consumer.
#[derive(Clone, Copy, Debug)]
pub struct DescentSummary {
    /// Core velocity just before exit (m/s).
    pub final_velocity: f64,
    /// Elapsed time just before exit (s).
    pub final_time: f64,
    /// Net force on the core just before exit (N).
    pub net_force: f64,
    /// Static annular load on the seated core (kgf).
    pub static_load_kgf: f64,
}

impl Trajectory {
    /// Sample the summary scalars are read from: the one immediately before
    /// the synthetic terminal sample. A stalled run has no terminal sample,
    /// so the same rule lands on its second-to-last recorded step.
    fn summary_sample(&self) -> Option<Sample> {
        let n = self.samples.len();
        if n >= 2 {
            Some(self.samples[n - 2])
        } else {
            self.samples.last().copied()
        }
    }

    /// Scalar results of the run. `outcome` tells the consumer whether they
    /// describe an impact or a stall.
    pub fn summary(&self, cfg: &DescentConfig) -> Option<DescentSummary> {
        self.summary_sample().map(|s| DescentSummary {
            final_velocity: s.v,
            final_time: s.t,
            net_force: cfg.mass * s.a,
            static_load_kgf: static_load_kgf(cfg),
        })
    }
}

/// Integrate a full descent for `cfg`.
///
/// Runs until the core exits at the bottom or the configured time budget
/// expires, whichever comes first. The trace is strictly time-ordered.
pub fn simulate(cfg: &DescentConfig) -> Trajectory {
    let dt = TIME_STEP;
    let mut x = cfg.well_length;
    let mut v = 0.0;
    let mut samples = Vec::new();
    let mut step: u64 = 0;

    loop {
        let t = step as f64 * dt;
        if t >= cfg.max_sim_time {
            return Trajectory { samples, outcome: Outcome::TimedOut };
        }
        let a = acceleration(cfg, v);
        samples.push(Sample { t, x, v, a });

        let k1v = a;
        let k1x = v;
        let k2v = acceleration(cfg, v + 0.5 * dt * k1v);
        let k2x = v + 0.5 * dt * k1v;
        let k3v = acceleration(cfg, v + 0.5 * dt * k2v);
        let k3x = v + 0.5 * dt * k2v;
        let k4v = acceleration(cfg, v + dt * k3v);
        let k4x = v + dt * k3v;

        v += dt / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
        x += dt / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        step += 1;

        if x > cfg.well_length {
            // Pushed past the wellhead by the flow: re-seat the core so it
            // cannot leave through the wrong end.
            x = cfg.well_length;
            v = 0.0;
        } else if x <= 0.0 {
            // Bottom reached: clamp, stop, and record the exit state with
            // the acceleration recomputed at rest.
            let a = acceleration(cfg, 0.0);
            samples.push(Sample { t: step as f64 * dt, x: 0.0, v: 0.0, a });
            return Trajectory { samples, outcome: Outcome::Exited };
        }
    }
}
