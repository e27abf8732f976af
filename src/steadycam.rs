//! Steady-cam idle drift.
//!
//! While active, the camera child wanders around the anchor: the horizontal
//! offset follows `cos(time)` and the vertical one `sin(2 * time)`, each scaled
//! by an intensity that is redrawn on its own timer. Turning the drift off
//! hands over to a recenter blend that eases the offset back to zero.

use crate::frame::FrameTime;
use crate::params::{SteadyCamBehavior, SteadyCamParams};
use crate::strategy::{Interpolate, MotionFrame, MotionStrategy, Progress, TimedLerp};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-activation drift state. Parameters are not stored here; they are
/// passed in every frame so an override lands on the very next frame.
#[derive(Clone, Debug)]
pub struct SteadyCam {
    cos_intensity: f32,
    sin_intensity: f32,
    cos_elapsed: f32,
    sin_elapsed: f32,
}

impl Default for SteadyCam {
    fn default() -> Self {
        Self::new()
    }
}

impl SteadyCam {
    pub fn new() -> Self {
        // start expired so both intensities are drawn on the first frame
        Self {
            cos_intensity: 0.0,
            sin_intensity: 0.0,
            cos_elapsed: f32::INFINITY,
            sin_elapsed: f32::INFINITY,
        }
    }

    pub fn intensities(&self) -> (f32, f32) {
        (self.cos_intensity, self.sin_intensity)
    }

    /// Point the offset is currently chasing, keeping the depth of `local`.
    pub fn drift_point(&self, time: f32, local: Vec3) -> Vec3 {
        Vec3::new(
            time.cos() * self.cos_intensity,
            (time * 2.0).sin() * self.sin_intensity,
            local.z,
        )
    }

    pub fn advance<R: Rng>(
        &mut self,
        params: &SteadyCamParams,
        frame: FrameTime,
        local: &mut Vec3,
        rng: &mut R,
    ) {
        if self.cos_elapsed < params.cos_change_period {
            self.cos_elapsed += frame.dt;
        } else {
            self.cos_elapsed = 0.0;
            self.cos_intensity = draw(rng, params.min_cos_intensity, params.max_cos_intensity);
        }
        if self.sin_elapsed < params.sin_change_period {
            self.sin_elapsed += frame.dt;
        } else {
            self.sin_elapsed = 0.0;
            self.sin_intensity = draw(rng, params.min_sin_intensity, params.max_sin_intensity);
        }

        let destination = self.drift_point(frame.time, *local);
        *local = Vec3::blend(*local, destination, frame.dt * params.lerp_speed);
    }
}

#[inline]
fn draw<R: Rng>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

#[derive(Clone, Debug)]
pub enum DriftState {
    Off,
    Drifting(SteadyCam),
    /// Easing the offset back to the anchor; still counts as in use.
    Recentering(TimedLerp<Vec3>),
}

/// Owner of the single idle-drift task and the live steady-cam parameters.
#[derive(Debug)]
pub struct IdleDrift {
    params: SteadyCamParams,
    state: DriftState,
    recenter_duration: f32,
    rng: StdRng,
}

impl IdleDrift {
    pub fn new(params: SteadyCamParams, recenter_duration: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            params,
            state: DriftState::Off,
            recenter_duration,
            rng,
        }
    }

    pub fn params(&self) -> SteadyCamParams {
        self.params
    }

    pub fn recenter_duration(&self) -> f32 {
        self.recenter_duration
    }

    /// Used by the next `turn_off`; a recenter already running keeps its
    /// duration.
    pub fn set_recenter_duration(&mut self, seconds: f32) {
        self.recenter_duration = seconds;
    }

    pub fn state(&self) -> &DriftState {
        &self.state
    }

    /// The drift task is live.
    pub fn is_active(&self) -> bool {
        matches!(self.state, DriftState::Drifting(_))
    }

    /// Drifting or still recentering after being switched off.
    pub fn in_use(&self) -> bool {
        !matches!(self.state, DriftState::Off)
    }

    /// Start drifting with `params`, or only swap parameters if already
    /// drifting. A pending recenter is abandoned.
    pub fn activate(&mut self, params: SteadyCamParams) {
        self.params = params;
        if !self.is_active() {
            log::debug!("[steadycam] on");
            self.state = DriftState::Drifting(SteadyCam::new());
        } else {
            log::debug!("[steadycam] parameters overridden");
        }
    }

    pub fn override_if_on(&mut self, params: SteadyCamParams) {
        if self.is_active() {
            log::debug!("[steadycam] parameters overridden");
            self.params = params;
        }
    }

    pub fn turn_off(&mut self) {
        if self.is_active() {
            log::debug!("[steadycam] off, recentering over {}s", self.recenter_duration);
            self.state = DriftState::Recentering(TimedLerp::smooth(self.recenter_duration));
        }
    }

    pub fn apply(&mut self, behavior: SteadyCamBehavior, params: SteadyCamParams) {
        match behavior {
            SteadyCamBehavior::TurnOnAndOverride => self.activate(params),
            SteadyCamBehavior::TurnOff => self.turn_off(),
            SteadyCamBehavior::OverrideIfOn => self.override_if_on(params),
            SteadyCamBehavior::Ignore => {}
        }
    }

    pub fn advance(&mut self, frame: FrameTime, local: &mut Vec3) {
        match &mut self.state {
            DriftState::Off => {}
            DriftState::Drifting(drift) => drift.advance(&self.params, frame, local, &mut self.rng),
            DriftState::Recentering(recenter) => {
                let error = local.length();
                let progress = recenter.advance(MotionFrame {
                    current: local,
                    destination: Vec3::ZERO,
                    error,
                    dt: frame.dt,
                });
                if progress == Progress::Arrived {
                    log::debug!("[steadycam] recentered");
                    self.state = DriftState::Off;
                }
            }
        }
    }
}
