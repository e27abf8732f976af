//! Rig configuration context.
//!
//! Holds the "current defaults" for every bundle shape. Callers fetch a copy,
//! override the fields they care about and issue the request; the config
//! itself is only changed through the setters.

use crate::constants::RECENTER_DURATION;
use crate::error::RigError;
use crate::params::{
    finite, DynamicPositionParams, DynamicRotationBehavior, DynamicRotationParams, ExecutionMode,
    StaticTargetParams, SteadyCamBehavior, SteadyCamParams,
};
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct RigConfig {
    static_position: StaticTargetParams,
    static_rotation: StaticTargetParams,
    dynamic_position: DynamicPositionParams,
    dynamic_rotation: DynamicRotationParams,
    steady_cam: SteadyCamParams,
    /// Seconds the camera takes to settle back on the anchor after the
    /// steady-cam is switched off. Read each time a recenter starts.
    recenter_duration: f32,
    /// Fixed seed for the drift RNG; `None` seeds from entropy. Only read
    /// when the rig is built.
    seed: Option<u64>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            static_position: StaticTargetParams::position_default(),
            static_rotation: StaticTargetParams::rotation_default(),
            dynamic_position: DynamicPositionParams::default(),
            dynamic_rotation: DynamicRotationParams::default(),
            steady_cam: SteadyCamParams::default(),
            recenter_duration: RECENTER_DURATION,
            seed: None,
        }
    }
}

impl RigConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_recenter_duration(mut self, seconds: f32) -> Self {
        self.recenter_duration = seconds;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn recenter_duration(&self) -> f32 {
        self.recenter_duration
    }

    /// Takes effect on the next recenter, including one started by a task
    /// that is already in flight.
    pub fn set_recenter_duration(&mut self, seconds: f32) -> Result<(), RigError> {
        finite("recenter_duration", seconds)?;
        self.recenter_duration = seconds;
        Ok(())
    }

    /// Checked once when a rig is built from this config.
    pub fn validate(&self) -> Result<(), RigError> {
        finite("recenter_duration", self.recenter_duration)?;
        self.steady_cam.validate()?;
        self.static_position.validate()?;
        self.static_rotation.validate()?;
        self.dynamic_position.validate()?;
        self.dynamic_rotation.validate()
    }

    pub fn static_position(&self) -> StaticTargetParams {
        self.static_position
    }

    pub fn static_rotation(&self) -> StaticTargetParams {
        self.static_rotation
    }

    pub fn dynamic_position(&self) -> DynamicPositionParams {
        self.dynamic_position
    }

    pub fn dynamic_rotation(&self) -> DynamicRotationParams {
        self.dynamic_rotation
    }

    pub fn steady_cam(&self) -> SteadyCamParams {
        self.steady_cam
    }

    /// Replace the steady-cam default.
    ///
    /// Static defaults carry their own steady-cam parameters; they pick up
    /// this value the next time they are set, as the static setters copy the
    /// steady-cam default in at that moment.
    pub fn set_steady_cam(&mut self, params: SteadyCamParams) {
        self.steady_cam = params;
    }

    pub fn set_static_position(
        &mut self,
        mode: ExecutionMode,
        lerp_speed: f32,
        lerp_threshold: f32,
        duration: f32,
        on_start: SteadyCamBehavior,
        on_end: SteadyCamBehavior,
    ) {
        self.static_position =
            self.static_bundle(mode, lerp_speed, lerp_threshold, duration, on_start, on_end);
    }

    pub fn set_static_rotation(
        &mut self,
        mode: ExecutionMode,
        lerp_speed: f32,
        lerp_threshold: f32,
        duration: f32,
        on_start: SteadyCamBehavior,
        on_end: SteadyCamBehavior,
    ) {
        self.static_rotation =
            self.static_bundle(mode, lerp_speed, lerp_threshold, duration, on_start, on_end);
    }

    pub fn set_dynamic_position(
        &mut self,
        mode: ExecutionMode,
        lerp_speed: f32,
        lerp_threshold: f32,
        additive_offset: Vec3,
    ) {
        self.dynamic_position = DynamicPositionParams {
            mode,
            lerp_speed,
            lerp_threshold,
            additive_offset,
        };
    }

    pub fn set_dynamic_rotation(
        &mut self,
        mode: ExecutionMode,
        behavior: DynamicRotationBehavior,
        lerp_speed: f32,
        lerp_threshold: f32,
    ) {
        self.dynamic_rotation = DynamicRotationParams {
            mode,
            behavior,
            lerp_speed,
            lerp_threshold,
        };
    }

    fn static_bundle(
        &self,
        mode: ExecutionMode,
        lerp_speed: f32,
        lerp_threshold: f32,
        duration: f32,
        on_start: SteadyCamBehavior,
        on_end: SteadyCamBehavior,
    ) -> StaticTargetParams {
        StaticTargetParams {
            mode,
            lerp_speed,
            lerp_threshold,
            duration,
            steady_cam_on_start: on_start,
            steady_cam_on_end: on_end,
            start_steady_cam: self.steady_cam,
            end_steady_cam: self.steady_cam,
        }
    }
}
