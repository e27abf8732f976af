//! Value-typed parameter bundles for motion requests.
//!
//! Every bundle is `Copy`: a request captures its own copy when it is issued,
//! so a caller mutating its local bundle afterwards never reaches an in-flight
//! task.

use crate::constants::*;
use crate::error::RigError;
use glam::Vec3;

/// How a position or rotation change is carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Snap to the destination this frame.
    Immediate,
    /// Linear progress over a fixed duration.
    ConstantLerp,
    /// Chase the destination at `lerp_speed * dt` until within threshold.
    AdaptiveLerp,
    /// Smoothstep-eased progress over a fixed duration.
    SmoothLerp,
    /// Caller-registered strategy.
    CustomLerp,
}

/// What a request does to the idle drift when it starts or completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SteadyCamBehavior {
    /// Start the drift if it is off, otherwise only replace its parameters.
    TurnOnAndOverride,
    /// Stop the drift and recenter the camera.
    TurnOff,
    /// Replace the drift parameters only if it is running.
    OverrideIfOn,
    Ignore,
}

/// How a dynamic rotation tracks its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DynamicRotationBehavior {
    /// Match the target's absolute rotation.
    LookAs,
    /// Face the target's position.
    LookAt,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SteadyCamParams {
    pub min_cos_intensity: f32,
    pub max_cos_intensity: f32,
    /// Seconds between horizontal intensity redraws.
    pub cos_change_period: f32,
    pub min_sin_intensity: f32,
    pub max_sin_intensity: f32,
    /// Seconds between vertical intensity redraws.
    pub sin_change_period: f32,
    pub lerp_speed: f32,
}

impl Default for SteadyCamParams {
    fn default() -> Self {
        Self {
            min_cos_intensity: STEADY_CAM_MIN_COS_INTENSITY,
            max_cos_intensity: STEADY_CAM_MAX_COS_INTENSITY,
            cos_change_period: STEADY_CAM_COS_CHANGE_PERIOD,
            min_sin_intensity: STEADY_CAM_MIN_SIN_INTENSITY,
            max_sin_intensity: STEADY_CAM_MAX_SIN_INTENSITY,
            sin_change_period: STEADY_CAM_SIN_CHANGE_PERIOD,
            lerp_speed: STEADY_CAM_LERP_SPEED,
        }
    }
}

impl SteadyCamParams {
    pub fn validate(&self) -> Result<(), RigError> {
        finite("steady_cam.min_cos_intensity", self.min_cos_intensity)?;
        finite("steady_cam.max_cos_intensity", self.max_cos_intensity)?;
        finite("steady_cam.min_sin_intensity", self.min_sin_intensity)?;
        finite("steady_cam.max_sin_intensity", self.max_sin_intensity)?;
        non_negative("steady_cam.cos_change_period", self.cos_change_period)?;
        non_negative("steady_cam.sin_change_period", self.sin_change_period)?;
        non_negative("steady_cam.lerp_speed", self.lerp_speed)
    }
}

/// Bundle for a one-shot position or rotation change.
///
/// Both static shapes share this type: they carry the same fields and differ
/// only in their defaults (`position_default`, `rotation_default`) and in the
/// unit of `lerp_threshold`, which the receiving axis decides. Nothing stops a
/// rotation bundle from being issued as a position request; the numbers are
/// simply read as world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticTargetParams {
    pub mode: ExecutionMode,
    /// Gain for `AdaptiveLerp`.
    pub lerp_speed: f32,
    /// Distance (position) or degrees (rotation) at which `AdaptiveLerp` is done.
    pub lerp_threshold: f32,
    /// Seconds, for `ConstantLerp` and `SmoothLerp`.
    pub duration: f32,
    pub steady_cam_on_start: SteadyCamBehavior,
    pub steady_cam_on_end: SteadyCamBehavior,
    pub start_steady_cam: SteadyCamParams,
    pub end_steady_cam: SteadyCamParams,
}

impl StaticTargetParams {
    pub fn position_default() -> Self {
        Self {
            mode: ExecutionMode::SmoothLerp,
            lerp_speed: STATIC_POSITION_LERP_SPEED,
            lerp_threshold: STATIC_POSITION_THRESHOLD,
            duration: STATIC_POSITION_DURATION,
            steady_cam_on_start: SteadyCamBehavior::Ignore,
            steady_cam_on_end: SteadyCamBehavior::Ignore,
            start_steady_cam: SteadyCamParams::default(),
            end_steady_cam: SteadyCamParams::default(),
        }
    }

    pub fn rotation_default() -> Self {
        Self {
            lerp_speed: STATIC_ROTATION_LERP_SPEED,
            lerp_threshold: STATIC_ROTATION_THRESHOLD,
            duration: STATIC_ROTATION_DURATION,
            ..Self::position_default()
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_steady_cam(mut self, on_start: SteadyCamBehavior, on_end: SteadyCamBehavior) -> Self {
        self.steady_cam_on_start = on_start;
        self.steady_cam_on_end = on_end;
        self
    }

    pub fn motion(&self) -> MotionParams {
        MotionParams {
            mode: self.mode,
            lerp_speed: self.lerp_speed,
            lerp_threshold: self.lerp_threshold,
            duration: self.duration,
        }
    }

    pub fn validate(&self) -> Result<(), RigError> {
        self.motion().validate()?;
        self.start_steady_cam.validate()?;
        self.end_steady_cam.validate()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicPositionParams {
    pub mode: ExecutionMode,
    pub lerp_speed: f32,
    pub lerp_threshold: f32,
    /// Added to the tracked position every frame.
    pub additive_offset: Vec3,
}

impl Default for DynamicPositionParams {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::AdaptiveLerp,
            lerp_speed: DYNAMIC_POSITION_LERP_SPEED,
            lerp_threshold: DYNAMIC_POSITION_THRESHOLD,
            additive_offset: Vec3::ZERO,
        }
    }
}

impl DynamicPositionParams {
    pub fn motion(&self) -> MotionParams {
        MotionParams {
            mode: self.mode,
            lerp_speed: self.lerp_speed,
            lerp_threshold: self.lerp_threshold,
            duration: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), RigError> {
        self.motion().validate()?;
        if !self.additive_offset.is_finite() {
            return Err(RigError::InvalidParameter {
                field: "additive_offset",
                value: f32::NAN,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicRotationParams {
    pub mode: ExecutionMode,
    pub behavior: DynamicRotationBehavior,
    pub lerp_speed: f32,
    pub lerp_threshold: f32,
}

impl Default for DynamicRotationParams {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::AdaptiveLerp,
            behavior: DynamicRotationBehavior::LookAs,
            lerp_speed: DYNAMIC_ROTATION_LERP_SPEED,
            lerp_threshold: DYNAMIC_ROTATION_THRESHOLD,
        }
    }
}

impl DynamicRotationParams {
    pub fn motion(&self) -> MotionParams {
        MotionParams {
            mode: self.mode,
            lerp_speed: self.lerp_speed,
            lerp_threshold: self.lerp_threshold,
            duration: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), RigError> {
        self.motion().validate()
    }
}

/// The part of any bundle a strategy needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    pub mode: ExecutionMode,
    pub lerp_speed: f32,
    pub lerp_threshold: f32,
    pub duration: f32,
}

impl MotionParams {
    pub fn validate(&self) -> Result<(), RigError> {
        non_negative("lerp_speed", self.lerp_speed)?;
        non_negative("lerp_threshold", self.lerp_threshold)?;
        // zero or negative durations are legal and finish on the first frame
        finite("duration", self.duration)
    }
}

pub(crate) fn finite(field: &'static str, value: f32) -> Result<(), RigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RigError::InvalidParameter { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), RigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RigError::InvalidParameter { field, value })
    }
}
