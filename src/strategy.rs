//! Interpolation strategies.
//!
//! A strategy is advanced once per frame with the current value, a freshly
//! sampled destination and the remaining error, and reports whether it has
//! arrived. Built-in strategies and caller-registered ones share the same
//! trait; `ExecutionMode::CustomLerp` simply looks the factory up by target
//! kind.

use crate::error::{Axis, RigError, TargetKind};
use crate::params::{ExecutionMode, MotionParams};
use fnv::FnvHashMap;
use glam::{Quat, Vec3};
use std::fmt;

/// A value the rig can blend: positions lerp, rotations slerp.
pub trait Interpolate: Copy + fmt::Debug + 'static {
    /// Blend from `from` to `to`; `t` is clamped to `[0, 1]`.
    fn blend(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for Vec3 {
    #[inline]
    fn blend(from: Self, to: Self, t: f32) -> Self {
        if t <= 0.0 {
            return from;
        }
        if t >= 1.0 {
            return to;
        }
        from.lerp(to, t)
    }
}

impl Interpolate for Quat {
    #[inline]
    fn blend(from: Self, to: Self, t: f32) -> Self {
        if t <= 0.0 {
            return from;
        }
        if t >= 1.0 {
            return to;
        }
        from.slerp(to, t)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Moving,
    Arrived,
}

/// Everything a strategy sees for one frame.
pub struct MotionFrame<'a, V> {
    pub current: &'a mut V,
    pub destination: V,
    /// World units for positions, degrees for rotations.
    pub error: f32,
    pub dt: f32,
}

pub trait MotionStrategy<V: Interpolate> {
    fn advance(&mut self, frame: MotionFrame<'_, V>) -> Progress;
}

pub type StrategyFactory<V> = Box<dyn Fn(&MotionParams) -> Box<dyn MotionStrategy<V>>>;

/// Ease-in/ease-out remap of linear progress.
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressCurve {
    Linear,
    Smooth,
}

impl ProgressCurve {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            ProgressCurve::Linear => t,
            ProgressCurve::Smooth => smoothstep(t),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl<V: Interpolate> MotionStrategy<V> for Immediate {
    fn advance(&mut self, frame: MotionFrame<'_, V>) -> Progress {
        *frame.current = frame.destination;
        Progress::Arrived
    }
}

/// Fixed-duration blend from the value the task started at.
///
/// Progress for a frame is taken before that frame's delta is added, so the
/// last written sample is `(duration - dt) / duration` rather than 1 and the
/// value is left one step short of the destination.
#[derive(Clone, Debug)]
pub struct TimedLerp<V> {
    duration: f32,
    elapsed: f32,
    curve: ProgressCurve,
    start: Option<V>,
}

impl<V: Interpolate> TimedLerp<V> {
    pub fn new(duration: f32, curve: ProgressCurve) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            curve,
            start: None,
        }
    }

    pub fn linear(duration: f32) -> Self {
        Self::new(duration, ProgressCurve::Linear)
    }

    pub fn smooth(duration: f32) -> Self {
        Self::new(duration, ProgressCurve::Smooth)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl<V: Interpolate> MotionStrategy<V> for TimedLerp<V> {
    fn advance(&mut self, frame: MotionFrame<'_, V>) -> Progress {
        if self.elapsed >= self.duration {
            return Progress::Arrived;
        }
        let start = *self.start.get_or_insert(*frame.current);
        let step = self.curve.apply(self.elapsed / self.duration);
        self.elapsed += frame.dt;
        *frame.current = V::blend(start, frame.destination, step);
        if self.elapsed >= self.duration {
            Progress::Arrived
        } else {
            Progress::Moving
        }
    }
}

/// Chases the destination by `speed * dt` of the remaining gap each frame.
/// Framerate dependent on purpose; it never lands exactly, the threshold
/// decides when it is close enough.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveLerp {
    pub speed: f32,
    pub threshold: f32,
}

impl AdaptiveLerp {
    pub fn new(speed: f32, threshold: f32) -> Self {
        Self { speed, threshold }
    }
}

impl<V: Interpolate> MotionStrategy<V> for AdaptiveLerp {
    fn advance(&mut self, frame: MotionFrame<'_, V>) -> Progress {
        if frame.error <= self.threshold {
            return Progress::Arrived;
        }
        *frame.current = V::blend(*frame.current, frame.destination, self.speed * frame.dt);
        Progress::Moving
    }
}

/// Caller-supplied strategies, keyed by target kind, one table per axis.
#[derive(Default)]
pub struct StrategyRegistry {
    position: FnvHashMap<TargetKind, StrategyFactory<Vec3>>,
    rotation: FnvHashMap<TargetKind, StrategyFactory<Quat>>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("position", &self.position.keys().collect::<Vec<_>>())
            .field("rotation", &self.rotation.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StrategyRegistry {
    pub fn register_position<F>(&mut self, kind: TargetKind, factory: F)
    where
        F: Fn(&MotionParams) -> Box<dyn MotionStrategy<Vec3>> + 'static,
    {
        self.position.insert(kind, Box::new(factory));
    }

    pub fn register_rotation<F>(&mut self, kind: TargetKind, factory: F)
    where
        F: Fn(&MotionParams) -> Box<dyn MotionStrategy<Quat>> + 'static,
    {
        self.rotation.insert(kind, Box::new(factory));
    }

    pub fn has_custom(&self, kind: TargetKind, axis: Axis) -> bool {
        match axis {
            Axis::Position => self.position.contains_key(&kind),
            Axis::Rotation => self.rotation.contains_key(&kind),
        }
    }

    pub fn position(
        &self,
        kind: TargetKind,
        params: &MotionParams,
    ) -> Result<Box<dyn MotionStrategy<Vec3>>, RigError> {
        build(&self.position, kind, Axis::Position, params)
    }

    pub fn rotation(
        &self,
        kind: TargetKind,
        params: &MotionParams,
    ) -> Result<Box<dyn MotionStrategy<Quat>>, RigError> {
        build(&self.rotation, kind, Axis::Rotation, params)
    }
}

fn build<V: Interpolate>(
    custom: &FnvHashMap<TargetKind, StrategyFactory<V>>,
    kind: TargetKind,
    axis: Axis,
    params: &MotionParams,
) -> Result<Box<dyn MotionStrategy<V>>, RigError> {
    match params.mode {
        ExecutionMode::Immediate => Ok(Box::new(Immediate)),
        ExecutionMode::AdaptiveLerp => Ok(Box::new(AdaptiveLerp::new(
            params.lerp_speed,
            params.lerp_threshold,
        ))),
        // dynamic bundles have no duration to run against
        ExecutionMode::ConstantLerp | ExecutionMode::SmoothLerp if kind == TargetKind::Dynamic => {
            Err(RigError::UnsupportedMode {
                kind,
                axis,
                mode: params.mode,
            })
        }
        ExecutionMode::ConstantLerp => Ok(Box::new(TimedLerp::<V>::linear(params.duration))),
        ExecutionMode::SmoothLerp => Ok(Box::new(TimedLerp::<V>::smooth(params.duration))),
        ExecutionMode::CustomLerp => custom
            .get(&kind)
            .map(|factory| factory(params))
            .ok_or(RigError::NoCustomStrategy { kind, axis }),
    }
}
