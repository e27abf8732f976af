//! Camera rig state machine.
//!
//! The rig owns the anchor pose, the camera child's local offset, at most one
//! position task, at most one rotation task and the idle drift. Issuing a
//! request always replaces the task of that axis, so two tasks never write the
//! same half of the pose.

use crate::config::RigConfig;
use crate::error::{Axis, RigError, TargetKind};
use crate::events::CameraSignal;
use crate::frame::FrameTime;
use crate::params::{
    DynamicPositionParams, DynamicRotationBehavior, DynamicRotationParams, MotionParams,
    StaticTargetParams, SteadyCamBehavior, SteadyCamParams,
};
use crate::steadycam::IdleDrift;
use crate::strategy::{MotionFrame, MotionStrategy, Progress, StrategyRegistry};
use crate::transform::{angle_degrees, look_rotation, Target, Transform};
use glam::{Quat, Vec3};
use smallvec::SmallVec;

/// Signals produced by one call into the rig.
pub type Emitted = SmallVec<[CameraSignal; 2]>;

/// How the rig is attached to the scene: the anchor it moves and rotates, and
/// the camera child whose local offset carries the idle drift.
#[derive(Clone, Copy, Debug, Default)]
pub struct RigMount {
    pub anchor: Transform,
    pub camera: Option<Vec3>,
}

impl RigMount {
    pub fn new(anchor: Transform) -> Self {
        Self {
            anchor,
            camera: None,
        }
    }

    pub fn with_camera(mut self, local_position: Vec3) -> Self {
        self.camera = Some(local_position);
        self
    }
}

#[derive(Clone, Copy, Debug)]
enum PositionRequest {
    Static(StaticTargetParams),
    Dynamic(DynamicPositionParams),
}

#[derive(Clone, Copy, Debug)]
enum RotationRequest {
    Static(StaticTargetParams),
    Dynamic(DynamicRotationParams),
}

struct PositionTask {
    target: Target,
    request: PositionRequest,
    strategy: Box<dyn MotionStrategy<Vec3>>,
}

impl PositionTask {
    fn destination(&self) -> Vec3 {
        match self.request {
            PositionRequest::Static(_) => self.target.position(),
            PositionRequest::Dynamic(params) => self.target.position() + params.additive_offset,
        }
    }

    fn advance(&mut self, anchor: &mut Transform, dt: f32) -> Progress {
        let destination = self.destination();
        let error = anchor.position.distance(destination);
        self.strategy.advance(MotionFrame {
            current: &mut anchor.position,
            destination,
            error,
            dt,
        })
    }
}

struct RotationTask {
    target: Target,
    request: RotationRequest,
    strategy: Box<dyn MotionStrategy<Quat>>,
}

impl RotationTask {
    fn looks_at(&self) -> bool {
        matches!(
            self.request,
            RotationRequest::Dynamic(DynamicRotationParams {
                behavior: DynamicRotationBehavior::LookAt,
                ..
            })
        )
    }

    /// Destination rotation and the angle (degrees) still to cover.
    fn sample(&self, anchor: &Transform) -> (Quat, f32) {
        if self.looks_at() {
            let direction = self.target.position() - anchor.position;
            match look_rotation(direction, Vec3::Y) {
                Some(facing) => (
                    facing,
                    anchor.forward().angle_between(direction).to_degrees(),
                ),
                // standing on the target: nothing to face
                None => (anchor.rotation, 0.0),
            }
        } else {
            let destination = self.target.rotation();
            (destination, angle_degrees(anchor.rotation, destination))
        }
    }

    fn advance(&mut self, anchor: &mut Transform, dt: f32) -> Progress {
        let (destination, error) = self.sample(anchor);
        let progress = self.strategy.advance(MotionFrame {
            current: &mut anchor.rotation,
            destination,
            error,
            dt,
        });
        if progress == Progress::Arrived && self.looks_at() {
            // inside the threshold LookAt stops easing and faces the target outright
            anchor.rotation = destination;
        }
        progress
    }
}

pub struct CameraRig {
    anchor: Transform,
    camera_local: Vec3,
    position_task: Option<PositionTask>,
    rotation_task: Option<RotationTask>,
    drift: IdleDrift,
    moving: bool,
    rotating: bool,
    strategies: StrategyRegistry,
    config: RigConfig,
    time: f32,
}

impl std::fmt::Debug for CameraRig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraRig")
            .field("anchor", &self.anchor)
            .field("camera_local", &self.camera_local)
            .field("moving", &self.moving)
            .field("rotating", &self.rotating)
            .field("position_task", &self.position_task.is_some())
            .field("rotation_task", &self.rotation_task.is_some())
            .field("drift", &self.drift)
            .finish()
    }
}

impl CameraRig {
    /// Build an idle rig. Fails if the mount has no camera child or the
    /// config holds an invalid value.
    pub fn new(mount: RigMount, config: RigConfig) -> Result<Self, RigError> {
        let Some(camera_local) = mount.camera else {
            log::error!("[rig] the camera must be mounted as a child of the rig anchor");
            return Err(RigError::MissingCamera);
        };
        config.validate().map_err(|err| {
            log::error!("[rig] rejected config: {err}");
            err
        })?;
        let drift = IdleDrift::new(config.steady_cam(), config.recenter_duration(), config.seed());
        Ok(Self {
            anchor: mount.anchor,
            camera_local,
            position_task: None,
            rotation_task: None,
            drift,
            moving: false,
            rotating: false,
            strategies: StrategyRegistry::default(),
            config,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Edit the defaults. Bundle defaults apply to requests built afterwards;
    /// the recenter duration applies to the next recenter. The RNG seed is
    /// fixed once the rig is built.
    pub fn config_mut(&mut self) -> &mut RigConfig {
        &mut self.config
    }

    pub fn anchor(&self) -> Transform {
        self.anchor
    }

    /// Teleport the anchor; live tasks continue from the new pose.
    pub fn set_anchor(&mut self, anchor: Transform) {
        self.anchor = anchor;
    }

    pub fn camera_local(&self) -> Vec3 {
        self.camera_local
    }

    pub fn camera_world_position(&self) -> Vec3 {
        self.anchor.transform_point(self.camera_local)
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn has_position_task(&self) -> bool {
        self.position_task.is_some()
    }

    pub fn has_rotation_task(&self) -> bool {
        self.rotation_task.is_some()
    }

    /// Target of the live position task, if any.
    pub fn position_target(&self) -> Option<&Target> {
        self.position_task.as_ref().map(|t| &t.target)
    }

    pub fn rotation_target(&self) -> Option<&Target> {
        self.rotation_task.as_ref().map(|t| &t.target)
    }

    /// The drift task is live.
    pub fn steady_cam_active(&self) -> bool {
        self.drift.is_active()
    }

    /// Drifting, or still recentering after the drift was switched off.
    pub fn using_steady_cam(&self) -> bool {
        self.drift.in_use()
    }

    pub fn steady_cam_params(&self) -> SteadyCamParams {
        self.drift.params()
    }

    pub fn idle_drift(&self) -> &IdleDrift {
        &self.drift
    }

    pub fn strategies(&self) -> &StrategyRegistry {
        &self.strategies
    }

    pub fn register_custom_position<F>(&mut self, kind: TargetKind, factory: F)
    where
        F: Fn(&MotionParams) -> Box<dyn MotionStrategy<Vec3>> + 'static,
    {
        self.strategies.register_position(kind, factory);
    }

    pub fn register_custom_rotation<F>(&mut self, kind: TargetKind, factory: F)
    where
        F: Fn(&MotionParams) -> Box<dyn MotionStrategy<Quat>> + 'static,
    {
        self.strategies.register_rotation(kind, factory);
    }

    /// Apply one inbound signal. Returns the completion it produced, if the
    /// request finished within this call.
    pub fn handle(&mut self, signal: &CameraSignal) -> Result<Option<CameraSignal>, RigError> {
        match signal {
            CameraSignal::SetStaticTargetPosition(target, params) => {
                self.set_static_target_position(target, *params)
            }
            CameraSignal::SetStaticTargetRotation(target, params) => {
                self.set_static_target_rotation(target, *params)
            }
            CameraSignal::SetDynamicTargetPosition(target, params) => {
                self.set_dynamic_target_position(target, *params).map(|_| None)
            }
            CameraSignal::SetDynamicTargetRotation(target, params) => {
                self.set_dynamic_target_rotation(target, *params).map(|_| None)
            }
            CameraSignal::TargetPositionReached(target, params) => {
                self.target_position_reached(target, params);
                Ok(None)
            }
            CameraSignal::TargetRotationReached(target, params) => {
                self.target_rotation_reached(target, params);
                Ok(None)
            }
            CameraSignal::ActivateSteadyCam(params) => self.activate_steady_cam(*params).map(|_| None),
        }
    }

    pub fn set_static_target_position(
        &mut self,
        target: &Target,
        params: StaticTargetParams,
    ) -> Result<Option<CameraSignal>, RigError> {
        let strategy = params
            .validate()
            .and_then(|_| self.strategies.position(TargetKind::Static, &params.motion()))
            .map_err(|err| rejected(Axis::Position, target, err))?;
        self.replace_position(PositionTask {
            target: target.clone(),
            request: PositionRequest::Static(params),
            strategy,
        });
        log::info!("[rig] moving to {} ({:?})", target.name(), params.mode);
        self.moving = true;
        self.apply_steady_cam(params.steady_cam_on_start, params.start_steady_cam);
        Ok(self.step_position(FrameTime::prime(self.time)))
    }

    pub fn set_static_target_rotation(
        &mut self,
        target: &Target,
        params: StaticTargetParams,
    ) -> Result<Option<CameraSignal>, RigError> {
        let strategy = params
            .validate()
            .and_then(|_| self.strategies.rotation(TargetKind::Static, &params.motion()))
            .map_err(|err| rejected(Axis::Rotation, target, err))?;
        self.replace_rotation(RotationTask {
            target: target.clone(),
            request: RotationRequest::Static(params),
            strategy,
        });
        log::info!("[rig] rotating to {} ({:?})", target.name(), params.mode);
        self.rotating = true;
        self.apply_steady_cam(params.steady_cam_on_start, params.start_steady_cam);
        Ok(self.step_rotation(FrameTime::prime(self.time)))
    }

    /// Follow `target` until another position request replaces the task.
    pub fn set_dynamic_target_position(
        &mut self,
        target: &Target,
        params: DynamicPositionParams,
    ) -> Result<(), RigError> {
        let strategy = params
            .validate()
            .and_then(|_| self.strategies.position(TargetKind::Dynamic, &params.motion()))
            .map_err(|err| rejected(Axis::Position, target, err))?;
        self.replace_position(PositionTask {
            target: target.clone(),
            request: PositionRequest::Dynamic(params),
            strategy,
        });
        log::info!("[rig] following {} ({:?})", target.name(), params.mode);
        self.moving = true;
        self.step_position(FrameTime::prime(self.time));
        Ok(())
    }

    /// Track `target`'s rotation (or face it) until replaced.
    pub fn set_dynamic_target_rotation(
        &mut self,
        target: &Target,
        params: DynamicRotationParams,
    ) -> Result<(), RigError> {
        let strategy = params
            .validate()
            .and_then(|_| self.strategies.rotation(TargetKind::Dynamic, &params.motion()))
            .map_err(|err| rejected(Axis::Rotation, target, err))?;
        self.replace_rotation(RotationTask {
            target: target.clone(),
            request: RotationRequest::Dynamic(params),
            strategy,
        });
        log::info!(
            "[rig] tracking {} ({:?}, {:?})",
            target.name(),
            params.behavior,
            params.mode
        );
        self.rotating = true;
        self.step_rotation(FrameTime::prime(self.time));
        Ok(())
    }

    /// Completion handler for the position axis.
    ///
    /// The busy flag is only cleared when no position task is live; a
    /// listener that chained a new request before this handler ran keeps the
    /// rig marked as moving.
    pub fn target_position_reached(&mut self, target: &Target, params: &StaticTargetParams) {
        log::info!("[rig] position reached: {}", target.name());
        if self.position_task.is_none() {
            self.moving = false;
        }
        self.apply_steady_cam(params.steady_cam_on_end, params.end_steady_cam);
    }

    pub fn target_rotation_reached(&mut self, target: &Target, params: &StaticTargetParams) {
        log::info!("[rig] rotation reached: {}", target.name());
        if self.rotation_task.is_none() {
            self.rotating = false;
        }
        self.apply_steady_cam(params.steady_cam_on_end, params.end_steady_cam);
    }

    /// Start the idle drift, or only swap its parameters if it is running.
    pub fn activate_steady_cam(&mut self, params: SteadyCamParams) -> Result<(), RigError> {
        params.validate().map_err(|err| {
            log::error!("[rig] steady-cam activation rejected: {err}");
            err
        })?;
        self.drift.activate(params);
        Ok(())
    }

    /// Drop the position task without a completion signal.
    pub fn stop_position(&mut self) {
        if let Some(task) = self.position_task.take() {
            log::info!("[rig] position task for {} stopped", task.target.name());
        }
        self.moving = false;
    }

    pub fn stop_rotation(&mut self) {
        if let Some(task) = self.rotation_task.take() {
            log::info!("[rig] rotation task for {} stopped", task.target.name());
        }
        self.rotating = false;
    }

    /// Run one frame: position task, then rotation task, then the idle drift.
    /// Returns the completions that fired this frame.
    pub fn advance(&mut self, frame: FrameTime) -> Emitted {
        self.time = frame.time;
        let mut emitted = Emitted::new();
        if let Some(done) = self.step_position(frame) {
            emitted.push(done);
        }
        if let Some(done) = self.step_rotation(frame) {
            emitted.push(done);
        }
        self.drift.advance(frame, &mut self.camera_local);
        emitted
    }

    /// Steady-cam side effect of a request or completion. The recenter
    /// duration is taken from the live config so edits made through
    /// `config_mut` reach the next recenter.
    fn apply_steady_cam(&mut self, behavior: SteadyCamBehavior, params: SteadyCamParams) {
        self.drift.set_recenter_duration(self.config.recenter_duration());
        self.drift.apply(behavior, params);
    }

    fn replace_position(&mut self, task: PositionTask) {
        if let Some(previous) = self.position_task.replace(task) {
            log::debug!("[rig] cancelled position task for {}", previous.target.name());
        }
    }

    fn replace_rotation(&mut self, task: RotationTask) {
        if let Some(previous) = self.rotation_task.replace(task) {
            log::debug!("[rig] cancelled rotation task for {}", previous.target.name());
        }
    }

    fn step_position(&mut self, frame: FrameTime) -> Option<CameraSignal> {
        let task = self.position_task.as_mut()?;
        let progress = task.advance(&mut self.anchor, frame.dt);
        match task.request {
            PositionRequest::Dynamic(_) => {
                self.moving = progress == Progress::Moving;
                None
            }
            PositionRequest::Static(params) => {
                if progress == Progress::Moving {
                    return None;
                }
                let target = task.target.clone();
                self.position_task = None;
                Some(CameraSignal::TargetPositionReached(target, params))
            }
        }
    }

    fn step_rotation(&mut self, frame: FrameTime) -> Option<CameraSignal> {
        let task = self.rotation_task.as_mut()?;
        let progress = task.advance(&mut self.anchor, frame.dt);
        match task.request {
            RotationRequest::Dynamic(_) => {
                self.rotating = progress == Progress::Moving;
                None
            }
            RotationRequest::Static(params) => {
                if progress == Progress::Moving {
                    return None;
                }
                let target = task.target.clone();
                self.rotation_task = None;
                Some(CameraSignal::TargetRotationReached(target, params))
            }
        }
    }
}

fn rejected(axis: Axis, target: &Target, err: RigError) -> RigError {
    log::error!("[rig] {axis} request for {} rejected: {err}", target.name());
    err
}
