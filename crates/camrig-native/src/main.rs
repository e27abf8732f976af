use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use camrig::{
    CameraRig, CameraSignal, DynamicRotationBehavior, EventBus, ExecutionMode, FrameClock,
    MotionFrame, MotionParams, MotionStrategy, Progress, RigConfig, RigDriver, RigMount,
    SignalKind, SteadyCamBehavior, SteadyCamParams, Target, TargetKind, Transform,
};
use glam::{Quat, Vec3};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const TOUR_SECONDS: f32 = 14.0;
const FOLLOW_SECONDS: f32 = 8.0;
const REPORT_EVERY: f32 = 1.0;

const WAYPOINTS: [[f32; 3]; 4] = [
    [10.0, 0.0, 0.0],
    [10.0, 2.0, 10.0],
    [0.0, 4.0, 10.0],
    [0.0, 0.0, 0.0],
];

/// Quintic ease (smootherstep), registered as the custom static position
/// strategy.
struct SmootherStep {
    duration: f32,
    elapsed: f32,
    start: Option<Vec3>,
}

impl MotionStrategy<Vec3> for SmootherStep {
    fn advance(&mut self, frame: MotionFrame<'_, Vec3>) -> Progress {
        if self.elapsed >= self.duration {
            return Progress::Arrived;
        }
        let start = *self.start.get_or_insert(*frame.current);
        let t = self.elapsed / self.duration;
        let step = t * t * t * (t * (6.0 * t - 15.0) + 10.0);
        self.elapsed += frame.dt;
        *frame.current = start.lerp(frame.destination, step);
        if self.elapsed >= self.duration {
            Progress::Arrived
        } else {
            Progress::Moving
        }
    }
}

fn demo_config() -> RigConfig {
    let mut config = RigConfig::default();
    config.set_steady_cam(SteadyCamParams {
        min_cos_intensity: 0.03,
        max_cos_intensity: 0.05,
        cos_change_period: 2.0,
        min_sin_intensity: 0.03,
        max_sin_intensity: 0.06,
        sin_change_period: 3.0,
        lerp_speed: 1.0,
    });
    config.set_static_position(
        ExecutionMode::SmoothLerp,
        0.5,
        0.5,
        3.0,
        SteadyCamBehavior::Ignore,
        SteadyCamBehavior::Ignore,
    );
    config.set_static_rotation(
        ExecutionMode::SmoothLerp,
        0.5,
        0.5,
        2.0,
        SteadyCamBehavior::Ignore,
        SteadyCamBehavior::Ignore,
    );
    config.set_dynamic_position(ExecutionMode::AdaptiveLerp, 2.0, 0.05, Vec3::new(0.0, 1.5, -4.0));
    config.set_dynamic_rotation(
        ExecutionMode::AdaptiveLerp,
        DynamicRotationBehavior::LookAt,
        5.0,
        0.05,
    );
    config
}

/// Chain the waypoints: each completion issues the next one.
fn schedule_tour(bus: &Rc<EventBus>, config: &RigConfig, waypoints: Vec<Target>) {
    let next = Rc::new(Cell::new(1usize));
    let weak_bus = Rc::downgrade(bus);
    let mut params = config.static_position();
    params.mode = ExecutionMode::CustomLerp;
    params.steady_cam_on_start = SteadyCamBehavior::TurnOff;
    params.steady_cam_on_end = SteadyCamBehavior::TurnOnAndOverride;
    params.end_steady_cam.min_cos_intensity = 0.1;
    params.end_steady_cam.max_cos_intensity = 0.12;

    let Some(first) = waypoints.first().cloned() else {
        return;
    };
    bus.subscribe(SignalKind::TargetPositionReached, move |signal| {
        let CameraSignal::TargetPositionReached(reached, _) = signal else {
            return;
        };
        log::info!("[tour] arrived at {}", reached.name());
        let index = next.get();
        let (Some(bus), Some(target)) = (weak_bus.upgrade(), waypoints.get(index)) else {
            return;
        };
        next.set(index + 1);
        bus.set_static_target_position(target, params);
    });
    bus.set_static_target_position(&first, params);
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = demo_config();
    let bus = Rc::new(EventBus::new());
    let mount = RigMount::new(Transform::default()).with_camera(Vec3::ZERO);
    let rig = CameraRig::new(mount, config.clone())?;
    let driver = RigDriver::attach(rig, Rc::clone(&bus));
    driver
        .rig_mut()
        .register_custom_position(TargetKind::Static, |params: &MotionParams| {
            Box::new(SmootherStep {
                duration: params.duration,
                elapsed: 0.0,
                start: None,
            }) as Box<dyn MotionStrategy<Vec3>>
        });

    let waypoints: Vec<Target> = WAYPOINTS
        .iter()
        .enumerate()
        .map(|(i, p)| Target::at(&format!("waypoint-{i}"), Vec3::from(*p)))
        .collect();
    let landmark = Target::new(
        "landmark",
        Transform::new(Vec3::new(5.0, 0.0, 5.0), Quat::from_rotation_y(0.8)),
    );
    bus.set_static_target_rotation(&landmark, config.static_rotation());
    schedule_tour(&bus, &config, waypoints);

    let mut clock = FrameClock::new();
    let mut next_report = 0.0;
    while clock.time() < TOUR_SECONDS {
        let frame = clock.tick();
        driver.step(frame);
        if frame.time >= next_report {
            next_report += REPORT_EVERY;
            let rig = driver.rig();
            log::info!(
                "[frame] t={:.2} camera={:?} moving={} rotating={} steadycam={}",
                frame.time,
                rig.camera_world_position(),
                rig.is_moving(),
                rig.is_rotating(),
                rig.using_steady_cam()
            );
        }
        thread::sleep(FRAME_INTERVAL);
    }

    // Follow a circling drone for a while.
    let drone = Target::at("drone", Vec3::new(6.0, 2.0, 0.0));
    bus.set_dynamic_target(&drone, config.dynamic_position(), config.dynamic_rotation());
    let follow_start = clock.time();
    while clock.time() < follow_start + FOLLOW_SECONDS {
        let frame = clock.tick();
        let angle = frame.time - follow_start;
        drone.set_position(Vec3::new(6.0 * angle.cos(), 2.0, 6.0 * angle.sin()));
        driver.step(frame);
        if frame.time >= next_report {
            next_report += REPORT_EVERY;
            let rig = driver.rig();
            log::info!(
                "[frame] t={:.2} following drone at {:?}, camera={:?}",
                frame.time,
                drone.position(),
                rig.camera_world_position()
            );
        }
        thread::sleep(FRAME_INTERVAL);
    }

    for err in driver.drain_errors() {
        log::error!("[demo] rig rejected a request: {err}");
    }
    Ok(())
}
