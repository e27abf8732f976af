// End-to-end tests: a rig attached to a bus through the driver, pumped with a
// fixed-step clock, observed only through published signals and accessors.

use camrig::*;
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct Harness {
    bus: Rc<EventBus>,
    driver: RigDriver,
    clock: FrameClock,
    reached: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    fn new() -> Self {
        let bus = Rc::new(EventBus::new());
        let mount = RigMount::new(Transform::default()).with_camera(Vec3::ZERO);
        let rig = CameraRig::new(mount, RigConfig::default().with_seed(3)).expect("camera is mounted");
        let driver = RigDriver::attach(rig, Rc::clone(&bus));
        let reached = Rc::new(RefCell::new(Vec::new()));
        for kind in [SignalKind::TargetPositionReached, SignalKind::TargetRotationReached] {
            let reached = Rc::clone(&reached);
            bus.subscribe(kind, move |signal| match signal {
                CameraSignal::TargetPositionReached(t, _) => {
                    reached.borrow_mut().push(format!("position:{}", t.name()))
                }
                CameraSignal::TargetRotationReached(t, _) => {
                    reached.borrow_mut().push(format!("rotation:{}", t.name()))
                }
                _ => {}
            });
        }
        Self {
            bus,
            driver,
            clock: FrameClock::new(),
            reached,
        }
    }

    fn step(&mut self, dt: f32) {
        self.driver.step(self.clock.step(dt));
    }

    fn reached(&self) -> Vec<String> {
        self.reached.borrow().clone()
    }
}

fn static_params(mode: ExecutionMode, duration: f32) -> StaticTargetParams {
    StaticTargetParams::position_default()
        .with_mode(mode)
        .with_duration(duration)
}

#[test]
fn constant_lerp_completes_on_the_twentieth_frame() {
    let mut h = Harness::new();
    let destination = Vec3::new(10.0, 0.0, 0.0);
    let target = Target::at("dest", destination);
    h.bus
        .set_static_target_position(&target, static_params(ExecutionMode::ConstantLerp, 2.0));
    assert!(h.driver.rig().is_moving());

    for frame in 1..20 {
        h.step(0.1);
        assert!(h.reached().is_empty(), "completed early at frame {}", frame);
    }
    h.step(0.1);
    assert_eq!(h.reached(), vec!["position:dest".to_string()]);

    // the last written sample is the one taken before the 20th delta
    let mut elapsed = 0.0f32;
    for _ in 0..19 {
        elapsed += 0.1;
    }
    let expected = Vec3::ZERO.lerp(destination, elapsed / 2.0);
    let rig = h.driver.rig();
    assert_eq!(rig.anchor().position, expected);
    assert!((rig.anchor().position.x - 9.5).abs() < 1e-4);
    assert!(!rig.is_moving());
}

#[test]
fn immediate_completion_is_published_during_the_request() {
    let h = Harness::new();
    let target = Target::at("snap", Vec3::new(1.0, 2.0, 3.0));
    h.bus
        .set_static_target_position(&target, static_params(ExecutionMode::Immediate, 0.0));
    assert_eq!(h.reached(), vec!["position:snap".to_string()]);
    let rig = h.driver.rig();
    assert_eq!(rig.anchor().position, target.position());
    assert!(!rig.is_moving());
}

#[test]
fn dynamic_look_at_snaps_once_inside_threshold() {
    let mut h = Harness::new();
    let drone = Target::at("drone", Vec3::new(10.0, 0.0, 0.0));
    let params = DynamicRotationParams {
        mode: ExecutionMode::AdaptiveLerp,
        behavior: DynamicRotationBehavior::LookAt,
        lerp_speed: 2.0,
        lerp_threshold: 5.0,
    };
    h.bus.set_dynamic_target_rotation(&drone, params);
    assert!(h.driver.rig().is_rotating());

    let mut frames = 0;
    let mut last = 90.0;
    while h.driver.rig().is_rotating() {
        h.step(1.0 / 60.0);
        let angle = h.driver.rig().anchor().forward().angle_between(Vec3::X).to_degrees();
        assert!(angle <= last + 1e-3, "turned away at frame {}", frames);
        last = angle;
        frames += 1;
        assert!(frames < 600, "never settled");
    }
    assert!(frames > 1, "settled without easing");
    let forward = h.driver.rig().anchor().forward();
    assert!((forward - Vec3::X).length() < 1e-5, "forward = {:?}", forward);
    // dynamic tasks never publish completions
    assert!(h.reached().is_empty());
    assert!(h.driver.rig().has_rotation_task());
}

#[test]
fn waypoints_chain_through_completions() {
    let mut h = Harness::new();
    let waypoints: Vec<Target> = [Vec3::X, Vec3::Y, Vec3::Z]
        .iter()
        .enumerate()
        .map(|(i, p)| Target::at(&format!("w{}", i), *p * 4.0))
        .collect();
    let params = static_params(ExecutionMode::ConstantLerp, 0.3);

    let next = Rc::new(RefCell::new(waypoints[1..].to_vec()));
    let weak: Weak<EventBus> = Rc::downgrade(&h.bus);
    h.bus.subscribe(SignalKind::TargetPositionReached, move |_| {
        let upcoming = if next.borrow().is_empty() {
            None
        } else {
            Some(next.borrow_mut().remove(0))
        };
        if let (Some(bus), Some(target)) = (weak.upgrade(), upcoming) {
            bus.set_static_target_position(&target, params);
        }
    });
    h.bus.set_static_target_position(&waypoints[0], params);

    for _ in 0..30 {
        h.step(0.1);
    }
    assert_eq!(
        h.reached(),
        vec![
            "position:w0".to_string(),
            "position:w1".to_string(),
            "position:w2".to_string()
        ]
    );
    let rig = h.driver.rig();
    assert!(!rig.is_moving());
    assert!(!rig.has_position_task());
}

#[test]
fn immediate_chain_resolves_reentrantly() {
    let h = Harness::new();
    let second = Target::at("second", Vec3::new(0.0, 5.0, 0.0));
    let weak = Rc::downgrade(&h.bus);
    let chained = second.clone();
    h.bus.subscribe(SignalKind::TargetPositionReached, move |signal| {
        let CameraSignal::TargetPositionReached(t, params) = signal else {
            return;
        };
        if t.same(&chained) {
            return;
        }
        if let Some(bus) = weak.upgrade() {
            bus.set_static_target_position(&chained, *params);
        }
    });
    h.bus.set_static_target_position(
        &Target::at("first", Vec3::X),
        static_params(ExecutionMode::Immediate, 0.0),
    );
    assert_eq!(
        h.reached(),
        vec!["position:first".to_string(), "position:second".to_string()]
    );
    assert_eq!(h.driver.rig().anchor().position, second.position());
    assert!(!h.driver.rig().is_moving());
}

#[test]
fn position_and_rotation_run_side_by_side() {
    let mut h = Harness::new();
    let spot = Target::new(
        "spot",
        Transform::new(Vec3::new(0.0, 0.0, 6.0), Quat::from_rotation_y(1.2)),
    );
    let position = static_params(ExecutionMode::ConstantLerp, 0.5);
    let rotation = StaticTargetParams::rotation_default()
        .with_mode(ExecutionMode::SmoothLerp)
        .with_duration(1.0);
    h.bus.set_static_target(&spot, position, rotation);
    {
        let rig = h.driver.rig();
        assert!(rig.is_moving());
        assert!(rig.is_rotating());
    }
    for _ in 0..15 {
        h.step(0.1);
    }
    assert_eq!(
        h.reached(),
        vec!["position:spot".to_string(), "rotation:spot".to_string()]
    );
}

#[test]
fn rejected_requests_surface_through_the_driver() {
    let h = Harness::new();
    h.bus.set_static_target_position(
        &Target::at("custom", Vec3::X),
        static_params(ExecutionMode::CustomLerp, 1.0),
    );
    let errors = h.driver.drain_errors();
    assert_eq!(
        errors,
        vec![RigError::NoCustomStrategy {
            kind: TargetKind::Static,
            axis: Axis::Position,
        }]
    );
    assert!(h.driver.drain_errors().is_empty());
    assert!(!h.driver.rig().is_moving());
}

#[test]
fn steady_cam_activation_via_bus() {
    let mut h = Harness::new();
    h.bus.activate_steady_cam(SteadyCamParams::default());
    assert!(h.driver.rig().steady_cam_active());
    for _ in 0..60 {
        h.step(1.0 / 60.0);
    }
    let rig = h.driver.rig();
    assert!(rig.camera_local().truncate().length() > 0.0);
    assert_eq!(rig.anchor().position, Vec3::ZERO);
}

/// Publishes a steady-cam activation the first time it is advanced and then
/// never arrives.
struct Noisy {
    bus: Weak<EventBus>,
    fired: bool,
}

impl MotionStrategy<Vec3> for Noisy {
    fn advance(&mut self, _frame: MotionFrame<'_, Vec3>) -> Progress {
        if !self.fired {
            self.fired = true;
            if let Some(bus) = self.bus.upgrade() {
                bus.activate_steady_cam(SteadyCamParams::default());
            }
        }
        Progress::Moving
    }
}

#[test]
fn signal_published_while_rig_is_busy_is_deferred() {
    let h = Harness::new();
    let weak = Rc::downgrade(&h.bus);
    h.driver
        .rig_mut()
        .register_custom_position(TargetKind::Static, move |_| {
            Box::new(Noisy {
                bus: weak.clone(),
                fired: false,
            }) as Box<dyn MotionStrategy<Vec3>>
        });
    h.bus.set_static_target_position(
        &Target::at("loud", Vec3::X),
        static_params(ExecutionMode::CustomLerp, 1.0),
    );
    let rig = h.driver.rig();
    assert!(rig.steady_cam_active());
    assert!(rig.is_moving());
}

#[test]
fn dropping_the_driver_detaches_the_rig() {
    let h = Harness::new();
    let Harness { bus, driver, .. } = h;
    assert_eq!(bus.subscriber_count(SignalKind::ActivateSteadyCam), 1);
    drop(driver);
    for kind in SignalKind::ALL {
        let expected = match kind {
            SignalKind::TargetPositionReached | SignalKind::TargetRotationReached => 1,
            _ => 0,
        };
        assert_eq!(bus.subscriber_count(kind), expected, "{:?}", kind);
    }
    // nothing left to receive it
    bus.activate_steady_cam(SteadyCamParams::default());
}
