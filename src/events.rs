//! Camera signal bus.
//!
//! Dispatch is synchronous: `publish` runs every subscriber of the signal's
//! kind, in subscription order, before returning. Handlers may subscribe,
//! unsubscribe or publish from inside a dispatch; the subscriber list is
//! snapshotted first so no borrow is held while a handler runs.

use crate::params::{
    DynamicPositionParams, DynamicRotationParams, StaticTargetParams, SteadyCamParams,
};
use crate::transform::Target;
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug)]
pub enum CameraSignal {
    SetStaticTargetPosition(Target, StaticTargetParams),
    SetStaticTargetRotation(Target, StaticTargetParams),
    SetDynamicTargetPosition(Target, DynamicPositionParams),
    SetDynamicTargetRotation(Target, DynamicRotationParams),
    TargetPositionReached(Target, StaticTargetParams),
    TargetRotationReached(Target, StaticTargetParams),
    ActivateSteadyCam(SteadyCamParams),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    SetStaticTargetPosition,
    SetStaticTargetRotation,
    SetDynamicTargetPosition,
    SetDynamicTargetRotation,
    TargetPositionReached,
    TargetRotationReached,
    ActivateSteadyCam,
}

impl SignalKind {
    pub const ALL: [SignalKind; 7] = [
        SignalKind::SetStaticTargetPosition,
        SignalKind::SetStaticTargetRotation,
        SignalKind::SetDynamicTargetPosition,
        SignalKind::SetDynamicTargetRotation,
        SignalKind::TargetPositionReached,
        SignalKind::TargetRotationReached,
        SignalKind::ActivateSteadyCam,
    ];
}

impl CameraSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            CameraSignal::SetStaticTargetPosition(..) => SignalKind::SetStaticTargetPosition,
            CameraSignal::SetStaticTargetRotation(..) => SignalKind::SetStaticTargetRotation,
            CameraSignal::SetDynamicTargetPosition(..) => SignalKind::SetDynamicTargetPosition,
            CameraSignal::SetDynamicTargetRotation(..) => SignalKind::SetDynamicTargetRotation,
            CameraSignal::TargetPositionReached(..) => SignalKind::TargetPositionReached,
            CameraSignal::TargetRotationReached(..) => SignalKind::TargetRotationReached,
            CameraSignal::ActivateSteadyCam(..) => SignalKind::ActivateSteadyCam,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&CameraSignal)>;

struct Subscription {
    id: SubscriptionId,
    kind: SignalKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: SignalKind, handler: F) -> SubscriptionId
    where
        F: Fn(&CameraSignal) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            kind,
            handler: Rc::new(handler),
        });
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    pub fn subscriber_count(&self, kind: SignalKind) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Deliver `signal` to every current subscriber of its kind. A signal
    /// nobody listens to is dropped.
    pub fn publish(&self, signal: CameraSignal) {
        let kind = signal.kind();
        let handlers: SmallVec<[Handler; 4]> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| Rc::clone(&s.handler))
            .collect();
        if handlers.is_empty() {
            log::trace!("[bus] {:?} has no subscribers", kind);
            return;
        }
        for handler in handlers {
            handler(&signal);
        }
    }

    // Convenience publishers mirroring the signal set.

    pub fn set_static_target_position(&self, target: &Target, params: StaticTargetParams) {
        self.publish(CameraSignal::SetStaticTargetPosition(target.clone(), params));
    }

    pub fn set_static_target_rotation(&self, target: &Target, params: StaticTargetParams) {
        self.publish(CameraSignal::SetStaticTargetRotation(target.clone(), params));
    }

    pub fn set_dynamic_target_position(&self, target: &Target, params: DynamicPositionParams) {
        self.publish(CameraSignal::SetDynamicTargetPosition(target.clone(), params));
    }

    pub fn set_dynamic_target_rotation(&self, target: &Target, params: DynamicRotationParams) {
        self.publish(CameraSignal::SetDynamicTargetRotation(target.clone(), params));
    }

    /// Position first, then rotation.
    pub fn set_static_target(
        &self,
        target: &Target,
        position: StaticTargetParams,
        rotation: StaticTargetParams,
    ) {
        self.set_static_target_position(target, position);
        self.set_static_target_rotation(target, rotation);
    }

    pub fn set_dynamic_target(
        &self,
        target: &Target,
        position: DynamicPositionParams,
        rotation: DynamicRotationParams,
    ) {
        self.set_dynamic_target_position(target, position);
        self.set_dynamic_target_rotation(target, rotation);
    }

    pub fn activate_steady_cam(&self, params: SteadyCamParams) {
        self.publish(CameraSignal::ActivateSteadyCam(params));
    }
}
