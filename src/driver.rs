//! Wires a [`CameraRig`] to an [`EventBus`].
//!
//! The driver subscribes the rig to every signal kind, republishes the
//! completions the rig produces, and pumps the rig once per frame. The rig is
//! never borrowed while the bus dispatches; a signal that reaches the rig
//! while it is busy (published from inside a custom strategy, say) is queued
//! and handled as soon as the current call returns.

use crate::error::RigError;
use crate::events::{CameraSignal, EventBus, SignalKind, SubscriptionId};
use crate::frame::FrameTime;
use crate::rig::CameraRig;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

struct Shared {
    rig: RefCell<CameraRig>,
    errors: RefCell<Vec<RigError>>,
    deferred: RefCell<VecDeque<CameraSignal>>,
}

impl Shared {
    fn receive(&self, bus: &EventBus, signal: &CameraSignal) {
        let outcome = match self.rig.try_borrow_mut() {
            Ok(mut rig) => rig.handle(signal),
            Err(_) => {
                self.deferred.borrow_mut().push_back(signal.clone());
                return;
            }
        };
        match outcome {
            Ok(Some(follow_up)) => bus.publish(follow_up),
            Ok(None) => {}
            Err(err) => self.errors.borrow_mut().push(err),
        }
        self.flush(bus);
    }

    fn flush(&self, bus: &EventBus) {
        loop {
            let next = self.deferred.borrow_mut().pop_front();
            match next {
                Some(signal) => self.receive(bus, &signal),
                None => break,
            }
        }
    }
}

pub struct RigDriver {
    shared: Rc<Shared>,
    bus: Rc<EventBus>,
    subscriptions: Vec<SubscriptionId>,
}

impl RigDriver {
    pub fn attach(rig: CameraRig, bus: Rc<EventBus>) -> Self {
        let shared = Rc::new(Shared {
            rig: RefCell::new(rig),
            errors: RefCell::new(Vec::new()),
            deferred: RefCell::new(VecDeque::new()),
        });
        let subscriptions = SignalKind::ALL
            .iter()
            .map(|&kind| {
                let shared = Rc::clone(&shared);
                // weak: the bus owns this closure
                let weak_bus: Weak<EventBus> = Rc::downgrade(&bus);
                bus.subscribe(kind, move |signal| {
                    if let Some(bus) = weak_bus.upgrade() {
                        shared.receive(&bus, signal);
                    }
                })
            })
            .collect();
        log::info!("[driver] rig attached to bus");
        Self {
            shared,
            bus,
            subscriptions,
        }
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn rig(&self) -> Ref<'_, CameraRig> {
        self.shared.rig.borrow()
    }

    /// Mutable access for setup (custom strategies, config). Do not hold the
    /// guard across a `publish` or `step`.
    pub fn rig_mut(&self) -> RefMut<'_, CameraRig> {
        self.shared.rig.borrow_mut()
    }

    /// Advance every live task by one frame and publish the completions.
    pub fn step(&self, frame: FrameTime) {
        let completed = self.shared.rig.borrow_mut().advance(frame);
        for signal in completed {
            self.bus.publish(signal);
        }
        self.shared.flush(&self.bus);
    }

    /// Errors raised by requests that arrived through the bus.
    pub fn drain_errors(&self) -> Vec<RigError> {
        std::mem::take(&mut *self.shared.errors.borrow_mut())
    }
}

impl Drop for RigDriver {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}
