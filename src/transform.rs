//! Scene primitives the rig operates on.
//!
//! The host engine owns the real scene graph; the rig only needs a pose for its
//! anchor, a parent-relative offset for the camera child, and shared handles to
//! whatever it is told to look at or travel to. Forward is +Z, up is +Y.

use crate::constants::LOOK_EPSILON;
use glam::{Mat3, Quat, Vec3};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Position and orientation of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Map a point expressed relative to this node into world space.
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Rotate in place so that forward points at `point`.
    pub fn look_at(&mut self, point: Vec3) {
        if let Some(rotation) = look_rotation(point - self.position, Vec3::Y) {
            self.rotation = rotation;
        }
    }
}

/// Rotation whose forward (+Z) axis points along `direction` with `up` as the
/// reference up vector. Returns `None` for a zero-length direction.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    if direction.length_squared() < LOOK_EPSILON * LOOK_EPSILON {
        return None;
    }
    let forward = direction.normalize();
    let mut right = up.cross(forward);
    if right.length_squared() < LOOK_EPSILON * LOOK_EPSILON {
        // looking straight along `up`; any perpendicular will do
        right = forward.any_orthonormal_vector();
    }
    let right = right.normalize();
    let true_up = forward.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, forward)).normalize())
}

/// Angle in degrees between two rotations.
#[inline]
pub fn angle_degrees(a: Quat, b: Quat) -> f32 {
    a.angle_between(b).to_degrees()
}

/// Shared handle to a point of interest.
///
/// Cloning the handle shares the underlying pose, so whoever animates the
/// target (a scripted object, a tracked character) is observed by any task
/// that holds a clone.
#[derive(Clone)]
pub struct Target {
    name: Rc<str>,
    pose: Rc<RefCell<Transform>>,
}

impl Target {
    pub fn new(name: &str, pose: Transform) -> Self {
        Self {
            name: Rc::from(name),
            pose: Rc::new(RefCell::new(pose)),
        }
    }

    pub fn at(name: &str, position: Vec3) -> Self {
        Self::new(name, Transform::from_position(position))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> Transform {
        *self.pose.borrow()
    }

    pub fn position(&self) -> Vec3 {
        self.pose.borrow().position
    }

    pub fn rotation(&self) -> Quat {
        self.pose.borrow().rotation
    }

    pub fn set_position(&self, position: Vec3) {
        self.pose.borrow_mut().position = position;
    }

    pub fn set_rotation(&self, rotation: Quat) {
        self.pose.borrow_mut().rotation = rotation;
    }

    pub fn set_pose(&self, pose: Transform) {
        *self.pose.borrow_mut() = pose;
    }

    /// True when both handles point at the same target.
    pub fn same(&self, other: &Target) -> bool {
        Rc::ptr_eq(&self.pose, &other.pose)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("pose", &*self.pose.borrow())
            .finish()
    }
}
