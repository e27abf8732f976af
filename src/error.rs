use crate::params::ExecutionMode;
use std::fmt;

/// Which half of the camera pose a request drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Position,
    Rotation,
}

/// Whether a request is a one-shot destination or a tracked object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Static,
    Dynamic,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Position => f.write_str("position"),
            Axis::Rotation => f.write_str("rotation"),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Static => f.write_str("static"),
            TargetKind::Dynamic => f.write_str("dynamic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RigError {
    #[error("camera rig has no camera child to drive")]
    MissingCamera,
    #[error("{mode:?} is not available for {kind} {axis} targets")]
    UnsupportedMode {
        kind: TargetKind,
        axis: Axis,
        mode: ExecutionMode,
    },
    #[error("no custom strategy registered for {kind} {axis}")]
    NoCustomStrategy { kind: TargetKind, axis: Axis },
    #[error("invalid value {value} for `{field}`")]
    InvalidParameter { field: &'static str, value: f32 },
}
