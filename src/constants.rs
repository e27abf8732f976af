// Tuning defaults for the rig. `RigConfig::default()` is assembled from these.

// Steady-cam drift
pub const STEADY_CAM_MIN_COS_INTENSITY: f32 = 0.03; // horizontal sway, lower bound
pub const STEADY_CAM_MAX_COS_INTENSITY: f32 = 0.05; // horizontal sway, upper bound
pub const STEADY_CAM_COS_CHANGE_PERIOD: f32 = 2.0; // seconds between horizontal redraws
pub const STEADY_CAM_MIN_SIN_INTENSITY: f32 = 0.03; // vertical bob, lower bound
pub const STEADY_CAM_MAX_SIN_INTENSITY: f32 = 0.06; // vertical bob, upper bound
pub const STEADY_CAM_SIN_CHANGE_PERIOD: f32 = 3.0; // seconds between vertical redraws
pub const STEADY_CAM_LERP_SPEED: f32 = 1.0; // how fast the offset chases the drift point

// Recenter after the steady-cam is switched off
pub const RECENTER_DURATION: f32 = 1.0;

// Static targets
pub const STATIC_POSITION_LERP_SPEED: f32 = 0.5;
pub const STATIC_POSITION_THRESHOLD: f32 = 0.5; // world units
pub const STATIC_POSITION_DURATION: f32 = 25.0;
pub const STATIC_ROTATION_LERP_SPEED: f32 = 0.5;
pub const STATIC_ROTATION_THRESHOLD: f32 = 0.5; // degrees
pub const STATIC_ROTATION_DURATION: f32 = 5.0;

// Dynamic targets
pub const DYNAMIC_POSITION_LERP_SPEED: f32 = 1.0;
pub const DYNAMIC_POSITION_THRESHOLD: f32 = 0.05; // world units
pub const DYNAMIC_ROTATION_LERP_SPEED: f32 = 1.0;
pub const DYNAMIC_ROTATION_THRESHOLD: f32 = 0.05; // degrees

// Below this length a look direction is treated as degenerate
pub const LOOK_EPSILON: f32 = 1e-6;
