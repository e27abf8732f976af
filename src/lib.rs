//! Camera rig controller.
//!
//! Moves and rotates a camera anchor toward targets with one of several
//! interpolation strategies, layers a steady-cam idle drift on the camera
//! child, and exchanges requests and completions over a signal bus.

pub mod config;
pub mod constants;
pub mod driver;
pub mod error;
pub mod events;
pub mod frame;
pub mod params;
pub mod rig;
pub mod steadycam;
pub mod strategy;
pub mod transform;

pub use config::*;
pub use driver::*;
pub use error::*;
pub use events::*;
pub use frame::*;
pub use params::*;
pub use rig::*;
pub use steadycam::*;
pub use strategy::*;
pub use transform::*;
