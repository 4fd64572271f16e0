//! Wavefield: GPU-free core of the animated point-cloud backdrop.
//!
//! - A fixed lattice of points in the X-Z plane (default 200 x 200, spacing 2).
//! - Heights from a radial "sinc" ripple plus a modulated sine wave.
//! - A grayscale falloff colouring computed once from planar distance.
//! - A soft circular sprite texture used to draw each point.
//!
//! Buffer layout (flat `f32`, row-major, outer loop `i` over width, inner
//! loop `j` over depth):
//!   positions : [x0, y0, z0, x1, y1, z1, ...]   len = width * depth * 3
//!   colors    : [r0, g0, b0, r1, g1, b1, ...]   len = width * depth * 3
//!
//! Only the `y` components of `positions` ever change after creation.

pub mod cloud;
pub mod color;
pub mod grid;
pub mod height;
pub mod sprite;

pub use cloud::PointCloud;
pub use color::grayscale;
pub use grid::{Cell, GridSpec, GRID_DEPTH, GRID_SPACING, GRID_WIDTH};
pub use height::{animated_height, initial_height};
pub use sprite::{soft_disc, SpriteImage, SPRITE_SIZE};
