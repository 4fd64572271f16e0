// src/lib.rs
//! Animated point-cloud backdrop.
//!
//! A lattice of points ripples under a radial wave while the camera drifts
//! toward the pointer and the mouse wheel tilts the cloud. Everything above
//! [`renderer`] is GPU-free and can be driven headless.

pub mod app;
pub mod camera;
pub mod config;
pub mod frame_loop;
pub mod headless;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod ui;
