//! Core 2-D fractal tree generation and reveal animation library.
//!
//! Main components:
//! - [`generator`] - recursive branch geometry for one tree.
//! - [`branch`] - a single segment and its per-tick reveal.
//! - [`tree`] - a planted tree and its depth-by-depth reveal scheduler.
//! - [`scene`] - the live set of trees, their surface and frame clock.
//! - [`clock`] - per-frame clock with cancelable registrations.
//! - [`canvas`] - the drawing surface capability and a retained surface.
//! - [`config`] - parameters for planting and revealing trees.
//! - [`error`] - configuration errors.
//! - [`types`] - shared points, ids and colors.

pub mod branch;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod scene;
pub mod tree;
pub mod types;
