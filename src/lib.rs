//! Chain of right-angle shapes that fold into single lines, one shape per tap.

pub mod animator;
pub mod app;
pub mod chain;
pub mod config;
pub mod gfx;
pub mod renderer;
