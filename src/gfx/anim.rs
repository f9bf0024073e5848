//! Staged progress math.
//!
//! A single progress value in `[0, 1]` is split into `n` sequential stages:
//! stage `i` stays at zero until the progress passes `i / n`, then rises
//! linearly to one by `(i + 1) / n`.

use std::f32::consts::PI;

/// Progress shifted back by `i / n`, never negative.
pub fn max_scale(scale: f32, i: u32, n: u32) -> f32 {
    (scale - i as f32 / n as f32).max(0.0)
}

/// Normalized progress of stage `i` out of `n`.
pub fn divide_scale(scale: f32, i: u32, n: u32) -> f32 {
    max_scale(scale, i, n).min(1.0 / n as f32) * n as f32
}

/// Maps linear progress onto a rise-then-fall curve (0 -> 1 -> 0).
pub fn sinify(scale: f32) -> f32 {
    (scale * PI).sin()
}
