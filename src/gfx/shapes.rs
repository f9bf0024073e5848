//! Stateless drawing routines for the right-angle-to-line shape.

use super::anim::{divide_scale, sinify};
use super::canvas::{Canvas, LineCap};
use crate::config::{Scene, StagePlan, StrokeConfig};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

const DEG: f32 = FRAC_PI_4;
const ROT: f32 = FRAC_PI_2;

pub fn draw_line(canvas: &mut impl Canvas, x1: f32, y1: f32, x2: f32, y2: f32) {
    if x1 == x2 && y1 == y2 {
        return;
    }
    canvas.begin_path();
    canvas.move_to(x1, y1);
    canvas.line_to(x2, y2);
    canvas.stroke();
}

/// The four stage values driving the shape: arm length, then the
/// opening rotation, then the two closing rotations.
pub fn stages(scale: f32, plan: &StagePlan) -> [f32; 4] {
    let sf = if plan.eased { sinify(scale) } else { scale };
    let n = plan.stage_count();
    [0, 1, 2, 3].map(|k| divide_scale(sf, k * plan.stride, n))
}

/// Two arms from the surface center: they grow, fold apart into a right
/// angle, then rotate and close back into a single line.
pub fn draw_shape(canvas: &mut impl Canvas, scale: f32, plan: &StagePlan, size_factor: f32) {
    let [sf1, sf2, sf3, sf4] = stages(scale, plan);
    let area = canvas.size();
    let size = area.x.min(area.y) / size_factor;

    canvas.save();
    canvas.translate(area.x / 2.0, area.y / 2.0);
    canvas.rotate(-DEG * (sf3 + sf4));
    for j in 0..2 {
        canvas.save();
        canvas.rotate(-ROT * (sf2 - sf4) * j as f32);
        draw_line(canvas, 0.0, 0.0, size * sf1, 0.0);
        canvas.restore();
    }
    canvas.restore();
}

pub fn draw_indexed_shape(canvas: &mut impl Canvas, i: usize, scale: f32, scene: &Scene) {
    let area = canvas.size();
    let width = match scene.stroke() {
        StrokeConfig::Relative { factor } => area.x.min(area.y) / factor,
        StrokeConfig::Fixed { width } => width,
    };

    canvas.set_line_cap(LineCap::Round);
    canvas.set_line_width(width);
    canvas.set_stroke_color(scene.colors()[i % scene.colors().len()]);
    draw_shape(canvas, scale, scene.plan(), scene.size_factor());
}
