use super::math::{Affine, Color, Vec2};
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Persistent immediate-mode 2D drawing context.
///
/// Transform, stroke and fill settings stay in effect until changed, and
/// `save`/`restore` push and pop all of them together.
pub trait Canvas {
    fn size(&self) -> Vec2;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);

    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_width(&mut self, width: f32);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn stroke(&mut self);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
}

/// Something that hands out a canvas per frame and shows the result.
pub trait Surface {
    type Canvas: Canvas;

    fn begin_frame(&mut self) -> &mut Self::Canvas;
    fn present(&mut self) -> Result<()>;
}

/// Everything `save` pushes and `restore` pops.
#[derive(Debug, Clone, Copy)]
pub struct PaintState {
    pub transform: Affine,
    pub line_cap: LineCap,
    pub line_width: f32,
    pub stroke_color: Color,
    pub fill_color: Color,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            line_cap: LineCap::Butt,
            line_width: 1.0,
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
        }
    }
}
