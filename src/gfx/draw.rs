use super::canvas::{Canvas, LineCap, PaintState};
use super::gl::POSITION_ATTRIB;
use super::math::{Affine, Color, Vec2};
use anyhow::{anyhow, Result};
use glow::HasContext;
use std::f32::consts::TAU;

/// Triangles per round cap.
const CAP_SEGMENTS: usize = 12;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
}

impl From<Vec2> for Vertex {
    fn from(p: Vec2) -> Self {
        Vertex { pos: [p.x, p.y] }
    }
}

/// Appends triangles covering a stroked segment in pixel space.
pub fn tessellate_segment(from: Vec2, to: Vec2, width: f32, cap: LineCap, out: &mut Vec<Vertex>) {
    let half = width / 2.0;
    let delta = Vec2::new(to.x - from.x, to.y - from.y);
    let len = delta.length();

    if len > 0.0 {
        let n = Vec2::new(-delta.y / len * half, delta.x / len * half);
        let p0 = Vec2::new(from.x + n.x, from.y + n.y);
        let p1 = Vec2::new(from.x - n.x, from.y - n.y);
        let p2 = Vec2::new(to.x - n.x, to.y - n.y);
        let p3 = Vec2::new(to.x + n.x, to.y + n.y);
        out.extend_from_slice(&[p0.into(), p1.into(), p2.into(), p0.into(), p2.into(), p3.into()]);
    }

    if cap == LineCap::Round {
        tessellate_disc(from, half, out);
        tessellate_disc(to, half, out);
    }
}

fn tessellate_disc(center: Vec2, radius: f32, out: &mut Vec<Vertex>) {
    let point = |i: usize| {
        let angle = TAU * i as f32 / CAP_SEGMENTS as f32;
        Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    };
    for i in 0..CAP_SEGMENTS {
        out.extend_from_slice(&[center.into(), point(i).into(), point(i + 1).into()]);
    }
}

/// GLES2 implementation of [`Canvas`]: paths are tessellated on the CPU
/// and each stroke or fill is drawn with the flat-color program.
pub struct DrawContext {
    gl: glow::Context,
    program: glow::Program,
    vbo: glow::Buffer,
    vertices: Vec<Vertex>,
    viewport: [f32; 2],

    u_viewport: Option<glow::UniformLocation>,
    u_color: Option<glow::UniformLocation>,

    paint: PaintState,
    stack: Vec<PaintState>,
    subpaths: Vec<Vec<Vec2>>,
}

impl DrawContext {
    pub fn new(gl: glow::Context, program: glow::Program, viewport: [f32; 2]) -> Result<Self> {
        let vbo = unsafe {
            gl.create_buffer()
                .map_err(|e| anyhow!("Failed to create buffer: {}", e))?
        };

        let u_viewport = unsafe { gl.get_uniform_location(program, "uViewport") };
        let u_color = unsafe { gl.get_uniform_location(program, "uColor") };

        Ok(Self {
            gl,
            program,
            vbo,
            vertices: Vec::with_capacity(256),
            viewport,
            u_viewport,
            u_color,
            paint: PaintState::default(),
            stack: Vec::new(),
            subpaths: Vec::new(),
        })
    }

    /// Prepares GL state for a new frame. Paint state carries over.
    pub fn begin(&mut self) {
        self.vertices.clear();

        unsafe {
            self.gl.viewport(0, 0, self.viewport[0] as i32, self.viewport[1] as i32);
            self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);

            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            self.gl.use_program(Some(self.program));
            self.gl.uniform_2_f32(self.u_viewport.as_ref(), self.viewport[0], self.viewport[1]);
        }
    }

    pub fn flush(&mut self) {
        unsafe { self.gl.flush() };
    }

    fn draw_batch(&mut self, color: Color) {
        if self.vertices.is_empty() {
            return;
        }

        unsafe {
            self.gl.uniform_4_f32(self.u_color.as_ref(), color.r, color.g, color.b, color.a);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&self.vertices),
                glow::DYNAMIC_DRAW,
            );

            self.gl.enable_vertex_attrib_array(POSITION_ATTRIB);
            self.gl.vertex_attrib_pointer_f32(
                POSITION_ATTRIB,
                2,
                glow::FLOAT,
                false,
                std::mem::size_of::<Vertex>() as i32,
                0,
            );

            self.gl.draw_arrays(glow::TRIANGLES, 0, self.vertices.len() as i32);
        }

        self.vertices.clear();
    }
}

impl Canvas for DrawContext {
    fn size(&self) -> Vec2 {
        Vec2::new(self.viewport[0], self.viewport[1])
    }

    fn save(&mut self) {
        self.stack.push(self.paint);
    }

    fn restore(&mut self) {
        if let Some(paint) = self.stack.pop() {
            self.paint = paint;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.paint.transform = self.paint.transform.then(Affine::translation(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.paint.transform = self.paint.transform.then(Affine::rotation(radians));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.paint.line_cap = cap;
    }

    fn set_line_width(&mut self, width: f32) {
        self.paint.line_width = width;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.paint.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.paint.fill_color = color;
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.paint.transform.apply(Vec2::new(x, y));
        self.subpaths.push(vec![p]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.paint.transform.apply(Vec2::new(x, y));
        match self.subpaths.last_mut() {
            Some(subpath) => subpath.push(p),
            None => self.subpaths.push(vec![p]),
        }
    }

    fn stroke(&mut self) {
        let width = self.paint.line_width * self.paint.transform.scale_factor();
        for subpath in &self.subpaths {
            for pair in subpath.windows(2) {
                tessellate_segment(pair[0], pair[1], width, self.paint.line_cap, &mut self.vertices);
            }
        }
        self.draw_batch(self.paint.stroke_color);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let m = self.paint.transform;
        let corners = [
            m.apply(Vec2::new(x, y)),
            m.apply(Vec2::new(x + w, y)),
            m.apply(Vec2::new(x + w, y + h)),
            m.apply(Vec2::new(x, y + h)),
        ];
        self.vertices.extend_from_slice(&[
            corners[0].into(),
            corners[1].into(),
            corners[2].into(),
            corners[0].into(),
            corners[2].into(),
            corners[3].into(),
        ]);
        self.draw_batch(self.paint.fill_color);
    }
}

impl Drop for DrawContext {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_program(self.program);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
        let ab = Vec2::new(b.x - a.x, b.y - a.y);
        let ap = Vec2::new(p.x - a.x, p.y - a.y);
        let len2 = ab.x * ab.x + ab.y * ab.y;
        let t = ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0);
        Vec2::new(a.x + ab.x * t - p.x, a.y + ab.y * t - p.y).length()
    }

    #[test]
    fn butt_segment_is_one_quad() {
        let mut out = Vec::new();
        tessellate_segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, LineCap::Butt, &mut out);
        assert_eq!(out.len(), 6);
        for v in &out {
            assert!((v.pos[1].abs() - 2.0).abs() < 1e-5);
            assert!(v.pos[0] == 0.0 || v.pos[0] == 10.0);
        }
    }

    #[test]
    fn round_segment_stays_within_half_width() {
        let (a, b) = (Vec2::new(3.0, 4.0), Vec2::new(-7.0, 12.0));
        let mut out = Vec::new();
        tessellate_segment(a, b, 6.0, LineCap::Round, &mut out);

        assert_eq!(out.len(), 6 + 2 * CAP_SEGMENTS * 3);
        for v in &out {
            let d = distance_to_segment(Vec2::new(v.pos[0], v.pos[1]), a, b);
            assert!(d <= 3.0 + 1e-4, "vertex {:?} is {} away", v, d);
        }
    }

    #[test]
    fn zero_length_round_segment_is_a_dot() {
        let p = Vec2::new(1.0, 1.0);
        let mut out = Vec::new();
        tessellate_segment(p, p, 2.0, LineCap::Round, &mut out);
        assert_eq!(out.len(), 2 * CAP_SEGMENTS * 3);

        out.clear();
        tessellate_segment(p, p, 2.0, LineCap::Butt, &mut out);
        assert!(out.is_empty());
    }
}
