use anyhow::{anyhow, bail, Result};
use glow::HasContext;

/// Attribute slot of the pixel-space position.
pub const POSITION_ATTRIB: u32 = 0;

const VERTEX_SHADER: &str = r#"#version 100
attribute vec2 aPos;
uniform vec2 uViewport;

void main() {
    vec2 ndc = aPos / uViewport * 2.0 - 1.0;
    gl_Position = vec4(ndc.x, -ndc.y, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 100
precision mediump float;
uniform vec4 uColor;

void main() {
    gl_FragColor = uColor;
}
"#;

fn compile(gl: &glow::Context, kind: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl.create_shader(kind).map_err(|e| anyhow!("Failed to create shader: {}", e))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            bail!("Shader compilation failed: {}", log);
        }
        Ok(shader)
    }
}

/// Builds the flat-color program used by [`super::draw::DrawContext`].
pub fn solid_color_program(gl: &glow::Context) -> Result<glow::Program> {
    let vertex = compile(gl, glow::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = match compile(gl, glow::FRAGMENT_SHADER, FRAGMENT_SHADER) {
        Ok(shader) => shader,
        Err(err) => {
            unsafe { gl.delete_shader(vertex) };
            return Err(err);
        }
    };

    unsafe {
        let program = gl.create_program().map_err(|e| anyhow!("Failed to create program: {}", e))?;
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.bind_attrib_location(program, POSITION_ATTRIB, "aPos");
        gl.link_program(program);

        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            bail!("Program linking failed: {}", log);
        }
        Ok(program)
    }
}
