use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::config::ParticleConfig;
use crate::error::{SiteError, SiteResult};
use crate::particles::{self, ParticleField};

const VERTEX_SRC: &str = r#"#version 300 es
in vec3 a_position;
uniform mat4 u_model_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_scale;
void main() {
    vec4 mv = u_model_view * vec4(a_position, 1.0);
    gl_Position = u_projection * mv;
    gl_PointSize = max(u_size * (u_scale / -mv.z), 1.0);
}
"#;

const FRAGMENT_SRC: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
uniform float u_opacity;
out vec4 out_color;
void main() {
    out_color = vec4(u_color, u_opacity);
}
"#;

struct Uniforms {
    model_view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    size: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

/// Draws the particle field into the background canvas.
pub struct ParticleRenderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    // Held so the GPU buffer lives as long as the VAO referencing it.
    _buffer: WebGlBuffer,
    uniforms: Uniforms,
    count: i32,
    field: ParticleField,
    started: f64,
}

impl ParticleRenderer {
    pub fn new(canvas: HtmlCanvasElement, cfg: ParticleConfig, started: f64) -> SiteResult<Self> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(SiteError::WebGlUnsupported)?
            .dyn_into()
            .map_err(|_| SiteError::WebGlUnsupported)?;

        let program = link(&gl, VERTEX_SRC, FRAGMENT_SRC)?;
        let positions = particles::scatter(&cfg, js_sys::Math::random);

        let vao = gl.create_vertex_array().ok_or(SiteError::GlAlloc("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let buffer = gl.create_buffer().ok_or(SiteError::GlAlloc("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(positions.as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);
        let loc = gl.get_attrib_location(&program, "a_position");
        if loc < 0 {
            return Err(SiteError::GlAlloc("a_position attribute"));
        }
        gl.enable_vertex_attrib_array(loc as u32);
        gl.vertex_attrib_pointer_with_i32(loc as u32, 3, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let uniforms = Uniforms {
            model_view: gl.get_uniform_location(&program, "u_model_view"),
            projection: gl.get_uniform_location(&program, "u_projection"),
            size: gl.get_uniform_location(&program, "u_size"),
            scale: gl.get_uniform_location(&program, "u_scale"),
            color: gl.get_uniform_location(&program, "u_color"),
            opacity: gl.get_uniform_location(&program, "u_opacity"),
        };

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        let count = cfg.count.min(i32::MAX as usize) as i32;
        Ok(Self {
            gl,
            canvas,
            program,
            vao,
            _buffer: buffer,
            uniforms,
            count,
            field: ParticleField::new(cfg, 1.0),
            started,
        })
    }

    /// Pointer in [-0.5, 0.5].
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.field.set_pointer(x, y);
    }

    /// Match the drawing buffer to the CSS size times the pixel ratio.
    pub fn resize(&mut self, css_width: f64, css_height: f64, pixel_ratio: f64) {
        let w = (css_width * pixel_ratio).max(1.0) as u32;
        let h = (css_height * pixel_ratio).max(1.0) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.gl.viewport(0, 0, w as i32, h as i32);
        self.field.set_aspect((css_width / css_height.max(1.0)) as f32);
    }

    pub fn draw(&self, now: f64) {
        let gl = &self.gl;
        let cfg = self.field.config();
        let elapsed = now - self.started;

        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.model_view.as_ref(),
            false,
            &self.field.model_view(elapsed).to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            self.uniforms.projection.as_ref(),
            false,
            &self.field.projection().to_cols_array(),
        );
        gl.uniform1f(self.uniforms.size.as_ref(), cfg.size);
        gl.uniform1f(
            self.uniforms.scale.as_ref(),
            ParticleField::point_scale(self.canvas.height() as f32),
        );
        let [r, g, b] = cfg.rgb();
        gl.uniform3f(self.uniforms.color.as_ref(), r, g, b);
        gl.uniform1f(self.uniforms.opacity.as_ref(), cfg.opacity);

        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::POINTS, 0, self.count);
        gl.bind_vertex_array(None);
    }
}

fn compile(gl: &GL, kind: u32, src: &str) -> SiteResult<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or(SiteError::GlAlloc("shader"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(SiteError::ShaderCompile(log))
    }
}

fn link(gl: &GL, vs: &str, fs: &str) -> SiteResult<WebGlProgram> {
    let vs = compile(gl, GL::VERTEX_SHADER, vs)?;
    let fs = compile(gl, GL::FRAGMENT_SHADER, fs)?;
    let program = gl.create_program().ok_or(SiteError::GlAlloc("program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    // Shaders can go once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(SiteError::ProgramLink(log))
    }
}
