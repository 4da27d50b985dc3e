use glow::HasContext;

use super::camera::ArcBallCamera;
use super::mesh::{self, LineMeshData, MeshData};

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering the viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Show grid
    pub grid_visible: bool,
    /// Show axes
    pub axes_visible: bool,
    /// Background color RGB
    pub bg_color: [u8; 3],
}

/// Grid geometry inputs; the GPU grid is rebuilt when these change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub range: i32,
    pub cell_size: f32,
    pub opacity: f32,
    /// Height of the grid plane
    pub y: f32,
}

/// Identifies the uploaded model: selection sequence id plus color
pub type ModelKey = (u64, [u8; 3]);

// ── GPU mesh handles ─────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    mesh_program: glow::Program,
    line_program: glow::Program,
    grid: Option<GpuLines>,
    axes: Option<GpuLines>,
    cached_grid: Option<GridParams>,
    cached_axes_length: Option<f32>,
    /// The single uploaded model
    model: Option<GpuMesh>,
    model_key: Option<ModelKey>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Option<Self> {
        let mesh_program = compile_program(gl, MESH_VERT, MESH_FRAG)?;
        let line_program = compile_program(gl, LINE_VERT, LINE_FRAG)?;

        Some(Self {
            mesh_program,
            line_program,
            grid: None,
            axes: None,
            cached_grid: None,
            cached_axes_length: None,
            model: None,
            model_key: None,
        })
    }

    /// Rebuild the grid if its parameters changed
    pub fn update_grid(&mut self, gl: &glow::Context, params: GridParams) {
        if self.cached_grid == Some(params) {
            return;
        }
        if let Some(old) = self.grid.take() {
            delete_lines(gl, old);
        }
        let data = mesh::grid(params.range, params.cell_size, params.opacity, params.y);
        self.grid = upload_lines(gl, &data);
        self.cached_grid = Some(params);
    }

    /// Rebuild the axes if their length changed
    pub fn update_axes(&mut self, gl: &glow::Context, length: f32) {
        if self.cached_axes_length == Some(length) {
            return;
        }
        if let Some(old) = self.axes.take() {
            delete_lines(gl, old);
        }
        self.axes = upload_lines(gl, &mesh::axes(length));
        self.cached_axes_length = Some(length);
    }

    /// Make the GPU model match `model`, uploading or deleting as needed.
    ///
    /// Buffers of the previous model are deleted as soon as the key changes,
    /// including when the viewer no longer has a model.
    pub fn sync_model(&mut self, gl: &glow::Context, model: Option<(ModelKey, &MeshData)>) {
        let key = model.map(|(k, _)| k);
        if key == self.model_key {
            return;
        }
        if let Some(old) = self.model.take() {
            delete_mesh(gl, old);
        }
        self.model = model.and_then(|(_, data)| upload_mesh(gl, data));
        self.model_key = key;
        if let Some((key, data)) = model {
            tracing::debug!(
                "Uploaded model #{} ({} vertices, {} triangles)",
                key.0,
                data.vertex_count(),
                data.triangle_count()
            );
        }
    }

    /// Render the scene
    pub fn paint(&self, gl: &glow::Context, camera: &ArcBallCamera, params: &RenderParams) {
        let aspect = params.viewport[2] / params.viewport[3].max(1.0);
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            // Clear viewport area with configured background color
            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

            // Model first so translucent grid lines blend over it
            if let Some(ref model) = self.model {
                gl.use_program(Some(self.mesh_program));
                set_uniform_mat4(gl, self.mesh_program, "u_mvp", &vp);
                // Headlight slightly above the eye
                let light_dir = (camera.view_direction() + glam::Vec3::Y * 0.3).normalize_or_zero();
                set_uniform_vec3(gl, self.mesh_program, "u_light_dir", &light_dir);
                draw_mesh(gl, model);
            }

            gl.use_program(Some(self.line_program));
            set_uniform_mat4(gl, self.line_program, "u_mvp", &vp);

            if params.grid_visible {
                if let Some(ref grid) = self.grid {
                    draw_lines(gl, grid);
                }
            }

            if params.axes_visible {
                if let Some(ref axes) = self.axes {
                    draw_lines(gl, axes);
                }
            }

            gl.disable(glow::BLEND);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }
    }

    /// Free every GL object owned by the renderer
    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(grid) = self.grid.take() {
            delete_lines(gl, grid);
        }
        if let Some(axes) = self.axes.take() {
            delete_lines(gl, axes);
        }
        if let Some(model) = self.model.take() {
            delete_mesh(gl, model);
        }
        self.model_key = None;
        unsafe {
            gl.delete_program(self.mesh_program);
            gl.delete_program(self.line_program);
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, data: &MeshData) -> Option<GpuMesh> {
    unsafe {
        let vao = gl_object(gl.create_vertex_array(), "vertex array")?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl_object(gl.create_buffer(), "vertex buffer")?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 9 * 4; // 9 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // color: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 3, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl_object(gl.create_buffer(), "index buffer")?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck_cast_slice(&data.indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        Some(GpuMesh {
            vao,
            vbo,
            ibo,
            index_count: data.indices.len() as i32,
        })
    }
}

fn upload_lines(gl: &glow::Context, data: &LineMeshData) -> Option<GpuLines> {
    unsafe {
        let vao = gl_object(gl.create_vertex_array(), "vertex array")?;
        gl.bind_vertex_array(Some(vao));

        let vbo = gl_object(gl.create_buffer(), "line buffer")?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck_cast_slice(&data.vertices),
            glow::STATIC_DRAW,
        );

        let stride = 7 * 4; // 7 floats * 4 bytes
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // color: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 4, glow::FLOAT, false, stride, 3 * 4);

        gl.bind_vertex_array(None);

        Some(GpuLines {
            vao,
            vbo,
            vertex_count: data.vertex_count() as i32,
        })
    }
}

fn delete_mesh(gl: &glow::Context, mesh: GpuMesh) {
    unsafe {
        gl.delete_vertex_array(mesh.vao);
        gl.delete_buffer(mesh.vbo);
        gl.delete_buffer(mesh.ibo);
    }
}

fn delete_lines(gl: &glow::Context, lines: GpuLines) {
    unsafe {
        gl.delete_vertex_array(lines.vao);
        gl.delete_buffer(lines.vbo);
    }
}

/// Log and discard a failed GL object creation
fn gl_object<T>(result: Result<T, String>, what: &str) -> Option<T> {
    result
        .map_err(|e| tracing::error!("Failed to create {what}: {e}"))
        .ok()
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

unsafe fn draw_lines(gl: &glow::Context, lines: &GpuLines) {
    gl.bind_vertex_array(Some(lines.vao));
    gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> Option<glow::Program> {
    unsafe {
        let program = gl_object(gl.create_program(), "shader program")?;

        let vert = gl_object(gl.create_shader(glow::VERTEX_SHADER), "vertex shader")?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl_object(gl.create_shader(glow::FRAGMENT_SHADER), "fragment shader")?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        if !linked {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !linked {
            gl.delete_program(program);
            return None;
        }
        Some(program)
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const MESH_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;

out vec3 v_normal;
out vec3 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = a_normal;
    v_color = a_color;
}
"#;

const MESH_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;

in vec3 v_normal;
in vec3 v_color;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    // Two-sided: STL winding is not always consistent
    float diffuse = abs(dot(n, u_light_dir));
    float ambient = 0.3;
    float light = ambient + diffuse * 0.7;
    frag_color = vec4(v_color * light, 1.0);
}
"#;

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec4 a_color;

out vec4 v_color;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_color = a_color;
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
in vec4 v_color;
out vec4 frag_color;

void main() {
    frag_color = v_color;
}
"#;
