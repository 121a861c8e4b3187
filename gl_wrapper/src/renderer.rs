use crate::geometry::Geometry;
use crate::program::Program;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn draw(&mut self, geometry: &Geometry, program: &Program) {
        unsafe {
            gl::BindVertexArray(geometry.vao());
        }

        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }

        unsafe {
            if geometry.is_indexed() {
                gl::DrawElements(
                    gl::TRIANGLES,
                    geometry.elements() as i32,
                    gl::UNSIGNED_INT,
                    std::ptr::null(),
                );
            } else {
                gl::DrawArrays(gl::TRIANGLES, 0, geometry.elements() as i32);
            }

            gl::BindVertexArray(0);
        }
    }

    pub fn viewport(&self, x: i32, y: i32, width: u32, height: u32) {
        unsafe {
            gl::Viewport(x, y, width as i32, height as i32);
        }
    }

    pub fn set_clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            gl::ClearColor(r, g, b, a);
        }
    }

    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    pub fn set_polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
        };

        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, mode);
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
