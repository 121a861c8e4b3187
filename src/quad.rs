use gl_wrapper::program::ShaderAsset;

pub const WINDOW_WIDTH: u32 = 1640;
pub const WINDOW_HEIGHT: u32 = 1080;
pub const WINDOW_TITLE: &str = "Hello OpenGL";

/// Requested OpenGL version, always with the core profile.
pub const GL_VERSION: (u8, u8) = (3, 3);

/// Viewport used until the first resize event reports the real framebuffer.
pub const INITIAL_VIEWPORT: (u32, u32) = (840, 540);

pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.5, 1.0, 1.0];

#[rustfmt::skip]
pub const VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.0,
    -0.5,  0.5, 0.0,
     0.5, -0.5, 0.0,
     0.5,  0.5, 0.0,
];

#[rustfmt::skip]
pub const INDICES: [u32; 6] = [
    0, 1, 2,
    1, 2, 3,
];

pub const SHADERS: ShaderAsset<'static> = ShaderAsset {
    vertex: include_str!("shaders/quad.vert"),
    fragment: include_str!("shaders/quad.frag"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_two_triangles_over_four_vertices() {
        assert_eq!(VERTICES.len() / 3, 4);
        assert_eq!(INDICES.len(), 6);
        assert!(INDICES.iter().all(|&i| i <= 3));
    }

    #[test]
    fn quad_spans_half_unit_square() {
        let xs = VERTICES.iter().step_by(3);
        let ys = VERTICES.iter().skip(1).step_by(3);

        assert!(xs.chain(ys).all(|c| c.abs() == 0.5));
        assert!(VERTICES.iter().skip(2).step_by(3).all(|&z| z == 0.0));
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let (first, second) = INDICES.split_at(3);
        let shared = first.iter().filter(|i| second.contains(i)).count();

        assert_eq!(shared, 2);
    }

    #[test]
    fn shaders_target_core_330() {
        for src in [SHADERS.vertex, SHADERS.fragment] {
            assert!(src.starts_with("#version 330 core"));
            assert!(!src.contains('\0'));
        }

        assert!(SHADERS.vertex.contains("layout(location = 0) in vec3 position"));
        assert!(SHADERS.fragment.contains("vec4(1.0, 0.5, 0.2, 1.0)"));
    }
}
