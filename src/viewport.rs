use gl_wrapper::renderer::GlRenderer;
use winit::dpi::PhysicalSize;

/// Anything that maps normalized device coordinates onto a framebuffer region.
pub trait Viewport {
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
}

impl Viewport for GlRenderer {
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport(x, y, width, height);
    }
}

///
/// Forwards a framebuffer resize to the viewport.
///
/// Zero sized framebuffers (minimized window) are forwarded as well, only
/// the window surface itself has to skip them.
///
pub fn forward_resize<V: Viewport>(viewport: &mut V, size: PhysicalSize<u32>) {
    log::info!("framebuffer resized to {}x{}", size.width, size.height);
    viewport.set_viewport(0, 0, size.width, size.height);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingViewport {
        rect: Option<(i32, i32, u32, u32)>,
    }

    impl Viewport for RecordingViewport {
        fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
            self.rect = Some((x, y, width, height));
        }
    }

    #[test]
    fn resize_sets_full_viewport() {
        let mut viewport = RecordingViewport::default();

        forward_resize(&mut viewport, PhysicalSize::new(800, 600));
        assert_eq!(viewport.rect, Some((0, 0, 800, 600)));

        forward_resize(&mut viewport, PhysicalSize::new(1920, 1080));
        assert_eq!(viewport.rect, Some((0, 0, 1920, 1080)));
    }

    #[test]
    fn minimized_window_collapses_viewport() {
        let mut viewport = RecordingViewport::default();
        forward_resize(&mut viewport, PhysicalSize::new(640, 480));

        forward_resize(&mut viewport, PhysicalSize::new(0, 480));
        assert_eq!(viewport.rect, Some((0, 0, 0, 480)));

        forward_resize(&mut viewport, PhysicalSize::new(0, 0));
        assert_eq!(viewport.rect, Some((0, 0, 0, 0)));
    }

}
