use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{Display, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, StartCause, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;

use hello_quad::frame::{FrameLoop, FrameTarget, LoopControl};
use hello_quad::quad::{
    CLEAR_COLOR, GL_VERSION, INDICES, INITIAL_VIEWPORT, SHADERS, VERTICES, WINDOW_HEIGHT,
    WINDOW_TITLE, WINDOW_WIDTH,
};
use hello_quad::viewport::{forward_resize, Viewport};

use crate::args::Args;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    args: Args,
}

impl App {
    pub fn new(args: Args) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT)))
            .with_title(WINDOW_TITLE);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        // an empty config list is already reported as an error by glutin
        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| {
                configs.next().expect("display offered no GL configs")
            })
            .map_err(|e| AppError::WindowCreation(e.to_string()))?;

        let window = window
            .ok_or_else(|| AppError::WindowCreation("display did not create a window".into()))?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let (major, minor) = GL_VERSION;
        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .map_err(AppError::Context)?
            .make_current(&gl_window.surface)
            .map_err(AppError::Context)?;

        load_gl(&gl_display)?;

        log::info!("created OpenGL {major}.{minor} core context");

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            args,
        })
    }

    pub fn run(mut self) -> Result<(), AppError> {
        let quad = GeometryBuilder::new(&VERTICES)
            .with_attribute(VertexAttribute::Vec3)
            .with_indices(&INDICES)
            .build()?;

        let outcome = ProgramBuilder::new(SHADERS).build()?;
        let program = if self.args.strict {
            outcome.into_result()?
        } else {
            let (program, diagnostics) = outcome.into_parts();
            for diagnostic in &diagnostics {
                log::error!("{diagnostic}");
            }
            program
        };

        let mut renderer = GlRenderer::new();
        let (width, height) = INITIAL_VIEWPORT;
        renderer.set_viewport(0, 0, width, height);
        renderer.set_polygon_mode(self.args.polygon_mode());

        let [r, g, b, a] = CLEAR_COLOR;
        renderer.set_clear_color(r, g, b, a);

        let mut frame_loop = FrameLoop::new(self.args.frames);
        let mut failure = None;

        let gl_context = &self.gl_context;
        let gl_window = &self.gl_window;

        self.event_loop
            .run_return(|event, _window_target, control_flow| match event {
                Event::NewEvents(StartCause::Init) => {
                    *control_flow = ControlFlow::Poll;
                }
                Event::MainEventsCleared => {
                    let mut target = QuadFrame {
                        renderer: &mut renderer,
                        geometry: &quad,
                        program: &program,
                        gl_window,
                        gl_context,
                    };

                    match frame_loop.run_frame(&mut target) {
                        Ok(LoopControl::Continue) => {}
                        Ok(LoopControl::Exit) => control_flow.set_exit(),
                        Err(e) => {
                            failure = Some(AppError::Present(e));
                            control_flow.set_exit();
                        }
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        forward_resize(&mut renderer, size);
                        gl_window.resize(gl_context, size);
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if let Some(key) = input.virtual_keycode {
                            frame_loop.key_input(key, input.state);
                        }
                    }
                    WindowEvent::CloseRequested => frame_loop.request_close(),
                    _ => (),
                },
                _ => (),
            });

        log::info!("frame loop finished after {} frames", frame_loop.frames());

        // GPU objects go first, the context is still current here
        drop(program);
        drop(quad);

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct QuadFrame<'a> {
    renderer: &'a mut GlRenderer,
    geometry: &'a Geometry,
    program: &'a Program,
    gl_window: &'a GlWindow,
    gl_context: &'a PossiblyCurrentContext,
}

impl FrameTarget for QuadFrame<'_> {
    type Error = glutin::error::Error;

    fn clear(&mut self) {
        self.renderer.clear();
    }

    fn draw(&mut self) {
        self.renderer.draw(self.geometry, self.program);
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.gl_window.surface.swap_buffers(self.gl_context)
    }
}

fn load_gl(display: &Display) -> Result<(), AppError> {
    gl::load_with(|symbol| match CString::new(symbol) {
        Ok(symbol) => display.get_proc_address(symbol.as_c_str()),
        Err(_) => std::ptr::null(),
    });

    let loaded = gl::Viewport::is_loaded()
        && gl::Clear::is_loaded()
        && gl::GenVertexArrays::is_loaded()
        && gl::CreateProgram::is_loaded()
        && gl::DrawElements::is_loaded();

    if loaded {
        Ok(())
    } else {
        Err(AppError::GlLoad)
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let (Some(nz_width), Some(nz_height)) = (NonZeroU32::new(width), NonZeroU32::new(height))
        else {
            return Err(AppError::WindowCreation(format!(
                "window has no area ({width}x{height})"
            )));
        };

        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            nz_width,
            nz_height,
        );

        let surface = unsafe {
            config
                .display()
                .create_window_surface(config, &attrs)
                .map_err(AppError::Context)?
        };

        Ok(Self { window, surface })
    }

    pub fn resize(&self, context: &PossiblyCurrentContext, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            self.surface.resize(context, width, height);
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Fail to create an OpenGL window: {0}")]
    WindowCreation(String),
    #[error("Fail to create an OpenGL context: {0}")]
    Context(glutin::error::Error),
    #[error("Fail to load OpenGL function pointers")]
    GlLoad,
    #[error("Could not upload geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("Could not build shader program: {0}")]
    Program(#[from] PBError),
    #[error("Could not present frame: {0}")]
    Present(glutin::error::Error),
}
