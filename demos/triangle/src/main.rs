// trigl
// copyright zipxing@hotmail.com 2022~2024

//! Host loop for the trigl renderer: winit window, glutin GL 3.3 core
//! context, one static triangle redrawn every frame. Escape closes the
//! window; resizes track the framebuffer into the viewport.

use glow::HasContext;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext,
        Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::GlSurface,
    surface::{Surface, SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use log::{error, info};
use std::num::NonZeroU32;
use std::sync::Arc;
use trigl::diagnostics::LogSink;
use trigl::log::init_log;
use trigl::GlRenderer;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    raw_window_handle::HasWindowHandle,
    window::{Window, WindowId},
};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const TITLE: &str = "trigl";

const TRIANGLE_VERTICES: [f32; 9] = [
    0.0, 0.5, 0.0, // top
    0.5, -0.5, 0.0, // bottom right
    -0.5, -0.5, 0.0, // bottom left
];

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    gl_context: Option<PossiblyCurrentContext>,
    gl_surface: Option<Surface<WindowSurface>>,
    gl: Option<glow::Context>,
    renderer: GlRenderer,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        info!("Creating OpenGL window and context...");

        let template = ConfigTemplateBuilder::new();
        let display_builder = DisplayBuilder::new().with_window_attributes(Some(
            Window::default_attributes()
                .with_title(TITLE)
                .with_inner_size(LogicalSize::new(WIDTH, HEIGHT)),
        ));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .unwrap();

        let window = Arc::new(window.unwrap());
        let physical_size = window.inner_size();

        let gl_display = gl_config.display();
        let raw_window_handle = window.window_handle().unwrap().as_raw();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));

        let not_current_gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .expect("failed to create context")
        };

        let gl_surface = unsafe {
            let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
                raw_window_handle,
                NonZeroU32::new(physical_size.width).unwrap(),
                NonZeroU32::new(physical_size.height).unwrap(),
            );
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .unwrap()
        };

        let gl_context = not_current_gl_context.make_current(&gl_surface).unwrap();

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                let s = std::ffi::CString::new(s)
                    .expect("failed to construct C string from string for gl proc address");
                gl_display.get_proc_address(&s)
            })
        };

        unsafe {
            gl.viewport(0, 0, physical_size.width as i32, physical_size.height as i32);
        }

        if let Err(e) = self.renderer.init(Box::new(LogSink)) {
            error!("renderer init failed: {}", e);
            event_loop.exit();
            return;
        }
        if let Err(e) = self.renderer.setup(&gl, &TRIANGLE_VERTICES, None) {
            error!("render pipeline setup failed: {}", e);
            event_loop.exit();
            return;
        }

        self.window = Some(window);
        self.gl_context = Some(gl_context);
        self.gl_surface = Some(gl_surface);
        self.gl = Some(gl);

        info!("OpenGL window & context initialized successfully");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key: Key::Named(NamedKey::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) if size.width > 0 && size.height > 0 => {
                if let (Some(surface), Some(context)) = (&self.gl_surface, &self.gl_context) {
                    surface.resize(
                        context,
                        NonZeroU32::new(size.width).unwrap(),
                        NonZeroU32::new(size.height).unwrap(),
                    );
                }
                if let Some(gl) = &self.gl {
                    unsafe {
                        gl.viewport(0, 0, size.width as i32, size.height as i32);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gl) = &self.gl {
                    self.renderer.clear_screen(0.5, 0.5, 0.5, 1.0);
                    self.renderer.render(gl);
                }
                if let (Some(surface), Some(context)) = (&self.gl_surface, &self.gl_context) {
                    if let Err(e) = surface.swap_buffers(context) {
                        error!("failed to swap buffers: {:?}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gl) = &self.gl {
            self.renderer.cleanup(gl);
        }
    }
}

fn main() {
    init_log(log::LevelFilter::Info, "log/triangle.log");

    let event_loop = EventLoop::new().unwrap();
    let mut app = App::default();
    event_loop.run_app(&mut app).unwrap();
}
