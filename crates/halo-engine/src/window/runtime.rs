use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::audio;
use crate::backend::gpu::GpuBackend;
use crate::config::OverlayConfig;
use crate::core::{AppControl, FrameCtx, OverlayApp};
use crate::input::{InputEvent, InputState};
use crate::renderer::{Renderer, RendererState};
use crate::time::FrameClock;

use super::overlay::OverlayWindow;
use super::translate::translate;

/// Entry point: creates the overlay window, initializes the renderer and
/// redraws continuously until the window closes or the app exits.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: OverlayConfig, app: A) -> Result<()>
    where
        A: OverlayApp + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct Overlay {
    window: OverlayWindow,
    renderer: Renderer<GpuBackend>,
    input: InputState,
    clock: FrameClock,
}

struct AppState<A: OverlayApp> {
    config: OverlayConfig,
    app: A,
    overlay: Option<Overlay>,
    events: Vec<InputEvent>,
    init_error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A: OverlayApp> AppState<A> {
    fn new(config: OverlayConfig, app: A) -> Self {
        Self {
            config,
            app,
            overlay: None,
            events: Vec::new(),
            init_error: None,
            exit_requested: false,
        }
    }

    fn create_overlay(&mut self, event_loop: &ActiveEventLoop) -> Result<Overlay> {
        let window = OverlayWindow::create(event_loop, &self.config)
            .context("failed to create overlay window")?;

        let backend = GpuBackend::new(window.handle().clone());
        let mut renderer = Renderer::new(backend, &self.config, audio::default_sink());

        let (w, h) = window.client_size();
        renderer
            .initialize(w, h)
            .context("renderer initialization failed")?;

        log::info!("overlay ready at {w}x{h}");
        Ok(Overlay {
            window,
            renderer,
            input: InputState::new(),
            clock: FrameClock::new(),
        })
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };

        // A failed rebuild leaves the surface lost; retry at the current size.
        if overlay.renderer.state() == RendererState::Lost {
            let (w, h) = overlay.window.client_size();
            if overlay.renderer.on_window_resize(w, h).is_ok() {
                overlay.clock.reset();
            }
        }

        let time = overlay.clock.tick();
        overlay.renderer.begin();

        let control = {
            let mut ctx = FrameCtx {
                renderer: &mut overlay.renderer,
                window: &mut overlay.window,
                input: &mut overlay.input,
                time,
            };
            self.app.on_frame(&mut ctx)
        };

        overlay.renderer.end();
        overlay.input.end_frame();
        overlay.window.handle().request_redraw();

        if control == AppControl::Exit || overlay.window.exit_requested() {
            self.request_exit(event_loop);
        }
    }
}

impl<A: OverlayApp> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.overlay.is_some() {
            return;
        }

        match self.create_overlay(event_loop) {
            Ok(mut overlay) => {
                self.app.on_start(&mut overlay.renderer);
                overlay.window.handle().request_redraw();
                self.overlay = Some(overlay);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.init_error = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(overlay) = &self.overlay {
            overlay.window.handle().request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(overlay) = self.overlay.as_mut() {
            translate(&event, &mut self.events);
            for ev in self.events.drain(..) {
                overlay.input.apply_event(ev);
            }
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(size) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    if let Err(e) = overlay.renderer.on_window_resize(size.width, size.height) {
                        log::warn!("resize to {}x{} failed: {e}", size.width, size.height);
                    }
                    if overlay.input.is_captured() {
                        overlay.input.set_capture(Some(overlay.window.client_viewport()));
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.renderer.clear_all_textures();
        }
    }
}
