use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes, WindowLevel};

use crate::config::OverlayConfig;
use crate::coords::Viewport;

/// Fallback when no monitor can be queried.
const FALLBACK_SIZE: (u32, u32) = (1280, 720);

/// Borderless, transparent, always-on-top window.
///
/// Click-through is the resting state; [`input_lock`](Self::input_lock) takes
/// the mouse and focus until [`release_input_lock`](Self::release_input_lock).
pub struct OverlayWindow {
    window: Arc<Window>,
    click_through: bool,
    exit_requested: bool,
}

impl OverlayWindow {
    pub(crate) fn create(event_loop: &ActiveEventLoop, config: &OverlayConfig) -> anyhow::Result<Self> {
        let (width, height) = initial_size(event_loop, config);
        let window = event_loop.create_window(attributes(config, width, height))?;

        let mut overlay = Self {
            window: Arc::new(window),
            click_through: false,
            exit_requested: false,
        };
        overlay.set_click_through(config.click_through);
        overlay.hide_from_capture(config.hide_from_capture);
        Ok(overlay)
    }

    #[inline]
    pub fn handle(&self) -> &Arc<Window> {
        &self.window
    }

    /// Client area in physical pixels.
    pub fn client_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn client_viewport(&self) -> Viewport {
        let (w, h) = self.client_size();
        Viewport::from_size(w, h)
    }

    #[inline]
    pub fn is_click_through(&self) -> bool {
        self.click_through
    }

    /// Excludes the window from screen capture where the platform supports it.
    pub fn hide_from_capture(&self, hide: bool) {
        self.window.set_content_protected(hide);
    }

    /// Makes the overlay take mouse input and focus.
    pub fn input_lock(&mut self) {
        self.set_click_through(false);
        self.window.focus_window();
    }

    /// Returns the overlay to click-through.
    pub fn release_input_lock(&mut self) {
        self.set_click_through(true);
    }

    /// Requests a new client size. The renderer follows on the resulting
    /// resize event.
    pub fn change_window_size(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let _ = self.window.request_inner_size(PhysicalSize::new(width, height));
    }

    /// Asks the runtime to leave the event loop after the current frame.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    #[inline]
    pub(crate) fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn set_click_through(&mut self, enabled: bool) {
        match self.window.set_cursor_hittest(!enabled) {
            Ok(()) => self.click_through = enabled,
            Err(e) => log::warn!("window: cannot change click-through: {e}"),
        }
    }
}

fn attributes(config: &OverlayConfig, width: u32, height: u32) -> WindowAttributes {
    Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(width, height))
        .with_decorations(false)
        .with_transparent(true)
        .with_resizable(true)
        .with_window_level(WindowLevel::AlwaysOnTop)
}

fn initial_size(event_loop: &ActiveEventLoop, config: &OverlayConfig) -> (u32, u32) {
    if config.width > 0 && config.height > 0 {
        return (config.width, config.height);
    }
    let monitor = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next());
    match monitor {
        Some(m) => half_of(m.size().width, m.size().height),
        None => FALLBACK_SIZE,
    }
}

fn half_of(width: u32, height: u32) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_monitor_never_zero() {
        assert_eq!(half_of(1920, 1080), (960, 540));
        assert_eq!(half_of(1, 1), (1, 1));
    }
}
