//! Named registry of screens with at most one active at a time.

use glam::DVec2;

use easel_core::context::ContextState;
use easel_core::error::EaselError;
use easel_core::host::{Host, Surface};

use crate::screen::CanvasScreen;

/// A registry of [`CanvasScreen`]s identified by unique names.
///
/// At most one screen is active; switching performs exactly one
/// deactivate/activate transition pair. Draw and input calls forward to the
/// active screen, and every screen's export queue is pumped each frame
/// whether it is active or not.
#[derive(Debug, Default)]
pub struct ScreenHandler {
    screens: Vec<CanvasScreen>,
    active: Option<usize>,
}

impl ScreenHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a screen unless its name is already registered.
    ///
    /// Returns whether the insertion happened; a duplicate name is logged
    /// and the first-registered screen kept.
    pub fn add_screen(&mut self, screen: CanvasScreen) -> bool {
        if self.screens.iter().any(|s| s.name() == screen.name()) {
            log::warn!(
                "screen '{}' already registered; keeping the existing entry",
                screen.name()
            );
            return false;
        }
        self.screens.push(screen);
        true
    }

    /// Makes the named screen active.
    ///
    /// An unregistered name leaves the currently active screen unchanged
    /// (logged, not an error). Otherwise the previous active screen (if any)
    /// is deactivated before the new one activates.
    pub fn set_active_screen(&mut self, name: &str) {
        let Some(index) = self.screens.iter().position(|s| s.name() == name) else {
            log::warn!("screen '{name}' not registered; active screen unchanged");
            return;
        };
        if let Some(previous) = self.active {
            self.screens[previous].deactivate();
        }
        self.screens[index].activate();
        self.active = Some(index);
    }

    pub fn active_screen(&self) -> Option<&CanvasScreen> {
        self.active.map(|i| &self.screens[i])
    }

    pub fn active_screen_mut(&mut self) -> Option<&mut CanvasScreen> {
        self.active.map(|i| &mut self.screens[i])
    }

    pub fn screen(&self, name: &str) -> Result<&CanvasScreen, EaselError> {
        self.screens
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| EaselError::ScreenNotFound(name.to_string()))
    }

    pub fn screen_mut(&mut self, name: &str) -> Result<&mut CanvasScreen, EaselError> {
        self.screens
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| EaselError::ScreenNotFound(name.to_string()))
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.screens.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// One frame: the active screen draws and composites, then every
    /// screen's export queue advances.
    pub fn draw(
        &mut self,
        canvas: &ContextState,
        canvas_surface: &mut Surface,
        host: &mut dyn Host,
    ) {
        if let Some(index) = self.active {
            self.screens[index].draw(canvas, canvas_surface, host);
        }
        for screen in &mut self.screens {
            screen.pump_exports(host);
        }
    }

    /// Forwards a container resize to the active screen.
    pub fn resize(&mut self, window_width: f64, window_height: f64) {
        if let Some(index) = self.active {
            self.screens[index].resized(window_width, window_height);
        }
    }

    pub fn key_pressed(&mut self, key: char) {
        if let Some(index) = self.active {
            self.screens[index].key_pressed(key);
        }
    }

    pub fn mouse_pressed(&mut self, position: DVec2) {
        if let Some(index) = self.active {
            self.screens[index].mouse_pressed(position);
        }
    }

    pub fn mouse_dragged(&mut self, position: DVec2) {
        if let Some(index) = self.active {
            self.screens[index].mouse_dragged(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Sketch;
    use easel_core::context::{GraphicsConfig, GraphicsContext, RenderMode};
    use easel_core::handler::GraphicsContextHandler;
    use easel_core::host::HeadlessHost;
    use easel_core::ratio::AspectRatio;

    struct NullSketch;

    impl Sketch for NullSketch {
        fn draw(&mut self, _gfx: &mut GraphicsContext) {}
    }

    fn screen(host: &mut HeadlessHost, name: &str) -> CanvasScreen {
        let gfx = GraphicsContext::new(host, GraphicsConfig::named("main")).unwrap();
        CanvasScreen::new(name, GraphicsContextHandler::new(gfx), Box::new(NullSketch))
    }

    #[test]
    fn new_handler_is_empty_with_no_active_screen() {
        let handler = ScreenHandler::new();
        assert!(handler.is_empty());
        assert!(handler.active_screen().is_none());
    }

    #[test]
    fn add_screen_registers_by_name() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        assert!(handler.add_screen(screen(&mut host, "intro")));
        assert_eq!(handler.len(), 1);
        assert_eq!(handler.screen("intro").unwrap().name(), "intro");
    }

    #[test]
    fn add_screen_duplicate_name_is_rejected() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        assert!(handler.add_screen(screen(&mut host, "intro")));
        assert!(!handler.add_screen(screen(&mut host, "intro")));
        assert_eq!(handler.len(), 1);
    }

    #[test]
    fn activating_b_deactivates_a() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        handler.add_screen(screen(&mut host, "a"));
        handler.add_screen(screen(&mut host, "b"));

        handler.set_active_screen("a");
        assert!(handler.screen("a").unwrap().is_active());

        handler.set_active_screen("b");
        assert!(!handler.screen("a").unwrap().is_active());
        assert!(handler.screen("b").unwrap().is_active());
        assert_eq!(handler.active_screen().unwrap().name(), "b");
    }

    #[test]
    fn activating_unknown_name_leaves_active_unchanged() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        handler.add_screen(screen(&mut host, "a"));
        handler.set_active_screen("a");

        handler.set_active_screen("ghost");
        assert_eq!(handler.active_screen().unwrap().name(), "a");
        assert!(handler.screen("a").unwrap().is_active());
    }

    #[test]
    fn unknown_screen_lookup_is_an_error() {
        let handler = ScreenHandler::new();
        assert!(matches!(
            handler.screen("nope"),
            Err(EaselError::ScreenNotFound(_))
        ));
    }

    #[test]
    fn draw_composites_only_the_active_screen() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        handler.add_screen(screen(&mut host, "a"));
        handler.add_screen(screen(&mut host, "b"));
        handler.set_active_screen("b");

        let canvas = ContextState::new(
            "canvas",
            RenderMode::Standard,
            AspectRatio::square(),
            500.0,
        );
        let mut surface = Surface::new(500, 500).unwrap();
        handler.draw(&canvas, &mut surface, &mut host);
        assert_eq!(host.blits().len(), 1);
    }

    #[test]
    fn draw_with_no_active_screen_is_a_noop() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        handler.add_screen(screen(&mut host, "a"));

        let canvas = ContextState::new(
            "canvas",
            RenderMode::Standard,
            AspectRatio::square(),
            500.0,
        );
        let mut surface = Surface::new(500, 500).unwrap();
        handler.draw(&canvas, &mut surface, &mut host);
        assert!(host.blits().is_empty());
    }

    #[test]
    fn exports_pump_even_for_inactive_screens() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        handler.add_screen(screen(&mut host, "a"));
        handler.add_screen(screen(&mut host, "b"));
        handler.set_active_screen("b");

        // queue an export on the inactive screen
        let ticket = handler
            .screen_mut("a")
            .unwrap()
            .save_active_graphics(&mut host);

        let canvas = ContextState::new(
            "canvas",
            RenderMode::Standard,
            AspectRatio::square(),
            500.0,
        );
        let mut surface = Surface::new(500, 500).unwrap();
        for _ in 0..4 {
            handler.draw(&canvas, &mut surface, &mut host);
            host.advance(crate::export::EXPORT_DELAY_MS);
        }
        assert!(ticket.try_report().unwrap().succeeded());
        assert_eq!(host.saves().len(), 1);
    }

    #[test]
    fn switching_to_the_same_screen_keeps_it_active() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut handler = ScreenHandler::new();
        handler.add_screen(screen(&mut host, "a"));
        handler.set_active_screen("a");
        handler.set_active_screen("a");
        assert!(handler.screen("a").unwrap().is_active());
    }
}
