//! Shape registry
//!
//! Owns every handler in insertion order and routes ticks, clicks and
//! settings edits to them. All calls run to completion; the host must
//! serialize ticks and clicks onto one thread.

use std::time::{Duration, Instant};

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::factory::ShapeFactory;
use super::handler::ShapeHandler;
use super::negotiation::{SettingsDraft, SettingsEditor, SettingsRequest};
use super::shape::{Color, HandlerId, ShapeKind};
use crate::Extent;
use crate::error::ShapeError;
use crate::platform::{ClickEvent, LogNotifier, MouseButton, Notice, Notifier};
use crate::settings::Settings;

/// Transient click bookkeeping
#[derive(Debug, Clone, Default)]
pub struct ClickState {
    /// Time of the most recent click, matched or not
    pub last_click_at: Option<Instant>,
    /// Handler hit by the most recent matching single click
    pub last_clicked: Option<HandlerId>,
}

/// What a click did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Double-click: the host should open its editor for this request
    SettingsRequested(SettingsRequest),
    /// Double-click with nothing selected
    NoShapeSelected,
    /// Left click toggled kind and colour
    ToggledShape(HandlerId),
    /// Right click started or stopped motion
    ToggledMovement(HandlerId),
    /// Shape hit without a mutation (other button, or the toggle failed)
    Selected(HandlerId),
    /// Nothing under the pointer
    Missed,
}

/// Read-only view of one shape for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeView {
    pub handler: HandlerId,
    pub kind: ShapeKind,
    pub size: f64,
    pub pos: DVec2,
    pub vel: DVec2,
    pub color: Color,
    pub moving: bool,
}

impl From<&ShapeHandler> for ShapeView {
    fn from(handler: &ShapeHandler) -> Self {
        Self {
            handler: handler.id(),
            kind: handler.kind(),
            size: handler.size(),
            pos: handler.position(),
            vel: handler.velocity(),
            color: handler.color(),
            moving: handler.is_moving(),
        }
    }
}

pub struct ShapeRegistry {
    /// Insertion order is iteration order
    handlers: Vec<ShapeHandler>,
    factory: ShapeFactory,
    rng: Pcg32,
    default_size: f64,
    default_velocity: DVec2,
    double_click_window: Duration,
    click: ClickState,
    notifier: Box<dyn Notifier>,
}

impl ShapeRegistry {
    /// Create an empty registry that reports notices to the log
    pub fn new(factory: ShapeFactory, settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Shape registry seeded with {}", seed);

        Self {
            handlers: Vec::new(),
            factory,
            rng: Pcg32::seed_from_u64(seed),
            default_size: settings.default_size,
            default_velocity: settings.default_velocity,
            double_click_window: settings.double_click_window(),
            click: ClickState::default(),
            notifier: Box::new(LogNotifier),
        }
    }

    /// Route notices to `notifier` instead of the log
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn handlers(&self) -> &[ShapeHandler] {
        &self.handlers
    }

    pub fn handler(&self, id: HandlerId) -> Option<&ShapeHandler> {
        self.handlers.iter().find(|h| h.id() == id)
    }

    pub fn last_clicked(&self) -> Option<HandlerId> {
        self.click.last_clicked
    }

    fn index_of(&self, id: HandlerId) -> Option<usize> {
        self.handlers.iter().position(|h| h.id() == id)
    }

    /// Log a swallowed failure and pass it to the notifier
    fn report(&mut self, context: &str, err: &ShapeError) {
        log::error!("{} failed: {}", context, err);
        self.notifier.notify(Notice::Error {
            context: context.to_string(),
            message: err.to_string(),
        });
    }

    /// Create a shape through the factory and append its handler
    pub fn add_shape(
        &mut self,
        kind: ShapeKind,
        size: f64,
        vel: DVec2,
        pos: DVec2,
    ) -> Result<HandlerId, ShapeError> {
        let handler = self
            .factory
            .create_shape(kind, size, vel.x, vel.y, pos.x, pos.y)?;
        let id = handler.id();
        self.handlers.push(handler);
        Ok(id)
    }

    /// Spawn the stationary starting rectangle, centred on the surface
    pub fn add_initial_shape(&mut self, bounds: Extent) -> Option<HandlerId> {
        let size = self.default_size;
        let pos = DVec2::new((bounds.width - size) / 2.0, (bounds.height - size) / 2.0);

        match self.add_shape(ShapeKind::Rectangle, size, DVec2::ZERO, pos) {
            Ok(id) => {
                log::info!("Initial shape {} at ({}, {})", id, pos.x, pos.y);
                Some(id)
            }
            Err(err) => {
                self.report("add_initial_shape", &err);
                None
            }
        }
    }

    /// Spawn a moving shape of random kind at a random position on the surface
    pub fn add_random_shape(&mut self, bounds: Extent) -> Option<HandlerId> {
        let size = self.default_size;
        let left = self.rng.random::<f64>() * (bounds.width - size);
        let top = self.rng.random::<f64>() * (bounds.height - size);
        let kind = if self.rng.random_bool(0.5) {
            ShapeKind::Circle
        } else {
            ShapeKind::Rectangle
        };

        match self.add_shape(kind, size, self.default_velocity, DVec2::new(left, top)) {
            Ok(id) => {
                if let Some(handler) = self.handlers.last_mut() {
                    handler.toggle_movement();
                }
                log::info!("Random {} {} at ({:.1}, {:.1})", kind.as_str(), id, left, top);
                Some(id)
            }
            Err(err) => {
                self.report("add_random_shape", &err);
                None
            }
        }
    }

    /// Drop a handler and take its shape off the surface
    pub fn remove_shape(&mut self, id: HandlerId) -> Result<(), ShapeError> {
        let index = self.index_of(id).ok_or(ShapeError::UnknownHandler(id))?;
        let handler = self.handlers.remove(index);
        if let Err(err) = handler.detach() {
            self.report("remove_shape", &err);
        }
        if self.click.last_clicked == Some(id) {
            self.click.last_clicked = None;
        }
        log::info!("Removed shape {}", id);
        Ok(())
    }

    /// One tick: move every handler, in insertion order
    pub fn move_shapes(&mut self, bounds: Extent) {
        for handler in &mut self.handlers {
            handler.move_within(bounds);
        }
    }

    /// Route a click.
    ///
    /// A click within the double-click window of the previous one (matched
    /// or not) requests settings for the last clicked shape and skips
    /// hit-testing. Otherwise the first shape under the pointer becomes the
    /// last clicked one: left toggles kind/colour, right toggles motion.
    pub fn handle_canvas_click(&mut self, click: ClickEvent) -> ClickOutcome {
        if self.is_double_click(click.at) {
            return match self.open_settings() {
                Some(request) => ClickOutcome::SettingsRequested(request),
                None => ClickOutcome::NoShapeSelected,
            };
        }

        let Some(index) = self
            .handlers
            .iter()
            .position(|h| h.is_clicked(click.position))
        else {
            return ClickOutcome::Missed;
        };

        let id = self.handlers[index].id();
        self.click.last_clicked = Some(id);

        match click.button {
            MouseButton::Left => match self.handlers[index].toggle_shape_and_color() {
                Ok(()) => ClickOutcome::ToggledShape(id),
                Err(err) => {
                    self.report("toggle_shape_and_color", &err);
                    ClickOutcome::Selected(id)
                }
            },
            MouseButton::Right => {
                self.handlers[index].toggle_movement();
                ClickOutcome::ToggledMovement(id)
            }
            MouseButton::Other => ClickOutcome::Selected(id),
        }
    }

    /// Record the click time and say whether it completes a double-click
    fn is_double_click(&mut self, at: Instant) -> bool {
        let double = self
            .click
            .last_click_at
            .is_some_and(|last| at.saturating_duration_since(last) < self.double_click_window);
        self.click.last_click_at = Some(at);
        double
    }

    /// Settings request for the last clicked shape, seeded with its size and speed
    pub fn open_settings(&mut self) -> Option<SettingsRequest> {
        let Some(id) = self.click.last_clicked else {
            log::warn!("Settings requested with no shape selected");
            self.notifier.notify(Notice::NoShapeSelected);
            return None;
        };

        let Some(draft) = self
            .handler(id)
            .map(|h| SettingsDraft::new(h.size(), h.speed()))
        else {
            self.click.last_clicked = None;
            self.report("open_settings", &ShapeError::UnknownHandler(id));
            return None;
        };

        Some(SettingsRequest { handler: id, draft })
    }

    /// Apply a confirmed edit to the handler it was opened for
    pub fn commit_settings(&mut self, request: SettingsRequest) -> Result<(), ShapeError> {
        let index = self
            .index_of(request.handler)
            .ok_or(ShapeError::UnknownHandler(request.handler))?;
        let draft = request.draft;
        self.handlers[index].update(draft.size(), draft.speed());
        log::debug!(
            "Handler {} updated: size {}, speed {}",
            request.handler,
            draft.size(),
            draft.speed()
        );
        Ok(())
    }

    /// Full round trip through a host editor. Returns true if an edit was applied.
    pub fn negotiate_settings(&mut self, editor: &mut dyn SettingsEditor) -> bool {
        let Some(request) = self.open_settings() else {
            return false;
        };
        let Some(draft) = editor.edit(request.draft) else {
            log::debug!("Settings edit for {} cancelled", request.handler);
            return false;
        };

        match self.commit_settings(SettingsRequest { draft, ..request }) {
            Ok(()) => true,
            Err(err) => {
                self.report("commit_settings", &err);
                false
            }
        }
    }

    pub fn snapshot(&self) -> Vec<ShapeView> {
        self.handlers.iter().map(ShapeView::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{Canvas, SharedSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    const BOUNDS: Extent = Extent::new(400.0, 300.0);

    struct Fixture {
        registry: ShapeRegistry,
        canvas: Rc<RefCell<Canvas>>,
        notices: Rc<RefCell<Vec<Notice>>>,
    }

    fn fixture_with(canvas: Canvas) -> Fixture {
        let canvas = canvas.shared();
        let surface: SharedSurface = canvas.clone();
        let settings = Settings {
            seed: Some(12345),
            ..Settings::default()
        };
        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = notices.clone();
        let registry = ShapeRegistry::new(ShapeFactory::from_settings(surface, &settings), &settings)
            .with_notifier(move |notice: Notice| sink.borrow_mut().push(notice));
        Fixture {
            registry,
            canvas,
            notices,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Canvas::new())
    }

    fn click(x: f64, y: f64, button: MouseButton, at: Instant) -> ClickEvent {
        ClickEvent::new(x, y, button, at)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_add_initial_shape() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();

        assert_eq!(f.registry.len(), 1);
        let h = f.registry.handler(id).unwrap();
        assert_eq!(h.kind(), ShapeKind::Rectangle);
        assert_eq!(h.size(), 50.0);
        assert_eq!(h.position(), DVec2::new(175.0, 125.0));
        assert_eq!(h.velocity(), DVec2::ZERO);
        assert!(!h.is_moving());
        assert_eq!(f.canvas.borrow().len(), 1);
    }

    #[test]
    fn test_add_random_shape_is_moving_and_in_bounds() {
        let mut f = fixture();
        for _ in 0..50 {
            let id = f.registry.add_random_shape(BOUNDS).unwrap();
            let h = f.registry.handler(id).unwrap();
            assert!(h.is_moving());
            assert_eq!(h.velocity(), DVec2::new(5.0, 5.0));
            assert_eq!(h.size(), 50.0);
            let pos = h.position();
            assert!((0.0..=350.0).contains(&pos.x));
            assert!((0.0..=250.0).contains(&pos.y));
        }
        let kinds: Vec<ShapeKind> = f.registry.handlers().iter().map(|h| h.kind()).collect();
        assert!(kinds.contains(&ShapeKind::Circle));
        assert!(kinds.contains(&ShapeKind::Rectangle));
    }

    #[test]
    fn test_random_spawns_are_reproducible_with_seed() {
        let mut a = fixture();
        let mut b = fixture();
        for _ in 0..10 {
            a.registry.add_random_shape(BOUNDS);
            b.registry.add_random_shape(BOUNDS);
        }
        assert_eq!(a.registry.snapshot(), b.registry.snapshot());
    }

    #[test]
    fn test_spawn_failure_is_reported_not_fatal() {
        let mut f = fixture_with(Canvas::with_capacity(1));
        assert!(f.registry.add_initial_shape(BOUNDS).is_some());
        assert!(f.registry.add_random_shape(BOUNDS).is_none());
        assert_eq!(f.registry.len(), 1);

        let notices = f.notices.borrow();
        assert_eq!(notices.len(), 1);
        assert!(matches!(
            &notices[0],
            Notice::Error { context, .. } if context == "add_random_shape"
        ));
    }

    #[test]
    fn test_move_shapes_moves_only_moving_handlers() {
        let mut f = fixture();
        let still = f.registry.add_initial_shape(BOUNDS).unwrap();
        let moving = f.registry.add_random_shape(BOUNDS).unwrap();
        let before = f.registry.handler(moving).unwrap().position();

        f.registry.move_shapes(BOUNDS);

        assert_eq!(
            f.registry.handler(still).unwrap().position(),
            DVec2::new(175.0, 125.0)
        );
        assert_ne!(f.registry.handler(moving).unwrap().position(), before);
    }

    #[test]
    fn test_left_click_toggles_shape() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let t0 = Instant::now();

        let outcome = f
            .registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, t0));
        assert_eq!(outcome, ClickOutcome::ToggledShape(id));
        assert_eq!(f.registry.last_clicked(), Some(id));

        let h = f.registry.handler(id).unwrap();
        assert_eq!(h.kind(), ShapeKind::Circle);
        assert_eq!(h.color(), Color::Red);
        assert_eq!(f.canvas.borrow().children(), &[h.shape().id]);
    }

    #[test]
    fn test_right_click_toggles_movement() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let outcome = f
            .registry
            .handle_canvas_click(click(175.0, 125.0, MouseButton::Right, Instant::now()));
        assert_eq!(outcome, ClickOutcome::ToggledMovement(id));
        let h = f.registry.handler(id).unwrap();
        assert!(h.is_moving());
        assert_eq!(h.velocity(), DVec2::new(5.0, 5.0));
    }

    #[test]
    fn test_other_button_only_selects() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let outcome = f
            .registry
            .handle_canvas_click(click(225.0, 175.0, MouseButton::Other, Instant::now()));
        assert_eq!(outcome, ClickOutcome::Selected(id));
        assert_eq!(f.registry.last_clicked(), Some(id));
        let h = f.registry.handler(id).unwrap();
        assert_eq!(h.kind(), ShapeKind::Rectangle);
        assert!(!h.is_moving());
    }

    #[test]
    fn test_miss_keeps_last_clicked() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let t0 = Instant::now();
        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, t0));
        let outcome = f
            .registry
            .handle_canvas_click(click(5.0, 5.0, MouseButton::Left, t0 + ms(1000)));
        assert_eq!(outcome, ClickOutcome::Missed);
        assert_eq!(f.registry.last_clicked(), Some(id));
    }

    #[test]
    fn test_first_inserted_shape_wins_overlap() {
        let mut f = fixture();
        let first = f.registry.add_initial_shape(BOUNDS).unwrap();
        let second = f.registry.add_initial_shape(BOUNDS).unwrap();
        let outcome = f
            .registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, Instant::now()));
        assert_eq!(outcome, ClickOutcome::ToggledShape(first));
        assert_eq!(
            f.registry.handler(second).unwrap().kind(),
            ShapeKind::Rectangle
        );
    }

    #[test]
    fn test_double_click_requests_settings_without_toggling() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let t0 = Instant::now();

        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, t0));
        let outcome = f
            .registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, t0 + ms(299)));

        assert_eq!(
            outcome,
            ClickOutcome::SettingsRequested(SettingsRequest {
                handler: id,
                draft: SettingsDraft::new(50.0, 0.0),
            })
        );
        // only the first click toggled
        assert_eq!(f.registry.handler(id).unwrap().kind(), ShapeKind::Circle);
    }

    #[test]
    fn test_slow_clicks_are_independent() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let t0 = Instant::now();

        let first = f
            .registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, t0));
        let second = f
            .registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, t0 + ms(301)));

        assert_eq!(first, ClickOutcome::ToggledShape(id));
        assert_eq!(second, ClickOutcome::ToggledShape(id));
        let h = f.registry.handler(id).unwrap();
        assert_eq!(h.kind(), ShapeKind::Rectangle);
        assert_eq!(h.color(), Color::Green);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let t0 = Instant::now();
        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, t0));
        let outcome = f
            .registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, t0 + ms(300)));
        assert_eq!(outcome, ClickOutcome::Selected(id));
    }

    #[test]
    fn test_empty_click_arms_double_click() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let t0 = Instant::now();

        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, t0));
        f.registry
            .handle_canvas_click(click(5.0, 5.0, MouseButton::Left, t0 + ms(1000)));
        let outcome = f
            .registry
            .handle_canvas_click(click(390.0, 290.0, MouseButton::Left, t0 + ms(1100)));

        assert!(matches!(
            outcome,
            ClickOutcome::SettingsRequested(SettingsRequest { handler, .. }) if handler == id
        ));
    }

    #[test]
    fn test_double_click_without_selection() {
        let mut f = fixture();
        f.registry.add_initial_shape(BOUNDS);
        let t0 = Instant::now();

        f.registry
            .handle_canvas_click(click(5.0, 5.0, MouseButton::Left, t0));
        let outcome = f
            .registry
            .handle_canvas_click(click(5.0, 5.0, MouseButton::Left, t0 + ms(100)));

        assert_eq!(outcome, ClickOutcome::NoShapeSelected);
        assert_eq!(*f.notices.borrow(), vec![Notice::NoShapeSelected]);
    }

    #[test]
    fn test_failed_toggle_is_reported_and_simulation_continues() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        let mover = f.registry.add_random_shape(BOUNDS).unwrap();
        let before = f.registry.handler(mover).unwrap().position();

        let outcome = {
            // host is mid-render: the surface is borrowed
            let _guard = f.canvas.borrow();
            f.registry
                .handle_canvas_click(click(200.0, 150.0, MouseButton::Left, Instant::now()))
        };

        assert_eq!(outcome, ClickOutcome::Selected(id));
        assert_eq!(f.registry.handler(id).unwrap().kind(), ShapeKind::Rectangle);
        assert_eq!(f.notices.borrow().len(), 1);

        f.registry.move_shapes(BOUNDS);
        assert_ne!(f.registry.handler(mover).unwrap().position(), before);
    }

    #[test]
    fn test_commit_settings_updates_handler() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, Instant::now()));

        let mut request = f.registry.open_settings().unwrap();
        assert!(request.draft.set_size(80.0));
        assert!(!request.draft.set_speed(-3.0));
        assert!(request.draft.set_speed(4.0));
        f.registry.commit_settings(request).unwrap();

        let h = f.registry.handler(id).unwrap();
        assert_eq!(h.size(), 80.0);
        assert_eq!(h.velocity(), DVec2::new(4.0, 4.0));
    }

    #[test]
    fn test_commit_for_removed_shape_fails() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, Instant::now()));
        let request = f.registry.open_settings().unwrap();

        f.registry.remove_shape(id).unwrap();
        assert_eq!(f.registry.last_clicked(), None);
        assert!(f.canvas.borrow().is_empty());
        assert_eq!(
            f.registry.commit_settings(request),
            Err(ShapeError::UnknownHandler(id))
        );
        assert_eq!(
            f.registry.remove_shape(id),
            Err(ShapeError::UnknownHandler(id))
        );
    }

    #[test]
    fn test_negotiate_settings_confirm_and_cancel() {
        let mut f = fixture();
        let id = f.registry.add_initial_shape(BOUNDS).unwrap();
        f.registry
            .handle_canvas_click(click(200.0, 150.0, MouseButton::Other, Instant::now()));

        let mut cancel = |_: SettingsDraft| -> Option<SettingsDraft> { None };
        assert!(!f.registry.negotiate_settings(&mut cancel));
        assert_eq!(f.registry.handler(id).unwrap().size(), 50.0);

        let mut confirm = |mut draft: SettingsDraft| -> Option<SettingsDraft> {
            draft.set_size(120.0);
            draft.set_speed(0.0);
            draft.set_size(-1.0);
            Some(draft)
        };
        assert!(f.registry.negotiate_settings(&mut confirm));
        let h = f.registry.handler(id).unwrap();
        assert_eq!(h.size(), 120.0);
        assert_eq!(h.velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_negotiate_without_selection_reports() {
        let mut f = fixture();
        let mut editor = |draft: SettingsDraft| -> Option<SettingsDraft> { Some(draft) };
        assert!(!f.registry.negotiate_settings(&mut editor));
        assert_eq!(*f.notices.borrow(), vec![Notice::NoShapeSelected]);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut f = fixture();
        f.registry.add_initial_shape(BOUNDS);
        let json = serde_json::to_string(&f.registry.snapshot()).unwrap();
        assert!(json.contains("\"kind\":\"Rectangle\""));
        assert!(json.contains("\"color\":\"Blue\""));
    }
}
