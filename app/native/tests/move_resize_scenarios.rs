//! End-to-end scenarios for the window geometry core.
//!
//! Each test builds a screen layout and windows through the public API and
//! drives them the way a window manager would: pointer motion, keyboard
//! shortcuts and timer dispatch against a manual clock.

use std::sync::Arc;
use std::time::Duration;

use casement_lib::config::{CasementConfig, WindowRule};
use casement_lib::window::{
    ClientCapabilities, Clock, CursorShape, Environment, ForceGeometry, Layer, ManualClock, Margins,
    MoveResizeRequest, MoveResizeState, Point, Position, QuickTileMode, Rect, Screen, Screens,
    Size, SizeHints, Window, WindowEvent, WindowId, WindowIdentity, WindowKind, WindowTable,
};
use parking_lot::Mutex;

// ============================================================================
// Helpers
// ============================================================================

const SCREEN: Rect = Rect::new(0, 0, 1920, 1080);

fn setup(config: CasementConfig) -> (Environment, Arc<ManualClock>, Arc<Screens>) {
    let clock = ManualClock::new();
    let screens = Arc::new(Screens::new(
        vec![Screen::new(0, "main".to_string(), SCREEN)],
        config.desktops.count,
    ));
    let env = Environment::new(screens.clone(), clock.clone(), Arc::new(config));
    (env, clock, screens)
}

fn client(env: &Environment, id: u32, caps: ClientCapabilities, frame: Rect) -> Window {
    Window::new(
        WindowId(id),
        WindowIdentity::new("org.example.Editor", format!("window {id}")),
        Box::new(caps),
        frame,
        env,
    )
}

fn record(window: &mut Window) -> Arc<Mutex<Vec<WindowEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    window.subscribe(Box::new(move |event| sink.lock().push(event.clone())));
    events
}

fn names(events: &[WindowEvent]) -> Vec<&'static str> { events.iter().map(WindowEvent::name).collect() }

// ============================================================================
// Quick tiling
// ============================================================================

#[test]
fn test_quick_tile_left_and_back() {
    let (env, _, _) = setup(CasementConfig::default());
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));

    assert!(window.set_quick_tile_mode(QuickTileMode::LEFT, false));
    assert_eq!(window.frame_geometry(), Rect::new(0, 0, 960, 1080));

    assert!(window.set_quick_tile_mode(QuickTileMode::NONE, false));
    assert_eq!(window.frame_geometry(), Rect::new(400, 300, 800, 600));
    assert_eq!(window.quick_tile_mode(), QuickTileMode::NONE);
}

#[test]
fn test_keyboard_tiling_combines_and_toggles() {
    let (env, _, _) = setup(CasementConfig::default());
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));

    window.set_quick_tile_mode(QuickTileMode::LEFT, true);
    window.set_quick_tile_mode(QuickTileMode::TOP, true);
    assert_eq!(window.quick_tile_mode(), QuickTileMode::LEFT | QuickTileMode::TOP);
    assert_eq!(window.frame_geometry(), Rect::new(0, 0, 960, 540));

    // Same request again untiles
    window.set_quick_tile_mode(QuickTileMode::TOP, true);
    assert_eq!(window.quick_tile_mode(), QuickTileMode::NONE);
    assert_eq!(window.frame_geometry(), Rect::new(400, 300, 800, 600));
}

#[test]
fn test_tiling_respects_struts() {
    let config = CasementConfig::default();
    let clock = ManualClock::new();
    let screens = Screens::new(
        vec![Screen::new(0, "main".to_string(), SCREEN).with_strut(None, Margins::new(0, 0, 32, 0))],
        4,
    );
    let env = Environment::new(Arc::new(screens), clock, Arc::new(config));
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));

    window.set_quick_tile_mode(QuickTileMode::MAXIMIZE, false);
    assert_eq!(window.frame_geometry(), Rect::new(0, 32, 1920, 1048));
}

// ============================================================================
// Interactive resize
// ============================================================================

#[test]
fn test_bottom_right_resize_with_min_size() {
    let (env, _, _) = setup(CasementConfig::default());
    let caps = ClientCapabilities {
        hints: SizeHints { min: Size::new(100, 100), ..Default::default() },
        ..Default::default()
    };
    let mut window = client(&env, 1, caps, Rect::new(100, 100, 200, 200));
    let events = record(&mut window);

    assert!(window.start_move_resize(
        MoveResizeRequest::at(Point::new(300, 300)).with_position(Position::BottomRight)
    ));
    window.handle_move_resize(Point::new(350, 360));
    assert_eq!(window.buffer_geometry().size(), Size::new(250, 260));

    window.handle_move_resize(Point::new(-700, -700));
    assert_eq!(window.buffer_geometry().size(), Size::new(100, 100));

    assert!(window.finish_move_resize(false));
    assert!(!window.finish_move_resize(false));

    let events = events.lock();
    assert_eq!(names(&events).first(), Some(&"move-resize-started"));
    assert_eq!(names(&events).iter().filter(|name| **name == "move-resize-finished").count(), 1);
    assert_eq!(
        events.last(),
        Some(&WindowEvent::CursorChanged { cursor: CursorShape::Arrow })
    );
}

#[test]
fn test_decorated_resize_constrains_client_size() {
    let (env, _, _) = setup(CasementConfig::default());
    let caps = ClientCapabilities {
        hints: SizeHints {
            min: Size::new(100, 50),
            max: Some(Size::new(400, 300)),
            increments: Size::new(10, 10),
        },
        borders: Margins::new(4, 4, 24, 4),
        ..Default::default()
    };
    let mut window = client(&env, 1, caps, Rect::new(0, 0, 208, 128));
    assert_eq!(window.buffer_geometry().size(), Size::new(200, 100));

    window.start_move_resize(
        MoveResizeRequest::at(Point::new(207, 127)).with_position(Position::BottomRight),
    );
    window.handle_move_resize(Point::new(1000, 1000));
    assert_eq!(window.buffer_geometry().size(), Size::new(400, 300));
    assert_eq!(window.frame_geometry().size(), Size::new(408, 328));
}

// ============================================================================
// Electric borders
// ============================================================================

#[test]
fn test_drag_to_top_edge_maximizes() {
    let (env, clock, _) = setup(CasementConfig::default());
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));
    let events = record(&mut window);

    window.start_move_resize(MoveResizeRequest::at(Point::new(800, 320)));
    window.handle_move_resize(Point::new(960, 0));
    assert_eq!(window.electric_border_mode(), QuickTileMode::MAXIMIZE);

    let deadline = window.next_deadline().unwrap();
    clock.advance(Duration::from_millis(250));
    assert!(clock.now() >= deadline);
    window.dispatch_timers();
    window.finish_move_resize(false);

    assert_eq!(window.quick_tile_mode(), QuickTileMode::MAXIMIZE);
    assert_eq!(window.frame_geometry(), SCREEN);
    assert!(names(&events.lock()).contains(&"electric-border-preview"));

    // Untiling goes back to where the drag ended
    window.set_quick_tile_mode(QuickTileMode::NONE, false);
    assert_eq!(window.frame_geometry(), Rect::new(560, 0, 800, 600));
}

#[test]
fn test_electric_border_tiles_on_pointer_screen() {
    let clock = ManualClock::new();
    let screens = Screens::new(
        vec![
            Screen::new(0, "left".to_string(), SCREEN),
            Screen::new(1, "right".to_string(), Rect::new(1920, 0, 1920, 1080)),
        ],
        1,
    );
    let env = Environment::new(Arc::new(screens), clock.clone(), Arc::new(CasementConfig::default()));
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(1000, 300, 800, 600));

    window.start_move_resize(
        MoveResizeRequest::at(Point::new(1790, 320)).with_position(Position::Center),
    );
    window.handle_move_resize(Point::new(2000, 0));
    assert_eq!(window.electric_border_mode(), QuickTileMode::MAXIMIZE);
    // The clamped frame is still mostly on the left screen.
    assert_eq!(window.screen(), 0);

    clock.advance(Duration::from_millis(250));
    window.dispatch_timers();
    window.finish_move_resize(false);

    assert_eq!(window.quick_tile_mode(), QuickTileMode::MAXIMIZE);
    assert_eq!(window.frame_geometry(), Rect::new(1920, 0, 1920, 1080));
}

#[test]
fn test_electric_commit_notifies_geometry_first() {
    let (env, clock, _) = setup(CasementConfig::default());
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));

    window.start_move_resize(MoveResizeRequest::at(Point::new(800, 320)));
    window.handle_move_resize(Point::new(0, 540));
    clock.advance(Duration::from_millis(250));
    window.dispatch_timers();

    let events = record(&mut window);
    window.finish_move_resize(false);

    assert_eq!(
        names(&events.lock()),
        [
            "geometry-changed",
            "electric-border-preview",
            "quick-tile-mode-changed",
            "move-resize-finished",
            "cursor-changed",
        ]
    );
}

#[test]
fn test_electric_border_disabled() {
    let mut config = CasementConfig::default();
    config.quick_tile.electric_border = false;
    let (env, clock, _) = setup(config);
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));

    window.start_move_resize(MoveResizeRequest::at(Point::new(800, 320)));
    window.handle_move_resize(Point::new(0, 540));
    clock.advance(Duration::from_secs(1));
    window.dispatch_timers();
    window.finish_move_resize(false);

    assert_eq!(window.quick_tile_mode(), QuickTileMode::NONE);
}

// ============================================================================
// Rules
// ============================================================================

#[test]
fn test_rules_disable_interactive_resize() {
    let config = CasementConfig {
        rules: vec![WindowRule {
            app_id: Some("org.example.editor".to_string()),
            resizable: Some(false),
            ..Default::default()
        }],
        ..Default::default()
    };
    let (env, _, _) = setup(config);
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(400, 300, 800, 600));

    assert!(!window.start_move_resize(
        MoveResizeRequest::at(Point::new(1199, 899)).with_position(Position::BottomRight)
    ));
    assert!(!window.set_quick_tile_mode(QuickTileMode::LEFT, false));
    assert!(window.start_move_resize(MoveResizeRequest::at(Point::new(800, 320))));
    assert_eq!(window.move_resize_state(), MoveResizeState::Active);
}

// ============================================================================
// Transients
// ============================================================================

#[test]
fn test_dialog_follows_main_window() {
    let (env, _, _) = setup(CasementConfig::default());
    let mut table = WindowTable::new();
    table.insert(client(&env, 1, ClientCapabilities::default(), Rect::new(0, 0, 800, 600)));
    let dialog = ClientCapabilities { kind: WindowKind::Dialog, ..Default::default() };
    table.insert(client(&env, 2, dialog, Rect::new(200, 200, 300, 200)));

    assert!(table.set_transient_for(WindowId(2), Some(WindowId(1))));
    assert!(table.set_keep_above(WindowId(1), true));
    assert_eq!(table.get(WindowId(2)).unwrap().layer(), Layer::Above);

    assert!(table.set_desktop(WindowId(1), 3));
    assert_eq!(table.get(WindowId(2)).unwrap().desktop(), 3);

    let closed = table.withdraw(WindowId(1)).unwrap();
    assert_eq!(closed.id, WindowId(1));
    assert!(!table.get(WindowId(2)).unwrap().is_transient());
}

#[test]
fn test_transient_cycle_terminates() {
    let (env, _, _) = setup(CasementConfig::default());
    let mut table = WindowTable::new();
    table.insert(client(&env, 1, ClientCapabilities::default(), Rect::new(0, 0, 100, 100)));
    table.insert(client(&env, 2, ClientCapabilities::default(), Rect::new(0, 0, 100, 100)));

    table.set_transient_for(WindowId(2), Some(WindowId(1)));
    table.set_transient_for(WindowId(1), Some(WindowId(2)));

    assert!(table.has_transient(WindowId(1), WindowId(1), true));
    assert_eq!(table.all_transients(WindowId(1)).len(), 1);
}

// ============================================================================
// Batching and desktops
// ============================================================================

#[test]
fn test_async_channel_sees_one_commit_per_block() {
    let (env, _, _) = setup(CasementConfig::default());
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(0, 0, 400, 300));
    let mut receiver = window.event_channel();

    {
        let mut blocker = window.geometry_updates_blocker();
        blocker.move_to(Point::new(10, 10), ForceGeometry::Normal);
        blocker.resize_with_checks(Size::new(500, 400), ForceGeometry::Normal);
        blocker.move_to(Point::new(20, 20), ForceGeometry::Normal);
    }

    assert_eq!(
        receiver.try_recv().unwrap(),
        WindowEvent::GeometryChanged {
            old: Rect::new(0, 0, 400, 300),
            new: Rect::new(20, 20, 500, 400),
        }
    );
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_on_all_desktops_follows_current_desktop() {
    let (env, _, screens) = setup(CasementConfig::default());
    let mut window = client(&env, 1, ClientCapabilities::default(), Rect::new(0, 0, 400, 300));

    assert!(screens.set_current_desktop(2));
    window.set_on_all_desktops(true);
    assert!(window.is_on_desktop(4));

    window.set_on_all_desktops(false);
    assert_eq!(window.desktop(), 2);
}
