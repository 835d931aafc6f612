//! Scenario replay.
//!
//! A scenario is a JSONC file describing a screen layout, a set of windows
//! and a list of timed steps (pointer motion, keys, tiling requests, ...).
//! Replaying it drives the window core with a manual clock, so timers fire
//! exactly at the step times, and records every step outcome and every
//! notification in order.
//!
//! ```jsonc
//! {
//!   "screens": [{ "id": 0, "name": "main", "frame": { "x": 0, "y": 0, "width": 1920, "height": 1080 } }],
//!   "windows": [{ "id": 1, "appId": "org.example.Editor", "frame": { "x": 400, "y": 300, "width": 800, "height": 600 } }],
//!   "steps": [
//!     { "atMs": 0, "window": 1, "action": "start-move-resize", "pointer": { "x": 800, "y": 320 } },
//!     { "atMs": 16, "window": 1, "action": "pointer", "to": { "x": 0, "y": 540 } },
//!     { "atMs": 400, "window": 1, "action": "finish" }
//!   ]
//! }
//! ```

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::CasementConfig;
use crate::error::CasementError;
use crate::window::{
    ClientCapabilities, Environment, ForceGeometry, Layer, ManualClock, MoveResizeKey,
    MaximizeMode, MoveResizeRequest, MoveResizeState, Point, Position, QuickTileMode, Rect, Screen,
    Screens, Size, Strut, Window, WindowEvent, WindowId, WindowIdentity, WindowTable,
};

/// Screen used when a scenario does not declare any.
const DEFAULT_SCREEN: Rect = Rect::new(0, 0, 1920, 1080);

// ============================================================================
// Scenario model
// ============================================================================

/// A complete replayable scenario.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    pub screens: Vec<Screen>,
    /// Desktop count override; the configuration's count otherwise.
    pub desktops: Option<i32>,
    pub windows: Vec<WindowSpec>,
    pub steps: Vec<Step>,
}

/// Initial state of one window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    pub id: WindowId,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub title: String,
    pub frame: Rect,
    #[serde(flatten)]
    pub capabilities: ClientCapabilities,
    #[serde(default)]
    pub desktop: Option<i32>,
    #[serde(default)]
    pub transient_for: Option<WindowId>,
    #[serde(default)]
    pub modal: bool,
    #[serde(default)]
    pub keep_above: bool,
}

/// One timed action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Time since the start of the replay.
    #[serde(default)]
    pub at_ms: u64,
    #[serde(default)]
    pub window: WindowId,
    #[serde(flatten)]
    pub action: Action,
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Action {
    StartMoveResize {
        pointer: Point,
        #[serde(default)]
        position: Option<Position>,
        #[serde(default)]
        unrestricted: bool,
    },
    StartDelayedMoveResize { pointer: Point },
    StopDelayedMoveResize,
    Pointer { to: Point },
    Key {
        key: MoveResizeKey,
        #[serde(default)]
        fine: bool,
    },
    Finish,
    Cancel,
    QuickTile {
        mode: QuickTileMode,
        #[serde(default)]
        keyboard: bool,
    },
    Maximize {
        #[serde(default)]
        vertical: bool,
        #[serde(default)]
        horizontal: bool,
    },
    SendToScreen { screen: usize },
    MoveTo { origin: Point },
    Resize { size: Size },
    SetGeometry { frame: Rect },
    PackTo { left: i32, top: i32 },
    KeepInArea {
        #[serde(default)]
        partial: bool,
    },
    GrowHorizontal,
    ShrinkHorizontal,
    GrowVertical,
    ShrinkVertical,
    SetDesktop { desktop: i32 },
    KeepAbove { enabled: bool },
    KeepBelow { enabled: bool },
    SetTransientFor { parent: Option<WindowId> },
    /// Switch the current desktop. Not tied to a window.
    SwitchDesktop { desktop: i32 },
    /// Replace a screen's struts and let every window follow the new work
    /// area. Not tied to a window.
    SetStruts { screen: usize, struts: Vec<Strut> },
    Close,
}

impl Action {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartMoveResize { .. } => "start-move-resize",
            Self::StartDelayedMoveResize { .. } => "start-delayed-move-resize",
            Self::StopDelayedMoveResize => "stop-delayed-move-resize",
            Self::Pointer { .. } => "pointer",
            Self::Key { .. } => "key",
            Self::Finish => "finish",
            Self::Cancel => "cancel",
            Self::QuickTile { .. } => "quick-tile",
            Self::Maximize { .. } => "maximize",
            Self::SendToScreen { .. } => "send-to-screen",
            Self::MoveTo { .. } => "move-to",
            Self::Resize { .. } => "resize",
            Self::SetGeometry { .. } => "set-geometry",
            Self::PackTo { .. } => "pack-to",
            Self::KeepInArea { .. } => "keep-in-area",
            Self::GrowHorizontal => "grow-horizontal",
            Self::ShrinkHorizontal => "shrink-horizontal",
            Self::GrowVertical => "grow-vertical",
            Self::ShrinkVertical => "shrink-vertical",
            Self::SetDesktop { .. } => "set-desktop",
            Self::KeepAbove { .. } => "keep-above",
            Self::KeepBelow { .. } => "keep-below",
            Self::SetTransientFor { .. } => "set-transient-for",
            Self::SwitchDesktop { .. } => "switch-desktop",
            Self::SetStruts { .. } => "set-struts",
            Self::Close => "close",
        }
    }
}

/// Parse a JSONC scenario.
///
/// # Errors
///
/// Returns `CasementError::Json` if the content is not a valid scenario.
pub fn parse_scenario(reader: impl Read) -> Result<Scenario, CasementError> {
    let reader = json_comments::StripComments::new(reader);
    Ok(serde_json::from_reader(reader)?)
}

/// Load a scenario file.
///
/// # Errors
///
/// Returns `CasementError::Io` if the file cannot be read, or
/// `CasementError::Json` if it is not a valid scenario.
pub fn load_scenario(path: &Path) -> Result<Scenario, CasementError> {
    let file = std::fs::File::open(path)?;
    parse_scenario(file)
}

// ============================================================================
// Replay output
// ============================================================================

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ReplayRecord {
    /// A step was applied; `accepted` is what the operation returned.
    Step { at_ms: u64, window: WindowId, action: &'static str, accepted: bool },
    /// A window emitted a notification.
    Event {
        at_ms: u64,
        window: WindowId,
        #[serde(flatten)]
        event: WindowEvent,
    },
}

/// Final state of one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub id: WindowId,
    pub app_id: String,
    pub frame: Rect,
    pub client: Rect,
    pub desktop: i32,
    pub layer: Layer,
    pub quick_tile: &'static str,
    pub maximize: &'static str,
    pub transient_for: Option<WindowId>,
    pub move_resize: MoveResizeState,
}

impl WindowSummary {
    fn of(window: &Window) -> Self {
        Self {
            id: window.id(),
            app_id: window.identity().app_id.clone(),
            frame: window.frame_geometry(),
            client: window.buffer_geometry(),
            desktop: window.desktop(),
            layer: window.layer(),
            quick_tile: window.quick_tile_mode().label(),
            maximize: window.maximize_mode().label(),
            transient_for: window.transient_for(),
            move_resize: window.move_resize_state(),
        }
    }
}

/// Result of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    pub records: Vec<ReplayRecord>,
    pub windows: Vec<WindowSummary>,
}

impl Replay {
    /// Events emitted by one window, in order.
    pub fn events_of(&self, id: WindowId) -> impl Iterator<Item = &WindowEvent> {
        self.records.iter().filter_map(move |record| match record {
            ReplayRecord::Event { window, event, .. } if *window == id => Some(event),
            _ => None,
        })
    }

    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&WindowSummary> {
        self.windows.iter().find(|summary| summary.id == id)
    }
}

// ============================================================================
// Replay
// ============================================================================

struct Runner {
    screens: Arc<Screens>,
    clock: Arc<ManualClock>,
    table: WindowTable,
    channels: Vec<(WindowId, UnboundedReceiver<WindowEvent>)>,
    records: Vec<ReplayRecord>,
    now_ms: u64,
}

/// Replay a scenario against the window core.
///
/// # Errors
///
/// Returns `CasementError::Scenario` for duplicate window ids or transient
/// links to undeclared windows, and `CasementError::UnknownWindow` for steps
/// targeting a window that does not exist (or no longer exists).
pub fn replay(scenario: &Scenario, config: Arc<CasementConfig>) -> Result<Replay, CasementError> {
    let screens = if scenario.screens.is_empty() {
        vec![Screen::new(0, "default".to_string(), DEFAULT_SCREEN)]
    } else {
        scenario.screens.clone()
    };
    let desktops = scenario.desktops.unwrap_or(config.desktops.count);
    let screens = Arc::new(Screens::new(screens, desktops));
    let clock = ManualClock::new();
    let env = Environment::new(screens.clone(), clock.clone(), config);

    let mut runner = Runner {
        screens,
        clock,
        table: WindowTable::new(),
        channels: Vec::new(),
        records: Vec::new(),
        now_ms: 0,
    };
    runner.create_windows(&scenario.windows, &env)?;

    let mut steps: Vec<&Step> = scenario.steps.iter().collect();
    steps.sort_by_key(|step| step.at_ms);

    for step in steps {
        runner.advance_to(step.at_ms);
        let accepted = runner.apply(step)?;
        tracing::debug!(at_ms = step.at_ms, window = %step.window, action = step.action.name(), accepted, "step");
        runner.records.push(ReplayRecord::Step {
            at_ms: step.at_ms,
            window: step.window,
            action: step.action.name(),
            accepted,
        });
        runner.drain();
    }

    Ok(Replay {
        windows: runner.table.iter().map(WindowSummary::of).collect(),
        records: runner.records,
    })
}

impl Runner {
    fn create_windows(&mut self, specs: &[WindowSpec], env: &Environment) -> Result<(), CasementError> {
        for spec in specs {
            if self.table.contains(spec.id) {
                return Err(CasementError::Scenario(format!("duplicate window id {}", spec.id)));
            }

            let mut window = Window::new(
                spec.id,
                WindowIdentity::new(spec.app_id.clone(), spec.title.clone()),
                Box::new(spec.capabilities.clone()),
                spec.frame,
                env,
            );
            self.channels.push((spec.id, window.event_channel()));

            if let Some(desktop) = spec.desktop {
                window.set_desktop(desktop);
            }
            window.set_modal(spec.modal);
            window.set_keep_above(spec.keep_above);
            self.table.insert(window);
        }

        for spec in specs {
            if let Some(parent) = spec.transient_for {
                if !self.table.contains(parent) {
                    return Err(CasementError::Scenario(format!(
                        "window {} is transient for undeclared window {parent}",
                        spec.id
                    )));
                }
                self.table.set_transient_for(spec.id, Some(parent));
            }
        }

        self.drain();
        Ok(())
    }

    /// Move the clock forward and fire due timers on every window.
    fn advance_to(&mut self, at_ms: u64) {
        self.now_ms = self.now_ms.max(at_ms);
        self.clock.set_elapsed(Duration::from_millis(self.now_ms));

        let ids: Vec<WindowId> = self.table.ids().collect();
        for id in ids {
            if let Some(window) = self.table.get_mut(id) {
                window.dispatch_timers();
            }
        }
        self.drain();
    }

    fn drain(&mut self) {
        let at_ms = self.now_ms;
        for (window, receiver) in &mut self.channels {
            while let Ok(event) = receiver.try_recv() {
                self.records.push(ReplayRecord::Event { at_ms, window: *window, event });
            }
        }
    }

    /// Change the struts, then re-fit every window against the work area it
    /// was laid out in.
    fn set_struts(&mut self, screen: usize, struts: &[Strut]) -> bool {
        let placed: Vec<(WindowId, Rect)> =
            self.table.iter().map(|window| (window.id(), window.work_area())).collect();
        if !self.screens.set_struts(screen, struts.to_vec()) {
            return false;
        }
        for (id, old_area) in placed {
            if let Some(window) = self.table.get_mut(id) {
                window.check_workspace_position(old_area);
            }
        }
        true
    }

    fn apply(&mut self, step: &Step) -> Result<bool, CasementError> {
        let id = step.window;
        match &step.action {
            Action::SwitchDesktop { desktop } => return Ok(self.screens.set_current_desktop(*desktop)),
            Action::SetStruts { screen, struts } => return Ok(self.set_struts(*screen, struts)),
            _ => {}
        }
        if !self.table.contains(id) {
            return Err(CasementError::UnknownWindow(id));
        }

        match &step.action {
            Action::Close => return Ok(self.table.withdraw(id).is_some()),
            Action::SetDesktop { desktop } => return Ok(self.table.set_desktop(id, *desktop)),
            Action::KeepAbove { enabled } => return Ok(self.table.set_keep_above(id, *enabled)),
            Action::KeepBelow { enabled } => return Ok(self.table.set_keep_below(id, *enabled)),
            Action::SetTransientFor { parent } => {
                if let Some(parent) = parent
                    && !self.table.contains(*parent)
                {
                    return Err(CasementError::UnknownWindow(*parent));
                }
                return Ok(self.table.set_transient_for(id, *parent));
            }
            _ => {}
        }

        let window = self.table.get_mut(id).ok_or(CasementError::UnknownWindow(id))?;
        let accepted = match &step.action {
            Action::StartMoveResize { pointer, position, unrestricted } => {
                window.start_move_resize(MoveResizeRequest {
                    pointer: *pointer,
                    position: *position,
                    unrestricted: *unrestricted,
                    button_down: true,
                })
            }
            Action::StartDelayedMoveResize { pointer } => {
                window.start_delayed_move_resize(MoveResizeRequest::at(*pointer))
            }
            Action::StopDelayedMoveResize => window.stop_delayed_move_resize(),
            Action::Pointer { to } => window.handle_move_resize(*to),
            Action::Key { key, fine } => window.key_press(*key, *fine),
            Action::Finish => window.finish_move_resize(false),
            Action::Cancel => window.finish_move_resize(true),
            Action::QuickTile { mode, keyboard } => window.set_quick_tile_mode(*mode, *keyboard),
            Action::Maximize { vertical, horizontal } => {
                window.maximize(MaximizeMode::from_axes(*vertical, *horizontal))
            }
            Action::SendToScreen { screen } => window.send_to_screen(*screen),
            Action::MoveTo { origin } => window.move_to(*origin, ForceGeometry::Normal),
            Action::Resize { size } => window.resize_with_checks(*size, ForceGeometry::Normal),
            Action::SetGeometry { frame } => window.set_frame_geometry(*frame, ForceGeometry::Normal),
            Action::PackTo { left, top } => window.pack_to(*left, *top),
            Action::KeepInArea { partial } => {
                let area = window.work_area();
                window.keep_in_area(area, *partial)
            }
            Action::GrowHorizontal => window.grow_horizontal(),
            Action::ShrinkHorizontal => window.shrink_horizontal(),
            Action::GrowVertical => window.grow_vertical(),
            Action::ShrinkVertical => window.shrink_vertical(),
            Action::SwitchDesktop { .. }
            | Action::SetStruts { .. }
            | Action::Close
            | Action::SetDesktop { .. }
            | Action::KeepAbove { .. }
            | Action::KeepBelow { .. }
            | Action::SetTransientFor { .. } => false,
        };
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE_SCENARIO: &str = r#"{
        // one screen, one editor window
        "windows": [
            { "id": 1, "appId": "org.example.Editor", "frame": { "x": 400, "y": 300, "width": 800, "height": 600 } }
        ],
        "steps": [
            { "atMs": 0, "window": 1, "action": "quick-tile", "mode": "LEFT" },
            { "atMs": 10, "window": 1, "action": "quick-tile", "mode": "" }
        ]
    }"#;

    fn run(json: &str) -> Replay {
        let scenario = parse_scenario(json.as_bytes()).unwrap();
        replay(&scenario, Arc::new(CasementConfig::default())).unwrap()
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_scenario_with_comments() {
            let scenario = parse_scenario(TILE_SCENARIO.as_bytes()).unwrap();
            assert_eq!(scenario.windows.len(), 1);
            assert_eq!(scenario.windows[0].id, WindowId(1));
            assert!(scenario.windows[0].capabilities.movable);
            assert_eq!(
                scenario.steps[0].action,
                Action::QuickTile { mode: QuickTileMode::LEFT, keyboard: false }
            );
        }

        #[test]
        fn test_parse_window_capabilities() {
            let json = r#"{
                "windows": [{
                    "id": 2,
                    "frame": { "x": 0, "y": 0, "width": 300, "height": 200 },
                    "hints": { "min": { "width": 100, "height": 100 } },
                    "resizable": false,
                    "kind": "dialog",
                    "transientFor": 1
                }]
            }"#;
            let scenario = parse_scenario(json.as_bytes()).unwrap();
            let window = &scenario.windows[0];
            assert!(!window.capabilities.resizable);
            assert_eq!(window.capabilities.hints.min, Size::new(100, 100));
            assert_eq!(window.transient_for, Some(WindowId(1)));
        }

        #[test]
        fn test_unknown_action_is_rejected() {
            let json = r#"{ "steps": [{ "window": 1, "action": "teleport" }] }"#;
            assert!(matches!(parse_scenario(json.as_bytes()), Err(CasementError::Json(_))));
        }
    }

    mod replay_tests {
        use super::*;

        #[test]
        fn test_quick_tile_round_trip() {
            let replay = run(TILE_SCENARIO);
            let geometry: Vec<_> = replay
                .events_of(WindowId(1))
                .filter_map(|event| match event {
                    WindowEvent::GeometryChanged { new, .. } => Some(*new),
                    _ => None,
                })
                .collect();

            assert_eq!(geometry, vec![Rect::new(0, 0, 960, 1080), Rect::new(400, 300, 800, 600)]);
            assert_eq!(replay.window(WindowId(1)).unwrap().quick_tile, "none");
        }

        #[test]
        fn test_electric_border_uses_step_times() {
            let replay = run(
                r#"{
                    "windows": [{ "id": 1, "frame": { "x": 400, "y": 300, "width": 800, "height": 600 } }],
                    "steps": [
                        { "atMs": 0, "window": 1, "action": "start-move-resize", "pointer": { "x": 800, "y": 320 } },
                        { "atMs": 16, "window": 1, "action": "pointer", "to": { "x": 1919, "y": 540 } },
                        { "atMs": 300, "window": 1, "action": "finish" }
                    ]
                }"#,
            );

            let summary = replay.window(WindowId(1)).unwrap();
            assert_eq!(summary.quick_tile, "right");
            assert_eq!(summary.frame, Rect::new(960, 0, 960, 1080));
            assert_eq!(summary.move_resize, MoveResizeState::Idle);
            assert!(replay.records.iter().any(|record| matches!(
                record,
                ReplayRecord::Event { at_ms: 300, event: WindowEvent::ElectricBorderPreview { .. }, .. }
            )));
        }

        #[test]
        fn test_steps_report_refusals() {
            let replay = run(
                r#"{
                    "windows": [{ "id": 1, "frame": { "x": 0, "y": 0, "width": 100, "height": 100 }, "movable": false }],
                    "steps": [{ "window": 1, "action": "start-move-resize", "pointer": { "x": 50, "y": 50 } }]
                }"#,
            );
            assert_eq!(
                replay.records.last(),
                Some(&ReplayRecord::Step {
                    at_ms: 0,
                    window: WindowId(1),
                    action: "start-move-resize",
                    accepted: false,
                })
            );
        }

        #[test]
        fn test_close_removes_window() {
            let replay = run(
                r#"{
                    "windows": [
                        { "id": 1, "frame": { "x": 0, "y": 0, "width": 100, "height": 100 } },
                        { "id": 2, "frame": { "x": 0, "y": 0, "width": 50, "height": 50 }, "transientFor": 1 }
                    ],
                    "steps": [{ "window": 1, "action": "close" }]
                }"#,
            );
            assert!(replay.window(WindowId(1)).is_none());
            assert_eq!(replay.window(WindowId(2)).unwrap().transient_for, None);
            assert!(replay.events_of(WindowId(1)).any(|event| *event == WindowEvent::Closed));
        }

        #[test]
        fn test_struts_relayout_maximized_window() {
            let replay = run(
                r#"{
                    "windows": [{ "id": 1, "frame": { "x": 400, "y": 300, "width": 800, "height": 600 } }],
                    "steps": [
                        { "atMs": 0, "window": 1, "action": "maximize", "vertical": true, "horizontal": true },
                        { "atMs": 10, "action": "set-struts", "screen": 0, "struts": [{ "top": 32 }] }
                    ]
                }"#,
            );

            let summary = replay.window(WindowId(1)).unwrap();
            assert_eq!(summary.maximize, "full");
            assert_eq!(summary.frame, Rect::new(0, 32, 1920, 1048));
            assert!(replay.records.iter().any(|record| matches!(
                record,
                ReplayRecord::Step { action: "set-struts", accepted: true, .. }
            )));
        }

        #[test]
        fn test_send_to_screen() {
            let replay = run(
                r#"{
                    "screens": [
                        { "id": 0, "name": "left", "frame": { "x": 0, "y": 0, "width": 1920, "height": 1080 } },
                        { "id": 1, "name": "right", "frame": { "x": 1920, "y": 0, "width": 1920, "height": 1080 } }
                    ],
                    "windows": [{ "id": 1, "frame": { "x": 100, "y": 100, "width": 800, "height": 600 } }],
                    "steps": [
                        { "window": 1, "action": "send-to-screen", "screen": 1 },
                        { "window": 1, "action": "send-to-screen", "screen": 5 }
                    ]
                }"#,
            );

            assert_eq!(replay.window(WindowId(1)).unwrap().frame, Rect::new(2020, 100, 800, 600));
            assert_eq!(
                replay.records.last(),
                Some(&ReplayRecord::Step {
                    at_ms: 0,
                    window: WindowId(1),
                    action: "send-to-screen",
                    accepted: false,
                })
            );
        }

        #[test]
        fn test_unknown_window_is_an_error() {
            let scenario = parse_scenario(
                r#"{ "steps": [{ "window": 9, "action": "finish" }] }"#.as_bytes(),
            )
            .unwrap();
            let err = replay(&scenario, Arc::new(CasementConfig::default())).unwrap_err();
            assert!(matches!(err, CasementError::UnknownWindow(WindowId(9))));
        }

        #[test]
        fn test_duplicate_window_is_an_error() {
            let scenario = parse_scenario(
                r#"{ "windows": [
                    { "id": 1, "frame": { "x": 0, "y": 0, "width": 10, "height": 10 } },
                    { "id": 1, "frame": { "x": 0, "y": 0, "width": 10, "height": 10 } }
                ] }"#
                    .as_bytes(),
            )
            .unwrap();
            assert!(matches!(
                replay(&scenario, Arc::new(CasementConfig::default())),
                Err(CasementError::Scenario(_))
            ));
        }

        #[test]
        fn test_records_serialize_flat() {
            let replay = run(TILE_SCENARIO);
            let step = serde_json::to_value(&replay.records[0]).unwrap();
            assert_eq!(step["type"], "step");
            assert_eq!(step["action"], "quick-tile");

            let event = serde_json::to_value(&replay.records[1]).unwrap();
            assert_eq!(event["type"], "event");
            assert_eq!(event["event"], "geometry-changed");
            assert_eq!(event["window"], 1);
            assert_eq!(event["atMs"], 0);
        }
    }
}
