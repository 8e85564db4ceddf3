//! The drawing session: tool state, input handling and committed history.

use crate::config::SessionConfig;
use crate::draft::DraftError;
use crate::history::History;
use crate::input::{KeyEvent, KeyOutcome, PointerEvent, Shortcut, ShortcutAction};
use crate::scene::{Scene, SceneError};
use crate::shapes::{SerializableColor, ShapeId, ShapePatch};
use crate::storage::{HistoryPersistence, KeyValueStore};
use crate::tools::{ToolKind, ToolManager};

/// A drawing session over a persistent store.
///
/// Holds the committed history, the gesture in progress and the current
/// selection. Every history change is written through to the store; write
/// failures are logged and the in-memory history stays authoritative.
pub struct DrawingSession<S: KeyValueStore> {
    history: History,
    tools: ToolManager,
    /// Shape last clicked in select mode.
    selection: Option<ShapeId>,
    persistence: HistoryPersistence<S>,
    history_limit: Option<usize>,
}

impl<S: KeyValueStore> DrawingSession<S> {
    /// Open a session with default settings, restoring history from `store`.
    pub fn open(store: S) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    /// Open a session, restoring history from `store` or starting fresh.
    pub fn with_config(store: S, config: SessionConfig) -> Self {
        let persistence = HistoryPersistence::with_config(store, &config);
        let mut history = persistence.load().unwrap_or_default();
        if let Some(limit) = config.history_limit {
            history.trim_to(limit);
        }
        Self {
            history,
            tools: ToolManager::with_fill(config.default_fill),
            selection: None,
            persistence,
            history_limit: config.history_limit,
        }
    }

    /// Feed a pointer event. Returns whether the visible scene changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool, DraftError> {
        match event {
            PointerEvent::Down { position } => {
                if self.tools.is_active() {
                    // Release was never delivered; the stale gesture is dropped.
                    log::debug!("Pointer down during a gesture, discarding previous draft");
                    self.tools.cancel();
                }
                self.tools.begin(self.history.current(), position)
            }
            PointerEvent::Move { position } => self.tools.update(position),
            PointerEvent::Up { .. } => match self.tools.end() {
                Some(scene) => {
                    self.commit(scene);
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    /// Feed a key press. Undo/redo shortcuts are claimed so the host can
    /// suppress the platform default.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        match Shortcut::lookup(event) {
            Some(action) => {
                match action {
                    ShortcutAction::Undo => self.undo(),
                    ShortcutAction::Redo => self.redo(),
                };
                KeyOutcome::Claimed(action)
            }
            None => KeyOutcome::Ignored,
        }
    }

    /// Switch tools. A pending draft is committed first, as a release would.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.commit_pending("Tool switched");
        self.tools.set_tool(tool);
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Set the fill used by shapes drawn from now on.
    pub fn set_fill(&mut self, fill: SerializableColor) {
        self.tools.fill = fill;
    }

    pub fn fill(&self) -> SerializableColor {
        self.tools.fill
    }

    /// The scene to render: the draft while a gesture is active, else the
    /// scene at the history cursor.
    pub fn visible_scene(&self) -> &Scene {
        self.tools.preview().unwrap_or_else(|| self.history.current())
    }

    /// Whether a gesture is in progress.
    pub fn is_drafting(&self) -> bool {
        self.tools.is_active()
    }

    /// Record a shape clicked in select mode. Returns false if it is not in
    /// the committed scene.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if self.history.current().contains(id) {
            self.selection = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The selected shape, if it is still in the visible history entry.
    pub fn selection(&self) -> Option<ShapeId> {
        self.selection.filter(|id| self.history.current().contains(*id))
    }

    /// Apply a move or resize from the host as one undoable commit.
    ///
    /// A pending draft is committed first, so the edit lands on top of it
    /// and a later release has nothing left to overwrite it with.
    pub fn commit_edit(&mut self, id: ShapeId, patch: &ShapePatch) -> Result<(), SceneError> {
        self.commit_pending("Edit");
        let scene = self.history.current().with_shape_updated(id, patch)?;
        self.commit(scene);
        Ok(())
    }

    /// Step back one entry. A gesture in progress survives and is committed
    /// on release at the new cursor, dropping the redo future.
    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        log::debug!("Undo (moved: {}, cursor {})", moved, self.history.cursor());
        self.persistence.save(&self.history);
        moved
    }

    /// Step forward one entry. A gesture in progress survives, as for undo.
    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        log::debug!("Redo (moved: {}, cursor {})", moved, self.history.cursor());
        self.persistence.save(&self.history);
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn persistence(&self) -> &HistoryPersistence<S> {
        &self.persistence
    }

    fn commit_pending(&mut self, reason: &str) {
        if let Some(scene) = self.tools.end() {
            log::debug!("{} mid-gesture, committing draft", reason);
            self.commit(scene);
        }
    }

    fn commit(&mut self, scene: Scene) {
        self.history.commit(scene);
        if let Some(limit) = self.history_limit {
            let dropped = self.history.trim_to(limit);
            if dropped > 0 {
                log::debug!("Dropped {} oldest history entries", dropped);
            }
        }
        log::debug!(
            "Committed scene ({} shapes, {} entries)",
            self.history.current().len(),
            self.history.len()
        );
        self.persistence.save(&self.history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{RectanglePatch, ShapeKind};
    use crate::storage::{MemoryStore, StorageError, StorageResult, HISTORY_INDEX_KEY};
    use kurbo::Point;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
        }
    }

    fn drag(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
        }
    }

    fn draw_rect<S: KeyValueStore>(session: &mut DrawingSession<S>, from: Point, to: Point) {
        session.set_tool(ToolKind::Rectangle);
        session.handle_pointer(down(from.x, from.y)).unwrap();
        session.handle_pointer(drag(to.x, to.y)).unwrap();
        session.handle_pointer(up(to.x, to.y)).unwrap();
    }

    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_draw_rectangle_gesture() {
        let mut session = DrawingSession::open(MemoryStore::new());
        session.set_tool(ToolKind::Rectangle);

        assert!(session.handle_pointer(down(10.0, 10.0)).unwrap());
        assert!(session.handle_pointer(drag(30.0, 15.0)).unwrap());
        assert!(session.handle_pointer(drag(50.0, 30.0)).unwrap());

        // Moves only touch the draft
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.visible_scene().rectangles.len(), 1);
        assert!(session.history().current().is_empty());

        assert!(session.handle_pointer(up(50.0, 30.0)).unwrap());
        assert!(!session.is_drafting());
        assert_eq!(session.history().len(), 2);
        let rect = &session.visible_scene().rectangles[0];
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10.0, 10.0, 40.0, 20.0));
        assert_eq!(rect.fill, SerializableColor::red());
    }

    #[test]
    fn test_draw_circle_gesture() {
        let mut session = DrawingSession::open(MemoryStore::new());
        session.set_tool(ToolKind::Circle);
        session.set_fill(SerializableColor::rgb(0, 0, 255));

        session.handle_pointer(down(0.0, 0.0)).unwrap();
        session.handle_pointer(drag(3.0, 4.0)).unwrap();
        session.handle_pointer(up(3.0, 4.0)).unwrap();

        let circle = &session.visible_scene().circles[0];
        assert_eq!(circle.radius, 5.0);
        assert_eq!(circle.fill, SerializableColor::rgb(0, 0, 255));
    }

    #[test]
    fn test_click_without_drag_commits() {
        let mut session = DrawingSession::open(MemoryStore::new());
        session.set_tool(ToolKind::Rectangle);
        session.handle_pointer(down(5.0, 5.0)).unwrap();
        session.handle_pointer(up(5.0, 5.0)).unwrap();

        assert_eq!(session.history().len(), 2);
        assert_eq!(session.visible_scene().rectangles[0].width, 0.0);
    }

    #[test]
    fn test_select_tool_does_nothing() {
        let mut session = DrawingSession::open(MemoryStore::new());
        assert_eq!(session.tool(), ToolKind::Select);

        assert!(!session.handle_pointer(down(0.0, 0.0)).unwrap());
        assert!(!session.handle_pointer(drag(10.0, 10.0)).unwrap());
        assert!(!session.handle_pointer(up(10.0, 10.0)).unwrap());
        assert_eq!(session.history().len(), 1);
        assert!(session.visible_scene().is_empty());
    }

    #[test]
    fn test_move_and_up_without_draft_are_ignored() {
        let store = MemoryStore::new();
        let mut session = DrawingSession::open(&store);
        session.set_tool(ToolKind::Circle);

        assert!(!session.handle_pointer(drag(1.0, 1.0)).unwrap());
        assert!(!session.handle_pointer(up(1.0, 1.0)).unwrap());
        assert_eq!(session.history().len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_keyboard_undo_redo() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        let drawn = session.visible_scene().clone();

        let outcome = session.handle_key(&KeyEvent::platform("z"));
        assert_eq!(outcome, KeyOutcome::Claimed(ShortcutAction::Undo));
        assert!(session.visible_scene().is_empty());
        assert!(session.can_redo());

        let outcome = session.handle_key(&KeyEvent::platform("Y"));
        assert_eq!(outcome, KeyOutcome::Claimed(ShortcutAction::Redo));
        assert_eq!(session.visible_scene(), &drawn);
    }

    #[test]
    fn test_undo_at_start_is_claimed_noop() {
        let mut session = DrawingSession::open(MemoryStore::new());
        let cmd = KeyEvent::new(
            "z",
            Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        );
        assert!(session.handle_key(&cmd).is_claimed());
        assert_eq!(session.history().cursor(), 0);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));

        let shift_z = KeyEvent::new(
            "Z",
            Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(session.handle_key(&shift_z), KeyOutcome::Ignored);
        assert_eq!(session.handle_key(&KeyEvent::new("z", Modifiers::default())), KeyOutcome::Ignored);
        assert_eq!(session.handle_key(&KeyEvent::platform("x")), KeyOutcome::Ignored);
        assert_eq!(session.history().cursor(), 1);
    }

    #[test]
    fn test_commit_after_undo_drops_future() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        draw_rect(&mut session, Point::ZERO, Point::new(20.0, 20.0));
        session.undo();
        draw_rect(&mut session, Point::ZERO, Point::new(30.0, 30.0));

        assert_eq!(session.history().len(), 3);
        assert!(!session.can_redo());
        let widths: Vec<f64> = session.visible_scene().rectangles.iter().map(|r| r.width).collect();
        assert_eq!(widths, vec![10.0, 30.0]);
    }

    #[test]
    fn test_tool_switch_commits_pending_draft() {
        let mut session = DrawingSession::open(MemoryStore::new());
        session.set_tool(ToolKind::Rectangle);
        session.handle_pointer(down(0.0, 0.0)).unwrap();
        session.handle_pointer(drag(8.0, 6.0)).unwrap();

        session.set_tool(ToolKind::Circle);
        assert!(!session.is_drafting());
        assert_eq!(session.tool(), ToolKind::Circle);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().current().rectangles[0].width, 8.0);
    }

    #[test]
    fn test_undo_keeps_pending_draft() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        session.handle_pointer(down(50.0, 50.0)).unwrap();
        session.handle_pointer(drag(60.0, 60.0)).unwrap();

        assert!(session.undo());
        assert!(session.is_drafting());
        // The draft stays on screen until release
        assert_eq!(session.visible_scene().rectangles.len(), 2);

        assert!(session.handle_pointer(up(60.0, 60.0)).unwrap());
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().cursor(), 1);
        assert!(!session.can_redo());
        let rects = &session.history().current().rectangles;
        assert_eq!(rects.len(), 2);
        assert_eq!((rects[1].x, rects[1].width), (50.0, 10.0));
    }

    #[test]
    fn test_redo_keeps_pending_draft() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        session.undo();
        session.handle_pointer(down(5.0, 5.0)).unwrap();

        assert!(session.redo());
        assert!(session.is_drafting());
        session.handle_pointer(up(5.0, 5.0)).unwrap();
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().cursor(), 2);
        assert_eq!(session.visible_scene().rectangles.len(), 1);
    }

    #[test]
    fn test_down_during_gesture_restarts() {
        let mut session = DrawingSession::open(MemoryStore::new());
        session.set_tool(ToolKind::Rectangle);
        session.handle_pointer(down(0.0, 0.0)).unwrap();
        session.handle_pointer(down(5.0, 5.0)).unwrap();
        session.handle_pointer(up(5.0, 5.0)).unwrap();

        let rects = &session.visible_scene().rectangles;
        assert_eq!(rects.len(), 1);
        assert_eq!((rects[0].x, rects[0].y), (5.0, 5.0));
    }

    #[test]
    fn test_select_and_commit_edit() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        let id = session.visible_scene().rectangles[0].id;
        session.set_tool(ToolKind::Select);

        assert!(session.select(id));
        assert_eq!(session.selection(), Some(id));
        assert!(!session.select(ShapeId::new_v4()));

        let patch = ShapePatch::Rectangle(RectanglePatch {
            x: Some(100.0),
            y: Some(50.0),
            ..RectanglePatch::default()
        });
        session.commit_edit(id, &patch).unwrap();
        assert_eq!(session.history().len(), 3);
        let rect = &session.visible_scene().rectangles[0];
        assert_eq!((rect.x, rect.y, rect.width), (100.0, 50.0, 10.0));

        session.undo();
        assert_eq!(session.visible_scene().rectangles[0].x, 0.0);

        // The shape disappears from the visible entry, so does the selection
        session.undo();
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_commit_edit_during_gesture() {
        let mut session = DrawingSession::open(MemoryStore::new());
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        let id = session.visible_scene().rectangles[0].id;
        session.handle_pointer(down(40.0, 40.0)).unwrap();
        session.handle_pointer(drag(50.0, 45.0)).unwrap();

        let patch = ShapePatch::Rectangle(RectanglePatch {
            x: Some(100.0),
            ..RectanglePatch::default()
        });
        session.commit_edit(id, &patch).unwrap();
        assert!(!session.is_drafting());
        assert_eq!(session.history().len(), 4);

        // Release has no draft left to commit over the edit
        assert!(!session.handle_pointer(up(50.0, 45.0)).unwrap());
        let rects = &session.visible_scene().rectangles;
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].x, 100.0);
        assert_eq!((rects[1].x, rects[1].width), (40.0, 10.0));

        session.undo();
        assert_eq!(session.visible_scene().rectangles[0].x, 0.0);
    }

    #[test]
    fn test_commit_edit_unknown_shape() {
        let mut session = DrawingSession::open(MemoryStore::new());
        let id = ShapeId::new_v4();
        let patch = ShapePatch::Rectangle(RectanglePatch::default());
        assert_eq!(
            session.commit_edit(id, &patch),
            Err(SceneError::ShapeNotFound {
                id,
                kind: ShapeKind::Rectangle
            })
        );
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_session_restores_from_store() {
        let store = MemoryStore::new();
        {
            let mut session = DrawingSession::open(&store);
            draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
            draw_rect(&mut session, Point::ZERO, Point::new(20.0, 20.0));
            session.undo();
        }
        assert_eq!(store.get(HISTORY_INDEX_KEY).unwrap().as_deref(), Some("1"));

        let session = DrawingSession::open(&store);
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().cursor(), 1);
        assert!(session.can_redo());
        assert_eq!(session.visible_scene().rectangles[0].width, 10.0);
    }

    #[test]
    fn test_corrupt_store_starts_fresh() {
        let store = MemoryStore::new();
        store.set("drawingHistory", "{oops").unwrap();
        store.set("drawingHistoryIndex", "0").unwrap();

        let session = DrawingSession::open(&store);
        assert_eq!(session.history(), &History::new());
    }

    #[test]
    fn test_failing_store_keeps_session_alive() {
        let mut session = DrawingSession::open(FullStore);
        draw_rect(&mut session, Point::ZERO, Point::new(10.0, 10.0));
        assert_eq!(session.history().len(), 2);
        assert!(session.undo());
        assert!(session.redo());
        assert_eq!(session.visible_scene().rectangles.len(), 1);
    }

    #[test]
    fn test_history_limit() {
        let config = SessionConfig {
            history_limit: Some(3),
            ..SessionConfig::default()
        };
        let mut session = DrawingSession::with_config(MemoryStore::new(), config);
        for i in 1..=5 {
            draw_rect(&mut session, Point::ZERO, Point::new(i as f64, 1.0));
        }
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().cursor(), 2);
        assert_eq!(session.visible_scene().len(), 5);

        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.visible_scene().len(), 3);
    }

    #[test]
    fn test_custom_default_fill() {
        let config = SessionConfig {
            default_fill: SerializableColor::rgb(1, 2, 3),
            ..SessionConfig::default()
        };
        let mut session = DrawingSession::with_config(MemoryStore::new(), config);
        assert_eq!(session.fill(), SerializableColor::rgb(1, 2, 3));

        draw_rect(&mut session, Point::ZERO, Point::new(1.0, 1.0));
        assert_eq!(session.visible_scene().rectangles[0].fill, SerializableColor::rgb(1, 2, 3));
    }
}
