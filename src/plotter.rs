//! The interactive controller
//!
//! [`Plotter`] owns a [`RenderHost`], the finished shapes and at most one
//! active [`InteractiveShapeSession`]. Screen events are projected through the
//! host, fed to the session, and the session's effects become host primitives.

use crate::errors::{PlotError, SessionError};
use crate::host::{HostHandle, RenderHost, ScreenPos, Style, add_outline};
use crate::log::debug;
use crate::plot::ShapeKind;
use crate::session::{Effect, FinishedShape, InteractiveShapeSession, PointerEvent, SessionState};
use crate::store::PlotStore;
use crate::types::{AnchorList, Outline, Point2D};

/// Id of a finished shape, unique within one plotter.
pub type ShapeId = u64;

/// A finished shape and the primitive that shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedShape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub anchors: AnchorList,
    pub outline: Outline,
    handle: Option<HostHandle>,
}

/// Raw input from the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScreenEvent {
    LeftClick(ScreenPos),
    MouseMove(ScreenPos),
    RightClick,
    Escape,
}

/// The draw or modify in progress, with its host primitives.
#[derive(Debug)]
struct ActiveOperation {
    session: InteractiveShapeSession,
    /// The shape being modified, `None` while drawing.
    editing: Option<ShapeId>,
    preview: Option<HostHandle>,
    handles: Vec<HostHandle>,
}

impl ActiveOperation {
    fn show_preview<H: RenderHost>(&mut self, host: &mut H, outline: &Outline) {
        self.clear_preview(host);
        self.preview = add_outline(host, self.session.kind(), outline, &Style::preview());
    }

    fn clear_preview<H: RenderHost>(&mut self, host: &mut H) {
        if let Some(handle) = self.preview.take() {
            host.remove_shape(handle);
        }
    }

    fn show_handles<H: RenderHost>(&mut self, host: &mut H, points: &[Point2D]) {
        self.clear_handles(host);
        let style = Style::handle();
        self.handles = points.iter().map(|p| host.add_point(*p, &style)).collect();
    }

    fn clear_handles<H: RenderHost>(&mut self, host: &mut H) {
        for handle in self.handles.drain(..) {
            host.remove_shape(handle);
        }
    }
}

pub struct Plotter<H: RenderHost> {
    host: H,
    shapes: Vec<PlacedShape>,
    active: Option<ActiveOperation>,
    next_id: ShapeId,
}

impl<H: RenderHost> Plotter<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            shapes: Vec::new(),
            active: None,
            next_id: 1,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// True while a draw or modify is in progress.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// State of the active session, if any.
    pub fn active_state(&self) -> Option<SessionState> {
        self.active.as_ref().map(|a| a.session.state())
    }

    /// Finished shapes, oldest first.
    pub fn shapes(&self) -> &[PlacedShape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&PlacedShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.active.is_some() {
            debug!("rejected: previous operation must finish first");
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    // ========================================================================
    // Starting operations
    // ========================================================================

    /// Begin drawing a shape of `kind`.
    pub fn start_draw(&mut self, kind: ShapeKind) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.active = Some(ActiveOperation {
            session: InteractiveShapeSession::draw(kind.builder()),
            editing: None,
            preview: None,
            handles: Vec::new(),
        });
        Ok(())
    }

    /// Reopen a finished shape: its primitive is replaced by a live preview
    /// and one handle per anchor.
    pub fn start_modify(&mut self, id: ShapeId) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SessionError::UnknownShape(id))?;
        if let Some(handle) = shape.handle.take() {
            self.host.remove_shape(handle);
        }

        let session = InteractiveShapeSession::modify(shape.kind.builder(), shape.anchors.clone());
        let mut active = ActiveOperation {
            session,
            editing: Some(id),
            preview: None,
            handles: Vec::new(),
        };
        let outline = active.session.preview();
        active.show_preview(&mut self.host, &outline);
        active.show_handles(&mut self.host, shape.anchors.as_slice());
        debug!(id, kind = %shape.kind, "modify started");
        self.active = Some(active);
        Ok(())
    }

    /// Pick a finished shape under `screen` and start modifying it.
    ///
    /// Returns `Ok(None)` when nothing is there.
    pub fn select_at(&mut self, screen: ScreenPos) -> Result<Option<ShapeId>, SessionError> {
        self.ensure_idle()?;
        let Some(picked) = self.host.pick_primitive(screen) else {
            return Ok(None);
        };
        let Some(id) = self
            .shapes
            .iter()
            .find(|s| s.handle == Some(picked))
            .map(|s| s.id)
        else {
            return Ok(None);
        };
        self.start_modify(id)?;
        Ok(Some(id))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Project a screen event and feed it to the active session.
    ///
    /// Clicks and moves off the ground are dropped. While modifying, a left
    /// click on one of the anchor handles selects that anchor.
    pub fn handle_screen_event(&mut self, event: ScreenEvent) -> Result<(), PlotError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(());
        };
        let pointer = match event {
            ScreenEvent::LeftClick(screen) => {
                let on_handle = self
                    .host
                    .pick_primitive(screen)
                    .and_then(|picked| active.handles.iter().position(|h| *h == picked));
                match on_handle {
                    Some(i) => PointerEvent::HandleClick(i),
                    None => match self.host.pick_ground_point(screen) {
                        Some(p) => PointerEvent::Click(p),
                        None => return Ok(()),
                    },
                }
            }
            ScreenEvent::MouseMove(screen) => match self.host.pick_ground_point(screen) {
                Some(p) => PointerEvent::Move(p),
                None => return Ok(()),
            },
            ScreenEvent::RightClick => PointerEvent::RightClick,
            ScreenEvent::Escape => PointerEvent::Cancel,
        };
        self.handle_event(pointer)
    }

    /// Feed a ground-coordinate event to the active session and apply its
    /// effects. Without an active session this does nothing.
    pub fn handle_event(&mut self, event: PointerEvent) -> Result<(), PlotError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let transition = active.session.handle_event(event)?;

        let mut finished = None;
        let mut ended = false;
        for effect in transition.effects {
            match effect {
                Effect::Preview(outline) => active.show_preview(&mut self.host, &outline),
                Effect::ClearPreview => active.clear_preview(&mut self.host),
                Effect::Handles(points) => active.show_handles(&mut self.host, &points),
                Effect::Finalized(shape) => {
                    finished = Some(shape);
                    ended = true;
                }
                Effect::Cancelled => ended = true,
            }
        }

        if ended {
            if let Some(mut active) = self.active.take() {
                active.clear_preview(&mut self.host);
                active.clear_handles(&mut self.host);
                if let Some(shape) = finished {
                    self.place(shape, active.editing);
                }
            }
        }
        Ok(())
    }

    /// Show a finished shape, either replacing the one it was modified from
    /// or as a new shape.
    fn place(&mut self, shape: FinishedShape, editing: Option<ShapeId>) -> ShapeId {
        let handle = add_outline(&mut self.host, shape.kind, &shape.outline, &Style::finished());
        if let Some(id) = editing {
            if let Some(existing) = self.shapes.iter_mut().find(|s| s.id == id) {
                existing.anchors = shape.anchors;
                existing.outline = shape.outline;
                existing.handle = handle;
                debug!(id, "shape updated");
                return id;
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        debug!(id, kind = %shape.kind, anchors = shape.anchors.len(), "shape placed");
        self.shapes.push(PlacedShape {
            id,
            kind: shape.kind,
            anchors: shape.anchors,
            outline: shape.outline,
            handle,
        });
        id
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Build and show a finished shape straight from stored anchors.
    pub fn create_by_data(
        &mut self,
        kind: ShapeKind,
        anchors: AnchorList,
    ) -> Result<ShapeId, PlotError> {
        let outline = kind.builder().build(anchors.as_slice())?;
        Ok(self.place(
            FinishedShape {
                kind,
                anchors,
                outline,
            },
            None,
        ))
    }

    /// Recreate every shape in `store`. Stops at the first shape that fails
    /// to build; shapes placed before it stay.
    pub fn load(&mut self, store: &PlotStore) -> Result<Vec<ShapeId>, PlotError> {
        store
            .iter()
            .map(|(kind, anchors)| self.create_by_data(kind, anchors.clone()))
            .collect()
    }

    /// Move anchor `index` of a finished shape to `p` and rebuild it.
    pub fn set_anchor(&mut self, id: ShapeId, index: usize, p: Point2D) -> Result<(), PlotError> {
        if self.active.as_ref().is_some_and(|a| a.editing == Some(id)) {
            return Err(SessionError::Busy.into());
        }
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SessionError::UnknownShape(id))?;
        let mut anchors = shape.anchors.clone();
        if anchors.set_anchor(index, p).is_none() {
            return Err(SessionError::AnchorOutOfRange {
                index,
                len: anchors.len(),
            }
            .into());
        }
        let outline = shape.kind.builder().build(anchors.as_slice())?;
        if let Some(handle) = shape.handle.take() {
            self.host.remove_shape(handle);
        }
        shape.handle = add_outline(&mut self.host, shape.kind, &outline, &Style::finished());
        shape.anchors = anchors;
        shape.outline = outline;
        debug!(id, index, "anchor moved");
        Ok(())
    }

    /// Delete one finished shape.
    pub fn remove(&mut self, id: ShapeId) -> Result<(), SessionError> {
        if self.active.as_ref().is_some_and(|a| a.editing == Some(id)) {
            return Err(SessionError::Busy);
        }
        let index = self
            .shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or(SessionError::UnknownShape(id))?;
        let shape = self.shapes.remove(index);
        if let Some(handle) = shape.handle {
            self.host.remove_shape(handle);
        }
        debug!(id, "shape removed");
        Ok(())
    }

    /// Drop the active operation and every finished shape.
    pub fn clear_all(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.clear_preview(&mut self.host);
            active.clear_handles(&mut self.host);
        }
        for shape in self.shapes.drain(..) {
            if let Some(handle) = shape.handle {
                self.host.remove_shape(handle);
            }
        }
        debug!("all shapes cleared");
    }

    /// Anchors of every finished shape, grouped by kind.
    pub fn store(&self) -> PlotStore {
        let mut store = PlotStore::new();
        for shape in &self.shapes {
            store.insert(shape.kind, shape.anchors.clone());
        }
        store
    }
}
