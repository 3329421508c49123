//! Interactive shape session
//!
//! One state machine drives every shape kind. It collects anchors from
//! pointer events, asks the [`ShapeBuilder`] for a preview outline after every
//! change, and finalizes according to the kind's [`Completion`] rule. A second
//! entry point reopens a finished shape so its anchors can be dragged.
//!
//! The session knows nothing about screens or hosts: events arrive already
//! projected to ground coordinates and the caller applies the returned
//! [`Effect`]s.

use crate::errors::ShapeError;
use crate::log::{debug, trace};
use crate::plot::{BuildOutline, Completion, ShapeBuilder, ShapeKind};
use crate::types::{AnchorList, Outline, Point2D};

/// Input to a session, in ground coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Left click on the ground.
    Click(Point2D),
    /// Pointer moved over the ground.
    Move(Point2D),
    RightClick,
    /// Left click on the handle of anchor `i` (modify mode).
    HandleClick(usize),
    /// Escape.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Drawing, nothing clicked yet.
    Idle,
    /// `n` anchors committed, no floating anchor yet.
    Collecting(usize),
    /// `n` anchors committed plus one following the pointer.
    Previewing(usize),
    /// Editing a finished shape; the payload is the handle being dragged.
    Modifying(Option<usize>),
    Finalized,
    Cancelled,
}

impl SessionState {
    pub fn is_done(self) -> bool {
        matches!(self, SessionState::Finalized | SessionState::Cancelled)
    }
}

/// A shape the session has finished with.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedShape {
    pub kind: ShapeKind,
    pub anchors: AnchorList,
    pub outline: Outline,
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the preview primitive with this outline (empty: show nothing).
    Preview(Outline),
    ClearPreview,
    /// Anchor handles to display, in anchor order (modify mode).
    Handles(Vec<Point2D>),
    Finalized(FinishedShape),
    /// The draw ended without a shape.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

/// Draw or modify session for one shape.
#[derive(Debug, Clone)]
pub struct InteractiveShapeSession {
    builder: ShapeBuilder,
    anchors: AnchorList,
    floating: Option<Point2D>,
    state: SessionState,
    /// Anchors as they were when a modify began.
    original: Option<AnchorList>,
}

impl InteractiveShapeSession {
    /// Start drawing a new shape.
    pub fn draw(builder: ShapeBuilder) -> Self {
        debug!(kind = %builder.kind(), "draw session started");
        Self {
            builder,
            anchors: AnchorList::new(),
            floating: None,
            state: SessionState::Idle,
            original: None,
        }
    }

    /// Reopen a finished shape for editing.
    pub fn modify(builder: ShapeBuilder, anchors: AnchorList) -> Self {
        debug!(kind = %builder.kind(), anchors = anchors.len(), "modify session started");
        Self {
            builder,
            original: Some(anchors.clone()),
            anchors,
            floating: None,
            state: SessionState::Modifying(None),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.builder.kind()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Committed anchors (the floating one excluded).
    pub fn anchors(&self) -> &AnchorList {
        &self.anchors
    }

    /// The anchor following the pointer, if any.
    pub fn floating(&self) -> Option<Point2D> {
        self.floating
    }

    pub fn is_modifying(&self) -> bool {
        self.original.is_some()
    }

    /// Committed anchors followed by the floating one.
    fn preview_anchors(&self) -> Vec<Point2D> {
        let mut out = self.anchors.as_slice().to_vec();
        out.extend(self.floating);
        out
    }

    /// Outline for the current anchors. Never contains NaN.
    pub fn preview(&self) -> Outline {
        self.builder.preview(&self.preview_anchors())
    }

    /// Feed one event and report what changed.
    ///
    /// Events after the session is finalized or cancelled are ignored. An
    /// error leaves the session where it was.
    pub fn handle_event(&mut self, event: PointerEvent) -> Result<Transition, ShapeError> {
        trace!(kind = %self.kind(), state = ?self.state, event = ?event, "session event");
        let effects = match self.state {
            SessionState::Finalized | SessionState::Cancelled => Vec::new(),
            SessionState::Modifying(selected) => self.modify_event(selected, event)?,
            SessionState::Idle | SessionState::Collecting(_) | SessionState::Previewing(_) => {
                self.draw_event(event)?
            }
        };
        Ok(Transition {
            state: self.state,
            effects,
        })
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    fn draw_event(&mut self, event: PointerEvent) -> Result<Vec<Effect>, ShapeError> {
        match event {
            PointerEvent::Click(p) => self.commit(p),
            PointerEvent::Move(p) => Ok(self.follow(p)),
            PointerEvent::RightClick => self.right_click(),
            PointerEvent::HandleClick(_) => Ok(Vec::new()),
            PointerEvent::Cancel => {
                debug!(kind = %self.kind(), anchors = self.anchors.len(), "draw cancelled");
                self.floating = None;
                self.state = SessionState::Cancelled;
                Ok(vec![Effect::ClearPreview, Effect::Cancelled])
            }
        }
    }

    /// A click commits `p`. Past the first anchor the floating anchor is
    /// placed on top of it, so the builder sees a duplicated last point until
    /// the pointer moves.
    ///
    /// A completing click whose anchors cannot be built is taken back, so
    /// the next click can replace it.
    fn commit(&mut self, p: Point2D) -> Result<Vec<Effect>, ShapeError> {
        self.anchors.push(p);
        if let Completion::Clicks(n) = self.kind().completion() {
            if self.anchors.len() >= n {
                return match self.finalize() {
                    Ok(effects) => {
                        self.floating = None;
                        Ok(effects)
                    }
                    Err(e) => {
                        self.anchors.pop();
                        debug!(kind = %self.kind(), error = %e, "completing click rejected");
                        Err(e)
                    }
                };
            }
        }
        let n = self.anchors.len();
        if n == 1 {
            self.state = SessionState::Collecting(1);
            return Ok(Vec::new());
        }
        self.floating = Some(p);
        self.state = SessionState::Previewing(n);
        Ok(vec![Effect::Preview(self.preview())])
    }

    fn follow(&mut self, p: Point2D) -> Vec<Effect> {
        if self.anchors.is_empty() {
            return Vec::new();
        }
        // Freehand kinds keep every pointer position.
        if self.kind().is_freehand() {
            if let Some(previous) = self.floating {
                self.anchors.push(previous);
            }
        }
        self.floating = Some(p);
        self.state = SessionState::Previewing(self.anchors.len());
        vec![Effect::Preview(self.preview())]
    }

    fn right_click(&mut self) -> Result<Vec<Effect>, ShapeError> {
        match self.kind().completion() {
            Completion::RightClick { min } if self.anchors.len() >= min => {
                self.floating = None;
                self.finalize()
            }
            _ => Ok(Vec::new()),
        }
    }

    fn finalize(&mut self) -> Result<Vec<Effect>, ShapeError> {
        let outline = self.builder.build(self.anchors.as_slice())?;
        debug_assert!(outline.is_finite(), "{} finalized with NaN", self.kind());
        debug!(kind = %self.kind(), anchors = self.anchors.len(), "shape finalized");
        self.state = SessionState::Finalized;
        Ok(vec![
            Effect::ClearPreview,
            Effect::Finalized(FinishedShape {
                kind: self.kind(),
                anchors: self.anchors.clone(),
                outline,
            }),
        ])
    }

    // ========================================================================
    // Modifying
    // ========================================================================

    fn modify_event(
        &mut self,
        selected: Option<usize>,
        event: PointerEvent,
    ) -> Result<Vec<Effect>, ShapeError> {
        match (selected, event) {
            (_, PointerEvent::Cancel) => {
                if let Some(original) = self.original.clone() {
                    self.anchors = original;
                }
                debug!(kind = %self.kind(), "modify cancelled, anchors restored");
                self.finalize()
            }
            (None, PointerEvent::HandleClick(i)) if i < self.anchors.len() => {
                self.state = SessionState::Modifying(Some(i));
                Ok(Vec::new())
            }
            (None, PointerEvent::Click(_)) => self.finalize(),
            (Some(i), PointerEvent::Move(p)) => Ok(self.drag(i, p)),
            (Some(i), PointerEvent::Click(p)) => {
                let effects = self.drag(i, p);
                self.state = SessionState::Modifying(None);
                Ok(effects)
            }
            (Some(_), PointerEvent::HandleClick(_)) => {
                self.state = SessionState::Modifying(None);
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn drag(&mut self, index: usize, p: Point2D) -> Vec<Effect> {
        if self.anchors.set_anchor(index, p).is_none() {
            return Vec::new();
        }
        vec![
            Effect::Preview(self.preview()),
            Effect::Handles(self.anchors.as_slice().to_vec()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn session(kind: ShapeKind) -> InteractiveShapeSession {
        InteractiveShapeSession::draw(kind.builder())
    }

    fn finished(effects: &[Effect]) -> Option<&FinishedShape> {
        effects.iter().find_map(|e| match e {
            Effect::Finalized(shape) => Some(shape),
            _ => None,
        })
    }

    #[test]
    fn double_arrow_finishes_on_fourth_click() {
        let mut s = session(ShapeKind::DoubleArrow);
        let clicks = [
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(3.0, 6.0),
            dvec2(1.0, 6.0),
        ];
        for (i, p) in clicks.iter().take(3).enumerate() {
            let t = s.handle_event(PointerEvent::Click(*p)).unwrap();
            assert!(finished(&t.effects).is_none());
            if i == 0 {
                assert_eq!(t.state, SessionState::Collecting(1));
            } else {
                assert_eq!(t.state, SessionState::Previewing(i + 1));
            }
        }
        let t = s.handle_event(PointerEvent::Click(clicks[3])).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        let shape = finished(&t.effects).unwrap();
        assert_eq!(shape.anchors.len(), 4);
        assert!(shape.outline.closed);
        assert!(shape.outline.is_finite());
    }

    #[test]
    fn second_click_preview_is_finite() {
        let mut s = session(ShapeKind::DoubleArrow);
        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        let t = s.handle_event(PointerEvent::Click(dvec2(0.0, 1.0))).unwrap();
        match &t.effects[..] {
            [Effect::Preview(outline)] => assert!(outline.is_finite()),
            other => panic!("unexpected effects {other:?}"),
        }
        assert_eq!(s.floating(), Some(dvec2(0.0, 1.0)));
    }

    #[test]
    fn moves_replace_the_floating_anchor() {
        let mut s = session(ShapeKind::Polyline);
        // A move before the first click does nothing.
        let t = s.handle_event(PointerEvent::Move(dvec2(5.0, 5.0))).unwrap();
        assert_eq!(t.state, SessionState::Idle);
        assert!(t.effects.is_empty());

        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        s.handle_event(PointerEvent::Move(dvec2(1.0, 0.0))).unwrap();
        let t = s.handle_event(PointerEvent::Move(dvec2(2.0, 0.0))).unwrap();
        assert_eq!(t.state, SessionState::Previewing(1));
        assert_eq!(s.anchors().len(), 1);
        assert_eq!(
            t.effects,
            vec![Effect::Preview(Outline::polyline(vec![
                dvec2(0.0, 0.0),
                dvec2(2.0, 0.0)
            ]))]
        );
    }

    #[test]
    fn freehand_moves_commit_anchors() {
        let mut s = session(ShapeKind::FreehandPolyline);
        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        for x in 1..=4 {
            s.handle_event(PointerEvent::Move(dvec2(x as f64, 0.0))).unwrap();
        }
        assert_eq!(s.anchors().len(), 4);
        assert_eq!(s.floating(), Some(dvec2(4.0, 0.0)));

        let t = s.handle_event(PointerEvent::RightClick).unwrap();
        let shape = finished(&t.effects).unwrap();
        assert_eq!(shape.anchors.len(), 4);
        assert_eq!(shape.anchors.last(), Some(dvec2(3.0, 0.0)));
    }

    #[test]
    fn right_click_needs_the_minimum() {
        let mut s = session(ShapeKind::Polygon);
        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        s.handle_event(PointerEvent::Click(dvec2(1.0, 0.0))).unwrap();
        let t = s.handle_event(PointerEvent::RightClick).unwrap();
        assert_eq!(t.state, SessionState::Previewing(2));
        assert!(t.effects.is_empty());

        s.handle_event(PointerEvent::Click(dvec2(1.0, 1.0))).unwrap();
        let t = s.handle_event(PointerEvent::RightClick).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        assert_eq!(finished(&t.effects).unwrap().outline.len(), 3);
    }

    #[test]
    fn repeated_click_is_taken_back() {
        let mut s = session(ShapeKind::FineArrow);
        s.handle_event(PointerEvent::Click(dvec2(1.0, 1.0))).unwrap();
        let err = s.handle_event(PointerEvent::Click(dvec2(1.0, 1.0))).unwrap_err();
        assert!(matches!(err, ShapeError::NonFiniteOutline { .. }));
        assert_eq!(s.state(), SessionState::Collecting(1));
        assert_eq!(s.anchors().len(), 1);

        let t = s.handle_event(PointerEvent::Click(dvec2(1.0, 5.0))).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        let shape = finished(&t.effects).unwrap();
        assert_eq!(
            shape.anchors,
            AnchorList::from(vec![dvec2(1.0, 1.0), dvec2(1.0, 5.0)])
        );
    }

    #[test]
    fn collinear_arc_click_can_be_replaced() {
        let mut s = session(ShapeKind::Arc);
        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        s.handle_event(PointerEvent::Click(dvec2(1.0, 0.0))).unwrap();
        s.handle_event(PointerEvent::Move(dvec2(2.0, 0.0))).unwrap();
        assert!(s.handle_event(PointerEvent::Click(dvec2(2.0, 0.0))).is_err());
        assert_eq!(s.state(), SessionState::Previewing(2));
        assert_eq!(s.anchors().len(), 2);
        assert!(s.preview().is_finite());

        let t = s.handle_event(PointerEvent::Click(dvec2(1.0, 1.0))).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        let shape = finished(&t.effects).unwrap();
        assert_eq!(shape.anchors.len(), 3);
        assert!(shape.outline.is_finite());
    }

    #[test]
    fn right_click_is_ignored_by_click_count_kinds() {
        let mut s = session(ShapeKind::Circle);
        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        let t = s.handle_event(PointerEvent::RightClick).unwrap();
        assert_eq!(t.state, SessionState::Collecting(1));
    }

    #[test]
    fn marker_finishes_on_first_click() {
        let mut s = session(ShapeKind::Marker);
        let t = s.handle_event(PointerEvent::Click(dvec2(3.0, 4.0))).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        assert_eq!(
            finished(&t.effects).unwrap().outline.points,
            vec![dvec2(3.0, 4.0)]
        );
    }

    #[test]
    fn cancel_ends_a_draw_without_a_shape() {
        let mut s = session(ShapeKind::Sector);
        s.handle_event(PointerEvent::Click(dvec2(0.0, 0.0))).unwrap();
        s.handle_event(PointerEvent::Click(dvec2(0.0, 1.0))).unwrap();
        let t = s.handle_event(PointerEvent::Cancel).unwrap();
        assert_eq!(t.state, SessionState::Cancelled);
        assert_eq!(t.effects, vec![Effect::ClearPreview, Effect::Cancelled]);

        // Nothing happens afterwards.
        let t = s.handle_event(PointerEvent::Click(dvec2(1.0, 0.0))).unwrap();
        assert_eq!(t.state, SessionState::Cancelled);
        assert!(t.effects.is_empty());
    }

    fn circle_modify() -> InteractiveShapeSession {
        InteractiveShapeSession::modify(
            ShapeKind::Circle.builder(),
            AnchorList::from(vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0)]),
        )
    }

    #[test]
    fn modify_drags_one_anchor() {
        let mut s = circle_modify();
        assert_eq!(s.state(), SessionState::Modifying(None));

        // Moves without a selected handle do nothing.
        let t = s.handle_event(PointerEvent::Move(dvec2(9.0, 9.0))).unwrap();
        assert!(t.effects.is_empty());

        let t = s.handle_event(PointerEvent::HandleClick(1)).unwrap();
        assert_eq!(t.state, SessionState::Modifying(Some(1)));

        let t = s.handle_event(PointerEvent::Move(dvec2(2.0, 0.0))).unwrap();
        assert!(matches!(
            &t.effects[..],
            [Effect::Preview(_), Effect::Handles(h)] if h[1] == dvec2(2.0, 0.0)
        ));

        let t = s.handle_event(PointerEvent::Click(dvec2(3.0, 0.0))).unwrap();
        assert_eq!(t.state, SessionState::Modifying(None));
        assert_eq!(s.anchors()[1], dvec2(3.0, 0.0));
        assert_eq!(s.anchors().len(), 2);

        let t = s.handle_event(PointerEvent::Click(dvec2(50.0, 50.0))).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        let shape = finished(&t.effects).unwrap();
        assert_eq!(shape.anchors[1], dvec2(3.0, 0.0));
    }

    #[test]
    fn modify_ignores_unknown_handles() {
        let mut s = circle_modify();
        let t = s.handle_event(PointerEvent::HandleClick(7)).unwrap();
        assert_eq!(t.state, SessionState::Modifying(None));
    }

    #[test]
    fn modify_cancel_restores_anchors() {
        let mut s = circle_modify();
        s.handle_event(PointerEvent::HandleClick(0)).unwrap();
        s.handle_event(PointerEvent::Move(dvec2(-4.0, 2.0))).unwrap();
        let t = s.handle_event(PointerEvent::Cancel).unwrap();
        assert_eq!(t.state, SessionState::Finalized);
        let shape = finished(&t.effects).unwrap();
        assert_eq!(
            shape.anchors,
            AnchorList::from(vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0)])
        );
    }
}
