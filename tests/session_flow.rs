//! Drives the controller with synthetic pointer sequences against the SVG host.

use glam::dvec2;
use tacplot::{
    AnchorList, PlotError, Plotter, RenderHost, ScreenEvent, ScreenPos, SessionError,
    SessionState, ShapeError, ShapeKind, SvgHost, Viewport,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 1 ground unit per 10 px, ground (0, 0) at screen (0, 100).
fn plotter() -> Plotter<SvgHost> {
    init_tracing();
    let viewport = Viewport::try_new(dvec2(0.0, 10.0), 0.1, 100.0, 100.0).expect("viewport");
    Plotter::new(SvgHost::new(viewport))
}

/// Screen position of a ground point under [`plotter`]'s viewport.
fn at(x: f64, y: f64) -> ScreenPos {
    ScreenPos::new(x * 10.0, 100.0 - y * 10.0)
}

fn click(x: f64, y: f64) -> ScreenEvent {
    ScreenEvent::LeftClick(at(x, y))
}

fn hover(x: f64, y: f64) -> ScreenEvent {
    ScreenEvent::MouseMove(at(x, y))
}

fn run(plotter: &mut Plotter<SvgHost>, events: &[ScreenEvent]) {
    for event in events {
        plotter.handle_screen_event(*event).expect("event");
    }
}

#[test]
fn pincer_arrow_from_four_clicks() {
    let mut p = plotter();
    p.start_draw(ShapeKind::DoubleArrow).unwrap();
    run(
        &mut p,
        &[
            click(1.0, 1.0),
            hover(3.0, 1.0),
            click(5.0, 1.0),
            hover(4.5, 5.0),
            click(4.5, 6.0),
            hover(2.0, 6.0),
        ],
    );
    // Still drawing: one preview primitive on screen.
    assert_eq!(p.active_state(), Some(SessionState::Previewing(3)));
    assert_eq!(p.host().len(), 1);

    run(&mut p, &[click(1.5, 6.0)]);
    assert!(!p.is_busy());
    let shape = &p.shapes()[0];
    assert_eq!(shape.kind, ShapeKind::DoubleArrow);
    assert_eq!(shape.anchors.len(), 4);
    assert!((shape.anchors[2] - dvec2(4.5, 6.0)).length() < 1e-9);
    assert!(shape.outline.is_finite());
    assert_eq!(p.host().len(), 1);
    assert_eq!(p.host().to_svg_string().matches("<polygon").count(), 1);
}

#[test]
fn attack_arrow_finishes_on_right_click() {
    let mut p = plotter();
    p.start_draw(ShapeKind::TailedAttackArrow).unwrap();
    run(&mut p, &[click(1.0, 1.0), click(3.0, 1.0), ScreenEvent::RightClick]);
    // Two anchors are not enough.
    assert!(p.is_busy());

    run(
        &mut p,
        &[
            hover(2.5, 4.0),
            click(2.5, 5.0),
            hover(3.0, 7.0),
            click(3.5, 8.0),
            ScreenEvent::RightClick,
        ],
    );
    assert!(!p.is_busy());
    assert_eq!(p.shapes()[0].anchors.len(), 4);
    assert_eq!(p.shapes()[0].kind, ShapeKind::TailedAttackArrow);
}

#[test]
fn double_click_on_a_fine_arrow_can_be_retried() {
    let mut p = plotter();
    p.start_draw(ShapeKind::FineArrow).unwrap();
    run(&mut p, &[click(2.0, 2.0)]);
    let err = p.handle_screen_event(click(2.0, 2.0)).unwrap_err();
    assert!(matches!(
        err,
        PlotError::Shape(ShapeError::NonFiniteOutline { .. })
    ));
    assert!(p.is_busy());
    assert_eq!(p.active_state(), Some(SessionState::Collecting(1)));
    assert!(p.host().is_empty());

    run(&mut p, &[click(2.0, 7.0)]);
    assert!(!p.is_busy());
    assert_eq!(p.shapes()[0].anchors.len(), 2);
    assert_eq!(p.host().len(), 1);
}

#[test]
fn busy_controller_rejects_new_operations() {
    let mut p = plotter();
    p.start_draw(ShapeKind::Lune).unwrap();
    run(&mut p, &[click(1.0, 1.0)]);
    assert_eq!(p.start_draw(ShapeKind::Circle), Err(SessionError::Busy));
    assert_eq!(
        p.select_at(at(1.0, 1.0)),
        Err(SessionError::Busy)
    );
    let err = p.start_draw(ShapeKind::Circle).unwrap_err();
    assert_eq!(err.to_string(), "previous operation must finish first");
}

#[test]
fn escape_discards_the_draw() {
    let mut p = plotter();
    p.start_draw(ShapeKind::GatheringPlace).unwrap();
    run(&mut p, &[click(1.0, 1.0), click(4.0, 1.0), hover(2.0, 3.0)]);
    assert_eq!(p.host().len(), 1);

    run(&mut p, &[ScreenEvent::Escape]);
    assert!(!p.is_busy());
    assert!(p.shapes().is_empty());
    assert!(p.host().is_empty());
}

#[test]
fn select_drag_and_cancel() {
    let mut p = plotter();
    let id = p
        .create_by_data(
            ShapeKind::Circle,
            AnchorList::from(vec![dvec2(5.0, 5.0), dvec2(7.0, 5.0)]),
        )
        .unwrap();
    let original = p.shape(id).unwrap().outline.clone();

    // Clicking inside the circle selects it.
    assert_eq!(p.select_at(at(5.5, 5.5)).unwrap(), Some(id));
    assert_eq!(p.active_state(), Some(SessionState::Modifying(None)));
    // Preview plus one handle per anchor.
    assert_eq!(p.host().len(), 3);

    run(&mut p, &[click(7.0, 5.0), hover(8.0, 5.0)]);
    assert_eq!(p.active_state(), Some(SessionState::Modifying(Some(1))));

    run(&mut p, &[ScreenEvent::Escape]);
    assert!(!p.is_busy());
    let shape = p.shape(id).unwrap();
    assert_eq!(shape.outline, original);
    assert_eq!(p.host().len(), 1);
}

#[test]
fn select_drag_and_commit() {
    let mut p = plotter();
    let id = p
        .create_by_data(
            ShapeKind::Sector,
            AnchorList::from(vec![dvec2(2.0, 2.0), dvec2(2.0, 6.0), dvec2(6.0, 2.0)]),
        )
        .unwrap();
    // The sector sweeps counter-clockwise from north round to east.
    assert_eq!(p.select_at(at(1.0, 1.0)).unwrap(), Some(id));

    // Grab the third handle, drag it, and drop it away from any handle.
    run(&mut p, &[click(6.0, 2.0), hover(5.0, 5.0), click(7.0, 7.0)]);
    assert_eq!(p.active_state(), Some(SessionState::Modifying(None)));
    run(&mut p, &[click(9.0, 9.5)]);
    assert!(!p.is_busy());

    let shape = p.shape(id).unwrap();
    assert_eq!(shape.anchors.len(), 3);
    assert!((shape.anchors[2] - dvec2(7.0, 7.0)).length() < 1e-9);
    assert_eq!(p.store().get(ShapeKind::Sector)[0], shape.anchors);
}

#[test]
fn nothing_to_select_on_empty_ground() {
    let mut p = plotter();
    p.create_by_data(
        ShapeKind::Rectangle,
        AnchorList::from(vec![dvec2(1.0, 1.0), dvec2(2.0, 2.0)]),
    )
    .unwrap();
    assert_eq!(p.select_at(at(8.0, 8.0)).unwrap(), None);
    assert!(!p.is_busy());
    assert!(p.host().pick_ground_point(at(8.0, 8.0)).is_some());
}

#[test]
fn load_a_document_and_clear() {
    let mut p = plotter();
    let store = tacplot::PlotStore::from_source(
        "<test>",
        "marker (1, 1)\npolyline (0, 0) (2, 2) (4, 0)\nfinearrow (5, 1) (5, 8)\n",
    )
    .unwrap();
    let ids = p.load(&store).unwrap();
    assert_eq!(ids.len(), 3);
    assert_eq!(p.host().len(), 3);
    assert_eq!(p.store(), store);

    p.remove(ids[0]).unwrap();
    assert_eq!(p.host().len(), 2);
    p.clear_all();
    assert!(p.host().is_empty());
    assert!(p.store().is_empty());
}
