//! End-to-end scenarios through the engine.

use windowpane::prelude::*;

fn square_engine() -> Engine {
    let mut engine = Engine::new(ViewerConfig {
        viewport_width: 100,
        viewport_height: 100,
        window_length: 100.0,
        window_width: 100.0,
        ..ViewerConfig::default()
    });
    engine.show_axes = false;
    engine
}

fn only_object(engine: &mut Engine) -> DeviceObject {
    let list = engine.update();
    assert_eq!(list.len(), 1, "expected one visible object, got {:?}", list);
    list[0].clone()
}

#[test]
fn line_is_clipped_at_left_border() {
    for method in [LineClipMethod::CohenSutherland, LineClipMethod::LiangBarsky] {
        let mut engine = square_engine();
        engine.set_clipping_method(method);
        engine
            .add_line("l", colors::RED, Vec3::xy(-10.0, 50.0), Vec3::xy(50.0, 50.0))
            .unwrap();

        let object = only_object(&mut engine);
        assert_eq!(
            object.primitives,
            vec![DevicePrimitive::Segment(Pixel::new(0, 50), Pixel::new(50, 50))],
            "{}",
            method
        );
    }
}

#[test]
fn point_outside_window_disappears() {
    let mut engine = square_engine();
    engine.add_point("far", colors::RED, Vec3::xy(150.0, 150.0)).unwrap();
    assert!(engine.update().is_empty());
}

#[test]
fn diamond_is_clipped_to_octagon() {
    let mut engine = square_engine();
    engine.begin_wireframe(false);
    for (x, y) in [(-10.0, 50.0), (50.0, -10.0), (110.0, 50.0), (50.0, 110.0)] {
        engine.push_wireframe_point(Vec3::xy(x, y));
    }
    engine.commit_wireframe("diamond", colors::BLUE).unwrap();

    let object = only_object(&mut engine);
    let [DevicePrimitive::Polygon(ring)] = object.primitives.as_slice() else {
        panic!("expected one polygon, got {:?}", object.primitives);
    };
    assert_eq!(ring.len(), 8);
    assert!(ring.iter().all(|p| (0..=100).contains(&p.x) && (0..=100).contains(&p.y)));
}

#[test]
fn panning_brings_objects_into_view() {
    let mut engine = square_engine();
    engine.add_point("far", colors::RED, Vec3::xy(150.0, 150.0)).unwrap();
    engine.pan(100.0, 100.0);

    let object = only_object(&mut engine);
    assert_eq!(object.primitives, vec![DevicePrimitive::Point(Pixel::new(50, 50))]);
}

#[test]
fn zoom_out_then_in_restores_the_frame() {
    let mut engine = square_engine();
    engine.add_line("l", colors::RED, Vec3::xy(10.0, 20.0), Vec3::xy(70.0, 90.0)).unwrap();
    let before = engine.update().to_vec();

    assert!(engine.zoom_out());
    let zoomed = engine.update().to_vec();
    assert_ne!(before, zoomed);

    assert!(engine.zoom_in());
    assert_eq!(engine.update(), before.as_slice());
}

#[test]
fn rotating_the_window_rotates_the_view() {
    let mut engine = square_engine();
    engine.add_line("h", colors::RED, Vec3::xy(30.0, 50.0), Vec3::xy(70.0, 50.0)).unwrap();
    engine.rotate_window(90.0, Axis::Z);

    let object = only_object(&mut engine);
    let [DevicePrimitive::Segment(a, b)] = object.primitives.as_slice() else {
        panic!("expected a segment");
    };
    // A horizontal line seen through a quarter-turned window is vertical.
    assert_eq!(a.x, b.x);
    assert_eq!((a.y - b.y).abs(), 40);
}

#[test]
fn curves_and_surfaces_are_tessellated() {
    let mut engine = square_engine();
    engine.begin_curve(PlotMethod::BSpline);
    for (x, y) in [(10.0, 10.0), (30.0, 90.0), (70.0, 90.0), (90.0, 10.0), (95.0, 50.0)] {
        engine.push_curve_point(Vec3::xy(x, y));
    }
    engine.commit_curve("spline", colors::RED).unwrap();

    let control: Vec<Vec3> = (0..16)
        .map(|i| Vec3::new(20.0 + (i % 4) as f64 * 20.0, 20.0 + (i / 4) as f64 * 20.0, 0.0))
        .collect();
    engine.add_surface("patch", colors::BLUE, control, false).unwrap();

    let list = engine.update();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].kind, ObjectKind::Curve);
    assert!(matches!(&list[0].primitives[..], [DevicePrimitive::Polyline(points)] if points.len() > 100));
    assert_eq!(list[1].kind, ObjectKind::Surface);
    assert_eq!(list[1].primitives.len(), 22);
}

#[test]
fn perspective_shrinks_distant_geometry() {
    let mut engine = square_engine();
    let id = engine
        .add_line("deep", colors::RED, Vec3::new(10.0, 50.0, 1000.0), Vec3::new(90.0, 50.0, 1000.0))
        .unwrap();

    let parallel = only_object(&mut engine);
    engine.set_projection_by_name("perspective").unwrap();
    let perspective = only_object(&mut engine);

    let width = |o: &DeviceObject| match o.primitives[0] {
        DevicePrimitive::Segment(a, b) => (a.x - b.x).abs(),
        _ => panic!("expected a segment"),
    };
    assert_eq!(width(&parallel), 80);
    assert_eq!(width(&perspective), 40);
    assert!(engine.object(id).is_some());
}

#[test]
fn painted_frame_contains_object_color() {
    let mut engine = square_engine();
    engine.begin_wireframe(true);
    for (x, y) in [(20.0, 20.0), (80.0, 20.0), (80.0, 80.0), (20.0, 80.0)] {
        engine.push_wireframe_point(Vec3::xy(x, y));
    }
    engine.commit_wireframe("square", colors::RED).unwrap();

    let mut canvas = Canvas::new(100, 100);
    Painter::new(colors::BACKGROUND, None).paint(&mut canvas, engine.update());
    assert_eq!(canvas.get_pixel(50, 50), Some(colors::RED));
    assert_eq!(canvas.get_pixel(5, 5), Some(colors::BACKGROUND));
}
