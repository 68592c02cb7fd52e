//! Drives the core the way the terminal front end does: keys in, frames
//! stepped, render list and picks out.

use armrig_core::{
    App, IndexedMesh, InputOutcome, Key, KeyInput, MeshLibrary, Part, PickResult, Settings, Target,
};

fn app_with_boxes() -> (App, MeshLibrary) {
    let mut app = App::new(Settings::default()).unwrap();
    let mut library = MeshLibrary::new();
    for spec in armrig_core::STANDARD_RIG {
        let [w, h, d] = spec.fallback_size;
        let drawable = library.insert(IndexedMesh::cuboid(w, h, d));
        app.rig.attach_drawable(spec.part, drawable);
    }
    (app, library)
}

#[test]
fn edit_launch_land_and_aim() {
    let (mut app, library) = app_with_boxes();

    // Tilt arm2 a little before firing
    assert_eq!(
        app.handle_key(&KeyInput::press(Key::Char('2'))),
        InputOutcome::Selected(Target::Arm2)
    );
    for _ in 0..3 {
        app.handle_key(&KeyInput::press(Key::Down));
    }
    app.update(0.0);

    let selected: Vec<_> = app.render_items().into_iter().filter(|i| i.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].pick_id.map(|id| id.value()), Some(6));

    assert_eq!(app.handle_key(&KeyInput::press(Key::Char('s'))), InputOutcome::Launched);
    let impact = app.projectile.arc().unwrap().end();
    assert_eq!(impact.y, 0.0);

    // 30 fps frames until the landing frame reports an aim result
    let mut report = None;
    for _ in 0..60 {
        if let Some(r) = app.update(1.0 / 30.0) {
            report = Some(r);
            break;
        }
        assert!(app.projectile.is_launched());
        let items = app.render_items();
        assert_eq!(items.len(), 7);
        for item in items {
            assert!(library.get(item.drawable.handle).is_some());
        }
    }

    let report = report.expect("projectile never landed");
    assert!(report.iterations <= app.settings.aim_iterations);
    let pen = app.rig.graph.node(app.rig.id(Part::Pen)).world_position();
    assert!(((pen - impact).norm() - report.distance).abs() < 1e-4);

    // Back to idle: projectile hidden again
    assert!(!app.projectile.is_launched());
    assert_eq!(app.render_items().len(), 6);
}

#[test]
fn picks_name_parts_and_background() {
    let (mut app, _library) = app_with_boxes();
    assert_eq!(app.pick(255), PickResult::Background);
    assert_eq!(app.message(), "background");

    let PickResult::Object(id) = app.pick(3) else {
        panic!("expected an object pick");
    };
    assert_eq!(app.rig.part_for_pick(id), Some(Part::Top));
    assert_eq!(app.message(), "point 3");
}

#[test]
fn quit_keys() {
    let (mut app, _library) = app_with_boxes();
    assert_eq!(app.handle_key(&KeyInput::press(Key::Escape)), InputOutcome::Quit);
    assert_eq!(app.handle_key(&KeyInput::press(Key::Char('q'))), InputOutcome::Quit);
}
