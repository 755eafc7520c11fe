use marionette_rig_core::{
    Component, DrawData, KeyTable, Mesh, Model, ParamKind, ParamSpec, ParamTable, ParamValues,
    RenderTarget, RigError, Transformer, TransformerKind, Vertex,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// 5-vertex quad with a dedicated center vertex at (cx, cy).
fn mk_square(cx: f32, cy: f32) -> Mesh {
    let mut mesh = Mesh::from_vertices(vec![
        Vertex::new(cx - 1.0, cy - 1.0),
        Vertex::new(cx + 1.0, cy - 1.0),
        Vertex::new(cx + 1.0, cy + 1.0),
        Vertex::new(cx - 1.0, cy + 1.0),
        Vertex::new(cx, cy),
    ]);
    mesh.center = 4;
    mesh.faces = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
    mesh
}

fn mk_point_mesh(points: &[(f32, f32)]) -> Mesh {
    Mesh::from_vertices(points.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
}

/// it should produce the same mesh whether reset runs once or twice
#[test]
fn reset_is_idempotent() {
    let mut component = Component::new("arm", mk_square(0.0, 0.0));
    component
        .current_mesh
        .translate_to_point_in_place(Vertex::new(7.0, -2.0));

    component.reset();
    let once = component.current_mesh.clone();
    component.reset();
    assert_eq!(component.current_mesh, once);

    // The parent-assigned position survived both resets.
    approx(component.current_mesh.center_vertex().x, 7.0, 1e-6);
    approx(component.current_mesh.center_vertex().y, -2.0, 1e-6);
}

/// it should move a child's center onto the parent's anchor in one pass
#[test]
fn anchor_propagation_positions_children() {
    let mut root_mesh = mk_square(0.0, 0.0);
    root_mesh.vertices.push(Vertex::new(5.0, 5.0));
    root_mesh.anchors.insert("eye".to_string(), 5);

    let mut root = Component::new("root", root_mesh);
    root.children.push(Component::new("eye", mk_square(0.0, 0.0)));

    let mut model = Model::new("rig", root, ParamTable::new());
    let report = model.set_parameters(&ParamValues::default());
    assert!(report.is_ok(), "unexpected failures: {:?}", report.failures);

    let eye = &model.root.children[0];
    approx(eye.current_mesh.center_vertex().x, 5.0, 1e-6);
    approx(eye.current_mesh.center_vertex().y, 5.0, 1e-6);
}

/// it should fall back to the last applied value when the map has no entry
#[test]
fn pipeline_falls_back_to_last_value() {
    let mut table = ParamTable::new();
    let angle = table.insert(ParamSpec {
        name: "angle".to_string(),
        kind: ParamKind::Continuous,
        min: -360.0,
        max: 360.0,
        default: 90.0,
    });

    let mut mesh = mk_point_mesh(&[(1.0, 0.0), (0.0, 0.0)]);
    mesh.center = 1;
    let mut arm = Component::new("arm", mesh);
    arm.pipeline.push(Transformer::new(
        angle,
        90.0,
        TransformerKind::Rotation { offset: 0.0 },
    ));

    let mut model = Model::new("rig", arm, table);

    // No value supplied: the seeded default of 90 (clockwise) applies.
    let report = model.set_parameters(&ParamValues::default());
    assert!(report.is_ok());
    approx(model.root.current_mesh.vertices[0].x, 0.0, 1e-5);
    approx(model.root.current_mesh.vertices[0].y, -1.0, 1e-5);
    assert_eq!(model.root.pipeline[0].last_value, 90.0);

    // Supplying a value updates the stored fallback.
    let mut values = ParamValues::default();
    values.insert("angle".to_string(), 180.0);
    model.set_parameters(&values);
    approx(model.root.current_mesh.vertices[0].x, -1.0, 1e-5);
    approx(model.root.current_mesh.vertices[0].y, 0.0, 1e-5);
    assert_eq!(model.root.pipeline[0].last_value, 180.0);

    // Absent again: the previously stored value is reused unchanged.
    model.set_parameters(&ParamValues::default());
    approx(model.root.current_mesh.vertices[0].x, -1.0, 1e-5);
    approx(model.root.current_mesh.vertices[0].y, 0.0, 1e-5);
}

/// it should ignore parameter names no component recognizes
#[test]
fn unknown_parameter_names_are_ignored() {
    let mut table = ParamTable::new();
    let angle = table.insert(ParamSpec {
        name: "angle".to_string(),
        kind: ParamKind::Continuous,
        min: -360.0,
        max: 360.0,
        default: 0.0,
    });

    let mut arm = Component::new("arm", mk_square(0.0, 0.0));
    arm.pipeline.push(Transformer::new(
        angle,
        0.0,
        TransformerKind::Rotation { offset: 0.0 },
    ));
    let mut model = Model::new("rig", arm, table);

    let mut values = ParamValues::default();
    values.insert("bogus".to_string(), 42.0);
    let report = model.set_parameters(&values);
    assert!(report.is_ok());
    assert_eq!(model.root.pipeline[0].last_value, 0.0);
}

/// it should abort only the failing component and keep siblings coherent
#[test]
fn shape_mismatch_aborts_one_branch_only() {
    let mut table = ParamTable::new();
    let blend = table.insert(ParamSpec {
        name: "blend".to_string(),
        kind: ParamKind::Continuous,
        min: 0.0,
        max: 10.0,
        default: 0.0,
    });

    let mut root_mesh = mk_square(0.0, 0.0);
    root_mesh.vertices.push(Vertex::new(-3.0, 0.0));
    root_mesh.vertices.push(Vertex::new(3.0, 0.0));
    root_mesh.anchors.insert("bad".to_string(), 5);
    root_mesh.anchors.insert("good".to_string(), 6);
    let mut root = Component::new("root", root_mesh);

    // Keyframe meshes with different vertex counts: interpolation between
    // them must fail at update time.
    let mut keys = KeyTable::new();
    keys.insert(0.0, mk_point_mesh(&[(0.0, 0.0), (1.0, 0.0)]));
    keys.insert(10.0, mk_point_mesh(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));
    let mut bad = Component::new("bad", mk_point_mesh(&[(0.0, 0.0), (1.0, 0.0)]));
    bad.pipeline
        .push(Transformer::new(blend, 0.0, TransformerKind::Substitution { keys }));

    let good = Component::new("good", mk_square(0.0, 0.0));
    root.children.push(bad);
    root.children.push(good);

    let mut model = Model::new("rig", root, table);
    let mut values = ParamValues::default();
    values.insert("blend".to_string(), 5.0);
    let report = model.set_parameters(&values);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].component, "root/bad");
    assert_eq!(
        report.failures[0].error,
        RigError::ShapeMismatch {
            expected: 2,
            actual: 3
        }
    );

    // The failed component holds its reset pose at the parent's anchor.
    let bad = &model.root.children[0];
    approx(bad.current_mesh.center_vertex().x, -3.0, 1e-6);
    approx(bad.current_mesh.center_vertex().y, 0.0, 1e-6);

    // The sibling was still positioned normally.
    let good = &model.root.children[1];
    approx(good.current_mesh.center_vertex().x, 3.0, 1e-6);
    approx(good.current_mesh.center_vertex().y, 0.0, 1e-6);
}

/// it should hand draw data to the target in level order, parents first
#[test]
fn render_delegates_in_level_order() {
    struct Recorder {
        names: Vec<String>,
        vertex_counts: Vec<usize>,
    }
    impl RenderTarget for Recorder {
        fn draw(&mut self, data: DrawData<'_>) {
            self.names.push(data.component.to_string());
            self.vertex_counts.push(data.vertices.len());
        }
    }

    let mut root_mesh = mk_square(0.0, 0.0);
    root_mesh.vertices.push(Vertex::new(-2.0, 0.0));
    root_mesh.vertices.push(Vertex::new(2.0, 0.0));
    root_mesh.anchors.insert("left".to_string(), 5);
    root_mesh.anchors.insert("right".to_string(), 6);
    let mut root = Component::new("root", root_mesh);

    let mut left_mesh = mk_square(0.0, 0.0);
    left_mesh.vertices.push(Vertex::new(0.0, -2.0));
    left_mesh.anchors.insert("tip".to_string(), 5);
    let mut left = Component::new("left", left_mesh);
    left.children
        .push(Component::new("tip", mk_square(0.0, 0.0)));
    root.children.push(left);
    root.children
        .push(Component::new("right", mk_square(0.0, 0.0)));

    let model = Model::new("rig", root, ParamTable::new());
    let mut recorder = Recorder {
        names: Vec::new(),
        vertex_counts: Vec::new(),
    };
    model.render(&mut recorder);

    assert_eq!(recorder.names, vec!["root", "left", "right", "tip"]);
    assert_eq!(recorder.vertex_counts[0], 7);
}
