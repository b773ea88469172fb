use terrain_content::ContentFactory;
use terrain_core::{
    ErrorSeverity, GridCoord, HeadlessHost, HeadlessVisual, Level, PropId, RefreshFlags,
    TerrainConfig, TerrainController, TileVariant, VariantCatalog, WorldPoint,
};
use terrain_editor::{EditorConfig, EditorError, EditorSession, EditorTool, PointerEvent};

const CATALOG: &str = r#"(
    variants: {
        single_piece: "meshes/single_piece",
        triple_edge: "meshes/triple_edge",
        double_edge: "meshes/double_edge",
        single_edge: "meshes/single_edge",
        top: "meshes/top",
        corner: "meshes/corner",
    },
    props: ["props/rock", "props/bush"],
)"#;

fn session(config: EditorConfig) -> EditorSession<HeadlessHost> {
    terrain_editor::logging::init();

    let catalog: VariantCatalog = TileVariant::ALL
        .into_iter()
        .map(|variant| (variant, format!("meshes/{variant}")))
        .collect();
    let terrain = TerrainController::new(
        catalog,
        ["props/rock", "props/bush"].into_iter().collect(),
        TerrainConfig::default(),
        HeadlessHost::new(),
    )
    .expect("complete catalog");
    EditorSession::new(terrain, config)
}

fn at(x: i32, z: i32) -> GridCoord {
    GridCoord::new(x, z)
}

fn variant(session: &EditorSession<HeadlessHost>, x: i32, z: i32) -> Option<TileVariant> {
    session.terrain().tile_at(at(x, z)).map(|tile| tile.variant())
}

/// A 2×2 brush lays a square of corners; shift strokes carve it back out.
#[test]
fn brush_strokes_add_and_delete() {
    let mut session = session(EditorConfig::new().with_brush_size(2));

    let refresh = session
        .pointer(PointerEvent::at(1.2, 0.0, 1.4))
        .expect("stroke should succeed");
    assert_eq!(session.terrain().current_layer().len(), 4);
    for (x, z) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(variant(&session, x, z), Some(TileVariant::Corner));
        assert!(refresh.flags(Level::DEFAULT, at(x, z)).contains(RefreshFlags::MESH));
    }

    // Repeating the stroke over occupied cells changes nothing.
    let refresh = session
        .pointer(PointerEvent::at(1.0, 0.0, 1.0))
        .expect("stroke should succeed");
    assert!(refresh.is_empty());

    session.set_brush_size(1).expect("valid brush");
    let refresh = session
        .pointer(PointerEvent::at(1.0, 0.0, 1.0).with_shift())
        .expect("delete should succeed");
    assert_eq!(
        refresh.flags(Level::DEFAULT, at(1, 1)),
        RefreshFlags::REMOVED
    );
    assert_eq!(session.terrain().current_layer().len(), 3);
    assert_eq!(variant(&session, 1, 0), Some(TileVariant::TripleEdge));
    assert_eq!(variant(&session, 0, 0), Some(TileVariant::Corner));
    assert_eq!(session.terrain().host().live_count(), 3);
}

#[test]
fn delete_mode_never_adds() {
    let mut session = session(EditorConfig::new().with_delete_mode(true));

    let refresh = session
        .pointer(PointerEvent::at(0.0, 0.0, 0.0))
        .expect("stroke should succeed");
    assert!(refresh.is_empty());
    assert!(session.terrain().current_layer().is_empty());
}

#[test]
fn invalid_brush_is_rejected() {
    let mut session = session(EditorConfig::default());

    let error = session.set_brush_size(4).unwrap_err();
    assert!(matches!(error, EditorError::InvalidBrushSize { size: 4, .. }));
    assert_eq!(error.severity(), ErrorSeverity::Validation);
    assert_eq!(session.config().brush_size, 1);
}

#[test]
fn path_debugging_marks_painted_tiles() {
    let mut session = session(EditorConfig::new().with_path_debug(true));
    session.set_build_top_only(true).expect("rebuild");
    for x in 0..3 {
        session
            .pointer(PointerEvent::at(x as f32, 0.0, 0.0))
            .expect("stroke should succeed");
    }

    session.select_tool(EditorTool::Paths);
    session.set_path_index(1);
    let refresh = session
        .pointer(PointerEvent::at(0.2, 0.0, -0.3))
        .expect("paint should succeed");
    assert!(refresh.flags(Level::DEFAULT, at(0, 0)).contains(RefreshFlags::TEXTURE));

    let painted = session.terrain().tile_at(at(0, 0)).unwrap();
    assert_eq!(painted.path_texture(), Some(1));
    let visual = painted.visual().unwrap();
    assert!(session.terrain().host().is_debug_marked(visual));

    let refresh = session
        .pointer(PointerEvent::at(1.0, 0.0, 0.0))
        .expect("paint should succeed");
    assert_eq!(
        refresh.coords_on(Level::DEFAULT).collect::<Vec<_>>(),
        vec![at(0, 0), at(1, 0)]
    );
    assert_eq!(session.terrain().tile_at(at(0, 0)).unwrap().blend_index(), 4);
}

#[test]
fn painting_without_debug_leaves_visuals_unmarked() {
    let mut session = session(EditorConfig::default());
    session.set_build_top_only(true).expect("rebuild");
    session
        .pointer(PointerEvent::at(0.0, 0.0, 0.0))
        .expect("stroke should succeed");

    session.select_tool(EditorTool::Paths);
    session.set_path_index(1);
    session
        .pointer(PointerEvent::at(0.0, 0.0, 0.0))
        .expect("paint should succeed");

    let visual = session.terrain().tile_at(at(0, 0)).unwrap().visual().unwrap();
    assert!(!session.terrain().host().is_debug_marked(visual));
}

#[test]
fn props_follow_selection_and_snapping() {
    let mut session = session(EditorConfig::new().with_snap_to_grid(true));
    session.select_tool(EditorTool::Props);

    let refresh = session
        .pointer(PointerEvent::at(2.4, 0.3, 1.6))
        .expect("no selection is a no-op");
    assert!(refresh.is_empty());

    session.select_prop(Some(PropId(1)));
    let refresh = session
        .pointer(PointerEvent::at(2.4, 0.3, 1.6))
        .expect("prop placement should succeed");
    assert_eq!(refresh.flags(Level::DEFAULT, at(2, 2)), RefreshFlags::PROP);

    let props = session.terrain().layer(Level::DEFAULT).unwrap().props();
    assert_eq!(props.len(), 1);
    assert_eq!(props[0].position, WorldPoint::new(2.0, 0.0, 2.0));
    let visual = props[0].visual.unwrap();
    assert!(matches!(
        session.terrain().host().visual(visual),
        Some(HeadlessVisual::Prop { asset, .. }) if asset == "props/bush"
    ));

    session.select_prop(Some(PropId(9)));
    let refresh = session
        .pointer(PointerEvent::at(0.0, 0.0, 0.0))
        .expect("unknown prop is a no-op");
    assert!(refresh.is_empty());

    session.clear_layer();
    assert_eq!(session.terrain().host().live_count(), 0);
}

#[test]
fn levels_switch_and_clamp_at_ground() {
    let mut session = session(EditorConfig::default());
    session
        .pointer(PointerEvent::at(0.0, 0.0, 0.0))
        .expect("stroke should succeed");

    session.level_down();
    assert_eq!(session.level(), Level::GROUND);
    assert!(session.terrain().current_layer().is_empty());
    session.level_down();
    assert_eq!(session.level(), Level::GROUND);

    session
        .pointer(PointerEvent::at(5.0, 0.0, 5.0))
        .expect("stroke should succeed");
    session.level_up();
    assert_eq!(session.level(), Level::DEFAULT);
    assert_eq!(session.terrain().current_layer().len(), 1);
    assert_eq!(variant(&session, 0, 0), Some(TileVariant::SinglePiece));

    session.clear_all();
    assert_eq!(session.terrain().layers().count(), 0);
    assert_eq!(session.terrain().host().live_count(), 0);
}

#[test]
fn level_switch_follows_the_controller() {
    let mut session = session(EditorConfig::default());
    session
        .pointer(PointerEvent::at(0.0, 0.0, 0.0))
        .expect("stroke should succeed");

    session.terrain_mut().set_active_level(Level(4));
    assert!(session.terrain().current_layer().is_empty());

    session.set_level(Level::DEFAULT);
    assert_eq!(session.level(), Level::DEFAULT);
    assert_eq!(session.terrain().current_layer().len(), 1);
}

#[test]
fn starting_level_comes_from_config() {
    let session = session(EditorConfig::new().with_level(Level(3)));
    assert_eq!(session.level(), Level(3));
}

/// Opens a session from a data directory, saves a scene and loads it into a
/// second session.
#[test]
fn scenes_round_trip_through_the_data_dir() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("catalog.ron"), CATALOG).expect("write catalog");
    std::fs::write(temp.path().join("terrain.toml"), "path_index = 1\n").expect("write config");
    let factory = ContentFactory::new(temp.path());

    let mut first = EditorSession::open(&factory, HeadlessHost::new(), EditorConfig::default())
        .expect("session should open");
    assert_eq!(first.terrain().config().path_index, 1);
    first.set_brush_size(3).expect("valid brush");
    first
        .pointer(PointerEvent::at(1.0, 0.0, 1.0))
        .expect("stroke should succeed");
    assert_eq!(variant(&first, 0, 0), Some(TileVariant::Top));
    assert_eq!(variant(&first, -1, -1), Some(TileVariant::Corner));
    assert_eq!(variant(&first, 0, 1), Some(TileVariant::SingleEdge));
    first.save_scene(&factory, "square").expect("save scene");

    let mut second = EditorSession::open(&factory, HeadlessHost::new(), EditorConfig::default())
        .expect("session should open");
    second
        .load_scene(&factory, "square")
        .expect("load scene");
    assert_eq!(second.terrain().current_layer().len(), 9);
    assert_eq!(variant(&second, 0, 0), Some(TileVariant::Top));
    assert_eq!(variant(&second, 1, 1), Some(TileVariant::Corner));
    assert_eq!(second.terrain().host().live_count(), 9);
}

#[test]
fn missing_catalog_is_fatal() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let factory = ContentFactory::new(temp.path());

    let error = EditorSession::open(&factory, HeadlessHost::new(), EditorConfig::default())
        .err()
        .expect("no catalog");
    assert_eq!(error.severity(), ErrorSeverity::Fatal);
}
