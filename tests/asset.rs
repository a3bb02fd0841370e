use glam::IVec2;
use pacman_sim::asset::SpriteAtlas;
use pacman_sim::constants::{MapTile, DEFAULT_LAYOUT};
use pacman_sim::error::{GameError, MapError, ParseError, RulesError};
use pacman_sim::map::builder::Map;
use pacman_sim::rules::Ruleset;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

const CANONICAL: &str = r#"{
    "id": "square",
    "version": "2",
    "width": 4,
    "height": 3,
    "tileSize": 16,
    "tiles": [
        [1, 1, 1, 1],
        [1, 2, 3, 1],
        [1, 0, 2, 1]
    ],
    "playerSpawn": {"x": 1, "y": 2},
    "ghostSpawns": [{"x": 2, "y": 1}]
}"#;

fn map_error(json: &str) -> MapError {
    match Map::from_json(json) {
        Err(GameError::Map(error)) => error,
        other => panic!("expected a map error, got {other:?}"),
    }
}

#[test]
fn test_canonical_map_loads() {
    let map = Map::from_json(CANONICAL).unwrap();

    assert_that(&map.id()).is_equal_to("square");
    assert_that(&map.version()).is_equal_to("2");
    assert_that(&map.tile_size()).is_equal_to(16);
    assert_that(&(map.width(), map.height())).is_equal_to((4, 3));
    assert_that(&map.pellet_count()).is_equal_to(3);
    assert_that(&map.player_spawn()).is_equal_to(IVec2::new(1, 2));
    assert_eq!(map.ghost_spawns(), &[IVec2::new(2, 1)]);
    assert_that(&map.tiles().get(IVec2::new(2, 1))).is_equal_to(Some(MapTile::PowerPellet));
    assert_that(&map.graph().node_count()).is_equal_to(4);
}

#[test]
fn test_fractional_spawns_round_to_tiles() {
    let json = CANONICAL.replace(r#"{"x": 1, "y": 2}"#, r#"{"x": 1.4, "y": 1.6}"#);
    let map = Map::from_json(&json).unwrap();
    assert_that(&map.player_spawn()).is_equal_to(IVec2::new(1, 2));
}

#[test]
fn test_missing_metadata() {
    let json = CANONICAL.replace(r#""id": "square","#, "");
    assert_eq!(map_error(&json), MapError::MissingField("id"));

    let json = CANONICAL.replace(r#""version": "2","#, "");
    assert_eq!(map_error(&json), MapError::MissingField("version"));
}

#[test]
fn test_invalid_dimensions() {
    let json = r#"{"id": "m", "version": "1", "width": 0, "height": 1, "tiles": [[0]]}"#;
    assert_eq!(map_error(json), MapError::InvalidDimensions { width: 0, height: 1 });
}

#[test]
fn test_empty_tiles() {
    let json = r#"{"id": "m", "version": "1", "width": 1, "height": 1, "tiles": []}"#;
    assert_eq!(map_error(json), MapError::EmptyTiles);
}

#[test]
fn test_grid_must_match_declared_size() {
    let json = r#"{"id": "m", "version": "1", "width": 2, "height": 2, "tiles": [[2, 2]]}"#;
    assert_eq!(map_error(json), MapError::HeightMismatch { expected: 2, found: 1 });

    let json = r#"{"id": "m", "version": "1", "width": 2, "height": 2, "tiles": [[2, 2], [2]]}"#;
    assert_eq!(
        map_error(json),
        MapError::NonRectangular {
            row: 1,
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_unknown_tile_code() {
    let json = r#"{"id": "m", "version": "1", "width": 2, "height": 1, "tiles": [[2, 7]]}"#;
    assert_eq!(map_error(json), MapError::UnknownTileCode { code: 7, x: 1, y: 0 });

    let json = r#"{"id": "m", "version": "1", "width": 2, "height": 1, "tiles": [[-1, 2]]}"#;
    assert_eq!(map_error(json), MapError::UnknownTileCode { code: -1, x: 0, y: 0 });
}

#[test]
fn test_all_walls_rejected() {
    let json = r#"{"id": "m", "version": "1", "width": 2, "height": 1, "tiles": [[1, 1]]}"#;
    assert_eq!(map_error(json), MapError::NoWalkableTiles);
}

#[test]
fn test_spawn_validation() {
    let on_wall = CANONICAL.replace(r#"{"x": 1, "y": 2}"#, r#"{"x": 0, "y": 0}"#);
    assert_that(&matches!(
        map_error(&on_wall),
        MapError::InvalidSpawn {
            what: "Player",
            reason: "on a wall",
            ..
        }
    ))
    .is_true();

    let outside = CANONICAL.replace(r#"[{"x": 2, "y": 1}]"#, r#"[{"x": 9, "y": 1}]"#);
    assert_that(&matches!(
        map_error(&outside),
        MapError::InvalidSpawn {
            what: "Ghost",
            reason: "outside the grid",
            ..
        }
    ))
    .is_true();
}

#[test]
fn test_malformed_json() {
    assert_that(&matches!(Map::from_json("{"), Err(GameError::Json(_)))).is_true();
    assert_that(&matches!(Ruleset::from_json(r#""nope""#), Err(GameError::Json(_)))).is_true();
}

#[test]
fn test_canonical_type_errors_are_descriptive() {
    let json = CANONICAL.replace(r#""width": 4"#, r#""width": "ten""#);
    let error = Map::from_json(&json).unwrap_err();

    assert_that(&matches!(error, GameError::Json(_))).is_true();
    assert_that(&error.to_string().contains("invalid type")).is_true();
}

#[test]
fn test_legacy_map_defaults_to_built_in_layout() {
    let map = Map::from_json("{}").unwrap();
    let built_in = Map::from_layout(&DEFAULT_LAYOUT).unwrap();

    assert_that(&map.id()).is_equal_to("legacy");
    assert_that(&map.tiles()).is_equal_to(built_in.tiles());
    assert_that(&map.player_spawn()).is_equal_to(IVec2::new(3, 3));
    assert_eq!(map.ghost_spawns(), &[IVec2::new(6, 3)]);

    let empty_layout = Map::from_json(r#"{"id": "blank", "layout": []}"#).unwrap();
    assert_that(&empty_layout.id()).is_equal_to("blank");
    assert_that(&empty_layout.tiles()).is_equal_to(built_in.tiles());
}

#[test]
fn test_legacy_legend_override() {
    let json = r#"{
        "layout": ["XsX", "X*X", "XgX"],
        "legend": {"X": "wall", "s": "player", "*": "power-pellet", "g": "ghost"}
    }"#;
    let map = Map::from_json(json).unwrap();

    assert_that(&map.player_spawn()).is_equal_to(IVec2::new(1, 0));
    assert_eq!(map.ghost_spawns(), &[IVec2::new(1, 2)]);
    assert_that(&map.tiles().get(IVec2::new(1, 1))).is_equal_to(Some(MapTile::PowerPellet));
    assert_that(&map.tiles().get(IVec2::new(0, 1))).is_equal_to(Some(MapTile::Wall));
}

#[test]
fn test_legacy_unknown_characters_are_empty() {
    let map = Map::from_json(r##"{"layout": ["#P-.#"]}"##).unwrap();

    assert_that(&map.tiles().get(IVec2::new(2, 0))).is_equal_to(Some(MapTile::Empty));
    assert_that(&map.tiles().get(IVec2::new(3, 0))).is_equal_to(Some(MapTile::Pellet));
    assert_that(&map.player_spawn()).is_equal_to(IVec2::new(1, 0));
}

#[test]
fn test_legacy_layout_errors() {
    let ragged = Map::from_json(r##"{"layout": ["#P.", "#"]}"##);
    assert_that(&matches!(ragged, Err(GameError::MapParse(ParseError::RaggedRow { row: 1, .. })))).is_true();

    let long_key = Map::from_json(r#"{"layout": ["P"], "legend": {"ab": "wall"}}"#);
    assert_that(&matches!(long_key, Err(GameError::MapParse(ParseError::InvalidLegendKey(_))))).is_true();
}

#[test]
fn test_rules_load_with_defaults_for_optional_fields() {
    let json = r#"{
        "tickRate": 30,
        "pelletScore": 10,
        "powerPelletScore": 50,
        "ghostScore": 200,
        "powerModeDurationMs": 6000
    }"#;
    let rules = Ruleset::from_json(json).unwrap();
    let defaults = Ruleset::default();

    assert_that(&rules.tick_rate).is_equal_to(30.0);
    assert_that(&rules.step_ms()).is_close_to(33.333, 1e-3);
    assert_that(&rules.power_pellet_score).is_equal_to(50.0);
    assert_that(&rules.player_speed).is_equal_to(defaults.player_speed);
    assert_that(&rules.starting_lives).is_equal_to(defaults.starting_lives);
}

#[test]
fn test_rules_accept_negative_and_fractional_scores() {
    let rules = Ruleset::from_json(
        r#"{"tickRate": 60, "pelletScore": 2.5, "powerPelletScore": -1, "ghostScore": 200, "powerModeDurationMs": 1}"#,
    )
    .unwrap();

    assert_that(&rules.pellet_score).is_equal_to(2.5);
    assert_that(&rules.power_pellet_score).is_equal_to(-1.0);
}

#[test]
fn test_rules_validation() {
    let rules = |json: &str| match Ruleset::from_json(json) {
        Err(GameError::Rules(error)) => error,
        other => panic!("expected a rules error, got {other:?}"),
    };

    assert_eq!(
        rules(r#"{"pelletScore": 10, "powerPelletScore": 50, "ghostScore": 200, "powerModeDurationMs": 1}"#),
        RulesError::MissingField("tickRate")
    );
    assert_that(&matches!(
        rules(r#"{"tickRate": 0, "pelletScore": 10, "powerPelletScore": 50, "ghostScore": 200, "powerModeDurationMs": 1}"#),
        RulesError::OutOfRange { field: "tickRate", .. }
    ))
    .is_true();
    assert_that(&matches!(
        rules(r#"{"tickRate": 60, "pelletScore": 10, "powerPelletScore": 50, "ghostScore": 200, "powerModeDurationMs": 1, "startingLives": 1.5}"#),
        RulesError::OutOfRange { field: "startingLives", .. }
    ))
    .is_true();
    assert_that(&matches!(
        rules(r#"{"tickRate": 60, "pelletScore": 10, "powerPelletScore": 50, "ghostScore": 200, "powerModeDurationMs": -5}"#),
        RulesError::OutOfRange { field: "powerModeDurationMs", .. }
    ))
    .is_true();
}

#[test]
fn test_atlas_is_optional_metadata() {
    let atlas = SpriteAtlas::from_json(r#"{"version": "1", "basePath": "sprites/", "sprites": {"player": {"frame": [0, 0, 16, 16]}}}"#)
        .unwrap();

    assert_that(&atlas.base_path.as_str()).is_equal_to("sprites/");
    assert_that(&atlas.frame("player").map(|f| f.frame)).is_equal_to(Some([0.0, 0.0, 16.0, 16.0]));
    assert_that(&SpriteAtlas::from_json("{}").is_err()).is_true();
}
