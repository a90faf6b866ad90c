//! Workspace-level scenario test: a small calibration campaign end to end
//!
//! Exercises the whole stack through the facade: namespace setup, schema
//! creation, text ingestion, resolution across variations and time, and
//! the append-only correction flow.

use condb::{
    Database, Error, NewAssignment, Page, Provider, MemoryProvider, QueryMode, SortOrder,
    Timestamp,
};

const PEDESTALS: &str = "/hall-b/calo/pedestals";

fn setup_campaign() -> Database {
    let mut db = Database::with_user("calib-shift");
    db.make_directory("hall-b", "/", "hall B detectors").unwrap();
    db.make_directory("calo", "/hall-b", "").unwrap();
    db.create_table(
        "pedestals",
        "/hall-b/calo",
        3,
        &[
            ("channel".to_string(), "uint".to_string()),
            ("pedestal".to_string(), "double".to_string()),
            ("good".to_string(), "bool".to_string()),
        ],
        "per-channel pedestals",
    )
    .unwrap();
    db
}

#[test]
fn calibration_campaign_round_trip() {
    let mut db = setup_campaign();

    // first pass comes from a text file with comments and a quoted cell
    let first_pass = "\
# channel  pedestal  good
0 101.5 true
1 \"98.25\" true
2 0 false  # dead channel
";
    db.create_assignment_from_text(PEDESTALS, first_pass, 1000, 1999, "default", "first pass")
        .unwrap();

    // a corrected second pass arrives later; append, never overwrite
    db.create_assignment(
        NewAssignment::new(
            PEDESTALS,
            vec![
                vec!["0".into(), "101.7".into(), "true".into()],
                vec!["1".into(), "98.30".into(), "true".into()],
                vec!["2".into(), "0".into(), "false".into()],
            ],
            1000,
            1999,
        )
        .comment("second pass after temperature correction"),
    )
    .unwrap();

    // the latest wins for the hot path
    let latest = db
        .get_constants(PEDESTALS, 1500, "default", QueryMode::Latest, true)
        .unwrap();
    assert_eq!(latest.version, 2);
    assert_eq!(latest.data.get(0, 1), Some("101.7"));

    // the first pass stays reachable by version
    let v1 = db
        .get_constants(PEDESTALS, 1500, "default", QueryMode::Version(1), false)
        .unwrap();
    assert_eq!(v1.data.get(1, 1), Some("98.25"));

    // typed extraction through the column metadata
    let columns = latest.columns.as_ref().unwrap();
    let cell = columns[1]
        .column_type
        .parse_cell(latest.data.get(0, 1).unwrap())
        .unwrap();
    assert_eq!(cell.as_double(), Some(101.7));
    assert!(columns[2]
        .column_type
        .parse_cell(latest.data.get(2, 2).unwrap())
        .is_ok());

    // both versions are listed in creation order
    let history = db
        .get_assignments(
            PEDESTALS,
            Some(1500),
            Some("default"),
            None,
            SortOrder::CreatedAsc,
            Page::ALL,
        )
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].version(), 1);
    assert_eq!(history[1].version(), 2);
}

#[test]
fn monte_carlo_variation_is_isolated() {
    let mut db = setup_campaign();
    db.create_assignment(
        NewAssignment::new(
            PEDESTALS,
            vec![
                vec!["0".into(), "100.0".into(), "true".into()],
                vec!["1".into(), "100.0".into(), "true".into()],
                vec!["2".into(), "100.0".into(), "true".into()],
            ],
            0,
            u32::MAX,
        )
        .variation("mc"),
    )
    .unwrap();

    assert!(db
        .get_constants(PEDESTALS, 42, "mc", QueryMode::Latest, false)
        .is_ok());
    assert!(matches!(
        db.get_constants(PEDESTALS, 42, "default", QueryMode::Latest, false),
        Err(Error::AssignmentNotFound { .. })
    ));
}

#[test]
fn as_of_queries_replay_history() {
    let mut db = setup_campaign();
    let row = |p: &str| {
        vec![
            vec!["0".into(), p.to_string(), "true".into()],
            vec!["1".into(), p.to_string(), "true".into()],
            vec!["2".into(), p.to_string(), "true".into()],
        ]
    };
    for (secs, pedestal) in [(100u64, "1.0"), (200, "2.0"), (300, "3.0")] {
        db.create_assignment(
            NewAssignment::new(PEDESTALS, row(pedestal), 0, 9999)
                .created_at(Timestamp::from_secs(secs)),
        )
        .unwrap();
    }

    let replayed = db
        .get_constants(
            PEDESTALS,
            1,
            "default",
            QueryMode::AsOf(Timestamp::from_secs(250)),
            false,
        )
        .unwrap();
    assert_eq!(replayed.data.get(0, 1), Some("2.0"));

    assert!(db
        .get_constants(
            PEDESTALS,
            1,
            "default",
            QueryMode::AsOf(Timestamp::from_secs(50)),
            false,
        )
        .is_err());
}

#[test]
fn provider_boundary_matches_engine_behavior() {
    let mut provider = MemoryProvider::new();
    provider.connect("mem://").unwrap();
    provider.make_directory("hall-b", "/", "").unwrap();
    provider
        .create_type_table(
            "scale",
            "/hall-b",
            1,
            &[("factor".to_string(), "double".to_string())],
            "",
        )
        .unwrap();
    provider
        .create_assignment(NewAssignment::new(
            "/hall-b/scale",
            vec![vec!["0.98".to_string()]],
            0,
            100,
        ))
        .unwrap();

    let direct = provider
        .database()
        .get_constants("/hall-b/scale", 50, "default", QueryMode::Latest, false)
        .unwrap();
    let through_boundary = provider
        .get_constants("/hall-b/scale", 50, "default", QueryMode::Latest, false)
        .unwrap();
    assert_eq!(direct, through_boundary);
}
