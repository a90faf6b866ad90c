//! End-to-end resolution behavior of the engine
//!
//! Covers the resolution algorithm through the public `Database` surface:
//! determinism, version monotonicity, as-of-time correctness, variation
//! scoping, shape validation and the deletion guards.

use condb_core::{Error, Page, Timestamp};
use condb_engine::{Database, NewAssignment, QueryMode};

const GAINS: &str = "/test/calo/gains";

fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(|s| s.to_string()).collect())
        .collect()
}

/// Two-row, two-column table at /test/calo/gains
fn database_with_table() -> Database {
    let mut db = Database::new();
    db.make_directory("test", "/", "").unwrap();
    db.make_directory("calo", "/test", "").unwrap();
    db.create_table(
        "gains",
        "/test/calo",
        2,
        &[
            ("channel".to_string(), "int".to_string()),
            ("gain".to_string(), "double".to_string()),
        ],
        "per-channel calorimeter gains",
    )
    .unwrap();
    db
}

fn gains_rows(tag: &str) -> Vec<Vec<String>> {
    rows(&[&["0", tag], &["1", tag]])
}

#[test]
fn resolves_latest_deterministically() {
    let mut db = database_with_table();
    for i in 0..3u64 {
        db.create_assignment(
            NewAssignment::new(GAINS, gains_rows(&format!("{i}.5")), 0, 999)
                .created_at(Timestamp::from_secs(100 + i)),
        )
        .unwrap();
    }

    let first = db
        .get_constants(GAINS, 500, "default", QueryMode::Latest, false)
        .unwrap();
    let second = db
        .get_constants(GAINS, 500, "default", QueryMode::Latest, false)
        .unwrap();
    assert_eq!(first.assignment, second.assignment);
    assert_eq!(first.created, Timestamp::from_secs(102));
}

#[test]
fn version_numbers_are_one_to_n_in_creation_order() {
    let mut db = database_with_table();
    let mut ids = Vec::new();
    for i in 0..5u64 {
        ids.push(
            db.create_assignment(
                NewAssignment::new(GAINS, gains_rows("1.0"), 0, 999)
                    .created_at(Timestamp::from_secs(10 + i)),
            )
            .unwrap(),
        );
    }

    for (k, id) in ids.iter().enumerate() {
        let found = db
            .get_constants(GAINS, 42, "default", QueryMode::Version(k as u32 + 1), false)
            .unwrap();
        assert_eq!(found.assignment, *id);
        assert_eq!(found.version, k as u32 + 1);
    }

    let past_end = db.get_constants(GAINS, 42, "default", QueryMode::Version(6), false);
    assert!(matches!(past_end, Err(Error::AssignmentNotFound { .. })));
}

#[test]
fn as_of_time_never_falls_forward() {
    let mut db = database_with_table();
    let times = [
        Timestamp::from_secs(1000),
        Timestamp::from_secs(2000),
        Timestamp::from_secs(3000),
    ];
    for t in times {
        db.create_assignment(NewAssignment::new(GAINS, gains_rows("1.0"), 0, 999).created_at(t))
            .unwrap();
    }

    let at_t2 = db
        .get_constants(GAINS, 7, "default", QueryMode::AsOf(times[1]), false)
        .unwrap();
    assert_eq!(at_t2.created, times[1]);

    let between = db
        .get_constants(
            GAINS,
            7,
            "default",
            QueryMode::AsOf(Timestamp::from_secs(2500)),
            false,
        )
        .unwrap();
    assert_eq!(between.created, times[1]);

    let before_everything = db.get_constants(
        GAINS,
        7,
        "default",
        QueryMode::AsOf(times[0].just_before()),
        false,
    );
    assert!(matches!(
        before_everything,
        Err(Error::AssignmentNotFound { .. })
    ));
}

#[test]
fn variation_match_is_exact_without_chain_walking() {
    let mut db = database_with_table();
    db.create_variation("mc", None, "").unwrap();
    db.create_variation("mc-2024", Some("mc"), "").unwrap();
    db.create_assignment(
        NewAssignment::new(GAINS, gains_rows("2.0"), 0, 999)
            .variation("mc")
            .created_at(Timestamp::from_secs(50)),
    )
    .unwrap();

    let mc = db
        .get_constants(GAINS, 10, "mc", QueryMode::Latest, false)
        .unwrap();
    assert_eq!(mc.data.get(0, 1), Some("2.0"));

    // the child variation inherits nothing implicitly
    assert!(db
        .get_constants(GAINS, 10, "mc-2024", QueryMode::Latest, false)
        .is_err());
    // nor does default see mc data
    assert!(db
        .get_constants(GAINS, 10, "default", QueryMode::Latest, false)
        .is_err());
    // the chain is still available to calling layers as a hint
    let chain = db.variation_chain("mc-2024").unwrap();
    let names: Vec<&str> = chain.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["mc-2024", "mc", "default"]);
}

#[test]
fn run_must_fall_inside_the_range() {
    let mut db = database_with_table();
    db.create_assignment(
        NewAssignment::new(GAINS, gains_rows("1.0"), 100, 200)
            .created_at(Timestamp::from_secs(5)),
    )
    .unwrap();

    assert!(db
        .get_constants(GAINS, 100, "default", QueryMode::Latest, false)
        .is_ok());
    assert!(db
        .get_constants(GAINS, 200, "default", QueryMode::Latest, false)
        .is_ok());
    assert!(db
        .get_constants(GAINS, 99, "default", QueryMode::Latest, false)
        .is_err());
    assert!(db
        .get_constants(GAINS, 201, "default", QueryMode::Latest, false)
        .is_err());
}

#[test]
fn short_and_full_granularities() {
    let mut db = database_with_table();
    db.create_assignment(
        NewAssignment::new(GAINS, gains_rows("1.5"), 0, 999)
            .comment("calibrated after magnet swap")
            .created_at(Timestamp::from_secs(5)),
    )
    .unwrap();

    let bare = db
        .get_constants(GAINS, 1, "default", QueryMode::Latest, false)
        .unwrap();
    assert!(bare.columns.is_none());
    assert_eq!(bare.data.n_rows(), 2);

    let with_columns = db
        .get_constants(GAINS, 1, "default", QueryMode::Latest, true)
        .unwrap();
    let columns = with_columns.columns.unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1].name, "gain");

    let full = db
        .get_assignment(GAINS, 1, "default", QueryMode::Latest)
        .unwrap();
    assert_eq!(full.run_range.min(), 0);
    assert_eq!(full.run_range.max(), 999);
    assert_eq!(full.variation.name(), "default");
    assert_eq!(full.table.name(), "gains");
    assert_eq!(full.comment, "calibrated after magnet swap");
}

#[test]
fn creation_validates_shape_with_no_partial_write() {
    let mut db = database_with_table();

    let wrong_rows = db.create_assignment(NewAssignment::new(GAINS, rows(&[&["0", "1.0"]]), 0, 9));
    assert!(matches!(wrong_rows, Err(Error::RowCountMismatch { expected: 2, actual: 1 })));

    let ragged = db.create_assignment(NewAssignment::new(
        GAINS,
        rows(&[&["0", "1.0"], &["1"]]),
        0,
        9,
    ));
    assert!(matches!(ragged, Err(Error::ColumnCountMismatch { .. })));

    let wrong_cols = db.create_assignment(NewAssignment::new(
        GAINS,
        rows(&[&["0"], &["1"]]),
        0,
        9,
    ));
    assert!(matches!(
        wrong_cols,
        Err(Error::ColumnCountMismatch { expected: 2, actual: 1, .. })
    ));

    let inverted = db.create_assignment(NewAssignment::new(GAINS, gains_rows("1.0"), 9, 0));
    assert!(matches!(inverted, Err(Error::InvalidRunRange { .. })));

    // nothing was written by any failed attempt
    assert!(db
        .get_constants(GAINS, 5, "default", QueryMode::Latest, false)
        .is_err());
    assert!(db.delete_table(GAINS).is_ok());
}

#[test]
fn table_deletion_is_guarded_by_assignments() {
    let mut db = database_with_table();
    let id = db
        .create_assignment(NewAssignment::new(GAINS, gains_rows("1.0"), 0, 9))
        .unwrap();

    let blocked = db.delete_table(GAINS);
    assert!(matches!(blocked, Err(Error::TableInUse { assignments: 1, .. })));

    db.delete_assignment(id).unwrap();
    assert!(db.delete_table(GAINS).is_ok());
    assert!(matches!(
        db.table(GAINS, false),
        Err(Error::TableNotFound { .. })
    ));
}

#[test]
fn named_run_range_must_exist() {
    let mut db = database_with_table();
    let missing = db.create_assignment(
        NewAssignment::new(GAINS, gains_rows("1.0"), 0, 0).named_range("commissioning"),
    );
    assert!(matches!(missing, Err(Error::RunRangeNotFound { .. })));

    db.get_or_create_run_range(500, 600, Some("commissioning"), "")
        .unwrap();
    db.create_assignment(
        NewAssignment::new(GAINS, gains_rows("1.0"), 0, 0).named_range("commissioning"),
    )
    .unwrap();
    assert!(db
        .get_constants(GAINS, 550, "default", QueryMode::Latest, false)
        .is_ok());
}

#[test]
fn assignment_from_text_respects_the_grammar() {
    let mut db = database_with_table();
    let text = "0 1.25 # first channel\n1 \"2.5\"\n";
    db.create_assignment_from_text(GAINS, text, 0, 99, "default", "")
        .unwrap();

    let found = db
        .get_constants(GAINS, 50, "default", QueryMode::Latest, false)
        .unwrap();
    assert_eq!(found.data.get(0, 1), Some("1.25"));
    assert_eq!(found.data.get(1, 1), Some("2.5"));

    // five tokens cannot fill a 2x2 matrix
    let uneven = db.create_assignment_from_text(GAINS, "0 1 2 3 4", 0, 99, "default", "");
    assert!(matches!(uneven, Err(Error::ColumnCountMismatch { .. })));
}

#[test]
fn recursive_directory_delete_cascades() {
    let mut db = database_with_table();
    db.create_assignment(NewAssignment::new(GAINS, gains_rows("1.0"), 0, 9))
        .unwrap();

    // non-recursive deletion is blocked at every level
    assert!(matches!(
        db.delete_directory("/test"),
        Err(Error::DirectoryNotEmpty { .. })
    ));

    db.delete_directory_recursive("/test").unwrap();
    assert!(matches!(
        db.directory("/test/calo"),
        Err(Error::DirectoryNotFound { .. })
    ));
    assert!(matches!(
        db.table(GAINS, false),
        Err(Error::TableNotFound { .. })
    ));
}

#[test]
fn listings_compose_search_and_paging() {
    let mut db = database_with_table();
    db.create_table(
        "offsets",
        "/test/calo",
        1,
        &[("offset".to_string(), "double".to_string())],
        "",
    )
    .unwrap();

    let all = db.search_tables("*", None, false, Page::ALL).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|t| !t.columns_loaded()));

    let by_path = db
        .search_tables("calo/*", Some("/test"), false, Page::ALL)
        .unwrap();
    assert_eq!(by_path.len(), 2);

    let paged = db.search_tables("*", None, false, Page::new(1, 1)).unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(paged[0].name(), all[1].name());

    assert_eq!(db.count_tables("/test/calo").unwrap(), 2);
    assert_eq!(db.tables_in("/test/calo", true).unwrap().len(), 2);
}

#[test]
fn run_range_and_variation_listings_follow_assignments() {
    let mut db = database_with_table();
    db.create_assignment(NewAssignment::new(GAINS, gains_rows("1.0"), 0, 99))
        .unwrap();
    db.create_assignment(
        NewAssignment::new(GAINS, gains_rows("2.0"), 100, 199).variation("mc"),
    )
    .unwrap();

    let ranges = db.run_ranges_of_table(GAINS, None, Page::ALL).unwrap();
    assert_eq!(ranges.len(), 2);
    assert_eq!((ranges[0].min(), ranges[0].max()), (0, 99));

    let mc_only = db.run_ranges_of_table(GAINS, Some("mc"), Page::ALL).unwrap();
    assert_eq!(mc_only.len(), 1);
    assert_eq!(mc_only[0].min(), 100);

    let variations = db.variations_of_table(GAINS, None, Page::ALL).unwrap();
    let names: Vec<&str> = variations.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["default", "mc"]);

    let covering_150 = db.variations_of_table(GAINS, Some(150), Page::ALL).unwrap();
    assert_eq!(covering_150.len(), 1);
    assert_eq!(covering_150[0].name(), "mc");
}

#[test]
fn ids_survive_structural_churn() {
    let mut db = database_with_table();
    let before = db.revision();
    let held = db.directory("/test/calo").unwrap();

    db.make_directory("tracker", "/test", "").unwrap();
    assert!(db.revision() > before);

    // the held id still resolves to the same path after the mutation
    assert_eq!(
        db.directory_path(held.id()).as_deref(),
        Some("/test/calo")
    );
}
