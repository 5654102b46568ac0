mod common;

use common::model;
use covgate::diff::{diff, LineDiffStatus};
use covgate::ingest::load;
use covgate::outcome::{classify, ResultCode};
use covgate::summary::FileStats;

/// Baseline {1:Hit, 2:Missed, 3:Missed} → candidate {1:Hit, 2:Hit, 3:Missed}.
#[test]
fn partially_fixed_file_is_ok() {
    let a = model(&[("f.py", &[(1, 1), (2, 0), (3, 0)])]);
    let b = model(&[("f.py", &[(1, 1), (2, 1), (3, 0)])]);

    let report = diff(&a, &b);
    let entry = &report.entries[0];

    assert_eq!(entry.missed_delta, -1);
    assert_eq!(entry.statements_delta, 0);
    assert_eq!(entry.status(2), LineDiffStatus::Covered);
    assert_eq!(entry.status(3), LineDiffStatus::StillUncovered);
    assert_eq!(classify(&report), ResultCode::Ok);
}

/// Baseline {1:Hit, 2:Hit} → candidate {1:Hit, 2:Missed}.
#[test]
fn newly_missed_line_worsens_coverage() {
    let a = model(&[("f.py", &[(1, 1), (2, 1)])]);
    let b = model(&[("f.py", &[(1, 1), (2, 0)])]);

    let report = diff(&a, &b);
    let entry = &report.entries[0];

    assert_eq!(entry.missed_delta, 1);
    assert_eq!(entry.status(2), LineDiffStatus::Uncovered);
    assert_eq!(classify(&report), ResultCode::CoverageWorsened);
}

/// A new uncovered statement while overall coverage improves elsewhere.
#[test]
fn new_uncovered_statement_with_better_total() {
    let a = model(&[
        ("f.py", &[(1, 1)]),
        ("g.py", &[(1, 0), (2, 0), (3, 0)]),
    ]);
    let b = model(&[
        ("f.py", &[(1, 1), (2, 0)]),
        ("g.py", &[(1, 1), (2, 1), (3, 1)]),
    ]);

    let report = diff(&a, &b);
    assert_eq!(report.entries[0].status(2), LineDiffStatus::Uncovered);
    assert!(report.total.coverage_rate_delta > 0.0);
    assert_eq!(classify(&report), ResultCode::UncoveredChangesRemain);
}

/// Deleting a covered line lowers the rate without adding a miss.
#[test]
fn rate_drop_without_new_misses_is_ok() {
    let a = model(&[("a.py", &[(1, 0), (2, 1)])]);
    let b = model(&[("a.py", &[(1, 0)])]);

    let report = diff(&a, &b);
    let entry = &report.entries[0];

    assert_eq!(entry.missed_delta, 0);
    assert_eq!(entry.statements_delta, -1);
    assert_eq!(entry.status(2), LineDiffStatus::Unchanged);
    assert_eq!(report.total.coverage_rate_delta, -50.0);
    assert_eq!(classify(&report), ResultCode::Ok);
}

#[test]
fn candidate_only_file_compares_against_nothing() {
    let a = model(&[("old.py", &[(1, 1)])]);
    let b = model(&[("old.py", &[(1, 1)]), ("new.py", &[(1, 1), (2, 0), (4, 0)])]);

    let report = diff(&a, &b);
    let entry = report.entry("new.py").unwrap();

    assert_eq!(entry.baseline, FileStats::empty("new.py"));
    assert_eq!(entry.statements_delta, 3);
    assert_eq!(entry.missed_delta, 2);
    assert!(entry
        .lines
        .iter()
        .all(|d| d.baseline == covgate::model::LineStat::NotTracked));
    assert_eq!(entry.status(1), LineDiffStatus::Covered);
    assert_eq!(entry.status(2), LineDiffStatus::Uncovered);
    assert_eq!(entry.missing_description(), "+2-4");
}

#[test]
fn fixtures_with_uncovered_changes() {
    let baseline = load(&common::fixture("baseline.xml")).unwrap();
    let candidate = load(&common::fixture("candidate.xml")).unwrap();

    let report = diff(&baseline, &candidate);
    let rows: Vec<_> = report
        .entries
        .iter()
        .map(|e| (e.path.as_str(), e.statements_delta, e.missed_delta))
        .collect();
    assert_eq!(
        rows,
        [
            ("dummy/dummy.py", 0, -2),
            ("dummy/dummy2.py", 2, 1),
            ("dummy/dummy3.py", 2, 2),
        ]
    );

    assert_eq!(report.total.statements_delta, 4);
    assert_eq!(report.total.missed_delta, 1);
    assert_eq!(report.entries[1].missing_description(), "+5");
    assert_eq!(report.entries[2].missing_description(), "+1-2");
    assert_eq!(classify(&report), ResultCode::UncoveredChangesRemain);
}

#[test]
fn fixtures_with_regression() {
    let baseline = load(&common::fixture("baseline.xml")).unwrap();
    let regressed = load(&common::fixture("regressed.xml")).unwrap();

    let report = diff(&baseline, &regressed);
    assert_eq!(report.entries[0].missing_description(), "4-5");
    assert_eq!(report.entries[1].missing_description(), "+2");
    assert_eq!(classify(&report), ResultCode::CoverageWorsened);
}

#[test]
fn total_equals_sum_of_entries() {
    let baseline = load(&common::fixture("baseline.xml")).unwrap();
    let candidate = load(&common::fixture("candidate.xml")).unwrap();
    let report = diff(&baseline, &candidate);

    let statements: i64 = report.entries.iter().map(|e| e.statements_delta).sum();
    let missed: i64 = report.entries.iter().map(|e| e.missed_delta).sum();
    assert_eq!(report.total.statements_delta, statements);
    assert_eq!(report.total.missed_delta, missed);

    let expected = (candidate.line_rate() - baseline.line_rate()) * 100.0;
    assert!((report.total.coverage_rate_delta - expected).abs() < 1e-9);
}
