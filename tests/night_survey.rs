mod common;

use approx::assert_relative_eq;
use common::{circumpolar, hourly_table, night_start, southern, NIGHT_MJD};
use fastrot::airmass::airmass;
use fastrot::catalog::{CatalogEntry, InMemoryCatalog};
use fastrot::constants::RADEG;
use fastrot::ephemeris::tabulated::{EphemerisBook, TabulatedEphemeris};
use fastrot::visibility::ephemeris_lines;
use fastrot::{
    evaluate, score_and_rank, survey, survey_night, CandidateBody, CatalogFilter, FastRotError,
    NightWindow, ObjectNumber, ObservabilityParams, ObservationSite, Outcome, VisibilityStats,
};
use hifitime::Unit;

fn entry(id: u32, name: &str, period: f64) -> CatalogEntry {
    CatalogEntry {
        body: CandidateBody::new(id, name, period),
        aphelion: 2.2,
        perihelion: 1.4,
    }
}

/// 2001 and 3001 circle the pole (V 15.2 and 16.4), 4001 stays south, 5001 is too faint,
/// 6001 has a table for the wrong night and 7001 has none.
fn book() -> EphemerisBook {
    let mut book = EphemerisBook::new();
    book.insert(2001, circumpolar(16.4));
    book.insert(3001, circumpolar(15.2));
    book.insert(4001, southern(14.0));
    book.insert(5001, circumpolar(17.3));
    book.insert(
        6001,
        hourly_table(89.0, 15.0, NIGHT_MJD - 3.0, NIGHT_MJD - 2.0),
    );
    book
}

fn catalog() -> InMemoryCatalog {
    vec![
        entry(2001, "Einstein", 3.4),
        entry(3001, "(3001)", 2.2),
        entry(4001, "(4001)", 1.1),
        entry(5001, "(5001)", 0.9),
        entry(6001, "(6001)", 3.0),
        entry(7001, "(7001)", 2.6),
        // slow rotator, filtered out by the catalog
        entry(8001, "(8001)", 12.0),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_feder_night_window() {
    let site = ObservationSite::feder().unwrap();
    let window = NightWindow::for_night_default(&site, night_start()).unwrap();

    // sunset ~01:56 UTC, sunrise ~11:09 UTC, one hour cut on both sides
    let start = night_start() + Unit::Hour * 2 + Unit::Minute * 50;
    let end = night_start() + Unit::Hour * 10 + Unit::Minute * 15;
    assert!(window.start() > start && window.start() < start + Unit::Minute * 15);
    assert!(window.end() > end - Unit::Minute * 15 && window.end() < end);
}

#[test]
fn test_survey_night_at_feder() {
    let site = ObservationSite::feder().unwrap();
    let params = ObservabilityParams::default();
    let report = survey_night(
        &catalog(),
        &CatalogFilter::default(),
        &site,
        &book(),
        night_start(),
        &params,
    )
    .unwrap();

    let order: Vec<ObjectNumber> = report
        .candidates
        .iter()
        .map(|c| c.body.id.clone())
        .collect();
    assert_eq!(
        order,
        vec![
            ObjectNumber::Int(3001),
            ObjectNumber::Int(2001),
            ObjectNumber::Int(4001),
            ObjectNumber::Int(5001),
            ObjectNumber::Int(6001),
            ObjectNumber::Int(7001),
        ]
    );

    let best = &report.candidates[0];
    assert_eq!(best.outcome, Outcome::Pass);
    let stats = best.stats.unwrap();
    let window_minutes = report.window.duration().to_unit(Unit::Minute);
    assert!(f64::from(stats.minutes_visible) >= window_minutes.floor());
    assert!(f64::from(stats.minutes_visible) <= window_minutes.ceil());
    assert_relative_eq!(stats.peak_magnitude.unwrap(), 15.2, epsilon = 1e-9);
    // pole at 46.87°, body 1° off the pole
    let min_airmass = stats.min_airmass.unwrap();
    assert!(min_airmass > airmass(48.0 * RADEG) && min_airmass < airmass(46.0 * RADEG));

    // fine rows every 15 minutes over the whole window
    assert_eq!(
        best.ephemeris.len(),
        (window_minutes / 15.0).ceil() as usize
    );
    assert!(best
        .ephemeris
        .iter()
        .all(|line| report.window.contains(line.epoch)));

    assert_eq!(report.candidates[2].outcome, Outcome::Fail);
    assert_eq!(report.candidates[2].stats, Some(VisibilityStats::default()));
    assert_eq!(report.candidates[3].outcome, Outcome::Fail);
    assert!(report.candidates[3].stats.unwrap().minutes_visible > 0);
    assert!(matches!(report.candidates[4].outcome, Outcome::Error(_)));
    assert!(matches!(report.candidates[5].outcome, Outcome::Error(_)));
}

#[test]
fn test_evaluate_matches_survey() {
    let site = ObservationSite::feder().unwrap();
    let window = NightWindow::for_night_default(&site, night_start()).unwrap();
    let params = ObservabilityParams::default();
    let body = CandidateBody::new(2001, "Einstein", 3.4);
    let table = circumpolar(16.4);

    let direct = evaluate(&body, &window, &site, &table, 1, 3.0).unwrap();
    let report = survey(&[body.clone()], &window, &site, &book(), &params).unwrap();
    common::assert_stats_close(&report.candidates[0].stats.unwrap(), &direct, 1e-12);

    let lines = ephemeris_lines(&body, &window, &site, &table, 15, 3.0).unwrap();
    assert_eq!(lines, report.candidates[0].ephemeris);
}

#[test]
fn test_collaborator_errors_are_reported() {
    let site = ObservationSite::feder().unwrap();
    let window = NightWindow::for_night_default(&site, night_start()).unwrap();
    let stale = CandidateBody::new(6001, "(6001)", 3.0);
    let unknown = CandidateBody::new(7001, "(7001)", 2.6);

    let book = book();
    assert!(matches!(
        evaluate(&stale, &window, &site, &book, 1, 3.0),
        Err(FastRotError::EphemerisOutOfRange { .. })
    ));
    assert!(matches!(
        evaluate(&unknown, &window, &site, &book, 1, 3.0),
        Err(FastRotError::EphemerisUnavailable { .. })
    ));

    let evaluations = vec![
        (
            stale.clone(),
            evaluate(&stale, &window, &site, &book, 1, 3.0),
        ),
        (
            CandidateBody::new(2001, "Einstein", 3.4),
            evaluate(
                &CandidateBody::new(2001, "Einstein", 3.4),
                &window,
                &site,
                &book,
                1,
                3.0,
            ),
        ),
    ];
    let ranked = score_and_rank(&evaluations, 17.0, 60.0);
    assert_eq!(ranked[0].outcome, Outcome::Pass);
    match &ranked[1].outcome {
        Outcome::Error(reason) => assert!(reason.contains("6001")),
        other => panic!("expected an error outcome, got {other:?}"),
    }
}

#[test]
fn test_polar_summer_has_no_night() {
    let longyearbyen = ObservationSite::new(15.63, 78.22, 10.0, Some("Longyearbyen".into())).unwrap();
    let midsummer = hifitime::Epoch::from_gregorian_utc_at_midnight(2024, 6, 21);

    assert!(matches!(
        survey_night(
            &catalog(),
            &CatalogFilter::default(),
            &longyearbyen,
            &book(),
            midsummer,
            &ObservabilityParams::default()
        ),
        Err(FastRotError::SunEventNotFound { .. })
    ));
}

#[test]
fn test_csv_table_feeds_the_survey() {
    let site = ObservationSite::feder().unwrap();
    let window = NightWindow::for_night_default(&site, night_start()).unwrap();

    let mut csv = String::from("mjd_utc,ra_deg,dec_deg,mag\n");
    for h in 0..=24 {
        csv.push_str(&format!("{},{},89.0,16.0\n", NIGHT_MJD + h as f64 / 24.0, 10.0 + h as f64));
    }
    let table = TabulatedEphemeris::from_csv_reader(csv.as_bytes()).unwrap();
    let mut book = EphemerisBook::new();
    book.insert(433, table);

    let report = survey(
        &[CandidateBody::new(433, "Eros", 5.27)],
        &window,
        &site,
        &book,
        &ObservabilityParams::default(),
    )
    .unwrap();
    assert_eq!(report.passing().count(), 1);
}

#[test]
fn test_legacy_serialization() {
    let site = ObservationSite::feder().unwrap();
    let report = survey_night(
        &catalog(),
        &CatalogFilter::default(),
        &site,
        &book(),
        night_start(),
        &ObservabilityParams::default(),
    )
    .unwrap();

    let rows = serde_json::to_value(report.legacy_rows()).unwrap();
    let never_rising = &rows[2];
    assert_eq!(never_rising["id"], 4001);
    assert_eq!(never_rising["minutes_visible"], 0);
    assert_eq!(never_rising["peak_magnitude"], 0.0);
    assert_eq!(never_rising["min_airmass"], 20.0);
    assert_eq!(never_rising["score"], 100.0);
    assert_eq!(never_rising["passed"], false);
    assert_eq!(rows[5]["score"], 100.0);

    let full = serde_json::to_value(&report).unwrap();
    assert_eq!(full["candidates"][0]["outcome"]["status"], "PASS");
    assert_eq!(full["candidates"][2]["stats"]["peak_magnitude"], serde_json::Value::Null);
    assert_eq!(full["candidates"][5]["outcome"]["status"], "ERROR");
    assert_eq!(full["candidates"][5]["stats"], serde_json::Value::Null);
    assert!(full["window"]["start"].as_str().unwrap().starts_with("2016-08-03T02:5"));
    assert_eq!(full["params"]["fine_step_minutes"], 15);
}

#[test]
fn test_params_round_trip_through_config() {
    let params: ObservabilityParams =
        serde_json::from_str(r#"{ "mag_limit": 16.0, "coarse_step_minutes": 2 }"#).unwrap();
    assert_eq!(params.mag_limit, 16.0);
    assert_eq!(params.airmass_ceiling, 3.0);
    assert_eq!(params.coarse_step_minutes, 2);
    assert!(params.validate().is_ok());

    let bad: ObservabilityParams =
        serde_json::from_str(r#"{ "fine_step_minutes": 0 }"#).unwrap();
    let site = ObservationSite::feder().unwrap();
    let window = NightWindow::for_night_default(&site, night_start()).unwrap();
    assert!(matches!(
        survey(&[], &window, &site, &book(), &bad),
        Err(FastRotError::InvalidStep(_))
    ));
}
