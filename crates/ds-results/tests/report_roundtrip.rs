use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};
use ds_extract::{OutputExtractor, RecordField};
use ds_mixture::ProductSpecies;
use ds_results::{
    ReportStore, ResultFormat, ResultSet, SkippedPoint, SweepManifest, load_manifest, load_report,
};

const REPORT: &str = "\
 the shock velocity is 1.834E+03
   1.)  1.850E+01  4.400E-01   2967.3   -112.4
 co          gas     2.1000
 co2         gas     0.9000
 h2o         gas     3.2000
 n2          gas    26.1000
 total       gas    33.0000
 *c          soli    0.2500
";

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn sample_results() -> ResultSet {
    let extractor = OutputExtractor::new().expect("patterns compile");
    let mut record = extractor.extract(REPORT).expect("report extracts");
    record.specific_volume = Some(1234.567);

    let mut partial = extractor
        .extract(" the shock velocity is 1.512E+03\n")
        .expect("report extracts");
    partial.specific_volume = Some(987.25);

    let mut results = ResultSet::new();
    results.insert(0.01, record).unwrap();
    results.insert(0.45, partial).unwrap();
    results
}

fn manifest(format: ResultFormat) -> SweepManifest {
    SweepManifest {
        sweep_id: "abc".to_string(),
        timestamp: "2026-10-19T12:00:00+00:00".to_string(),
        base: "air".to_string(),
        variable: "acetylene".to_string(),
        chemistry: "acetylene".to_string(),
        format,
        completed: vec![0.01, 0.45],
        skipped: vec![SkippedPoint {
            concentration: 0.02,
            stage: "density_extracted".to_string(),
            reason: "Simulator diverged".to_string(),
        }],
        partial: Vec::new(),
    }
}

fn assert_same(a: &ResultSet, b: &ResultSet) {
    assert_eq!(a.concentrations(), b.concentrations());
    for (concentration, expected) in a.iter() {
        let actual = b.get(concentration).expect("row present");
        for field in RecordField::all() {
            match (field.get(expected), field.get(actual)) {
                (Some(x), Some(y)) => assert!((x - y).abs() <= 1e-9 * x.abs().max(1.0), "{field}"),
                (x, y) => assert_eq!(x, y, "{field}"),
            }
        }
    }
}

#[test]
fn csv_roundtrip_through_store() {
    let dir = unique_temp_dir("ds_results_csv");
    let store = ReportStore::new(dir.clone()).expect("store");
    let results = sample_results();
    let at = Local.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap();

    let saved = store
        .save_at(&results, &manifest(ResultFormat::Csv), at)
        .expect("save");
    assert_eq!(
        saved.report_path.file_name().unwrap().to_str().unwrap(),
        "results_2026-10-19_08-30-05.csv"
    );

    let loaded = load_report(&saved.report_path).expect("load");
    assert_same(&results, &loaded);
    assert_eq!(
        loaded.get(0.01).unwrap().product(ProductSpecies::N2),
        26.1
    );

    let manifest_back = load_manifest(&saved.manifest_path).expect("manifest");
    assert_eq!(manifest_back.skipped.len(), 1);
    assert_eq!(manifest_back.skipped[0].concentration, 0.02);
}

#[test]
fn same_second_saves_keep_both_reports() {
    let dir = unique_temp_dir("ds_results_same_second");
    let store = ReportStore::new(dir.clone()).expect("store");
    let at = Local.with_ymd_and_hms(2026, 10, 19, 8, 30, 5).unwrap();

    let mut first = sample_results();
    first.insert(0.5, Default::default()).unwrap();
    let first_saved = store
        .save_at(&first, &manifest(ResultFormat::Csv), at)
        .expect("first save");
    let second_saved = store
        .save_at(&sample_results(), &manifest(ResultFormat::Csv), at)
        .expect("second save");

    assert_ne!(first_saved.report_path, second_saved.report_path);
    assert_eq!(
        second_saved.report_path.file_name().unwrap().to_str().unwrap(),
        "results_2026-10-19_08-30-05_1.csv"
    );
    assert_eq!(
        second_saved.manifest_path.file_name().unwrap().to_str().unwrap(),
        "results_2026-10-19_08-30-05_1.manifest.json"
    );
    assert_eq!(load_report(&first_saved.report_path).unwrap().len(), 3);
    assert_eq!(load_report(&second_saved.report_path).unwrap().len(), 2);
    assert!(first_saved.manifest_path.exists());
}

#[test]
fn json_roundtrip_through_store() {
    let dir = unique_temp_dir("ds_results_json");
    let store = ReportStore::new(dir).expect("store");
    let results = sample_results();

    let saved = store
        .save(&results, &manifest(ResultFormat::Json))
        .expect("save");
    let content = fs::read_to_string(&saved.report_path).unwrap();
    assert!(content.contains("\"0.01\""));
    assert!(content.contains("\"product_total_gas\": 33.0"));

    let loaded = load_report(&saved.report_path).expect("load");
    assert_same(&results, &loaded);
    assert_eq!(loaded.get(0.45).unwrap().pressure, None);
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = unique_temp_dir("ds_results_ext");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("results.txt");
    fs::write(&path, "x").unwrap();
    assert!(load_report(&path).is_err());
}
