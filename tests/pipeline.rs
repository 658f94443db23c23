use analytics::{AnalyticsEngine, AskInsight};
use configuration::AnalysisSettings;
use core_types::{DealFlagSource, EpisodeKey};
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::Path;
use std::process::Command;

const SHEET: &str = "\
Season Number,Episode Number,Pitch Number,Brand Name,Idea,Pitcher Ask Amount,Ask Valuation,Ask Equity,Deal,Deal Amount,Deal Valuation,Deal Equity,Amount Per Shark,Ashneer Deal,Peyush Deal,Aman Deal
1,1,1,Alpha,Snacks,\"₹1,20,00,000\",\"₹12,00,00,000\",10%,Yes,\"₹1,20,00,000\",\"₹12,00,00,000\",10%,\"₹60,00,000\",1,1,0
1,1,2,Beta,Shoes,\"₹90,00,000\",\"₹9,00,00,000\",10%,No,,,,,0,0,0
1,2,3,Gamma,Tea,100,1000,10%,Yes,120,1200,10%,120,0,0,1
1,2,4,Delta,Bags,500,5000,10%,No,,,,,0,0,0
1,2,4,Delta,Bags,500,5000,10%,No,,,,,0,0,0
";

fn write_sheet(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sheet.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SHEET.as_bytes()).unwrap();
    path
}

#[test]
fn cleans_and_analyzes_a_decorated_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sheet(dir.path());

    let (dataset, cleaning) = cleaner::load_and_clean(&path).unwrap();
    assert_eq!(cleaning.rows_read, 5);
    assert_eq!(cleaning.duplicates_removed, 1);
    assert_eq!(
        cleaning.deal_flag_source,
        DealFlagSource::ExplicitColumn {
            column: "deal".into()
        }
    );
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.roster().names(), &["ashneer", "peyush", "aman"]);
    assert_eq!(dataset.records()[0].pitcher_ask_amount, Some(12_000_000.0));
    assert_eq!(dataset.records()[0].deal_equity, Some(10.0));
    assert_eq!(dataset.records()[0].sharks_invested_count(), 2);

    let report = AnalyticsEngine::new(AnalysisSettings::default()).calculate(&dataset);

    assert_eq!(report.deals.total_pitches, 4);
    assert_eq!(report.deals.successful_deals, 2);
    assert_eq!(report.deals.deal_percentage, Some(dec!(50.00)));

    // 12,000,000 is above the threshold, 9,000,000 is not.
    assert_eq!(report.high_ask.pitches, 1);
    assert_eq!(report.high_ask.with_deal, 1);

    assert_eq!(report.over_ask_deals.len(), 1);
    let over = &report.over_ask_deals[0];
    assert_eq!(over.brand_name.as_deref(), Some("Gamma"));
    assert_eq!((over.ask_amount, over.deal_amount), (100.0, 120.0));

    // Every shark joined at least one deal; none is NaN.
    assert!(report.shark_roi.iter().all(|s| s.roi.is_finite()));
    assert_eq!(report.multi_shark.pitches, 1);
    assert_eq!(
        report.busiest_episode.map(|e| e.episode),
        Some(EpisodeKey::Number(1))
    );
    assert_eq!(report.ask_outcome.insight, AskInsight::NoClearPattern);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn shark_joining_only_unpriced_deals_has_zero_roi() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    std::fs::write(
        &path,
        "Episode Number,Pitcher Ask Amount,Ask Valuation,Ask Equity,Deal Amount,Deal Valuation,Deal Equity,Amount Per Shark,Namita Deal,Vineeta Deal,Anupam Deal\n\
         1,100,1000,10,100,1000,10,100,1,0,0\n\
         1,200,2000,10,,,,,0,1,0\n\
         2,100,1000,10,,,,,0,0,0\n",
    )
    .unwrap();

    let (dataset, cleaning) = cleaner::load_and_clean(&path).unwrap();
    assert_eq!(cleaning.deal_flag_source, DealFlagSource::DerivedFromAmount);

    let report = AnalyticsEngine::default().calculate(&dataset);
    let ranking: Vec<(&str, usize, f64)> = report
        .shark_roi
        .iter()
        .map(|s| (s.shark.as_str(), s.deals, s.roi))
        .collect();
    // Anupam never joined a pitch and is left out of the ranking.
    assert_eq!(ranking, vec![("namita", 1, 0.1), ("vineeta", 1, 0.0)]);
    assert_eq!(report.deals.successful_deals, 1);
    // The default named sharks are not on this roster.
    assert!(report.warnings.iter().any(|w| w.contains("ashneer")));
}

#[test]
fn workbook_source_goes_through_the_same_cleaning() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sheet.xlsx");

    let (dataset, cleaning) = cleaner::load_and_clean(&path).unwrap();
    assert_eq!(cleaning.rows_read, 2);
    assert_eq!(
        cleaning.deal_flag_source,
        DealFlagSource::ExplicitColumn {
            column: "deal".into()
        }
    );
    assert_eq!(dataset.roster().names(), &["ashneer", "peyush"]);

    let first = &dataset.records()[0];
    assert_eq!(first.episode, Some(EpisodeKey::Number(1)));
    assert_eq!(first.pitcher_ask_amount, Some(12_000_000.0));
    assert_eq!(first.ask_equity, Some(10.0));
    assert!(first.deal_flag);
    assert_eq!(first.sharks_invested_count(), 2);
    assert!(!dataset.records()[1].deal_flag);
    assert_eq!(dataset.records()[1].deal_amount, None);

    let report = AnalyticsEngine::default().calculate(&dataset);
    assert_eq!(report.deals.deal_percentage, Some(dec!(50.00)));
}

#[test]
fn missing_required_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sheet.csv");
    std::fs::write(&path, "Episode Number,Deal Amount\n1,100\n").unwrap();

    let err = cleaner::load_and_clean(&path).unwrap_err();
    assert!(matches!(err, cleaner::CleanerError::MissingColumn(_)), "{err}");
}

#[test]
fn binary_prints_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sheet(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_pitch-eda"))
        .arg("--input")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .arg("--no-charts")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["report"]["deals"]["successful_deals"], 2);
    assert_eq!(value["cleaning"]["duplicates_removed"], 1);
    assert!(!dir.path().join("charts").exists());
}

#[test]
fn binary_reports_a_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_pitch-eda"))
        .arg("--input")
        .arg(dir.path().join("nope.csv"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.csv"));
}
