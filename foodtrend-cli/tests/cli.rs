//! End-to-end runs of the `foodtrend` binary against temp CSV files.

use std::path::Path;
use std::process::{Command, Output};

const CSV: &str = "\
Unnamed: 0,year,month,market_type,country,produce,price
0,2009,1,Retail,Kenya,Maize,900
1,2011,1,Retail,Kenya,Maize,10
2,2011,2,Retail,Kenya,Maize,12
3,2012,1,Wholesale,Kenya,Maize,8
4,2012,1,Retail,Benin,Rice,20
5,2012,3,Wholesale,Benin,Rice,14
6,2013,5,Producer,Ghana,Beans,3
7,2013,6,Producer,Ghana,Beans,5
8,2013,6,Retail,Ghana,Beans,6
";

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_foodtrend"))
        .current_dir(dir)
        .env("RUST_LOG", "error")
        .args(args)
        .output()
        .unwrap()
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bri1.csv"), CSV).unwrap();
    std::fs::write(dir.path().join("NewBri.csv"), CSV).unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn views_lists_eight_labels() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["views"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 8);
    assert!(text.lines().next().unwrap().ends_with("Data Preview"));
}

#[test]
fn options_follow_file_order() {
    let dir = workspace();
    let output = run(dir.path(), &["options", "market-type"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Retail\nWholesale\nProducer\n");
}

#[test]
fn report_text_with_defaults() {
    let dir = workspace();
    let output = run(dir.path(), &["report", "comparison-by-market-type", "--defaults"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[Price Trend Over Time for Maize - Retail]"));
    assert!(text.contains("y range: 11.00 .. 900.00"));
}

#[test]
fn report_csv_rows() {
    let dir = workspace();
    let output = run(
        dir.path(),
        &["report", "price-trends-by-produce", "--produce", "Rice", "--format", "csv"],
    );
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "chart,series,x,y\nPrice Trend Over Time - Rice,Rice,2012,17\n"
    );
}

#[test]
fn report_json_for_item_trend_has_supplementary_text() {
    let dir = workspace();
    let output = run(
        dir.path(),
        &["report", "Price Trend by Item", "--format", "json"],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let texts: Vec<&str> = value["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["kind"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();
    assert_eq!(
        texts.last().copied(),
        Some("Market type offering the lowest average price: Producer with mean price 4.00")
    );
}

#[test]
fn missing_data_files_fail() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["report", "data-preview"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Bri1.csv"));
}
