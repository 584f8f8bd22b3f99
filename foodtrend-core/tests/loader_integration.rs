//! Integration tests for CSV loading against files written to a temp dir.

use std::path::{Path, PathBuf};

use foodtrend_core::loader::{load_table, DatasetCache, DatasetPaths, LoadError};
use foodtrend_core::record::Field;

const BASE_CSV: &str = "\
Unnamed: 0,year,month,market_type,country,produce,price
0,2019,1,Retail,Kenya,Maize,10.5
1,2019.0,2,Wholesale,Kenya,Maize,8
2,n/a,3,Retail,Benin,Rice,12
3,2020,13.5,Producer,Benin,Rice,
4,2021,4,Retail,Ghana,Beans,abc
";

const EXTENDED_CSV: &str = "\
,year,month,market_type,country,produce,price,currency
0,2019,1,Retail,Kenya,Maize,10.5,KES
1,2019,x,Retail,Kenya,Maize,11.5,KES
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn pandas_index_column_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "base.csv", BASE_CSV);
    let table = load_table("base", &path).unwrap();
    assert_eq!(table.columns, Field::ALL.to_vec());
    assert_eq!(table.len(), 5);
}

#[test]
fn blank_index_header_and_unknown_columns_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "ext.csv", EXTENDED_CSV);
    let table = load_table("extended", &path).unwrap();
    assert_eq!(table.columns, Field::ALL.to_vec());
    // Non-integral month is coerced in the extended table too.
    assert_eq!(table.records[1].month, None);
    assert_eq!(table.records[1].price, Some(11.5));
}

#[test]
fn numeric_columns_are_coerced_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "base.csv", BASE_CSV);
    let table = load_table("base", &path).unwrap();
    let r = &table.records;

    assert_eq!(r[0].year, Some(2019));
    assert_eq!(r[0].price, Some(10.5));
    assert_eq!(r[1].year, Some(2019));
    assert_eq!(r[2].year, None);
    assert_eq!(r[2].country.as_deref(), Some("Benin"));
    assert_eq!(r[3].month, None);
    assert_eq!(r[3].price, None);
    assert_eq!(r[4].price, None);
}

#[test]
fn missing_price_column_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "year,country\n2019,Kenya\n");
    let err = load_table("base", &path).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "price"));
}

#[test]
fn missing_file_is_a_csv_error() {
    let err = load_table("base", Path::new("/nonexistent/Bri1.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Csv { .. }));
    assert!(err.to_string().contains("Bri1.csv"));
}

#[test]
fn cache_reads_files_only_once() {
    let dir = tempfile::tempdir().unwrap();
    let base = write(dir.path(), "Bri1.csv", BASE_CSV);
    let extended = write(dir.path(), "NewBri.csv", EXTENDED_CSV);
    let cache = DatasetCache::new(DatasetPaths::new(&base, &extended));
    assert!(!cache.is_loaded());

    let first = cache.get_or_load().unwrap();
    assert!(cache.is_loaded());

    std::fs::remove_file(&base).unwrap();
    std::fs::remove_file(&extended).unwrap();

    let second = cache.get_or_load().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(second.base.len(), 5);
    assert_eq!(second.extended.len(), 2);
}

#[test]
fn failed_load_is_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("Bri1.csv");
    let extended = write(dir.path(), "NewBri.csv", EXTENDED_CSV);
    let cache = DatasetCache::new(DatasetPaths::new(&base, &extended));

    assert!(cache.get_or_load().is_err());
    assert!(!cache.is_loaded());

    write(dir.path(), "Bri1.csv", BASE_CSV);
    assert!(cache.get_or_load().is_ok());
}
