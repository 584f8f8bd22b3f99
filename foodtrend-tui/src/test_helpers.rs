//! Test helpers for building small in-memory datasets

use foodtrend_core::record::{Dataset, Field, PriceRecord, PriceTable};

pub fn record(
    year: i32,
    month: i32,
    market: &str,
    country: &str,
    produce: &str,
    price: f64,
) -> PriceRecord {
    PriceRecord {
        year: Some(year),
        month: Some(month),
        market_type: Some(market.to_string()),
        country: Some(country.to_string()),
        produce: Some(produce.to_string()),
        price: Some(price),
    }
}

/// Three produce items, four countries, all three market types, 2009-2013.
pub fn sample_dataset() -> Dataset {
    let rows = vec![
        record(2009, 1, "Retail", "Kenya", "Maize", 900.0),
        record(2011, 1, "Retail", "Kenya", "Maize", 10.0),
        record(2011, 2, "Retail", "Kenya", "Maize", 12.0),
        record(2012, 1, "Wholesale", "Kenya", "Maize", 8.0),
        record(2012, 1, "Retail", "Benin", "Rice", 20.0),
        record(2012, 3, "Wholesale", "Benin", "Rice", 14.0),
        record(2013, 3, "Retail", "Mali", "Rice", 18.0),
        record(2013, 5, "Producer", "Ghana", "Beans", 3.0),
        record(2013, 6, "Producer", "Ghana", "Beans", 5.0),
        record(2013, 6, "Retail", "Ghana", "Beans", 6.0),
    ];
    let table = PriceTable::new("sample", Field::ALL.to_vec(), rows);
    Dataset::new(table.clone(), table)
}
