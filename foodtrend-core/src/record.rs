//! Price tables: typed rows with explicit missing values.
//!
//! Both source files share one row shape. Every field is optional: a file may
//! lack a column entirely, and unparseable numeric cells are stored as `None`
//! rather than rejected.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain columns recognised in the source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Year,
    Month,
    MarketType,
    Country,
    Produce,
    Price,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Year,
        Field::Month,
        Field::MarketType,
        Field::Country,
        Field::Produce,
        Field::Price,
    ];

    /// Column header as it appears in the CSV files.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::MarketType => "market_type",
            Field::Country => "country",
            Field::Produce => "produce",
            Field::Price => "price",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.column_name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One row of a price table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub market_type: Option<String>,
    pub country: Option<String>,
    pub produce: Option<String>,
    pub price: Option<f64>,
}

impl PriceRecord {
    /// Categorical value for a text field; `None` for numeric fields.
    pub fn category(&self, field: Field) -> Option<&str> {
        match field {
            Field::MarketType => self.market_type.as_deref(),
            Field::Country => self.country.as_deref(),
            Field::Produce => self.produce.as_deref(),
            Field::Year | Field::Month | Field::Price => None,
        }
    }

    /// Cell rendered for display. Missing values render as an empty string.
    pub fn display_cell(&self, field: Field) -> String {
        match field {
            Field::Year => self.year.map(|v| v.to_string()).unwrap_or_default(),
            Field::Month => self.month.map(|v| v.to_string()).unwrap_or_default(),
            Field::Price => self.price.map(|v| format!("{v:.2}")).unwrap_or_default(),
            Field::MarketType | Field::Country | Field::Produce => {
                self.category(field).unwrap_or_default().to_string()
            }
        }
    }
}

/// A loaded table: the domain columns the file carried plus its rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub name: String,
    pub columns: Vec<Field>,
    pub records: Vec<PriceRecord>,
}

impl PriceTable {
    pub fn new(name: impl Into<String>, columns: Vec<Field>, records: Vec<PriceRecord>) -> Self {
        Self {
            name: name.into(),
            columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-missing values of a categorical column, in encounter order.
    pub fn distinct(&self, field: Field) -> Vec<String> {
        distinct_in(self.records.iter(), field)
    }

    /// Distinct values of `field` among rows whose `filter_field` equals `value`.
    pub fn distinct_where(&self, field: Field, filter_field: Field, value: &str) -> Vec<String> {
        distinct_in(
            self.records
                .iter()
                .filter(|r| r.category(filter_field) == Some(value)),
            field,
        )
    }
}

fn distinct_in<'a>(records: impl Iterator<Item = &'a PriceRecord>, field: Field) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in records.filter_map(|r| r.category(field)) {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

/// The pair of tables every view reads from. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Table A: month/year aggregates and the supplementary statistics.
    pub base: PriceTable,
    /// Table B: richer categorical coverage, used by the comparison and trend views.
    pub extended: PriceTable,
}

impl Dataset {
    pub fn new(base: PriceTable, extended: PriceTable) -> Self {
        Self { base, extended }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, produce: &str) -> PriceRecord {
        PriceRecord {
            country: Some(country.into()),
            produce: Some(produce.into()),
            ..Default::default()
        }
    }

    #[test]
    fn distinct_keeps_encounter_order() {
        let table = PriceTable::new(
            "t",
            vec![Field::Country, Field::Produce],
            vec![
                row("Kenya", "Maize"),
                row("Benin", "Rice"),
                row("Kenya", "Rice"),
                PriceRecord::default(),
                row("Angola", "Maize"),
            ],
        );
        assert_eq!(table.distinct(Field::Country), vec!["Kenya", "Benin", "Angola"]);
        assert_eq!(table.distinct(Field::Produce), vec!["Maize", "Rice"]);
    }

    #[test]
    fn distinct_where_filters_on_other_field() {
        let table = PriceTable::new(
            "t",
            vec![Field::Country, Field::Produce],
            vec![row("Kenya", "Maize"), row("Benin", "Rice"), row("Angola", "Maize")],
        );
        assert_eq!(
            table.distinct_where(Field::Country, Field::Produce, "Maize"),
            vec!["Kenya", "Angola"]
        );
        assert!(table
            .distinct_where(Field::Country, Field::Produce, "Sorghum")
            .is_empty());
    }

    #[test]
    fn numeric_fields_have_no_category() {
        let r = PriceRecord {
            year: Some(2020),
            price: Some(3.5),
            ..Default::default()
        };
        assert_eq!(r.category(Field::Year), None);
        assert_eq!(r.display_cell(Field::Year), "2020");
        assert_eq!(r.display_cell(Field::Price), "3.50");
        assert_eq!(r.display_cell(Field::Month), "");
    }

    #[test]
    fn field_names_roundtrip() {
        for field in Field::ALL {
            assert_eq!(Field::from_column_name(field.column_name()), Some(field));
        }
        assert_eq!(Field::from_column_name("Unnamed: 0"), None);
    }
}
