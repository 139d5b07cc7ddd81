//! Bulk import of simulation drafts from CSV.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column              | Required | Type    | Notes                                   |
//! |---------------------|----------|---------|-----------------------------------------|
//! | `product_name`      | yes      | string  |                                         |
//! | `price`             | yes      | decimal | e.g. `3999.90`                          |
//! | `store`             | yes      | string  |                                         |
//! | `category`          | yes      | string  | One of the codes in [`Category::all`]   |
//! | `installment_count` | yes      | integer | at least 1                              |
//! | `interest_rate`     | no       | decimal | annual %, empty means the default rate  |
//!
//! ```csv
//! product_name,price,store,category,installment_count,interest_rate
//! Smart TV 55,3999.90,Magazine,electronics,10,10.58
//! Running shoes,499.00,Centauro,fitness,5,
//! ```

use std::io::Read;

use installment_core::{
    Category, DEFAULT_INTEREST_RATE, SimulationDraft, SimulationStore, StoreError, validate_draft,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when importing drafts.
#[derive(Debug, Error)]
pub enum DraftLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Row {row}: unknown category '{value}'")]
    InvalidCategory { row: usize, value: String },

    #[error("Row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<csv::Error> for DraftLoaderError {
    fn from(err: csv::Error) -> Self {
        DraftLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the drafts CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
struct DraftRecord {
    product_name: String,
    price: f64,
    store: String,
    category: String,
    installment_count: u32,
    #[serde(default, deserialize_with = "deserialize_optional_f64")]
    interest_rate: Option<f64>,
}

fn deserialize_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl DraftRecord {
    /// Converts the record into a draft, checking the category against the
    /// known set and the numbers against the store's rules. `row` is the
    /// 1-based data row used in error messages.
    fn into_draft(
        self,
        row: usize,
    ) -> Result<SimulationDraft, DraftLoaderError> {
        let category =
            Category::parse(&self.category).ok_or_else(|| DraftLoaderError::InvalidCategory {
                row,
                value: self.category.clone(),
            })?;

        let draft = SimulationDraft::new(
            self.product_name,
            self.price,
            self.store,
            category,
            self.installment_count,
            self.interest_rate.unwrap_or(DEFAULT_INTEREST_RATE),
        );

        validate_draft(&draft).map_err(|e| match e {
            StoreError::InvalidInput(reason) => DraftLoaderError::InvalidRow { row, reason },
            other => DraftLoaderError::Store(other),
        })?;

        Ok(draft)
    }
}

/// Loader for simulation drafts from CSV files.
///
/// Parsing and loading are separate steps so a file can be checked in full
/// before anything is written to the store.
pub struct DraftLoader;

impl DraftLoader {
    /// Parse drafts from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<SimulationDraft>, DraftLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut drafts = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: DraftRecord = result?;
            drafts.push(record.into_draft(index + 1)?);
        }

        Ok(drafts)
    }

    /// Add every draft to `store`, in order.
    ///
    /// Drafts from [`DraftLoader::parse`] are already validated, so the only
    /// expected failure is a storage error; loading stops there and drafts
    /// before it remain in the store. Returns the number of simulations
    /// added.
    pub fn load(
        store: &mut SimulationStore,
        drafts: &[SimulationDraft],
    ) -> Result<usize, DraftLoaderError> {
        let mut inserted = 0;

        for draft in drafts {
            store.add(draft.clone())?;
            inserted += 1;
        }

        info!(inserted, "imported simulation drafts");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use installment_core::db::MemoryRepository;
    use installment_core::{RepositoryError, Simulation, SimulationRepository};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Lets the test keep a handle on the slot the store writes to.
    struct SharedRepository(Arc<MemoryRepository>);

    impl SimulationRepository for SharedRepository {
        fn load(&self) -> Result<Vec<Simulation>, RepositoryError> {
            self.0.load()
        }
        fn save(
            &self,
            simulations: &[Simulation],
        ) -> Result<(), RepositoryError> {
            self.0.save(simulations)
        }
    }

    const HEADER: &str = "product_name,price,store,category,installment_count,interest_rate\n";

    #[test]
    fn parses_full_row() {
        let csv = format!("{HEADER}Phone,1999.90,Loja,electronics,12,9.5\n");

        let drafts = DraftLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(
            drafts,
            vec![SimulationDraft::new("Phone", 1999.90, "Loja", Category::Electronics, 12, 9.5)]
        );
    }

    #[test]
    fn empty_rate_uses_default() {
        let csv = format!("{HEADER}Shoes,300,Mall,clothing,3,\n");

        let drafts = DraftLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(drafts[0].interest_rate, DEFAULT_INTEREST_RATE);
    }

    #[test]
    fn rate_column_may_be_omitted() {
        let csv = "store,product_name,price,category,installment_count\nMall,Shoes,300,clothing,3\n";

        let drafts = DraftLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(drafts[0].product_name, "Shoes");
        assert_eq!(drafts[0].interest_rate, DEFAULT_INTEREST_RATE);
    }

    #[test]
    fn category_is_normalized() {
        let csv = format!("{HEADER}Shoes,300,Mall, Clothing ,3,1\n");

        let drafts = DraftLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(drafts[0].category, "clothing");
    }

    #[test]
    fn unknown_category_names_the_row() {
        let csv = format!("{HEADER}A,1,S,home,1,1\nB,1,S,garden,1,1\n");

        match DraftLoader::parse(csv.as_bytes()) {
            Err(DraftLoaderError::InvalidCategory { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "garden");
            }
            other => panic!("expected InvalidCategory, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_price_is_a_parse_error() {
        let csv = format!("{HEADER}A,cheap,S,home,1,1\n");

        assert!(matches!(
            DraftLoader::parse(csv.as_bytes()),
            Err(DraftLoaderError::CsvParse(_))
        ));
    }

    #[test]
    fn load_adds_every_draft() {
        let mut store = SimulationStore::open(Box::new(MemoryRepository::new()));
        let csv = format!("{HEADER}A,100,S,home,2,0\nB,200,S,pets,4,12\n");
        let drafts = DraftLoader::parse(csv.as_bytes()).unwrap();

        let inserted = DraftLoader::load(&mut store, &drafts).unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[1].results.len(), 4);
    }

    #[test]
    fn invalid_numbers_name_the_row() {
        let cases = [
            ("A,100,S,home,0,1", "installment count"),
            ("A,inf,S,home,2,1", "price"),
            ("A,100,S,home,2,NaN", "interest rate"),
            ("A,100,S,home,2,-100", "-100%"),
        ];

        for (line, expected) in cases {
            let csv = format!("{HEADER}B,1,S,home,1,1\n{line}\n");
            match DraftLoader::parse(csv.as_bytes()) {
                Err(DraftLoaderError::InvalidRow { row, reason }) => {
                    assert_eq!(row, 2, "{line}");
                    assert!(reason.contains(expected), "{line}: {reason}");
                }
                other => panic!("{line}: expected InvalidRow, got {other:?}"),
            }
        }
    }

    #[test]
    fn bad_row_means_nothing_is_saved() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = SimulationStore::open(Box::new(SharedRepository(repo.clone())));
        let csv = format!("{HEADER}A,100,S,home,2,0\nB,200,S,pets,0,12\nC,300,S,home,1,0\n");

        let result = DraftLoader::parse(csv.as_bytes())
            .and_then(|drafts| DraftLoader::load(&mut store, &drafts));

        assert!(matches!(result, Err(DraftLoaderError::InvalidRow { row: 2, .. })));
        assert!(store.is_empty());
        assert_eq!(repo.payload().unwrap(), None);
    }
}
