//! Integration tests for draft import and schedule export against real
//! storage backends.

use installment_core::db::FileRepository;
use installment_core::{Category, SimulationRepository, SimulationStore, calculate_discount};
use installment_data::{DraftLoader, ScheduleExporter};
use installment_db_sqlite::SqliteRepository;
use pretty_assertions::assert_eq;

const TEST_CSV: &str = include_str!("../test-data/drafts.csv");

fn sqlite_store() -> SimulationStore {
    let repo = SqliteRepository::new(":memory:", "test").expect("in-memory database");
    repo.run_migrations().expect("migrations");
    SimulationStore::open(Box::new(repo))
}

#[test]
fn test_parse_fixture() {
    let drafts = DraftLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(drafts.len(), 4);
    assert_eq!(drafts[0].product_name, "Smart TV 55");
    assert_eq!(drafts[0].category, Category::Electronics.as_str());
    assert_eq!(drafts[1].interest_rate, installment_core::DEFAULT_INTEREST_RATE);
    assert_eq!(drafts[2].interest_rate, 0.0);
}

#[test]
fn test_load_fixture_into_sqlite() {
    let mut store = sqlite_store();
    let drafts = DraftLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    let inserted = DraftLoader::load(&mut store, &drafts).expect("Failed to load drafts");

    assert_eq!(inserted, 4);
    let dog_food = &store.list()[3];
    assert_eq!(dog_food.product_name, "Dog food (year)");
    assert_eq!(dog_food.results, calculate_discount(1200.0, 12, 12.0));
}

#[test]
fn test_load_fixture_into_file_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let drafts = DraftLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    {
        let mut store = SimulationStore::open(Box::new(FileRepository::new(dir.path(), "ns")));
        DraftLoader::load(&mut store, &drafts).expect("Failed to load drafts");
    }

    let reopened = SimulationStore::open(Box::new(FileRepository::new(dir.path(), "ns")));
    let names: Vec<&str> = reopened
        .list()
        .iter()
        .map(|s| s.product_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Smart TV 55", "Running shoes", "Sofa", "Dog food (year)"]
    );
}

#[test]
fn test_loading_twice_appends_new_ids() {
    let mut store = sqlite_store();
    let drafts = DraftLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    DraftLoader::load(&mut store, &drafts).unwrap();
    DraftLoader::load(&mut store, &drafts).unwrap();

    assert_eq!(store.len(), 8);
    assert_ne!(store.list()[0].id, store.list()[4].id);
}

#[test]
fn test_export_after_import() {
    let mut store = sqlite_store();
    let drafts = DraftLoader::parse(TEST_CSV.as_bytes()).unwrap();
    DraftLoader::load(&mut store, &drafts).unwrap();
    let mut out = Vec::new();

    let rows = ScheduleExporter::write(&mut out, store.list()).unwrap();

    // 10 + 5 + 12 + 12 installments
    assert_eq!(rows, 39);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 40);
    assert!(text.lines().nth(1).unwrap().contains("Smart TV 55"));
}

#[test]
fn test_file_payload_uses_persisted_layout() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileRepository::new(dir.path(), "nubank-calculator-storage");
    let mut store = SimulationStore::open(Box::new(repo.clone()));
    let drafts = DraftLoader::parse(TEST_CSV.as_bytes()).unwrap();
    DraftLoader::load(&mut store, &drafts[..1]).unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(repo.path()).unwrap()).unwrap();

    assert_eq!(payload["simulations"][0]["productName"], "Smart TV 55");
    assert_eq!(payload["simulations"][0]["installmentCount"], 10);
    assert_eq!(repo.load().unwrap().len(), 1);
}
