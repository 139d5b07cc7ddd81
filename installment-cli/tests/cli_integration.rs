//! End-to-end tests: configuration file to storage backend to command output.

use std::fs;

use installment_cli::app;
use installment_cli::commands::{Command, DraftArgs, UpdateArgs, execute};
use installment_cli::config::{AppConfig, Overrides};
use installment_core::{Category, calculate_discount};
use pretty_assertions::assert_eq;

fn tv() -> DraftArgs {
    DraftArgs {
        product: "Smart TV".to_string(),
        price: 3999.9,
        store: "Magazine".to_string(),
        category: Category::Electronics,
        installments: 10,
        rate: 10.58,
    }
}

fn run(
    command: Command,
    config: &AppConfig,
) -> String {
    let mut store = app::open_store(&config.db_config()).expect("open store");
    let mut out = Vec::new();
    execute(command, &mut store, &mut out).expect("command");
    String::from_utf8(out).unwrap()
}

#[test]
fn file_backend_from_config_persists_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("calc.toml");
    let data_dir = dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    fs::write(
        &config_path,
        format!(
            "backend = \"file\"\nconnection_string = {:?}\nnamespace = \"it\"\n",
            data_dir.to_str().unwrap()
        ),
    )
    .unwrap();
    let config = AppConfig::resolve(Some(&config_path)).unwrap();

    run(Command::Add(tv()), &config);
    let listing = run(Command::List, &config);

    assert!(listing.contains("Smart TV"));
    assert!(data_dir.join("it.json").exists());
}

#[test]
fn sqlite_backend_via_overrides_supports_full_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sims.db");
    let config = AppConfig::default().with_overrides(Overrides {
        backend: Some("sqlite".to_string()),
        db: Some(db_path.to_str().unwrap().to_string()),
        namespace: None,
    });

    run(Command::Add(tv()), &config);
    let store = app::open_store(&config.db_config()).unwrap();
    let id = store.list()[0].id.to_string();
    drop(store);

    run(
        Command::Update {
            id: id.clone(),
            fields: UpdateArgs {
                installments: Some(5),
                ..UpdateArgs::default()
            },
        },
        &config,
    );

    let store = app::open_store(&config.db_config()).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].results, calculate_discount(3999.9, 5, 10.58));
    drop(store);

    let deleted = run(Command::Delete { id }, &config);
    assert!(deleted.starts_with("Deleted simulation"));
    assert_eq!(run(Command::List, &config), "No saved simulations.\n");
}

#[test]
fn namespaces_keep_histories_apart() {
    let dir = tempfile::tempdir().unwrap();
    let base = AppConfig::default().with_overrides(Overrides {
        db: Some(dir.path().to_str().unwrap().to_string()),
        ..Overrides::default()
    });
    let work = base.clone().with_overrides(Overrides {
        namespace: Some("work".to_string()),
        ..Overrides::default()
    });

    run(Command::Add(tv()), &work);

    assert_eq!(run(Command::List, &base), "No saved simulations.\n");
    assert!(run(Command::List, &work).contains("Smart TV"));
}
