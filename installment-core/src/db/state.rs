//! JSON layout of the persisted simulation collection.
//!
//! ```json
//! { "simulations": [ { "id": "...", "productName": "...", "results": [ ... ] } ] }
//! ```
//!
//! Payloads written by the browser front end wrap the same object as
//! `{ "state": { "simulations": [...] }, "version": 0 }`; [`decode`] accepts
//! both shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repository::RepositoryError;
use crate::models::Simulation;

#[derive(Serialize)]
struct PersistedStateRef<'a> {
    simulations: &'a [Simulation],
}

#[derive(Deserialize)]
struct PersistedState {
    #[serde(default)]
    simulations: Vec<Simulation>,
}

/// Serializes the collection into the persisted layout.
pub fn encode(simulations: &[Simulation]) -> Result<String, RepositoryError> {
    serde_json::to_string(&PersistedStateRef { simulations }).map_err(malformed)
}

fn malformed(e: serde_json::Error) -> RepositoryError {
    RepositoryError::Malformed(e.to_string())
}

/// Parses a persisted payload.
///
/// A top-level `state` key selects the versioned envelope; its contents
/// must then decode, they never fall back to the plain layout.
pub fn decode(payload: &str) -> Result<Vec<Simulation>, RepositoryError> {
    let mut value: Value = serde_json::from_str(payload).map_err(malformed)?;

    let state = if value.get("state").is_some() {
        value["state"].take()
    } else {
        value
    };

    let persisted: PersistedState = serde_json::from_value(state).map_err(malformed)?;
    Ok(persisted.simulations)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Category, SimulationDraft};

    fn sample() -> Vec<Simulation> {
        vec![
            Simulation::from_draft(
                "one".into(),
                SimulationDraft::new("TV", 2400.0, "Loja", Category::Electronics, 10, 10.58),
            ),
            Simulation::from_draft(
                "two".into(),
                SimulationDraft::new("Shoes", 300.0, "Mall", Category::Clothing, 3, 0.0),
            ),
        ]
    }

    #[test]
    fn encode_then_decode_preserves_collection() {
        let simulations = sample();

        let decoded = decode(&encode(&simulations).unwrap()).unwrap();

        assert_eq!(decoded, simulations);
    }

    #[test]
    fn encode_wraps_collection_in_simulations_key() {
        let value: serde_json::Value = serde_json::from_str(&encode(&sample()).unwrap()).unwrap();

        assert_eq!(value["simulations"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["simulations"][1]["category"], "clothing");
    }

    #[test]
    fn decode_accepts_versioned_envelope() {
        let payload = r#"{"state":{"simulations":[{"id":"x","productName":"Bike","price":900,
            "store":"Shop","category":"fitness","installments":3,"interestRate":10.58,
            "results":[]}]},"version":0}"#;

        let decoded = decode(payload).unwrap();

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id.as_str(), "x");
        assert_eq!(decoded[0].installment_count, 3);
    }

    #[test]
    fn decode_reports_broken_entries_inside_versioned_envelope() {
        let payload = r#"{"state":{"simulations":[{"id":"x"}]},"version":0}"#;

        match decode(payload) {
            Err(RepositoryError::Malformed(detail)) => assert!(detail.contains("productName")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn decode_rejects_versioned_envelope_without_object_state() {
        assert!(matches!(
            decode(r#"{"state":7,"version":0}"#),
            Err(RepositoryError::Malformed(_))
        ));
    }

    #[test]
    fn floats_survive_encoding_bit_for_bit() {
        let mut sims = sample();
        sims[0].price = 3999.9;
        sims[0].results[0].discount = 7.912_163_635_071_010_5;
        sims[0].results[0].discounted_value = 226.325_367_086_508_95;

        let decoded = decode(&encode(&sims).unwrap()).unwrap();

        assert_eq!(
            decoded[0].results[0].discount.to_bits(),
            sims[0].results[0].discount.to_bits()
        );
        assert_eq!(
            decoded[0].results[0].discounted_value.to_bits(),
            sims[0].results[0].discounted_value.to_bits()
        );
        assert_eq!(decoded, sims);
    }

    #[test]
    fn decode_treats_missing_list_as_empty() {
        assert_eq!(decode("{}").unwrap(), Vec::new());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(RepositoryError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"simulations": 42}"#),
            Err(RepositoryError::Malformed(_))
        ));
    }
}
