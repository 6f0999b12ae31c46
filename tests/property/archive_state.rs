//! Property-based tests for in-memory archive reconciliation

use packrat::archive::{ArchiveState, EntryBody, Reconciled};
use proptest::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Test that the state always holds exactly the last content written per name
#[test]
fn test_last_write_wins_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec(("[a-c]{1,2}", any::<Vec<u8>>()), 0..32),
            |writes| {
                let mut state = ArchiveState::new();
                let mut expected: HashMap<String, Vec<u8>> = HashMap::new();

                for (name, content) in &writes {
                    let outcome = state.reconcile(&PathBuf::from(name), content.clone());
                    let existed = expected.insert(name.clone(), content.clone()).is_some();
                    prop_assert_eq!(
                        outcome,
                        if existed { Reconciled::Updated } else { Reconciled::Inserted }
                    );
                }

                prop_assert_eq!(state.len(), expected.len());
                for (name, content) in &expected {
                    prop_assert_eq!(
                        &state.get(name).unwrap().body,
                        &EntryBody::Content(content.clone())
                    );
                }
                Ok(())
            },
        )
        .unwrap();
}

/// Test that entries keep first-insertion order across updates
#[test]
fn test_insertion_order_stable_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec("[a-d]", 1..24), |names| {
            let mut state = ArchiveState::new();
            let mut first_seen: Vec<String> = Vec::new();
            for name in &names {
                state.reconcile(&PathBuf::from(name), Vec::new());
                if !first_seen.contains(name) {
                    first_seen.push(name.clone());
                }
            }

            let order: Vec<String> = state.entries().iter().map(|e| e.name.clone()).collect();
            prop_assert_eq!(order, first_seen);
            Ok(())
        })
        .unwrap();
}
