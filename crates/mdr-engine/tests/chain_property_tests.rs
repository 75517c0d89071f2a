//! Chain listings hold for arbitrary sets of stored versions

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{alice, harness, placeholder};
use mdr_core::model::{Form, RegistrationStatus};
use proptest::prelude::*;
use std::collections::BTreeMap;

const IDENTIFIERS: [&str; 4] = ["AE", "CM", "DM", "VS"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_unique_is_chain_head_and_history_descends(
        chains in prop::collection::btree_map(0usize..4, 1u32..4, 1..4)
    ) {
        let h = harness();
        for (&index, &versions) in &chains {
            for version in 1..=versions {
                let mut op = placeholder(IDENTIFIERS[index], RegistrationStatus::Incomplete);
                op.operation.new_version = version;
                prop_assert!(h.service.create(&op, &alice()).unwrap().is_created());
            }
        }
        let lifecycle = h.service.lifecycle();

        let unique = lifecycle.unique::<Form>().unwrap();
        let heads: BTreeMap<String, u32> = unique
            .iter()
            .map(|i| (i.identifier().to_string(), i.version()))
            .collect();
        prop_assert_eq!(unique.len(), chains.len());
        for (&index, &versions) in &chains {
            prop_assert_eq!(heads.get(IDENTIFIERS[index]), Some(&versions));

            let history = lifecycle.history::<Form>(IDENTIFIERS[index], "NS-ACME").unwrap();
            let found: Vec<u32> = history.iter().map(|i| i.version()).collect();
            let expected: Vec<u32> = (1..=versions).rev().collect();
            prop_assert_eq!(found, expected);
        }
    }
}
