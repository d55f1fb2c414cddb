//! The five default mutations of a resource module.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::framework::ModuleError;
use crate::model::{mutation, Mutation, ResourceNames};

fn not_a_sequence(mutation: &str, key: &str) -> ModuleError {
    ModuleError::CollectionNotSequence {
        mutation: mutation.to_string(),
        key: key.to_string(),
    }
}

pub fn default_mutations(names: &ResourceNames, id_attribute: &str) -> BTreeMap<String, Mutation> {
    let mut mutations = BTreeMap::new();

    let key = names.items_key.clone();
    mutations.insert(
        names.set_items.clone(),
        mutation(move |state, commit| {
            state.insert(key.clone(), commit.payload);
            Ok(())
        }),
    );

    let key = names.current_key.clone();
    mutations.insert(
        names.set_current.clone(),
        mutation(move |state, commit| {
            state.insert(key.clone(), commit.payload);
            Ok(())
        }),
    );

    // Absent collection starts empty; anything but an array is a misconfiguration.
    let (key, name) = (names.items_key.clone(), names.add_item.clone());
    mutations.insert(
        names.add_item.clone(),
        mutation(move |state, commit| {
            let items = state.entry(key.clone()).or_insert(Value::Null);
            if items.is_null() {
                *items = Value::Array(Vec::new());
            }
            match items {
                Value::Array(items) => {
                    items.push(commit.payload);
                    Ok(())
                }
                _ => Err(not_a_sequence(&name, &key)),
            }
        }),
    );

    let (key, name, id) = (
        names.items_key.clone(),
        names.update_item.clone(),
        id_attribute.to_string(),
    );
    mutations.insert(
        names.update_item.clone(),
        mutation(move |state, commit| {
            let Some(Value::Array(items)) = state.get_mut(&key) else {
                return Err(not_a_sequence(&name, &key));
            };
            let Some(target) = commit.payload.get(&id) else {
                return Ok(());
            };
            if let Some(slot) = items.iter_mut().find(|item| item.get(&id) == Some(target)) {
                *slot = commit.payload.clone();
            }
            Ok(())
        }),
    );

    // Matches against the action's input (the id), not the response. Tolerates
    // uninitialized state.
    let (key, id) = (names.items_key.clone(), id_attribute.to_string());
    mutations.insert(
        names.delete_item.clone(),
        mutation(move |state, commit| {
            if let Some(Value::Array(items)) = state.get_mut(&key) {
                items.retain(|item| item.get(&id) != Some(&commit.input));
            }
            Ok(())
        }),
    );

    mutations
}
