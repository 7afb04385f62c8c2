#![allow(dead_code)]

use crm_dashboard::store::{bootstrap_schema, seed_demo_data, ResultSet, SqlValue, SqliteStore};

/// In-memory store with the schema and the demo dataset loaded.
pub fn seeded_store() -> SqliteStore {
    let store = empty_store();
    seed_demo_data(&store).expect("demo data loads");
    store
}

/// In-memory store with the schema but no rows.
pub fn empty_store() -> SqliteStore {
    let store = SqliteStore::in_memory().expect("in-memory store opens");
    bootstrap_schema(&store).expect("schema applies");
    store
}

pub fn text_column(set: &ResultSet, name: &str) -> Vec<String> {
    set.column(name)
        .expect("column present")
        .map(SqlValue::to_string)
        .collect()
}

pub fn amount_column(set: &ResultSet, name: &str) -> Vec<f64> {
    set.column(name)
        .expect("column present")
        .map(|value| value.as_f64().expect("numeric cell"))
        .collect()
}

/// "First Last" for every row of a result set with FirstName/LastName columns.
pub fn full_names(set: &ResultSet) -> Vec<String> {
    text_column(set, "FirstName")
        .into_iter()
        .zip(text_column(set, "LastName"))
        .map(|(first, last)| format!("{first} {last}"))
        .collect()
}
