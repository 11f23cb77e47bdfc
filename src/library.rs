use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::automaton::Automaton;
use crate::error::{AutomatonError, Result};
use crate::snapshot::Snapshot;

/// A set of automata saved under names.
///
/// Only snapshots are kept, so a saved automaton is a copy: editing the
/// original afterwards does not change what `load` returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    entries: BTreeMap<String, Snapshot>,
}

impl Library {
    pub fn new() -> Self {
        Library::default()
    }

    /// Saves `aut` under `name`, replacing anything saved there before.
    pub fn save(&mut self, name: &str, aut: &Automaton) {
        self.entries.insert(name.to_owned(), aut.to_snapshot());
    }

    pub fn load(&self, name: &str) -> Result<Option<Automaton>> {
        self.entries
            .get(name)
            .map(|snapshot| Automaton::from_snapshot(snapshot.clone()))
            .transpose()
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The snapshot saved under `name` as pretty-printed JSON.
    pub fn export(&self, name: &str) -> Result<Option<String>> {
        self.entries
            .get(name)
            .map(Snapshot::to_json_pretty)
            .transpose()
    }

    /// Stores the snapshot in `json` under `name`.
    ///
    /// Documents without `states` or `transitions` are refused before the
    /// rest is looked at. Nothing is stored unless the snapshot is valid.
    pub fn import(&mut self, name: &str, json: &str) -> Result<()> {
        let document: Value = serde_json::from_str(json)?;
        for section in ["states", "transitions"] {
            if document.get(section).is_none() {
                return Err(AutomatonError::MalformedSnapshot(format!(
                    "missing `{}`",
                    section
                )));
            }
        }
        let snapshot: Snapshot = serde_json::from_value(document)?;
        let aut = Automaton::from_snapshot(snapshot)?;
        self.save(name, &aut);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads a whole library back; every entry must be a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let library: Library = serde_json::from_str(json)?;
        for snapshot in library.entries.values() {
            Automaton::from_snapshot(snapshot.clone())?;
        }
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_on_a() -> Automaton {
        let mut aut = Automaton::new();
        let q0 = aut.add_state();
        aut.set_initial_state(q0).unwrap();
        aut.add_transition(q0, q0, "a").unwrap();
        aut
    }

    #[test]
    fn save_load_remove() {
        let mut library = Library::new();
        let mut aut = loop_on_a();
        library.save("loop", &aut);
        aut.add_state();

        let loaded = library.load("loop").unwrap().unwrap();
        assert_eq!(loaded.states().len(), 1);
        assert!(library.load("other").unwrap().is_none());

        library.save("again", &aut);
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["again", "loop"]);
        assert!(library.remove("loop"));
        assert!(!library.remove("loop"));
        assert_eq!(library.len(), 1);

        library.clear();
        assert!(library.is_empty());
    }

    #[test]
    fn export_then_import() {
        let mut library = Library::new();
        library.save("loop", &loop_on_a());
        let exported = library.export("loop").unwrap().unwrap();
        assert!(library.export("nope").unwrap().is_none());

        library.import("copy", &exported).unwrap();
        assert_eq!(
            library.load("copy").unwrap(),
            library.load("loop").unwrap()
        );
    }

    #[test]
    fn import_requires_states_and_transitions() {
        let mut library = Library::new();
        let err = library
            .import("bad", r#"{ "states": [], "currentStateId": 0 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            AutomatonError::MalformedSnapshot(ref m) if m.contains("transitions")
        ));
        assert!(library.is_empty());
    }

    #[test]
    fn import_fails_closed() {
        let mut library = Library::new();
        let json = r#"{
            "states": [ { "id": 0, "x": 0, "y": 0, "isInitial": true, "isFinal": false } ],
            "transitions": [ { "from": 0, "to": 9, "symbol": "a" } ],
            "currentStateId": 1
        }"#;
        assert!(library.import("bad", json).is_err());
        assert!(library.load("bad").unwrap().is_none());
        assert!(library.import("garbage", "not json").is_err());
    }

    #[test]
    fn whole_library_round_trip() {
        let mut library = Library::new();
        library.save("loop", &loop_on_a());
        library.save("empty", &Automaton::new());
        let json = library.to_json().unwrap();
        assert_eq!(Library::from_json(&json).unwrap(), library);
    }
}
