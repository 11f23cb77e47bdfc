//! The exchange format of an automaton.
//!
//! ```json
//! {
//!   "states": [ { "id": 0, "x": 50, "y": 50, "isInitial": true, "isFinal": false } ],
//!   "transitions": [ { "from": 0, "to": 0, "symbol": "a" } ],
//!   "alphabet": [ "a" ],
//!   "currentStateId": 1
//! }
//! ```
//!
//! Loading is all or nothing: a snapshot either becomes a fully valid
//! [`Automaton`] or is rejected with `MalformedSnapshot`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, Position, StateId};
use crate::error::{AutomatonError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub id: StateId,
    pub x: f64,
    pub y: f64,
    pub is_initial: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: StateId,
    pub to: StateId,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub states: Vec<StateRecord>,
    pub transitions: Vec<TransitionRecord>,
    /// Written for readers of the file; ignored on load, since the alphabet
    /// is always derived from the transitions.
    #[serde(default)]
    pub alphabet: Vec<String>,
    pub current_state_id: StateId,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&Automaton> for Snapshot {
    fn from(aut: &Automaton) -> Self {
        Snapshot {
            states: aut
                .states()
                .iter()
                .map(|s| StateRecord {
                    id: s.id(),
                    x: s.position().x,
                    y: s.position().y,
                    is_initial: s.is_initial(),
                    is_final: s.is_final(),
                })
                .collect(),
            transitions: aut
                .transitions()
                .iter()
                .map(|tr| TransitionRecord {
                    from: tr.from(),
                    to: tr.to(),
                    symbol: tr.symbol().to_owned(),
                })
                .collect(),
            alphabet: aut.alphabet().into_iter().map(str::to_owned).collect(),
            current_state_id: aut.next_state_id(),
        }
    }
}

/// Largest `currentStateId` a snapshot may carry. Counting up from here by
/// adding states one at a time cannot overflow.
const COUNTER_LIMIT: StateId = StateId::MAX / 2;

fn malformed(reason: String) -> AutomatonError {
    AutomatonError::MalformedSnapshot(reason)
}

impl TryFrom<Snapshot> for Automaton {
    type Error = AutomatonError;

    fn try_from(snapshot: Snapshot) -> Result<Self> {
        if snapshot.current_state_id > COUNTER_LIMIT {
            return Err(malformed(format!(
                "currentStateId {} is above {}",
                snapshot.current_state_id, COUNTER_LIMIT
            )));
        }
        let mut ids = HashSet::with_capacity(snapshot.states.len());
        for state in &snapshot.states {
            if !ids.insert(state.id) {
                return Err(malformed(format!("state {} appears twice", state.id)));
            }
            if state.id >= snapshot.current_state_id {
                return Err(malformed(format!(
                    "state {} is not below currentStateId {}",
                    state.id, snapshot.current_state_id
                )));
            }
        }
        for tr in &snapshot.transitions {
            for end in [tr.from, tr.to] {
                if !ids.contains(&end) {
                    return Err(malformed(format!(
                        "transition {} -{}-> {} refers to missing state {}",
                        tr.from, tr.symbol, tr.to, end
                    )));
                }
            }
            if tr.symbol.trim().is_empty() {
                return Err(malformed(format!(
                    "transition {} -> {} has a blank symbol",
                    tr.from, tr.to
                )));
            }
        }

        let states = snapshot
            .states
            .into_iter()
            .map(|s| Automaton::raw_state(s.id, s.is_initial, s.is_final, Position::new(s.x, s.y)))
            .collect();
        let transitions = snapshot
            .transitions
            .into_iter()
            .map(|tr| Automaton::raw_transition(tr.from, tr.to, tr.symbol))
            .collect();
        Ok(Automaton::from_raw_parts(
            states,
            transitions,
            snapshot.current_state_id,
        ))
    }
}

impl Automaton {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        Automaton::try_from(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_snapshot().to_json()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_snapshot().to_json_pretty()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Automaton::try_from(Snapshot::from_json(json)?)
    }
}
