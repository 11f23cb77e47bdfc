use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dfa;
use crate::error::{AutomatonError, Result};

pub type StateId = usize;

/// The reserved symbol of a move that consumes no input.
pub const EPSILON: &str = "ε";

/// Where a state is drawn. The engine carries it around but never looks at it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Both coordinates are neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    id: StateId,
    initial: bool,
    accepting: bool,
    position: Position,
}

impl State {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn is_final(&self) -> bool {
        self.accepting
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    from: StateId,
    to: StateId,
    symbol: String,
}

impl Transition {
    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol == EPSILON
    }
}

/// A finite automaton under construction.
///
/// The automaton owns its states and transitions and is the only place they
/// can be changed. Every transition refers to states that exist, and state
/// ids are handed out from a counter that only grows, so an id that was
/// deleted is never seen again in the same automaton.
///
/// The alphabet is not stored: it is always recomputed from the transitions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Automaton {
    states: Vec<State>,
    transitions: Vec<Transition>,
    next_id: StateId,
}

impl Automaton {
    pub fn new() -> Self {
        Automaton {
            states: Vec::new(),
            transitions: Vec::new(),
            next_id: 0,
        }
    }

    /// Reassembles an automaton from already validated parts.
    pub(crate) fn from_raw_parts(
        states: Vec<State>,
        transitions: Vec<Transition>,
        next_id: StateId,
    ) -> Self {
        Automaton {
            states,
            transitions,
            next_id,
        }
    }

    pub(crate) fn raw_state(
        id: StateId,
        initial: bool,
        accepting: bool,
        position: Position,
    ) -> State {
        State {
            id,
            initial,
            accepting,
            position,
        }
    }

    pub(crate) fn raw_transition(from: StateId, to: StateId, symbol: String) -> Transition {
        Transition { from, to, symbol }
    }

    // Mutation primitives

    /// Adds a fresh state that is neither initial nor final.
    pub fn add_state(&mut self) -> StateId {
        self.push_state(false, false, Position::default())
    }

    /// Adds a fresh state drawn at `position`, which must be finite.
    pub fn add_state_at(&mut self, position: Position) -> Result<StateId> {
        if !position.is_finite() {
            return Err(AutomatonError::InvalidPosition(position.x, position.y));
        }
        Ok(self.push_state(false, false, position))
    }

    pub(crate) fn push_state(
        &mut self,
        initial: bool,
        accepting: bool,
        position: Position,
    ) -> StateId {
        let id = self.next_id;
        self.next_id += 1;
        self.states.push(State {
            id,
            initial,
            accepting,
            position,
        });
        id
    }

    /// Only for builders that allocated both ends themselves.
    pub(crate) fn push_transition(&mut self, from: StateId, to: StateId, symbol: &str) {
        self.transitions.push(Transition {
            from,
            to,
            symbol: symbol.to_owned(),
        });
    }

    /// Adds the transition `from --symbol--> to`.
    ///
    /// Blank symbols are refused with `RejectedTransition`. Duplicates are
    /// accepted; they do not change the language.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        symbol: &str,
    ) -> Result<&Transition> {
        if symbol.trim().is_empty() {
            return Err(AutomatonError::RejectedTransition);
        }
        self.require_state(from)?;
        self.require_state(to)?;
        self.transitions.push(Transition {
            from,
            to,
            symbol: symbol.to_owned(),
        });
        Ok(&self.transitions[self.transitions.len() - 1])
    }

    /// Makes `id` the only initial state.
    pub fn set_initial_state(&mut self, id: StateId) -> Result<()> {
        self.require_state(id)?;
        for state in &mut self.states {
            state.initial = state.id == id;
        }
        Ok(())
    }

    /// Flips the final flag of `id` and returns the new value.
    pub fn toggle_final(&mut self, id: StateId) -> Result<bool> {
        let state = self.state_mut(id)?;
        state.accepting = !state.accepting;
        Ok(state.accepting)
    }

    pub fn set_final(&mut self, id: StateId, accepting: bool) -> Result<()> {
        self.state_mut(id)?.accepting = accepting;
        Ok(())
    }

    pub fn move_state(&mut self, id: StateId, position: Position) -> Result<()> {
        let state = self.state_mut(id)?;
        if !position.is_finite() {
            return Err(AutomatonError::InvalidPosition(position.x, position.y));
        }
        state.position = position;
        Ok(())
    }

    /// Removes `id` together with every transition entering or leaving it.
    /// Returns whether the state existed.
    pub fn delete_state(&mut self, id: StateId) -> bool {
        let before = self.states.len();
        self.states.retain(|state| state.id != id);
        if self.states.len() == before {
            return false;
        }
        self.transitions.retain(|tr| tr.from != id && tr.to != id);
        true
    }

    /// Removes every transition that matches all three fields exactly.
    /// Returns how many were removed.
    pub fn delete_transition(&mut self, from: StateId, to: StateId, symbol: &str) -> usize {
        let before = self.transitions.len();
        self.transitions
            .retain(|tr| !(tr.from == from && tr.to == to && tr.symbol == symbol));
        before - self.transitions.len()
    }

    /// Replaces all transitions from `from` to `to` with one per symbol.
    ///
    /// Blank symbols are skipped, repeated symbols are written once.
    /// Returns the number of transitions now linking the two states.
    pub fn set_transition_symbols<I, S>(
        &mut self,
        from: StateId,
        to: StateId,
        symbols: I,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.require_state(from)?;
        self.require_state(to)?;

        let mut kept: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if !symbol.trim().is_empty() && !kept.iter().any(|s| s == symbol) {
                kept.push(symbol.to_owned());
            }
        }

        self.transitions.retain(|tr| !(tr.from == from && tr.to == to));
        let written = kept.len();
        self.transitions
            .extend(kept.into_iter().map(|symbol| Transition { from, to, symbol }));
        Ok(written)
    }

    // Queries

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|state| state.id == id)
    }

    pub fn contains_state(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    pub fn initial_states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter().filter(|state| state.initial)
    }

    /// The id the next `add_state` will hand out.
    pub fn next_state_id(&self) -> StateId {
        self.next_id
    }

    /// All distinct symbols on transitions, epsilon excluded, in sorted order.
    pub fn alphabet(&self) -> BTreeSet<&str> {
        self.transitions
            .iter()
            .filter(|tr| !tr.is_epsilon())
            .map(|tr| tr.symbol.as_str())
            .collect()
    }

    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.iter().any(Transition::is_epsilon)
    }

    /// Symbols on the transitions from `from` to `to`, in insertion order.
    pub fn symbols_between(&self, from: StateId, to: StateId) -> Vec<&str> {
        self.transitions
            .iter()
            .filter(|tr| tr.from == from && tr.to == to)
            .map(|tr| tr.symbol.as_str())
            .collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            states: self.states.len(),
            transitions: self.transitions.len(),
            alphabet_size: self.alphabet().len(),
            deterministic: dfa::is_dfa(self),
        }
    }

    /// The unique initial state. Fails when there is none or more than one.
    pub(crate) fn single_initial_state(&self) -> Result<StateId> {
        let mut initials = self.initial_states();
        match (initials.next(), initials.next()) {
            (Some(state), None) => Ok(state.id),
            _ => Err(AutomatonError::NoSingleInitialState(
                self.initial_states().count(),
            )),
        }
    }

    pub(crate) fn slots(&self) -> Slots {
        Slots::new(self)
    }

    fn require_state(&self, id: StateId) -> Result<()> {
        if self.contains_state(id) {
            Ok(())
        } else {
            Err(AutomatonError::UnknownState(id))
        }
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State> {
        self.states
            .iter_mut()
            .find(|state| state.id == id)
            .ok_or(AutomatonError::UnknownState(id))
    }
}

/// Numbers the states `0..n` in `states()` order.
///
/// Ids only grow and may be sparse, so per-state tables are indexed by slot
/// and sized by the state count.
pub(crate) struct Slots {
    ids: Vec<StateId>,
    by_id: HashMap<StateId, usize>,
}

impl Slots {
    fn new(aut: &Automaton) -> Self {
        let ids: Vec<StateId> = aut.states.iter().map(|state| state.id).collect();
        let by_id = ids.iter().enumerate().map(|(slot, &id)| (id, slot)).collect();
        Slots { ids, by_id }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn slot(&self, id: StateId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub(crate) fn id(&self, slot: usize) -> StateId {
        self.ids[slot]
    }
}

/// Headline numbers about an automaton.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub states: usize,
    pub transitions: usize,
    pub alphabet_size: usize,
    /// Deterministic and free of epsilon moves, i.e. usable as a DFA.
    pub deterministic: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "states:        {}", self.states)?;
        writeln!(f, "transitions:   {}", self.transitions)?;
        writeln!(f, "alphabet size: {}", self.alphabet_size)?;
        write!(
            f,
            "deterministic: {}",
            if self.deterministic { "yes" } else { "no" }
        )
    }
}
