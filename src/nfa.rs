use std::borrow::Cow;
use std::collections::HashMap;
use std::mem;

use bit_set::BitSet;

use crate::automaton::{Automaton, Slots, State, StateId, EPSILON};
use crate::dfa;
use crate::error::{AutomatonError, Result};
use crate::layout::{GridPlacement, Placement};

/// All transitions of an automaton, indexed by source slot and symbol.
///
/// State sets are `BitSet`s of slots, so their size follows the state count
/// rather than the ids.
struct Moves<'a> {
    slots: Slots,
    moves: Vec<HashMap<&'a str, Vec<usize>>>,
}

impl<'a> Moves<'a> {
    fn new(aut: &'a Automaton) -> Self {
        let slots = aut.slots();
        let mut moves: Vec<HashMap<&'a str, Vec<usize>>> = vec![HashMap::new(); slots.len()];
        for tr in aut.transitions() {
            if let (Some(from), Some(to)) = (slots.slot(tr.from()), slots.slot(tr.to())) {
                moves[from].entry(tr.symbol()).or_default().push(to);
            }
        }
        Moves { slots, moves }
    }

    #[inline]
    fn targets(&self, slot: usize, symbol: &str) -> &[usize] {
        self.moves
            .get(slot)
            .and_then(|m| m.get(symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Adds to `into` every state one `symbol` move away from `states`.
    #[inline]
    fn step(&self, states: &BitSet, symbol: &str, into: &mut BitSet) {
        for state in states {
            into.extend(self.targets(state, symbol).iter().copied());
        }
    }

    /// Grows `set` along epsilon moves until a pass adds nothing.
    fn close(&self, set: &mut BitSet) {
        loop {
            let reached: Vec<usize> = set
                .iter()
                .flat_map(|state| self.targets(state, EPSILON).iter().copied())
                .filter(|&target| !set.contains(target))
                .collect();
            if reached.is_empty() {
                break;
            }
            set.extend(reached);
        }
    }

    fn start_set(&self, start: StateId) -> Result<BitSet> {
        let slot = self
            .slots
            .slot(start)
            .ok_or(AutomatonError::UnknownState(start))?;
        let mut set = BitSet::with_capacity(self.slots.len());
        set.insert(slot);
        self.close(&mut set);
        Ok(set)
    }
}

/// The states reachable from `seeds` using only epsilon moves, seeds
/// included, sorted and without duplicates. Seeds that are not states of
/// `aut` are left out.
pub fn epsilon_closure<I>(aut: &Automaton, seeds: I) -> Vec<StateId>
where
    I: IntoIterator<Item = StateId>,
{
    let moves = Moves::new(aut);
    let mut set: BitSet = seeds
        .into_iter()
        .filter_map(|id| moves.slots.slot(id))
        .collect();
    moves.close(&mut set);
    let mut closure: Vec<StateId> = set.iter().map(|slot| moves.slots.id(slot)).collect();
    closure.sort_unstable();
    closure
}

/// Subset construction, laying new states out on the default grid.
pub fn to_dfa(nfa: &Automaton) -> Result<Cow<'_, Automaton>> {
    to_dfa_with(nfa, &mut GridPlacement::default())
}

/// Builds a DFA that accepts the same language as `nfa`.
///
/// An automaton that already is a DFA is handed back as is. Otherwise every
/// state of the result stands for the set of `nfa` states the input could
/// have led to; the set is identified by its sorted members, so each set
/// becomes exactly one state. Sets are discovered from the epsilon closure of
/// the initial state and explored from a worklist. A state is final when any
/// of its members is. Moves into the empty set are left out.
pub fn to_dfa_with<'a>(
    nfa: &'a Automaton,
    placement: &mut dyn Placement,
) -> Result<Cow<'a, Automaton>> {
    if dfa::is_dfa(nfa) {
        return Ok(Cow::Borrowed(nfa));
    }
    if nfa.initial_states().next().is_none() {
        return Err(AutomatonError::NoInitialState);
    }
    let start = nfa.single_initial_state()?;

    let moves = Moves::new(nfa);
    let alphabet: Vec<&str> = nfa.alphabet().into_iter().collect();
    let finals: BitSet = nfa
        .states()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_final())
        .map(|(slot, _)| slot)
        .collect();

    let mut result = Automaton::new();
    let mut subsets: HashMap<Vec<usize>, StateId> = HashMap::new();

    let start_set = moves.start_set(start)?;
    let start_id = result.push_state(true, !start_set.is_disjoint(&finals), placement.place(0));
    subsets.insert(start_set.iter().collect(), start_id);

    let mut worklist = vec![(start_set, start_id)];
    while let Some((current, current_id)) = worklist.pop() {
        for &symbol in &alphabet {
            let mut next = BitSet::new();
            moves.step(&current, symbol, &mut next);

            // no move on `symbol`: the result stays partial
            if next.is_empty() {
                continue;
            }
            moves.close(&mut next);

            let key: Vec<usize> = next.iter().collect();
            let next_id = match subsets.get(&key) {
                Some(&id) => id,
                None => {
                    let index = result.states().len();
                    let accepting = !next.is_disjoint(&finals);
                    let id = result.push_state(false, accepting, placement.place(index));
                    subsets.insert(key, id);
                    worklist.push((next, id));
                    id
                }
            };
            result.push_transition(current_id, next_id, symbol);
        }
    }

    Ok(Cow::Owned(result))
}

/// Runs `input` through an automaton with nondeterministic semantics: the
/// input is accepted when some path through it ends in a final state.
pub fn accepts(nfa: &Automaton, input: &str) -> Result<bool> {
    let start = nfa.single_initial_state()?;
    let alphabet = nfa.alphabet();
    let moves = Moves::new(nfa);

    let mut cur_states = moves.start_set(start)?;
    let mut nxt_states = BitSet::with_capacity(moves.slots.len());

    let mut buf = [0; 4];
    for c in input.chars() {
        let symbol: &str = c.encode_utf8(&mut buf);
        if !alphabet.contains(symbol) {
            return Err(AutomatonError::UnknownSymbol(symbol.to_owned()));
        }
        moves.step(&cur_states, symbol, &mut nxt_states);
        moves.close(&mut nxt_states);
        // the old set becomes next round's empty buffer
        cur_states.clear();
        mem::swap(&mut cur_states, &mut nxt_states);

        if cur_states.is_empty() {
            return Ok(false);
        }
    }
    Ok(cur_states
        .iter()
        .any(|slot| nfa.states().get(slot).map_or(false, State::is_final)))
}
