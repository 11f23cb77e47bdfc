use std::collections::{HashMap, HashSet, VecDeque};

use bit_set::BitSet;
use bit_vec::BitVec;

use crate::automaton::{Automaton, Slots, State, StateId};
use crate::error::{AutomatonError, Result};
use crate::layout::{GridPlacement, Placement};

/// The transition function of a deterministic automaton.
struct Delta<'a> {
    moves: HashMap<StateId, HashMap<&'a str, StateId>>,
}

impl<'a> Delta<'a> {
    fn new(aut: &'a Automaton) -> Self {
        let mut moves: HashMap<StateId, HashMap<&'a str, StateId>> = HashMap::new();
        for tr in aut.transitions() {
            moves.entry(tr.from()).or_default().insert(tr.symbol(), tr.to());
        }
        Delta { moves }
    }

    #[inline]
    fn next(&self, state: StateId, symbol: &str) -> Option<StateId> {
        self.moves.get(&state)?.get(symbol).copied()
    }

    fn successors(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.moves.get(&state).into_iter().flat_map(|m| m.values().copied())
    }
}

/// Whether no state has two transitions on the same symbol.
///
/// Epsilon is treated like any other symbol here. Use `is_dfa` to also
/// exclude epsilon moves.
pub fn is_deterministic(aut: &Automaton) -> bool {
    let mut seen = HashSet::with_capacity(aut.transitions().len());
    aut.transitions()
        .iter()
        .all(|tr| seen.insert((tr.from(), tr.symbol())))
}

/// Deterministic and free of epsilon moves.
pub fn is_dfa(aut: &Automaton) -> bool {
    !aut.has_epsilon_transitions() && is_deterministic(aut)
}

fn require_dfa(aut: &Automaton) -> Result<()> {
    if is_dfa(aut) {
        Ok(())
    } else {
        Err(AutomatonError::NotDeterministic)
    }
}

/// Runs `input` through a DFA, one character per step.
///
/// A missing transition rejects the input; a character outside the alphabet
/// is an error.
pub fn accepts(aut: &Automaton, input: &str) -> Result<bool> {
    require_dfa(aut)?;
    let mut current = aut.single_initial_state()?;
    let alphabet = aut.alphabet();
    let delta = Delta::new(aut);

    let mut buf = [0; 4];
    for c in input.chars() {
        let symbol: &str = c.encode_utf8(&mut buf);
        if !alphabet.contains(symbol) {
            return Err(AutomatonError::UnknownSymbol(symbol.to_owned()));
        }
        match delta.next(current, symbol) {
            Some(next) => current = next,
            None => return Ok(false),
        }
    }
    Ok(aut.state(current).map_or(false, State::is_final))
}

/// Minimizes a DFA, laying the result out on the default grid.
pub fn minimize(dfa: &Automaton) -> Result<Automaton> {
    minimize_with(dfa, &mut GridPlacement::default())
}

/// Builds the minimal DFA equivalent to `dfa`.
///
/// Unreachable states are dropped first. The remaining states start out
/// split into final and non-final blocks, and a block is split further while
/// its members disagree on which block some symbol leads to. Each block that
/// survives becomes one state of the result.
pub fn minimize_with(dfa: &Automaton, placement: &mut dyn Placement) -> Result<Automaton> {
    require_dfa(dfa)?;
    let start = dfa.single_initial_state()?;
    let delta = Delta::new(dfa);
    let alphabet: Vec<&str> = dfa.alphabet().into_iter().collect();
    let slots = dfa.slots();

    let reachable = reachable_states(&delta, start, &slots);
    let finals: BitVec = dfa.states().iter().map(State::is_final).collect();

    let mut accepting = Vec::new();
    let mut rejecting = Vec::new();
    for (slot, state) in dfa.states().iter().enumerate() {
        if !reachable.contains(slot) {
            continue;
        }
        if finals[slot] {
            accepting.push(state.id());
        } else {
            rejecting.push(state.id());
        }
    }
    let mut blocks: Vec<Vec<StateId>> = vec![accepting, rejecting];
    blocks.retain(|block| !block.is_empty());

    loop {
        let block_of = block_index(&blocks);
        let mut refined = Vec::with_capacity(blocks.len());
        let mut changed = false;
        for block in &blocks {
            if block.len() == 1 {
                refined.push(block.clone());
                continue;
            }
            let groups = split_block(block, &alphabet, &delta, &block_of);
            changed |= groups.len() > 1;
            refined.extend(groups);
        }
        blocks = refined;
        if !changed {
            break;
        }
    }

    let block_of = block_index(&blocks);
    let mut minimized = Automaton::new();
    let ids: Vec<StateId> = blocks
        .iter()
        .enumerate()
        .map(|(n, block)| {
            let initial = block.contains(&start);
            let accepting = block
                .iter()
                .any(|&s| slots.slot(s).map_or(false, |slot| finals[slot]));
            minimized.push_state(initial, accepting, placement.place(n))
        })
        .collect();

    let mut written = HashSet::new();
    for (n, block) in blocks.iter().enumerate() {
        let representative = block[0];
        for &symbol in &alphabet {
            let target = match delta
                .next(representative, symbol)
                .and_then(|t| block_of.get(&t).copied())
            {
                Some(target) => target,
                None => continue,
            };
            if written.insert((n, symbol)) {
                minimized.push_transition(ids[n], ids[target], symbol);
            }
        }
    }

    Ok(minimized)
}

/// Slots of the states reachable from `start`.
fn reachable_states(delta: &Delta, start: StateId, slots: &Slots) -> BitSet {
    let mut reachable = BitSet::with_capacity(slots.len());
    let mut queue = VecDeque::new();
    if let Some(slot) = slots.slot(start) {
        reachable.insert(slot);
        queue.push_back(start);
    }
    while let Some(state) = queue.pop_front() {
        for next in delta.successors(state) {
            if slots.slot(next).map_or(false, |slot| reachable.insert(slot)) {
                queue.push_back(next);
            }
        }
    }
    reachable
}

fn block_index(blocks: &[Vec<StateId>]) -> HashMap<StateId, usize> {
    blocks
        .iter()
        .enumerate()
        .flat_map(|(n, block)| block.iter().map(move |&state| (state, n)))
        .collect()
}

/// Groups the members of `block` by the blocks their moves lead to, keeping
/// the order in which each group first shows up.
fn split_block(
    block: &[StateId],
    alphabet: &[&str],
    delta: &Delta,
    block_of: &HashMap<StateId, usize>,
) -> Vec<Vec<StateId>> {
    let mut groups: Vec<Vec<StateId>> = Vec::new();
    let mut by_signature: HashMap<Vec<Option<usize>>, usize> = HashMap::new();
    for &state in block {
        let signature: Vec<Option<usize>> = alphabet
            .iter()
            .map(|symbol| delta.next(state, symbol).and_then(|t| block_of.get(&t).copied()))
            .collect();
        let slot = *by_signature.entry(signature).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(state);
    }
    groups
}
