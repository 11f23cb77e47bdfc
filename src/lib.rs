//! Finite automata: build them, check whether they are deterministic, run
//! strings through them, turn an NFA into a DFA and shrink a DFA to its
//! minimal form.
//!
//! ```
//! use automata::{dfa, nfa, Automaton};
//!
//! let mut aut = Automaton::new();
//! let q0 = aut.add_state();
//! let q1 = aut.add_state();
//! aut.set_initial_state(q0)?;
//! aut.set_final(q1, true)?;
//! aut.add_transition(q0, q0, "a")?;
//! aut.add_transition(q0, q1, "a")?;
//!
//! assert!(!dfa::is_deterministic(&aut));
//! let det = nfa::to_dfa(&aut)?;
//! let min = dfa::minimize(&det)?;
//! assert!(dfa::accepts(&min, "aaa")?);
//! # Ok::<(), automata::AutomatonError>(())
//! ```

pub mod automaton;
pub mod config;
pub mod dfa;
pub mod error;
pub mod layout;
pub mod library;
pub mod nfa;
pub mod snapshot;

pub use automaton::{Automaton, Position, State, StateId, Summary, Transition, EPSILON};
pub use error::{AutomatonError, Result};
