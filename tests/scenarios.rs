use automata::{dfa, nfa, Automaton, AutomatonError, State, StateId};

fn next(aut: &Automaton, from: StateId, symbol: &str) -> Option<StateId> {
    aut.transitions()
        .iter()
        .find(|tr| tr.from() == from && tr.symbol() == symbol)
        .map(|tr| tr.to())
}

fn only_initial(aut: &Automaton) -> StateId {
    let initials: Vec<StateId> = aut.initial_states().map(State::id).collect();
    assert_eq!(initials.len(), 1, "expected one initial state in {:?}", aut);
    initials[0]
}

#[test]
fn single_transition_dfa() {
    let mut aut = Automaton::new();
    let q0 = aut.add_state();
    let q1 = aut.add_state();
    aut.set_initial_state(q0).unwrap();
    aut.toggle_final(q1).unwrap();
    aut.add_transition(q0, q1, "a").unwrap();

    assert!(dfa::accepts(&aut, "a").unwrap());
    assert!(matches!(
        dfa::accepts(&aut, "b"),
        Err(AutomatonError::UnknownSymbol(_))
    ));
    assert!(!dfa::accepts(&aut, "").unwrap());
}

#[test]
fn nfa_with_two_a_moves() {
    let mut aut = Automaton::new();
    let q0 = aut.add_state();
    let q1 = aut.add_state();
    let q2 = aut.add_state();
    aut.set_initial_state(q0).unwrap();
    aut.toggle_final(q2).unwrap();
    aut.add_transition(q0, q0, "a").unwrap();
    aut.add_transition(q0, q1, "a").unwrap();
    aut.add_transition(q1, q2, "b").unwrap();

    assert!(!dfa::is_deterministic(&aut));
    assert_eq!(nfa::epsilon_closure(&aut, [q0]), vec![q0]);

    let det = nfa::to_dfa(&aut).unwrap();
    assert!(dfa::is_deterministic(&det));

    let start = only_initial(&det);
    let q01 = next(&det, start, "a").unwrap();
    let q2 = next(&det, q01, "b").unwrap();
    assert!(!det.state(q01).unwrap().is_final());
    assert!(det.state(q2).unwrap().is_final());

    for word in ["ab", "aab", "aaaab"] {
        assert!(dfa::accepts(&det, word).unwrap(), "{}", word);
    }
    for word in ["", "a", "b", "abb", "aba"] {
        assert!(!dfa::accepts(&det, word).unwrap(), "{}", word);
    }
}

#[test]
fn minimization_keeps_distinguishable_states() {
    let mut aut = Automaton::new();
    let q0 = aut.add_state();
    let q1 = aut.add_state();
    let q2 = aut.add_state();
    aut.set_initial_state(q0).unwrap();
    aut.toggle_final(q2).unwrap();
    aut.add_transition(q0, q1, "a").unwrap();
    aut.add_transition(q1, q2, "a").unwrap();
    aut.add_transition(q2, q2, "a").unwrap();

    let min = dfa::minimize(&aut).unwrap();
    assert_eq!(min.states().len(), 3);
    assert_eq!(min.states().iter().filter(|s| s.is_final()).count(), 1);
    assert_eq!(dfa::minimize(&min).unwrap().states().len(), 3);
}

#[test]
fn determinize_then_minimize() {
    // (a|b)*abb, the textbook NFA
    let mut aut = Automaton::new();
    let states: Vec<StateId> = (0..4).map(|_| aut.add_state()).collect();
    aut.set_initial_state(states[0]).unwrap();
    aut.toggle_final(states[3]).unwrap();
    aut.add_transition(states[0], states[0], "a").unwrap();
    aut.add_transition(states[0], states[0], "b").unwrap();
    aut.add_transition(states[0], states[1], "a").unwrap();
    aut.add_transition(states[1], states[2], "b").unwrap();
    aut.add_transition(states[2], states[3], "b").unwrap();

    let det = nfa::to_dfa(&aut).unwrap();
    let min = dfa::minimize(&det).unwrap();
    assert_eq!(min.states().len(), 4);
    assert!(min.states().len() <= det.states().len());
    for word in ["abb", "aabb", "babb", "ababb"] {
        assert!(dfa::accepts(&min, word).unwrap(), "{}", word);
    }
    for word in ["", "ab", "abba", "bbb"] {
        assert!(!dfa::accepts(&min, word).unwrap(), "{}", word);
    }
}

#[test]
fn several_initial_states_are_refused() {
    let json = r#"{
        "states": [
            { "id": 0, "x": 0, "y": 0, "isInitial": true, "isFinal": false },
            { "id": 1, "x": 0, "y": 0, "isInitial": true, "isFinal": true }
        ],
        "transitions": [
            { "from": 0, "to": 1, "symbol": "a" },
            { "from": 0, "to": 0, "symbol": "a" }
        ],
        "alphabet": ["a"],
        "currentStateId": 2
    }"#;
    let mut aut = Automaton::from_json(json).unwrap();

    assert!(matches!(
        nfa::to_dfa(&aut),
        Err(AutomatonError::NoSingleInitialState(2))
    ));
    assert!(matches!(
        nfa::accepts(&aut, "a"),
        Err(AutomatonError::NoSingleInitialState(2))
    ));

    aut.delete_transition(0, 0, "a");
    assert!(matches!(
        dfa::accepts(&aut, "a"),
        Err(AutomatonError::NoSingleInitialState(2))
    ));
    assert!(matches!(
        dfa::minimize(&aut),
        Err(AutomatonError::NoSingleInitialState(2))
    ));

    aut.set_initial_state(0).unwrap();
    assert!(dfa::accepts(&aut, "a").unwrap());
}

#[test]
fn converted_automaton_survives_a_round_trip() {
    let mut aut = Automaton::new();
    let q0 = aut.add_state();
    let q1 = aut.add_state();
    aut.set_initial_state(q0).unwrap();
    aut.toggle_final(q1).unwrap();
    aut.add_transition(q0, q1, "x").unwrap();
    aut.add_transition(q0, q0, "x").unwrap();

    let det = nfa::to_dfa(&aut).unwrap().into_owned();
    let json = det.to_json_pretty().unwrap();
    let back = Automaton::from_json(&json).unwrap();
    assert_eq!(back, det);
    assert_eq!(back.next_state_id(), det.next_state_id());
}
