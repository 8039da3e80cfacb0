use fastrand::Rng;
use tracing::debug;

use crate::{alphabet::CharAlphabet, math, Dfa, StateIndex};

/// Uses a sprout-like algorithm to generate a random automaton in which every state is
/// reachable. `symbols` determines the number of distinct symbols in the [`CharAlphabet`].
/// `probability` determines the probability of a back edge to some state being inserted.
/// The algorithm is as follows:
/// 1. Start with a single state.
/// 2. For each symbol, go through the existing states in order and with probability `probability`
///    add a back edge to that state.
/// 3. If no back edge to some state was added, we insert an edge to a new state.
/// 4. Repeat until all states and symbols have been treated.
///
/// Every state is made accepting with probability one half. As the automaton is built from
/// scratch, state 0 is the start state here and not a sink.
pub fn generate_random_sprout_dfa(symbols: usize, probability: f64, seed: u64) -> Dfa {
    let mut rng = Rng::with_seed(seed);
    let alphabet = CharAlphabet::of_size(symbols);
    let mut dfa = Dfa::new(alphabet.clone());

    let mut current: StateIndex = 0;
    let mut symbol_position = 0;

    'outer: loop {
        if current >= dfa.size() {
            // we have treated all states, we can exit
            break 'outer;
        }

        if symbol_position >= symbols {
            // we have treated all symbols, go to next state
            symbol_position = 0;
            current += 1;
            continue 'outer;
        }

        let symbol = alphabet[symbol_position];
        symbol_position += 1;

        for target in 0..=current {
            if rng.f64() < probability {
                wire(&mut dfa, current, target, symbol);
                continue 'outer;
            }
        }

        // no target was found so we create it
        let target = dfa.add_state();
        wire(&mut dfa, current, target, symbol);
    }

    color_randomly(&mut dfa, &mut rng);
    debug!("sprouted random automaton with {} states", dfa.size());
    dfa
}

/// Generate a random automaton of size `size` by randomly drawing transitions.
/// `symbols` determines the number of distinct symbols in the [`CharAlphabet`].
/// The algorithm is as follows:
/// 1. Start with `size` states and no transitions.
/// 2. For each state, for each symbol draw a target state and add the corresponding edge.
/// 3. Make each state accepting with probability one half.
///
/// State 0 is the start state, depending on the drawn transitions there may be unreachable states.
pub fn generate_random_dfa(symbols: usize, size: usize, seed: u64) -> Dfa {
    assert!(size > 0, "an automaton needs at least one state");
    let mut rng = Rng::with_seed(seed);
    let alphabet = CharAlphabet::of_size(symbols);
    let mut dfa = Dfa::new(alphabet.clone());
    for _ in 1..size {
        dfa.add_state();
    }
    for q in dfa.state_indices() {
        for symbol in alphabet.universe() {
            let target = rng.usize(..size);
            wire(&mut dfa, q, target, symbol);
        }
    }
    color_randomly(&mut dfa, &mut rng);
    dfa
}

fn wire(dfa: &mut Dfa, from: StateIndex, to: StateIndex, symbol: char) {
    dfa.add_transition(from, to, symbol)
        .expect("random generation only uses existing states and symbols");
}

fn color_randomly(dfa: &mut Dfa, rng: &mut Rng) {
    for q in dfa.state_indices() {
        if rng.bool() {
            dfa.add_final(q).expect("state exists");
        }
    }
}

/// Generate a random `String` over the universe of the `alphabet`
/// The length of the `String` is drawn uniformly from the range `min_len..=max_len`.
pub fn generate_random_word(
    alphabet: &CharAlphabet,
    min_len: usize,
    max_len: usize,
    rng: &mut Rng,
) -> String {
    let charset = alphabet.symbols();
    let length = rng.usize(min_len..=max_len);
    (0..length)
        .map(|_| charset[rng.usize(..charset.len())])
        .collect()
}

/// Generate a set of `number` distinct random `String`s over the universe of the `alphabet`.
/// The length for each sampled word is drawn uniformly from the range `min_len..=max_len`.
/// Panics if there are fewer than `number` such words.
pub fn generate_random_words(
    alphabet: &CharAlphabet,
    min_len: usize,
    max_len: usize,
    number: usize,
    seed: u64,
) -> math::Set<String> {
    let available = (min_len..=max_len)
        .map(|len| alphabet.size().saturating_pow(len as u32))
        .fold(0usize, usize::saturating_add);
    assert!(
        number <= available,
        "cannot draw {number} distinct words, only {available} exist"
    );

    let mut rng = Rng::with_seed(seed);
    let mut word_set = math::Set::with_capacity_and_hasher(number, Default::default());
    while word_set.len() < number {
        word_set.insert(generate_random_word(alphabet, min_len, max_len, &mut rng));
    }
    word_set
}

/// Draws an order in which the states of `dfa` can be eliminated when synthesizing a
/// regular expression, that is a permutation of all states except the start state.
pub fn elimination_order(dfa: &Dfa, seed: u64) -> Vec<StateIndex> {
    let mut order: Vec<StateIndex> = dfa
        .state_indices()
        .filter(|q| *q != dfa.start())
        .collect();
    Rng::with_seed(seed).shuffle(&mut order);
    order
}
