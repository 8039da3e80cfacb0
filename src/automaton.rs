use std::fmt::Display;

use bit_set::BitSet;
use owo_colors::OwoColorize;
use tracing::trace;

use crate::{
    alphabet::{CharAlphabet, SymbolPosition},
    error::DfaError,
    transition_table::TransitionTable,
    StateIndex,
};

/// The state that rejects everything. Every automaton that is built from scratch has it
/// at index 0, it is not accepting and loops on every symbol.
pub const SINK: StateIndex = 0;

/// A deterministic finite automaton (DFA) over a [`CharAlphabet`]. It accepts a finite word
/// if the run on that word, starting in the start state, ends in an accepting state.
///
/// States are the indices `0..size()`. The transition function is stored densely in a
/// [`TransitionTable`] and is total for every automaton produced by the constructors and
/// operations of this crate. Automata assembled through [`Dfa::add_state`],
/// [`Dfa::add_transition`], [`Dfa::add_final`] and [`Dfa::set_start`] may lack some
/// transitions until they are fully wired; any operation that needs such a transition
/// fails with [`DfaError::UndefinedTransition`].
///
/// # Example
/// ```
/// use dfa_synth::prelude::*;
///
/// let dfa = Dfa::from_word(CharAlphabet::from("ab"), "ab").unwrap();
/// assert!(dfa.accepts("ab").unwrap());
/// assert!(!dfa.accepts("abb").unwrap());
/// assert!(dfa.accepts("abc").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    alphabet: CharAlphabet,
    table: TransitionTable,
    start: StateIndex,
    accepting: BitSet,
}

impl Dfa {
    /// Creates the trivial automaton over `alphabet`, which consists only of the rejecting
    /// [`SINK`] and thus accepts nothing. This is the starting point for assembling an
    /// automaton by hand.
    pub fn new(alphabet: CharAlphabet) -> Self {
        Self::trivial(alphabet)
    }

    /// Creates the one-state automaton that accepts the empty language. It is the
    /// neutral element for [`Dfa::union`].
    pub fn trivial(alphabet: CharAlphabet) -> Self {
        let mut table = TransitionTable::new(alphabet.size());
        let sink = table.add_state();
        for pos in 0..alphabet.size() {
            table.set(sink, pos, SINK);
        }
        Self {
            alphabet,
            table,
            start: SINK,
            accepting: BitSet::new(),
        }
    }

    /// Builds an automaton accepting exactly the given `word`. The result has
    /// `word.len() + 2` states: the [`SINK`], the start state `1` and one further state
    /// for each symbol of the word. The last of them is the only accepting state and
    /// every deviation from the word, as well as any input after it, leads into the sink.
    ///
    /// Fails with [`DfaError::UnknownSymbol`] if the word uses a symbol outside of `alphabet`.
    pub fn from_word(alphabet: CharAlphabet, word: &str) -> Result<Self, DfaError> {
        let positions = word
            .chars()
            .map(|sym| alphabet.position(sym).ok_or(DfaError::UnknownSymbol(sym)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut dfa = Self::trivial(alphabet);
        let start = dfa.table.add_state();
        let mut current = start;
        for expected in positions {
            let next = dfa.table.add_state();
            for pos in 0..dfa.alphabet.size() {
                let target = if pos == expected { next } else { SINK };
                dfa.table.set(current, pos, target);
            }
            current = next;
        }
        for pos in 0..dfa.alphabet.size() {
            dfa.table.set(current, pos, SINK);
        }
        dfa.start = start;
        dfa.accepting.insert(current);

        trace!(
            "built automaton with {} states for word \"{word}\"",
            dfa.size()
        );
        Ok(dfa)
    }

    pub(crate) fn from_parts(
        alphabet: CharAlphabet,
        table: TransitionTable,
        start: StateIndex,
        accepting: BitSet,
    ) -> Self {
        debug_assert_eq!(alphabet.size(), table.symbols());
        debug_assert!(start < table.size());
        Self {
            alphabet,
            table,
            start,
            accepting,
        }
    }

    /// The alphabet over which the automaton operates.
    pub fn alphabet(&self) -> &CharAlphabet {
        &self.alphabet
    }

    /// Number of states.
    pub fn size(&self) -> usize {
        self.table.size()
    }

    /// The designated start state.
    pub fn start(&self) -> StateIndex {
        self.start
    }

    pub(crate) fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub(crate) fn accepting_set(&self) -> &BitSet {
        &self.accepting
    }

    /// Iterates over the indices of all states.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.size()
    }

    /// Returns true if `state` is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the indices of all states that are accepting, in increasing order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.accepting.iter()
    }

    /// Returns the state reached from `state` on `symbol`.
    pub fn successor(&self, state: StateIndex, symbol: char) -> Result<StateIndex, DfaError> {
        self.alphabet
            .position(symbol)
            .and_then(|pos| self.table.get(state, pos))
            .ok_or(DfaError::UndefinedTransition { state, symbol })
    }

    /// Same as [`Dfa::successor`], but addresses the symbol by its position.
    #[inline(always)]
    pub(crate) fn successor_at(
        &self,
        state: StateIndex,
        pos: SymbolPosition,
    ) -> Result<StateIndex, DfaError> {
        self.table
            .get(state, pos)
            .ok_or_else(|| DfaError::UndefinedTransition {
                state,
                symbol: self.alphabet[pos],
            })
    }

    /// Runs the automaton on `word` from the start state and returns the state it ends in.
    pub fn reached_state(&self, word: &str) -> Result<StateIndex, DfaError> {
        word.chars()
            .try_fold(self.start, |state, symbol| self.successor(state, symbol))
    }

    /// Decides whether `word` is accepted. Fails with [`DfaError::UndefinedTransition`] if
    /// the word contains a symbol outside the alphabet or the run needs a transition that
    /// has not been wired.
    pub fn accepts(&self, word: &str) -> Result<bool, DfaError> {
        self.reached_state(word).map(|q| self.is_accepting(q))
    }

    /// Checks whether every state has a successor on every symbol.
    pub fn is_total(&self) -> bool {
        self.table.is_total()
    }

    /// Returns an error pointing at the first missing transition, if there is one.
    pub fn ensure_total(&self) -> Result<(), DfaError> {
        match self.table.first_undefined() {
            None => Ok(()),
            Some((state, pos)) => Err(DfaError::UndefinedTransition {
                state,
                symbol: self.alphabet[pos],
            }),
        }
    }

    /// Iterates over all wired transitions as triples `(source, symbol, target)`.
    pub fn edges(&self) -> impl Iterator<Item = (StateIndex, char, StateIndex)> + '_ {
        self.table
            .transitions()
            .map(|(source, pos, target)| (source, self.alphabet[pos], target))
    }

    /// Adds a fresh state without any outgoing transitions and returns its index.
    pub fn add_state(&mut self) -> StateIndex {
        self.table.add_state()
    }

    /// Adds (or replaces) the transition from `from` on `on` into `to`.
    pub fn add_transition(
        &mut self,
        from: StateIndex,
        to: StateIndex,
        on: char,
    ) -> Result<(), DfaError> {
        self.check_state(from)?;
        self.check_state(to)?;
        let pos = self
            .alphabet
            .position(on)
            .ok_or(DfaError::UnknownSymbol(on))?;
        self.table.set(from, pos, to);
        Ok(())
    }

    /// Marks `state` as accepting.
    pub fn add_final(&mut self, state: StateIndex) -> Result<(), DfaError> {
        self.check_state(state)?;
        self.accepting.insert(state);
        Ok(())
    }

    /// Makes `state` the start state.
    pub fn set_start(&mut self, state: StateIndex) -> Result<(), DfaError> {
        self.check_state(state)?;
        self.start = state;
        Ok(())
    }

    fn check_state(&self, state: StateIndex) -> Result<(), DfaError> {
        if state < self.size() {
            Ok(())
        } else {
            Err(DfaError::UnknownState {
                state,
                size: self.size(),
            })
        }
    }

    /// Computes the complement of `self` by swapping accepting and non-accepting states.
    /// This is only sound for total automata, so a missing transition is reported as error.
    pub fn complement(&self) -> Result<Self, DfaError> {
        self.ensure_total()?;
        let accepting = self
            .state_indices()
            .filter(|q| !self.is_accepting(*q))
            .collect();
        Ok(Self {
            accepting,
            ..self.clone()
        })
    }

    /// Collects some statistics about the automaton.
    pub fn stats(&self) -> Stats {
        Stats {
            states: self.size(),
            accepting: self.accepting.len(),
            transitions: self.table.transitions().count(),
            symbols: self.alphabet.size(),
        }
    }

    /// Returns a string representation of the transition table, with one row per state
    /// and one column per symbol. The start state is marked with an arrow, accepting
    /// states with a trailing asterisk.
    pub fn build_transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.universe().map(String::from)),
        );
        for q in self.state_indices() {
            let mut label = format!("q{q}");
            if self.is_accepting(q) {
                label = format!("{label}*").bold().to_string();
            }
            if q == self.start {
                label = format!("→ {label}");
            }
            let mut row = vec![label];
            row.extend(self.table.row(q).iter().map(|cell| match cell {
                Some(target) => format!("q{target}"),
                None => "-".to_string(),
            }));
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_transition_table())
    }
}

/// Size information about a [`Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Number of states.
    pub states: usize,
    /// Number of accepting states.
    pub accepting: usize,
    /// Number of wired transitions.
    pub transitions: usize,
    /// Size of the alphabet.
    pub symbols: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "states: {}, accepting: {}, transitions: {}, symbols: {}",
            self.states, self.accepting, self.transitions, self.symbols
        )
    }
}
