use thiserror::Error;

use crate::{alphabet::CharAlphabet, StateIndex};

/// Errors that can occur when building, running or combining automata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DfaError {
    /// A run needed the successor of `state` on `symbol`, but there is none. Either the
    /// symbol is not part of the alphabet or the automaton has not been fully wired yet.
    #[error("undefined transition from {state} on '{symbol}'")]
    UndefinedTransition {
        /// The state in which the run got stuck.
        state: StateIndex,
        /// The symbol that could not be processed.
        symbol: char,
    },
    /// A product was requested for two automata over different alphabets.
    #[error("alphabets {left} and {right} do not match")]
    AlphabetMismatch {
        /// Alphabet of the left operand.
        left: CharAlphabet,
        /// Alphabet of the right operand.
        right: CharAlphabet,
    },
    /// The symbol is not part of the alphabet of the automaton.
    #[error("symbol '{0}' is not part of the alphabet")]
    UnknownSymbol(char),
    /// The state does not exist in an automaton with `size` states.
    #[error("state {state} does not exist, automaton has {size} states")]
    UnknownState {
        /// The offending state.
        state: StateIndex,
        /// Number of states of the automaton.
        size: usize,
    },
    /// The elimination order given to the regex synthesis is not a permutation of the states.
    #[error("elimination order {order:?} is not a permutation of the {size} states")]
    InvalidEliminationOrder {
        /// The rejected order.
        order: Vec<StateIndex>,
        /// Number of states of the automaton.
        size: usize,
    },
}
