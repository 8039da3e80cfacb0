//! Library for building, combining, minimizing and converting deterministic finite automata
//! (DFAs) over a small, explicitly enumerated alphabet.
//!
//! The typical pipeline starts from a collection of literal words. Each word is turned into a
//! [`Dfa`] that accepts precisely this word ([`Dfa::from_word`]), the automata are combined
//! into one that accepts their union through a product construction ([`Dfa::union`]) and the
//! result is reduced to the unique minimal automaton for the language ([`Dfa::optimize`]).
//! Finally, an equivalent regular expression can be synthesized with [`Dfa::to_regex`].
//!
//! ```
//! use dfa_synth::prelude::*;
//!
//! let alphabet = CharAlphabet::from("ab");
//! let dfa = union_of_words(&alphabet, ["ab", "b"]).unwrap();
//! assert!(dfa.accepts("ab").unwrap());
//! assert!(!dfa.accepts("a").unwrap());
//! assert!(dfa.to_regex().unwrap().matches("b"));
//! ```
//!
//! The most important pieces are
//! - [`Dfa`], which stores its transition function densely in a
//!   [`transition_table::TransitionTable`], so every state is simply an index into that table.
//! - [`product`], which implements the cross product of two automata and with that boolean
//!   combinations of their languages.
//! - [`reachable`] and [`minimization`], which remove unreachable states and merge states that
//!   cannot be distinguished by any word.
//! - [`regex`], a small term algebra for regular expressions together with the state
//!   elimination procedure that produces such terms from automata.
//! - [`dot`], which hands automata to a visualization sink such as graphviz.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfa_synth::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::CharAlphabet,
        automaton::{Dfa, Stats, SINK},
        dot::{DotGraph, GraphSink, NodeLabel},
        error::DfaError,
        product::Combination,
        regex::Regex,
        sample::{read_words, union_of_words},
        StateIndex,
    };
}

/// Index of a state in an automaton.
pub type StateIndex = usize;

/// This module contains some type aliases and helpers which are used throughout the crate.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;

/// Dense storage of transition functions.
pub mod transition_table;

/// Defines the deterministic finite automaton itself.
pub mod automaton;
pub use automaton::Dfa;

/// Errors raised by the operations of this crate.
pub mod error;

/// Product construction of automata and the boolean combinations built on it.
pub mod product;

/// Reachability analysis: pruning of unreachable states, emptiness and isomorphism checks.
pub mod reachable;

/// Minimization by merging states that are indistinguishable.
pub mod minimization;

/// Regular expressions as terms and their synthesis from automata.
pub mod regex;

/// Handing automata to a visualization sink, with a graphviz implementation.
pub mod dot;

/// Reading words and building the automaton for a finite set of words.
pub mod sample;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;
