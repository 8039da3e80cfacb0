use std::mem::take;

use bit_set::BitSet;
use tracing::{debug, trace};

use super::Regex;
use crate::{error::DfaError, Dfa, StateIndex};

/// The linear system behind the state elimination. `to_final[i]` describes the words that
/// lead from state `i` directly into acceptance, `edges[i][j]` the words that lead from `i`
/// to `j` without visiting any state that is still present in between.
struct Elimination {
    to_final: Vec<Regex>,
    edges: Vec<Vec<Regex>>,
    remaining: BitSet,
}

impl Elimination {
    fn new(dfa: &Dfa) -> Self {
        let n = dfa.size();
        let to_final = dfa
            .state_indices()
            .map(|q| {
                if dfa.is_accepting(q) {
                    Regex::Epsilon
                } else {
                    Regex::Empty
                }
            })
            .collect();

        let mut edges = vec![vec![Regex::Empty; n]; n];
        for (source, symbol, target) in dfa.edges() {
            let current = take(&mut edges[source][target]);
            edges[source][target] = Regex::alt(current, Regex::literal(symbol));
        }

        Self {
            to_final,
            edges,
            remaining: dfa.state_indices().collect(),
        }
    }

    /// Removes `k` from the system. Its self loop is folded into its outgoing terms, which
    /// are then prepended with every incoming term and added to the respective entries.
    fn eliminate(&mut self, k: StateIndex) {
        self.remaining.remove(k);
        let others: Vec<StateIndex> = self.remaining.iter().collect();

        let repeat = Regex::star(take(&mut self.edges[k][k]));
        self.to_final[k] = Regex::concat(repeat.clone(), take(&mut self.to_final[k]));
        for &j in &others {
            self.edges[k][j] = Regex::concat(repeat.clone(), take(&mut self.edges[k][j]));
        }

        for &i in &others {
            let into = take(&mut self.edges[i][k]);
            if into.is_empty() {
                continue;
            }
            self.to_final[i] = Regex::alt(
                take(&mut self.to_final[i]),
                Regex::concat(into.clone(), self.to_final[k].clone()),
            );
            for &j in &others {
                self.edges[i][j] = Regex::alt(
                    take(&mut self.edges[i][j]),
                    Regex::concat(into.clone(), self.edges[k][j].clone()),
                );
            }
        }
        trace!(
            "eliminated state {k}, {} states remain",
            self.remaining.len()
        );
    }
}

impl Dfa {
    /// Synthesizes a regular expression that matches precisely the words accepted by `self`.
    /// States are eliminated in decreasing order of their index, the start state always
    /// comes last. See [`Dfa::to_regex_with_order`] for details.
    ///
    /// ```
    /// use dfa_synth::prelude::*;
    ///
    /// let dfa = Dfa::from_word(CharAlphabet::from("ab"), "ab").unwrap();
    /// assert_eq!(dfa.optimize().unwrap().to_regex().unwrap().to_string(), "ab");
    /// ```
    pub fn to_regex(&self) -> Result<Regex, DfaError> {
        let order: Vec<StateIndex> = self
            .state_indices()
            .rev()
            .filter(|q| *q != self.start())
            .collect();
        self.to_regex_with_order(&order)
    }

    /// Synthesizes a regular expression through Brzozowski's algebraic state elimination,
    /// removing the states in the given `order`. The order must list every state except
    /// for the start state exactly once, the start state is eliminated last. The result does
    /// not depend on the order in terms of the language it describes, though the syntactic
    /// shape of the expression usually does.
    ///
    /// The automaton must be total. Applying [`Dfa::optimize`] beforehand keeps the
    /// intermediate terms small.
    pub fn to_regex_with_order(&self, order: &[StateIndex]) -> Result<Regex, DfaError> {
        self.ensure_total()?;
        let invalid = || DfaError::InvalidEliminationOrder {
            order: order.to_vec(),
            size: self.size(),
        };
        if order.len() + 1 != self.size() {
            return Err(invalid());
        }
        let mut seen = BitSet::with_capacity(self.size());
        for &q in order {
            if q >= self.size() || q == self.start() || !seen.insert(q) {
                return Err(invalid());
            }
        }

        let mut system = Elimination::new(self);
        for &q in order.iter().chain(std::iter::once(&self.start())) {
            system.eliminate(q);
        }
        let regex = take(&mut system.to_final[self.start()]);

        debug!(
            "synthesized regex with {} nodes from automaton with {} states",
            regex.size(),
            self.size()
        );
        Ok(regex)
    }

    /// Works as [`Dfa::to_regex_with_order`] with an order that is drawn uniformly at random
    /// from a generator seeded with `seed`.
    #[cfg(feature = "random")]
    pub fn to_regex_shuffled(&self, seed: u64) -> Result<Regex, DfaError> {
        let order = crate::random::elimination_order(self, seed);
        trace!("drew elimination order {order:?} from seed {seed}");
        self.to_regex_with_order(&order)
    }
}
