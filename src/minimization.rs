use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{error::DfaError, transition_table::TransitionTable, Dfa, StateIndex};

/// Symmetric relation over the states of an automaton which records the pairs that are
/// known to be distinguishable, i.e. for which some word leads one of them into an
/// accepting state and the other into a rejecting one.
struct Distinguishable(Vec<BitSet>);

impl Distinguishable {
    fn contains(&self, p: StateIndex, q: StateIndex) -> bool {
        self.0[p].contains(q)
    }

    fn mark(&mut self, p: StateIndex, q: StateIndex) {
        self.0[p].insert(q);
        self.0[q].insert(p);
    }
}

impl Dfa {
    /// Computes the distinguishability relation with the table-filling method. Pairs that
    /// differ in acceptance are marked first, then a pair is marked as soon as some symbol
    /// leads it to a marked pair, until nothing changes anymore.
    fn distinguishable_pairs(&self) -> Result<Distinguishable, DfaError> {
        let n = self.size();
        let symbols = self.alphabet().size();
        let successors = self
            .state_indices()
            .map(|q| {
                (0..symbols)
                    .map(|pos| self.successor_at(q, pos))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut marked = Distinguishable(vec![BitSet::with_capacity(n); n]);
        for p in 0..n {
            for q in (p + 1)..n {
                if self.is_accepting(p) != self.is_accepting(q) {
                    marked.mark(p, q);
                }
            }
        }

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for p in 0..n {
                for q in (p + 1)..n {
                    if marked.contains(p, q) {
                        continue;
                    }
                    let split = successors[p]
                        .iter()
                        .zip(successors[q].iter())
                        .any(|(&p_next, &q_next)| marked.contains(p_next, q_next));
                    if split {
                        marked.mark(p, q);
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        trace!("table filling stabilized after {passes} passes on {n} states");

        Ok(marked)
    }

    /// Returns all pairs `(p, q)` with `p < q` of states that cannot be distinguished by any
    /// word, which means they could be merged without changing the language.
    pub fn equivalent_pairs(&self) -> Result<Vec<(StateIndex, StateIndex)>, DfaError> {
        let marked = self.distinguishable_pairs()?;
        Ok(self
            .state_indices()
            .flat_map(|p| ((p + 1)..self.size()).map(move |q| (p, q)))
            .filter(|&(p, q)| !marked.contains(p, q))
            .collect())
    }

    /// Returns true if every state is reachable and no two states are equivalent, in other
    /// words if `self` is the minimal automaton for its language.
    pub fn is_minimal(&self) -> Result<bool, DfaError> {
        Ok(self.reachable_states()?.len() == self.size() && self.equivalent_pairs()?.is_empty())
    }

    /// Merges all states that are equivalent in the sense of Myhill and Nerode. Each class
    /// of equivalent states is represented by its smallest member and classes are numbered
    /// in increasing order of their representatives. The resulting state is accepting if
    /// the class contains an accepting state and transitions are inherited from the
    /// representative, which is sound as equivalent states have equivalent successors.
    ///
    /// The result is only guaranteed to be minimal if all states are reachable, use
    /// [`Dfa::optimize`] to get that for free.
    pub fn merge_equivalent(&self) -> Result<Dfa, DfaError> {
        let marked = self.distinguishable_pairs()?;

        let mut class_of = vec![0; self.size()];
        let mut representatives: Vec<StateIndex> = vec![];
        for q in self.state_indices() {
            match representatives
                .iter()
                .position(|&rep| !marked.contains(rep, q))
            {
                Some(class) => class_of[q] = class,
                None => {
                    class_of[q] = representatives.len();
                    representatives.push(q);
                }
            }
        }

        let symbols = self.alphabet().size();
        let mut table = TransitionTable::with_states(symbols, representatives.len());
        let mut accepting = BitSet::with_capacity(representatives.len());
        for (class, &rep) in representatives.iter().enumerate() {
            for pos in 0..symbols {
                table.set(class, pos, class_of[self.successor_at(rep, pos)?]);
            }
        }
        for q in self.accepting_states() {
            accepting.insert(class_of[q]);
        }

        debug!(
            "merged {} states into {} classes",
            self.size(),
            representatives.len()
        );
        Ok(Dfa::from_parts(
            self.alphabet().clone(),
            table,
            class_of[self.start()],
            accepting,
        ))
    }

    /// Computes the minimal automaton for the language of `self` by first removing all
    /// unreachable states and then merging equivalent ones. The order matters: merging
    /// on its own would also consider states that can never be visited.
    ///
    /// ```
    /// use dfa_synth::prelude::*;
    ///
    /// let alphabet = CharAlphabet::from("ab");
    /// let a = Dfa::from_word(alphabet.clone(), "a").unwrap();
    /// let b = Dfa::from_word(alphabet, "b").unwrap();
    /// let union = a.union(&b).unwrap();
    /// assert_eq!(union.size(), 9);
    /// assert_eq!(union.optimize().unwrap().size(), 3);
    /// ```
    pub fn optimize(&self) -> Result<Dfa, DfaError> {
        let optimized = self.prune_unreachable()?.merge_equivalent()?;
        debug!(
            "optimized automaton from {} to {} states",
            self.size(),
            optimized.size()
        );
        Ok(optimized)
    }
}

#[cfg(test)]
mod tests {
    use crate::{math::words_up_to, prelude::*};

    /// The classic example from Wikipedia's article on DFA minimization, states 0 and 1 as
    /// well as 2, 3 and 4 are equivalent, state 5 is a rejecting sink.
    fn wiki_dfa() -> Dfa {
        let mut dfa = Dfa::new(CharAlphabet::from("ab"));
        for _ in 1..6 {
            dfa.add_state();
        }
        for (from, on, to) in [
            (0, 'a', 1),
            (0, 'b', 2),
            (1, 'a', 0),
            (1, 'b', 3),
            (2, 'a', 4),
            (2, 'b', 5),
            (3, 'a', 4),
            (3, 'b', 5),
            (4, 'a', 4),
            (4, 'b', 5),
            (5, 'a', 5),
            (5, 'b', 5),
        ] {
            dfa.add_transition(from, to, on).unwrap();
        }
        for q in [2, 3, 4] {
            dfa.add_final(q).unwrap();
        }
        dfa
    }

    #[test_log::test]
    fn wiki_example() {
        let dfa = wiki_dfa();
        assert_eq!(dfa.equivalent_pairs().unwrap(), vec![(0, 1), (2, 3), (2, 4), (3, 4)]);
        assert!(!dfa.is_minimal().unwrap());

        let merged = dfa.merge_equivalent().unwrap();
        assert_eq!(merged.size(), 3);
        assert_eq!(merged.start(), 0);
        assert_eq!(merged.accepting_states().collect::<Vec<_>>(), vec![1]);
        assert_eq!(merged.successor(0, 'a'), Ok(0));
        assert_eq!(merged.successor(0, 'b'), Ok(1));
        assert_eq!(merged.successor(1, 'b'), Ok(2));
        assert!(merged.is_minimal().unwrap());

        for w in words_up_to(&['a', 'b'], 6) {
            assert_eq!(merged.accepts(&w), dfa.accepts(&w));
        }
    }

    #[test]
    fn union_of_two_letters() {
        let alphabet = CharAlphabet::from("ab");
        let union = Dfa::from_word(alphabet.clone(), "a")
            .unwrap()
            .union(&Dfa::from_word(alphabet, "b").unwrap())
            .unwrap();
        let optimized = union.optimize().unwrap();

        assert_eq!(optimized.size(), 3);
        assert!(optimized.accepts("a").unwrap());
        assert!(optimized.accepts("b").unwrap());
        for w in ["", "ab", "aa", "ba", "bb"] {
            assert!(!optimized.accepts(w).unwrap(), "{w:?} must be rejected");
        }
        assert!(optimized.is_minimal().unwrap());
    }

    #[test]
    fn optimize_is_idempotent_and_preserves_language() {
        let alphabet = CharAlphabet::from("ab");
        let dfa = ["ab", "abb", "b", "bab"]
            .into_iter()
            .map(|w| Dfa::from_word(alphabet.clone(), w).unwrap())
            .try_fold(Dfa::trivial(alphabet.clone()), |acc, next| acc.union(&next))
            .unwrap();

        let once = dfa.optimize().unwrap();
        let twice = once.optimize().unwrap();
        assert!(once.is_minimal().unwrap());
        assert!(twice.is_isomorphic(&once).unwrap());
        assert_eq!(twice.size(), once.size());
        assert!(once.equivalent(&dfa).unwrap());
        for w in words_up_to(&['a', 'b'], 5) {
            assert_eq!(once.accepts(&w).unwrap(), dfa.accepts(&w).unwrap());
        }
    }

    #[test]
    fn merging_alone_considers_unreachable_states() {
        let mut dfa = Dfa::new(CharAlphabet::from("a"));
        let s = dfa.add_state();
        let ghost = dfa.add_state();
        dfa.add_transition(s, s, 'a').unwrap();
        dfa.add_transition(ghost, ghost, 'a').unwrap();
        dfa.set_start(s).unwrap();
        dfa.add_final(s).unwrap();
        dfa.add_final(ghost).unwrap();

        // the ghost is equivalent to the start state and merged with it, the sink stays
        assert_eq!(dfa.merge_equivalent().unwrap().size(), 2);
        assert_eq!(dfa.optimize().unwrap().size(), 1);
        assert!(dfa.optimize().unwrap().accepts("aaa").unwrap());
    }

    #[test]
    fn empty_language_collapses_to_one_state() {
        let alphabet = CharAlphabet::from("ab");
        let a = Dfa::from_word(alphabet.clone(), "a").unwrap();
        let b = Dfa::from_word(alphabet, "b").unwrap();
        let nothing = a.intersection(&b).unwrap().optimize().unwrap();
        assert_eq!(nothing.size(), 1);
        assert!(nothing.is_empty_language().unwrap());
    }
}
