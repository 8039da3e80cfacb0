use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::debug;

use crate::{
    error::DfaError,
    math::{Bijection, Map},
    transition_table::TransitionTable,
    Dfa, StateIndex,
};

impl Dfa {
    /// Returns the states that are reachable from the start state, in the order in which a
    /// breadth-first search over the symbols in alphabet order discovers them. The start
    /// state always comes first.
    pub fn reachable_states(&self) -> Result<Vec<StateIndex>, DfaError> {
        let mut seen = BitSet::with_capacity(self.size());
        let mut order = vec![self.start()];
        seen.insert(self.start());

        let mut next = 0;
        while let Some(&q) = order.get(next) {
            next += 1;
            for pos in 0..self.alphabet().size() {
                let p = self.successor_at(q, pos)?;
                if seen.insert(p) {
                    order.push(p);
                }
            }
        }
        Ok(order)
    }

    /// Builds a new automaton that only consists of the states reachable from the start
    /// state. The remaining states are renumbered densely in the order given by
    /// [`Dfa::reachable_states`], so the start state of the result is `0`.
    ///
    /// Fails if the exploration runs into a transition that has not been wired.
    pub fn prune_unreachable(&self) -> Result<Dfa, DfaError> {
        let reachable = self.reachable_states()?;
        let translation: Map<StateIndex, StateIndex> = reachable
            .iter()
            .enumerate()
            .map(|(new, old)| (*old, new))
            .collect();

        let symbols = self.alphabet().size();
        let mut table = TransitionTable::with_states(symbols, reachable.len());
        let mut accepting = BitSet::with_capacity(reachable.len());
        for (new, &old) in reachable.iter().enumerate() {
            for pos in 0..symbols {
                // every successor of a reachable state is itself reachable
                let target = translation[&self.successor_at(old, pos)?];
                table.set(new, pos, target);
            }
            if self.is_accepting(old) {
                accepting.insert(new);
            }
        }

        debug!(
            "pruned {} unreachable states, {} remain",
            self.size() - reachable.len(),
            reachable.len()
        );
        Ok(Dfa::from_parts(
            self.alphabet().clone(),
            table,
            translation[&self.start()],
            accepting,
        ))
    }

    /// Tries to construct a shortest word that is accepted. If the accepted language is
    /// empty, `None` is returned.
    pub fn give_word(&self) -> Result<Option<String>, DfaError> {
        let mut parent: Map<StateIndex, (StateIndex, char)> = Map::default();
        let mut seen = BitSet::with_capacity(self.size());
        let mut queue = VecDeque::from([self.start()]);
        seen.insert(self.start());

        while let Some(q) = queue.pop_front() {
            if self.is_accepting(q) {
                let mut word = vec![];
                let mut current = q;
                while let Some(&(prev, sym)) = parent.get(&current) {
                    word.push(sym);
                    current = prev;
                }
                return Ok(Some(word.into_iter().rev().collect()));
            }
            for (pos, sym) in self.alphabet().universe().enumerate() {
                let p = self.successor_at(q, pos)?;
                if seen.insert(p) {
                    parent.insert(p, (q, sym));
                    queue.push_back(p);
                }
            }
        }
        Ok(None)
    }

    /// Returns true if and only if the accepted language is empty.
    pub fn is_empty_language(&self) -> Result<bool, DfaError> {
        Ok(self.give_word()?.is_none())
    }

    /// Checks whether the reachable parts of `self` and `other` are the same up to the
    /// naming of states. This is the case if there is a bijection between their reachable
    /// states that maps start to start, preserves acceptance and commutes with the
    /// transitions. Automata over different alphabets are never isomorphic.
    pub fn is_isomorphic(&self, other: &Dfa) -> Result<bool, DfaError> {
        if self.alphabet() != other.alphabet() {
            return Ok(false);
        }
        let mut bijection: Bijection<StateIndex, StateIndex> = Bijection::new();
        let mut queue = VecDeque::from([(self.start(), other.start())]);
        bijection.insert(self.start(), other.start());

        while let Some((p, q)) = queue.pop_front() {
            if self.is_accepting(p) != other.is_accepting(q) {
                return Ok(false);
            }
            for pos in 0..self.alphabet().size() {
                let (p_next, q_next) = (self.successor_at(p, pos)?, other.successor_at(q, pos)?);
                match (
                    bijection.get_by_left(&p_next),
                    bijection.get_by_right(&q_next),
                ) {
                    (None, None) => {
                        bijection.insert(p_next, q_next);
                        queue.push_back((p_next, q_next));
                    }
                    (Some(&mapped), Some(_)) if mapped == q_next => {}
                    _ => return Ok(false),
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::{math::words_up_to, prelude::*};

    /// Start state 1 accepts on its own, state 2 is accepting but nothing leads to it.
    fn with_unreachable_final() -> Dfa {
        let mut dfa = Dfa::new(CharAlphabet::from("ab"));
        let s = dfa.add_state();
        dfa.add_transition(s, SINK, 'a').unwrap();
        dfa.add_transition(s, SINK, 'b').unwrap();
        dfa.set_start(s).unwrap();
        dfa.add_final(s).unwrap();

        let unreachable = dfa.add_state();
        dfa.add_transition(unreachable, SINK, 'a').unwrap();
        dfa.add_transition(unreachable, SINK, 'b').unwrap();
        dfa.add_final(unreachable).unwrap();
        dfa
    }

    #[test_log::test]
    fn pruning_drops_unreachable_final_state() {
        let dfa = with_unreachable_final();
        assert_eq!(dfa.reachable_states().unwrap(), vec![1, 0]);

        let pruned = dfa.prune_unreachable().unwrap();
        assert_eq!(pruned.size(), 2);
        assert_eq!(pruned.start(), 0);
        assert_eq!(pruned.accepting_states().collect::<Vec<_>>(), vec![0]);
        for w in words_up_to(&['a', 'b'], 4) {
            assert_eq!(pruned.accepts(&w).unwrap(), dfa.accepts(&w).unwrap());
        }
    }

    #[test]
    fn pruning_keeps_everything_reachable() {
        let dfa = Dfa::from_word(CharAlphabet::from("ab"), "aba").unwrap();
        let pruned = dfa.prune_unreachable().unwrap();
        assert_eq!(pruned.size(), dfa.size());
        assert!(pruned.is_isomorphic(&dfa).unwrap());
    }

    #[test]
    fn pruning_reports_missing_transitions() {
        let mut dfa = Dfa::new(CharAlphabet::from("ab"));
        let s = dfa.add_state();
        dfa.set_start(s).unwrap();
        dfa.add_transition(s, SINK, 'a').unwrap();
        assert_eq!(
            dfa.prune_unreachable(),
            Err(DfaError::UndefinedTransition {
                state: s,
                symbol: 'b'
            })
        );
    }

    #[test]
    fn witnesses() {
        let alphabet = CharAlphabet::from("ab");
        let dfa = Dfa::from_word(alphabet.clone(), "bab").unwrap();
        assert_eq!(dfa.give_word().unwrap(), Some("bab".to_string()));
        assert!(!dfa.is_empty_language().unwrap());

        let empty = Dfa::trivial(alphabet.clone());
        assert_eq!(empty.give_word().unwrap(), None);
        assert!(empty.is_empty_language().unwrap());

        let union = dfa
            .union(&Dfa::from_word(alphabet, "a").unwrap())
            .unwrap();
        assert_eq!(union.give_word().unwrap(), Some("a".to_string()));
    }

    #[test]
    fn isomorphism() {
        let alphabet = CharAlphabet::from("ab");
        let ab = Dfa::from_word(alphabet.clone(), "ab").unwrap();
        let ba = Dfa::from_word(alphabet.clone(), "ba").unwrap();
        assert!(ab.is_isomorphic(&ab.prune_unreachable().unwrap()).unwrap());
        assert!(!ab.is_isomorphic(&ba).unwrap());
        assert!(!ab.is_isomorphic(&Dfa::trivial(alphabet)).unwrap());
        assert!(!ab
            .is_isomorphic(&Dfa::from_word(CharAlphabet::from("abc"), "ab").unwrap())
            .unwrap());
    }
}
