use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{error::DfaError, transition_table::TransitionTable, Dfa, StateIndex};

/// Determines which states of a product are accepting, based on whether the two
/// component states are accepting. Each variant realizes a boolean combination of the
/// languages of the two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    /// Accepting if either component accepts.
    Union,
    /// Accepting if both components accept.
    Intersection,
    /// Accepting if the left component accepts but the right one does not.
    Difference,
    /// Accepting if precisely one of the components accepts.
    SymmetricDifference,
}

impl Combination {
    /// Applies the rule to the acceptance of the left and right component.
    pub fn combine(self, left: bool, right: bool) -> bool {
        match self {
            Combination::Union => left || right,
            Combination::Intersection => left && right,
            Combination::Difference => left && !right,
            Combination::SymmetricDifference => left != right,
        }
    }
}

/// Identifies a state of a product automaton through the pair of component states it
/// corresponds to. In the product, the pair `(l, r)` is stored at the row-major position
/// `l * right_size + r`, where `right_size` is the number of states of the right operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductIndex(pub StateIndex, pub StateIndex);

impl ProductIndex {
    /// Gives the state of the product that corresponds to `self`.
    #[inline(always)]
    pub fn translate(self, right_size: usize) -> StateIndex {
        self.0 * right_size + self.1
    }

    /// Inverse of [`ProductIndex::translate`].
    #[inline(always)]
    pub fn split(state: StateIndex, right_size: usize) -> Self {
        ProductIndex(state / right_size, state % right_size)
    }
}

/// Builds the cross product of `left` and `right`. The product has one state for every
/// pair of states, see [`ProductIndex`] for the numbering, it starts in the pair of start
/// states and moves on a symbol by moving both components. A pair is accepting if
/// `combination` says so.
///
/// Both automata must share the same alphabet, otherwise [`DfaError::AlphabetMismatch`] is
/// returned, and both must be total. Most product states are usually unreachable, removing
/// them is left to [`Dfa::prune_unreachable`].
pub fn product(left: &Dfa, right: &Dfa, combination: Combination) -> Result<Dfa, DfaError> {
    if left.alphabet() != right.alphabet() {
        return Err(DfaError::AlphabetMismatch {
            left: left.alphabet().clone(),
            right: right.alphabet().clone(),
        });
    }
    left.ensure_total()?;
    right.ensure_total()?;

    let symbols = left.alphabet().size();
    let right_size = right.size();
    let mut table = TransitionTable::with_states(symbols, left.size() * right_size);
    let mut accepting = BitSet::with_capacity(left.size() * right_size);

    for l in left.state_indices() {
        for r in right.state_indices() {
            let source = ProductIndex(l, r).translate(right_size);
            for pos in 0..symbols {
                let target =
                    ProductIndex(left.successor_at(l, pos)?, right.successor_at(r, pos)?);
                table.set(source, pos, target.translate(right_size));
            }
            if combination.combine(left.is_accepting(l), right.is_accepting(r)) {
                accepting.insert(source);
            }
        }
    }

    let start = ProductIndex(left.start(), right.start()).translate(right_size);
    trace!(
        "{combination:?} product of automata with {} and {} states",
        left.size(),
        right_size
    );
    debug!("built product with {} states", table.size());

    Ok(Dfa::from_parts(
        left.alphabet().clone(),
        table,
        start,
        accepting,
    ))
}

impl Dfa {
    /// Computes the product of `self` with `other` under the given [`Combination`], see
    /// [`product`].
    pub fn product(&self, other: &Dfa, combination: Combination) -> Result<Dfa, DfaError> {
        product(self, other, combination)
    }

    /// Computes the union of `self` with the given `other` through a simple product construction.
    pub fn union(&self, other: &Dfa) -> Result<Dfa, DfaError> {
        self.product(other, Combination::Union)
    }

    /// Computes the intersection of `self` with the given `other` through a simple product construction.
    pub fn intersection(&self, other: &Dfa) -> Result<Dfa, DfaError> {
        self.product(other, Combination::Intersection)
    }

    /// Computes an automaton for the words accepted by `self` but not by `other`.
    pub fn difference(&self, other: &Dfa) -> Result<Dfa, DfaError> {
        self.product(other, Combination::Difference)
    }

    /// Computes an automaton for the words accepted by precisely one of `self` and `other`.
    pub fn symmetric_difference(&self, other: &Dfa) -> Result<Dfa, DfaError> {
        self.product(other, Combination::SymmetricDifference)
    }

    /// Checks whether `self` is equivalent to `other`, i.e. whether the two DFAs accept
    /// the same language. This is done by verifying that their symmetric difference is empty.
    pub fn equivalent(&self, other: &Dfa) -> Result<bool, DfaError> {
        self.symmetric_difference(other)?.is_empty_language()
    }
}

#[cfg(test)]
mod tests {
    use super::ProductIndex;
    use crate::{math::words_up_to, prelude::*};

    fn even_as() -> Dfa {
        let mut dfa = Dfa::new(CharAlphabet::from("ab"));
        let odd = dfa.add_state();
        dfa.add_transition(0, odd, 'a').unwrap();
        dfa.add_transition(0, 0, 'b').unwrap();
        dfa.add_transition(odd, 0, 'a').unwrap();
        dfa.add_transition(odd, odd, 'b').unwrap();
        dfa.add_final(0).unwrap();
        dfa
    }

    fn ends_with_b() -> Dfa {
        let mut dfa = Dfa::new(CharAlphabet::from("ab"));
        let last_b = dfa.add_state();
        dfa.add_transition(0, 0, 'a').unwrap();
        dfa.add_transition(0, last_b, 'b').unwrap();
        dfa.add_transition(last_b, 0, 'a').unwrap();
        dfa.add_transition(last_b, last_b, 'b').unwrap();
        dfa.add_final(last_b).unwrap();
        dfa
    }

    #[test_log::test]
    fn boolean_laws_hold_on_all_short_words() {
        let (a, b) = (even_as(), ends_with_b());
        let union = a.union(&b).unwrap();
        let intersection = a.intersection(&b).unwrap();
        let difference = a.difference(&b).unwrap();
        let symmetric = a.symmetric_difference(&b).unwrap();

        for w in words_up_to(&['a', 'b'], 6) {
            let (x, y) = (a.accepts(&w).unwrap(), b.accepts(&w).unwrap());
            assert_eq!(union.accepts(&w).unwrap(), x || y, "union on {w:?}");
            assert_eq!(intersection.accepts(&w).unwrap(), x && y);
            assert_eq!(difference.accepts(&w).unwrap(), x && !y);
            assert_eq!(symmetric.accepts(&w).unwrap(), x != y);
        }
    }

    #[test]
    fn product_numbering_is_row_major() {
        let a = Dfa::from_word(CharAlphabet::from("ab"), "a").unwrap();
        let b = Dfa::from_word(CharAlphabet::from("ab"), "bb").unwrap();
        let prod = a.union(&b).unwrap();

        assert_eq!(prod.size(), a.size() * b.size());
        assert_eq!(prod.start(), ProductIndex(1, 1).translate(b.size()));
        assert_eq!(ProductIndex::split(prod.start(), b.size()), ProductIndex(1, 1));
        for (source, symbol, target) in prod.edges() {
            let ProductIndex(l, r) = ProductIndex::split(source, b.size());
            let expected = ProductIndex(
                a.successor(l, symbol).unwrap(),
                b.successor(r, symbol).unwrap(),
            );
            assert_eq!(target, expected.translate(b.size()));
        }
    }

    #[test]
    fn word_union() {
        let alphabet = CharAlphabet::from("ab");
        let a = Dfa::from_word(alphabet.clone(), "a").unwrap();
        let b = Dfa::from_word(alphabet, "b").unwrap();
        let union = a.union(&b).unwrap();
        assert!(union.accepts("a").unwrap());
        assert!(union.accepts("b").unwrap());
        for w in ["", "ab", "aa", "ba", "bb"] {
            assert!(!union.accepts(w).unwrap());
        }
    }

    #[test]
    fn alphabet_mismatch_fails_fast() {
        let a = Dfa::from_word(CharAlphabet::from("ab"), "a").unwrap();
        let b = Dfa::from_word(CharAlphabet::from("abc"), "a").unwrap();
        assert_eq!(
            a.union(&b),
            Err(DfaError::AlphabetMismatch {
                left: CharAlphabet::from("ab"),
                right: CharAlphabet::from("abc"),
            })
        );
        let reordered = Dfa::from_word(CharAlphabet::from("ba"), "b").unwrap();
        assert!(a.intersection(&reordered).is_ok());
    }

    #[test]
    fn partial_operands_are_rejected() {
        let mut partial = Dfa::new(CharAlphabet::from("ab"));
        let q = partial.add_state();
        partial.set_start(q).unwrap();
        let word = Dfa::from_word(CharAlphabet::from("ab"), "a").unwrap();
        assert!(matches!(
            word.union(&partial),
            Err(DfaError::UndefinedTransition { state: 1, .. })
        ));
    }

    #[test]
    fn equivalence() {
        let a = even_as();
        let b = ends_with_b();
        assert!(a.equivalent(&a.clone()).unwrap());
        assert!(!a.equivalent(&b).unwrap());
        let doubled = a.union(&a).unwrap();
        assert!(doubled.equivalent(&a).unwrap());
    }
}
