use std::fmt::Display;

use itertools::Itertools;

/// Position of a symbol within an alphabet. Positions index the columns of a
/// [`crate::transition_table::TransitionTable`].
pub type SymbolPosition = usize;

/// Represents an alphabet where a symbol is just a single `char`.
///
/// The symbols are kept sorted and free of duplicates, which means two alphabets compare
/// equal precisely if they contain the same symbols, regardless of the order in which
/// they were declared. It also means that a symbol has the same position in any two
/// equal alphabets, which the product construction relies on.
///
/// # Example
/// ```
/// use dfa_synth::prelude::*;
///
/// let left = CharAlphabet::from_symbols(['b', 'a', 'b']);
/// let right: CharAlphabet = "ab".chars().collect();
/// assert_eq!(left, right);
/// assert_eq!(left.position('b'), Some(1));
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct CharAlphabet(Vec<char>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] from the given symbols, duplicates are removed.
    pub fn from_symbols(symbols: impl IntoIterator<Item = char>) -> Self {
        Self(symbols.into_iter().unique().sorted().collect())
    }

    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// Number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the symbols in their canonical (sorted) order.
    pub fn universe(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// The symbols as a slice, in canonical order.
    pub fn symbols(&self) -> &[char] {
        &self.0
    }

    /// Checks whether `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.0.binary_search(&symbol).is_ok()
    }

    /// Gives the position of `symbol`, or `None` if it is not part of the alphabet.
    pub fn position(&self, symbol: char) -> Option<SymbolPosition> {
        self.0.binary_search(&symbol).ok()
    }

    /// Returns the symbol at position `pos`, if it exists.
    pub fn nth(&self, pos: SymbolPosition) -> Option<char> {
        self.0.get(pos).copied()
    }
}

impl std::ops::Index<SymbolPosition> for CharAlphabet {
    type Output = char;

    fn index(&self, index: SymbolPosition) -> &Self::Output {
        &self.0[index]
    }
}

impl From<Vec<char>> for CharAlphabet {
    fn from(value: Vec<char>) -> Self {
        Self::from_symbols(value)
    }
}

impl From<&str> for CharAlphabet {
    fn from(value: &str) -> Self {
        Self::from_symbols(value.chars())
    }
}

impl FromIterator<char> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self::from_symbols(iter)
    }
}

impl Display for CharAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::CharAlphabet;

    #[test]
    fn equality_ignores_declaration_order() {
        let ab = CharAlphabet::from_symbols(['a', 'b']);
        let ba = CharAlphabet::from_symbols(['b', 'a', 'a']);
        assert_eq!(ab, ba);
        assert_ne!(ab, CharAlphabet::from("abc"));
        assert_eq!(ab.size(), 2);
        assert_eq!(ab.to_string(), "{a, b}");
    }

    #[test]
    fn positions() {
        let alphabet = CharAlphabet::from("cab");
        assert_eq!(alphabet.position('a'), Some(0));
        assert_eq!(alphabet.position('c'), Some(2));
        assert_eq!(alphabet.position('z'), None);
        assert_eq!(alphabet.nth(1), Some('b'));
        assert_eq!(alphabet[2], 'c');
        assert!(alphabet.contains('b'));
        assert!(!alphabet.contains('d'));
        assert_eq!(CharAlphabet::of_size(3), alphabet);
    }
}
