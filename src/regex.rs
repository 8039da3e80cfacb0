use std::{collections::BTreeSet, fmt::Display};

/// Synthesis of regular expressions from automata through state elimination.
pub mod synthesis;

/// A regular expression, represented as a term. Terms are only ever built through the
/// constructor functions ([`Regex::alt`], [`Regex::concat`], [`Regex::star`], ...), which
/// simplify as they go. In particular [`Regex::Empty`] never occurs inside a larger term
/// and neither does [`Regex::Epsilon`], except as the left side of an alternation, where
/// it marks the other side as optional.
///
/// The [`Display`] implementation produces a string in a minimal dialect which only uses
/// literal characters, bracket classes, groups, `|`, `?` and `*`.
///
/// ```
/// use dfa_synth::prelude::*;
///
/// let ab = Regex::concat(Regex::literal('a'), Regex::literal('b'));
/// let term = Regex::alt(Regex::Epsilon, Regex::star(ab));
/// assert_eq!(term.to_string(), "(ab)*");
/// assert!(term.matches("abab"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Regex {
    /// The empty language, matching nothing at all.
    #[default]
    Empty,
    /// The language containing only the empty word.
    Epsilon,
    /// Matches a single symbol out of the (non-empty) set.
    Literal(BTreeSet<char>),
    /// Matches what either side matches.
    Alt(Box<Regex>, Box<Regex>),
    /// Matches a word matched by the left side followed by one matched by the right side.
    Concat(Box<Regex>, Box<Regex>),
    /// Matches any number of repetitions of the inner term.
    Star(Box<Regex>),
}

impl Regex {
    /// A term matching only the given symbol.
    pub fn literal(symbol: char) -> Self {
        Regex::Literal(BTreeSet::from([symbol]))
    }

    /// A term matching any single symbol from `symbols`. If there are no symbols, the
    /// result is [`Regex::Empty`].
    pub fn literals(symbols: impl IntoIterator<Item = char>) -> Self {
        let set: BTreeSet<char> = symbols.into_iter().collect();
        if set.is_empty() {
            Regex::Empty
        } else {
            Regex::Literal(set)
        }
    }

    /// Alternation of `left` and `right`.
    pub fn alt(left: Regex, right: Regex) -> Self {
        match (left, right) {
            (Regex::Empty, x) | (x, Regex::Empty) => x,
            (l, r) if l == r => l,
            (Regex::Literal(mut l), Regex::Literal(r)) => {
                l.extend(r);
                Regex::Literal(l)
            }
            (Regex::Epsilon, x) | (x, Regex::Epsilon) => {
                if x.is_nullable() {
                    x
                } else {
                    Regex::Alt(Box::new(Regex::Epsilon), Box::new(x))
                }
            }
            (l, r) => Regex::Alt(Box::new(l), Box::new(r)),
        }
    }

    /// Concatenation of `left` and `right`.
    pub fn concat(left: Regex, right: Regex) -> Self {
        match (left, right) {
            (Regex::Empty, _) | (_, Regex::Empty) => Regex::Empty,
            (Regex::Epsilon, x) | (x, Regex::Epsilon) => x,
            (l, r) => Regex::Concat(Box::new(l), Box::new(r)),
        }
    }

    /// Kleene closure of `inner`.
    pub fn star(inner: Regex) -> Self {
        match inner {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            Regex::Star(_) => inner,
            Regex::Alt(l, r) if *l == Regex::Epsilon => Regex::star(*r),
            x => Regex::Star(Box::new(x)),
        }
    }

    /// Checks whether the empty word is matched.
    pub fn is_nullable(&self) -> bool {
        match self {
            Regex::Empty | Regex::Literal(_) => false,
            Regex::Epsilon | Regex::Star(_) => true,
            Regex::Alt(l, r) => l.is_nullable() || r.is_nullable(),
            Regex::Concat(l, r) => l.is_nullable() && r.is_nullable(),
        }
    }

    /// Computes the Brzozowski derivative with respect to `symbol`, which is a term that
    /// matches `w` if and only if `self` matches `symbol` followed by `w`.
    pub fn derivative(&self, symbol: char) -> Regex {
        match self {
            Regex::Empty | Regex::Epsilon => Regex::Empty,
            Regex::Literal(set) => {
                if set.contains(&symbol) {
                    Regex::Epsilon
                } else {
                    Regex::Empty
                }
            }
            Regex::Alt(l, r) => Regex::alt(l.derivative(symbol), r.derivative(symbol)),
            Regex::Concat(l, r) => {
                let head = Regex::concat(l.derivative(symbol), (**r).clone());
                if l.is_nullable() {
                    Regex::alt(head, r.derivative(symbol))
                } else {
                    head
                }
            }
            Regex::Star(inner) => Regex::concat(inner.derivative(symbol), self.clone()),
        }
    }

    /// Decides whether the whole of `word` is matched.
    pub fn matches(&self, word: &str) -> bool {
        word.chars()
            .try_fold(self.clone(), |term, symbol| match term.derivative(symbol) {
                Regex::Empty => None,
                next => Some(next),
            })
            .is_some_and(|term| term.is_nullable())
    }

    /// Returns true if the term denotes the empty language.
    pub fn is_empty(&self) -> bool {
        matches!(self, Regex::Empty)
    }

    /// Number of nodes in the term.
    pub fn size(&self) -> usize {
        match self {
            Regex::Empty | Regex::Epsilon | Regex::Literal(_) => 1,
            Regex::Alt(l, r) | Regex::Concat(l, r) => 1 + l.size() + r.size(),
            Regex::Star(inner) => 1 + inner.size(),
        }
    }

    fn precedence(&self) -> Precedence {
        match self {
            Regex::Empty | Regex::Epsilon | Regex::Literal(_) => Precedence::Atom,
            Regex::Alt(l, _) if **l == Regex::Epsilon => Precedence::Postfix,
            Regex::Alt(_, _) => Precedence::Alternation,
            Regex::Concat(_, _) => Precedence::Concatenation,
            Regex::Star(_) => Precedence::Postfix,
        }
    }

    fn fmt_with(&self, f: &mut std::fmt::Formatter<'_>, min: Precedence) -> std::fmt::Result {
        let grouped = self.precedence() < min;
        if grouped {
            write!(f, "(")?;
        }
        match self {
            Regex::Empty => write!(f, "[]")?,
            Regex::Epsilon => {
                if min > Precedence::Alternation {
                    write!(f, "()")?
                }
            }
            Regex::Literal(set) => {
                if set.len() == 1 {
                    for sym in set {
                        write_escaped(f, *sym)?;
                    }
                } else {
                    write!(f, "[")?;
                    for sym in set {
                        write_escaped(f, *sym)?;
                    }
                    write!(f, "]")?;
                }
            }
            Regex::Alt(l, r) if **l == Regex::Epsilon => {
                r.fmt_with(f, Precedence::Atom)?;
                write!(f, "?")?;
            }
            Regex::Alt(l, r) => {
                l.fmt_with(f, Precedence::Alternation)?;
                write!(f, "|")?;
                r.fmt_with(f, Precedence::Alternation)?;
            }
            Regex::Concat(l, r) => {
                l.fmt_with(f, Precedence::Concatenation)?;
                r.fmt_with(f, Precedence::Concatenation)?;
            }
            Regex::Star(inner) => {
                inner.fmt_with(f, Precedence::Atom)?;
                write!(f, "*")?;
            }
        }
        if grouped {
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Alternation,
    Concatenation,
    Postfix,
    Atom,
}

const META: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
];

fn write_escaped(f: &mut std::fmt::Formatter<'_>, symbol: char) -> std::fmt::Result {
    if META.contains(&symbol) {
        write!(f, "\\{symbol}")
    } else {
        write!(f, "{symbol}")
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_with(f, Precedence::Alternation)
    }
}

#[cfg(test)]
mod tests {
    use super::Regex;

    fn lit(c: char) -> Regex {
        Regex::literal(c)
    }

    #[test]
    fn simplification_rules() {
        let a = lit('a');
        assert_eq!(Regex::alt(Regex::Empty, a.clone()), a);
        assert_eq!(Regex::alt(a.clone(), Regex::Empty), a);
        assert_eq!(Regex::concat(Regex::Empty, a.clone()), Regex::Empty);
        assert_eq!(Regex::concat(a.clone(), Regex::Empty), Regex::Empty);
        assert_eq!(Regex::concat(Regex::Epsilon, a.clone()), a);
        assert_eq!(Regex::concat(a.clone(), Regex::Epsilon), a);
        assert_eq!(Regex::star(Regex::Empty), Regex::Epsilon);
        assert_eq!(Regex::star(Regex::Epsilon), Regex::Epsilon);
        assert_eq!(Regex::star(Regex::star(a.clone())), Regex::star(a.clone()));
        assert_eq!(Regex::alt(a.clone(), a.clone()), a);
        assert_eq!(Regex::alt(lit('b'), a.clone()), Regex::literals(['a', 'b']));
        assert_eq!(
            Regex::alt(Regex::Epsilon, Regex::star(a.clone())),
            Regex::star(a.clone())
        );
        assert_eq!(Regex::alt(Regex::Epsilon, Regex::Epsilon), Regex::Epsilon);
        assert_eq!(
            Regex::alt(a.clone(), Regex::Epsilon),
            Regex::alt(Regex::Epsilon, a.clone())
        );
        assert_eq!(Regex::literals([]), Regex::Empty);
    }

    #[test]
    fn rendering() {
        let a = lit('a');
        let b = lit('b');
        let ab = Regex::concat(a.clone(), b.clone());
        assert_eq!(ab.to_string(), "ab");
        assert_eq!(Regex::literals(['b', 'a']).to_string(), "[ab]");
        assert_eq!(Regex::alt(Regex::Epsilon, a.clone()).to_string(), "a?");
        assert_eq!(Regex::alt(Regex::Epsilon, ab.clone()).to_string(), "(ab)?");
        assert_eq!(Regex::star(ab.clone()).to_string(), "(ab)*");
        assert_eq!(Regex::star(a.clone()).to_string(), "a*");

        let either = Regex::alt(ab.clone(), Regex::concat(b.clone(), b.clone()));
        assert_eq!(either.to_string(), "ab|bb");
        assert_eq!(
            Regex::concat(either.clone(), a.clone()).to_string(),
            "(ab|bb)a"
        );
        assert_eq!(Regex::star(either).to_string(), "(ab|bb)*");
        assert_eq!(
            Regex::concat(Regex::alt(Regex::Epsilon, a.clone()), b).to_string(),
            "a?b"
        );
        assert_eq!(Regex::Epsilon.to_string(), "");
        assert_eq!(Regex::Empty.to_string(), "[]");
        assert_eq!(Regex::literals(['.', '(']).to_string(), "[\\(\\.]");
    }

    #[test]
    fn matching_through_derivatives() {
        let a = lit('a');
        let b = lit('b');
        // (a|bb)*a?
        let term = Regex::concat(
            Regex::star(Regex::alt(a.clone(), Regex::concat(b.clone(), b.clone()))),
            Regex::alt(Regex::Epsilon, a),
        );
        for word in ["", "a", "bb", "abba", "bbbba"] {
            assert!(term.matches(word), "{word:?} should match");
        }
        for word in ["b", "bab", "abbb", "c"] {
            assert!(!term.matches(word), "{word:?} should not match");
        }
        assert!(!Regex::Empty.matches(""));
        assert!(Regex::Epsilon.matches(""));
        assert!(!Regex::Epsilon.matches("a"));
    }

    #[test]
    fn nullability_and_size() {
        assert!(Regex::star(lit('a')).is_nullable());
        assert!(!Regex::concat(lit('a'), Regex::star(lit('b'))).is_nullable());
        assert!(Regex::alt(Regex::Epsilon, lit('a')).is_nullable());
        assert_eq!(Regex::concat(lit('a'), Regex::star(lit('b'))).size(), 4);
        assert!(Regex::Empty.is_empty());
    }
}
