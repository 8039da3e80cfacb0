use std::io::BufRead;

use tracing::{debug, trace};

use crate::{alphabet::CharAlphabet, error::DfaError, Dfa};

/// Reads words from `reader`, one per line, until the end of the input. Line terminators
/// (`\n` as well as `\r\n`) are not part of the words, an empty line is the empty word.
pub fn read_words<R: BufRead>(reader: R) -> Result<Vec<String>, std::io::Error> {
    let words = reader.lines().collect::<Result<Vec<_>, _>>()?;
    debug!("read {} words", words.len());
    Ok(words)
}

/// Builds the minimal automaton that accepts precisely the given `words`. Each word is
/// turned into an automaton through [`Dfa::from_word`] and these are combined through
/// [`Dfa::union`], starting from the automaton for the empty language. The intermediate
/// result is optimized after each step, which keeps the products small.
pub fn union_of_words<I, S>(alphabet: &CharAlphabet, words: I) -> Result<Dfa, DfaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut dfa = Dfa::trivial(alphabet.clone());
    for word in words {
        let word = word.as_ref();
        dfa = dfa
            .union(&Dfa::from_word(alphabet.clone(), word)?)?
            .optimize()?;
        trace!("added \"{word}\", automaton has {} states", dfa.size());
    }
    debug!("automaton for all words has {} states", dfa.size());
    Ok(dfa)
}

#[cfg(test)]
mod tests {
    use super::{read_words, union_of_words};
    use crate::{math::words_up_to, prelude::*};

    #[test]
    fn reads_lines_until_eof() {
        let input = "ab\r\n\nbba\nb";
        let words = read_words(input.as_bytes()).unwrap();
        assert_eq!(words, vec!["ab", "", "bba", "b"]);
        assert!(read_words("".as_bytes()).unwrap().is_empty());
    }

    #[test_log::test]
    fn union_accepts_exactly_the_words() {
        let alphabet = CharAlphabet::from("ab");
        let words = ["", "a", "abb", "bab", "bbbb"];
        let dfa = union_of_words(&alphabet, words).unwrap();
        assert!(dfa.is_minimal().unwrap());
        for w in words_up_to(alphabet.symbols(), 6) {
            assert_eq!(dfa.accepts(&w).unwrap(), words.contains(&w.as_str()), "{w:?}");
        }
    }

    #[test]
    fn union_matches_unoptimized_fold() {
        let alphabet = CharAlphabet::from("ab");
        let words = vec!["ab".to_string(), "ba".to_string(), "ab".to_string()];
        let folded = words
            .iter()
            .map(|w| Dfa::from_word(alphabet.clone(), w).unwrap())
            .try_fold(Dfa::trivial(alphabet.clone()), |acc, next| acc.union(&next))
            .unwrap();
        let dfa = union_of_words(&alphabet, &words).unwrap();
        assert!(dfa.equivalent(&folded).unwrap());
        assert!(folded.optimize().unwrap().is_isomorphic(&dfa).unwrap());
    }

    #[test]
    fn no_words_no_language() {
        let alphabet = CharAlphabet::from("ab");
        let dfa = union_of_words(&alphabet, Vec::<String>::new()).unwrap();
        assert_eq!(dfa.size(), 1);
        assert!(dfa.is_empty_language().unwrap());
    }

    #[test]
    fn foreign_symbols_are_reported() {
        let alphabet = CharAlphabet::from("ab");
        assert_eq!(
            union_of_words(&alphabet, ["ab", "ac"]),
            Err(DfaError::UnknownSymbol('c'))
        );
    }
}
