/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// Returns an iterator over all words over `symbols` of length at most `max_len`, in
/// length-lexicographic order (shortest first). The empty word is always yielded first.
pub fn words_up_to(symbols: &[char], max_len: usize) -> impl Iterator<Item = String> + '_ {
    let mut current: Vec<usize> = vec![];
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let out: String = current.iter().map(|i| symbols[*i]).collect();

        if symbols.is_empty() {
            done = true;
            return Some(out);
        }

        let mut carry = true;
        let mut i = current.len();
        while carry && i > 0 {
            i -= 1;
            current[i] += 1;
            if current[i] >= symbols.len() {
                current[i] = 0;
            } else {
                carry = false;
            }
        }
        if carry {
            if current.len() >= max_len {
                done = true;
            } else {
                current = vec![0; current.len() + 1];
            }
        }

        Some(out)
    })
}
