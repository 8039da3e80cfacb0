use crate::{alphabet::SymbolPosition, StateIndex};

/// Dense storage for the transition function of a deterministic automaton. Every state
/// owns one row with a cell per alphabet position, so the successor of a state on a
/// symbol is found by plain indexing. A cell is `None` as long as the corresponding
/// transition has not been wired, which can only happen for automata that are
/// assembled by hand.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TransitionTable {
    symbols: usize,
    states: usize,
    cells: Vec<Option<StateIndex>>,
}

impl TransitionTable {
    /// Creates an empty table for an alphabet with `symbols` symbols.
    pub fn new(symbols: usize) -> Self {
        Self::with_states(symbols, 0)
    }

    /// Creates a table with `states` rows, all of which are unwired.
    pub fn with_states(symbols: usize, states: usize) -> Self {
        Self {
            symbols,
            states,
            cells: vec![None; symbols * states],
        }
    }

    /// Number of states (rows) in the table.
    pub fn size(&self) -> usize {
        self.states
    }

    /// Number of columns, i.e. the size of the alphabet.
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// Appends a fresh, unwired row and returns its index.
    pub fn add_state(&mut self) -> StateIndex {
        let id = self.states;
        self.states += 1;
        self.cells.extend(std::iter::repeat(None).take(self.symbols));
        id
    }

    /// Returns the successor of `state` on the symbol at position `symbol`, if it is wired.
    #[inline(always)]
    pub fn get(&self, state: StateIndex, symbol: SymbolPosition) -> Option<StateIndex> {
        if state >= self.states || symbol >= self.symbols {
            return None;
        }
        self.cells[state * self.symbols + symbol]
    }

    /// Wires the transition of `state` on the symbol at position `symbol` to `target`,
    /// replacing whatever was stored before.
    ///
    /// Panics if `state` or `symbol` is out of bounds.
    #[inline(always)]
    pub fn set(&mut self, state: StateIndex, symbol: SymbolPosition, target: StateIndex) {
        assert!(state < self.states && symbol < self.symbols);
        self.cells[state * self.symbols + symbol] = Some(target);
    }

    /// Gives the row of `state`.
    pub fn row(&self, state: StateIndex) -> &[Option<StateIndex>] {
        &self.cells[state * self.symbols..(state + 1) * self.symbols]
    }

    /// Checks whether every cell of the table is wired.
    pub fn is_total(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns the first cell that is not wired, in row-major order.
    pub fn first_undefined(&self) -> Option<(StateIndex, SymbolPosition)> {
        self.cells
            .iter()
            .position(Option::is_none)
            .map(|i| (i / self.symbols, i % self.symbols))
    }

    /// Iterates over all wired transitions as triples `(source, symbol position, target)`.
    pub fn transitions(
        &self,
    ) -> impl Iterator<Item = (StateIndex, SymbolPosition, StateIndex)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|target| (i / self.symbols, i % self.symbols, target))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionTable;

    #[test]
    fn grows_row_by_row() {
        let mut table = TransitionTable::new(2);
        assert_eq!(table.size(), 0);
        let q0 = table.add_state();
        let q1 = table.add_state();
        assert_eq!((q0, q1), (0, 1));
        assert_eq!(table.size(), 2);

        table.set(q0, 0, q1);
        table.set(q0, 1, q0);
        table.set(q1, 1, q1);
        assert_eq!(table.get(q0, 0), Some(q1));
        assert_eq!(table.get(q1, 0), None);
        assert_eq!(table.get(7, 0), None);
        assert_eq!(table.row(q0), &[Some(1), Some(0)]);
        assert!(!table.is_total());
        assert_eq!(table.first_undefined(), Some((1, 0)));

        table.set(q1, 0, q0);
        assert!(table.is_total());
        assert_eq!(table.first_undefined(), None);
        assert_eq!(
            table.transitions().collect::<Vec<_>>(),
            vec![(0, 0, 1), (0, 1, 0), (1, 0, 0), (1, 1, 1)]
        );
    }

    #[test]
    fn empty_alphabet_still_counts_states() {
        let mut table = TransitionTable::with_states(0, 3);
        assert_eq!(table.add_state(), 3);
        assert_eq!(table.size(), 4);
        assert!(table.is_total());
        assert_eq!(table.transitions().count(), 0);
    }
}
