//! The machine tape: a double-ended buffer of cells addressed by a signed position, where
//! position 0 is the first character of the input.

use crate::types::{Symbol, TapeMode, TuringMachineError};
use std::collections::VecDeque;

/// A single tape, padded with blanks on both sides of the input.
///
/// In [`TapeMode::Unbounded`] the buffer grows with blanks whenever a write lands outside it,
/// and reads outside it see a blank. In [`TapeMode::Bounded`] any access outside the initial
/// buffer fails with [`TuringMachineError::TapeOverrun`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    /// Index in `cells` of position 0.
    origin: usize,
    blank: Symbol,
    mode: TapeMode,
}

impl Tape {
    /// Creates a tape holding `margin` blanks, the input, then `margin` blanks.
    pub fn new(input: &str, blank: Symbol, margin: usize, mode: TapeMode) -> Self {
        let mut cells: VecDeque<Symbol> = VecDeque::with_capacity(input.len() + 2 * margin);
        cells.extend(std::iter::repeat(blank).take(margin));
        cells.extend(input.chars());
        cells.extend(std::iter::repeat(blank).take(margin));

        Self {
            cells,
            origin: margin,
            blank,
            mode,
        }
    }

    /// Returns the symbol at `position`.
    pub fn read(&self, position: i64) -> Result<Symbol, TuringMachineError> {
        match self.index(position) {
            Some(index) => Ok(self.cells[index]),
            None if self.mode == TapeMode::Unbounded => Ok(self.blank),
            None => Err(TuringMachineError::TapeOverrun(position)),
        }
    }

    /// Writes `symbol` at `position`, growing the tape first if needed.
    pub fn write(&mut self, position: i64, symbol: Symbol) -> Result<(), TuringMachineError> {
        let index = match self.index(position) {
            Some(index) => index,
            None if self.mode == TapeMode::Unbounded => self.grow_to(position),
            None => return Err(TuringMachineError::TapeOverrun(position)),
        };

        self.cells[index] = symbol;
        Ok(())
    }

    /// Returns the tape contents with the blank symbol trimmed from both ends.
    pub fn contents(&self) -> String {
        let start = self.cells.iter().position(|&c| c != self.blank);
        let end = self.cells.iter().rposition(|&c| c != self.blank);

        match (start, end) {
            (Some(start), Some(end)) => self.cells.range(start..=end).collect(),
            _ => String::new(),
        }
    }

    /// Returns every allocated cell, padding included.
    pub fn cells(&self) -> String {
        self.cells.iter().collect()
    }

    /// Lowest position currently backed by a cell.
    pub fn leftmost(&self) -> i64 {
        -(self.origin as i64)
    }

    /// Highest position currently backed by a cell.
    pub fn rightmost(&self) -> i64 {
        self.cells.len() as i64 - self.origin as i64 - 1
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, position: i64) -> Option<usize> {
        let index = self.origin as i64 + position;
        if index >= 0 && (index as usize) < self.cells.len() {
            Some(index as usize)
        } else {
            None
        }
    }

    /// Extends the buffer with blanks until `position` is backed, returning its index.
    fn grow_to(&mut self, position: i64) -> usize {
        while position < self.leftmost() {
            self.cells.push_front(self.blank);
            self.origin += 1;
        }
        while position > self.rightmost() {
            self.cells.push_back(self.blank);
        }

        (self.origin as i64 + position) as usize
    }
}
