//! Fixed-size byte tape with a bounds-checked head.

use crate::core::TapeSize;

/// Zero-initialised cells plus the head index. The head starts at cell 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    head: usize,
}

impl Tape {
    pub fn new(size: TapeSize) -> Self {
        Self {
            cells: vec![0; size.get()],
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cell(&self) -> u8 {
        self.cells[self.head]
    }

    pub fn set_cell(&mut self, value: u8) {
        self.cells[self.head] = value;
    }

    /// Wrapping add on the current cell.
    pub fn add(&mut self, amount: u8) {
        let cell = &mut self.cells[self.head];
        *cell = cell.wrapping_add(amount);
    }

    /// Wrapping subtract on the current cell.
    pub fn sub(&mut self, amount: u8) {
        let cell = &mut self.cells[self.head];
        *cell = cell.wrapping_sub(amount);
    }

    /// Move the head towards cell 0. Returns the new head, or `None` (head
    /// unchanged) if it would leave the tape.
    pub fn shift_left(&mut self, distance: usize) -> Option<usize> {
        let head = self.head.checked_sub(distance)?;
        self.head = head;
        Some(head)
    }

    /// Move the head away from cell 0. Returns the new head, or `None` (head
    /// unchanged) if it would leave the tape.
    pub fn shift_right(&mut self, distance: usize) -> Option<usize> {
        let head = self
            .head
            .checked_add(distance)
            .filter(|&head| head < self.cells.len())?;
        self.head = head;
        Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tape(cells: usize) -> Tape {
        Tape::new(TapeSize::new(cells).expect("positive size"))
    }

    #[test]
    fn starts_zeroed_at_cell_zero() {
        let tape = tape(8);
        assert_eq!(tape.len(), 8);
        assert_eq!(tape.head(), 0);
        assert!(tape.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn arithmetic_wraps() {
        let mut tape = tape(1);
        tape.sub(1);
        assert_eq!(tape.cell(), 255);
        tape.add(2);
        assert_eq!(tape.cell(), 1);
    }

    #[test]
    fn head_stays_inside_the_tape() {
        let mut tape = tape(4);
        assert_eq!(tape.shift_left(1), None);
        assert_eq!(tape.shift_right(3), Some(3));
        assert_eq!(tape.shift_right(1), None);
        assert_eq!(tape.head(), 3);
        assert_eq!(tape.shift_left(3), Some(0));
        assert_eq!(tape.shift_right(usize::MAX), None);
    }
}
