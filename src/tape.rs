//! The interpreter's memory tape.

/// A fixed-length tape of byte cells with a single data pointer.
///
/// Cell arithmetic wraps at the byte boundary and the pointer wraps at both
/// ends of the tape: moving right from the last cell lands on cell 0, moving
/// left from cell 0 lands on the last cell. The tape is never resized.
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Create a zeroed tape with `len` cells and the pointer at cell 0.
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![0; len],
            pointer: 0,
        }
    }

    /// Current data pointer.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the pointer.
    pub fn cell(&self) -> u8 {
        self.cells[self.pointer]
    }

    /// Overwrite the cell under the pointer.
    pub fn set_cell(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// Move the pointer one cell right, wrapping past the last cell to 0.
    pub fn move_next(&mut self) {
        self.pointer = if self.pointer == self.cells.len() - 1 {
            0
        } else {
            self.pointer + 1
        };
    }

    /// Move the pointer one cell left, wrapping past cell 0 to the last cell.
    pub fn move_previous(&mut self) {
        self.pointer = if self.pointer == 0 {
            self.cells.len() - 1
        } else {
            self.pointer - 1
        };
    }

    /// Increment the current cell with byte wraparound.
    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    /// Decrement the current cell with byte wraparound.
    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    /// Zero every cell and return the pointer to 0.
    pub fn reset(&mut self) {
        self.cells.fill(0);
        self.pointer = 0;
    }

    /// The full cell contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_wraps_left_around_a_small_tape() {
        let mut tape = Tape::new(3);
        tape.move_previous();
        assert_eq!(tape.pointer(), 2);
        tape.move_previous();
        tape.move_previous();
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn pointer_wraps_right_past_the_last_cell() {
        let mut tape = Tape::new(3);
        tape.move_next();
        tape.move_next();
        tape.move_next();
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn cell_arithmetic_wraps_at_byte_bounds() {
        let mut tape = Tape::new(1);
        tape.decrement();
        assert_eq!(tape.cell(), 255);
        tape.increment();
        assert_eq!(tape.cell(), 0);
    }

    #[test]
    fn reset_zeroes_cells_and_pointer() {
        let mut tape = Tape::new(4);
        tape.increment();
        tape.move_next();
        tape.increment();
        tape.reset();
        assert_eq!(tape.pointer(), 0);
        assert!(tape.as_slice().iter().all(|&c| c == 0));
    }
}
