//! The TrollScript instruction set and its wire lexemes.

use std::fmt;

/// One TrollScript instruction.
///
/// Every instruction is written as a fixed three-character lexeme built from
/// `t`, `r`, `o`, `l` and `.`; the mapping is the dialect's wire format and
/// is matched case-insensitively. `StartMarker` and `EndMarker` delimit the
/// program body and never appear in a scanned token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `tro` — begin recording instructions.
    StartMarker,
    /// `ooo` — move the data pointer one cell to the right.
    MoveNext,
    /// `ool` — move the data pointer one cell to the left.
    MovePrevious,
    /// `olo` — increment the current cell.
    Increment,
    /// `oll` — decrement the current cell.
    Decrement,
    /// `loo` — write the current cell to the output sink.
    Output,
    /// `lol` — read one byte from the input source into the current cell.
    Input,
    /// `llo` — open a loop; skips to its match when the current cell is 0.
    LoopOpen,
    /// `lll` — close a loop; jumps back to its match when the cell is not 0.
    LoopClose,
    /// `ll.` — stop scanning; the rest of the source is ignored.
    EndMarker,
}

impl Instruction {
    /// Every instruction, in lexeme-table order.
    pub const ALL: [Instruction; 10] = [
        Instruction::StartMarker,
        Instruction::MoveNext,
        Instruction::MovePrevious,
        Instruction::Increment,
        Instruction::Decrement,
        Instruction::Output,
        Instruction::Input,
        Instruction::LoopOpen,
        Instruction::LoopClose,
        Instruction::EndMarker,
    ];

    /// The literal lexeme for this instruction.
    pub fn lexeme(self) -> &'static str {
        match self {
            Instruction::StartMarker => "tro",
            Instruction::MoveNext => "ooo",
            Instruction::MovePrevious => "ool",
            Instruction::Increment => "olo",
            Instruction::Decrement => "oll",
            Instruction::Output => "loo",
            Instruction::Input => "lol",
            Instruction::LoopOpen => "llo",
            Instruction::LoopClose => "lll",
            Instruction::EndMarker => "ll.",
        }
    }

    /// Look up the instruction for `candidate`, matching case-insensitively.
    ///
    /// Returns `None` for anything that is not exactly one lexeme.
    pub fn from_lexeme(candidate: &str) -> Option<Instruction> {
        Instruction::ALL
            .iter()
            .copied()
            .find(|instr| instr.lexeme().eq_ignore_ascii_case(candidate))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexeme_mapping_round_trips() {
        for instr in Instruction::ALL {
            assert_eq!(Instruction::from_lexeme(instr.lexeme()), Some(instr));
        }
    }

    #[test]
    fn lexemes_are_unique() {
        for (i, a) in Instruction::ALL.iter().enumerate() {
            for b in &Instruction::ALL[i + 1..] {
                assert_ne!(a.lexeme(), b.lexeme());
            }
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(Instruction::from_lexeme("TRO"), Some(Instruction::StartMarker));
        assert_eq!(Instruction::from_lexeme("OlO"), Some(Instruction::Increment));
        assert_eq!(Instruction::from_lexeme("LL."), Some(Instruction::EndMarker));
    }

    #[test]
    fn noise_does_not_match() {
        assert_eq!(Instruction::from_lexeme("xyz"), None);
        assert_eq!(Instruction::from_lexeme("ll"), None);
        assert_eq!(Instruction::from_lexeme(""), None);
    }
}
