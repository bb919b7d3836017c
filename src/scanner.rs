//! Source-to-token scanning.
//!
//! TrollScript sources are deliberately permissive: anything that is not a
//! recognized lexeme is noise. The scanner walks the source once, trying a
//! three-character window at the cursor; on a miss it advances by a single
//! character so it can re-synchronize on misaligned input.

use crate::token::Instruction;

/// Scan `source` into the executable token sequence.
///
/// Instructions before the `tro` start marker are skipped, scanning stops
/// permanently at the `ll.` end marker, and neither marker appears in the
/// result. A source with no start marker yields an empty sequence.
pub fn scan(source: &str) -> Vec<Instruction> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut cursor = 0;
    let mut started = false;

    while cursor < chars.len() {
        // Take three characters, or whatever remains near the end of input.
        let end = (cursor + 3).min(chars.len());
        let candidate: String = chars[cursor..end].iter().collect();

        match Instruction::from_lexeme(&candidate) {
            Some(Instruction::StartMarker) => {
                started = true;
                cursor += 3;
            }
            Some(Instruction::EndMarker) => break,
            Some(instr) => {
                if started {
                    tokens.push(instr);
                }
                cursor += 3;
            }
            // Not a lexeme: advance one character to re-synchronize.
            None => cursor += 1,
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Instruction::*;

    #[test]
    fn scans_a_simple_program() {
        let tokens = scan("troolooloololooll.");
        assert_eq!(tokens, vec![Increment, Increment, Increment, Output]);
    }

    #[test]
    fn no_start_marker_yields_empty_sequence() {
        // Well-formed instructions, but recording never begins.
        assert!(scan("olooloolooll.").is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn instructions_before_start_marker_are_dropped() {
        let tokens = scan("olooolotroolooll.");
        assert_eq!(tokens, vec![Increment]);
    }

    #[test]
    fn end_marker_discards_the_rest() {
        let tokens = scan("troololl.olooloolo");
        assert_eq!(tokens, vec![Increment]);
    }

    #[test]
    fn missing_end_marker_scans_to_the_end() {
        let tokens = scan("troololoo");
        assert_eq!(tokens, vec![Increment, Output]);
    }

    #[test]
    fn noise_advances_one_character_at_a_time() {
        // The leading 'x' misaligns the window; single-character advances
        // recover the 'olo' that follows.
        let tokens = scan("troxolo ?loo");
        assert_eq!(tokens, vec![Increment, Output]);
    }

    #[test]
    fn scanning_is_case_insensitive() {
        let tokens = scan("TROoLoLOOLL.");
        assert_eq!(tokens, vec![Increment, Output]);
    }

    #[test]
    fn short_trailing_remainder_is_ignored() {
        // Two characters left at the end match no lexeme.
        let tokens = scan("troololl");
        assert_eq!(tokens, vec![Increment]);
    }
}
