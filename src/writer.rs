//! A TrollScript program generator.
//!
//! Given a byte sequence, the writer emits a TrollScript program (wrapped in
//! the `tro` … `ll.` markers) that prints exactly those bytes when run.
//!
//! Quick start:
//!
//! ```no_run
//! use trollscript::TrollScriptWriter;
//!
//! let writer = TrollScriptWriter::new("Hello World!".as_bytes());
//! let code = writer.generate();
//! println!("{}", code);
//! ```

use std::cmp::Ordering;

use crate::token::Instruction;

/// Tuning knobs for code generation.
pub struct WriterOptions {
    /// Use loop-based multiplication when building a cell value from zero.
    pub use_loops: bool,
    /// Maximum outer loop counter to consider (e.g., 16..32 is fine).
    pub max_loop_factor: u8,
    /// Assume cells wrap at the byte boundary (the dialect's tape does).
    pub assume_wrapping_u8: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            use_loops: true,
            max_loop_factor: 16,
            assume_wrapping_u8: true,
        }
    }
}

/// Generates TrollScript code that outputs a given byte sequence.
pub struct TrollScriptWriter<'writer> {
    input: &'writer [u8],
    options: WriterOptions,
}

impl<'writer> TrollScriptWriter<'writer> {
    pub fn new(input: &'writer [u8]) -> Self {
        Self {
            input,
            options: WriterOptions::default(),
        }
    }

    pub fn with_options(input: &'writer [u8], options: WriterOptions) -> Self {
        Self { input, options }
    }

    /// Produce a complete program: start marker, one output per input byte,
    /// end marker.
    pub fn generate(&self) -> String {
        let mut output = String::from(Instruction::StartMarker.lexeme());
        let mut cursor = 0u8;

        for &b in self.input {
            // Option A: delta-encode from cursor -> b using wrapping arithmetic
            let delta_sequence = self.encode_delta(cursor, b);

            // Option B: clear and rebuild from zero (no reliance on wrapping)
            let from_zero_sequence = self.encode_from_zero(b);

            // Choose the shorter option for this byte
            let best_sequence = if delta_sequence.len() <= from_zero_sequence.len() {
                delta_sequence
            } else {
                from_zero_sequence
            };

            output.push_str(&best_sequence);
            output.push_str(Instruction::Output.lexeme());

            cursor = b;
        }

        output.push_str(Instruction::EndMarker.lexeme());
        output
    }

    /// Encode the shortest delta from cursor to target.
    ///
    /// With wrapping enabled this is the shortest path on a ring of 256;
    /// otherwise a straight run of increments or decrements.
    fn encode_delta(&self, cursor: u8, target: u8) -> String {
        if cursor == target {
            return String::new();
        }

        let mut output = String::new();
        if self.options.assume_wrapping_u8 {
            let forward = target.wrapping_sub(cursor);
            let backward = cursor.wrapping_sub(target);
            if forward <= backward {
                push_repeat(&mut output, Instruction::Increment, forward as usize);
            } else {
                push_repeat(&mut output, Instruction::Decrement, backward as usize);
            }
        } else {
            match target.cmp(&cursor) {
                Ordering::Greater => {
                    push_repeat(&mut output, Instruction::Increment, (target - cursor) as usize)
                }
                Ordering::Less => {
                    push_repeat(&mut output, Instruction::Decrement, (cursor - target) as usize)
                }
                Ordering::Equal => {}
            }
        }

        output
    }

    /// Build exact value `target` in the current cell starting from an
    /// unknown prior value.
    fn encode_from_zero(&self, target: u8) -> String {
        use Instruction::*;

        // Always start by clearing the current cell: llo oll lll
        let mut best = String::new();
        push_all(&mut best, &[LoopOpen, Decrement, LoopClose]);
        push_repeat(&mut best, Increment, target as usize);

        if !self.options.use_loops || target == 0 {
            return best;
        }

        // Try loop-based constructions of the form:
        //   clear current; clear temp (one cell right)
        //   set current to 'a'
        //   [ > '+' * b < - ]  multiply a*b into temp, clearing current
        //   > adjust remainder r = target - a*b
        //   [<+>-]             move the result back; pointer returns home
        //
        // We search a in [1..max_loop_factor], b ~ round(target / a), and
        // fix up the small remainder with increments or decrements.
        let mut best_len = best.len();

        for a in 1..=self.options.max_loop_factor {
            let b_f = (target as f32) / (a as f32);
            let mut b = b_f.round() as i32;
            if b < 1 {
                b = 1;
            }
            if b > 255 {
                b = 255;
            }

            let prod = (a as i32) * b;
            let mut seq = String::new();
            // Clear current cell and the temp cell to its right.
            push_all(&mut seq, &[LoopOpen, Decrement, LoopClose]);
            push_all(&mut seq, &[MoveNext, LoopOpen, Decrement, LoopClose, MovePrevious]);

            push_repeat(&mut seq, Increment, a as usize);
            push_all(&mut seq, &[LoopOpen, MoveNext]);
            push_repeat(&mut seq, Increment, b as usize);
            push_all(&mut seq, &[MovePrevious, Decrement, LoopClose]);

            // Move to temp and adjust the remainder.
            seq.push_str(MoveNext.lexeme());
            let r = (target as i32) - prod;
            if r > 0 {
                push_repeat(&mut seq, Increment, r as usize);
            } else if r < 0 {
                push_repeat(&mut seq, Decrement, (-r) as usize);
            }

            // Move the value back to the current cell and return the pointer.
            push_all(&mut seq, &[
                LoopOpen, MovePrevious, Increment, MoveNext, Decrement, LoopClose, MovePrevious,
            ]);

            if seq.len() < best_len {
                best_len = seq.len();
                best = seq;
            }
        }

        best
    }
}

fn push_all(output: &mut String, instrs: &[Instruction]) {
    for instr in instrs {
        output.push_str(instr.lexeme());
    }
}

fn push_repeat(output: &mut String, instr: Instruction, count: usize) {
    for _ in 0..count {
        output.push_str(instr.lexeme());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::TrollScriptReader;
    use std::sync::{Arc, Mutex};

    fn run_and_capture(code: &str) -> Vec<u8> {
        let out = Arc::new(Mutex::new(Vec::new()));
        let sink_out = out.clone();
        let mut troll = TrollScriptReader::new_with_memory(64);
        troll.set_output_sink(move |bytes| {
            sink_out.lock().unwrap().extend_from_slice(bytes);
        });
        troll.interpret(code).expect("generated program should run");
        let bytes = out.lock().unwrap().clone();
        bytes
    }

    #[test]
    fn generated_program_is_well_formed() {
        let writer = TrollScriptWriter::new(b"Hi");
        let code = writer.generate();
        assert!(code.starts_with("tro"));
        assert!(code.ends_with("ll."));
        assert!(code.matches("loo").count() >= 2);
    }

    #[test]
    fn generated_program_prints_its_input() {
        let input = b"Hello World!";
        let writer = TrollScriptWriter::new(input);
        let code = writer.generate();
        assert_eq!(run_and_capture(&code), input);
    }

    #[test]
    fn zero_bytes_need_no_adjustment() {
        let writer = TrollScriptWriter::new(&[0, 0, 0]);
        let code = writer.generate();
        // Three outputs straight from the zeroed cell.
        assert_eq!(code, "troloolooloo ll.".replace(' ', ""));
        assert_eq!(run_and_capture(&code), vec![0, 0, 0]);
    }

    #[test]
    fn without_loops_still_generates_correct_code() {
        let options = WriterOptions {
            use_loops: false,
            max_loop_factor: 16,
            assume_wrapping_u8: false,
        };
        let input = b"@A";
        let writer = TrollScriptWriter::with_options(input, options);
        let code = writer.generate();
        assert_eq!(run_and_capture(&code), input);
    }

    #[test]
    fn descending_bytes_use_the_shorter_direction() {
        let writer = TrollScriptWriter::new(&[250, 249]);
        let code = writer.generate();
        assert_eq!(run_and_capture(&code), vec![250, 249]);
    }
}
