//! A tiny TrollScript interpreter library.
//!
//! TrollScript is a Brainfuck dialect whose instructions are three-character
//! lexemes (`ooo`, `ool`, `olo`, ...) bracketed by a `tro` start marker and an
//! `ll.` terminator. This module provides the execution engine that runs a
//! scanned token sequence against a fixed-size memory tape.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0, wrapping pointer movement at both ends.
//! - Cell arithmetic wraps at the byte boundary.
//! - `lol` reads a single byte from stdin; an exhausted input source is an
//!   I/O error.
//! - `loo` writes the byte at the current cell to stdout (no newline).
//! - Loops nest via level counting; a bracket whose jump runs off the token
//!   sequence is reported as a malformed program.
//! - After a successful run the tape self-clears (all cells 0, pointer 0),
//!   so one engine can interpret many programs in sequence.
//!
//! Quick start:
//!
//! ```no_run
//! use trollscript::TrollScriptReader;
//!
//! // Prints the byte 3.
//! let code = "troolooloololooll.";
//! let mut troll = TrollScriptReader::new();
//! troll.interpret(code).expect("program should run");
//! println!(); // ensure a trailing newline for readability
//! ```

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::scanner::scan;
use crate::tape::Tape;
use crate::token::Instruction;

/// Default number of tape cells.
pub const DEFAULT_CELLS: usize = 30_000;

/// Errors that can occur while interpreting TrollScript code.
#[derive(Debug, thiserror::Error)]
pub enum TrollScriptReaderError {
    /// A loop bracket's jump scan ran off the token sequence without finding
    /// its match.
    #[error("Malformed program: unmatched bracket {kind} at instruction {ip}")]
    MalformedProgram { ip: usize, kind: UnmatchedBracketKind },

    /// The input source could not supply a byte, or the output sink rejected
    /// a write.
    #[error("I/O error at instruction {ip}: {source}")]
    IoError {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout).
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'llo'"),
            UnmatchedBracketKind::Close => write!(f, "'lll'"),
        }
    }
}

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// A reusable TrollScript interpreter.
///
/// The engine owns:
/// - a fixed-length memory tape (30,000 cells by default) with its data
///   pointer,
/// - optional output-sink and input-provider capabilities; when unset, `loo`
///   writes to stdout and `lol` reads from stdin.
///
/// `interpret` may be called repeatedly; the tape self-clears after each
/// successful run. Calls must be serialized by the caller — the engine is not
/// reentrant mid-run.
pub struct TrollScriptReader {
    tape: Tape,
    // Optional hooks:
    output_sink: Option<Box<dyn Fn(&[u8]) + Send + Sync>>,
    input_provider: Option<Box<dyn Fn() -> Option<u8> + Send + Sync>>,
}

impl TrollScriptReader {
    /// Create an interpreter with the default 30,000-cell tape.
    pub fn new() -> Self {
        Self::new_with_memory(DEFAULT_CELLS)
    }

    /// Create an interpreter with a custom number of tape cells.
    pub fn new_with_memory(cells: usize) -> Self {
        Self {
            tape: Tape::new(cells),
            output_sink: None,
            input_provider: None,
        }
    }

    /// Provide an output sink. When set, `loo` sends bytes to this sink
    /// instead of stdout; it receives a single-byte slice per instruction.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.output_sink = Some(Box::new(sink));
    }

    /// Provide an input provider. When set, `lol` reads from this provider
    /// instead of stdin. Returning `None` means the source is exhausted and
    /// surfaces as an I/O error.
    pub fn set_input_provider<F>(&mut self, provider: F)
    where
        F: Fn() -> Option<u8> + Send + Sync + 'static,
    {
        self.input_provider = Some(Box::new(provider));
    }

    /// Zero the tape and return the pointer to cell 0.
    ///
    /// This runs automatically after every successful `interpret` call. An
    /// erroring run leaves the tape as-is for inspection; call this to clear
    /// it explicitly.
    pub fn reset(&mut self) {
        self.tape.reset();
    }

    /// Scan and execute a TrollScript source string.
    ///
    /// Program output goes to the configured sink, input is pulled from the
    /// configured source. Returns `Ok(())` on success or a
    /// [`TrollScriptReaderError`] on failure.
    pub fn interpret(&mut self, source: &str) -> Result<(), TrollScriptReaderError> {
        let tokens = scan(source);
        self.execute(&tokens, false, None)
    }

    /// Debug-run a source string, printing a step-by-step table of operations
    /// instead of producing I/O side effects. The interpreter state (pointer,
    /// tape) advances exactly as it would during a real run, but:
    /// - `loo` does not write the byte; the action is logged instead
    /// - `lol` does not consume input; the cell is set to 0 and logged
    pub fn interpret_debug(&mut self, source: &str) -> Result<(), TrollScriptReaderError> {
        let tokens = scan(source);
        self.execute(&tokens, true, None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn interpret_with_control(
        &mut self,
        source: &str,
        step_control: StepControl,
    ) -> Result<(), TrollScriptReaderError> {
        let tokens = scan(source);
        self.execute(&tokens, false, Some(&step_control))
    }

    /// Debug-run with cooperative cancellation and optional step limit.
    pub fn interpret_debug_with_control(
        &mut self,
        source: &str,
        step_control: StepControl,
    ) -> Result<(), TrollScriptReaderError> {
        let tokens = scan(source);
        self.execute(&tokens, true, Some(&step_control))
    }

    /// Internal executor shared by all interpret variants.
    fn execute(
        &mut self,
        tokens: &[Instruction],
        debug: bool,
        step_control: Option<&StepControl>,
    ) -> Result<(), TrollScriptReaderError> {
        let mut ip = 0;
        let mut step: usize = 0;

        if debug {
            println!("STEP | IP  | PTR | CELL | INSTR | ACTION");
            println!("-----+-----+-----+------+-------+------------------------------------------------");
        }

        while ip < tokens.len() {
            // Cooperative cancellation check
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(TrollScriptReaderError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if step >= max {
                        return Err(TrollScriptReaderError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let instr = tokens[ip];
            let (ptr_before, cell_before) = (self.tape.pointer(), self.tape.cell());
            let mut action: Option<String> = if debug { Some(String::new()) } else { None };

            match instr {
                Instruction::MoveNext => {
                    self.tape.move_next();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer to index {}", self.tape.pointer());
                    }
                }
                Instruction::MovePrevious => {
                    self.tape.move_previous();
                    if let Some(a) = action.as_mut() {
                        *a = format!("Moved pointer to index {}", self.tape.pointer());
                    }
                }
                Instruction::Increment => {
                    self.tape.increment();
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Increment cell[{}] from {} to {}",
                            ptr_before,
                            cell_before,
                            self.tape.cell()
                        );
                    }
                }
                Instruction::Decrement => {
                    self.tape.decrement();
                    if let Some(a) = action.as_mut() {
                        *a = format!(
                            "Decrement cell[{}] from {} to {}",
                            ptr_before,
                            cell_before,
                            self.tape.cell()
                        );
                    }
                }
                Instruction::Output => {
                    if let Some(a) = action.as_mut() {
                        *a = format!("Output byte {} (suppressed in debug)", cell_before);
                    } else {
                        self.write_byte(cell_before)
                            .map_err(|source| TrollScriptReaderError::IoError { ip, source })?;
                    }
                }
                Instruction::Input => {
                    if let Some(a) = action.as_mut() {
                        // Debug never consumes real input.
                        self.tape.set_cell(0);
                        *a = "Read byte from input -> simulated (set cell to 0)".to_string();
                    } else {
                        let byte = self
                            .read_byte()
                            .map_err(|source| TrollScriptReaderError::IoError { ip, source })?;
                        self.tape.set_cell(byte);
                    }
                }
                Instruction::LoopOpen => {
                    if cell_before == 0 {
                        let close = matching_close(tokens, ip)?;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Cell is 0; jump forward to 'lll' at IP {close}");
                        }
                        ip = close;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Enter loop (cell != 0)".to_string();
                    }
                }
                Instruction::LoopClose => {
                    if cell_before != 0 {
                        let open = matching_open(tokens, ip)?;
                        if let Some(a) = action.as_mut() {
                            *a = format!("Cell != 0; jump back to 'llo' at IP {open}");
                        }
                        ip = open;
                    } else if let Some(a) = action.as_mut() {
                        *a = "Exit loop (cell is 0)".to_string();
                    }
                }
                // The scanner consumes both markers; they never reach here.
                Instruction::StartMarker | Instruction::EndMarker => {}
            }

            if debug {
                println!(
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}  | {}",
                    step,
                    ip,
                    ptr_before,
                    cell_before,
                    instr,
                    action.unwrap_or_default()
                );
            }

            // Advance step counter
            step += 1;
            // A bracket jump lands ON the matching bracket, so this advance
            // moves just past it: loop bodies begin one token after 'llo' and
            // the pair itself is never re-executed.
            ip += 1;
        }

        // The engine self-clears after every completed run.
        self.tape.reset();
        Ok(())
    }

    fn write_byte(&self, byte: u8) -> io::Result<()> {
        if let Some(sink) = self.output_sink.as_ref() {
            (sink)(&[byte]);
            Ok(())
        } else {
            let mut stdout = io::stdout();
            stdout.write_all(&[byte])
        }
    }

    fn read_byte(&self) -> io::Result<u8> {
        if let Some(provider) = self.input_provider.as_ref() {
            (provider)().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "input source exhausted")
            })
        } else {
            let mut buf = [0u8; 1];
            match io::stdin().read(&mut buf)? {
                0 => Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input source exhausted",
                )),
                _ => Ok(buf[0]),
            }
        }
    }
}

impl Default for TrollScriptReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the `lll` matching the `llo` at `ip` by scanning forward with a
/// nesting-level counter. Errors if the scan runs off the end.
fn matching_close(
    tokens: &[Instruction],
    ip: usize,
) -> Result<usize, TrollScriptReaderError> {
    let mut level = 1usize;
    let mut pos = ip;
    while level > 0 {
        pos += 1;
        if pos >= tokens.len() {
            return Err(TrollScriptReaderError::MalformedProgram {
                ip,
                kind: UnmatchedBracketKind::Open,
            });
        }
        match tokens[pos] {
            Instruction::LoopOpen => level += 1,
            Instruction::LoopClose => level -= 1,
            _ => {}
        }
    }
    Ok(pos)
}

/// Find the `llo` matching the `lll` at `ip` by scanning backward with a
/// nesting-level counter. Errors if the scan runs off the start.
fn matching_open(
    tokens: &[Instruction],
    ip: usize,
) -> Result<usize, TrollScriptReaderError> {
    let mut level = 1usize;
    let mut pos = ip;
    while level > 0 {
        if pos == 0 {
            return Err(TrollScriptReaderError::MalformedProgram {
                ip,
                kind: UnmatchedBracketKind::Close,
            });
        }
        pos -= 1;
        match tokens[pos] {
            Instruction::LoopOpen => level -= 1,
            Instruction::LoopClose => level += 1,
            _ => {}
        }
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Wrap body instructions in the start/end markers.
    fn program(body: &[Instruction]) -> String {
        let mut source = String::from("tro");
        for instr in body {
            source.push_str(instr.lexeme());
        }
        source.push_str("ll.");
        source
    }

    /// Reader whose output is captured into a shared buffer and whose input
    /// is served from a fixed byte queue.
    fn capture_reader(cells: usize, input: Vec<u8>) -> (TrollScriptReader, Arc<Mutex<Vec<u8>>>) {
        let out = Arc::new(Mutex::new(Vec::new()));
        let sink_out = out.clone();
        let queue = Mutex::new(input.into_iter());

        let mut troll = TrollScriptReader::new_with_memory(cells);
        troll.set_output_sink(move |bytes| {
            sink_out.lock().unwrap().extend_from_slice(bytes);
        });
        troll.set_input_provider(move || queue.lock().unwrap().next());
        (troll, out)
    }

    use Instruction::*;

    #[test]
    fn increments_then_output_writes_that_count() {
        let (mut troll, out) = capture_reader(10, vec![]);
        troll.interpret("troolooloololooll.").unwrap();
        assert_eq!(*out.lock().unwrap(), vec![3]);
    }

    #[test]
    fn tape_and_pointer_reset_after_a_successful_run() {
        let (mut troll, _out) = capture_reader(8, vec![]);
        // Leave garbage in two cells, then finish normally.
        let source = program(&[Increment, MoveNext, Increment, Increment]);
        troll.interpret(&source).unwrap();
        assert_eq!(troll.tape.pointer(), 0);
        assert!(troll.tape.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn engine_is_reusable_across_runs() {
        let (mut troll, out) = capture_reader(10, vec![]);
        let source = program(&[Increment, Output]);
        troll.interpret(&source).unwrap();
        troll.interpret(&source).unwrap();
        // The self-clearing reset means both runs start from zero.
        assert_eq!(*out.lock().unwrap(), vec![1, 1]);
    }

    #[test]
    fn empty_loop_on_zero_cell_is_skipped() {
        let (mut troll, out) = capture_reader(10, vec![]);
        // The loop body runs zero times; execution lands past both brackets.
        let source = program(&[LoopOpen, LoopClose, Increment, Output]);
        troll.interpret(&source).unwrap();
        assert_eq!(*out.lock().unwrap(), vec![1]);
    }

    #[test]
    fn loop_runs_once_per_initial_cell_value() {
        let (mut troll, out) = capture_reader(10, vec![]);
        // Cell starts at 3; each iteration outputs then decrements.
        let source = program(&[
            Increment, Increment, Increment, LoopOpen, Output, Decrement, LoopClose,
        ]);
        troll.interpret(&source).unwrap();
        assert_eq!(*out.lock().unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn nested_loops_match_by_level() {
        let (mut troll, out) = capture_reader(10, vec![]);
        // Outer loop runs twice; the inner loop moves cell 1's value to
        // cell 2 each time around.
        let source = program(&[
            Increment, Increment, // cell0 = 2
            LoopOpen,
            MoveNext, Increment, Increment, // cell1 = 2
            LoopOpen, Decrement, MoveNext, Increment, MovePrevious, LoopClose,
            MoveNext, Output, // emit cell2
            MovePrevious, MovePrevious, Decrement,
            LoopClose,
        ]);
        troll.interpret(&source).unwrap();
        assert_eq!(*out.lock().unwrap(), vec![2, 4]);
    }

    #[test]
    fn input_stores_bytes_into_the_current_cell() {
        let (mut troll, out) = capture_reader(10, vec![b'Z']);
        troll.interpret("trolollooll.").unwrap();
        assert_eq!(*out.lock().unwrap(), vec![b'Z']);
    }

    #[test]
    fn exhausted_input_source_is_an_io_error() {
        let (mut troll, _out) = capture_reader(10, vec![]);
        let result = troll.interpret("trololll.");
        assert!(matches!(
            result,
            Err(TrollScriptReaderError::IoError { ip: 0, .. })
        ));
    }

    #[test]
    fn unmatched_open_bracket_is_malformed() {
        let (mut troll, _out) = capture_reader(10, vec![]);
        // Cell is 0 at 'llo' and there is no matching 'lll'.
        let result = troll.interpret("trolloll.");
        assert!(matches!(
            result,
            Err(TrollScriptReaderError::MalformedProgram {
                kind: UnmatchedBracketKind::Open,
                ..
            })
        ));
    }

    #[test]
    fn unmatched_close_bracket_is_malformed() {
        let (mut troll, _out) = capture_reader(10, vec![]);
        // Cell is 1 at 'lll' and there is no matching 'llo'.
        let source = program(&[Increment, LoopClose]);
        let result = troll.interpret(&source);
        assert!(matches!(
            result,
            Err(TrollScriptReaderError::MalformedProgram {
                ip: 1,
                kind: UnmatchedBracketKind::Close,
            })
        ));
    }

    #[test]
    fn erroring_run_leaves_the_tape_for_inspection() {
        let (mut troll, _out) = capture_reader(10, vec![]);
        let source = program(&[Increment, Increment, LoopClose]);
        let result = troll.interpret(&source);
        assert!(result.is_err());
        assert_eq!(troll.tape.as_slice()[0], 2);
        troll.reset();
        assert!(troll.tape.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn pointer_wraparound_is_observable_end_to_end() {
        let (mut troll, out) = capture_reader(3, vec![]);
        // 'ool' from cell 0 wraps to the last cell; one 'ooo' from there
        // wraps back to cell 0. The increment left on the last cell is read
        // back by wrapping around in the other direction.
        let source = program(&[
            MovePrevious, Increment, MoveNext, MoveNext, MoveNext, Output,
        ]);
        troll.interpret(&source).unwrap();
        assert_eq!(*out.lock().unwrap(), vec![1]);
    }

    #[test]
    fn step_limit_aborts_infinite_loops() {
        let (mut troll, _out) = capture_reader(4, vec![]);
        let ctrl = StepControl::new(Some(1_000), Arc::new(AtomicBool::new(false)));
        // The cell never reaches 0, so the loop never exits on its own.
        let source = program(&[Increment, LoopOpen, LoopClose]);
        let result = troll.interpret_with_control(&source, ctrl);
        assert!(matches!(
            result,
            Err(TrollScriptReaderError::StepLimitExceeded { limit: 1_000 })
        ));
    }

    #[test]
    fn cancel_flag_aborts_execution() {
        let (mut troll, _out) = capture_reader(4, vec![]);
        let flag = Arc::new(AtomicBool::new(true));
        let ctrl = StepControl::new(None, flag);
        let source = program(&[Increment, Output]);
        let result = troll.interpret_with_control(&source, ctrl);
        assert!(matches!(result, Err(TrollScriptReaderError::Canceled)));
    }

    #[test]
    fn byte_wraparound_after_256_increments() {
        let (mut troll, out) = capture_reader(1, vec![]);
        let mut body = vec![Increment; 256];
        body.push(Output);
        troll.interpret(&program(&body)).unwrap();
        assert_eq!(*out.lock().unwrap(), vec![0]);
    }
}
