//! A TrollScript interpreter library.
//!
//! TrollScript is an esoteric, Brainfuck-derived language whose instructions
//! are three-character lexemes. A program begins at the `tro` start marker,
//! ends at the `ll.` terminator, and runs against a fixed-size memory tape
//! with a single wraparound data pointer.
//!
//! | Lexeme | Effect |
//! |--------|--------|
//! | `tro`  | begin recording instructions |
//! | `ooo`  | move the pointer right (wraps) |
//! | `ool`  | move the pointer left (wraps) |
//! | `olo`  | increment the current cell |
//! | `oll`  | decrement the current cell |
//! | `loo`  | output the current cell as one byte |
//! | `lol`  | read one byte into the current cell |
//! | `llo`  | open a loop |
//! | `lll`  | close a loop |
//! | `ll.`  | stop scanning |
//!
//! Everything else in a source is noise and is skipped; lexemes are matched
//! case-insensitively.
//!
//! Quick start:
//!
//! ```no_run
//! use trollscript::TrollScriptReader;
//!
//! // Prints the byte 3.
//! let mut troll = TrollScriptReader::new();
//! troll.interpret("troolooloololooll.").expect("program should run");
//! ```

pub mod cli_util;
pub mod commands;
pub mod reader;
pub mod repl;
pub mod scanner;
pub mod tape;
pub mod theme;
pub mod token;
pub mod writer;

pub use reader::{
    StepControl, TrollScriptReader, TrollScriptReaderError, UnmatchedBracketKind,
};
pub use scanner::scan;
pub use tape::Tape;
pub use token::Instruction;
pub use writer::{TrollScriptWriter, WriterOptions};
