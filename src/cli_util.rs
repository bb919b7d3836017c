use std::io::{self, Write};

use crate::reader::TrollScriptReaderError;
use crate::scanner::scan;

/// Pretty-print a structured TrollScriptReaderError with caret positioning.
/// If `program` is `Some("troll")`, messages are prefixed with "troll: ..."
/// for CLI read mode.
pub fn print_reader_error(program: Option<&str>, source: &str, err: &TrollScriptReaderError) {
    let prefix_program = |msg: &str| {
        if let Some(p) = program {
            format!("{p}: {msg}")
        } else {
            msg.to_string()
        }
    };

    match err {
        TrollScriptReaderError::MalformedProgram { ip, kind } => {
            let msg = prefix_program(&format!("Malformed program: unmatched bracket {kind}"));
            print_error_with_context(&msg, source, *ip);
        }
        TrollScriptReaderError::IoError { ip, source: io_err } => {
            let msg = prefix_program(&format!("I/O error: {io_err}"));
            print_error_with_context(&msg, source, *ip);
        }
        TrollScriptReaderError::StepLimitExceeded { limit } => {
            eprintln!("{}", prefix_program(&format!(
                "Execution aborted: step limit exceeded ({limit})"
            )));
        }
        TrollScriptReaderError::Canceled => {
            eprintln!("{}", prefix_program("Execution aborted: cancelled"));
        }
    }
    let _ = io::stderr().flush();
}

/// Print a concise error with the instruction index and a caret context
/// window. Executor positions index tokens, not source characters, so the
/// source is re-scanned and a window of lexemes is rendered around `pos`.
pub fn print_error_with_context(prefix: &str, source: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window of lexemes around the position for context
    const WINDOW_TOKENS: usize = 8;

    let tokens = scan(source);
    if tokens.is_empty() {
        return;
    }

    let start = pos.saturating_sub(WINDOW_TOKENS);
    let end = (pos + WINDOW_TOKENS + 1).min(tokens.len());

    let rendered: Vec<&str> = tokens[start..end].iter().map(|t| t.lexeme()).collect();
    eprintln!("  {}", rendered.join(" "));

    // Caret under the offending lexeme: each rendered token is its 3-char
    // lexeme plus one space.
    let caret_offset = pos.saturating_sub(start) * 4;
    let mut underline = String::new();
    for _ in 0..caret_offset {
        underline.push(' ');
    }
    underline.push_str("^^^");
    eprintln!("  {}", underline);
    let _ = io::stderr().flush();
}
