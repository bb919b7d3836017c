use std::env;
use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;
use reedline::{
    DefaultPrompt, DefaultPromptSegment, Highlighter, HistoryItem, Signal, StyledText,
};

use crate::token::Instruction;
use crate::{TrollScriptReader, cli_util};

pub fn repl_loop() -> io::Result<()> {
    // Initialize interactive line editor
    let mut editor = init_line_editor()?;

    loop {
        // Prompt and read a multi-line submission via editor
        let submission = read_submission_interactive(&mut editor)?;
        if submission.is_none() {
            // EOF or editor closed. End the session cleanly to avoid hanging
            // when stdin is closed.
            println!();
            io::stdout().flush()?;
            return Ok(());
        }

        let submission = submission.unwrap();

        let trimmed = submission.trim();
        if trimmed.is_empty() {
            continue; // Ignore empty submissions
        }

        // The scanner is permissive, so the buffer goes in as-is; sources
        // without a start marker simply execute zero instructions.
        execute_troll_buffer(trimmed);

        // Test hook: if TROLL_REPL_ONCE=1, exit after one execution
        if env::var("TROLL_REPL_ONCE").ok().as_deref() == Some("1") {
            return Ok(());
        }
    }
}

fn init_line_editor() -> io::Result<reedline::Reedline> {
    use reedline::{
        EditCommand, Emacs, KeyCode, KeyModifiers, Reedline, ReedlineEvent,
        default_emacs_keybindings,
    };

    // Start from default emacs-like bindings and adjust:
    // - Enter -> InsertNewLine (do not submit)
    // - Ctrl+D -> AcceptLine (submit)
    // - Ctrl+Z -> AcceptLine (submit, for Windows)
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('z'), ReedlineEvent::Submit);

    // Default edit-mode navigation.
    // Up/down move within the current multiline buffer, not history.
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);

    // Explicit history-mode convenience bindings
    // Alt+Up/Alt+Down or Ctrl+Up/Ctrl+Down to navigate history items.
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Down, ReedlineEvent::NextHistory);

    let history = reedline::FileBackedHistory::new(1_000).unwrap();

    let editor = Reedline::create()
        .with_highlighter(Box::new(TrollScriptHighlighter::new_catppuccin_mocha()))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    Ok(editor)
}

pub fn read_submission<R: io::BufRead>(stdin: &mut R) -> Option<String> {
    // Collect all lines until EOF
    let mut buffer = String::new();

    loop {
        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                // EOF
                break;
            }
            Ok(_) => {
                buffer.push_str(&line);
            }
            Err(_) => {
                // Read error, ignore
                return None;
            }
        }
    }

    if buffer.is_empty() { None } else { Some(buffer) }
}

fn read_submission_interactive(editor: &mut reedline::Reedline) -> io::Result<Option<String>> {
    // Minimal prompt
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("troll".to_string()),
        DefaultPromptSegment::Empty,
    );

    // Render prompt and read until user submits with Ctrl+D or Ctrl+Z
    // Enter inserts a newline; history is in-memory and not browsed
    let res = editor.read_line(&prompt);

    match res {
        Ok(Signal::Success(buffer)) => {
            // Add one history item per submitted buffer (program-level)
            if !buffer.trim().is_empty() {
                let _ = editor
                    .history_mut()
                    .save(HistoryItem::from_command_line(buffer.clone()));
            }
            Ok(Some(buffer))
        }
        Ok(Signal::CtrlC) => Ok(None), // Global SIGINT, exit immediately
        Ok(Signal::CtrlD) => Ok(None), // EOF, exit cleanly
        Err(e) => {
            // Print concise error and end session
            eprintln!("repl: editor error: {e}");
            let _ = io::stderr().flush();
            Ok(None)
        }
    }
}

/// Executes a single TrollScript program contained in `buffer`.
/// - Program output goes to stdout.
/// - Errors are printed concisely to stderr.
/// - A newline is always written to stdout after execution (success or error)
///   so that the prompt begins at column 0 on the next iteration.
fn execute_troll_buffer(buffer: &str) {
    // A fresh engine per submission: every run starts from a zeroed tape.
    let mut troll = TrollScriptReader::new();
    if let Err(err) = troll.interpret(buffer) {
        cli_util::print_reader_error(None, buffer, &err);
        let _ = io::stderr().flush();
    }
    println!();
    let _ = io::stdout().flush(); // Ensure output is flushed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplMode {
    Bare,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

pub fn select_mode(flag: ModeFlagOverride) -> Result<ReplMode, String> {
    // Flag override
    match flag {
        ModeFlagOverride::Bare => return Ok(ReplMode::Bare),
        ModeFlagOverride::Editor => {
            if !io::stdin().is_terminal() {
                return Err(
                    "cannot start editor: stdin is not a TTY (use --bare or TROLL_REPL_MODE=bare)"
                        .to_string(),
                );
            }
            return Ok(ReplMode::Editor);
        }
        ModeFlagOverride::None => {}
    }

    // Environment override
    if let Ok(val) = env::var("TROLL_REPL_MODE") {
        let v = val.trim().to_ascii_lowercase();
        return match v.as_str() {
            "bare" => Ok(ReplMode::Bare),
            "editor" => {
                if !io::stdin().is_terminal() {
                    return Err(
                        "cannot start editor: stdin is not a TTY (use TROLL_REPL_MODE=bare)"
                            .to_string(),
                    );
                }
                Ok(ReplMode::Editor)
            }
            _ => Err(format!(
                "invalid TROLL_REPL_MODE value: {val}, must be 'bare' or 'editor'"
            )),
        };
    }

    // Auto-detect
    if io::stdin().is_terminal() {
        Ok(ReplMode::Editor)
    } else {
        Ok(ReplMode::Bare)
    }
}

pub fn execute_bare_once() -> io::Result<()> {
    let mut locked = io::BufReader::new(io::stdin().lock());
    let submission = read_submission(&mut locked);
    if let Some(s) = submission {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            execute_troll_buffer(trimmed);
        }
    }
    Ok(())
}

/// Instruction classes used for highlighting.
#[derive(Default)]
struct TrollScriptHighlighter {
    map_marker: Style,
    map_movement: Style,
    map_inc: Style,
    map_dec: Style,
    map_output: Style,
    map_input: Style,
    map_bracket: Style,
    map_other: Style,
}

impl TrollScriptHighlighter {
    fn new_catppuccin_mocha() -> Self {
        use crate::theme::catppuccin::Mocha as P;

        // Lexeme class mapping
        // tro ll.  => BLUE (markers)
        // ooo ool  => SKY/TEAL-ish (movement)
        // olo oll  => GREEN/RED (data modification)
        // loo lol  => YELLOW/PEACH (I/O)
        // llo lll  => MAUVE (flow control)
        let mut s = Self::default();
        s.map_marker = Style::new().fg(P::BLUE).bold();
        s.map_movement = Style::new().fg(P::SKY).bold();
        s.map_inc = Style::new().fg(P::GREEN).bold();
        s.map_dec = Style::new().fg(P::RED).bold();
        s.map_output = Style::new().fg(P::YELLOW).bold();
        s.map_input = Style::new().fg(P::PEACH).bold();
        s.map_bracket = Style::new().fg(P::MAUVE).bold();
        s.map_other = Style::new().fg(P::SURFACE2);
        s
    }

    #[inline]
    fn style_for(&self, instr: Instruction) -> Style {
        match instr {
            Instruction::StartMarker | Instruction::EndMarker => self.map_marker,
            Instruction::MoveNext | Instruction::MovePrevious => self.map_movement,
            Instruction::Increment => self.map_inc,
            Instruction::Decrement => self.map_dec,
            Instruction::Output => self.map_output,
            Instruction::Input => self.map_input,
            Instruction::LoopOpen | Instruction::LoopClose => self.map_bracket,
        }
    }
}

impl Highlighter for TrollScriptHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        // Walk the line the same way the scanner does: try a three-character
        // window, style recognized lexemes by class, and advance one dimmed
        // character on a miss so highlighting re-synchronizes with execution.
        let chars: Vec<char> = line.chars().collect();
        let mut out: StyledText = StyledText::new();
        let mut cursor = 0;

        while cursor < chars.len() {
            let end = (cursor + 3).min(chars.len());
            let candidate: String = chars[cursor..end].iter().collect();

            match Instruction::from_lexeme(&candidate) {
                Some(instr) => {
                    out.push((self.style_for(instr), candidate));
                    cursor = end;
                }
                None => {
                    out.push((self.map_other, chars[cursor].to_string()));
                    cursor += 1;
                }
            }
        }

        out
    }
}
