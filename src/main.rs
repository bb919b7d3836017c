use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, IsTerminal, Write};

use trollscript::commands::{read, repl, write};
use trollscript::repl::ModeFlagOverride;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} read  [--debug|-d] "<code>"      # Run TrollScript code (args are concatenated)
  {0} read  [--debug|-d] --file <PATH> # Run TrollScript code loaded from file
  {0} write [--bytes] [TEXT...]        # Generate TrollScript to print TEXT/STDIN/file
  {0} write [--bytes] --file <PATH>    # Generate TrollScript to print file contents
  {0} repl                             # Start a TrollScript REPL (read-eval-print loop)

With no subcommand and piped stdin, reads one program from stdin and runs it.

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "troll", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Read(read::ReadArgs),
    Write(write::WriteArgs),
    Repl(repl::ReplArgs),
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("troll"));

    let cli = Cli::parse();

    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match cli.command {
        Some(Command::Read(args)) => read::run(&program, args),
        Some(Command::Write(args)) => write::run(&program, args),
        Some(Command::Repl(args)) => {
            let mode_flag = if args.bare {
                ModeFlagOverride::Bare
            } else if args.editor {
                ModeFlagOverride::Editor
            } else {
                ModeFlagOverride::None
            };
            repl::run(&program, args.help, mode_flag)
        }
        None => {
            // Piped stdin with no subcommand behaves like a one-shot bare
            // REPL; on a TTY there is nothing to run, so show usage.
            if io::stdin().is_terminal() {
                print_top_usage_and_exit(&program, 2);
            }
            repl::run(&program, false, ModeFlagOverride::Bare)
        }
    };

    std::process::exit(code);
}
