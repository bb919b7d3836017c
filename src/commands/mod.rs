pub mod read;
pub mod repl;
pub mod write;
