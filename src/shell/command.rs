//! ShellCommand - line-based input for the interactive session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

use tokio::sync::mpsc;

/// Actions the user can take in the interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Pick an image file.
    Open(PathBuf),
    /// Edit the block width (raw text, coerced by the selection).
    Width(String),
    /// Submit the current image for conversion.
    Convert,
    /// Save the result as minecraft.png, optionally into a given directory.
    Save(Option<PathBuf>),
    /// Switch the display language.
    Language(String),
    /// Print the current view.
    Show,
    /// Print the help text.
    Help,
    /// End the session.
    Quit,
}

impl ShellCommand {
    /// Parse a line of input.
    ///
    /// Returns `None` for empty input. Unknown commands print a hint and
    /// return `None`.
    pub fn parse(input: &str) -> Option<ShellCommand> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        match word.to_lowercase().as_str() {
            "open" | "upload" | "o" => {
                if rest.is_empty() {
                    print_status("Usage: open <path to .png/.jpg/.jpeg>");
                    None
                } else {
                    Some(ShellCommand::Open(PathBuf::from(rest)))
                }
            }
            "width" | "w" => Some(ShellCommand::Width(rest.to_string())),
            "convert" | "c" => Some(ShellCommand::Convert),
            "save" | "download" | "s" => {
                if rest.is_empty() {
                    Some(ShellCommand::Save(None))
                } else {
                    Some(ShellCommand::Save(Some(PathBuf::from(rest))))
                }
            }
            "lang" | "language" => Some(ShellCommand::Language(rest.to_string())),
            "show" | "status" => Some(ShellCommand::Show),
            "help" | "?" => Some(ShellCommand::Help),
            "quit" | "exit" | "q" => Some(ShellCommand::Quit),
            _ => {
                print_status(&format!("Unknown command: {}", word));
                print_status("Available commands: open, width, convert, save, lang, show, help, quit");
                None
            }
        }
    }

    /// Read commands from stdin on a background thread.
    ///
    /// The channel closes when stdin reaches EOF or the receiver is dropped.
    pub fn spawn_stdin_listener() -> mpsc::Receiver<ShellCommand> {
        let (tx, rx) = mpsc::channel(16);

        thread::spawn(move || {
            let stdin = io::stdin();
            let handle = stdin.lock();

            print_prompt();
            for line in handle.lines() {
                match line {
                    Ok(input) => {
                        if let Some(cmd) = ShellCommand::parse(&input) {
                            if tx.blocking_send(cmd).is_err() {
                                break;
                            }
                        }
                        print_prompt();
                    }
                    Err(_) => break,
                }
            }
        });

        rx
    }
}

pub(crate) fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub(crate) fn print_status(message: &str) {
    println!("{}", message);
}
