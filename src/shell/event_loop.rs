//! Async event loop for the interactive session.
//!
//! User commands and submission completions arrive on separate channels and
//! are applied one at a time, so the shell state is only ever touched from
//! this loop. A conversion runs as a spawned task; the loop keeps accepting
//! commands while it is in flight.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::command::{print_status, ShellCommand};
use super::state::Shell;
use crate::i18n::{Language, Strings};
use crate::selection::ACCEPTED_EXTENSIONS;
use crate::submission::Completion;

/// Run the session until `Quit`, end of input, or Ctrl-C.
///
/// On `Quit` or end of input a conversion still in flight is allowed to
/// finish first. All handles are released before the shell is returned.
pub async fn run(
    mut shell: Shell,
    mut commands: mpsc::Receiver<ShellCommand>,
    output_dir: PathBuf,
) -> Shell {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let mut quitting = false;
    let mut ctrl_c_armed = true;

    print_status(&shell.view().to_string());

    loop {
        if quitting && !shell.status().is_in_flight() {
            break;
        }

        tokio::select! {
            maybe_cmd = commands.recv(), if !quitting => {
                let quit = match maybe_cmd {
                    Some(cmd) => handle_command(&mut shell, cmd, &output_dir, &done_tx),
                    None => true,
                };
                if quit {
                    quitting = true;
                    if shell.status().is_in_flight() {
                        print_status("Waiting for the current conversion to finish...");
                    }
                }
            }
            Some(completion) = done_rx.recv() => {
                shell.on_completion(completion);
                print_status(&shell.view().to_string());
            }
            signal = tokio::signal::ctrl_c(), if ctrl_c_armed => {
                if interrupted(signal, &mut ctrl_c_armed) {
                    break;
                }
            }
        }
    }

    shell.teardown();
    shell
}

/// Whether a Ctrl-C wait result should end the session. A handler that
/// cannot be installed disarms the branch instead.
fn interrupted(signal: std::io::Result<()>, armed: &mut bool) -> bool {
    match signal {
        Ok(()) => {
            log::info!("Interrupted");
            true
        }
        Err(e) => {
            log::warn!("Ctrl-C handler unavailable, use 'quit' to exit: {}", e);
            *armed = false;
            false
        }
    }
}

/// Apply one command. Returns `true` when the session should end.
fn handle_command(
    shell: &mut Shell,
    cmd: ShellCommand,
    output_dir: &Path,
    done_tx: &mpsc::UnboundedSender<Completion>,
) -> bool {
    match cmd {
        ShellCommand::Open(path) => match shell.pick_file(&path) {
            Ok(_) => print_status(&shell.view().to_string()),
            Err(e) => print_status(&format!("Error: {}", e)),
        },
        ShellCommand::Width(raw) => {
            let width = shell.edit_width(&raw);
            print_status(&format!("{}: {}", shell.view().strings.blocks_label, width));
        }
        ShellCommand::Convert => match shell.submit() {
            Some(submission) => {
                let tx = done_tx.clone();
                tokio::spawn(async move {
                    let completion = submission.send().await;
                    // Receiver only goes away when the loop has exited.
                    let _ = tx.send(completion);
                });
                print_status(&shell.view().to_string());
            }
            None => {
                if let Some(reason) = shell.view().error {
                    print_status(&reason);
                } else {
                    log::debug!("Convert ignored; submit affordance disabled");
                }
            }
        },
        ShellCommand::Save(dir) => {
            let dir = dir.unwrap_or_else(|| output_dir.to_path_buf());
            match shell.download(&dir) {
                Ok(dest) => print_status(&format!("Saved {}", dest.display())),
                Err(e) => print_status(&format!("Error: {}", e)),
            }
        }
        ShellCommand::Language(key) => match Language::from_key(&key) {
            Some(language) => {
                shell.set_language(language);
                print_status(&shell.view().to_string());
            }
            None => {
                let names: Vec<&str> = Language::ALL.iter().map(|l| l.native_name()).collect();
                print_status(&format!("Unknown language '{}'. Available: {}", key, names.join(", ")));
            }
        },
        ShellCommand::Show => print_status(&shell.view().to_string()),
        ShellCommand::Help => print_help(shell),
        ShellCommand::Quit => return true,
    }
    false
}

fn print_help(shell: &Shell) {
    for line in help_lines(shell.view().strings) {
        print_status(&line);
    }
}

fn help_lines(s: &Strings) -> Vec<String> {
    let languages: Vec<&str> = Language::ALL.iter().map(|l| l.native_name()).collect();
    vec![
        format!("{}: {}", s.help, s.help_text),
        String::new(),
        format!("  open <file>     {} ({})", s.upload, ACCEPTED_EXTENSIONS.join(", ")),
        format!("  width <n>       {}", s.blocks_label),
        format!("  convert         {}", s.convert),
        format!("  save [dir]      {}", s.download),
        format!("  lang <name>     {}: {}", s.language_label, languages.join(" | ")),
        format!("  show            {}", s.current_state),
        "  quit".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_ends_session() {
        let mut armed = true;
        assert!(interrupted(Ok(()), &mut armed));
        assert!(armed);
    }

    #[test]
    fn test_ctrl_c_registration_failure_disarms_without_ending() {
        let mut armed = true;
        let err = std::io::Error::new(std::io::ErrorKind::Other, "no signal driver");
        assert!(!interrupted(Err(err), &mut armed));
        assert!(!armed);
    }

    #[test]
    fn test_help_follows_language() {
        let lines = help_lines(Language::French.strings()).join("\n");
        assert!(lines.contains("état actuel"));
        assert!(lines.contains("Langue: English | Français | Русский"));
        assert!(!lines.contains("current state"));
    }
}
