//! Subcommand handlers: interactive session, one-shot convert, config actions.

use std::path::{Path, PathBuf};

use super::args::{Args, ConfigAction};
use crate::config::{default_path, Config, DEFAULT_CONFIG_TEMPLATE};
use crate::selection::BlockWidth;
use crate::shell::{self, Shell, ShellCommand};
use crate::submission::{SubmissionController, SubmissionStatus};

/// Settings after merging CLI flags over the config file and environment.
#[derive(Debug)]
pub struct Session {
    pub shell: Shell,
    pub output_dir: PathBuf,
}

/// Build a shell from flags and configuration. Flags win.
pub fn build_session(args: &Args, config: &Config) -> Result<Session, String> {
    let client = config
        .build_client(args.api_url.as_deref())
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
    log::info!("Using conversion service at {}", client.endpoint());

    let policy = args.width_policy.unwrap_or(config.convert.width_policy);
    let width = args.width.map(BlockWidth::new).unwrap_or_else(|| config.default_width());
    let language = args.language.unwrap_or(config.ui.language);

    Ok(Session {
        shell: Shell::new(SubmissionController::with_policy(client, policy), width, language),
        output_dir: args.output.clone().unwrap_or_else(|| config.output_dir()),
    })
}

/// Run the interactive session on stdin/stdout.
pub fn run_interactive(args: &Args, config: &Config) -> Result<(), String> {
    let session = build_session(args, config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    rt.block_on(async {
        let commands = ShellCommand::spawn_stdin_listener();
        let shell = shell::run(session.shell, commands, session.output_dir).await;
        let stats = shell.resources().stats();
        log::debug!("Session ended: {} minted, {} released", stats.minted, stats.released);
    });

    Ok(())
}

/// Convert one image and save the result, without the interactive loop.
pub fn run_convert(args: &Args, config: &Config, image: &Path) -> Result<(), String> {
    let Session {
        mut shell,
        output_dir,
    } = build_session(args, config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    let result = rt.block_on(convert_once(&mut shell, image, &output_dir));

    shell.teardown();
    result
}

/// Pick, submit, await and save a single image.
async fn convert_once(shell: &mut Shell, image: &Path, output_dir: &Path) -> Result<(), String> {
    shell.pick_file(image).map_err(|e| e.to_string())?;

    let submission = match shell.submit() {
        Some(submission) => submission,
        None => {
            return Err(shell
                .view()
                .error
                .unwrap_or_else(|| "Nothing to convert".to_string()))
        }
    };

    print!(
        "{} {} ({} blocks)... ",
        shell.view().submit_label,
        image.display(),
        submission.width()
    );
    std::io::Write::flush(&mut std::io::stdout()).ok();

    let completion = submission.send().await;
    shell.on_completion(completion);

    match shell.status() {
        SubmissionStatus::Succeeded => {
            println!("done");
            let dest = shell.download(output_dir).map_err(|e| e.to_string())?;
            println!("Saved {}", dest.display());
            Ok(())
        }
        SubmissionStatus::Failed { reason } => {
            println!("failed");
            Err(reason.clone())
        }
        other => Err(format!("Conversion ended in unexpected state {:?}", other)),
    }
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, args: &Args, config: &Config) -> Result<(), String> {
    let config_path = args.config.clone().unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Service: {}", config.base_url(args.api_url.as_deref()));
            println!("  Timeout: {}s (connect {}s)", config.api.timeout_secs, config.api.connect_timeout_secs);
            println!("  Default width: {}", config.default_width());
            println!("  Width policy: {:?}", config.convert.width_policy);
            println!("  Output dir: {}", config.output_dir().display());
            println!("  Language: {}", config.ui.language);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(format!(
                    "Config file already exists: {}\nUse 'minecraftimg config show' to view current settings.",
                    config_path.display()
                ));
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Error creating config directory: {}", e))?;
            }

            std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)
                .map_err(|e| format!("Error writing config file: {}", e))?;

            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}
