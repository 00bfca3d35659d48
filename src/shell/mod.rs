//! Interactive shell: the user-facing side of a conversion session.

mod command;
mod event_loop;
mod state;

pub use command::ShellCommand;
pub use event_loop::run;
pub use state::{Shell, ShellError, ShellView, DOWNLOAD_FILE_NAME};
