use std::{path::Path, process::Stdio};

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::{Child, Command},
};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    events::{EventSink, LauncherEvent},
};

use self::arguments::LaunchCommand;

pub mod arguments;
pub mod classpath;
pub mod rules;

/// Starts `command` inside `game_dir` with piped output.
pub fn spawn(command: &LaunchCommand, game_dir: &Path) -> Result<Child> {
    let mut cmd = Command::new(command.executable.get());
    cmd.args(&command.args)
        .current_dir(game_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("Command: {cmd:?}");

    cmd.spawn().map_err(|source| Error::LaunchSpawn {
        executable: command.executable.get_string(),
        source,
    })
}

/// Emits every line of `reader` as a [`LauncherEvent::Log`] prefixed with `prefix`.
pub(crate) async fn forward_lines<R>(reader: Option<R>, prefix: &str, sink: &dyn EventSink)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };

    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => sink.emit(LauncherEvent::Log(format!("{prefix} {line}"))).await,
            Ok(None) => break,
            Err(err) => {
                warn!("Unable to read game output: {err}");
                break;
            }
        }
    }
}
