//! Playback shell: receives the ready audio file and hands it to an external player.

use dailypulse_core::PlaybackShell;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

pub struct CliShell {
    player_command: Option<String>,
    launch: bool,
    prepared: Mutex<Option<PathBuf>>,
}

impl CliShell {
    pub fn new(player_command: Option<String>, launch: bool) -> Self {
        Self {
            player_command,
            launch,
            prepared: Mutex::new(None),
        }
    }

    /// Last file handed over by the updater, if any.
    pub fn prepared(&self) -> Option<PathBuf> {
        self.prepared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn launch_player(&self, path: &Path) {
        let Some(cmd) = self.player_command.as_deref() else {
            println!("No player_command configured; open {} yourself.", path.display());
            return;
        };
        let Some((program, args)) = player_invocation(cmd, path) else {
            tracing::warn!("player_command is blank");
            return;
        };
        match Command::new(&program).args(&args).spawn() {
            Ok(child) => tracing::info!(pid = child.id(), %program, "player started"),
            Err(e) => {
                tracing::error!(%program, "could not start player: {}", e);
                eprintln!("Could not start {}: {}", program, e);
            }
        }
    }
}

impl PlaybackShell for CliShell {
    fn prepare(&self, path: &Path) {
        *self
            .prepared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(path.to_path_buf());
        println!("Ready to play: {}", path.display());
        if self.launch {
            self.launch_player(path);
        }
    }
}

/// Split `player_command` on whitespace and append the audio path.
pub(crate) fn player_invocation(cmd: &str, path: &Path) -> Option<(String, Vec<OsString>)> {
    let mut words = cmd.split_whitespace();
    let program = words.next()?.to_string();
    let mut args: Vec<OsString> = words.map(OsString::from).collect();
    args.push(path.as_os_str().to_owned());
    Some((program, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_appends_path() {
        let (program, args) =
            player_invocation("mpv --no-video", Path::new("/data/news.mp3")).unwrap();
        assert_eq!(program, "mpv");
        assert_eq!(
            args,
            vec![OsString::from("--no-video"), OsString::from("/data/news.mp3")]
        );
    }

    #[test]
    fn blank_command_has_no_invocation() {
        assert!(player_invocation("   ", Path::new("x")).is_none());
    }

    #[test]
    fn prepare_records_path_without_launching() {
        let shell = CliShell::new(Some("definitely-not-a-player".to_string()), false);
        assert!(shell.prepared().is_none());
        shell.prepare(Path::new("/data/news.mp3"));
        assert_eq!(shell.prepared(), Some(PathBuf::from("/data/news.mp3")));
    }
}
