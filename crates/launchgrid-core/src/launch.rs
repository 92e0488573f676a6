//! Shortcut invocation.
//!
//! A shortcut's target is either a directory (opened with the desktop's
//! default handler) or a file (spawned as a detached child process, with
//! optional arguments, working directory, and elevation).

use crate::error::{LaunchgridError, Result};
use crate::models::Button;
use crate::platform::shell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Everything needed to invoke one shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub path: PathBuf,
    pub arguments: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub run_as_admin: bool,
}

impl LaunchRequest {
    /// Build a request from a stored button row.
    ///
    /// Arguments are split on whitespace; quoting inside the argument string
    /// is not interpreted.
    pub fn from_button(button: &Button) -> Self {
        Self {
            path: PathBuf::from(&button.path),
            arguments: button
                .arguments
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
            working_dir: button.working_dir().map(Path::to_path_buf),
            run_as_admin: button.run_as_admin,
        }
    }

    /// The working directory the child will run in: the explicit one when
    /// set, otherwise the target's parent directory.
    pub fn effective_working_dir(&self) -> Option<PathBuf> {
        self.working_dir
            .clone()
            .or_else(|| self.path.parent().map(Path::to_path_buf))
    }
}

/// Launch the target described by the request.
///
/// Returns as soon as the child is spawned; a background reaper collects the
/// child when it exits, but the launcher never tracks it otherwise.
pub fn launch(request: &LaunchRequest) -> Result<()> {
    if !request.path.exists() {
        return Err(LaunchgridError::FileNotFound(request.path.clone()));
    }

    if request.path.is_dir() {
        debug!("Target {:?} is a directory, opening", request.path);
        return shell::open_with_default(&request.path);
    }

    let working_dir = request.effective_working_dir().filter(|dir| dir.is_dir());

    let cmd = if request.run_as_admin {
        shell::elevated_command(&request.path, &request.arguments, working_dir.as_deref())?
    } else {
        let mut cmd = Command::new(&request.path);
        cmd.args(&request.arguments);
        if let Some(dir) = &working_dir {
            cmd.current_dir(dir);
        }
        cmd
    };

    let pid = shell::spawn_detached(cmd, &request.path.display().to_string())?;
    info!(
        "Launched {:?} (pid {}{})",
        request.path,
        pid,
        if request.run_as_admin { ", elevated" } else { "" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn button(path: &str) -> Button {
        Button {
            id: 1,
            group_id: 1,
            name: "test".into(),
            path: path.into(),
            arguments: String::new(),
            working_dir: String::new(),
            run_as_admin: false,
            icon_path: String::new(),
            position: 1,
            is_favorite: false,
        }
    }

    #[test]
    fn test_arguments_split_on_whitespace() {
        let mut b = button("/bin/tool");
        b.arguments = "-a  --long value".into();
        let request = LaunchRequest::from_button(&b);
        assert_eq!(request.arguments, vec!["-a", "--long", "value"]);
    }

    #[test]
    fn test_working_dir_defaults_to_parent() {
        let b = button("/opt/app/bin/tool");
        let request = LaunchRequest::from_button(&b);
        assert_eq!(
            request.effective_working_dir(),
            Some(PathBuf::from("/opt/app/bin"))
        );
    }

    #[test]
    fn test_explicit_working_dir_wins() {
        let mut b = button("/opt/app/bin/tool");
        b.working_dir = "/var/data".into();
        let request = LaunchRequest::from_button(&b);
        assert_eq!(
            request.effective_working_dir(),
            Some(PathBuf::from("/var/data"))
        );
    }

    #[test]
    fn test_missing_target_is_reported() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("gone.exe");
        let request = LaunchRequest::from_button(&button(gone.to_str().unwrap()));
        let err = launch(&request).unwrap_err();
        assert!(matches!(err, LaunchgridError::FileNotFound(_)));
        assert!(err.is_user_facing());
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_spawns_detached() {
        let request = LaunchRequest {
            path: PathBuf::from("/bin/true"),
            arguments: Vec::new(),
            working_dir: None,
            run_as_admin: false,
        };
        launch(&request).unwrap();
    }
}
