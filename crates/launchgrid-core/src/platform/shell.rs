//! Shell integration: default-handler opens, elevation, tool discovery.

use crate::error::{LaunchgridError, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Check whether an external tool is available on PATH.
pub fn command_exists(name: &str) -> bool {
    #[cfg(target_os = "windows")]
    let probe = Command::new("where").arg(name).output();
    #[cfg(not(target_os = "windows"))]
    let probe = Command::new("which").arg(name).output();

    matches!(probe, Ok(out) if out.status.success())
}

/// Spawn a command without waiting for it, reaping it on a background thread
/// so exited children never linger as zombies. Returns the child's pid.
pub fn spawn_detached(mut cmd: Command, target: &str) -> Result<u32> {
    let mut child = cmd.spawn().map_err(|e| LaunchgridError::LaunchFailed {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    let pid = child.id();
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(pid)
}

/// Open a path with the desktop's default handler (Explorer, xdg-open,
/// Finder). Used for directory shortcuts.
pub fn open_with_default(path: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    let mut cmd = Command::new("explorer");
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(path);
    spawn_detached(cmd, &path.display().to_string())?;
    debug!("Opened {:?} with default handler", path);
    Ok(())
}

/// Build a command that runs `program args` with elevated privileges in the
/// given working directory.
///
/// Windows goes through PowerShell's `Start-Process -Verb RunAs` (the UAC
/// prompt); Unix uses `pkexec` when present.
pub fn elevated_command(
    program: &Path,
    args: &[String],
    working_dir: Option<&Path>,
) -> Result<Command> {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("powershell");
        cmd.arg("-NoProfile").arg("-Command");
        cmd.arg(start_process_script(program, args, working_dir));
        Ok(cmd)
    }

    #[cfg(not(target_os = "windows"))]
    {
        if !command_exists("pkexec") {
            return Err(LaunchgridError::LaunchFailed {
                target: program.display().to_string(),
                message: "Elevation requested but pkexec is not available".to_string(),
            });
        }
        let mut cmd = Command::new("pkexec");
        cmd.arg(program);
        cmd.args(args);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }
}

/// The `Start-Process` invocation for an elevated Windows launch. The working
/// directory must ride inside the script; `current_dir` on the wrapper would
/// only move powershell itself, not the elevated child.
#[cfg(any(target_os = "windows", test))]
fn start_process_script(program: &Path, args: &[String], working_dir: Option<&Path>) -> String {
    let mut script = format!(
        "Start-Process -FilePath {} -Verb RunAs",
        ps_quote(&program.display().to_string())
    );
    if let Some(dir) = working_dir {
        script.push_str(&format!(
            " -WorkingDirectory {}",
            ps_quote(&dir.display().to_string())
        ));
    }
    if !args.is_empty() {
        let list = args
            .iter()
            .map(|a| ps_quote(a))
            .collect::<Vec<_>>()
            .join(",");
        script.push_str(&format!(" -ArgumentList {}", list));
    }
    script
}

/// PowerShell single-quoted literal; embedded quotes double.
#[cfg(any(target_os = "windows", test))]
fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists_for_known_tools() {
        // A shell is present on every supported platform.
        #[cfg(not(target_os = "windows"))]
        assert!(command_exists("sh"));
        #[cfg(target_os = "windows")]
        assert!(command_exists("cmd"));

        assert!(!command_exists("definitely-not-a-real-tool-xyz"));
    }

    #[test]
    fn test_start_process_script_carries_working_directory() {
        let script = start_process_script(
            Path::new(r"C:\Tools\app.exe"),
            &["--flag".to_string(), "it's".to_string()],
            Some(Path::new(r"C:\Data dir")),
        );
        assert!(script.starts_with(r"Start-Process -FilePath 'C:\Tools\app.exe' -Verb RunAs"));
        assert!(script.contains(r"-WorkingDirectory 'C:\Data dir'"));
        assert!(script.contains("-ArgumentList '--flag','it''s'"));
    }

    #[test]
    fn test_start_process_script_without_extras() {
        let script = start_process_script(Path::new(r"C:\app.exe"), &[], None);
        assert!(!script.contains("-WorkingDirectory"));
        assert!(!script.contains("-ArgumentList"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_spawn_detached_reaps_exited_child() {
        let pid = spawn_detached(Command::new("/bin/true"), "/bin/true").unwrap();

        // A zombie would keep its /proc entry around in state Z for the life
        // of this process; the reaper thread must collect it promptly.
        let stat_path = format!("/proc/{}/stat", pid);
        for _ in 0..100 {
            if std::fs::read_to_string(&stat_path).is_err() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("child {} was never reaped", pid);
    }
}
