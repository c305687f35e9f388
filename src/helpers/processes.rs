use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use sysinfo::System;

use crate::helpers::replace::REPLACE_OLD_FLAG;

/// Checks whether another process with the given executable stem is running.
///
/// The updater itself is excluded by pid, so a lone `alpha-updater update`
/// invocation does not trip its own guard.
pub fn is_other_instance_running(exe_stem: &str) -> bool {
    let needle = exe_stem.to_lowercase();
    let own_pid = std::process::id();

    System::new_all().processes().iter().any(|(pid, process)| {
        pid.as_u32() != own_pid
            && process
                .name()
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle)
    })
}

/// Launches the freshly downloaded binary, telling it which executable it
/// replaces, and leaves it running detached from this process.
pub fn spawn_replacement(new_exe: &Path, old_exe: &Path) -> Result<()> {
    Command::new(new_exe)
        .arg(REPLACE_OLD_FLAG)
        .arg(old_exe)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context(format!(
            "Could not launch the new executable {}",
            new_exe.display()
        ))?;

    Ok(())
}
