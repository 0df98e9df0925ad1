//! `conform hooks install`.

use std::fs;
use std::path::Path;

use conform_core::constants::EXIT_PASS;

use super::current_dir;
use crate::error::CliError;
use crate::git;

pub const PRE_COMMIT_HOOK: &str = "#!/bin/sh\n# Installed by conform.\nexec conform validate --staged\n";
pub const PRE_PUSH_HOOK: &str =
    "#!/bin/sh\n# Installed by conform.\nexec conform validate --changed-since '@{push}'\n";

pub fn install(force: bool) -> Result<i32, CliError> {
    let dir = git::hooks_dir(&current_dir()?)?;
    fs::create_dir_all(&dir).map_err(|e| CliError::io(&dir, e))?;
    for (name, script) in [("pre-commit", PRE_COMMIT_HOOK), ("pre-push", PRE_PUSH_HOOK)] {
        write_hook(&dir.join(name), script, force)?;
    }
    Ok(EXIT_PASS)
}

fn write_hook(path: &Path, script: &str, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        println!("exists   {} (use --force to overwrite)", path.display());
        return Ok(());
    }
    fs::write(path, script).map_err(|e| CliError::io(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| CliError::io(path, e))?;
    }
    println!("installed {}", path.display());
    Ok(())
}
