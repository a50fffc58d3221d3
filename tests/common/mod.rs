// Shared by the CLI test files; not every file uses every helper.
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Config home with no bf.toml in it.
pub fn empty_home() -> PathBuf {
    Path::new(env!("CARGO_TARGET_TMPDIR")).join("bf-empty-home")
}

/// Point `cmd` at `home` for config lookup and drop the tape variables, so
/// the caller's shell and bf.toml cannot change what a test sees.
pub fn isolate(cmd: &mut Command, home: &Path) {
    cmd.env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env_remove("BF_CELLS")
        .env_remove("BF_CELL_WIDTH")
        .env_remove("BF_LOG");
}

/// The `bf` binary running with default tape settings.
pub fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    isolate(&mut cmd, &empty_home());
    cmd
}
