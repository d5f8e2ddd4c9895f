use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::warn;

/// How the target file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Truncate,
    Append,
}

/// Write `content` to `base_directory/[extra_dir_name/]file_name`, creating
/// directories as needed. Never fails: I/O errors are logged as warnings so a
/// collection run keeps going.
pub fn write_to_file(
    file_name: &str,
    content: &str,
    base_directory: &Path,
    extra_dir_name: Option<&str>,
    mode: WriteMode,
) {
    let target = match extra_dir_name {
        Some(extra) => base_directory.join(extra).join(file_name),
        None => base_directory.join(file_name),
    };
    if let Err(err) = try_write(&target, content, base_directory, extra_dir_name, mode) {
        warn!("Failed to write to file: {} {}", target.display(), err);
    }
}

fn try_write(
    target: &Path,
    content: &str,
    base_directory: &Path,
    extra_dir_name: Option<&str>,
    mode: WriteMode,
) -> anyhow::Result<()> {
    fs::create_dir_all(base_directory)?;
    if let Some(extra) = extra_dir_name {
        fs::create_dir_all(base_directory.join(extra))?;
    }

    let mut opts = OpenOptions::new();
    match mode {
        WriteMode::Truncate => opts.write(true).create(true).truncate(true),
        WriteMode::Append => opts.create(true).append(true),
    };
    let mut fd = opts.open(target)?;
    fd.write_all(content.as_bytes())?;
    Ok(())
}
