pub mod jsonl;

pub use jsonl::flush_to_jsonl;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::shuffle::ChangeLog;

/// Write the rendered change log to `output_dir/file_name`, creating the
/// directory if needed. Returns the path written.
pub fn write_change_log(
    log: &ChangeLog,
    output_dir: &Path,
    file_name: &str,
) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    let mut text = log.render();
    text.push('\n');
    fs::write(&path, text)?;
    Ok(path)
}
