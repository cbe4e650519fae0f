use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::host::MemoryHost;
use crate::shuffle::ChangeLog;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush the results of a shuffle to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 2 files:
/// - `patched_records.jsonl`: the patch version of every touched record, by id
/// - `changes.jsonl`: one before/after entry per record, by id
pub fn flush_to_jsonl(host: &MemoryHost, log: &ChangeLog, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(
        &output_dir.join("patched_records.jsonl"),
        host.patched_records(),
    )?;
    write_jsonl(
        &output_dir.join("changes.jsonl"),
        log.sorted_entries().into_iter(),
    )?;

    Ok(())
}
