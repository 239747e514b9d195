use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::World;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Flush the game state to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 4 files:
/// - `players.jsonl` — one Player per line, including land holding and alliance
/// - `alliances.jsonl` — one Alliance per line
/// - `votes.jsonl` — the current vote of every voter
/// - `jobs.jsonl` — queued jobs with their completion times
///
/// No leader is written; it is derived from the votes.
pub fn flush_to_jsonl(world: &World, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(&output_dir.join("players.jsonl"), world.players.values())?;
    write_jsonl(&output_dir.join("alliances.jsonl"), world.alliances.values())?;
    write_jsonl(&output_dir.join("votes.jsonl"), world.votes.values())?;
    write_jsonl(&output_dir.join("jobs.jsonl"), world.jobs.values())?;

    tracing::info!(
        dir = %output_dir.display(),
        players = world.players.len(),
        votes = world.votes.len(),
        "flushed world to jsonl"
    );
    Ok(())
}
