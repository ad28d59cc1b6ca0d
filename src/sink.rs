//! CSV persistence for cleaned tables.

use crate::coinafrique::models::{ItemRow, ItemTable};
use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes a table as CSV with the `nom,prix,adresse,image_lien` header.
pub fn write_csv<W: Write>(table: &ItemTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    // serialize() only emits a header with the first row.
    if table.is_empty() {
        wtr.write_record(ItemTable::COLUMNS)?;
    }
    for row in table.iter() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a table written by [`write_csv`]. Empty fields read back as missing.
pub fn read_csv<R: Read>(reader: R) -> Result<ItemTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize::<ItemRow>().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ItemTable::new(rows))
}

/// Saves a table to `{dir}/{stem}.csv`, creating `dir` if needed.
///
/// An empty table is rejected and nothing is written.
pub fn save_table(table: &ItemTable, dir: &Path, stem: &str) -> Result<PathBuf> {
    if table.is_empty() {
        return Err(Error::EmptyResult);
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", stem));
    debug!("Writing {} rows to {}", table.len(), path.display());

    let file = std::fs::File::create(&path)?;
    write_csv(table, file)?;

    info!("Saved {} rows to {}", table.len(), path.display());
    Ok(path)
}

/// Loads a table saved by [`save_table`].
pub fn load_table(path: &Path) -> Result<ItemTable> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Lists saved CSV files in `dir`, sorted by name. A missing directory yields none.
pub fn list_saved(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    Ok(files)
}
