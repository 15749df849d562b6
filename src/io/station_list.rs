use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::error::IoError;

/// Station groups with a published station list.
pub const KNOWN_GROUPS: [&str; 4] = ["DIDON", "V_NICE", "V_MARS", "V_MART"];

pub fn is_known_group(group: &str) -> bool {
    KNOWN_GROUPS.contains(&group)
}

/// `{dir}/stations_{GROUP}.csv`
pub fn station_list_path(dir: &Path, group: &str) -> Result<PathBuf, IoError> {
    if !is_known_group(group) {
        return Err(IoError::UnknownGroup(group.to_string()));
    }
    Ok(dir.join(format!("stations_{group}.csv")))
}

/// Reads the `id` column of a station list, keeping file order and dropping blanks.
pub fn parse_station_list<R: std::io::Read>(reader: R, path: &Path) -> Result<Vec<String>, IoError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: StringRecord = rdr.headers()?.clone();
    let id_idx = headers
        .iter()
        .position(|h| h.trim() == "id")
        .ok_or_else(|| IoError::MissingColumn {
            path: path.to_path_buf(),
            column: "id",
        })?;

    let mut sites = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let site = record.get(id_idx).unwrap_or("").trim();
        if !site.is_empty() {
            sites.push(site.to_string());
        }
    }
    Ok(sites)
}

#[instrument(skip(dir), fields(dir = %dir.display()))]
pub fn read_station_list(dir: &Path, group: &str) -> Result<Vec<String>, IoError> {
    let path = station_list_path(dir, group)?;
    let file = File::open(&path)?;
    let sites = parse_station_list(file, &path)?;
    debug!("Loaded {} stations", sites.len());
    Ok(sites)
}
