//! Unit files on disk
//!
//! A unit file is the magic `STRU`, a little-endian `u16` format version,
//! then the bincode encoding of the [`Unit`].

use crate::bytecode::Unit;
use crate::error::{CodegenError, CodegenResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const UNIT_EXTENSION: &str = "unit";
pub const LISTING_EXTENSION: &str = "lst";

const MAGIC: &[u8; 4] = b"STRU";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = MAGIC.len() + 2;

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    listings: bool,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            listings: false,
        }
    }

    /// Also write a human-readable listing next to every unit file.
    pub fn with_listings(mut self, listings: bool) -> Self {
        self.listings = listings;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{UNIT_EXTENSION}"))
    }

    /// Write `unit` to `<dir>/<name>.unit`, returning the path written.
    pub fn write(&self, unit: &Unit) -> CodegenResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let staged = self.stage(unit)?;
        self.commit(unit, staged)
    }

    /// Write a set of units together.
    ///
    /// Every unit goes to a temporary file first; nothing is renamed into
    /// place unless all of them were written.
    pub fn write_all<'a>(
        &self,
        units: impl IntoIterator<Item = &'a Unit>,
    ) -> CodegenResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let mut staged = Vec::new();
        for unit in units {
            match self.stage(unit) {
                Ok(temp) => staged.push((unit, temp)),
                Err(e) => {
                    for (_, temp) in &staged {
                        let _ = fs::remove_file(temp);
                    }
                    return Err(e);
                }
            }
        }

        staged
            .into_iter()
            .map(|(unit, temp)| self.commit(unit, temp))
            .collect()
    }

    fn stage(&self, unit: &Unit) -> CodegenResult<PathBuf> {
        let temp_file = self.path_for(&unit.name).with_extension("tmp");
        fs::write(&temp_file, encode(unit)?)?;
        Ok(temp_file)
    }

    fn commit(&self, unit: &Unit, temp_file: PathBuf) -> CodegenResult<PathBuf> {
        let path = self.path_for(&unit.name);
        fs::rename(&temp_file, &path)?;

        if self.listings {
            fs::write(path.with_extension(LISTING_EXTENSION), unit.listing())?;
        }

        debug!(unit = %unit.name, path = %path.display(), "wrote unit");
        Ok(path)
    }

    pub fn read(&self, name: &str) -> CodegenResult<Unit> {
        read_unit(&self.path_for(name))
    }
}

pub fn read_unit(path: &Path) -> CodegenResult<Unit> {
    let data = fs::read(path)?;
    decode(&data).map_err(|e| match e {
        CodegenError::Artifact { reason, .. } => CodegenError::Artifact {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })
}

pub fn encode(unit: &Unit) -> CodegenResult<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + unit.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend(bincode::serde::encode_to_vec(
        unit,
        bincode::config::standard(),
    )?);
    Ok(out)
}

pub fn decode(data: &[u8]) -> CodegenResult<Unit> {
    let invalid = |reason: String| CodegenError::Artifact {
        path: "<memory>".to_string(),
        reason,
    };

    if data.len() < HEADER_LEN || &data[..MAGIC.len()] != MAGIC {
        return Err(invalid("not a unit file".to_string()));
    }
    let version = u16::from_le_bytes([data[4], data[5]]);
    if version != FORMAT_VERSION {
        return Err(invalid(format!(
            "format version {version}, expected {FORMAT_VERSION}"
        )));
    }

    let (unit, _bytes_read) = bincode::serde::decode_from_slice::<Unit, _>(
        &data[HEADER_LEN..],
        bincode::config::standard(),
    )?;
    Ok(unit)
}
