//! Task unit resolution
//!
//! A `multitask` statement without an inline body names a unit compiled
//! earlier. The resolver finds it on an explicit search path and reports the
//! capabilities a spawn needs.

use crate::bytecode::Unit;
use crate::error::{CodegenError, CodegenResult};
use crate::linker::store::{self, UNIT_EXTENSION};
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordered list of directories searched for unit files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Split a platform path list (`:` on Unix, `;` on Windows).
    pub fn parse(list: &str) -> CodegenResult<Self> {
        if list.trim().is_empty() {
            return Err(CodegenError::MalformedSearchPath(
                "empty search path".to_string(),
            ));
        }

        let dirs: Vec<PathBuf> = std::env::split_paths(list).collect();
        if dirs.iter().any(|dir| dir.as_os_str().is_empty()) {
            return Err(CodegenError::MalformedSearchPath(format!(
                "empty entry in '{list}'"
            )));
        }
        Ok(Self { dirs })
    }

    pub fn from_dirs(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::env::join_paths(&self.dirs) {
            Ok(joined) => write!(f, "{}", joined.to_string_lossy()),
            Err(_) => write!(f, "{:?}", self.dirs),
        }
    }
}

/// What a spawn needs to know about a task unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
    pub name: String,
    pub has_default_constructor: bool,
    pub runnable: bool,
}

impl From<&Unit> for ResolvedUnit {
    fn from(unit: &Unit) -> Self {
        Self {
            name: unit.name.clone(),
            has_default_constructor: unit.has_default_constructor(),
            runnable: unit.is_runnable(),
        }
    }
}

pub trait UnitResolver {
    fn resolve(&self, name: &str, search_path: &SearchPath) -> CodegenResult<ResolvedUnit>;
}

/// Looks for `<dir>/<name>.unit` in each search path directory in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsUnitResolver;

impl UnitResolver for FsUnitResolver {
    fn resolve(&self, name: &str, search_path: &SearchPath) -> CodegenResult<ResolvedUnit> {
        for dir in search_path.dirs() {
            let candidate = dir.join(format!("{name}.{UNIT_EXTENSION}"));
            if !candidate.is_file() {
                continue;
            }
            debug!(unit = name, path = %candidate.display(), "resolved task unit");
            let unit = store::read_unit(&candidate)?;
            return Ok(ResolvedUnit::from(&unit));
        }

        Err(CodegenError::UnitNotFound {
            name: name.to_string(),
            search_path: search_path.to_string(),
        })
    }
}

/// Resolver over units registered per directory, without touching disk.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResolver {
    dirs: IndexMap<PathBuf, IndexMap<String, ResolvedUnit>>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dir: impl AsRef<Path>, unit: ResolvedUnit) {
        self.dirs
            .entry(dir.as_ref().to_path_buf())
            .or_default()
            .insert(unit.name.clone(), unit);
    }

    pub fn with_unit(mut self, dir: impl AsRef<Path>, unit: &Unit) -> Self {
        self.insert(dir, ResolvedUnit::from(unit));
        self
    }
}

impl UnitResolver for InMemoryResolver {
    fn resolve(&self, name: &str, search_path: &SearchPath) -> CodegenResult<ResolvedUnit> {
        search_path
            .dirs()
            .iter()
            .find_map(|dir| self.dirs.get(dir).and_then(|units| units.get(name)))
            .cloned()
            .ok_or_else(|| CodegenError::UnitNotFound {
                name: name.to_string(),
                search_path: search_path.to_string(),
            })
    }
}
