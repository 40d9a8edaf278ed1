//! Compilation driver
//!
//! A [`Session`] compiles one program tree into a [`Compilation`]: the
//! program unit followed by every inline task unit the program spawns, in
//! the order they finished compiling. Each unit is compiled with its own
//! [`CompileContext`].

use crate::bytecode::{Unit, UnitKind};
use crate::compiler::context::CompileContext;
use crate::compiler::stmt::StmtCompiler;
use crate::config::CompilerConfig;
use crate::error::{CodegenError, CodegenResult};
use crate::linker::{ArtifactStore, FsUnitResolver, ResolvedUnit, SearchPath, UnitResolver};
use indexmap::IndexMap;
use std::path::PathBuf;
use strand_syntax::Node;
use tracing::{debug, info};

pub struct Session {
    config: CompilerConfig,
    resolver: Box<dyn UnitResolver>,
    /// Finished task units of the current compilation.
    units: IndexMap<String, Unit>,
    /// Units whose bodies are being compiled, outermost first.
    in_progress: Vec<(String, UnitKind)>,
}

impl Session {
    /// Session resolving pre-compiled task units from the filesystem.
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_resolver(config, FsUnitResolver)
    }

    pub fn with_resolver(config: CompilerConfig, resolver: impl UnitResolver + 'static) -> Self {
        Self {
            config,
            resolver: Box::new(resolver),
            units: IndexMap::new(),
            in_progress: Vec::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `tree` as the program unit named by the configuration.
    pub fn compile_program(&mut self, tree: &Node) -> CodegenResult<Compilation> {
        let name = self.config.program_name.clone();
        self.compile_program_named(&name, tree)
    }

    pub fn compile_program_named(&mut self, name: &str, tree: &Node) -> CodegenResult<Compilation> {
        self.units.clear();
        self.in_progress.clear();

        let result = self.compile_unit(name, UnitKind::Program, tree);
        let tasks = std::mem::take(&mut self.units);
        self.in_progress.clear();
        let program = result?;

        info!(program = name, tasks = tasks.len(), "compiled program");
        Ok(Compilation { program, tasks })
    }

    /// Compile `body` into a new task unit called `name`.
    pub(crate) fn compile_inline_task(&mut self, name: &str, body: &Node) -> CodegenResult<()> {
        if self.units.contains_key(name) || self.in_progress.iter().any(|(n, _)| n == name) {
            return Err(CodegenError::structural(
                body,
                format!("unit name '{name}' is already used in this compilation"),
            ));
        }

        let unit = self.compile_unit(name, UnitKind::Task, body)?;
        self.units.insert(name.to_string(), unit);
        Ok(())
    }

    /// Capabilities of the task unit `name`.
    ///
    /// Units of the running compilation are found first; anything else goes
    /// through the resolver and the configured search path.
    pub(crate) fn resolve_task(&self, name: &str, at: &Node) -> CodegenResult<ResolvedUnit> {
        validate_unit_name(name, at)?;
        if let Some(unit) = self.units.get(name) {
            return Ok(ResolvedUnit::from(unit));
        }
        if let Some((_, kind)) = self.in_progress.iter().find(|(n, _)| n == name) {
            let task = *kind == UnitKind::Task;
            return Ok(ResolvedUnit {
                name: name.to_string(),
                has_default_constructor: task,
                runnable: task,
            });
        }

        let list = self.config.task_search_path.as_deref().ok_or_else(|| {
            CodegenError::MalformedSearchPath(format!(
                "no task search path configured to resolve '{name}'"
            ))
        })?;
        let search_path = SearchPath::parse(list)?;
        let resolved = self.resolver.resolve(name, &search_path)?;
        if resolved.name != name {
            return Err(CodegenError::InvalidTaskUnit {
                name: name.to_string(),
                reason: format!("file holds unit '{}'", resolved.name),
            });
        }
        Ok(resolved)
    }

    fn compile_unit(&mut self, name: &str, kind: UnitKind, body: &Node) -> CodegenResult<Unit> {
        validate_unit_name(name, body)?;
        debug!(unit = name, %kind, "compiling unit");

        self.in_progress.push((name.to_string(), kind));
        let result = self.compile_body(name, kind, body);
        self.in_progress.pop();

        let unit = result?;
        debug!(
            unit = name,
            instructions = unit.len(),
            max_stack = unit.max_stack,
            max_locals = unit.max_locals,
            "compiled unit"
        );
        Ok(unit)
    }

    fn compile_body(&mut self, name: &str, kind: UnitKind, body: &Node) -> CodegenResult<Unit> {
        let mut cx = CompileContext::new(self, name);
        cx.symbols.enter_scope();
        StmtCompiler::compile(&mut cx, body)?;
        cx.symbols.exit_scope()?;

        if !cx.types.is_empty() {
            return Err(CodegenError::structural(
                body,
                format!(
                    "{} value(s) left on the stack at the end of unit '{name}'",
                    cx.types.depth()
                ),
            ));
        }
        cx.code.emit_return();

        let unit = cx.finish(kind);
        unit.check_labels()?;
        Ok(unit)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

fn validate_unit_name(name: &str, at: &Node) -> CodegenResult<()> {
    if name.is_empty() {
        return Err(CodegenError::structural(at, "empty unit name"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(CodegenError::structural(
            at,
            format!("unit name '{name}' is not a plain file name"),
        ));
    }
    Ok(())
}

/// Units produced by one successful compilation, program first.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    program: Unit,
    tasks: IndexMap<String, Unit>,
}

impl Compilation {
    pub fn program(&self) -> &Unit {
        &self.program
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Unit> {
        self.tasks.values()
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        std::iter::once(&self.program).chain(self.tasks.values())
    }

    pub fn get(&self, name: &str) -> Option<&Unit> {
        if self.program.name == name {
            Some(&self.program)
        } else {
            self.tasks.get(name)
        }
    }

    /// Number of units, program included.
    pub fn unit_count(&self) -> usize {
        self.tasks.len() + 1
    }

    /// Write every unit to `store`, returning the paths written.
    pub fn persist(&self, store: &ArtifactStore) -> CodegenResult<Vec<PathBuf>> {
        let paths = store.write_all(self.units())?;
        info!(dir = %store.dir().display(), units = paths.len(), "persisted units");
        Ok(paths)
    }
}
