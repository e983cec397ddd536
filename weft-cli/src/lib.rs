use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use weft_sfc::{Compiler, CompilerConfig, SyntaxCheck};

pub mod logging;

pub use logging::{LoggingConfig, init_logging};

/// Overrides for the names and tools derived from the template path.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub out_dir: Option<PathBuf>,
    pub out_file: Option<String>,
    pub component_type: Option<String>,
    pub data_type: Option<String>,
    pub script_type: Option<String>,
    /// Only check that the output parses instead of running rustfmt.
    pub no_rustfmt: bool,
    pub rustfmt: Option<PathBuf>,
    pub edition: Option<String>,
    pub format_timeout: Option<Duration>,
}

impl BuildOptions {
    pub fn compiler_config(&self, input: &Path) -> CompilerConfig {
        let mut config = CompilerConfig::for_template(input);
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if let Some(file) = &self.out_file {
            config.out_file = file.clone();
        }
        if let Some(ty) = &self.component_type {
            config.component_type = ty.clone();
        }
        if let Some(ty) = &self.data_type {
            config.data_type = ty.clone();
        }
        if let Some(ty) = &self.script_type {
            config.script_type = ty.clone();
        }
        if let Some(program) = &self.rustfmt {
            config.format.rustfmt = program.clone();
        }
        if let Some(edition) = &self.edition {
            config.format.edition = edition.clone();
        }
        if let Some(timeout) = self.format_timeout {
            config.format.timeout = timeout;
        }
        config
    }
}

/// Compile a template into a Rust module, returning the written path.
pub fn build_cmd(input: &Path, opts: &BuildOptions) -> Result<PathBuf> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;

    let config = opts.compiler_config(input);
    log::debug!(
        "compiling {} as {} into {}",
        input.display(),
        config.component_type,
        config.out_path().display()
    );

    let mut compiler = Compiler::new(config);
    if opts.no_rustfmt {
        compiler = compiler.with_formatter(SyntaxCheck);
    }

    let out_path = compiler
        .compile(&src)
        .with_context(|| format!("failed to compile {}", input.display()))?;
    Ok(out_path)
}

/// Compile every `.html` template directly inside `dir`, in name order.
pub fn build_dir(dir: &Path, opts: &BuildOptions) -> Result<Vec<PathBuf>> {
    // names derive from each template
    anyhow::ensure!(
        opts.out_file.is_none() && opts.component_type.is_none() && opts.data_type.is_none(),
        "--out-file, --component and --data apply to a single template"
    );

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "html") {
            inputs.push(path);
        }
    }
    inputs.sort();
    if inputs.is_empty() {
        log::warn!("no .html templates found in {}", dir.display());
    }

    inputs.iter().map(|input| build_cmd(input, opts)).collect()
}
