//! Compiles single-file component templates into Rust source that rebuilds
//! the template as a `weft_dom` tree.
//!
//! ```no_run
//! use weft_sfc::{Compiler, CompilerConfig};
//!
//! let template = std::fs::read_to_string("ui/root.html")?;
//! let out = Compiler::new(CompilerConfig::for_template("ui/root.html".as_ref())).compile(&template)?;
//! println!("wrote {}", out.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod code_writer;
pub mod config;
pub mod directives;
pub mod emit;
pub mod error;
pub mod events;
pub mod format;
pub mod sfc;
pub mod template_ast;
pub mod template_codegen;
pub mod template_parse;


use std::fs;
use std::io::Read;
use std::path::PathBuf;

pub use config::{CompilerConfig, FormatConfig};
pub use emit::{GENERATED_HEADER, emit_program};
pub use error::{CompileError, DirectiveParseError, FormatError, ParseError, StructuralError};
pub use events::EventBinding;
pub use format::{Formatter, Rustfmt, SyntaxCheck};
pub use sfc::{SCRIPT_TYPE, Sfc, split_fragment};
pub use template_ast::{Fragment, NodeId, TemplateAttr, TemplateNode};
pub use template_parse::{FragmentParser, HtmlFragmentParser, parse_fragment};

pub struct Compiler {
    config: CompilerConfig,
    parser: Box<dyn FragmentParser>,
    /// `None` runs rustfmt from the output directory.
    formatter: Option<Box<dyn Formatter>>,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            parser: Box::new(HtmlFragmentParser),
            formatter: None,
        }
    }

    pub fn with_parser(mut self, parser: impl FragmentParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Unformatted program text for `source`. Nothing touches the disk.
    pub fn generate(&self, source: &str) -> Result<String, CompileError> {
        self.config.validate()?;
        let fragment = self.parser.parse_fragment(source)?;
        log::debug!("parsed {} template nodes", fragment.len());
        let sfc = split_fragment(&fragment, &self.config.script_type)?;
        emit::emit_program(&fragment, &sfc, &self.config)
    }

    /// Generates, formats and writes the program, returning the path written.
    ///
    /// Errors before formatting leave the output untouched. If formatting
    /// fails the unformatted text is still written, so it can be inspected,
    /// and [`CompileError::Format`] is returned.
    pub fn compile(&self, source: &str) -> Result<PathBuf, CompileError> {
        let program = self.generate(source)?;
        let out_path = self.config.out_path();

        fs::create_dir_all(&self.config.out_dir).map_err(|source| CompileError::Io {
            path: self.config.out_dir.clone(),
            source,
        })?;

        let formatted = match &self.formatter {
            Some(f) => f.format(&program),
            None => Rustfmt::new(&self.config.format, &self.config.out_dir).format(&program),
        };

        match formatted {
            Ok(text) => {
                fs::write(&out_path, text).map_err(|source| CompileError::Io {
                    path: out_path.clone(),
                    source,
                })?;
                log::info!("wrote {}", out_path.display());
                Ok(out_path)
            }
            Err(source) => {
                if let Err(e) = fs::write(&out_path, &program) {
                    log::warn!("could not write unformatted output to {}: {e}", out_path.display());
                }
                Err(CompileError::Format {
                    path: out_path,
                    source,
                })
            }
        }
    }

    pub fn compile_reader(&self, mut input: impl Read) -> Result<PathBuf, CompileError> {
        let mut source = String::new();
        input.read_to_string(&mut source).map_err(|source| CompileError::Io {
            path: PathBuf::from("<input>"),
            source,
        })?;
        self.compile(&source)
    }
}
