use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// The fragment parser rejected the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fragment parse error at {line}:{col}: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub col: usize,
}

/// Wrong number of root, style or script nodes at the top level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("more than one <style> tag not allowed")]
    MultipleStyles,
    #[error("more than one <script type={0:?}> tag not allowed")]
    MultipleScripts(String),
    #[error("<script> tag without type={0:?} not allowed")]
    UntypedScript(String),
    #[error("found more than one root element, not allowed")]
    MultipleRoots,
    #[error("no root element")]
    NoRoot,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to parse DOM event handler expression {expr:?}: {reason}")]
pub struct DirectiveParseError {
    pub expr: String,
    pub reason: String,
}

impl DirectiveParseError {
    pub(crate) fn new(expr: &str, reason: impl Into<String>) -> Self {
        Self {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("failed to pass the program to {program}: {source}")]
    Input { program: String, source: io::Error },
    #[error("{program} exited with {status}; full output: {output}")]
    Failed {
        program: String,
        status: String,
        output: String,
    },
    #[error("{program} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("generated code is not valid Rust: {0}")]
    Syntax(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("found <{tag}> tag with bad contents: {found}")]
    Content { tag: String, found: String },
    #[error(transparent)]
    Directive(#[from] DirectiveParseError),
    /// The unformatted program was still written to `path`.
    #[error("formatting {path} failed: {source}")]
    Format { path: PathBuf, source: FormatError },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}
