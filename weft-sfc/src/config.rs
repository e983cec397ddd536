use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CompileError;
use crate::sfc::SCRIPT_TYPE;

pub const DEFAULT_FORMAT_TIMEOUT: Duration = Duration::from_secs(10);

/// How generated code is handed to rustfmt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// `$RUSTFMT` when set, else `rustfmt` from `PATH`.
    pub rustfmt: PathBuf,
    pub edition: String,
    pub timeout: Duration,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            rustfmt: std::env::var_os("RUSTFMT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("rustfmt")),
            edition: "2021".to_string(),
            timeout: DEFAULT_FORMAT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Type that receives the generated `BuildVdom` impl.
    pub component_type: String,
    /// Type the opaque data handle is downcast to.
    pub data_type: String,
    pub out_dir: PathBuf,
    /// File name inside `out_dir`, with the `.rs` suffix.
    pub out_file: String,
    /// `type` attribute marking the embedded-code `<script>`.
    pub script_type: String,
    pub format: FormatConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            component_type: "Root".to_string(),
            data_type: "RootData".to_string(),
            out_dir: PathBuf::from("."),
            out_file: "root_vdom.rs".to_string(),
            script_type: SCRIPT_TYPE.to_string(),
            format: FormatConfig::default(),
        }
    }
}

impl CompilerConfig {
    /// Names derived from the template's file stem: `todo-list.html`
    /// becomes `TodoList`, `TodoListData` and `todo_list_vdom.rs`, written
    /// next to the template.
    pub fn for_template(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("root");
        let mut component = pascal_case(stem);
        if component.is_empty() {
            component = "Root".to_string();
        }
        let out_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_type: format!("{component}Data"),
            component_type: component,
            out_dir,
            out_file: format!("{}_vdom.rs", snake_case(stem)),
            ..Self::default()
        }
    }

    pub fn with_component_type(mut self, ty: impl Into<String>) -> Self {
        self.component_type = ty.into();
        self
    }

    pub fn with_data_type(mut self, ty: impl Into<String>) -> Self {
        self.data_type = ty.into();
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_out_file(mut self, file: impl Into<String>) -> Self {
        self.out_file = file.into();
        self
    }

    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(&self.out_file)
    }

    pub fn validate(&self) -> Result<(), CompileError> {
        for (what, ty) in [("component", &self.component_type), ("data", &self.data_type)] {
            syn::parse_str::<syn::Type>(ty)
                .map_err(|e| CompileError::Config(format!("{what} type {ty:?}: {e}")))?;
        }
        if !self.out_file.ends_with(".rs") || self.out_file.contains(['/', '\\']) {
            return Err(CompileError::Config(format!(
                "output file {:?} must be a bare file name ending in .rs",
                self.out_file
            )));
        }
        if self.script_type.is_empty() {
            return Err(CompileError::Config("script type must not be empty".to_string()));
        }
        Ok(())
    }
}

fn pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'C');
    }
    out
}

fn snake_case(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
