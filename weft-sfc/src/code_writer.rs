/// Append-only program buffer that indents as blocks open and close, so
/// the unformatted output stays readable when the formatter rejects it.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

const INDENT: &str = "    ";

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, s: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        self.buf.push_str(s.as_ref());
        self.buf.push('\n');
    }

    /// Writes `s` (which ends in `{`) and indents what follows.
    pub fn open(&mut self, s: impl AsRef<str>) {
        self.line(s);
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.close_with("}");
    }

    /// Dedents and writes a closing line such as `});`.
    pub fn close_with(&mut self, s: &str) {
        debug_assert!(self.depth > 0, "unbalanced close");
        self.depth = self.depth.saturating_sub(1);
        self.line(s);
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends `s` unindented, e.g. user code spliced from the template.
    pub fn verbatim(&mut self, s: &str) {
        self.buf.push_str(s);
        if !s.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Rust string literal for `s`.
pub fn str_lit(s: &str) -> String {
    quote::quote!(#s).to_string()
}
