//! Formatting of generated programs.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::FormatConfig;
use crate::error::FormatError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

impl<F: Formatter + ?Sized> Formatter for Box<F> {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        (**self).format(source)
    }
}

/// Pipes the program through rustfmt.
///
/// Input arrives on stdin, so rustfmt never resolves `mod x;` declarations
/// in the embedded code and never touches files other than the output.
#[derive(Debug, Clone)]
pub struct Rustfmt {
    program: PathBuf,
    edition: String,
    timeout: Duration,
    work_dir: PathBuf,
}

impl Rustfmt {
    /// rustfmt runs in `work_dir`, normally the output directory, so it
    /// picks up the project's `rustfmt.toml`.
    pub fn new(config: &FormatConfig, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: config.rustfmt.clone(),
            edition: config.edition.clone(),
            timeout: config.timeout,
            work_dir: work_dir.into(),
        }
    }
}

impl Formatter for Rustfmt {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let program = self.program.display().to_string();
        let spawn_err = |source: io::Error| FormatError::Spawn {
            program: program.clone(),
            source,
        };

        log::debug!("running {} in {}", program, self.work_dir.display());
        let mut child = Command::new(&self.program)
            .arg("--edition")
            .arg(&self.edition)
            .arg("--emit")
            .arg("stdout")
            .current_dir(&self.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // pipes are fed and drained on helper threads while the child runs
        let input = feed(child.stdin.take(), source.to_string());
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_with_timeout(&mut child, self.timeout).map_err(spawn_err)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(FormatError::Timeout {
                    program,
                    timeout: self.timeout,
                });
            }
        };

        let fed = input.and_then(|h| h.join().ok()).unwrap_or(Ok(()));
        let formatted = collect(stdout);
        let diagnostics = collect(stderr);
        if !status.success() {
            return Err(FormatError::Failed {
                program,
                status: status.to_string(),
                output: format!("{formatted}{diagnostics}"),
            });
        }
        fed.map_err(|source| FormatError::Input { program, source })?;
        Ok(formatted)
    }
}

/// Checks that the program parses as a Rust file and returns it unchanged.
/// Useful where rustfmt is not installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxCheck;

impl Formatter for SyntaxCheck {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        syn::parse_file(source).map_err(|e| FormatError::Syntax(e.to_string()))?;
        Ok(source.to_string())
    }
}

fn feed<W: Write + Send + 'static>(pipe: Option<W>, input: String) -> Option<JoinHandle<io::Result<()>>> {
    // the pipe closes when the thread drops it, ending rustfmt's input
    pipe.map(|mut p| thread::spawn(move || p.write_all(input.as_bytes())))
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut p| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = p.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_check_accepts_valid_rust() {
        let src = "fn main() { let x = 1; }\n";
        assert_eq!(SyntaxCheck.format(src).unwrap(), src);
    }

    #[test]
    fn syntax_check_rejects_unbalanced_braces() {
        let err = SyntaxCheck.format("fn main() {").unwrap_err();
        assert!(matches!(err, FormatError::Syntax(_)));
    }

    #[test]
    fn missing_formatter_is_a_spawn_error() {
        let config = FormatConfig {
            rustfmt: PathBuf::from("weft-no-such-formatter"),
            ..FormatConfig::default()
        };
        let err = Rustfmt::new(&config, std::env::temp_dir()).format("fn f() {}").unwrap_err();
        assert!(matches!(err, FormatError::Spawn { .. }));
    }

    #[test]
    fn fed_input_reaches_the_pipe() {
        let handle = feed(Some(Vec::new()), "fn f() {}".to_string()).unwrap();
        assert!(handle.join().unwrap().is_ok());
        assert!(feed(None::<Vec<u8>>, String::new()).is_none());
    }
}
