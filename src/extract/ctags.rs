//! Tag extraction by running ctags.

use std::path::Path;
use std::process::{Command, Stdio};

use super::{ExtractError, ExtractResult, TagExtractor, TagOutput};

/// Default ctags binary looked up on `PATH`.
pub const DEFAULT_CTAGS: &str = "ctags";

/// Runs `ctags -f - --excmd=number <file>` and captures its output.
///
/// Tags are written to stdout instead of a `<file>.tags` side file, and
/// `--excmd=number` makes every address a line number.
#[derive(Debug, Clone)]
pub struct CtagsExtractor {
    program: String,
    log_stderr: bool,
}

impl CtagsExtractor {
    /// Create an extractor for the given ctags binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            log_stderr: false,
        }
    }

    /// Forward whatever ctags prints on stderr to the debug log.
    pub fn with_stderr_logging(mut self, enabled: bool) -> Self {
        self.log_stderr = enabled;
        self
    }

    /// The binary this extractor runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-f", "-", "--excmd=number"])
            .arg(path)
            .stdin(Stdio::null());
        cmd
    }
}

impl Default for CtagsExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CTAGS)
    }
}

impl TagExtractor for CtagsExtractor {
    fn extract_symbols(&self, path: &Path) -> ExtractResult<TagOutput> {
        tracing::debug!(
            "Command: {} -f - --excmd=number {}",
            self.program,
            path.display()
        );

        let output = self
            .command(path)
            .output()
            .map_err(|source| ExtractError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if self.log_stderr {
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                tracing::debug!("{}: {}", self.program, line);
            }
        }

        if !output.status.success() {
            tracing::warn!(
                "{} exited with {} for {}; using partial output",
                self.program,
                output.status,
                path.display()
            );
        }

        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();

        Ok(TagOutput {
            lines,
            exit_code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        assert_eq!(CtagsExtractor::default().program(), "ctags");
    }

    #[test]
    fn test_command_arguments() {
        let extractor = CtagsExtractor::new("/opt/ctags/bin/ctags");
        let cmd = extractor.command(Path::new("inc/list.h"));

        assert_eq!(cmd.get_program(), "/opt/ctags/bin/ctags");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["-f", "-", "--excmd=number", "inc/list.h"]);
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let extractor = CtagsExtractor::new("headerprobe-no-such-ctags-binary");
        let err = extractor.extract_symbols(Path::new("list.h")).unwrap_err();
        assert!(matches!(err, ExtractError::Spawn { .. }));
    }
}
