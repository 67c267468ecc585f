//! Child process execution.

use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::Result;

/// Arguments longer than this are shortened in command descriptions.
const DESCRIBE_MAX_ARG: usize = 45;

/// Result of running a child process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Replacement `PATH` for the child.
    pub path: Option<OsString>,

    /// Bytes fed to the child's stdin. Stdin is closed when absent.
    pub stdin: Option<Vec<u8>>,
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The line text regardless of stream.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(line) | Self::Stderr(line) => line,
        }
    }
}

/// Run `program` with `args`, streaming each output line to `on_line`.
///
/// Both streams are always captured. A non-zero exit is reported in the
/// result, not as an error; only a failure to spawn is an error.
pub fn execute(
    program: &str,
    args: &[String],
    options: &CommandOptions,
    on_line: &mut dyn FnMut(OutputLine),
) -> Result<CommandResult> {
    let start = Instant::now();
    let desc = describe(program, args);
    debug!(command = %desc, cwd = ?options.cwd, "running");

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    if let Some(path) = &options.path {
        cmd.env("PATH", path);
    }

    cmd.stdin(if options.stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to run {}", desc))?;

    let writer = match (child.stdin.take(), options.stdin.clone()) {
        (Some(mut pipe), Some(input)) => Some(thread::spawn(move || {
            // The child may exit without reading everything.
            let _ = pipe.write_all(&input);
        })),
        _ => None,
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout of {} was not captured", desc))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr of {} was not captured", desc))?;

    let (tx, rx) = mpsc::channel();
    let tx_stderr = tx.clone();

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    for line in rx {
        on_line(line);
    }

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    if let Some(writer) = writer {
        let _ = writer.join();
    }

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {}", desc))?;

    Ok(CommandResult {
        exit_code: status.code(),
        stdout,
        stderr,
        duration: start.elapsed(),
        success: status.success(),
    })
}

/// Run a command and collect its output without streaming.
pub fn execute_quiet(
    program: &str,
    args: &[String],
    options: &CommandOptions,
) -> Result<CommandResult> {
    execute(program, args, options, &mut |_| {})
}

/// Human-readable command line, with overly long arguments shortened.
pub fn describe(program: &str, args: &[String]) -> String {
    let parts: Vec<String> = std::iter::once(program.to_string())
        .chain(args.iter().map(|arg| shorten(arg)))
        .collect();
    shell_words::join(parts)
}

fn shorten(arg: &str) -> String {
    let chars: Vec<char> = arg.chars().collect();
    if chars.len() > DESCRIBE_MAX_ARG {
        let head: String = chars[..20].iter().collect();
        let tail: String = chars[chars.len() - 20..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        arg.to_string()
    }
}

/// Decode process output into a single line.
pub fn clear_output(output: &[u8]) -> String {
    String::from_utf8_lossy(output).replace('\n', "")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn execute_successful_command() {
        let result = execute_quiet("sh", &args(&["-c", "echo hello"]), &Default::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute_quiet("sh", &args(&["-c", "exit 3"]), &Default::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_missing_program_is_error() {
        let result = execute_quiet("definitely-not-a-program-xyz", &[], &Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn execute_with_env_and_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        options
            .env
            .insert("MY_VAR".to_string(), "my_value".to_string());

        let result = execute_quiet("sh", &args(&["-c", "echo $MY_VAR; pwd"]), &options).unwrap();

        assert!(result.stdout.contains("my_value"));
        let name = temp.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(result.stdout.contains(&name));
    }

    #[test]
    fn execute_feeds_stdin() {
        let options = CommandOptions {
            stdin: Some(b"echo from-stdin\n".to_vec()),
            ..Default::default()
        };

        let result = execute_quiet("sh", &[], &options).unwrap();
        assert_eq!(result.stdout.trim(), "from-stdin");
    }

    #[test]
    fn execute_streams_both_streams() {
        let mut lines = Vec::new();
        let result = execute(
            "sh",
            &args(&["-c", "echo out; echo err >&2"]),
            &Default::default(),
            &mut |line| lines.push(line),
        )
        .unwrap();

        assert!(result.success);
        assert!(lines.contains(&OutputLine::Stdout("out".into())));
        assert!(lines.contains(&OutputLine::Stderr("err".into())));
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn execute_replaces_path() {
        let options = CommandOptions {
            path: Some("/custom/bin".into()),
            ..Default::default()
        };
        let result = execute_quiet("/bin/sh", &args(&["-c", "echo $PATH"]), &options).unwrap();
        assert_eq!(result.stdout.trim(), "/custom/bin");
    }

    #[test]
    fn describe_quotes_and_shortens() {
        assert_eq!(
            describe("./configure", &args(&["--prefix=/tmp/my env"])),
            "./configure '--prefix=/tmp/my env'"
        );

        let long = "x".repeat(60);
        let desc = describe("make", &[long]);
        assert!(desc.contains("..."));
        assert!(desc.len() < 60);
    }

    #[test]
    fn clear_output_joins_lines() {
        assert_eq!(clear_output(b"some \ntext"), "some text");
    }
}
