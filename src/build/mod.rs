//! Building node from a source tarball.
//!
//! `./configure`, `make` and `make install` run as three separate processes
//! in the unpacked source tree. The first failure aborts the build.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

use crate::error::{NodeenvError, Result};
use crate::shell::{clear_output, describe, execute, execute_quiet, CommandOptions};
use crate::ui::UserInterface;
use crate::version::Version;

/// Releases older than this need a Python 2 toolchain to build.
const PYTHON3_BUILD_SINCE: (u64, u64, u64) = (12, 0, 0);

/// Options passed through to the native build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Configure with `--without-ssl`.
    pub without_ssl: bool,
    /// Configure with `--debug`.
    pub debug: bool,
    /// Configure with `--profile`.
    pub profile: bool,
    /// Parallel make jobs.
    pub jobs: u32,
    /// Value for make's `--load-average`.
    pub load_average: Option<String>,
    /// Make program.
    pub make: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            without_ssl: false,
            debug: false,
            profile: false,
            jobs: 2,
            load_average: None,
            make: "make".to_string(),
        }
    }
}

impl BuildOptions {
    /// Arguments for `./configure`.
    pub fn configure_args(&self, prefix: &Path) -> Vec<String> {
        let mut args = vec![format!("--prefix={}", prefix.display())];
        if self.without_ssl {
            args.push("--without-ssl".to_string());
        }
        if self.debug {
            args.push("--debug".to_string());
        }
        if self.profile {
            args.push("--profile".to_string());
        }
        args
    }

    /// Arguments for the compile step of make.
    pub fn make_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(load) = &self.load_average {
            args.push(format!("--load-average={}", load));
        }
        args.push(format!("--jobs={}", self.jobs));
        args
    }
}

/// Configure, compile and install the tree at `src_dir` into `prefix`.
pub fn configure_and_build(
    src_dir: &Path,
    prefix: &Path,
    version: &Version,
    opts: &BuildOptions,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    // Held until the build finishes; dropping it removes the shim.
    let shim = if predates_python3_builds(version) && needs_python2_shim(version, host_python_major()) {
        Some(python2_shim()?)
    } else {
        None
    };

    let path = match &shim {
        Some(dir) => Some(prepend_path(dir.path())?),
        None => None,
    };
    let options = CommandOptions {
        cwd: Some(src_dir.to_path_buf()),
        path,
        ..Default::default()
    };

    ui.info_continued(&format!(" * Installing node from source ({}) ... ", version));
    run_step("configure", "./configure", &opts.configure_args(prefix), &options, ui)?;
    ui.info_continued(".");
    run_step("make", &opts.make, &opts.make_args(), &options, ui)?;
    ui.info_continued(".");
    run_step("make install", &opts.make, &["install".to_string()], &options, ui)?;
    ui.info("done.");

    Ok(())
}

fn run_step(
    step: &str,
    program: &str,
    args: &[String],
    options: &CommandOptions,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let verbose = ui.shows_command_output();
    let result = execute(program, args, options, &mut |line| {
        if verbose {
            ui.command_output(&format!("{}\n", line.text()));
        }
    })
    .map_err(|err| NodeenvError::BuildStep {
        step: step.to_string(),
        code: None,
        message: err.to_string(),
    })?;

    if !result.success {
        return Err(NodeenvError::BuildStep {
            step: step.to_string(),
            code: result.exit_code,
            message: match result.exit_code {
                Some(code) => format!("{} exited with code {}", describe(program, args), code),
                None => format!("{} was killed by a signal", describe(program, args)),
            },
        });
    }
    Ok(())
}

/// Whether building `version` needs `python` to resolve to Python 2.
pub fn needs_python2_shim(version: &Version, host_python_major: Option<u64>) -> bool {
    predates_python3_builds(version) && host_python_major != Some(2)
}

fn predates_python3_builds(version: &Version) -> bool {
    let (major, minor, patch) = PYTHON3_BUILD_SINCE;
    *version < Version::new(major, minor, patch)
}

/// Major version of the `python` on PATH, if there is one.
fn host_python_major() -> Option<u64> {
    let result = execute_quiet("python", &["--version".to_string()], &Default::default()).ok()?;
    // Python 2 reports its version on stderr.
    let text = clear_output(format!("{}{}", result.stdout, result.stderr).as_bytes());
    parse_python_major(&text)
}

fn parse_python_major(text: &str) -> Option<u64> {
    text.trim()
        .strip_prefix("Python ")?
        .split('.')
        .next()?
        .parse()
        .ok()
}

/// A temporary directory whose `python` points at `python2`.
fn python2_shim() -> Result<TempDir> {
    let python2 = which::which("python2").map_err(|_| NodeenvError::BuildStep {
        step: "python2 shim".to_string(),
        code: None,
        message: "this node version needs python2, which is not on PATH".to_string(),
    })?;

    let dir = tempfile::Builder::new().prefix("nodeenv-python").tempdir()?;
    link_python(&python2, &dir.path().join("python"))?;
    debug!(shim = %dir.path().display(), python2 = %python2.display(), "created python2 shim");
    Ok(dir)
}

#[cfg(unix)]
fn link_python(python2: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(python2, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn link_python(python2: &Path, link: &Path) -> Result<()> {
    std::fs::copy(python2, link.with_extension("exe"))?;
    Ok(())
}

fn prepend_path(dir: &Path) -> Result<OsString> {
    let current = std::env::var_os("PATH").unwrap_or_default();
    let dirs: Vec<PathBuf> = std::iter::once(dir.to_path_buf())
        .chain(std::env::split_paths(&current))
        .collect();
    std::env::join_paths(dirs).map_err(|e| anyhow::anyhow!("invalid PATH: {}", e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn configure_args_follow_flags() {
        let opts = BuildOptions {
            without_ssl: true,
            profile: true,
            ..Default::default()
        };
        assert_eq!(
            opts.configure_args(Path::new("/tmp/my env")),
            ["--prefix=/tmp/my env", "--without-ssl", "--profile"]
        );
    }

    #[test]
    fn make_args_include_jobs_and_load() {
        let opts = BuildOptions {
            jobs: 4,
            load_average: Some("2.5".into()),
            ..Default::default()
        };
        assert_eq!(opts.make_args(), ["--load-average=2.5", "--jobs=4"]);
        assert_eq!(BuildOptions::default().make_args(), ["--jobs=2"]);
    }

    #[test]
    fn python2_shim_only_for_old_releases() {
        assert!(needs_python2_shim(&v("10.24.1"), Some(3)));
        assert!(needs_python2_shim(&v("0.10.48"), None));
        assert!(!needs_python2_shim(&v("10.24.1"), Some(2)));
        assert!(!needs_python2_shim(&v("12.0.0"), Some(3)));
        assert!(!needs_python2_shim(&v("18.0.0"), None));
    }

    #[test]
    fn parses_python_version_banner() {
        assert_eq!(parse_python_major("Python 2.7.18"), Some(2));
        assert_eq!(parse_python_major("Python 3.12.1\n"), Some(3));
        assert_eq!(parse_python_major("command not found"), None);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::ui::MockUI;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn script(path: &Path, body: &str) {
            std::fs::write(path, format!("#!/bin/sh\n{}", body)).unwrap();
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        /// A source tree whose configure and make log their arguments.
        fn fake_tree(temp: &TempDir, make_body: &str) -> (PathBuf, BuildOptions) {
            let src = temp.path().join("node-v18.0.0");
            std::fs::create_dir_all(&src).unwrap();
            script(&src.join("configure"), "echo configure \"$@\" >> build.log\n");

            let make = temp.path().join("fake-make");
            script(&make, make_body);

            let opts = BuildOptions {
                make: make.display().to_string(),
                ..Default::default()
            };
            (src, opts)
        }

        #[test]
        fn runs_configure_make_install_in_order() {
            let temp = TempDir::new().unwrap();
            let (src, opts) = fake_tree(&temp, "echo make \"$@\" >> build.log\n");
            let prefix = temp.path().join("env");
            let mut ui = MockUI::new();

            configure_and_build(&src, &prefix, &v("18.0.0"), &opts, &mut ui).unwrap();

            let log = std::fs::read_to_string(src.join("build.log")).unwrap();
            assert_eq!(
                log,
                format!(
                    "configure --prefix={}\nmake --jobs=2\nmake install\n",
                    prefix.display()
                )
            );
            assert_eq!(
                ui.transcript(),
                " * Installing node from source (18.0.0) ... ..done.\n"
            );
        }

        #[test]
        fn failing_make_aborts_with_exit_code() {
            let temp = TempDir::new().unwrap();
            let (src, opts) = fake_tree(&temp, "echo make \"$@\" >> build.log\nexit 3\n");
            let mut ui = MockUI::new();

            let err = configure_and_build(&src, temp.path(), &v("18.0.0"), &opts, &mut ui)
                .unwrap_err();

            assert!(matches!(
                err,
                NodeenvError::BuildStep { ref step, code: Some(3), .. } if step == "make"
            ));
            assert_eq!(err.exit_code(), 3);

            let log = std::fs::read_to_string(src.join("build.log")).unwrap();
            assert!(!log.contains("make install"));
        }

        #[test]
        fn verbose_mode_streams_build_output() {
            let temp = TempDir::new().unwrap();
            let (src, opts) = fake_tree(&temp, "echo compiling\n");
            let mut ui = MockUI::with_mode(crate::ui::OutputMode::Verbose);

            configure_and_build(&src, temp.path(), &v("18.0.0"), &opts, &mut ui).unwrap();

            assert!(ui.command_outputs().iter().any(|l| l == "compiling\n"));
        }

        #[test]
        fn missing_configure_is_build_step_error() {
            let temp = TempDir::new().unwrap();
            let mut ui = MockUI::new();
            let err = configure_and_build(
                temp.path(),
                temp.path(),
                &v("18.0.0"),
                &BuildOptions::default(),
                &mut ui,
            )
            .unwrap_err();
            assert!(matches!(err, NodeenvError::BuildStep { code: None, .. }));
        }
    }
}
