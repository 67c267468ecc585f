//! Environment creation and update.
//!
//! [`Provisioner`] sequences the version catalog, artifact fetcher, source
//! build and activation writer. Steps run strictly in order; the first failure
//! aborts and nothing is rolled back.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::activation::{install_activate, set_predeactivate_hook, ActivationOptions};
use crate::build::configure_and_build;
use crate::error::{NodeenvError, Result};
use crate::fetch::{
    copy_tree, download, install_from_archive, install_npm, install_packages, parse_requirements,
    reuse_or_clear, Transport, NPM_INSTALL_SCRIPT_URL,
};
use crate::platform::{mirror_base_url, resolve_artifact, ArchiveKind, PlatformKey};
use crate::ui::UserInterface;
use crate::version::{
    find_system_node, format_version_list, resolve_version, Version, VersionCatalog,
    VersionRequest,
};

use super::{EnvironmentLayout, EnvironmentMetadata, InstallOptions};

/// Releases older than this ship without npm.
const BUNDLED_NPM_SINCE: (u64, u64, u64) = (0, 6, 3);

/// Progress of one environment creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    Uninitialized,
    DirectoriesCreated,
    RuntimeInstalled,
    ActivationInstalled,
    PackagesInstalled,
    Done,
    SourceCleaned,
}

/// Creates and updates environments.
pub struct Provisioner<'a> {
    transport: &'a dyn Transport,
    platform: PlatformKey,
    catalog: VersionCatalog,
    npm_script_url: String,
    state: ProvisionState,
}

impl<'a> Provisioner<'a> {
    pub fn new(transport: &'a dyn Transport, platform: PlatformKey) -> Self {
        Self {
            transport,
            platform,
            catalog: VersionCatalog::new(),
            npm_script_url: NPM_INSTALL_SCRIPT_URL.to_string(),
            state: ProvisionState::Uninitialized,
        }
    }

    /// Fetch the npm bootstrap script from `url` instead.
    pub fn with_npm_script_url(mut self, url: impl Into<String>) -> Self {
        self.npm_script_url = url.into();
        self
    }

    /// How far the last [`create`](Self::create) got.
    pub fn state(&self) -> ProvisionState {
        self.state
    }

    pub fn platform(&self) -> &PlatformKey {
        &self.platform
    }

    /// Layout of an environment at `root` on this platform.
    pub fn layout(&self, root: &Path) -> EnvironmentLayout {
        EnvironmentLayout::new(root, self.platform.os)
    }

    /// Every version the mirror offers, formatted for display.
    pub fn list_versions(&mut self, mirror: Option<&str>) -> Result<String> {
        let base = mirror_base_url(mirror, &self.platform);
        let entries = self.catalog.fetch_index(self.transport, &base)?;
        Ok(format_version_list(entries))
    }

    /// Resolve a catalog request against the mirror's index.
    pub fn resolve(&mut self, request: &VersionRequest, mirror: Option<&str>) -> Result<Version> {
        let base = mirror_base_url(mirror, &self.platform);
        let entries = self.catalog.fetch_index(self.transport, &base)?;
        resolve_version(request, entries)
    }

    /// Create an environment at `root`.
    pub fn create(
        &mut self,
        root: &Path,
        opts: &InstallOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        self.state = ProvisionState::Uninitialized;
        let layout = self.layout(&std::path::absolute(root)?);

        if layout.root.exists() && !opts.force && !opts.python_virtualenv {
            return Err(NodeenvError::EnvironmentExists {
                path: layout.root.clone(),
            });
        }

        ui.info(&format!(" * Install node ({}) into {}", opts.node, layout.root.display()));
        fs::create_dir_all(&layout.src_dir)?;
        let mut metadata = EnvironmentMetadata::from_options(opts);
        metadata.requirements = match &opts.requirements {
            Some(path) => Some(std::path::absolute(path)?),
            None => None,
        };
        metadata.save(&layout.metadata_file())?;
        self.advance(ProvisionState::DirectoriesCreated);

        let (version, system_node) = if opts.node.is_system() {
            let node = find_system_node(&layout.bin_dir, std::env::var_os("PATH"))?;
            ui.info(&format!(" * Using system node ({})", node.display()));
            for dir in [&layout.bin_dir, &layout.lib_dir, &layout.module_dir] {
                fs::create_dir_all(dir)?;
            }
            (None, Some(node))
        } else {
            let version = self.resolve(&opts.node, opts.mirror.as_deref())?;
            ui.debug(&format!(" * Resolved {} to {}", opts.node, version));
            self.install_runtime(&layout, &version, opts, ui)?;
            metadata.node_version = Some(version.to_string());
            metadata.platform = Some(self.platform.to_string());
            metadata.save(&layout.metadata_file())?;
            (Some(version), None)
        };
        self.advance(ProvisionState::RuntimeInstalled);

        let activation = ActivationOptions {
            prompt: opts.prompt.clone(),
            python_virtualenv: opts.python_virtualenv,
            system_node,
        };
        install_activate(&layout, &activation, ui)?;
        self.advance(ProvisionState::ActivationInstalled);

        let (major, minor, patch) = BUNDLED_NPM_SINCE;
        let lacks_npm = version
            .as_ref()
            .is_some_and(|v| *v < Version::new(major, minor, patch));
        if opts.with_npm || lacks_npm {
            self.bootstrap_npm(&layout, opts, ui)?;
        }

        if let Some(requirements) = &opts.requirements {
            self.install_requirements(&layout, requirements, ui)?;
            self.advance(ProvisionState::PackagesInstalled);
        }

        if opts.python_virtualenv {
            set_predeactivate_hook(&layout.root, ui)?;
        }
        self.advance(ProvisionState::Done);

        if opts.clean_src {
            ui.debug(&format!(" * Removing {}", layout.src_dir.display()));
            fs::remove_dir_all(&layout.src_dir)?;
            self.advance(ProvisionState::SourceCleaned);
        }
        Ok(())
    }

    /// Reinstall the requirements of an existing environment.
    ///
    /// The requirements file comes from `opts` or, failing that, from the
    /// environment's metadata.
    pub fn update(
        &mut self,
        root: &Path,
        opts: &InstallOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let layout = self.layout(root);
        if !layout.bin_dir.is_dir() {
            return Err(NodeenvError::NotAnEnvironment {
                path: layout.root.clone(),
                expected: layout.bin_name().to_string(),
            });
        }

        let requirements = match &opts.requirements {
            Some(path) => path.clone(),
            None => EnvironmentMetadata::load(&layout.metadata_file())?
                .and_then(|m| m.requirements)
                .ok_or_else(|| NodeenvError::Usage {
                    message: "--update needs a requirements file (-r FILE)".to_string(),
                })?,
        };

        self.install_requirements(&layout, &requirements, ui)
    }

    fn install_runtime(
        &mut self,
        layout: &EnvironmentLayout,
        version: &Version,
        opts: &InstallOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let base = mirror_base_url(opts.mirror.as_deref(), &self.platform);
        let artifact = resolve_artifact(version, &self.platform, &base, opts.prebuilt)?;
        let marker = match (opts.prebuilt, artifact.archive_kind) {
            (false, _) => "configure",
            (true, ArchiveKind::Zip) => "node.exe",
            (true, ArchiveKind::TarGz) => "bin/node",
        };

        let extracted = layout.src_dir.join(&artifact.top_level_dir);
        if opts.prebuilt {
            ui.info_continued(&format!(" * Install prebuilt node ({}) ", version));
        }
        if !reuse_or_clear(&extracted, marker)? {
            debug!(url = %artifact.url, "downloading runtime");
            let bytes = download(self.transport, &artifact.url, ui)?;
            if opts.prebuilt {
                ui.info_continued(".");
            }
            install_from_archive(
                &bytes,
                artifact.archive_kind,
                &layout.src_dir,
                &artifact.top_level_dir,
            )?;
        }

        if opts.prebuilt {
            // Zip builds keep node.exe at the archive root.
            let dest = match artifact.archive_kind {
                ArchiveKind::Zip => layout.bin_dir.clone(),
                ArchiveKind::TarGz => layout.root.clone(),
            };
            copy_tree(&extracted, &dest)?;
            ui.info_continued(".");
            ui.info(" done.");
        } else {
            configure_and_build(&extracted, &layout.root, version, &opts.build, ui)?;
        }
        Ok(())
    }

    fn bootstrap_npm(
        &self,
        layout: &EnvironmentLayout,
        opts: &InstallOptions,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        if layout.is_windows() {
            ui.warning("npm bootstrap is not supported on Windows; skipping");
            return Ok(());
        }
        install_npm(
            self.transport,
            &self.npm_script_url,
            &layout.activate_script(),
            &opts.npm,
            opts.npm_clean,
            ui,
        )
    }

    fn install_requirements(
        &self,
        layout: &EnvironmentLayout,
        requirements: &Path,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        if layout.is_windows() {
            ui.warning("npm install is not supported on Windows; skipping requirements");
            return Ok(());
        }
        let text = fs::read_to_string(requirements).map_err(|e| NodeenvError::Config {
            path: requirements.to_path_buf(),
            message: e.to_string(),
        })?;
        let packages = parse_requirements(&text);
        if packages.is_empty() {
            ui.debug(&format!(" * No packages listed in {}", requirements.display()));
            return Ok(());
        }
        install_packages(&layout.activate_script(), &packages, ui)
    }

    fn advance(&mut self, next: ProvisionState) {
        debug!(from = ?self.state, to = ?next, "provision state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Libc, Os};
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Serves nothing and records what was asked for.
    #[derive(Default)]
    struct Offline {
        calls: RefCell<Vec<String>>,
    }

    impl Transport for Offline {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.borrow_mut().push(url.to_string());
            Err(NodeenvError::Network {
                url: url.to_string(),
                status: None,
                message: "offline".to_string(),
            })
        }
    }

    fn linux_x64() -> PlatformKey {
        PlatformKey {
            os: Os::Linux,
            arch: Arch::X64,
            libc: Libc::Glibc,
        }
    }

    #[test]
    fn existing_root_is_rejected_before_any_work() {
        let temp = TempDir::new().unwrap();
        let transport = Offline::default();
        let mut provisioner = Provisioner::new(&transport, linux_x64());
        let mut ui = MockUI::new();

        let err = provisioner
            .create(temp.path(), &InstallOptions::default(), &mut ui)
            .unwrap_err();

        assert!(matches!(err, NodeenvError::EnvironmentExists { .. }));
        assert_eq!(err.exit_code(), 2);
        assert!(transport.calls.borrow().is_empty());
        assert!(!temp.path().join("src").exists());
        assert_eq!(provisioner.state(), ProvisionState::Uninitialized);
    }

    #[test]
    fn network_failure_stops_after_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("env");
        let transport = Offline::default();
        let mut provisioner = Provisioner::new(&transport, linux_x64());

        let err = provisioner
            .create(&root, &InstallOptions::default(), &mut MockUI::new())
            .unwrap_err();

        assert!(matches!(err, NodeenvError::Network { .. }));
        assert_eq!(provisioner.state(), ProvisionState::DirectoriesCreated);
        assert!(root.join("src").is_dir());
        assert!(root.join("nodeenv.yml").is_file());
        assert_eq!(
            transport.calls.borrow().as_slice(),
            ["https://nodejs.org/download/release/index.json"]
        );
    }

    #[test]
    fn update_requires_bin_dir() {
        let temp = TempDir::new().unwrap();
        let transport = Offline::default();
        let mut provisioner = Provisioner::new(&transport, linux_x64());

        let err = provisioner
            .update(temp.path(), &InstallOptions::default(), &mut MockUI::new())
            .unwrap_err();
        assert!(matches!(err, NodeenvError::NotAnEnvironment { .. }));
    }

    #[test]
    fn update_without_requirements_is_usage_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("bin")).unwrap();
        let transport = Offline::default();
        let mut provisioner = Provisioner::new(&transport, linux_x64());

        let err = provisioner
            .update(temp.path(), &InstallOptions::default(), &mut MockUI::new())
            .unwrap_err();
        assert!(matches!(err, NodeenvError::Usage { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn update_reads_requirements_from_metadata() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("env");
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();

        let npm = bin.join("npm");
        fs::write(
            &npm,
            format!("#!/bin/sh\necho \"$@\" >> '{}'\n", temp.path().join("npm.log").display()),
        )
        .unwrap();
        fs::set_permissions(&npm, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(bin.join("activate"), format!("PATH='{}':$PATH\n", bin.display())).unwrap();

        let requirements = temp.path().join("requirements.txt");
        fs::write(&requirements, "# tools\nless\n").unwrap();
        let mut metadata = EnvironmentMetadata::new("latest", "latest", true);
        metadata.requirements = Some(requirements);
        metadata.save(&root.join("nodeenv.yml")).unwrap();

        let transport = Offline::default();
        let mut provisioner = Provisioner::new(&transport, linux_x64());
        provisioner
            .update(&root, &InstallOptions::default(), &mut MockUI::new())
            .unwrap();

        let log = fs::read_to_string(temp.path().join("npm.log")).unwrap();
        assert_eq!(log, "install -g less\n");
        assert!(transport.calls.borrow().is_empty());
    }

    #[test]
    fn list_versions_uses_platform_mirror() {
        let transport = Offline::default();
        let musl = PlatformKey {
            libc: Libc::Musl,
            ..linux_x64()
        };
        let mut provisioner = Provisioner::new(&transport, musl);

        assert!(provisioner.list_versions(None).is_err());
        assert_eq!(
            transport.calls.borrow().as_slice(),
            ["https://unofficial-builds.nodejs.org/download/release/index.json"]
        );
    }
}
