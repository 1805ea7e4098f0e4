// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Assets
//!
//! The assets module encapsulates how lookups can vary across platforms and between usage and
//! development.  `AssetDirs` is a set of realized directories where lookups may search.  Hold onto
//! it for doing many lookups at computer speed but re-initialize it for human-speed queries.
//!
//! ## Precedence Rules
//!
//! - Roots handed to [`AssetDirs::with_roots`] always come first.
//!
//! - On **debug builds**, things are simple.  We use:
//!
//!   1. `VKTUTORIAL_ASSETS_DIR` enabling overrides for any purpose.
//!   2. The source tree's assets folder, below the build time `CARGO_MANIFEST_DIR`.
//!
//! - On **release builds**, we use:
//!
//!   1. `VKTUTORIAL_ASSETS_DIR`
//!   2. The user's local data directory
//!   3. A preferred installation directory handed to [`AssetDirs::with_default_dir`].  Binaries
//!      pass the `VKTUTORIAL_BUILD_ASSETS_DIR` their build script derives from
//!      `package.metadata.vktutorial.asset_dir`.  Relative paths start at the executable.
//!   4. The expected system directory as a backup.
//!
//! `VKTUTORIAL_ASSETS_DIR` and the installation directory should point directly to an assets root
//! i.e. a folder containing a shaders directory.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::prelude::*;
use crate::spirv::read_spirv;

/// Pre-calculated and checked parent paths for reuse in asset look-ups.  Hold onto this object for
/// the duration that such paths are valid, such as when looking up several assets.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    search_paths: Vec<PathBuf>,
}

fn as_assets_root(p: PathBuf) -> Option<PathBuf> {
    p.canonicalize().ok().filter(|p| p.is_dir())
}

// Treat the given path as a parent containing an `assets/` subdir.
fn with_assets_subdir(p: PathBuf) -> Option<PathBuf> {
    as_assets_root(p.join("assets"))
}

/// Relative install directories are relative to the directory holding the executable, so a
/// default of `../share/vktutorial/assets` works wherever the install prefix lands.
fn resolve_default_dir(dir: &str) -> Option<PathBuf> {
    let dir = PathBuf::from(dir);
    if dir.is_absolute() {
        return as_assets_root(dir);
    }
    let exe = std::env::current_exe().ok()?;
    as_assets_root(exe.parent()?.join(dir))
}

/// Inputs to the search order, gathered before any directory is checked.
struct Sources<'a> {
    env_dir: Option<String>,
    default_dir: Option<&'a str>,
    release: bool,
}

impl AssetDirs {
    /// Checks asset search directories once on construction.
    pub fn new() -> Self {
        Self::with_roots(std::iter::empty::<PathBuf>())
    }

    /// Search `roots` before any of the default locations.  Roots that do not exist are skipped
    /// with a warning.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::with_default_dir(roots, None)
    }

    /// Like [`AssetDirs::with_roots`], also searching the installation directory `default_dir` on
    /// release builds.  Binaries pass `option_env!("VKTUTORIAL_BUILD_ASSETS_DIR")`, which their
    /// build script sets from `package.metadata.vktutorial.asset_dir`.
    pub fn with_default_dir<I, P>(roots: I, default_dir: Option<&str>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let sources = Sources {
            env_dir: std::env::var("VKTUTORIAL_ASSETS_DIR").ok(),
            default_dir,
            release: !cfg!(debug_assertions),
        };
        Self::collect(roots, sources)
    }

    fn collect<I, P>(roots: I, sources: Sources<'_>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut search_paths = Vec::with_capacity(5);

        for root in roots {
            let root = root.into();
            match as_assets_root(root.clone()) {
                Some(path) => search_paths.push(path),
                None => warn!(?root, "asset root not found"),
            }
        }

        if let Some(raw) = sources.env_dir {
            match as_assets_root(PathBuf::from(&raw)) {
                Some(path) => search_paths.push(path),
                None => warn!("invalid VKTUTORIAL_ASSETS_DIR (path not found): {raw}"),
            }
        }

        if !sources.release {
            // Cargo sets this for `cargo run` and `cargo test`, pointing at the running package.
            std::env::var("CARGO_MANIFEST_DIR")
                .ok()
                .map(PathBuf::from)
                .and_then(with_assets_subdir)
                .into_iter()
                .for_each(|p| search_paths.push(p));
        } else {
            dirs::data_local_dir()
                .map(|p| p.join("vktutorial"))
                .and_then(with_assets_subdir)
                .into_iter()
                .for_each(|p| search_paths.push(p));

            match sources.default_dir.map(|dir| (dir, resolve_default_dir(dir))) {
                Some((_, Some(path))) => search_paths.push(path),
                Some((dir, None)) => debug!("default asset dir not installed: {dir}"),
                None => {}
            }

            dirs::data_dir()
                .map(|p| p.join("vktutorial"))
                .and_then(with_assets_subdir)
                .into_iter()
                .for_each(|p| search_paths.push(p));
        }

        debug!(?search_paths, "asset search paths");
        AssetDirs { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Checks asset paths for `name`, returning the first hit in precedence order.
    pub fn find(&self, name: &str, kind: AssetKind) -> Option<PathBuf> {
        let mut file = PathBuf::from(kind.subdir()).join(name);
        file.set_extension(kind.ext());

        let checked: Vec<PathBuf> = self
            .search_paths
            .iter()
            .map(|root| root.join(&file))
            .collect();

        if let Some(found) = checked.iter().find(|candidate| candidate.exists()) {
            Some(found.clone())
        } else {
            warn!("{kind:?} {name} not found");
            checked.iter().for_each(|pb| {
                warn!("  checked: {pb:?}");
            });
            None
        }
    }

    pub fn find_bytes(&self, name: &str, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
        self.find(name, kind)
            .ok_or_else(|| AssetError::NotFound(name.to_owned()))
            .and_then(|found| std::fs::read(found).map_err(|e| e.into()))
    }

    /// Load shader bytecode as SPIR-V words ready for `vkCreateShaderModule`.
    pub fn find_shader(&self, name: &str) -> Result<Vec<u32>, AssetError> {
        let bytes = self.find_bytes(name, AssetKind::Shader)?;
        read_spirv(&bytes)
    }
}

impl Default for AssetDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::spirv::SPIRV_MAGIC;

    fn write_shader(root: &std::path::Path, name: &str, words: &[u32]) {
        let path = root.join("shaders").join(name).with_extension("spv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_ne_bytes()).collect();
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_find_shader_words() {
        let dir = tempfile::tempdir().unwrap();
        write_shader(dir.path(), "triangle/vert", &[SPIRV_MAGIC, 0x0001_0000, 0]);

        let assets = AssetDirs::with_roots([dir.path()]);
        let words = assets.find_shader("triangle/vert").unwrap();
        assert_eq!(words[0], SPIRV_MAGIC);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_first_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_shader(first.path(), "frag", &[SPIRV_MAGIC, 1]);
        write_shader(second.path(), "frag", &[SPIRV_MAGIC, 2]);

        let assets = AssetDirs::with_roots([first.path(), second.path()]);
        assert_eq!(assets.find_shader("frag").unwrap(), vec![SPIRV_MAGIC, 1]);
    }

    #[test]
    fn test_missing_root_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        write_shader(dir.path(), "vert", &[SPIRV_MAGIC]);

        let assets = AssetDirs::with_roots([gone, dir.path().to_path_buf()]);
        assert!(assets.find("vert", AssetKind::Shader).is_some());
    }

    #[test]
    fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetDirs::with_roots([dir.path()]);
        match assets.find_shader("does/not/exist") {
            Err(AssetError::NotFound(name)) => assert_eq!(name, "does/not/exist"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    fn sources<'a>(env_dir: Option<&std::path::Path>, default_dir: Option<&'a str>) -> Sources<'a> {
        Sources {
            env_dir: env_dir.map(|p| p.to_string_lossy().into_owned()),
            default_dir,
            release: true,
        }
    }

    #[test]
    fn test_release_search_order() {
        let explicit = tempfile::tempdir().unwrap();
        let env = tempfile::tempdir().unwrap();
        let install = tempfile::tempdir().unwrap();
        let install_str = install.path().to_str().unwrap();

        let assets = AssetDirs::collect(
            [explicit.path()],
            sources(Some(env.path()), Some(install_str)),
        );
        let paths = assets.search_paths();
        let position = |dir: &std::path::Path| {
            let dir = dir.canonicalize().unwrap();
            paths.iter().position(|p| *p == dir).unwrap()
        };

        assert_eq!(position(explicit.path()), 0);
        assert_eq!(position(env.path()), 1);
        assert!(position(install.path()) > 1);
    }

    #[test]
    fn test_default_dir_ignored_in_debug_layout() {
        let install = tempfile::tempdir().unwrap();
        let install_str = install.path().to_str().unwrap();
        let mut sources = sources(None, Some(install_str));
        sources.release = false;

        let assets = AssetDirs::collect(std::iter::empty::<PathBuf>(), sources);
        let install = install.path().canonicalize().unwrap();
        assert!(!assets.search_paths().contains(&install));
    }

    #[test]
    fn test_invalid_env_dir_skipped() {
        let explicit = tempfile::tempdir().unwrap();
        let gone = explicit.path().join("gone");

        let assets = AssetDirs::collect([explicit.path()], sources(Some(&gone), None));
        let paths = assets.search_paths();
        assert_eq!(paths[0], explicit.path().canonicalize().unwrap());
        assert!(!paths.iter().any(|p| p.ends_with("gone")));
    }

    #[test]
    fn test_missing_default_dir_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("not-installed");
        let gone_str = gone.to_str().unwrap();

        let assets = AssetDirs::collect([dir.path()], sources(None, Some(gone_str)));
        assert!(!assets.search_paths().iter().any(|p| p.ends_with("not-installed")));
    }

    #[test]
    fn test_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaders/broken.spv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not spirv").unwrap();

        let assets = AssetDirs::with_roots([dir.path()]);
        assert!(matches!(
            assets.find_shader("broken"),
            Err(AssetError::InvalidShader(_))
        ));
    }
}
