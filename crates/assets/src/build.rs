// Copyright 2026 The vktutorial Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Build Support
//!
//! This module contains the build time functionality.  Build scripts panic on malformed input,
//! which cargo reports as a build failure.

use std::{ffi, fs, path::Path, process};

const SHADER_EXTS: [&str; 2] = ["vert", "frag"];

/// Use glslc to recursively compile shaders from shaders to assets/shaders.
///
/// Machines without the shader SDK keep whatever SPIR-V is already present in assets/shaders and
/// get a cargo warning instead of a failed build.
pub fn build_shaders() {
    let manifest_dir = &std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let crate_root = Path::new(manifest_dir);

    let src_root = crate_root.join("shaders");
    let dest_root = crate_root.join("assets/shaders");

    println!("cargo:rerun-if-changed=shaders");

    if !src_root.exists() {
        return;
    }

    if process::Command::new("glslc").arg("--version").output().is_err() {
        println!("cargo:warning=no glslc found, using existing SPIR-V in assets/shaders");
        return;
    }

    fn compile_dir(dir: &Path, src_root: &Path, dest_root: &Path) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                compile_dir(&path, src_root, dest_root);
                continue;
            }

            let Some(ext) = path.extension().and_then(ffi::OsStr::to_str) else {
                continue;
            };
            if !SHADER_EXTS.contains(&ext) {
                continue;
            }

            // `triangle/shader.vert` lands at `triangle/vert.spv`, named by stage.
            let rel_dir = path.parent().unwrap().strip_prefix(src_root).unwrap();
            let out_dir = dest_root.join(rel_dir);
            fs::create_dir_all(&out_dir).unwrap();
            let out = out_dir.join(ext).with_extension("spv");

            // Run glslc: `glslc <input> -o <output>`
            let status = process::Command::new("glslc")
                .arg(path.as_os_str())
                .arg("-o")
                .arg(out.as_os_str())
                .status()
                .unwrap();

            if !status.success() {
                panic!("glslc failed for {:?}", path);
            }
        }
    }

    compile_dir(&src_root, &src_root, &dest_root);
}

///  Sets the path for hard coding into the binary for use at runtime by the assets module.
// Packagers, see the Cargo.toml for the vktutorial binary.
pub fn set_asset_default_dir() {
    let manifest_dir = &std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let manifest = Path::new(manifest_dir).join("Cargo.toml");

    println!("cargo:rerun-if-changed=Cargo.toml");
    let cargo = fs::read_to_string(&manifest).unwrap();
    let dir = asset_dir_from_manifest(&cargo);
    println!("cargo:rustc-env=VKTUTORIAL_BUILD_ASSETS_DIR={dir}");
}

/// Extract `package.metadata.vktutorial.asset_dir`, defaulting to `assets`.
pub fn asset_dir_from_manifest(manifest: &str) -> String {
    let parsed: toml::Value = toml::from_str(manifest).unwrap();

    parsed
        .get("package")
        .and_then(|p| p.get("metadata"))
        .and_then(|m| m.get("vktutorial"))
        .and_then(|v| v.get("asset_dir"))
        .and_then(toml::Value::as_str)
        .unwrap_or("assets")
        .to_owned()
}
