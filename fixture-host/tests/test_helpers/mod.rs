#![allow(dead_code)]

use fixture_host::loader::{fixture_engine, load_module_bytes};
use fixture_host::{Error, FixtureConfig, Instance};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FIXTURE_HOST_ROOT: &'static str = env!("CARGO_MANIFEST_DIR");

pub fn fixture_file<P: AsRef<Path>>(path: P) -> PathBuf {
    let p = Path::new(FIXTURE_HOST_ROOT).join("fixtures").join(path);
    assert!(p.exists(), "fixture file {} exists", p.display());
    p
}

/// Assemble `wat` and write the binary to `name` inside `dir`.
pub fn write_module(dir: &TempDir, name: &str, wat: &str) -> PathBuf {
    let wasm = wat::parse_str(wat).expect("test module assembles");
    let path = dir.path().join(name);
    fs::write(&path, wasm).expect("write test module");
    path
}

/// Instantiate `wat` directly against the host env described by `config`.
pub async fn instantiate(wat: &str, config: &FixtureConfig) -> Result<Instance, Error> {
    let wasm = wat::parse_str(wat).expect("test module assembles");
    let engine = fixture_engine()?;
    let module = load_module_bytes(&engine, &wasm, Path::new("inline.wat"), false)?;
    Instance::new(&engine, &module, config).await
}
