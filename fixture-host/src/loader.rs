use crate::error::Error;
use log::{debug, info};
use std::fs;
use std::path::Path;
use wasmtime::{Config, Engine, Module, Precompiled};

/// An engine able to run the fixture: instantiation and calls are awaited.
pub fn fixture_engine() -> Result<Engine, Error> {
    let mut config = Config::new();
    config.async_support(true);
    Engine::new(&config).map_err(Error::Engine)
}

/// Read the whole file at `path` and compile it.
pub fn load_module<P: AsRef<Path>>(
    engine: &Engine,
    path: P,
    allow_precompiled: bool,
) -> Result<Module, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    info!("loaded {} bytes from {}", bytes.len(), path.display());
    load_module_bytes(engine, &bytes, path, allow_precompiled)
}

/// Compile an in-memory module. `origin` is only used for error messages.
///
/// Artifacts produced by `Engine::precompile_module` skip validation when
/// deserialized, so they are refused unless `allow_precompiled` is set.
pub fn load_module_bytes(
    engine: &Engine,
    bytes: &[u8],
    origin: &Path,
    allow_precompiled: bool,
) -> Result<Module, Error> {
    match engine.detect_precompiled(bytes) {
        None => {
            debug!("compiling {}", origin.display());
            Module::from_binary(engine, bytes).map_err(Error::Compile)
        }
        Some(Precompiled::Module) if allow_precompiled => {
            debug!("deserializing precompiled {}", origin.display());
            // Only reachable when the caller opted in to trusting this file.
            unsafe { Module::deserialize(engine, bytes) }.map_err(Error::Compile)
        }
        Some(Precompiled::Module) => Err(Error::PrecompiledNotAllowed(origin.to_owned())),
        Some(_) => Err(Error::UnsupportedArtifact(origin.to_owned())),
    }
}
