use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Reading module {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Engine configuration")]
    Engine(#[source] wasmtime::Error),
    #[error("Compilation error")]
    Compile(#[source] wasmtime::Error),
    #[error("{0:?} is a precompiled artifact; pass --allow-precompiled to load it")]
    PrecompiledNotAllowed(PathBuf),
    #[error("{0:?} is a precompiled component, not a core module")]
    UnsupportedArtifact(PathBuf),
    #[error("Creating host {0}")]
    HostEnv(&'static str, #[source] wasmtime::Error),
    #[error("Instantiation error")]
    Instantiate(#[source] wasmtime::Error),
    #[error("Module has no exported function named {0:?}")]
    MissingExport(String),
    #[error("Runtime error in {0:?}")]
    Invoke(String, #[source] wasmtime::Error),
    #[error("Bad argument {0:?}: {1}")]
    BadArgument(String, String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Memory access out of bounds: offset {offset}, length {len}, memory size {size}")]
    OutOfBounds { offset: usize, len: usize, size: usize },
}

impl Error {
    /// True when the failure happened while reading or compiling the module,
    /// i.e. the input file itself was missing or rejected.
    pub fn is_load_failure(&self) -> bool {
        match self {
            Error::Io { .. }
            | Error::Compile(_)
            | Error::PrecompiledNotAllowed(_)
            | Error::UnsupportedArtifact(_) => true,
            _ => false,
        }
    }
}
