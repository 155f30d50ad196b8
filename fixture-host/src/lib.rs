//! Host side of the `env` fixture: allocate a fixed-size memory and a mutable
//! global, link them (with a small table and a few i32 constants) into an
//! import object, load a module from disk, and call one of its exports.
//!
//! Compilation and execution are delegated to `wasmtime`.

#![deny(bare_trait_objects)]

pub mod bindings;
pub mod config;
pub mod error;
pub mod instance;
pub mod loader;
pub mod values;

pub use crate::bindings::HostEnv;
pub use crate::config::FixtureConfig;
pub use crate::error::Error;
pub use crate::instance::Instance;
pub use crate::values::{ReturnValues, Value};

use log::info;

/// What one fixture run observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub results: ReturnValues,
    /// The host global as it stands after the call.
    pub global: Value,
    pub stack_max: i32,
}

/// Load, instantiate and invoke, once.
pub async fn run_fixture(config: &FixtureConfig) -> Result<Outcome, Error> {
    config.validate()?;
    let engine = loader::fixture_engine()?;
    let module_path = config.resolved_module_path();
    let module = loader::load_module(&engine, &module_path, config.allow_precompiled)?;

    let mut instance = Instance::new(&engine, &module, config).await?;
    let results = instance.run(&config.entry_point, &config.args).await?;
    info!("{} returned {}", config.entry_point, results);

    Ok(Outcome {
        results,
        global: instance.global_value(),
        stack_max: instance.stack_max(),
    })
}
