use crate::bindings::HostEnv;
use crate::config::FixtureConfig;
use crate::error::Error;
use crate::values::{ReturnValues, Value};
use log::{debug, info};
use wasmtime::{Engine, Instance as WasmInstance, Linker, Module, Store, Val};

/// An instantiated fixture module together with the store and host env it
/// was linked against.
pub struct Instance {
    store: Store<()>,
    instance: WasmInstance,
    env: HostEnv,
}

impl Instance {
    /// Build the host env for `config`, link it under the configured
    /// namespace and instantiate `module`.
    pub async fn new(
        engine: &Engine,
        module: &Module,
        config: &FixtureConfig,
    ) -> Result<Self, Error> {
        let mut store = Store::new(engine, ());
        let env = HostEnv::create(&mut store, config).await?;

        let mut linker = Linker::new(engine);
        env.define(&mut store, &mut linker)?;

        let instance = linker
            .instantiate_async(&mut store, module)
            .await
            .map_err(Error::Instantiate)?;
        info!("instantiated module against `{}` imports", env.namespace());

        Ok(Self {
            store,
            instance,
            env,
        })
    }

    /// Call the exported function `field` with `args`, returning every result.
    pub async fn run(&mut self, field: &str, args: &[Value]) -> Result<ReturnValues, Error> {
        let func = self
            .instance
            .get_func(&mut self.store, field)
            .ok_or_else(|| Error::MissingExport(field.to_owned()))?;

        let params = args
            .iter()
            .map(|a| a.into_val())
            .collect::<Result<Vec<Val>, Error>>()?;
        let mut results = vec![Val::I32(0); func.ty(&self.store).results().len()];

        debug!("invoke {} {:?}", field, args);
        func.call_async(&mut self.store, &params, &mut results)
            .await
            .map_err(|e| Error::Invoke(field.to_owned(), e))?;

        Ok(ReturnValues::from_vals(&results))
    }

    /// Current value of the host's mutable global.
    pub fn global_value(&mut self) -> Value {
        let global = self.env.global();
        Value::from(&global.get(&mut self.store))
    }

    /// Byte length of the host memory.
    pub fn memory_size(&self) -> usize {
        self.env.memory().data_size(&self.store)
    }

    pub fn stack_max(&self) -> i32 {
        self.env.stack_max()
    }

    pub fn table_size(&self) -> u64 {
        u64::from(self.env.table().size(&self.store))
    }

    pub fn read_memory(&self, offset: usize, len: usize) -> Result<Vec<u8>, Error> {
        let data = self.env.memory().data(&self.store);
        offset
            .checked_add(len)
            .and_then(|end| data.get(offset..end))
            .map(|bytes| bytes.to_vec())
            .ok_or(Error::OutOfBounds {
                offset,
                len,
                size: data.len(),
            })
    }

    /// Read `len` bytes at `offset` as UTF-8, replacing invalid sequences.
    pub fn read_string(&self, offset: usize, len: usize) -> Result<String, Error> {
        let bytes = self.read_memory(offset, len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn env(&self) -> &HostEnv {
        &self.env
    }
}
