//! The import object handed to the fixture module.
//!
//! Everything lives under one namespace (`env` by default):
//!
//! | field        | kind                              |
//! |--------------|-----------------------------------|
//! | `table`      | funcref table, 0 initial, 0 max   |
//! | `tableBase`  | immutable i32                     |
//! | `memory`     | memory, initial == maximum pages  |
//! | `global`     | mutable i32                       |
//! | `memoryBase` | immutable i32                     |
//! | `STACKTOP`   | immutable i32                     |
//! | `STACK_MAX`  | immutable i32, memory byte length |

use crate::config::FixtureConfig;
use crate::error::Error;
use log::debug;
use std::convert::TryFrom;
use wasmtime::{
    AsContextMut, Extern, Global, GlobalType, Linker, Memory, MemoryType, Mutability, Ref, RefType,
    Store, Table, TableType, Val, ValType,
};

pub const TABLE: &str = "table";
pub const TABLE_BASE: &str = "tableBase";
pub const MEMORY: &str = "memory";
pub const GLOBAL: &str = "global";
pub const MEMORY_BASE: &str = "memoryBase";
pub const STACK_TOP: &str = "STACKTOP";
pub const STACK_MAX: &str = "STACK_MAX";

/// Host-owned state shared with the module. The handles are only meaningful
/// for the store that created them.
#[derive(Debug, Clone)]
pub struct HostEnv {
    namespace: String,
    memory: Memory,
    global: Global,
    table: Table,
    table_base: i32,
    memory_base: i32,
    stack_top: i32,
    stack_max: i32,
}

fn const_i32(store: impl AsContextMut, value: i32) -> Result<Global, Error> {
    Global::new(
        store,
        GlobalType::new(ValType::I32, Mutability::Const),
        Val::I32(value),
    )
    .map_err(|e| Error::HostEnv("constant global", e))
}

impl HostEnv {
    /// Allocate the memory, table and globals described by `config` in `store`.
    ///
    /// The store's engine must have async support enabled.
    pub async fn create<T: Send + 'static>(
        store: &mut Store<T>,
        config: &FixtureConfig,
    ) -> Result<Self, Error> {
        config.validate()?;

        let pages = config.memory_pages;
        let memory = Memory::new_async(&mut *store, MemoryType::new(pages, Some(pages)))
            .await
            .map_err(|e| Error::HostEnv("memory", e))?;

        // the memory length is observed exactly once; STACK_MAX is derived from it
        let byte_len = memory.data_size(&*store);
        if byte_len as u64 != config.memory_bytes() {
            return Err(Error::Config(format!(
                "memory reports {} bytes, expected {}",
                byte_len,
                config.memory_bytes()
            )));
        }
        let stack_max = i32::try_from(byte_len).map_err(|_| {
            Error::Config(format!(
                "memory of {} bytes does not fit in an i32 STACK_MAX",
                byte_len
            ))
        })?;

        let global = Global::new(
            &mut *store,
            GlobalType::new(ValType::I32, Mutability::Var),
            Val::I32(config.global_init),
        )
        .map_err(|e| Error::HostEnv("global", e))?;

        let table = Table::new_async(
            &mut *store,
            TableType::new(RefType::FUNCREF, 0, Some(0)),
            Ref::Func(None),
        )
        .await
        .map_err(|e| Error::HostEnv("table", e))?;

        debug!(
            "host env: {} pages ({} bytes), global = {}, STACK_MAX = {}",
            pages, byte_len, config.global_init, stack_max
        );

        Ok(Self {
            namespace: config.namespace.clone(),
            memory,
            global,
            table,
            table_base: config.table_base,
            memory_base: config.memory_base,
            stack_top: config.stack_top,
            stack_max,
        })
    }

    /// Define every binding under the namespace. The module may import any
    /// subset of them.
    pub fn define<T: 'static>(
        &self,
        store: &mut Store<T>,
        linker: &mut Linker<T>,
    ) -> Result<(), Error> {
        let constants = [
            (TABLE_BASE, self.table_base),
            (MEMORY_BASE, self.memory_base),
            (STACK_TOP, self.stack_top),
            (STACK_MAX, self.stack_max),
        ];
        let mut items: Vec<(&str, Extern)> = vec![
            (TABLE, self.table.into()),
            (MEMORY, self.memory.into()),
            (GLOBAL, self.global.into()),
        ];
        for (name, value) in constants.iter() {
            items.push((*name, const_i32(&mut *store, *value)?.into()));
        }

        for (name, item) in items {
            linker
                .define(&*store, &self.namespace, name, item)
                .map_err(|e| Error::HostEnv("import binding", e))?;
        }
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn memory(&self) -> Memory {
        self.memory
    }

    pub fn global(&self) -> Global {
        self.global
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn stack_max(&self) -> i32 {
        self.stack_max
    }
}
