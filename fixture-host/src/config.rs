use crate::error::Error;
use crate::values::Value;
use std::path::{Path, PathBuf};

/// Size of one linear memory page, in bytes.
pub const WASM_PAGE_SIZE: u64 = 64 * 1024;

pub const DEFAULT_MODULE_PATH: &str = "./fixtures/wasm/global.wasm";
pub const DEFAULT_NAMESPACE: &str = "env";
pub const DEFAULT_ENTRY_POINT: &str = "global";
pub const DEFAULT_MEMORY_PAGES: u32 = 256;
pub const DEFAULT_GLOBAL_INIT: i32 = -2;
pub const DEFAULT_TABLE_BASE: i32 = 0;
pub const DEFAULT_MEMORY_BASE: i32 = 1024;
pub const DEFAULT_STACK_TOP: i32 = 0;

/// Everything the fixture needs to build its import object, load the module
/// and call into it. `Default` reproduces the fixture's literal constants.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureConfig {
    pub module_path: PathBuf,
    pub namespace: String,
    /// Initial and maximum page count of the host memory.
    pub memory_pages: u32,
    pub global_init: i32,
    pub table_base: i32,
    pub memory_base: i32,
    pub stack_top: i32,
    pub entry_point: String,
    pub args: Vec<Value>,
    pub allow_precompiled: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            module_path: PathBuf::from(DEFAULT_MODULE_PATH),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            memory_pages: DEFAULT_MEMORY_PAGES,
            global_init: DEFAULT_GLOBAL_INIT,
            table_base: DEFAULT_TABLE_BASE,
            memory_base: DEFAULT_MEMORY_BASE,
            stack_top: DEFAULT_STACK_TOP,
            entry_point: DEFAULT_ENTRY_POINT.to_owned(),
            args: vec![Value::I32(1), Value::I32(2)],
            allow_precompiled: false,
        }
    }
}

impl FixtureConfig {
    pub fn with_module_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.module_path = path.into();
        self
    }

    pub fn with_entry_point<S: Into<String>>(mut self, entry_point: S, args: Vec<Value>) -> Self {
        self.entry_point = entry_point.into();
        self.args = args;
        self
    }

    /// The module path to open. A relative path that does not exist under
    /// the current directory is looked up under this crate's root, where
    /// `fixtures/` lives, so the default works from the workspace root too.
    pub fn resolved_module_path(&self) -> PathBuf {
        let path = &self.module_path;
        if path.is_absolute() || path.exists() {
            return path.clone();
        }
        let in_crate = Path::new(env!("CARGO_MANIFEST_DIR")).join(path);
        if in_crate.exists() {
            in_crate
        } else {
            path.clone()
        }
    }

    /// Byte length of the host memory: `memory_pages` full pages.
    pub fn memory_bytes(&self) -> u64 {
        u64::from(self.memory_pages) * WASM_PAGE_SIZE
    }

    /// `STACK_MAX` is the memory's byte length, and it is handed to the
    /// module as an i32 global, so the memory must fit below `i32::MAX`.
    pub fn stack_max(&self) -> Result<i32, Error> {
        let bytes = self.memory_bytes();
        if bytes > i32::MAX as u64 {
            return Err(Error::Config(format!(
                "memory of {} pages ({} bytes) does not fit in an i32 STACK_MAX",
                self.memory_pages, bytes
            )));
        }
        Ok(bytes as i32)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.namespace.is_empty() {
            return Err(Error::Config("import namespace must not be empty".to_owned()));
        }
        if self.entry_point.is_empty() {
            return Err(Error::Config("entry point must not be empty".to_owned()));
        }
        self.stack_max()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixture_constants() {
        let config = FixtureConfig::default();
        assert_eq!(config.memory_pages, 256);
        assert_eq!(config.global_init, -2);
        assert_eq!(config.memory_base, 1024);
        assert_eq!(config.table_base, 0);
        assert_eq!(config.stack_top, 0);
        assert_eq!(config.namespace, "env");
        assert_eq!(config.entry_point, "global");
        assert_eq!(config.args, vec![Value::I32(1), Value::I32(2)]);
        assert!(!config.allow_precompiled);
    }

    #[test]
    fn stack_max_is_memory_byte_length() {
        let config = FixtureConfig::default();
        assert_eq!(config.stack_max().unwrap(), 16 * 1024 * 1024);
        assert_eq!(config.stack_max().unwrap() as u64, config.memory_bytes());
    }

    #[test]
    fn default_module_path_resolves_to_the_fixture() {
        let resolved = FixtureConfig::default().resolved_module_path();
        assert!(resolved.exists(), "{} exists", resolved.display());
        assert!(resolved.ends_with("fixtures/wasm/global.wasm"));
    }

    #[test]
    fn unknown_relative_path_is_left_alone() {
        let config = FixtureConfig::default().with_module_path("no/such/module.wasm");
        assert_eq!(
            config.resolved_module_path(),
            PathBuf::from("no/such/module.wasm")
        );
    }

    #[test]
    fn oversized_memory_is_rejected() {
        let config = FixtureConfig {
            memory_pages: 32768,
            ..FixtureConfig::default()
        };
        match config.validate() {
            Err(Error::Config(_)) => {}
            other => panic!("expected config error, got {:?}", other),
        }

        let config = FixtureConfig {
            memory_pages: 32767,
            ..FixtureConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_namespace_is_rejected() {
        let config = FixtureConfig {
            namespace: String::new(),
            ..FixtureConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
