use anyhow::{format_err, Error};
use clap::{App, Arg, ArgMatches};
use fixture_host::{FixtureConfig, Value};
use std::path::PathBuf;
use std::str::FromStr;

fn parse_flag<T>(m: &ArgMatches<'_>, name: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match m.value_of(name) {
        None => Ok(default),
        Some(s) => s
            .parse::<T>()
            .map_err(|e| format_err!("invalid value {:?} for --{}: {}", s, name, e)),
    }
}

#[derive(Debug)]
pub struct Options {
    pub config: FixtureConfig,
}

impl Options {
    pub fn from_args(m: &ArgMatches<'_>) -> Result<Self, Error> {
        let defaults = FixtureConfig::default();

        let module_path = m
            .value_of("module")
            .map(PathBuf::from)
            .unwrap_or(defaults.module_path);

        let args = if m.is_present("no_args") {
            vec![]
        } else {
            match m.values_of("arg") {
                Some(values) => values
                    .map(|v| v.parse::<Value>())
                    .collect::<Result<Vec<_>, _>>()?,
                None => defaults.args,
            }
        };

        let config = FixtureConfig {
            module_path,
            namespace: m
                .value_of("namespace")
                .map(str::to_owned)
                .unwrap_or(defaults.namespace),
            memory_pages: parse_flag(m, "memory-pages", defaults.memory_pages)?,
            global_init: parse_flag(m, "global-init", defaults.global_init)?,
            table_base: parse_flag(m, "table-base", defaults.table_base)?,
            memory_base: parse_flag(m, "memory-base", defaults.memory_base)?,
            stack_top: parse_flag(m, "stack-top", defaults.stack_top)?,
            entry_point: m
                .value_of("invoke")
                .map(str::to_owned)
                .unwrap_or(defaults.entry_point),
            args,
            allow_precompiled: m.is_present("allow_precompiled"),
        };
        config.validate()?;
        Ok(Options { config })
    }

    pub fn app() -> App<'static, 'static> {
        let _ = include_str!("../Cargo.toml");
        app_from_crate!()
            .arg(
                Arg::with_name("module")
                    .index(1)
                    .help(
                        "module to instantiate, defaults to ./fixtures/wasm/global.wasm if unspecified",
                    ),
            )
            .arg(
                Arg::with_name("invoke")
                    .long("invoke")
                    .takes_value(true)
                    .help("exported function to call (default: global)"),
            )
            .arg(
                Arg::with_name("arg")
                    .long("arg")
                    .takes_value(true)
                    .multiple(true)
                    .number_of_values(1)
                    .allow_hyphen_values(true)
                    .help("argument to pass, as N or TYPE:N (e.g. i64:7, f32:1.5); default: 1 2"),
            )
            .arg(
                Arg::with_name("no_args")
                    .long("no-args")
                    .conflicts_with("arg")
                    .help("call the export without arguments"),
            )
            .arg(
                Arg::with_name("namespace")
                    .long("namespace")
                    .takes_value(true)
                    .help("import namespace for the host bindings (default: env)"),
            )
            .arg(
                Arg::with_name("memory-pages")
                    .long("memory-pages")
                    .takes_value(true)
                    .help("initial and maximum size of the host memory, in 64KiB pages (default: 256)"),
            )
            .arg(
                Arg::with_name("global-init")
                    .long("global-init")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .help("initial value of the mutable i32 global (default: -2)"),
            )
            .arg(
                Arg::with_name("table-base")
                    .long("table-base")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .help("value of the tableBase import (default: 0)"),
            )
            .arg(
                Arg::with_name("memory-base")
                    .long("memory-base")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .help("value of the memoryBase import (default: 1024)"),
            )
            .arg(
                Arg::with_name("stack-top")
                    .long("stack-top")
                    .takes_value(true)
                    .allow_hyphen_values(true)
                    .help("value of the STACKTOP import (default: 0)"),
            )
            .arg(
                Arg::with_name("allow_precompiled")
                    .long("allow-precompiled")
                    .help("accept precompiled artifacts; these are not validated, only use trusted files"),
            )
    }

    pub fn get() -> Result<Self, Error> {
        Options::from_args(&Options::app().get_matches())
    }
}
