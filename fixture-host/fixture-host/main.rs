#[macro_use]
extern crate clap;

mod options;

use crate::options::Options;
use log::{debug, info};

// Every failure is reported once, on stdout, and the process still exits
// normally.
#[tokio::main]
async fn main() {
    env_logger::init();

    let opts = match Options::get() {
        Ok(opts) => opts,
        Err(err) => {
            println!("{:#}", err);
            return;
        }
    };
    info!("fixture-host {:?}", opts);

    match fixture_host::run_fixture(&opts.config).await {
        Ok(outcome) => {
            debug!(
                "global after call = {}, STACK_MAX = {}",
                outcome.global, outcome.stack_max
            );
            println!("{}", outcome.results);
        }
        Err(err) => println!("{:#}", anyhow::Error::from(err)),
    }
}
