// Logger setup for the replay binary.
//
// The library only talks to the `log` facade; this installs `env_logger`
// behind it. `RUST_LOG` wins when set, otherwise `--verbose` picks `debug`
// and the default is `info`.

use env_logger::{Builder, Env};
use log::LevelFilter;

pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // Only fails if a logger is already installed.
    let _ = Builder::from_env(env).try_init();
}
