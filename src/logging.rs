//! Logger setup for the binaries.
//!
//! The library only emits through the `log` facade. Level priority:
//! `RUST_LOG` if set, then `QR_DEBUG` (forces debug), then the CLI flags.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Install `env_logger`. Call once, before any logging.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        let debug = env::var("QR_DEBUG").is_ok();
        builder.filter_level(level_for(verbose, quiet, debug));
    }

    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
    });

    // A logger may already be installed (tests, embedding hosts)
    let _ = builder.try_init();
}

fn level_for(verbose: u8, quiet: bool, debug: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match (verbose, debug) {
        (0, false) => LevelFilter::Info,
        (0 | 1, _) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
