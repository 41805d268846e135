#[macro_use]
extern crate log;

#[macro_use]
pub mod errors;
pub mod blockchain;
pub mod callbacks;
pub mod common;

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{crate_version, App, Arg};
use log::LevelFilter;

use crate::blockchain::parser::types::CoinType;
use crate::blockchain::parser::AddressParser;
use crate::callbacks::addressdump::AddressDump;
use crate::callbacks::Callback;
use crate::common::logger::SimpleLogger;
use crate::errors::OpResult;

/// Holds all available user arguments
pub struct ParserOptions {
    pub callback: Box<dyn Callback>, // Sink which receives each scanned block. (See callbacks/mod.rs)
    pub coin_type: CoinType,         // Network whose block files we want to scan
    pub blockchain_dir: PathBuf,     // Path to directory where blk.dat files are stored
    pub log_level_filter: LevelFilter, // Verbosity level, 0 = Info, 1 = Debug, 2+ = Trace
}

fn main() {
    // Init user args
    let options = match parse_args() {
        Ok(o) => o,
        Err(desc) => {
            // Init logger to print outstanding error message
            SimpleLogger::init(LevelFilter::Debug).unwrap();
            error!(target: "main", "{}", desc);
            process::exit(1);
        }
    };

    // Apply log filter based on verbosity
    SimpleLogger::init(options.log_level_filter).expect("Unable to initialize logger!");
    info!(target: "main", "Starting rusty-addressdump v{} ...", env!("CARGO_PKG_VERSION"));
    debug!(target: "main", "Using LogLevel {}", options.log_level_filter);

    let mut parser = AddressParser::new(options);
    if let Err(why) = parser.start() {
        error!(target: "main", "{}", why);
        process::exit(1);
    }
    info!(target: "main", "Fin.");
}

/// Parses args or fails if some requirements are not met.
fn parse_args() -> OpResult<ParserOptions> {
    let networks = &["mainnet", "testnet", "regtest"];
    let matches = App::new("Bitcoin block file address scanner written in Rust")
        .version(crate_version!())
        // Add flags
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increases verbosity level. Info=0, Debug=1, Trace=2 (default: 0)"),
        )
        // Add options
        .arg(
            Arg::with_name("network")
                .short("n")
                .long("network")
                .value_name("NAME")
                .help("Specify blockchain network (default: testnet)")
                .possible_values(networks)
                .default_value("testnet")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("db-path")
                .short("d")
                .long("db-path")
                .value_name("PATH")
                .help("Sets directory which contains blk.dat files (default: .)")
                .default_value(".")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("out-file")
                .short("o")
                .long("out-file")
                .value_name("FILE")
                .help("Sets output file for extracted addresses (default: addresses.txt)")
                .default_value("addresses.txt")
                .takes_value(true),
        )
        .get_matches();

    let log_level_filter = match matches.occurrences_of("verbosity") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let coin_type = CoinType::from_str(matches.value_of("network").unwrap())?;
    let blockchain_dir = PathBuf::from(matches.value_of("db-path").unwrap());
    let out_file = PathBuf::from(matches.value_of("out-file").unwrap());

    // The callback owns the output file handle for the whole run
    let callback: Box<dyn Callback> = Box::new(AddressDump::new(&out_file)?);

    Ok(ParserOptions {
        callback,
        coin_type,
        blockchain_dir,
        log_level_filter,
    })
}
