use std::path::PathBuf;

/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

impl Args {
    /// Parses command-line arguments using `clap`.
    pub fn parse() -> Self {
        let matches = clap::Command::new("pricebias")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Threshold-rule search and linear trend forecast over daily closes")
            .arg(
                clap::Arg::new("config")
                    .short('c')
                    .long("config")
                    .help("Path to a TOML configuration file")
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("seed")
                    .short('s')
                    .long("seed")
                    .help("Seed for the rule generator")
                    .value_parser(clap::value_parser!(u64))
                    .num_args(1),
            )
            .arg(
                clap::Arg::new("output")
                    .short('o')
                    .long("output")
                    .help("Forecast output file, overrides the configured path")
                    .num_args(1),
            )
            .get_matches();

        Args {
            config: matches.get_one::<String>("config").map(PathBuf::from),
            seed: matches.get_one::<u64>("seed").copied(),
            output: matches.get_one::<String>("output").map(PathBuf::from),
        }
    }
}
