//! Routegraph CLI — query airport route networks from the command line.

use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use routegraph_cli::colors::{bold, cyan, gray, green, red};
use routegraph_cli::commands::{self, CliError};
use routegraph_cli::config::{RoutegraphConfig, CONFIG_FILE};
use routegraph_core::{Loader, RouteNetwork, Weighting};

#[derive(ClapParser)]
#[command(name = "routegraph", version, about = "Shortest routes and spanning trees over airport networks")]
struct Cli {
    /// Time-weighted route description (.gv)
    #[arg(long, global = true)]
    times: Option<PathBuf>,

    /// Cost-weighted route description (.gv)
    #[arg(long, global = true)]
    costs: Option<PathBuf>,

    /// Config file (default: search for routegraph.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List airports and graph sizes
    Summary,
    /// Find the cheapest route between two airport codes
    Route {
        from: String,
        to: String,
        /// Weight to minimise
        #[arg(long, value_enum)]
        by: Option<By>,
    },
    /// Minimum spanning tree rooted at an airport code
    Mst {
        root: String,
        /// Weight to minimise
        #[arg(long, value_enum)]
        by: Option<By>,
    },
    /// Print a default routegraph.toml
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum By {
    Time,
    Cost,
}

impl From<By> for Weighting {
    fn from(by: By) -> Self {
        match by {
            By::Time => Weighting::Time,
            By::Cost => Weighting::Cost,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", red("error:"), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("routegraph=debug,routegraph_cli=debug,routegraph_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        times,
        costs,
        config,
        json,
        command,
        ..
    } = cli;
    let sources = Sources { times, costs, config };

    match command {
        Commands::Init => {
            print!("{}", RoutegraphConfig::default_template());
        }
        Commands::Summary => {
            let (network, _) = sources.open()?;
            let summary = commands::summary(&network);
            if json {
                println!("{}", commands::to_json(&summary)?);
            } else {
                println!("{}", bold("Airports"));
                println!("{}", summary);
            }
        }
        Commands::Route { from, to, by } => {
            let (network, default_by) = sources.open()?;
            let by = by.map(Weighting::from).unwrap_or(default_by);
            let report = commands::route(&network, &from, &to, by)?;
            if json {
                println!("{}", commands::to_json(&report)?);
            } else {
                println!("{} {} {} {}", green("route"), cyan(&from), gray("->"), cyan(&to));
                println!("{}", report);
            }
        }
        Commands::Mst { root, by } => {
            let (network, default_by) = sources.open()?;
            let by = by.map(Weighting::from).unwrap_or(default_by);
            let report = commands::spanning_tree(&network, &root, by)?;
            if json {
                println!("{}", commands::to_json(&report)?);
            } else {
                println!("{} {}", green("spanning tree from"), cyan(&root));
                println!("{}", report);
            }
        }
    }
    Ok(())
}

/// Source flags from the command line, merged with `routegraph.toml`.
struct Sources {
    times: Option<PathBuf>,
    costs: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Sources {
    fn config(&self) -> Result<RoutegraphConfig, CliError> {
        if let Some(path) = &self.config {
            return RoutegraphConfig::load_from(path).map_err(CliError::Config);
        }
        match RoutegraphConfig::load_with_path().map_err(CliError::Config)? {
            Some((path, cfg)) => {
                debug!(path = %path.display(), "using config");
                Ok(cfg)
            }
            None => {
                debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(RoutegraphConfig::default())
            }
        }
    }

    /// Load the network along with the configured default weighting.
    fn open(&self) -> Result<(RouteNetwork, Weighting), CliError> {
        let config = self.config()?;
        let times = self.times.as_ref().or(config.sources.times.as_ref());
        let costs = self.costs.as_ref().or(config.sources.costs.as_ref());
        if times.is_none() || costs.is_none() {
            warn!("pass --times and --costs or set [sources] in {}", CONFIG_FILE);
        }
        let loader = Loader::with_extensions(config.loader.extensions.iter().cloned());
        let network = loader.load(times.map(PathBuf::as_path), costs.map(PathBuf::as_path))?;
        Ok((network, config.query.default_weighting))
    }
}
