#![forbid(unsafe_code)]

mod cmd;
mod config;
mod load;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "osim: semantic similarity over Gene Ontology style DAGs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./ontosim.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        OutputMode::resolve(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Summarize an ontology",
        long_about = "Load an ontology and report term and edge counts, the root of each namespace, and the graph content hash.",
        after_help = "EXAMPLES:\n    # Summarize an OBO release\n    osim info --ontology go-basic.obo\n\n    # Include part_of edges (via ontosim.toml) and emit JSON\n    osim info --ontology go-basic.obo --json"
    )]
    Info(cmd::info::InfoArgs),

    #[command(
        about = "Show one term",
        long_about = "Show a term's metadata, parents, children, and depth. With a corpus, also its information content.",
        after_help = "EXAMPLES:\n    # Show a term\n    osim term go-basic.obo GO:0008150\n\n    # Include information content\n    osim term go-basic.obo GO:0006915 --corpus corpus.json"
    )]
    Term(cmd::term::TermArgs),

    #[command(
        name = "term-sim",
        about = "Score two terms",
        long_about = "Score the similarity of two terms under a shared-information strategy and a term metric.",
        after_help = "EXAMPLES:\n    # Lin with GraSM (the defaults)\n    osim term-sim --ontology go-basic.obo --corpus corpus.json GO:0006915 GO:0012501\n\n    # Resnik over every common ancestor\n    osim term-sim --ontology go-basic.obo --corpus corpus.json --strategy ancestor-mean --metric resnik GO:0006915 GO:0012501"
    )]
    TermSim(cmd::term_sim::TermSimArgs),

    #[command(
        name = "set-sim",
        about = "Score two term sets",
        long_about = "Score the similarity of two term sets, for example the annotations of two genes.",
        after_help = "EXAMPLES:\n    # Best-match average of Lin scores\n    osim set-sim --ontology go-basic.obo --corpus corpus.json --set-a GO:0006915,GO:0008219 --set-b GO:0012501\n\n    # simGIC with the score matrix of the default metric\n    osim set-sim --ontology go-basic.obo --corpus corpus.json --set-a GO:0006915 --set-b GO:0012501 --aggregator pesquita-simgic"
    )]
    SetSim(cmd::set_sim::SetSimArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("OSIM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "ontosim=debug,osim=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("OSIM_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let cwd = env::current_dir()?;
    let config = match config::load_config(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(err) => {
            output::render_error(output, &output::CliError::from(&err))?;
            return Err(err);
        }
    };

    match cli.command {
        Commands::Info(ref args) => cmd::info::run_info(args, &config, output),
        Commands::Term(ref args) => cmd::term::run_term(args, &config, output),
        Commands::TermSim(ref args) => cmd::term_sim::run_term_sim(args, &config, output),
        Commands::SetSim(ref args) => cmd::set_sim::run_set_sim(args, &config, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ontosim_core::Propagation;
    use ontosim_similarity::{SetAggregatorKind, SharedInformationKind, TermMetricKind};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["osim", "info", "--ontology", "go.obo", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.output_mode(), OutputMode::Json);
    }

    #[test]
    fn format_flag_parses_value_enum() {
        let cli = Cli::parse_from(["osim", "--format", "text", "info", "--ontology", "go.obo"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn term_takes_positional_file_and_id() {
        let cli = Cli::parse_from(["osim", "term", "go.obo", "GO:0008150"]);
        let Commands::Term(args) = cli.command else {
            panic!("expected term");
        };
        assert_eq!(args.ontology, PathBuf::from("go.obo"));
        assert_eq!(args.term, "GO:0008150");
        assert!(args.corpus.is_none());
    }

    #[test]
    fn term_sim_parses_kind_aliases() {
        let cli = Cli::parse_from([
            "osim",
            "term-sim",
            "--ontology",
            "go.obo",
            "--strategy",
            "grasm",
            "--metric",
            "jc",
            "--propagation",
            "tree",
            "GO:1",
            "GO:2",
        ]);
        let Commands::TermSim(args) = cli.command else {
            panic!("expected term-sim");
        };
        assert_eq!(args.metric.strategy, Some(SharedInformationKind::CoutoGraSm));
        assert_eq!(args.metric.metric, Some(TermMetricKind::JiangConrath));
        assert_eq!(args.model.propagation, Some(Propagation::Tree));
        assert_eq!((args.a.as_str(), args.b.as_str()), ("GO:1", "GO:2"));
    }

    #[test]
    fn set_sim_splits_comma_lists() {
        let cli = Cli::parse_from([
            "osim",
            "set-sim",
            "--ontology",
            "go.obo",
            "--set-a",
            "GO:1,GO:2",
            "--set-b",
            "GO:3",
            "--aggregator",
            "simgic",
        ]);
        let Commands::SetSim(args) = cli.command else {
            panic!("expected set-sim");
        };
        assert_eq!(args.set_a, vec!["GO:1", "GO:2"]);
        assert_eq!(args.set_b, vec!["GO:3"]);
        assert_eq!(args.aggregator, Some(SetAggregatorKind::PesquitaSimGic));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let parsed = Cli::try_parse_from([
            "osim",
            "term-sim",
            "--ontology",
            "go.obo",
            "--strategy",
            "nearest",
            "GO:1",
            "GO:2",
        ]);
        assert!(parsed.is_err());
    }
}
