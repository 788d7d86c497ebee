use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use osm_tabular::keys::DEFAULT_KIND;
use osm_tabular::reader::find_default_input;
use osm_tabular::{audit_street_types, count_tags, export, MatchMode, Result, ShapeConfig, StreetFix};

#[derive(Debug, Parser)]
#[command(
    name = "osm-tabular",
    version,
    about = "Flatten OpenStreetMap exports into CSV tables for bulk loading"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level. Falls back to RUST_LOG, then info.
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write nodes, ways, way members and tags to five CSV files.
    Export(ExportArgs),
    /// List street suffixes outside the expected vocabulary.
    Audit(InputArgs),
    /// Count XML element names in an .osm file.
    Count(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Path to a .osm or .pbf file. Defaults to the only one in the current folder.
    #[arg(long, short, env = "OSM_TABULAR_INPUT", value_name = "FILE")]
    input: Option<PathBuf>,
}

impl InputArgs {
    fn resolve(self) -> Result<PathBuf> {
        match self.input {
            Some(path) => Ok(path),
            None => {
                let cwd = env::current_dir().map_err(|source| osm_tabular::Error::Open {
                    path: PathBuf::from("."),
                    source,
                })?;
                find_default_input(&cwd)
            }
        }
    }
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory receiving nodes.csv, nodes_tags.csv, ways.csv, ways_nodes.csv and ways_tags.csv.
    #[arg(long, short, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Normalize addr:street values instead of the "street" key fragment.
    #[arg(long)]
    fix_street_values: bool,

    /// Expand abbreviations found anywhere, including inside longer words.
    #[arg(long)]
    substring_match: bool,

    /// Type recorded for tag keys without a namespace.
    #[arg(long, default_value = DEFAULT_KIND, value_name = "TYPE")]
    default_type: String,
}

impl ExportArgs {
    fn shape_config(&self) -> ShapeConfig {
        ShapeConfig {
            default_kind: self.default_type.clone(),
            street_fix: if self.fix_street_values {
                StreetFix::Value
            } else {
                StreetFix::KeyFragment
            },
            match_mode: if self.substring_match {
                MatchMode::Substring
            } else {
                MatchMode::Word
            },
            ..ShapeConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn init_logging(level: Option<LogLevel>) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = level {
        builder.filter_level(level.into());
    }
    builder
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Export(args) => {
            let config = args.shape_config();
            let input = args.input.resolve()?;
            export(&input, &args.output_dir, &config)?;
        }
        Command::Audit(args) => {
            let audit = audit_street_types(&args.resolve()?)?;
            for (suffix, names) in audit.iter() {
                println!("{suffix}");
                for name in names {
                    println!("    {name}");
                }
            }
        }
        Command::Count(args) => {
            for (name, count) in count_tags(&args.resolve()?)? {
                println!("{name}: {count}");
            }
        }
    }
    Ok(())
}
