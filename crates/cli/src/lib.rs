use anyhow::{Context, Result};
use attrscan_analyzer::{
    debug_file, debug_suspect_files, Analyzer, AnalyzerConfig, ManifestRegistry,
    StructuralErrorPolicy,
};
use attrscan_protocol::snapshot_schema;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

mod report;

pub use report::View;

/// Exit status when `--fail-on-findings` is set and the validation view is non-empty
pub const FINDINGS_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "attrscan")]
#[command(about = "Find PHP attributes whose defining class does not resolve", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file or directory and print the report as JSON
    Analyze(AnalyzeArgs),

    /// Print the significant tokens of one source file
    Tokens(TokensArgs),

    /// Analyze, then print token dumps of every suspect file
    #[command(name = "debug-suspects")]
    DebugSuspects(DebugSuspectsArgs),

    /// Print the JSON schema of the full report
    Schema,
}

#[derive(Args)]
struct RunArgs {
    /// File or directory to analyze
    path: PathBuf,

    /// Registry manifest (JSON dump of the loaded type environment)
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Analyzer config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Honor .gitignore files
    #[arg(long)]
    respect_gitignore: bool,

    /// Exclude root-relative paths matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// What to do with late namespaces and repeated declarations
    #[arg(long, value_enum)]
    structural_errors: Option<PolicyFlag>,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Report view
    #[arg(long, value_enum, default_value_t = View::Full)]
    view: View,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Exit with status 2 when the validation view is not empty
    #[arg(long)]
    fail_on_findings: bool,
}

#[derive(Args)]
struct TokensArgs {
    /// Source file
    file: PathBuf,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct DebugSuspectsArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum PolicyFlag {
    Abort,
    Suspect,
}

impl From<PolicyFlag> for StructuralErrorPolicy {
    fn from(flag: PolicyFlag) -> Self {
        match flag {
            PolicyFlag::Abort => StructuralErrorPolicy::Abort,
            PolicyFlag::Suspect => StructuralErrorPolicy::Suspect,
        }
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Tokens(args) => run_tokens(args),
        Commands::DebugSuspects(args) => run_debug_suspects(args),
        Commands::Schema => {
            println!("{}", report::render(&snapshot_schema(), true)?);
            Ok(())
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(&args.run)?;
    let registry = load_registry(args.run.registry.as_deref())?;
    let analyzer = Analyzer::new(&registry, config).context("Invalid analyzer configuration")?;
    let report = analyzer
        .analyze(&args.run.path)
        .with_context(|| format!("Failed to analyze {}", args.run.path.display()))?;

    println!("{}", report::render_report(&report, args.view, args.pretty)?);
    log::info!("{}", report::summary(&report));

    if args.fail_on_findings && !report.is_clean() {
        std::process::exit(FINDINGS_EXIT_CODE);
    }
    Ok(())
}

fn run_tokens(args: TokensArgs) -> Result<()> {
    let dump = debug_file(&args.file, &AnalyzerConfig::default())
        .with_context(|| format!("Failed to tokenize {}", args.file.display()))?;
    println!("{}", report::render(&dump, args.pretty)?);
    Ok(())
}

fn run_debug_suspects(args: DebugSuspectsArgs) -> Result<()> {
    let config = load_config(&args.run)?;
    let registry = load_registry(args.run.registry.as_deref())?;
    let analyzer = Analyzer::new(&registry, config).context("Invalid analyzer configuration")?;
    let report = analyzer
        .analyze(&args.run.path)
        .with_context(|| format!("Failed to analyze {}", args.run.path.display()))?;

    let dumps = debug_suspect_files(&report, analyzer.config())?;
    log::info!("{} suspect file(s)", dumps.len());
    println!("{}", report::render(&dumps, args.pretty)?);
    Ok(())
}

/// Config file first, then flags on top
fn load_config(args: &RunArgs) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if args.respect_gitignore {
        config.respect_gitignore = true;
    }
    config.exclude.extend(args.exclude.iter().cloned());
    if let Some(policy) = args.structural_errors {
        config.structural_errors = policy.into();
    }
    Ok(config)
}

fn load_registry(path: Option<&Path>) -> Result<ManifestRegistry> {
    match path {
        Some(path) => ManifestRegistry::from_json_file(path)
            .with_context(|| format!("Failed to load registry {}", path.display())),
        None => {
            log::warn!("No --registry given; every class will be reported as not found");
            Ok(ManifestRegistry::new())
        }
    }
}
