mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use commands::check::CheckArgs;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use reqsync_core::Config;
use reqsync_schema::ManifestFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "reqsync",
    version,
    about = "Verify that Pipfile.lock and requirements.txt pin the same packages"
)]
struct Cli {
    /// Path to a reqsync.toml config file (default: ./reqsync.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Lock,
    Requirements,
}

impl From<FormatArg> for ManifestFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Lock => ManifestFormat::Lock,
            FormatArg::Requirements => ManifestFormat::Requirements,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a lock file against a requirements file; exit 1 on mismatch.
    Check {
        /// Path to the JSON lock file (overrides config).
        #[arg(long)]
        lock: Option<PathBuf>,
        /// Path to the requirements file (overrides config).
        #[arg(long)]
        requirements: Option<PathBuf>,
        /// Also include the lock file's develop section.
        #[arg(long, default_value_t = false)]
        dev: bool,
    },
    /// Print the canonical package list of one manifest.
    Show {
        /// Manifest to read.
        path: PathBuf,
        /// Manifest format (default: lock for *.lock files, requirements otherwise).
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Also include the lock file's develop section.
        #[arg(long, default_value_t = false)]
        dev: bool,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    Config::discover(explicit, Path::new(".")).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("REQSYNC_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Check {
            lock,
            requirements,
            dev,
        } => load_config(config_path).and_then(|config| {
            commands::check::run(
                config,
                CheckArgs {
                    lock,
                    requirements,
                    dev,
                },
                json_output,
            )
        }),
        Commands::Show { path, format, dev } => load_config(config_path).and_then(|config| {
            commands::show::run(
                &path,
                format.map(ManifestFormat::from),
                &config.sections,
                dev,
                json_output,
            )
        }),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:")
                || msg.starts_with("failed to parse manifest")
                || msg.starts_with("failed to read manifest")
            {
                EXIT_MANIFEST_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
