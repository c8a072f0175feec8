mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_OUTPUT_ERROR};
use stackmod_schema::DEFAULT_INSTALL_PREFIX;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "stackmod",
    version,
    about = "Normalize cluster package configurations into Lmod module files"
)]
struct Cli {
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

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write one module file per cluster into <outdir>/cluster.
    Generate {
        /// Cluster configuration file (.yml, .yaml or .toml).
        config: PathBuf,
        /// Output directory; its `cluster` subdirectory is recreated.
        outdir: PathBuf,
        /// Prefix of the installation root in generated module files.
        #[arg(long, default_value = DEFAULT_INSTALL_PREFIX)]
        prefix: PathBuf,
    },
    /// Check every cluster and report all failures together.
    Validate {
        /// Cluster configuration file (.yml, .yaml or .toml).
        config: PathBuf,
    },
    /// Show the normalized package records of each cluster.
    Show {
        /// Cluster configuration file (.yml, .yaml or .toml).
        config: PathBuf,
        /// Only show this cluster.
        #[arg(long)]
        cluster: Option<String>,
    },
    /// Print the module file of one cluster to stdout.
    Render {
        /// Cluster configuration file (.yml, .yaml or .toml).
        config: PathBuf,
        /// Cluster name as written in the configuration.
        cluster: String,
        /// Prefix of the installation root.
        #[arg(long, default_value = DEFAULT_INSTALL_PREFIX)]
        prefix: PathBuf,
    },
    /// List the packages and versions with a default download URL.
    Registry,
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
            tracing_subscriber::EnvFilter::try_from_env("STACKMOD_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Generate {
            config,
            outdir,
            prefix,
        } => commands::generate::run(&config, &outdir, &prefix, json_output),
        Commands::Validate { config } => commands::validate::run(&config, json_output),
        Commands::Show { config, cluster } => {
            commands::show::run(&config, cluster.as_deref(), json_output)
        }
        Commands::Render {
            config,
            cluster,
            prefix,
        } => commands::render::run(&config, &cluster, &prefix),
        Commands::Registry => commands::registry::run(json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("config error:") {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("output error:") {
                EXIT_OUTPUT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
