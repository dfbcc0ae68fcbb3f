//! depnet CLI - Dependency Network Views
//!
//! Scans source trees into package records and turns records into an
//! interactive dependency network.
//!
//! Usage:
//!   depnet scan <DIR> <python|plsql> [-o data.json]
//!   depnet analyze [OPTIONS]

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dependency_network::{
    CompiledConfig, FixedDisplay, Language, RenderSummary, Summary, TableSource, ViewOptions,
    create_network_view, generate_json_summary, generate_summary, load_compiled_config,
    load_or_build, load_records, preview_network_view, scan_directory, write_csv, write_records,
    web::{AppState, ServerConfig, start_server},
};

/// depnet - See which packages reference which
#[derive(Parser, Debug)]
#[command(name = "depnet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a source tree and write package records
    Scan(ScanArgs),
    /// Build the reference table and network view from package records
    Analyze(AnalyzeArgs),
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Directory to scan
    directory: PathBuf,

    /// Source language
    #[arg(value_enum)]
    language: Language,

    /// Output file for the records (default: [files].input from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path (default: search for .depnet.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Records file (default: [files].input from config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Rebuild the reference table instead of reusing the cache
    #[arg(long)]
    no_cache: bool,

    /// Write the reference table as CSV
    #[arg(long)]
    create_csv: bool,

    /// Write the interactive network view
    #[arg(long)]
    create_network_view: bool,

    /// Scale node sizes by line count
    #[arg(long)]
    dynamic_node_size: bool,

    /// Scale edge widths by weight
    #[arg(long)]
    dynamic_edge_size: bool,

    /// Minimum reference position for an edge to be drawn
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Display width the view is laid out for
    #[arg(long)]
    width: Option<u32>,

    /// Display height the view is laid out for
    #[arg(long)]
    height: Option<u32>,

    /// Output file for the network view (default: [files].view from config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Serve the view from a local web server instead of writing a file
    #[arg(long, conflicts_with = "create_network_view")]
    serve: bool,

    /// Port for the web server
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Don't open the view in a browser
    #[arg(long)]
    no_open: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Config file path (default: search for .depnet.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show timing information
    #[arg(long)]
    timing: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Analyze(args) => run_analyze(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config_or_default(explicit: Option<&Path>, fallback: &Path) -> CompiledConfig {
    let config_path = explicit.unwrap_or(fallback);
    match load_compiled_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "No config file loaded");
            CompiledConfig::empty()
        }
    }
}

fn run_scan(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_or_default(args.config.as_deref(), &args.directory);
    let output = args.output.unwrap_or_else(|| config.files.input.clone());

    eprintln!(
        "Scanning '{}' for {:?} sources...",
        args.directory.display(),
        args.language
    );

    let start = Instant::now();
    let records = scan_directory(&args.directory, args.language, &config)?;
    write_records(&output, &records)?;

    eprintln!(
        "Wrote {} packages to '{}' (took {:.2?})",
        records.len(),
        output.display(),
        start.elapsed()
    );

    Ok(())
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let total_start = Instant::now();
    let config = load_config_or_default(args.config.as_deref(), Path::new("."));

    // CLI args override config, which overrides defaults
    let input = args.input.clone().unwrap_or_else(|| config.files.input.clone());
    let view_path = args.output.clone().unwrap_or_else(|| config.files.view.clone());
    let options = ViewOptions {
        threshold: args.limit.unwrap_or(config.graph.threshold),
        dynamic_node_size: args.dynamic_node_size || config.graph.dynamic_node_size,
        dynamic_edge_size: args.dynamic_edge_size || config.graph.dynamic_edge_size,
    };
    let mut viewport = config.display.viewport();
    if let Some(width) = args.width {
        viewport.width = width;
    }
    if let Some(height) = args.height {
        viewport.height = height;
    }

    let records = load_records(&input)?;
    eprintln!("Loaded {} packages from '{}'", records.len(), input.display());

    let (table, source) = load_or_build(&records, &config.files.cache, args.no_cache)?;
    if source == TableSource::Records {
        eprintln!(
            "Unable to use cache '{}', built it from '{}'",
            config.files.cache.display(),
            input.display()
        );
    }

    if args.create_csv {
        write_csv(&config.files.csv, &table)?;
        eprintln!("Data saved to '{}'", config.files.csv.display());
    }

    if args.serve {
        let (graph, render) = preview_network_view(&records, &options, FixedDisplay(viewport));
        let summary = graph.summary(options.threshold, records.len());
        print_summary(&summary, Some(&render), args.json)?;

        let state = AppState {
            graph,
            summary,
            display: viewport,
            dynamic_edge_size: options.dynamic_edge_size,
        };
        let server_config = ServerConfig {
            port: args.port,
            open_browser: !args.no_open,
        };

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(start_server(state, server_config))
            .map_err(|e| -> Box<dyn std::error::Error> { e })?;

        return Ok(());
    }

    if args.create_network_view {
        let render_start = Instant::now();
        let (graph, render) =
            create_network_view(&records, &options, FixedDisplay(viewport), &view_path)?;
        let summary = graph.summary(options.threshold, records.len());

        print_summary(&summary, Some(&render), args.json)?;
        eprintln!("Network view written to: {}", view_path.display());

        if args.timing {
            eprintln!("Graph and view built in {:.2?}", render_start.elapsed());
        }

        if !args.no_open {
            if let Err(e) = open::that(&view_path) {
                tracing::warn!(error = %e, "Could not open the network view");
            }
        }
    } else if !args.create_csv {
        eprintln!("Nothing to output; pass --create-network-view, --create-csv or --serve");
    }

    if args.timing {
        eprintln!("Total time: {:.2?}", total_start.elapsed());
    }

    Ok(())
}

fn print_summary(
    summary: &Summary,
    render: Option<&RenderSummary>,
    json: bool,
) -> std::io::Result<()> {
    let mut writer = stdout();
    if json {
        generate_json_summary(summary, render, &mut writer)
    } else {
        generate_summary(summary, render, &mut writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_conflicts_with_view_file() {
        let result = Cli::try_parse_from(["depnet", "analyze", "--serve", "--create-network-view"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );

        let cli = Cli::try_parse_from(["depnet", "analyze", "--serve", "--create-csv"]).unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert!(args.serve && args.create_csv);
    }
}
