use anyhow::Result;
use clap::{Parser, ValueEnum};
use serpyco_core::{
    app_paths, apply_plan, collect_inputs, generate_plan, load_config, read_capture_dates,
    AppConfig, ApplyOptions, ApplyResult, CollectOptions, MetadataError, NamingMode, PlanError,
    PlanOptions, RenamePlan,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status when at least one file had no usable date.
const EXIT_METADATA_ERRORS: u8 = 100;

#[derive(Debug, Parser)]
#[command(name = "serpyco", version)]
#[command(about = "Renames photos chronologically according to the date in their EXIF metadata")]
struct Cli {
    /// Photos to rename; directories are expanded to the photos they hold
    #[arg(value_name = "PATH", required_unless_present = "show_config")]
    paths: Vec<PathBuf>,

    /// Use each photo's date as destination filename
    #[arg(short, long)]
    date_as_filename: bool,

    /// Rename files even if errors occurred
    #[arg(short, long)]
    ignore_errors: bool,

    /// Simulate and print what changes would be made
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Prefix for renamed files [default: "DSC_"]
    #[arg(short, long)]
    prefix: Option<String>,

    /// First number of the sequence [default: 1]
    #[arg(short, long, value_name = "N")]
    start: Option<usize>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Also take hidden files when expanding directories
    #[arg(long)]
    include_hidden: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Read defaults from this file instead of the per-user config
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Log every file read and rename
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print errors only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    if cli.show_config {
        cmd_show_config(&cli, &config)?;
        return Ok(ExitCode::SUCCESS);
    }
    cmd_rename(&cli, &config)
}

fn cmd_rename(cli: &Cli, config: &AppConfig) -> Result<ExitCode> {
    let collect = CollectOptions {
        recursive: cli.recursive || config.recursive_default,
        include_hidden: cli.include_hidden || config.include_hidden_default,
    };
    let inputs = collect_inputs(&cli.paths, &collect)?;
    log::debug!("collected {:?}", inputs.stats);

    let scan = read_capture_dates(&inputs.files);
    let failures: Vec<MetadataError> = inputs.failures.into_iter().chain(scan.failures).collect();
    report_failures(&failures);

    if scan.entries.is_empty() {
        if failures.is_empty() {
            return Err(PlanError::NoEntries.into());
        }
        eprintln!("\nNo file could be read, no change has been made.");
        return Ok(ExitCode::from(EXIT_METADATA_ERRORS));
    }

    let options = PlanOptions {
        prefix: cli.prefix.clone().unwrap_or_else(|| config.prefix.clone()),
        mode: if cli.date_as_filename {
            NamingMode::DateAsName
        } else {
            NamingMode::Sequential
        },
        start_index: cli.start.unwrap_or(config.start_index),
    };
    let plan = generate_plan(scan.entries, &options)?;

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Table => print_table(&plan),
    }

    let has_errors = !failures.is_empty();
    if has_errors && !cli.ignore_errors {
        // Nothing will be renamed, so occupied targets are not checked either.
        report_no_change();
        return Ok(ExitCode::from(EXIT_METADATA_ERRORS));
    }

    let result = apply_plan(&plan, &ApplyOptions { dry_run: cli.dry_run })?;

    if has_errors {
        if cli.dry_run {
            report_no_change();
        } else {
            eprintln!(
                "\nOne or more errors have occurred. Problematic files have been ignored,\n\
                 and the rest have been renamed."
            );
        }
        return Ok(ExitCode::from(EXIT_METADATA_ERRORS));
    }

    if !cli.quiet {
        print_summary(&result);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_show_config(cli: &Cli, config: &AppConfig) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => app_paths()?.config_path,
    };
    println!("config file: {}", path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn report_failures(failures: &[MetadataError]) {
    for failure in failures {
        eprintln!("{failure}");
        eprintln!("{} will be ignored", failure.path().display());
    }
}

fn report_no_change() {
    eprintln!(
        "\nOne or more errors have occurred, no change has been made.\n\
         If you want to rename the files anyway use the -i option (without -n)."
    );
}

fn print_table(plan: &RenamePlan) {
    for entry in &plan.entries {
        println!(
            "{} ---> {}",
            entry.original_path.display(),
            entry.target_path.display()
        );
    }
}

fn print_summary(result: &ApplyResult) {
    if result.dry_run {
        eprintln!(
            "dry run: {} file(s) would be renamed ({} unchanged), nothing was changed",
            result.changed, result.unchanged
        );
    } else {
        eprintln!(
            "renamed {} file(s) ({} unchanged)",
            result.changed, result.unchanged
        );
    }
}
