// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::too_many_lines,
    clippy::fn_params_excessive_bools,
    clippy::unnecessary_wraps,
    clippy::needless_pass_by_value
)]

use std::io::Read;
use std::path::Path;

use clap::Parser;
use serde::Serialize;

use textpart::batch;
use textpart::cli::commands::{Cli, Command, PartitionArgs};
use textpart::cli::output;
use textpart::config::Config;
use textpart::partition::{self, classifier, Sources};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable JSON.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> CmdResult {
    match cli.command {
        Command::Partition {
            path,
            text,
            stdin,
            opts,
        } => cmd_partition(path.as_deref(), text.as_deref(), stdin, &opts),
        Command::Batch { dir, opts } => cmd_batch(&dir, &opts),
        Command::Classify { text } => cmd_classify(&text),
        Command::Init { force } => cmd_init(force),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config() -> Result<Config, Box<dyn std::fmt::Display>> {
    Config::from_cwd().map_err(map_err)
}

fn cmd_partition(
    path: Option<&str>,
    text: Option<&str>,
    stdin: bool,
    opts: &PartitionArgs,
) -> CmdResult {
    let config = get_config()?;
    let settings = &config.settings.partition;
    let options = opts.to_options(settings).map_err(map_err)?;
    let pretty = opts.pretty || config.settings.output.is_pretty();

    let mut stdin_handle = std::io::stdin().lock();
    let sources = Sources {
        text,
        file: if stdin {
            Some(&mut stdin_handle as &mut dyn Read)
        } else {
            None
        },
        filename: path.map(Path::new),
        encoding: opts.encoding(settings),
    };

    let elements = partition::partition_text(sources, &options).map_err(map_err)?;
    println!("{}", output::format_output(&elements, pretty));
    Ok(())
}

fn cmd_batch(dir: &str, opts: &PartitionArgs) -> CmdResult {
    let config = get_config()?;
    let settings = &config.settings.partition;
    let options = opts.to_options(settings).map_err(map_err)?;
    let pretty = opts.pretty || config.settings.output.is_pretty();

    let scanner = config.scanner(dir);
    let report = batch::partition_directory(&scanner, &options, opts.encoding(settings))
        .map_err(map_err)?;
    println!("{}", output::format_output(&report, pretty));
    Ok(())
}

fn cmd_classify(text: &str) -> CmdResult {
    #[derive(Serialize)]
    struct ClassifyOutput<'a> {
        text: &'a str,
        #[serde(rename = "type")]
        kind: &'static str,
    }

    let classification = classifier::classify(text);
    let out = ClassifyOutput {
        text: text.trim(),
        kind: classification.as_str(),
    };
    println!("{}", output::format_json(&out));
    Ok(())
}

fn cmd_init(force: bool) -> CmdResult {
    let config = get_config()?;
    if config.config_exists() && !force {
        return Err(map_err(format!(
            "config already exists: {} (use --force to overwrite)",
            config.config_path.display()
        )));
    }

    let mut config = config;
    config.settings = textpart::config::UserSettings::default();
    config.save_settings().map_err(map_err)?;

    #[derive(Serialize)]
    struct InitOutput {
        created: String,
    }
    println!(
        "{}",
        output::format_json(&InitOutput {
            created: config.relative_path(&config.config_path),
        })
    );
    Ok(())
}
