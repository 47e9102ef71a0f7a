use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::merge::{merge_records, write_json, FormatDateParser, MergeOptions};
use crate::models::Record;
use crate::parser::parse_directory;
use crate::snapshot::{read_snapshot, write_snapshot};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line definition.
///
/// - `parse`: discover exports under a directory and write the record snapshot
/// - `merge`: read a snapshot, optionally dedupe, resolve timestamps, sort, write JSON
/// - `toml`: run both stages from a TOML configuration file
pub fn build_cli() -> Command<'static> {
    Command::new("sms-merge")
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("parse")
                .about("Parse call/SMS exports under a directory into a snapshot")
                .after_help("Example:\n  sms-merge parse ~/backups -o all.snapshot -w 8")
                .arg(
                    Arg::new("dir")
                        .help("Directory searched recursively for calls*.xml / sms*.xml[.xz|.gz]")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Snapshot file to write")
                        .default_value(DEFAULT_SNAPSHOT_PATH)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .help("Files parsed in parallel")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("merge")
                .about("Deduplicate, timestamp and sort a snapshot into JSON")
                .after_help("Example:\n  sms-merge merge -i all.snapshot -d -p dedup.snapshot -j data.json")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .help("Snapshot file to read")
                        .default_value(DEFAULT_SNAPSHOT_PATH)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("dedupe")
                        .short('d')
                        .long("dedupe")
                        .help("Collapse records with identical content")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("output_snapshot")
                        .short('p')
                        .long("output-snapshot")
                        .help("Also write the deduplicated records to this snapshot (needs --dedupe)")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output_json")
                        .short('j')
                        .long("output-json")
                        .help("JSON file to write")
                        .default_value(DEFAULT_OUTPUT_JSON)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("date_field")
                        .long("date-field")
                        .help("Attribute holding each record's human-readable date")
                        .default_value(DEFAULT_DATE_FIELD)
                        .value_parser(clap::value_parser!(String))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("timezone")
                        .long("timezone")
                        .help("Zone for dates without an offset: 'local', 'utc' or e.g. '+02:00'")
                        .default_value(DEFAULT_TIMEZONE)
                        .value_parser(clap::value_parser!(String))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Run parse and merge using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Parses process arguments and runs the selected subcommand.
pub fn cli() -> AppResult<()> {
    let matches = build_cli().get_matches();
    dispatch(&matches)
}

/// Runs the subcommand selected in `matches`; prints help when there is none.
pub fn dispatch(matches: &ArgMatches) -> AppResult<()> {
    match matches.subcommand() {
        Some(("parse", sub)) => {
            let (dir, config) = parse_args(sub)?;
            run_parse(&dir, &config)?;
        }
        Some(("merge", sub)) => {
            let (input, config) = merge_args(sub)?;
            let records = read_snapshot(&input)?;
            run_merge(records, &config)?;
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("Missing config path".into()))?;
            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            info!(config = %config_path.display(), "Running full pipeline");

            let records = run_parse(&file_config.input_dir, &file_config.pipeline)?;
            run_merge(records, &file_config.pipeline)?;
        }
        _ => {
            build_cli()
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }
    Ok(())
}

fn parse_args(sub: &ArgMatches) -> AppResult<(PathBuf, ResolvedConfig)> {
    let dir = sub
        .get_one::<PathBuf>("dir")
        .cloned()
        .ok_or_else(|| AppError::InvalidInput("Missing input directory".into()))?;

    let mut config = ResolvedConfig::default();
    if let Some(path) = sub.get_one::<PathBuf>("output") {
        config.snapshot_path = path.clone();
    }
    if let Some(&workers) = sub.get_one::<usize>("workers") {
        config.workers = workers;
    }
    config.validate()?;
    Ok((dir, config))
}

fn merge_args(sub: &ArgMatches) -> AppResult<(PathBuf, ResolvedConfig)> {
    let input = sub
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

    let dedupe = sub.get_one::<bool>("dedupe").copied().unwrap_or(false);
    let dedupe_snapshot_path = sub.get_one::<PathBuf>("output_snapshot").cloned();

    let mut config = ResolvedConfig {
        dedupe,
        dedupe_snapshot_path,
        ..ResolvedConfig::default()
    };
    if let Some(path) = sub.get_one::<PathBuf>("output_json") {
        config.output_json = path.clone();
    }
    if let Some(field) = sub.get_one::<String>("date_field") {
        config.date_field = field.clone();
    }
    if let Some(zone) = sub.get_one::<String>("timezone") {
        config.timezone = zone.clone();
    }
    config.validate()?;
    Ok((input, config))
}

/// Discover + parse stage: flattens every export under `input_dir` and writes the
/// snapshot configured in `config`. Returns the parsed records.
pub fn run_parse(input_dir: &Path, config: &ResolvedConfig) -> AppResult<Vec<Record>> {
    let outcome = parse_directory(input_dir, config.workers)?;
    write_snapshot(&config.snapshot_path, &outcome.records)?;
    Ok(outcome.records)
}

/// Dedupe + merge + sort stage: writes the JSON dataset configured in `config`.
/// Returns the number of records written.
///
/// Nothing is written if any record's date fails to resolve.
pub fn run_merge(records: Vec<Record>, config: &ResolvedConfig) -> AppResult<usize> {
    let parser = FormatDateParser::from_config(config)?;
    let options = MergeOptions::from(config);

    let merged = merge_records(records, &options, &parser)?;
    write_json(&config.output_json, &merged)?;

    info!(
        records = merged.len(),
        output = %config.output_json.display(),
        "All operations completed successfully"
    );
    Ok(merged.len())
}
