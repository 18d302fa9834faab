use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser};
use gcj_core::{process, DateRange, OutputKeys, Settings};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TerminalMode, TermLogger};

/// Convert garbage collection spreadsheets into a JSON calendar.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Arguments {
    /// the directory holding the excel files, e.g. ../calendar_data/2024/xlsx/
    #[arg(long, alias = "excel_dir")]
    pub excel_dir: PathBuf,
    /// the glob pattern of the excel file names, e.g. *.xlsx
    #[arg(long, alias = "excel_name_format")]
    pub excel_name_format: String,
    /// the sheet to read in every excel file
    #[arg(long, alias = "sheet_name")]
    pub sheet_name: String,
    /// the first calendar date as YYYYMMDD, e.g. 20240401
    #[arg(long)]
    pub start: String,
    /// the last calendar date as YYYYMMDD, e.g. 20250331
    #[arg(long)]
    pub end: String,
    /// the JSON file to write, e.g. ../calendar_data/2024/json/calendar_data.json
    #[arg(long, alias = "output_json_file_name")]
    pub output_json_file_name: PathBuf,
    #[command(flatten)]
    pub keys: KeyArgs,
    /// log every processed row and filled date
    #[arg(short, long)]
    pub verbose: bool,
}

/// Key names of the output document.
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// the key of the block list of a district
    #[arg(long, default_value = "subject_block_list")]
    pub subject_block_list_key: String,
    /// the key of a block's name
    #[arg(long, default_value = "subject_block")]
    pub subject_block_key: String,
    /// the key of a block's pronunciation
    #[arg(long, default_value = "subject_block_pronunciation")]
    pub subject_block_pronunciation_key: String,
    /// the key of the calendar of a district
    #[arg(long, default_value = "calendar")]
    pub calendar_key: String,
    /// the value of a scheduled category
    #[arg(long, default_value = "true")]
    pub true_value: String,
    /// the value of an unscheduled category
    #[arg(long, default_value = "false")]
    pub false_value: String,
}

impl From<&KeyArgs> for OutputKeys {
    fn from(value: &KeyArgs) -> Self {
        OutputKeys {
            subject_block_list: value.subject_block_list_key.clone(),
            subject_block: value.subject_block_key.clone(),
            subject_block_pronunciation: value.subject_block_pronunciation_key.clone(),
            calendar: value.calendar_key.clone(),
            true_value: value.true_value.clone(),
            false_value: value.false_value.clone(),
        }
    }
}

impl Arguments {
    fn settings(&self, range: DateRange) -> Settings {
        Settings {
            source_dir: self.excel_dir.clone(),
            file_pattern: self.excel_name_format.clone(),
            sheet_name: self.sheet_name.clone(),
            range,
            output: self.output_json_file_name.clone(),
            keys: OutputKeys::from(&self.keys),
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Arguments::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let range = match DateRange::parse(&args.start, &args.end) {
        Ok(range) => range,
        Err(err) => {
            log::error!("Error: start or end date is invalid format: {err}");
            log::error!("current start date: {}", args.start);
            log::error!("current end date: {}", args.end);
            return Ok(ExitCode::FAILURE);
        }
    };

    let summary = process(&args.settings(range)).with_context(|| {
        format!(
            "failed to build {} from {}",
            args.output_json_file_name.display(),
            args.excel_dir.display()
        )
    })?;
    log::info!(
        "{} files, {} rows, {} districts, {} dates without pickup",
        summary.files,
        summary.rows,
        summary.districts,
        summary.filled_dates
    );
    Ok(ExitCode::SUCCESS)
}
