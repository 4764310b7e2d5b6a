use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use editor_report::config::SchemaConfig;
use editor_report::report;
use editor_report::tracker::{CountType, ManuscriptTable, load_table};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "editor-report",
    about = "Editor performance reports from manuscript-tracking exports"
)]
pub struct Cli {
    /// Directory holding fields.json, pending_status.json and editors.json
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the performance report for one editor, or for every configured editor
    Report {
        /// Exported spreadsheet (.xlsx, .xls, .ods or .csv). Without it the
        /// required-column instructions are printed.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Associate editor to report on
        #[arg(short, long, conflicts_with = "all")]
        editor: Option<String>,

        /// Report on every configured editor
        #[arg(long)]
        all: bool,

        /// Report year. Defaults to the year before the latest submission.
        #[arg(short, long)]
        year: Option<i32>,

        /// Print only one count (total, original, revised or pending)
        #[arg(short, long)]
        count_type: Option<CountType>,
    },
    /// Count submissions received in a year or a date window
    Submissions {
        /// Exported spreadsheet (.xlsx, .xls, .ods or .csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Submission year. Defaults to the report year.
        #[arg(short, long)]
        year: Option<i32>,

        /// Start of a submission-date window (YYYY-MM-DD, inclusive)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// End of a submission-date window (YYYY-MM-DD, inclusive)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// List the columns the export must contain
    Columns,
    /// List the configured editors
    Editors,
}

pub fn run_command(command: Commands, config_dir: &Path) -> Result<()> {
    let config = SchemaConfig::load(config_dir)
        .with_context(|| format!("Failed to load configuration from {}", config_dir.display()))?;

    match command {
        Commands::Report {
            file,
            editor,
            all,
            year,
            count_type,
        } => handle_report(&config, file.as_deref(), editor, all, year, count_type),
        Commands::Submissions {
            file,
            year,
            from,
            to,
        } => handle_submissions(&config, &file, year, from, to),
        Commands::Columns => {
            print!("{}", report::format_instructions(config.columns()));
            Ok(())
        }
        Commands::Editors => {
            for editor in config.editors() {
                println!("{editor}");
            }
            Ok(())
        }
    }
}

fn load(config: &SchemaConfig, file: &Path) -> Result<ManuscriptTable> {
    load_table(file, config).with_context(|| format!("Failed to load {}", file.display()))
}

fn handle_report(
    config: &SchemaConfig,
    file: Option<&Path>,
    editor: Option<String>,
    all: bool,
    year: Option<i32>,
    count_type: Option<CountType>,
) -> Result<()> {
    let Some(file) = file else {
        print!("{}", report::format_instructions(config.columns()));
        return Ok(());
    };

    let editors: Vec<String> = match editor {
        Some(editor) => vec![editor],
        None if all => config.editors().to_vec(),
        None => anyhow::bail!("Choose an editor with --editor, or pass --all"),
    };

    let table = load(config, file)?;
    let year = match year {
        Some(year) => year,
        None => table.report_year()?,
    };
    let present = table.editors_present()?;
    let mut blocks = Vec::with_capacity(editors.len());
    for editor in &editors {
        if !present.contains(editor) {
            log::warn!("Editor '{editor}' has no manuscripts in {}", file.display());
        }
        let block = match count_type {
            Some(count_type) => {
                config.require_editor(editor)?;
                let line = report::format_report_line(&table, editor, year, count_type)?;
                format!("{editor}\n{line}")
            }
            None => report::render(config, Some(&table), editor, Some(year))?,
        };
        blocks.push(block);
    }

    println!("{}", blocks.join("\n"));
    Ok(())
}

fn handle_submissions(
    config: &SchemaConfig,
    file: &Path,
    year: Option<i32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let table = load(config, file)?;

    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            anyhow::bail!("--from {from} is after --to {to}");
        }
        print!("{}", report::format_date_range_summary(&table, from, to)?);
    }

    let year = match year {
        Some(year) => year,
        None => table.report_year()?,
    };
    print!("{}", report::format_submission_summary(&table, year)?);
    Ok(())
}
