// ==========================================
// 会议程序构建器 - 命令行入口
// ==========================================
// 子命令: sheets / init-config / preview / build
// 输出: 结果 JSON 写 stdout，日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use program_builder::api::{write_artifact, BuildReport, WorkbookSession};
use program_builder::config::{AppSettings, BuildConfig};
use program_builder::engine::{ProgramPipeline, SponsorDetection};
use program_builder::importer::{GoogleSheetSource, LocalFileSource, UploadSource, WorkbookSource};
use program_builder::logging::{self, LogFormat};
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

/// Spreadsheet → event program JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Local spreadsheet (.xlsx, .xlsm, .xlsb, .xls, .ods, .csv)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Google Sheets share URL (downloaded as XLSX)
    #[arg(long)]
    google_url: Option<String>,

    /// Read the workbook bytes from stdin, using NAME for its format
    #[arg(long, value_name = "NAME")]
    stdin_as: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every sheet's columns and guessed mapping.
    Sheets {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write a skeleton build config from the guessed mappings.
    InitConfig {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the preview response for a build config.
    Preview {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "logo-key")]
        sponsor_detection: SponsorDetection,
    },
    /// Write the program JSON, or print the errors that block it.
    Build {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        config: PathBuf,
        /// Output path (defaults to PROGRAM_BUILDER_OUTPUT_FILE or program.json)
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value = "logo-key")]
        sponsor_detection: SponsorDetection,
    },
}

fn open_source(args: &SourceArgs, settings: &AppSettings) -> Result<Box<dyn WorkbookSource>> {
    if let Some(path) = &args.file {
        return Ok(Box::new(LocalFileSource::new(path.clone())));
    }
    if let Some(url) = &args.google_url {
        return Ok(Box::new(
            GoogleSheetSource::new(url.clone()).with_timeout(settings.fetch_timeout),
        ));
    }
    if let Some(name) = &args.stdin_as {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read workbook from stdin")?;
        return Ok(Box::new(UploadSource::new(name.clone(), bytes)));
    }
    anyhow::bail!("one of --file, --google-url or --stdin-as is required")
}

async fn open_session(
    args: &SourceArgs,
    settings: &AppSettings,
    detection: SponsorDetection,
) -> Result<WorkbookSession> {
    let source = open_source(args, settings)?;
    let mut session = WorkbookSession::new(ProgramPipeline::new(detection));
    session.load(source.as_ref()).await?;
    Ok(session)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_with_format(if cli.log_json { LogFormat::Json } else { LogFormat::Text });

    let settings = AppSettings::from_env();
    tracing::info!(version = program_builder::VERSION, "program-builder 启动");

    match cli.command {
        Commands::Sheets { source } => {
            let session = open_session(&source, &settings, SponsorDetection::default()).await?;
            print_json(&session.sheets())?;
        }
        Commands::InitConfig { source, out } => {
            let session = open_session(&source, &settings, SponsorDetection::default()).await?;
            let config = BuildConfig::from_guess(&session.sheets());
            write_artifact(&out, &serde_json::to_string_pretty(&config)?)?;
            eprintln!("Config skeleton written to {}", out.display());
        }
        Commands::Preview {
            source,
            config,
            sponsor_detection,
        } => {
            let config = BuildConfig::from_path(&config)?;
            let session = open_session(&source, &settings, sponsor_detection).await?;
            print_json(&session.preview(&config)?)?;
        }
        Commands::Build {
            source,
            config,
            out,
            sponsor_detection,
        } => {
            let config = BuildConfig::from_path(&config)?;
            let out = out.unwrap_or_else(|| PathBuf::from(&settings.output_file));
            let session = open_session(&source, &settings, sponsor_detection).await?;

            match session.build(&config, &out)? {
                BuildReport::Written { path, warnings } => {
                    for warning in &warnings {
                        eprintln!("warning: {}", warning);
                    }
                    eprintln!("Program written to {}", path.display());
                }
                BuildReport::Rejected { errors, warnings } => {
                    print_json(&json!({ "errors": errors, "warnings": warnings }))?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
