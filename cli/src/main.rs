//! untextract CLI - Textract table and caption extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use untextract::output::DEFAULT_OUTPUT_ROOT;
use untextract::render::to_json;
use untextract::service::aws::{AwsConfig, AwsSession};
use untextract::service::{list_documents, upload_folder, DEFAULT_DOCUMENT_SUFFIX};
use untextract::{
    extract_index, index_files, ArtifactPaths, DocumentView, JobStatus, JsonFormat, Pipeline,
    PipelineOptions, PollOptions, RunReport,
};

#[derive(Parser)]
#[command(name = "untextract")]
#[command(version)]
#[command(about = "Extract tables and figure captions from Textract document analysis", long_about = None)]
struct Cli {
    /// Append log output to this file instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    aws: AwsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AwsArgs {
    /// AWS region
    #[arg(long, env = "AWS_REGION", global = true)]
    region: Option<String>,

    /// AWS access key id
    #[arg(long, env = "AWS_ACCESS_KEY", global = true, hide_env_values = true)]
    access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_KEY", global = true, hide_env_values = true)]
    secret_key: Option<String>,

    /// Custom service endpoint (S3-compatible servers, local stacks)
    #[arg(long, value_name = "URL", global = true)]
    endpoint_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze documents end to end: submit, poll, extract, upload
    Run {
        /// Document keys to process (lists the source bucket if omitted)
        #[arg(value_name = "KEY")]
        documents: Vec<String>,

        /// Bucket holding the source documents
        #[arg(long, env = "UNTEXTRACT_SOURCE_BUCKET")]
        source_bucket: String,

        /// Bucket receiving the artifacts
        #[arg(long, env = "UNTEXTRACT_DEST_BUCKET")]
        dest_bucket: Option<String>,

        /// Key prefix used when listing the source bucket
        #[arg(long, default_value = "")]
        prefix: String,

        /// Skip this many listed documents
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Process at most this many documents
        #[arg(long)]
        take: Option<usize>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_ROOT)]
        output: PathBuf,

        /// Keep the raw result pages next to the artifacts
        #[arg(long)]
        save_responses: bool,

        /// Extract locally without uploading
        #[arg(long)]
        no_upload: bool,

        /// Extract whatever a FAILED job returned instead of stopping
        #[arg(long)]
        allow_failed: bool,

        /// Seconds between status queries
        #[arg(long, default_value = "1")]
        interval: u64,

        /// Give up on a job after this many seconds (0 = never)
        #[arg(long, default_value = "3600")]
        max_wait: u64,

        /// Write the run reports as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// List source documents
    #[command(alias = "ls")]
    List {
        /// Bucket to list
        #[arg(long, env = "UNTEXTRACT_SOURCE_BUCKET")]
        bucket: String,

        /// Key prefix
        #[arg(long, default_value = "")]
        prefix: String,

        /// Key suffix
        #[arg(long, default_value = DEFAULT_DOCUMENT_SUFFIX)]
        suffix: String,
    },

    /// Extract from saved result pages without calling the service
    Extract {
        /// JSON files with one response or an array of responses
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Source document name used in filenames and metadata
        #[arg(short, long)]
        name: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_ROOT)]
        output: PathBuf,
    },

    /// Upload a local directory tree
    Upload {
        /// Local directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Destination bucket
        #[arg(long, env = "UNTEXTRACT_DEST_BUCKET")]
        bucket: String,

        /// Destination key prefix
        #[arg(long, default_value = "")]
        dest: String,
    },

    /// Show what saved result pages contain
    Info {
        /// JSON files with one response or an array of responses
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Run {
            documents,
            source_bucket,
            dest_bucket,
            prefix,
            skip,
            take,
            output,
            save_responses,
            no_upload,
            allow_failed,
            interval,
            max_wait,
            report,
        } => {
            let mut poll = PollOptions::new().with_interval(Duration::from_secs(interval));
            poll = if max_wait == 0 {
                poll.unbounded()
            } else {
                poll.with_max_wait(Duration::from_secs(max_wait))
            };
            let options = PipelineOptions::new()
                .with_output_root(output)
                .with_source_bucket(source_bucket)
                .with_destination_bucket(dest_bucket.unwrap_or_default())
                .with_saved_responses(save_responses)
                .with_upload(!no_upload)
                .with_fail_on_job_failure(!allow_failed)
                .with_poll_options(poll);
            cmd_run(
                &cli.aws,
                options,
                documents,
                &prefix,
                skip,
                take,
                report.as_deref(),
            )
        }
        Commands::List {
            bucket,
            prefix,
            suffix,
        } => cmd_list(&cli.aws, &bucket, &prefix, &suffix),
        Commands::Extract {
            inputs,
            name,
            output,
        } => cmd_extract(&inputs, &name, &output),
        Commands::Upload { dir, bucket, dest } => cmd_upload(&cli.aws, &dir, &bucket, &dest),
        Commands::Info { inputs } => cmd_info(&inputs),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(path) = log_file {
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn connect(aws: &AwsArgs) -> untextract::Result<AwsSession> {
    let config = AwsConfig {
        region: aws.region.clone(),
        access_key_id: aws.access_key.clone(),
        secret_access_key: aws.secret_key.clone(),
        endpoint_url: aws.endpoint_url.clone(),
    };
    AwsSession::connect(&config)
}

/// Apply `--skip`/`--take` to a document list.
fn select_documents(documents: Vec<String>, skip: usize, take: Option<usize>) -> Vec<String> {
    let selected = documents.into_iter().skip(skip);
    match take {
        Some(n) => selected.take(n).collect(),
        None => selected.collect(),
    }
}

fn cmd_run(
    aws: &AwsArgs,
    options: PipelineOptions,
    documents: Vec<String>,
    prefix: &str,
    skip: usize,
    take: Option<usize>,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    options.validate()?;

    let session = connect(aws)?;
    let pipeline = Pipeline::new(session.textract(), session.s3(), options);

    let documents = if documents.is_empty() {
        pipeline.list_documents(prefix)?
    } else {
        documents
    };
    let documents = select_documents(documents, skip, take);
    if documents.is_empty() {
        println!("{}", "No documents to process".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut reports: Vec<RunReport> = Vec::new();
    let mut failed = 0usize;

    for document in &documents {
        pb.set_message(document.clone());
        match pipeline.run(document) {
            Ok(report) => {
                let status = match report.status {
                    JobStatus::Succeeded => report.status.to_string().green(),
                    _ => report.status.to_string().yellow(),
                };
                pb.println(format!(
                    "{} {} [{}] {} tables, {} captions, {} uploaded",
                    "✓".green(),
                    document,
                    status,
                    report.stats.tables_written,
                    report.stats.figures_written,
                    report.uploaded.len()
                ));
                reports.push(report);
            }
            Err(e) => {
                log::error!("{}: {}", document, e);
                pb.println(format!("{} {}: {}", "✗".red(), document, e));
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    if let Some(path) = report_path {
        fs::write(path, to_json(&reports, JsonFormat::Pretty)?)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    println!(
        "\n{} {} succeeded, {} failed",
        "Summary:".bold(),
        reports.len(),
        failed
    );

    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, documents.len()).into());
    }
    Ok(())
}

fn cmd_list(
    aws: &AwsArgs,
    bucket: &str,
    prefix: &str,
    suffix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = connect(aws)?;
    let keys = list_documents(&session.s3(), bucket, prefix, suffix)?;

    for key in &keys {
        println!("{}", key);
    }
    eprintln!("\n{} {} documents", "Found".green().bold(), keys.len());

    Ok(())
}

fn cmd_extract(
    inputs: &[PathBuf],
    name: &str,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_files(inputs)?;
    let paths = ArtifactPaths::new(output, name);
    let stats = extract_index(&index, &paths)?;

    println!("\n{}", "Output files:".green().bold());
    println!(
        "  {} {} tables in {}",
        "├─".dimmed(),
        stats.tables_written,
        paths.content_root().join("tables").display()
    );
    println!(
        "  {} {} captions in {}",
        "├─".dimmed(),
        stats.figures_written,
        paths.content_root().join("image").display()
    );
    println!(
        "  {} metadata in {}",
        "└─".dimmed(),
        paths.metadata_root().display()
    );
    if stats.figures_skipped > 0 {
        println!(
            "\n{} {} figures had no text",
            "Note:".yellow(),
            stats.figures_skipped
        );
    }

    Ok(())
}

fn cmd_upload(
    aws: &AwsArgs,
    dir: &Path,
    bucket: &str,
    dest: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = connect(aws)?;
    let keys = upload_folder(&session.s3(), bucket, dir, dest)?;

    for key in &keys {
        println!("{} {}", "Uploaded".green(), key);
    }
    println!("\n{} {} files uploaded", "Done!".green().bold(), keys.len());

    Ok(())
}

fn cmd_info(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut pages = Vec::new();
    for input in inputs {
        pages.extend(untextract::parse_responses_file(input)?);
    }
    let status = pages.iter().find_map(|p| p.job_status);
    let index = untextract::BlockIndex::from_pages(&pages);
    let view = DocumentView::new(&index);
    let figures = untextract::extract_figures(&index);
    let captions = figures.iter().filter(|f| f.has_caption()).count();

    println!("{}", "Analysis Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for input in inputs {
        println!("{}: {}", "File".bold(), input.display());
    }
    if let Some(status) = status {
        println!("{}: {}", "Job status".bold(), status);
    }
    println!("{}: {}", "Result pages".bold(), pages.len());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Blocks".bold(), index.len());
    println!("{}: {}", "Pages".bold(), view.page_count());
    println!("{}: {}", "Tables".bold(), view.table_count());
    println!("{}: {}", "Figures".bold(), figures.len());
    println!("{}: {}", "Captions".bold(), captions);

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "untextract".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Textract table and caption extraction tool");
    println!();
    println!("License: MIT");
}
