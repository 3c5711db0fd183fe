//! sehatpdf CLI - Sehat Card PDF to JSON extraction tool

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sehatpdf::{
    detect_format_from_path, render, Collection, ExtractionStats, JsonFormat, ParseOptions,
    RecordParser, SectionMarkers, SehatPdf, SehatPdfResult, TextExtractor,
};

const DEFAULT_INPUT: &str = "Mock Data for Sehat Card Agent.pdf";
const INPUT_ENV: &str = "SEHATPDF_INPUT";

#[derive(Parser)]
#[command(name = "sehatpdf")]
#[command(version)]
#[command(about = "Extract Sehat Card facilities, citizens and rules from a PDF to JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE", env = INPUT_ENV)]
    input: Option<PathBuf>,

    /// Output directory for the three JSON files (stdout if not specified)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    #[command(flatten)]
    pipeline: PipelineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to the citizens, facilities and rules JSON documents
    Convert {
        #[command(flatten)]
        input: InputArg,

        /// Output directory (stdout if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the text recovered from the PDF
    Text {
        #[command(flatten)]
        input: InputArg,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print a single JSON collection
    Json {
        /// Collection to print
        #[arg(value_enum)]
        collection: CollectionArg,

        #[command(flatten)]
        input: InputArg,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show header detection and extraction statistics
    Info {
        #[command(flatten)]
        input: InputArg,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct InputArg {
    /// Input PDF file
    #[arg(value_name = "FILE", env = INPUT_ENV, default_value = DEFAULT_INPUT)]
    path: PathBuf,
}

/// Options shared by every command.
#[derive(Args)]
struct PipelineArgs {
    /// Require a %PDF- header
    #[arg(long, global = true)]
    strict: bool,

    /// Apply Unicode NFC normalization to extracted text
    #[arg(long, global = true)]
    nfc: bool,

    /// Enable debug logging (RUST_LOG still applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Heading that opens the facilities section
    #[arg(long, global = true, value_name = "TEXT")]
    facilities_marker: Option<String>,

    /// Heading that opens the citizens section
    #[arg(long, global = true, value_name = "TEXT")]
    citizens_marker: Option<String>,

    /// Heading that opens the rules section
    #[arg(long, global = true, value_name = "TEXT")]
    rules_marker: Option<String>,

    /// Comma-separated city names recognized in the facilities section
    #[arg(long, global = true, value_delimiter = ',', value_name = "CITIES")]
    cities: Vec<String>,
}

impl PipelineArgs {
    fn options(&self) -> ParseOptions {
        let defaults = SectionMarkers::default();
        let markers = SectionMarkers::new(
            self.facilities_marker.clone().unwrap_or(defaults.facilities),
            self.citizens_marker.clone().unwrap_or(defaults.citizens),
            self.rules_marker.clone().unwrap_or(defaults.rules),
        );

        let mut options = ParseOptions::new()
            .with_unicode_normalization(self.nfc)
            .with_markers(markers);
        if self.strict {
            options = options.strict();
        }
        if !self.cities.is_empty() {
            options = options.with_cities(self.cities.iter().map(|c| c.trim()));
        }
        options
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CollectionArg {
    /// Citizen profiles
    Citizens,
    /// Healthcare facilities
    Facilities,
    /// Sehat Card rules
    Rules,
}

impl From<CollectionArg> for Collection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Citizens => Collection::Citizens,
            CollectionArg::Facilities => Collection::Facilities,
            CollectionArg::Rules => Collection::Rules,
        }
    }
}

/// Command failure, carrying the process exit code it maps to.
#[derive(Debug)]
enum CliError {
    /// The input PDF does not exist or cannot be read.
    Input(String),
    /// Extraction or parsing failed.
    Pipeline(sehatpdf::Error),
    /// Writing an output file failed.
    Output(PathBuf, std::io::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Input(_) => 1,
            CliError::Pipeline(e) if e.is_input_error() => 1,
            CliError::Pipeline(_) | CliError::Output(..) => 3,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Input(msg) => f.write_str(msg),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Output(path, e) => write!(f, "cannot write {}: {}", path.display(), e),
        }
    }
}

impl From<sehatpdf::Error> for CliError {
    fn from(err: sehatpdf::Error) -> Self {
        CliError::Pipeline(err)
    }
}

type CliResult = Result<(), CliError>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.pipeline.verbose);

    let options = cli.pipeline.options();
    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            compact,
        }) => cmd_convert(&input.path, output.as_deref(), compact, options),
        Some(Commands::Text { input, output }) => cmd_text(&input.path, output.as_deref(), options),
        Some(Commands::Json {
            collection,
            input,
            output,
            compact,
        }) => cmd_json(&input.path, collection.into(), output.as_deref(), compact, options),
        Some(Commands::Info { input, json }) => cmd_info(&input.path, json, options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
            cmd_convert(&input, cli.output.as_deref(), cli.compact, options)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn check_input(input: &Path) -> CliResult {
    if input.is_file() {
        Ok(())
    } else {
        Err(CliError::Input(format!(
            "PDF file not found at {}",
            input.display()
        )))
    }
}

fn run_pipeline(input: &Path, options: ParseOptions) -> Result<SehatPdfResult, CliError> {
    check_input(input)?;
    log::debug!("Parsing {}", input.display());
    Ok(SehatPdf::with_options(options).parse(input)?)
}

fn write_output(path: &Path, content: &str) -> CliResult {
    fs::write(path, content).map_err(|e| CliError::Output(path.to_path_buf(), e))
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: ParseOptions,
) -> CliResult {
    let format = json_format(compact);

    let Some(output_dir) = output else {
        let result = run_pipeline(input, options)?;
        println!("{}", result.to_json(format)?);
        return Ok(());
    };

    fs::create_dir_all(output_dir).map_err(|e| CliError::Output(output_dir.to_path_buf(), e))?;

    let pb = ProgressBar::new(1 + Collection::ALL.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .expect("progress template is valid")
            .progress_chars("#>-"),
    );

    pb.set_message("Extracting records...");
    let result = match run_pipeline(input, options) {
        Ok(result) => result,
        Err(e) => {
            pb.abandon();
            return Err(e);
        }
    };
    pb.inc(1);

    let documents = render::to_json_documents(result.document(), format)?;
    for (collection, json) in &documents {
        pb.set_message(format!("Writing {}...", collection.file_name()));
        write_output(&output_dir.join(collection.file_name()), json)?;
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    let last = documents.len().saturating_sub(1);
    for (i, (collection, _)) in documents.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), collection.file_name());
    }

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>, options: ParseOptions) -> CliResult {
    check_input(input)?;
    let text = TextExtractor::open_with_options(input, options)?.extract().text();

    if let Some(path) = output {
        write_output(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    collection: Collection,
    output: Option<&Path>,
    compact: bool,
    options: ParseOptions,
) -> CliResult {
    let result = run_pipeline(input, options)?;
    let json = result.collection_json(collection, json_format(compact))?;

    if let Some(path) = output {
        write_output(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool, options: ParseOptions) -> CliResult {
    check_input(input)?;

    // Extraction runs even when the header is missing.
    let records = RecordParser::new(&options)?;
    let extractor = TextExtractor::open_with_options(input, options.lenient())?;
    let extracted = extractor.extract();
    let text = extracted.text();
    let mut stats = extracted.stats;
    let parsed = records.parse(&text, &mut stats);

    if json {
        let value = serde_json::json!({
            "file": input.display().to_string(),
            "format": detect_format_from_path(input).ok().map(|f| f.to_string()),
            "stats": stats,
            "error": parsed.err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value).map_err(sehatpdf::Error::from)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    match detect_format_from_path(input) {
        Ok(format) => println!("{}: {}", "Format".bold(), format),
        Err(e) => println!("{}: {}", "Format".bold(), e.to_string().yellow()),
    }

    println!();
    println!("{}", "Extraction Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print_extraction_stats(&stats);

    println!();
    println!("{}", "Records".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    match parsed {
        Ok(_) => print_record_stats(&stats),
        Err(e) => println!("{}", e.to_string().yellow()),
    }

    Ok(())
}

fn print_extraction_stats(stats: &ExtractionStats) {
    println!(
        "{}: {} ({} decoded, {} skipped)",
        "Streams".bold(),
        stats.streams_found,
        stats.streams_decoded,
        stats.streams_skipped
    );
    println!(
        "{}: {} ({} entries, {} malformed lines)",
        "Encoding tables".bold(),
        stats.encoding_tables,
        stats.encoding_entries,
        stats.malformed_entries
    );
    println!("{}: {}", "Text fragments".bold(), stats.fragments);
    println!("{}: {}", "Characters".bold(), stats.char_count);
}

fn print_record_stats(stats: &ExtractionStats) {
    println!("{}: {}", "Facilities".bold(), stats.facility_count);
    println!("{}: {}", "Citizens".bold(), stats.citizen_count);
    if stats.discarded_citizen_blocks > 0 {
        println!(
            "{}: {}",
            "Discarded citizen blocks".bold(),
            stats.discarded_citizen_blocks.to_string().yellow()
        );
    }
    println!("{}: {}", "Rules".bold(), stats.rule_count);
}

fn cmd_version() {
    println!("{} {}", "sehatpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Sehat Card PDF to JSON extraction tool");
    println!();
    println!("License: MIT");
}
