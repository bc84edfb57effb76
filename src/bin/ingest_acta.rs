//! Ingest Actas
//!
//! Reads one or more actas and writes their statistics to a JSON store.
//!
//! Usage:
//!   cargo run --release --bin ingest_acta -- acta.json --store store.json
//!   cargo run --release --bin ingest_acta -- acta.json --config club.json --dry-run
//!   cargo run --release --bin ingest_acta -- a.json b.json --club "Rugby Alcobendas" --club RAL --store store.json
//!   cargo run --release --features pdf --bin ingest_acta -- acta.pdf --store store.json
//!
//! Inputs ending in `.json` are fragment dumps; `.pdf` needs the `pdf` feature.
//! Set `RUST_LOG=debug` for stage details.

use acta_ingest::{Extraction, FragmentDump, IngestConfig, IngestPipeline, LogProgress, MemoryBackend, PageTextSource};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

struct CliConfig {
    inputs: Vec<PathBuf>,
    store: Option<PathBuf>,
    config: Option<PathBuf>,
    clubs: Vec<String>,
    report: Option<PathBuf>,
    dry_run: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = Self {
            inputs: Vec::new(),
            store: None,
            config: None,
            clubs: Vec::new(),
            report: None,
            dry_run: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--store" => {
                    i += 1;
                    cli.store = Some(PathBuf::from(value(&args, i, "--store")?));
                },
                "--config" => {
                    i += 1;
                    cli.config = Some(PathBuf::from(value(&args, i, "--config")?));
                },
                "--club" => {
                    i += 1;
                    cli.clubs.push(value(&args, i, "--club")?.to_string());
                },
                "--report" => {
                    i += 1;
                    cli.report = Some(PathBuf::from(value(&args, i, "--report")?));
                },
                "--dry-run" => {
                    cli.dry_run = true;
                },
                "--help" | "-h" => return Err(usage()),
                other if other.starts_with("--") => {
                    return Err(format!("unknown option {}\n{}", other, usage()));
                },
                other => cli.inputs.push(PathBuf::from(other)),
            }
            i += 1;
        }

        if cli.inputs.is_empty() {
            return Err(usage());
        }
        if !cli.dry_run && cli.store.is_none() {
            return Err(format!("--store is required unless --dry-run\n{}", usage()));
        }
        Ok(cli)
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", flag))
}

fn usage() -> String {
    "usage: ingest_acta <input.(json|pdf)>... [--store store.json] [--config cfg.json] [--club NAME]... [--report out.json] [--dry-run]"
        .to_string()
}

fn open_source(path: &Path) -> acta_ingest::Result<Box<dyn PageTextSource>> {
    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        #[cfg(feature = "pdf")]
        {
            return Ok(Box::new(acta_ingest::PdfOxideSource::open(path)?));
        }
        #[cfg(not(feature = "pdf"))]
        {
            return Err(acta_ingest::Error::InvalidConfig(format!(
                "{}: PDF input needs the `pdf` feature",
                path.display()
            )));
        }
    }

    Ok(Box::new(FragmentDump::from_json_file(path)?))
}

fn print_extraction(path: &Path, extraction: &Extraction) {
    let acta = &extraction.acta;
    println!("{}", path.display());
    println!(
        "  {}  {} vs {}",
        acta.metadata.date, acta.metadata.home_team_name, acta.metadata.visitor_team_name
    );
    if let (Some(h), Some(v)) = (acta.metadata.home_score, acta.metadata.visitor_score) {
        println!("  printed score: {}-{}", h, v);
    }
    println!(
        "  players: {} home, {} visitor",
        acta.home_players.len(),
        acta.visitor_players.len()
    );
    println!(
        "  events: {}, substitutions: {}",
        acta.events.len(),
        acta.substitutions.len()
    );
    for w in &extraction.warnings {
        println!("  warning: {}", w);
    }
}

fn run(cli: &CliConfig) -> acta_ingest::Result<usize> {
    let mut config = match &cli.config {
        Some(path) => IngestConfig::from_json_file(path)?,
        None => IngestConfig::new(),
    };
    if !cli.clubs.is_empty() {
        config = config.with_own_team_names(cli.clubs.clone());
    }
    let pipeline = IngestPipeline::new(config)?;
    log::info!(
        "Own club {:?}, {} minute matches",
        pipeline.config().own_team_names,
        pipeline.config().match_duration
    );

    let mut store = match &cli.store {
        Some(path) if path.exists() => MemoryBackend::load_json(path)?,
        _ => MemoryBackend::new(),
    };

    let mut reports = Vec::new();
    let mut failures = 0;

    for input in &cli.inputs {
        let mut source = match open_source(input) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("✗ {}: {}", input.display(), e);
                failures += 1;
                continue;
            },
        };

        if cli.dry_run {
            match pipeline.extract(source.as_mut(), &mut LogProgress) {
                Ok(extraction) => print_extraction(input, &extraction),
                Err(e) => {
                    eprintln!("✗ {}: {}", input.display(), e);
                    failures += 1;
                },
            }
            continue;
        }

        match pipeline.ingest(source.as_mut(), &mut store, &mut LogProgress) {
            Ok(report) => {
                println!(
                    "✓ {}: {} {}-{} {} ({} player rows, {} warnings)",
                    input.display(),
                    report.metadata.home_team_name,
                    report.home_score,
                    report.visitor_score,
                    report.metadata.visitor_team_name,
                    report.player_rows.len(),
                    report.warnings.len()
                );
                reports.push(report);
            },
            Err(e) => {
                eprintln!("✗ {}: {}", input.display(), e);
                failures += 1;
            },
        }
    }

    if !cli.dry_run {
        if let Some(path) = &cli.store {
            store.save_json(path)?;
        }
    }
    if let Some(path) = &cli.report {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &reports)?;
    }

    Ok(failures)
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        },
    };

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            eprintln!("{} of {} actas failed", failures, cli.inputs.len());
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
