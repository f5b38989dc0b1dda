use ahash::AHashSet;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use kraken2_report_rs::{summarise_reports_parallel, ReportError, Result, SampleSummary, Thresholds};

/// Summarise Kraken2 reports by rank and flag samples unsuitable for mykrobe.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kraken2 report(s), plain or gzipped.
    #[arg(required = true)]
    reports: Vec<PathBuf>,

    /// Minimum percentage of reads for a taxon to be reported.
    #[arg(short, long, default_value_t = 1.0)]
    pct_threshold: f64,

    /// Minimum clade read count for a taxon to be reported.
    #[arg(short, long, default_value_t = 10_000, allow_negative_numbers = true)]
    num_threshold: i64,

    /// Output JSON file (one report) or directory (several). Stdout if omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads to use.
    #[arg(short, long)]
    threads: Option<usize>,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,

    /// Debug logging (RUST_LOG still takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = format!("{{spinner:.{color}}} {{msg}}");
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template(&template)
    {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// `sample.tab.gz` -> `sample.json`
fn output_name(report: &Path) -> String {
    let name = report
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{stem}.json")
}

/// One output file name per report; repeated stems get `_2`, `_3`, ... suffixes.
fn unique_output_names(reports: &[&Path]) -> Vec<String> {
    let mut taken: AHashSet<String> = AHashSet::new();
    let mut names = Vec::with_capacity(reports.len());
    for report in reports {
        let base = output_name(report);
        let mut name = base.clone();
        let mut n = 2;
        while taken.contains(&name) {
            name = format!("{}_{n}.json", base.trim_end_matches(".json"));
            n += 1;
        }
        if name != base {
            log::warn!("{} would overwrite {base}; writing {name} instead", report.display());
        }
        taken.insert(name.clone());
        names.push(name);
    }
    names
}

fn write_outputs(args: &Args, summaries: &[(PathBuf, SampleSummary)]) -> Result<()> {
    // A single report is written as-is, several are keyed by path
    if args.reports.len() == 1 {
        let Some((_, summary)) = summaries.first() else {
            return Ok(());
        };
        let json = to_json(summary, args.pretty)?;
        match &args.output {
            Some(out) => fs::write(out, json)?,
            None => println!("{json}"),
        }
        return Ok(());
    }

    match &args.output {
        Some(out_dir) => {
            fs::create_dir_all(out_dir)?;
            let paths: Vec<&Path> = summaries.iter().map(|(path, _)| path.as_path()).collect();
            for (name, (_, summary)) in unique_output_names(&paths).into_iter().zip(summaries) {
                fs::write(out_dir.join(name), to_json(summary, args.pretty)?)?;
            }
        }
        None => {
            let mut map = serde_json::Map::new();
            for (path, summary) in summaries {
                map.insert(path.display().to_string(), serde_json::to_value(summary)?);
            }
            println!("{}", to_json(&map, args.pretty)?);
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<bool> {
    // 1. Validate thresholds before touching any file
    let thresholds = Thresholds::new(args.pct_threshold, args.num_threshold)?;
    log::info!(
        "Reporting taxa with >= {}% of reads and >= {} clade reads",
        thresholds.pct(),
        thresholds.num()
    );

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| ReportError::InvalidArgument(e.to_string()))?;
    }

    // 2. Summarise every report
    let spinner_summarise = spinner("green", &format!("Summarising {} report(s)...", args.reports.len()));
    let results = summarise_reports_parallel(&args.reports, &thresholds);
    spinner_summarise.finish_with_message("Summaries finished.");

    let mut failed = 0usize;
    let mut summaries = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(summary) => summaries.push((path, summary)),
            Err(_) => failed += 1,
        }
    }

    // 3. Write JSON
    let spinner_write = spinner("yellow", "Writing output...");
    write_outputs(&args, &summaries)?;
    spinner_write.finish_with_message("Output written.");

    if failed > 0 {
        log::error!("{failed} of {} report(s) failed", args.reports.len());
    }
    Ok(failed == 0)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
