//! MMID dataset tool (mmid) - Main binary entry point

use mmid::cli::args::{
    Command, ExtractArgs, FetchArgs, IndexArgs, ListArgs, ManifestArgs, SampleArgs, parse_args,
};
use mmid::cli::output::{format_catalog, format_json, format_text};
use mmid::cli::signal::install_cancel_handlers;
use mmid::models::ProgressSnapshot;
use mmid::services::catalog::{Catalog, PackageKind};
use mmid::services::dictionary::prepare_word_map;
use mmid::services::fetch::{FetchTool, package_stem};
use mmid::services::sample::{SampleOptions, create_sample};
use mmid::services::{index, manifest};
use mmid::{ExtractOptions, ImageLimit, Summary};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug mmid extract scale-german-package.tgz --limit 3
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    let exit_code = match &cli_args.command {
        Command::List(list_args) => handle_list(list_args),
        Command::Fetch(fetch_args) => handle_fetch(fetch_args),
        Command::Extract(extract_args) => handle_extract(extract_args),
        Command::Index(index_args) => handle_index(index_args),
        Command::Manifest(manifest_args) => handle_manifest(manifest_args),
        Command::Sample(sample_args) => handle_sample(sample_args),
    };

    process::exit(exit_code);
}

fn exit_code_for(err: &mmid::Error) -> i32 {
    match err {
        mmid::Error::InvalidInput(_) => 2,
        _ => 4,
    }
}

fn resolve_limit(limit: Option<ImageLimit>) -> ImageLimit {
    limit.unwrap_or_else(|| {
        log::warn!("No --limit given, keeping every image of every word");
        ImageLimit::Unlimited
    })
}

/// Cancel flag latched by Ctrl+C or SIGTERM; `None` if the handlers could not be installed.
fn cancel_flag() -> Option<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    match install_cancel_handlers(&cancel) {
        Ok(()) => Some(cancel),
        Err(e) => {
            log::warn!("Could not install signal handlers, Ctrl+C will abort immediately: {e}");
            None
        }
    }
}

fn progress_notifier() -> mmid::ProgressNotifier {
    Arc::new(move |snapshot: &ProgressSnapshot| {
        #[allow(clippy::cast_precision_loss)]
        let elapsed_secs = snapshot.timestamp_ms as f64 / 1000.0;
        let rate_suffix = snapshot
            .recent_entries_per_sec
            .map(|rate| format!(", ~{rate} entries/s"))
            .unwrap_or_default();

        eprintln!(
            "[{elapsed_secs:6.1}s] {} entries, {} words, {} files written{rate_suffix}",
            snapshot.processed_entries, snapshot.processed_words, snapshot.files_written,
        );
    })
}

/// Write `words.json` next to the extracted words; failures only warn.
fn write_word_map(package: &Path, dest: &Path, catalog: &Catalog) {
    match prepare_word_map(package, dest, catalog, &FetchTool::default()) {
        Ok(Some(path)) => log::info!("Word map ready: {}", path.display()),
        Ok(None) => {}
        Err(e) => log::warn!("Could not prepare word map for {}: {e}", package.display()),
    }
}

/// Run one extraction and report it.
///
/// Returns the summary when the run finished or was cancelled, or the exit code of a fatal error.
fn run_extraction(
    source: &Path,
    dest: &Path,
    opts: &ExtractOptions,
    quiet: bool,
    json: bool,
) -> Result<Summary, i32> {
    if !quiet {
        eprintln!("Extracting: {} -> {}", source.display(), dest.display());
    }

    let summary = match mmid::extract_top_k(source, dest, opts) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return Err(exit_code_for(&e));
        }
    };

    if summary.cancelled {
        eprintln!("Operation cancelled by user");
    }

    if json {
        println!("{}", format_json(&summary));
    } else if !quiet {
        print!("{}", format_text(&summary));
    }

    Ok(summary)
}

fn summary_exit_code(summary: &Summary) -> i32 {
    if summary.errors.is_empty() && !summary.cancelled {
        0
    } else {
        3
    }
}

fn handle_list(args: &ListArgs) -> i32 {
    match Catalog::load(Path::new(&args.catalog)) {
        Ok(catalog) => {
            print!("{}", format_catalog(&catalog));
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn handle_fetch(args: &FetchArgs) -> i32 {
    let catalog = match Catalog::load(Path::new(&args.catalog)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    let Some(links) = catalog.get(&args.language) else {
        eprintln!("Error: Language '{}' not found in catalog", args.language);
        eprintln!("Use 'mmid list --catalog {}' to see available languages", args.catalog);
        return 2;
    };

    let limit = args.limit.unwrap_or(ImageLimit::Unlimited);
    let kind = args.kind.unwrap_or_else(|| PackageKind::for_limit(limit));
    let Some(url) = links.get(kind) else {
        eprintln!(
            "Error: No {kind} package listed for language '{}'",
            args.language
        );
        return 2;
    };

    let dest = PathBuf::from(&args.dest);
    let fetcher = FetchTool::default();
    let package = match fetcher.download(url, &dest) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if !args.quiet {
        eprintln!("Downloaded: {}", package.display());
    }

    if !args.extract {
        return 0;
    }

    let limit = resolve_limit(args.limit);
    let file_name = package
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_dir = dest.join(format!("{}-k{limit}", package_stem(&file_name)));

    write_word_map(&package, &out_dir, &catalog);

    let opts = ExtractOptions {
        limit,
        progress_notifier: if args.quiet {
            None
        } else {
            Some(progress_notifier())
        },
        cancel_flag: cancel_flag(),
        ..ExtractOptions::default()
    };

    let summary = match run_extraction(&package, &out_dir, &opts, args.quiet, false) {
        Ok(summary) => summary,
        Err(code) => return code,
    };

    // A cancelled run leaves the package in place so it can be extracted again.
    if summary.cancelled {
        log::info!("Keeping {} after cancellation", package.display());
    } else if !args.keep_full {
        match std::fs::remove_file(&package) {
            Ok(()) => log::info!("Removed {}", package.display()),
            Err(e) => log::warn!("Could not remove {}: {e}", package.display()),
        }
    }

    summary_exit_code(&summary)
}

fn handle_extract(args: &ExtractArgs) -> i32 {
    let source = PathBuf::from(&args.source);
    let dest = PathBuf::from(args.dest_or_default());

    let mut opts = ExtractOptions {
        limit: resolve_limit(args.limit),
        cancel_flag: cancel_flag(),
        ..ExtractOptions::default()
    };

    if let Some(interval_secs) = args.progress_interval_secs {
        opts.progress_interval = Duration::from_secs(interval_secs);
        opts.progress_entry_trigger = u64::MAX;
    }

    if !args.quiet && !args.json {
        opts.progress_notifier = Some(progress_notifier());
    }

    if let Some(catalog_path) = &args.catalog {
        match Catalog::load(Path::new(catalog_path)) {
            Ok(catalog) => write_word_map(&source, &dest, &catalog),
            Err(e) => log::warn!("Skipping word map: {e}"),
        }
    }

    run_extraction(&source, &dest, &opts, args.quiet, args.json)
        .map_or_else(|code| code, |summary| summary_exit_code(&summary))
}

fn handle_index(args: &IndexArgs) -> i32 {
    let output = args.output.as_deref().map(Path::new);
    match index::generate_index(Path::new(&args.dataset), output) {
        Ok(report) => {
            println!(
                "Wrote {} entries to {}",
                report.rows.len(),
                report.output.display()
            );
            if report.errors.is_empty() {
                0
            } else {
                for error in &report.errors {
                    eprintln!("  {}: {}", error.path, error.message);
                }
                3
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn handle_manifest(args: &ManifestArgs) -> i32 {
    match manifest::write_manifest(
        &args.packages,
        Path::new(&args.assets),
        Path::new(&args.output),
    ) {
        Ok(count) => {
            println!("Wrote manifest for {count} packages to {}", args.output);
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn handle_sample(args: &SampleArgs) -> i32 {
    let opts = SampleOptions {
        count: args.count,
        seed: args.seed,
        prefix: args.prefix.clone(),
    };

    match create_sample(Path::new(&args.package), &opts) {
        Ok(report) => {
            println!(
                "Created {} with {} items",
                report.target.display(),
                report.kept.len()
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

fn print_help() {
    println!("MMID dataset tool (mmid) - Build top-k image vocabularies from MMID packages");
    println!();
    println!("USAGE:");
    println!("    mmid list --catalog <FILE>");
    println!("    mmid fetch <LANG> --catalog <FILE> [OPTIONS]");
    println!("    mmid extract <SOURCE> [OPTIONS]");
    println!("    mmid index <DATASET> [--output <FILE>]");
    println!("    mmid manifest <PACKAGE>... [--assets <DIR>] [--output <FILE>]");
    println!("    mmid sample <PACKAGE> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list      Show the languages listed in a downloads.md catalog");
    println!("    fetch     Download a language package, optionally extracting it");
    println!("    extract   Keep at most K images per word from a package or directory");
    println!("    index     Write index.csv for an extracted dataset");
    println!("    manifest  Write package_manifest.js for extracted packages");
    println!("    sample    Copy a random subset of words into a mini package");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("FETCH OPTIONS:");
    println!("    --catalog <FILE>          downloads.md link table (required)");
    println!("    --type <KIND>             full|mini|metadata|dictionary|text");
    println!("    --limit <K>               Images per word; 1 picks the mini package");
    println!("    --dest <DIR>              Download directory (default: .)");
    println!("    --extract                 Extract into <DEST>/<PACKAGE>-k<K> after download");
    println!("    --keep-full               Keep the downloaded package after extraction");
    println!("    --quiet                   Suppress non-error output");
    println!();
    println!("EXTRACT OPTIONS:");
    println!("    --dest <DIR>              Destination (default: <SOURCE>_extracted)");
    println!("    --limit <K>               Images per word, or 'all' (default: all)");
    println!("    --catalog <FILE>          Also write words.json from the language dictionary");
    println!("    --progress-interval <S>   Emit progress updates every S seconds (default: 2)");
    println!("    --quiet                   Suppress non-error output");
    println!("    --json                    Emit machine-readable summary");
    println!();
    println!("    Ctrl+C stops an extraction after the current entry; press it again to abort.");
    println!();
    println!("MANIFEST OPTIONS:");
    println!("    --assets <DIR>            Front-end assets holding audio/ and img/ (default: assets)");
    println!("    --output <FILE>           Manifest path (default: package_manifest.js)");
    println!();
    println!("SAMPLE OPTIONS:");
    println!("    --count <N>               Number of words to keep (default: 600)");
    println!("    --seed <S>                Random seed (default: 42)");
    println!("    --prefix <P>              Replaces 'scale-' in the target name (default: mini-)");
    println!();
    println!("EXAMPLES:");
    println!("    mmid fetch german --catalog downloads.md --limit 3 --extract");
    println!("    mmid extract scale-german-package.tgz --limit 3 --dest german-k3");
    println!("    mmid index german-k3");
    println!("    mmid manifest german-k3 mini-german-k3 --output package_manifest.js");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("mmid {VERSION}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
