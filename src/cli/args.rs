//! CLI argument parsing

use crate::ImageLimit;
use crate::services::catalog::PackageKind;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    List(ListArgs),
    Fetch(FetchArgs),
    Extract(ExtractArgs),
    Index(IndexArgs),
    Manifest(ManifestArgs),
    Sample(SampleArgs),
}

#[derive(Debug, Clone)]
pub struct ListArgs {
    pub catalog: String,
}

#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub language: String,
    pub catalog: String,
    pub kind: Option<PackageKind>,
    pub limit: Option<ImageLimit>,
    pub dest: String,
    pub extract: bool,
    pub keep_full: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct ExtractArgs {
    pub source: String,
    pub dest: Option<String>,
    pub limit: Option<ImageLimit>,
    pub catalog: Option<String>,
    pub progress_interval_secs: Option<u64>,
    pub quiet: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct IndexArgs {
    pub dataset: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ManifestArgs {
    pub packages: Vec<String>,
    pub assets: String,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct SampleArgs {
    pub package: String,
    pub count: usize,
    pub seed: u64,
    pub prefix: String,
}

impl Default for ExtractArgs {
    fn default() -> Self {
        Self {
            source: String::new(),
            dest: None,
            limit: None,
            catalog: None,
            progress_interval_secs: None,
            quiet: false,
            json: false,
        }
    }
}

impl ExtractArgs {
    /// Destination directory, defaulting to `<SOURCE>_extracted`.
    #[must_use]
    pub fn dest_or_default(&self) -> String {
        self.dest
            .clone()
            .unwrap_or_else(|| format!("{}_extracted", self.source.trim_end_matches('/')))
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let rest = &args[2..];
    let command = match args[1].as_str() {
        "list" => Command::List(parse_list_args(rest)?),
        "fetch" => Command::Fetch(parse_fetch_args(rest)?),
        "extract" => Command::Extract(parse_extract_args(rest)?),
        "index" => Command::Index(parse_index_args(rest)?),
        "manifest" => Command::Manifest(parse_manifest_args(rest)?),
        "sample" => Command::Sample(parse_sample_args(rest)?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

/// Value following the flag at `*i`, advancing the cursor.
fn take_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires {what}"))
}

fn parse_limit(value: &str) -> Result<ImageLimit, String> {
    value
        .parse::<ImageLimit>()
        .map_err(|_| "--limit must be a positive number or 'all'".to_string())
}

fn parse_list_args(args: &[String]) -> Result<ListArgs, String> {
    let mut catalog = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--catalog" => catalog = Some(take_value(args, &mut i, "a file path")?.to_string()),
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let catalog = catalog.ok_or_else(|| "Missing required option: --catalog".to_string())?;
    Ok(ListArgs { catalog })
}

fn parse_fetch_args(args: &[String]) -> Result<FetchArgs, String> {
    let mut language = String::new();
    let mut catalog = None;
    let mut kind = None;
    let mut limit = None;
    let mut dest = ".".to_string();
    let mut extract = false;
    let mut keep_full = false;
    let mut quiet = false;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--catalog" => catalog = Some(take_value(args, &mut i, "a file path")?.to_string()),
            "--type" => {
                let value = take_value(args, &mut i, "a value")?;
                kind = Some(value.parse::<PackageKind>()?);
            }
            "--limit" => limit = Some(parse_limit(take_value(args, &mut i, "a value")?)?),
            "--dest" => dest = take_value(args, &mut i, "a directory")?.to_string(),
            "--extract" => extract = true,
            "--keep-full" => keep_full = true,
            "--quiet" => quiet = true,
            arg if !arg.starts_with("--") => {
                if language.is_empty() {
                    language = arg.to_lowercase();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if language.is_empty() {
        return Err("Missing required argument: LANG".to_string());
    }
    let catalog = catalog.ok_or_else(|| "Missing required option: --catalog".to_string())?;

    Ok(FetchArgs {
        language,
        catalog,
        kind,
        limit,
        dest,
        extract,
        keep_full,
        quiet,
    })
}

fn parse_extract_args(args: &[String]) -> Result<ExtractArgs, String> {
    let mut extract_args = ExtractArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--dest" => {
                extract_args.dest = Some(take_value(args, &mut i, "a directory")?.to_string());
            }
            "--limit" => {
                extract_args.limit = Some(parse_limit(take_value(args, &mut i, "a value")?)?);
            }
            "--catalog" => {
                extract_args.catalog = Some(take_value(args, &mut i, "a file path")?.to_string());
            }
            "--progress-interval" => {
                let secs: u64 = take_value(args, &mut i, "a value")?
                    .parse()
                    .map_err(|_| "--progress-interval must be a positive integer".to_string())?;
                if secs == 0 {
                    return Err("--progress-interval must be greater than zero".to_string());
                }
                extract_args.progress_interval_secs = Some(secs);
            }
            "--quiet" => extract_args.quiet = true,
            "--json" => extract_args.json = true,
            arg if !arg.starts_with("--") => {
                if extract_args.source.is_empty() {
                    extract_args.source = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if extract_args.source.is_empty() {
        return Err("Missing required argument: SOURCE".to_string());
    }

    Ok(extract_args)
}

fn parse_index_args(args: &[String]) -> Result<IndexArgs, String> {
    let mut dataset = String::new();
    let mut output = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--output" => output = Some(take_value(args, &mut i, "a file path")?.to_string()),
            arg if !arg.starts_with("--") => {
                if dataset.is_empty() {
                    dataset = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if dataset.is_empty() {
        return Err("Missing required argument: DATASET".to_string());
    }

    Ok(IndexArgs { dataset, output })
}

fn parse_manifest_args(args: &[String]) -> Result<ManifestArgs, String> {
    let mut packages = Vec::new();
    let mut assets = crate::services::manifest::DEFAULT_ASSETS_DIR.to_string();
    let mut output = crate::services::manifest::MANIFEST_FILE.to_string();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--assets" => assets = take_value(args, &mut i, "a directory")?.to_string(),
            "--output" => output = take_value(args, &mut i, "a file path")?.to_string(),
            arg if !arg.starts_with("--") => packages.push(arg.to_string()),
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if packages.is_empty() {
        return Err("Missing required argument: PACKAGE".to_string());
    }

    Ok(ManifestArgs {
        packages,
        assets,
        output,
    })
}

fn parse_sample_args(args: &[String]) -> Result<SampleArgs, String> {
    let defaults = crate::services::sample::SampleOptions::default();
    let mut package = String::new();
    let mut count = defaults.count;
    let mut seed = defaults.seed;
    let mut prefix = defaults.prefix;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--count" => {
                count = take_value(args, &mut i, "a value")?
                    .parse()
                    .map_err(|_| "--count must be a number".to_string())?;
            }
            "--seed" => {
                seed = take_value(args, &mut i, "a value")?
                    .parse()
                    .map_err(|_| "--seed must be a number".to_string())?;
            }
            "--prefix" => prefix = take_value(args, &mut i, "a value")?.to_string(),
            arg if !arg.starts_with("--") => {
                if package.is_empty() {
                    package = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if package.is_empty() {
        return Err("Missing required argument: PACKAGE".to_string());
    }

    Ok(SampleArgs {
        package,
        count,
        seed,
        prefix,
    })
}
