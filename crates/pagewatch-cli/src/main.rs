//! Discovery CLI: enumerate a domain's reachable URLs with the six
//! techniques and print or save the results.

mod output;

use clap::Parser;
use pagewatch_discovery::{DiscoveryConfig, Enumerator};
use pagewatch_types::SourceTag;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagewatch")]
#[command(about = "Discover all accessible pages of a domain")]
struct Args {
    /// Target domain (e.g. example.com or https://example.com)
    #[arg(short = 'd', long)]
    domain: String,

    /// Crawl depth for live crawling
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Number of concurrent probe threads
    #[arg(long, default_value_t = 50)]
    threads: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Output results in TXT format (one URL per line, default)
    #[arg(long)]
    txt: bool,

    /// Output file path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Only print URLs, no summary or details
    #[arg(long)]
    silent: bool,

    /// Only return URLs with an alive status
    #[arg(long)]
    only_alive: bool,

    /// Comma-separated techniques: live,js,wayback,bruteforce,robots,sitemap
    #[arg(long, default_value = "live,js,wayback,bruteforce,robots,sitemap")]
    techniques: String,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress all logging except errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let domain = args.domain.trim().to_string();
    if domain.is_empty() {
        error!("domain cannot be empty");
        return ExitCode::FAILURE;
    }

    let techniques = parse_techniques(&args.techniques);
    if techniques.is_empty() {
        error!("no valid techniques specified");
        return ExitCode::FAILURE;
    }

    info!(domain = %domain, techniques = techniques.len(), "starting enumeration");

    let config = DiscoveryConfig {
        domain: domain.clone(),
        depth: args.depth,
        timeout_secs: args.timeout,
        threads: args.threads,
        only_alive: args.only_alive,
        techniques,
    };
    let results = Enumerator::new(config).enumerate();

    let formatted = if args.json {
        output::format_json(&results)
    } else {
        output::format_txt(&results)
    };

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    error!(error = %err, "could not create output directory");
                    return ExitCode::FAILURE;
                }
            }
        }
        if let Err(err) = std::fs::write(path, &formatted) {
            error!(error = %err, "could not write output file");
            return ExitCode::FAILURE;
        }
        info!(path = %path.display(), "results saved");
    } else {
        println!("{formatted}");
    }

    if !args.silent {
        println!("{}", output::format_summary(&domain, &results));
    }

    info!("enumeration completed");
    ExitCode::SUCCESS
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn parse_techniques(list: &str) -> BTreeSet<SourceTag> {
    list.split(',')
        .map(str::trim)
        .filter_map(SourceTag::from_selection)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technique_list_parses_and_drops_unknown() {
        let techniques = parse_techniques("live, js ,dns,wayback");
        assert_eq!(techniques.len(), 3);
        assert!(techniques.contains(&SourceTag::LiveCrawl));
        assert!(techniques.contains(&SourceTag::JsAnalysis));
        assert!(techniques.contains(&SourceTag::Wayback));
    }

    #[test]
    fn all_invalid_techniques_is_empty() {
        assert!(parse_techniques("dns,ports").is_empty());
    }
}
