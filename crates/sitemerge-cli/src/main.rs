use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sitemerge::config::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_FILE, DEFAULT_PATTERN};
use sitemerge::{unify, xml, Outcome, SkipReason, TracingReporter, UnifyConfig};

#[derive(Debug, Parser)]
#[command(
    name = "sitemerge",
    version,
    about = "Merge a directory of XML sitemap fragments into one sitemap"
)]
struct Args {
    /// Directory holding the sitemap fragments (created if missing)
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,
    /// Merged sitemap file
    #[arg(short, long, value_name = "OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,
    /// Glob for fragment file names inside the input directory
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,
    /// Maximum element nesting per fragment (0 means unlimited)
    #[arg(long, value_name = "N")]
    max_depth: Option<u16>,
    /// Maximum fragment size in bytes (0 means unlimited)
    #[arg(long, value_name = "BYTES")]
    max_size: Option<usize>,
    /// Spaces per indentation level in the output
    #[arg(long, value_name = "N", default_value_t = 2)]
    indent: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.indent > 8 {
        bail!("indentation of {} spaces exceeds maximum allowed (8)", args.indent);
    }

    let defaults = xml::Config::default();
    let parser = xml::Config::new(
        args.max_depth.unwrap_or(defaults.max_depth),
        args.max_size.unwrap_or(defaults.max_size),
    );
    let config = UnifyConfig::new(args.input_dir, args.output)
        .with_pattern(args.pattern)
        .with_parser(parser)
        .with_indent(args.indent);

    info!("starting sitemerge");
    match unify(&config, &mut TracingReporter) {
        Outcome::InputDirCreated { dir } => {
            warn!("nothing merged; add XML files to {} and run again", dir.display());
            Ok(())
        }
        Outcome::Merged(summary) => {
            for skipped in &summary.skipped {
                let reason = match &skipped.reason {
                    SkipReason::Unparseable => "unparseable".to_string(),
                    SkipReason::KindMismatch { found } => format!("root is {found}"),
                };
                info!(path = %skipped.path.display(), "skipped: {reason}");
            }
            info!(
                kind = %summary.kind,
                merged = summary.merged,
                skipped = summary.skipped.len(),
                "unification completed successfully"
            );
            Ok(())
        }
        Outcome::Failed(failure) => {
            Err(anyhow!(failure)).context("failed to unify XML files")
        }
    }
}
