//! The merge pipeline: locate, classify, resolve, merge, save

use std::path::PathBuf;

use glob::Pattern;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::classify::{classify_file, Classified, RootKind};
use crate::config::UnifyConfig;
use crate::error::{Error, ErrorKind, Span};
use crate::locate::find_xml_files;
use crate::merge::{merge_fragments, Skipped};
use crate::report::{Event, Reporter};
use crate::resolve::resolve_root_kind;
use crate::serialize::save;

/// What a completed merge produced
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub output: PathBuf,
    pub kind: RootKind,
    /// Top-level children written under the root
    pub merged: usize,
    /// Files that contributed nothing, in processing order
    pub skipped: Vec<Skipped>,
}

/// Why a run produced no output
#[derive(Error, Clone, Debug, PartialEq)]
pub enum Failure {
    #[error("no XML files found in {}", .dir.display())]
    NoInput { dir: PathBuf },
    #[error("could not list input files: {0}")]
    Discovery(Error),
    #[error("could not create input directory: {0}")]
    Bootstrap(Error),
    #[error("could not save unified file: {0}")]
    Save(Error),
}

/// Result of one run
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The input directory did not exist; it was created and nothing merged
    InputDirCreated { dir: PathBuf },
    /// The unified document was written
    Merged(Summary),
    /// The run stopped without writing output
    Failed(Failure),
}

impl Outcome {
    /// Only [`Outcome::Failed`] counts as failure
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    pub const fn summary(&self) -> Option<&Summary> {
        match self {
            Self::Merged(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Run the whole pipeline once.
///
/// Per-file problems are reported and skipped; only listing the input
/// directory and writing the output can fail the run.
#[instrument(
    skip_all,
    fields(input = %config.input_dir.display(), output = %config.output_file.display())
)]
pub fn unify(config: &UnifyConfig, reporter: &mut dyn Reporter) -> Outcome {
    let dir = &config.input_dir;
    if !dir.exists() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            return Outcome::Failed(Failure::Bootstrap(Error::io(dir, &e)));
        }
        reporter.report(Event::InputDirCreated { dir: dir.clone() });
        return Outcome::InputDirCreated { dir: dir.clone() };
    }

    let pattern = match Pattern::new(&config.pattern) {
        Ok(pattern) => pattern,
        Err(e) => {
            let error = Error::with_message(
                ErrorKind::InvalidPattern {
                    pattern: config.pattern.clone(),
                },
                Span::empty(),
                format!("invalid file pattern {:?}: {e}", config.pattern),
            );
            return Outcome::Failed(Failure::Discovery(error));
        }
    };

    let files = match find_xml_files(dir, &pattern, reporter) {
        Ok(files) => files,
        Err(error) => return Outcome::Failed(Failure::Discovery(error)),
    };
    if files.is_empty() {
        reporter.report(Event::NoInput { dir: dir.clone() });
        return Outcome::Failed(Failure::NoInput { dir: dir.clone() });
    }

    let population: Vec<Classified> = files
        .iter()
        .map(|path| classify_file(path, config.parser, reporter))
        .collect();

    let kind = resolve_root_kind(&population);
    reporter.report(Event::TargetResolved { kind });

    let (document, skipped) = merge_fragments(kind, population, reporter);
    let merged = document.len();
    debug!(merged, skipped = skipped.len(), "merge finished");

    let root = document.into_element();
    match save(&root, &config.output_file, &config.format, reporter) {
        Ok(()) => Outcome::Merged(Summary {
            output: config.output_file.clone(),
            kind,
            merged,
            skipped,
        }),
        Err(error) => Outcome::Failed(Failure::Save(error)),
    }
}
