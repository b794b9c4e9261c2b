//! Run events and the sinks that receive them
//!
//! Every component reports what happened to a [`Reporter`] handed to it by the
//! caller instead of logging through process-wide state. [`TracingReporter`]
//! forwards events to `tracing`; [`RecordingReporter`] keeps them for
//! inspection.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn, Level};

use crate::classify::RootKind;
use crate::error::Error;

/// Something observable that happened during a run
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The input directory was missing and has been created
    InputDirCreated { dir: PathBuf },
    /// Candidate files were listed
    Discovered { dir: PathBuf, count: usize },
    /// No candidate files were found
    NoInput { dir: PathBuf },
    /// The output root kind was decided
    TargetResolved { kind: RootKind },
    /// A fragment was read and parsed
    FragmentParsed { path: PathBuf },
    /// A fragment could not be read or parsed and will be skipped
    FragmentUnparseable { path: PathBuf, error: Error },
    /// A fragment's root differs from the target kind and will be skipped
    KindMismatch {
        path: PathBuf,
        found: String,
        target: RootKind,
    },
    /// The merged document was written
    Saved { path: PathBuf },
    /// The merged document could not be written
    SaveFailed { path: PathBuf, error: Error },
}

impl Event {
    pub const fn level(&self) -> Level {
        match self {
            Self::Discovered { .. }
            | Self::TargetResolved { .. }
            | Self::FragmentParsed { .. }
            | Self::Saved { .. } => Level::INFO,
            Self::InputDirCreated { .. } | Self::NoInput { .. } | Self::KindMismatch { .. } => {
                Level::WARN
            }
            Self::FragmentUnparseable { .. } | Self::SaveFailed { .. } => Level::ERROR,
        }
    }

    /// File the event is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FragmentParsed { path }
            | Self::FragmentUnparseable { path, .. }
            | Self::KindMismatch { path, .. }
            | Self::Saved { path }
            | Self::SaveFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputDirCreated { dir } => write!(
                f,
                "created input directory {}; add XML files and run again",
                dir.display()
            ),
            Self::Discovered { dir, count } => {
                write!(f, "found {count} XML files in {}", dir.display())
            }
            Self::NoInput { dir } => write!(f, "no XML files to process in {}", dir.display()),
            Self::TargetResolved { kind } => write!(f, "detected sitemap type: {kind}"),
            Self::FragmentParsed { path } => write!(f, "processed {}", file_name(path)),
            Self::FragmentUnparseable { path, error } => {
                write!(f, "failed to parse {}: {error}", file_name(path))
            }
            Self::KindMismatch {
                path,
                found,
                target,
            } => write!(
                f,
                "{} has incompatible type ({found}) for target ({target})",
                file_name(path)
            ),
            Self::Saved { path } => write!(f, "unified file saved as {}", path.display()),
            Self::SaveFailed { path, error } => {
                write!(f, "failed to save {}: {error}", path.display())
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Sink for run events
pub trait Reporter {
    fn report(&mut self, event: Event);
}

impl<F> Reporter for F
where
    F: FnMut(Event),
{
    fn report(&mut self, event: Event) {
        self(event);
    }
}

/// Forwards events to the `tracing` subscriber of the calling thread
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: Event) {
        let level = event.level();
        match event.path() {
            Some(path) => {
                let path = path.display();
                if level == Level::ERROR {
                    error!(%path, "{event}");
                } else if level == Level::WARN {
                    warn!(%path, "{event}");
                } else {
                    info!(%path, "{event}");
                }
            }
            None => {
                if level == Level::ERROR {
                    error!("{event}");
                } else if level == Level::WARN {
                    warn!("{event}");
                } else {
                    info!("{event}");
                }
            }
        }
    }
}

/// Keeps every event in order
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events at `level`
    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |event| event.level() == level)
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}
