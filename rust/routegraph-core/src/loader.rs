//! Loads a pair of route descriptions into a [`RouteNetwork`].
//!
//! The time-weighted source is streamed first, then the cost-weighted one.
//! Both sources carry their own label declarations, so every airport ends up
//! as a vertex of both graphs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::parser::{DescriptionParser, ParseError, RouteNetwork, Weighting};

/// Extension accepted when no override is configured.
pub const DEFAULT_EXTENSION: &str = "gv";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{which} source not found: {reason}")]
    SourceNotFound { which: &'static str, reason: String },
    #[error("{path}:{line}: {source}")]
    Parse {
        path: String,
        line: usize,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    fn not_found(weighting: Weighting, reason: impl Into<String>) -> Self {
        LoadError::SourceNotFound {
            which: weighting.as_str(),
            reason: reason.into(),
        }
    }
}

/// A validated source: its path and full text.
struct Source {
    path: PathBuf,
    text: String,
}

#[derive(Debug, Clone)]
pub struct Loader {
    extensions: Vec<String>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }

    /// Accept files with any of `extensions` (without the leading dot).
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Load the time- and cost-weighted descriptions.
    ///
    /// Both sources are validated before either is parsed. The first parse
    /// error aborts the load.
    pub fn load(&self, times: Option<&Path>, costs: Option<&Path>) -> Result<RouteNetwork, LoadError> {
        let times = self.open(times, Weighting::Time)?;
        let costs = self.open(costs, Weighting::Cost)?;

        let mut network = RouteNetwork::new();
        for (source, weighting) in [(&times, Weighting::Time), (&costs, Weighting::Cost)] {
            let label = source.path.display().to_string();
            feed(&mut network, &label, source.text.lines(), weighting)?;
        }
        info!(
            airports = network.labels().len(),
            time_edges = network.time_graph().edge_count(),
            cost_edges = network.cost_graph().edge_count(),
            "route network loaded"
        );
        Ok(network)
    }

    /// Build a network from in-memory descriptions, skipping file checks.
    pub fn load_from_lines<'a, T, C>(&self, times: T, costs: C) -> Result<RouteNetwork, LoadError>
    where
        T: IntoIterator<Item = &'a str>,
        C: IntoIterator<Item = &'a str>,
    {
        let mut network = RouteNetwork::new();
        feed(&mut network, "<times>", times, Weighting::Time)?;
        feed(&mut network, "<costs>", costs, Weighting::Cost)?;
        Ok(network)
    }

    fn open(&self, path: Option<&Path>, weighting: Weighting) -> Result<Source, LoadError> {
        let path = match path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => return Err(LoadError::not_found(weighting, "no path given")),
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if !extension.is_some_and(|e| self.extensions.contains(&e)) {
            return Err(LoadError::not_found(
                weighting,
                format!(
                    "'{}' does not have an accepted extension ({})",
                    path.display(),
                    self.extensions.join(", ")
                ),
            ));
        }

        let text = fs::read_to_string(path).map_err(|e| {
            let why = match e.kind() {
                io::ErrorKind::InvalidData => "is not UTF-8 text".to_string(),
                _ => format!("cannot be read: {}", e),
            };
            LoadError::not_found(weighting, format!("'{}' {}", path.display(), why))
        })?;

        if !has_digraph_header(&text) {
            return Err(LoadError::not_found(
                weighting,
                format!("'{}' is not a digraph description", path.display()),
            ));
        }

        debug!(path = %path.display(), graph = weighting.as_str(), "opened source");
        Ok(Source {
            path: path.to_path_buf(),
            text,
        })
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn feed<'a, I>(network: &mut RouteNetwork, label: &str, lines: I, weighting: Weighting) -> Result<(), LoadError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = DescriptionParser::new(network);
    for (idx, line) in lines.into_iter().enumerate() {
        parser
            .parse_line(line, weighting)
            .map_err(|source| LoadError::Parse {
                path: label.to_string(),
                line: idx + 1,
                source,
            })?;
    }
    Ok(())
}

/// The first non-blank line must open a `digraph`.
fn has_digraph_header(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .and_then(|l| l.split_whitespace().next())
        .is_some_and(|token| token == "digraph" || token.starts_with("digraph{"))
}
