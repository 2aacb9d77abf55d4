//! Error taxonomy shared by the mesh loaders.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    /// The path does not exist or could not be read.
    #[error("OBJ file not found or unreadable: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed OBJ content, either caught while scanning or reported by the parser.
    #[error("{}", describe_parse(*line, message))]
    Parse {
        line: Option<usize>,
        message: String,
    },

    #[error("unsupported OBJ directive '{directive}' on line {line}")]
    UnsupportedFeature { line: usize, directive: String },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}

/// Coarse category of a [`MeshError`], for callers that only branch on the kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MeshErrorKind {
    FileNotFound,
    Parse,
    UnsupportedFeature,
    InvalidMesh,
}

impl MeshError {
    pub fn kind(&self) -> MeshErrorKind {
        match self {
            Self::FileNotFound { .. } => MeshErrorKind::FileNotFound,
            Self::Parse { .. } => MeshErrorKind::Parse,
            Self::UnsupportedFeature { .. } => MeshErrorKind::UnsupportedFeature,
            Self::InvalidMesh(_) => MeshErrorKind::InvalidMesh,
        }
    }

    /// Parse error attributed to a 1-based source line.
    pub fn parse_at(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line: Some(line),
            message: message.into(),
        }
    }
}

fn describe_parse(line: Option<usize>, message: &str) -> String {
    match line {
        Some(line) => format!("OBJ parse error on line {line}: {message}"),
        None => format!("OBJ parse error: {message}"),
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
