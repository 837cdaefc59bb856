// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the music-theory core.

use thiserror::Error;

/// Errors raised while resolving names from the fixed theory tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TheoryError {
    /// A note spelling outside the accepted vocabulary (e.g. "H", "Cb", "c#")
    #[error("unknown note name: {0:?}")]
    UnknownNoteName(String),

    /// A chord degree label that is not one of I, ii, iii, IV, V, vi, vii dim
    #[error("unknown chord degree: {0:?}")]
    UnknownChordDegree(String),

    /// A note label that could not be split into a spelling and an octave
    #[error("malformed note label: {0:?}")]
    MalformedNoteLabel(String),
}
