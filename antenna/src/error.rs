//! Error types and error handling utilities.

use arcstr::ArcStr;

/// A result type returning antenna checker errors.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for antenna checker runs.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No net in the design has routes, from either the detailed or the
    /// global router.
    #[error("no detailed or global routing found; route the design first")]
    NoRoutes,
    /// A special (supply) net was explicitly selected for checking.
    #[error("skipped net `{0}`: special nets are exempt from antenna analysis")]
    SpecialNet(ArcStr),
    /// An I/O error while writing the report file.
    #[error("failed to write antenna report")]
    Io(#[from] std::io::Error),
}
