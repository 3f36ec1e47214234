//! Error type shared by the solver, its collaborators, and the `tapers` binary.
//!
//! Every failure carries an [`ErrorKind`] whose numeric code doubles as the
//! status code returned to callers and as the process exit code in the binary.

/// Failure categories and their status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Output buffers are smaller than the problem requires, or a size overflowed.
    Dimension,
    /// A parameter is outside its admissible range.
    Range,
    /// A scratch buffer could not be allocated.
    Allocation,
    /// Reserved for kernel builders that load or persist precomputed kernels.
    Io,
    /// The tridiagonal eigensolver hit its iteration cap.
    Convergence,
}

impl ErrorKind {
    pub fn code(self) -> u8 {
        match self {
            ErrorKind::Dimension => 1,
            ErrorKind::Range => 2,
            ErrorKind::Allocation => 3,
            ErrorKind::Io => 4,
            ErrorKind::Convergence => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Dimension => "dimension error",
            ErrorKind::Range => "range error",
            ErrorKind::Allocation => "allocation error",
            ErrorKind::Io => "i/o error",
            ErrorKind::Convergence => "convergence error",
        }
    }
}

#[derive(Clone)]
pub struct TaperError {
    kind: ErrorKind,
    message: String,
}

impl TaperError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn dimension(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Dimension, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Range, message)
    }

    pub fn allocation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Allocation, message)
    }

    pub fn convergence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Convergence, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Status code for this failure (also the binary's exit code).
    pub fn exit_code(&self) -> u8 {
        self.kind.code()
    }
}

impl std::fmt::Display for TaperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::fmt::Debug for TaperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaperError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for TaperError {}

/// Reserve a zeroed `f64` buffer of `len` elements without aborting on OOM.
pub(crate) fn try_zeroed(len: usize, what: &str) -> Result<Vec<f64>, TaperError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| TaperError::allocation(format!("Failed to allocate {what} ({len} values): {e}")))?;
    buf.resize(len, 0.0);
    Ok(buf)
}

/// `rows * cols` with overflow reported as a dimension error.
pub(crate) fn checked_area(rows: usize, cols: usize, what: &str) -> Result<usize, TaperError> {
    rows.checked_mul(cols)
        .ok_or_else(|| TaperError::dimension(format!("{what} of {rows}x{cols} overflows usize.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(TaperError::dimension("x").exit_code(), 1);
        assert_eq!(TaperError::range("x").exit_code(), 2);
        assert_eq!(TaperError::allocation("x").exit_code(), 3);
        assert_eq!(TaperError::new(ErrorKind::Io, "x").exit_code(), 4);
        assert_eq!(TaperError::convergence("x").exit_code(), 5);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = TaperError::range("order 3 exceeds lmax 2");
        assert_eq!(err.to_string(), "range error: order 3 exceeds lmax 2");
    }

    #[test]
    fn checked_area_reports_overflow() {
        let err = checked_area(usize::MAX, 2, "taper matrix").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Dimension);
        assert_eq!(checked_area(3, 4, "m").unwrap(), 12);
    }
}
