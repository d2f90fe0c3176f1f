//! Error types and invariant reporting.
//!
//! Invariant violations (programming errors such as asking a container for a
//! cell it does not own) are reported through [`invariant_violated`]: fatal in
//! debug builds, logged and ignored in release builds so a live UI keeps
//! running. The calling operation then degrades to a no-op.

use crate::view::ViewId;

/// A structural invariant of the view tree was broken by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("unknown view {0:?}")]
    UnknownView(ViewId),
    #[error("view {0:?} is not a container")]
    NotAContainer(ViewId),
    #[error("container {container:?} has no cell for view {child:?}")]
    CellNotFound { container: ViewId, child: ViewId },
    #[error("view {0:?} is already attached to a parent")]
    AlreadyAttached(ViewId),
    #[error("container {0:?} re-entered while arranging")]
    ReentrantArrange(ViewId),
}

/// Failure reported by a canvas backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("backend rejected {operation}: {message}")]
    Rejected { operation: &'static str, message: String },
    #[error("drawing surface lost")]
    SurfaceLost,
    #[error("invalid color {0:?}")]
    InvalidColor(String),
}

/// Failure to parse an alignment from its text form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignmentParseError {
    #[error("unknown alignment name: {0}")]
    UnknownName(String),
}

/// Report a broken invariant.
///
/// Panics in debug builds. In release builds the error is logged and the
/// caller carries on.
#[track_caller]
pub(crate) fn invariant_violated(err: ViewError) {
    log::error!("invariant violated: {err}");
    debug_assert!(false, "invariant violated: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn some_id() -> ViewId {
        ViewId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn messages() {
        let id = some_id();
        assert!(ViewError::NotAContainer(id).to_string().contains("not a container"));
        let err = CanvasError::Rejected { operation: "fill_path", message: "no context".into() };
        assert_eq!(err.to_string(), "backend rejected fill_path: no context");
        assert_eq!(
            AlignmentParseError::UnknownName("x".into()).to_string(),
            "unknown alignment name: x"
        );
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invariant violated")]
    fn invariant_violation_panics_in_debug() {
        invariant_violated(ViewError::UnknownView(some_id()));
    }
}
