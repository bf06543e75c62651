use serde::Serialize;

/// Why a grid curve was refused by the extent engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("curved grid")]
    NotALine,
    #[error("degenerate grid line")]
    Degenerate,
    #[error("grid unsuitable in plan")]
    UnsuitableInPlane,
    #[error("grid does not intersect box twice")]
    NoDoubleIntersection,
    #[error("new 2D length too small")]
    TooShort,
}

/// A target plane refused to build a curve from the given end points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConstructionError(pub String);

impl ConstructionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Per-item failure of an engine operation. None of these abort a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    #[error("curve has no usable axis orientation")]
    Unclassifiable,
    #[error(
        "no grid intersection anchor ({vertical} vertical, {horizontal} horizontal candidates)"
    )]
    NoIntersectionAnchor { vertical: usize, horizontal: usize },
    #[error("viewport transform unavailable")]
    TransformUnavailable,
    #[error("unsupported viewport rotation: {0}")]
    UnsupportedRotation(String),
    #[error("geometry rejected: {0}")]
    GeometryRejected(#[from] Rejection),
    #[error("curve construction failed: {primary}{}", fallback_suffix(.fallback.as_ref()))]
    ConstructionFailure {
        primary: ConstructionError,
        fallback: Option<ConstructionError>,
    },
}

fn fallback_suffix(fallback: Option<&ConstructionError>) -> String {
    fallback.map_or_else(String::new, |err| format!(" (fallback failed: {err})"))
}

impl AlignError {
    /// Stable, machine-friendly name of the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unclassifiable => "unclassifiable",
            Self::NoIntersectionAnchor { .. } => "no_intersection_anchor",
            Self::TransformUnavailable => "transform_unavailable",
            Self::UnsupportedRotation(_) => "unsupported_rotation",
            Self::GeometryRejected(_) => "geometry_rejected",
            Self::ConstructionFailure { .. } => "construction_failure",
        }
    }

    /// Expected geometric skips (as opposed to construction errors) for report grouping.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        !matches!(self, Self::ConstructionFailure { .. })
    }
}

pub type AlignResult<T> = Result<T, AlignError>;
