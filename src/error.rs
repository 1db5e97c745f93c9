use thiserror::Error;

/// Top-level error type for the tomogeo geometry kernel.
#[derive(Debug, Error)]
pub enum TomoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors related to parameter domains and sampling grids.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("interval product must have at least one axis")]
    Empty,

    #[error("bound vectors have mismatched lengths: {min_len} vs {max_len}")]
    BoundsMismatch { min_len: usize, max_len: usize },

    #[error("invalid interval bounds on axis {axis}: min {min} > max {max}")]
    InvalidBounds { axis: usize, min: f64, max: f64 },

    #[error("grid axis {axis} has no points")]
    EmptyAxis { axis: usize },

    #[error("grid axis {axis} coordinates are not strictly increasing")]
    NotIncreasing { axis: usize },

    #[error("shape mismatch: expected {expected} axes, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("grid axis {axis} with {n} points has inconsistent bounds [{min}, {max}]")]
    DegenerateAxis {
        axis: usize,
        n: usize,
        min: f64,
        max: f64,
    },
}

/// Errors related to detector construction and evaluation.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector parameter has {actual} components, expected {expected}")]
    ParamShape { expected: usize, actual: usize },

    #[error("detector parameter domain has {actual} dimensions, expected {expected}")]
    DomainDimension { expected: usize, actual: usize },

    #[error("detector sampling grid is not contained in the parameter domain")]
    GridNotInParams,

    #[error("detector axes are degenerate (parallel or zero-length)")]
    DegenerateAxes,
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("angle parameters must form a one-dimensional interval, got {ndim} dimensions")]
    AngleIntervalNotOneDim { ndim: usize },

    #[error("angle grid is not contained in the angle interval")]
    GridNotInInterval,

    #[error("{name} parameter {value:?} is outside the valid domain")]
    ParamOutOfDomain { name: &'static str, value: Vec<f64> },

    #[error("motion parameter has {actual} components, expected {expected}")]
    MotionParamShape { expected: usize, actual: usize },

    #[error("rotation axis must have exactly 3 components, got {len}")]
    AxisNotThreeDim { len: usize },

    #[error("detector is embedded in {actual} dimensions, expected {expected}")]
    AmbientDimension { expected: usize, actual: usize },

    #[error("radius must be positive, got {value}")]
    NonPositiveRadius { value: f64 },

    #[error("ray direction is not defined for this geometry")]
    RayDirectionUndefined,

    #[error("zero-length vector")]
    ZeroVector,
}

/// Convenience type alias for results using [`TomoError`].
pub type Result<T> = std::result::Result<T, TomoError>;
