#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// Brush radius or spacing outside the accepted range.
    Configuration { field: &'static str, value: f64 },
    /// Seed point or region does not touch the buffer.
    OutOfBounds { x: i64, y: i64, width: u32, height: u32 },
    /// Externally supplied image bytes could not be turned into pixels.
    Decode(String),
    Encode(String),
    /// Raw pixel payload length does not match `width * height * 4`.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::Configuration { field, value } => {
                write!(f, "invalid brush {field}: {value}")
            }
            EditError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(f, "({x}, {y}) is outside the {width}x{height} buffer"),
            EditError::Decode(reason) => write!(f, "failed to decode image: {reason}"),
            EditError::Encode(reason) => write!(f, "failed to encode image: {reason}"),
            EditError::DimensionMismatch { expected, actual } => {
                write!(f, "expected {expected} pixel bytes, got {actual}")
            }
        }
    }
}

impl std::error::Error for EditError {}

pub type EditResult<T> = Result<T, EditError>;
