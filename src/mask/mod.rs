pub mod binarize;
pub mod buffer;
pub mod codec;
pub mod composite;
pub mod error;
pub mod fill;
pub mod history;
pub mod model;
pub mod predict;
pub mod session;
pub mod stroke;

pub use buffer::PixelBuffer;
pub use error::{EditError, EditResult};
pub use history::HistoryStack;
pub use model::{BrushMode, BrushState, FillRequest, Region, Rgba};
pub use predict::{MaskPredictor, PredictOutcome, PredictSource};
pub use session::MaskEditor;
pub use stroke::StrokeRasterizer;
