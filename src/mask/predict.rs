use crate::mask::model::Region;

/// External segmentation service. Receives the PNG-encoded crop and answers
/// with a PNG/JPEG mask of any size, or a human readable failure reason.
pub trait MaskPredictor {
    fn predict(&mut self, crop_png: &[u8]) -> Result<Vec<u8>, String>;
}

impl<F> MaskPredictor for F
where
    F: FnMut(&[u8]) -> Result<Vec<u8>, String>,
{
    fn predict(&mut self, crop_png: &[u8]) -> Result<Vec<u8>, String> {
        self(crop_png)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictSource {
    Predicted,
    /// The raw crop was pasted because prediction failed.
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictOutcome {
    pub source: PredictSource,
    /// Rectangle of the mask that was overwritten, `None` when it was clipped away.
    pub written: Option<Region>,
}
