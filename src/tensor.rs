//! Host tensor form of an image batch.

use crate::error::NodeError;

/// Number of colour channels in a host tensor (RGB).
pub const CHANNELS: usize = 3;

/// A batch of RGB images laid out as `[batch, height, width, 3]`.
///
/// Channel values are `f32` in `[0, 1]`. Every frame in the batch shares the
/// same height and width.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    batch: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

/// One frame of an [`ImageTensor`], borrowed.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Frame height in pixels.
    pub height: usize,
    /// Frame width in pixels.
    pub width: usize,
    /// Row-major RGB values, `height * width * 3` long.
    pub data: &'a [f32],
}

impl ImageTensor {
    /// Build a tensor from raw values.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not hold `batch * height * width * 3`
    /// values or any dimension is zero.
    pub fn new(batch: usize, height: usize, width: usize, data: Vec<f32>) -> Result<Self, NodeError> {
        if batch == 0 || height == 0 || width == 0 {
            return Err(NodeError::ImageConversion(format!(
                "Tensor dimensions must be non-zero, got [{batch}, {height}, {width}, {CHANNELS}]"
            )));
        }
        let expected = batch * height * width * CHANNELS;
        if data.len() != expected {
            return Err(NodeError::ImageConversion(format!(
                "Tensor of shape [{batch}, {height}, {width}, {CHANNELS}] needs {expected} values, got {}",
                data.len()
            )));
        }
        Ok(Self { batch, height, width, data })
    }

    /// Stack frames of identical size into one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or the frames differ in size.
    pub fn from_frames(frames: Vec<ImageTensor>) -> Result<Self, NodeError> {
        let mut iter = frames.into_iter();
        let Some(mut stacked) = iter.next() else {
            return Err(NodeError::ImageConversion("Cannot build a tensor from zero frames".into()));
        };
        for next in iter {
            if (next.height, next.width) != (stacked.height, stacked.width) {
                return Err(NodeError::ImageConversion(format!(
                    "Frames in a batch must share dimensions: {}x{} vs {}x{}",
                    stacked.width, stacked.height, next.width, next.height
                )));
            }
            stacked.batch += next.batch;
            stacked.data.extend(next.data);
        }
        Ok(stacked)
    }

    /// Shape as `[batch, height, width, channels]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 4] {
        [self.batch, self.height, self.width, CHANNELS]
    }

    /// Number of frames.
    #[must_use]
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Frame height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Frame width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// All values, batch-major.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Borrow frame `index`, if present.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<Frame<'_>> {
        let len = self.frame_len();
        let start = index.checked_mul(len)?;
        self.data.get(start..start.checked_add(len)?).map(|data| Frame { height: self.height, width: self.width, data })
    }

    /// Iterate over frames in batch order.
    pub fn frames(&self) -> impl Iterator<Item = Frame<'_>> {
        self.data
            .chunks_exact(self.frame_len())
            .map(|data| Frame { height: self.height, width: self.width, data })
    }

    fn frame_len(&self) -> usize {
        self.height * self.width * CHANNELS
    }
}
