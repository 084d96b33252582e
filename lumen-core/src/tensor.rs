//! Tensors exchanged with the inference engine.

use ndarray::{Array4, ArrayView4};
use serde::Serialize;

/// Model input of shape `(1, height, width, 3)`, `u8` elements, NHWC layout.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessedTensor {
    data: Array4<u8>,
}

impl PreprocessedTensor {
    /// Wrap an array that already has the `(1, H, W, 3)` shape.
    ///
    /// Returns `None` for any other shape.
    pub fn from_array(data: Array4<u8>) -> Option<Self> {
        let shape = data.shape();
        if shape[0] != 1 || shape[3] != 3 {
            return None;
        }
        Some(Self { data })
    }

    /// Build from packed row-major RGB bytes of one `height x width` image.
    ///
    /// Returns `None` when `data` does not hold `height * width * 3` bytes.
    pub fn from_hwc(height: usize, width: usize, data: Vec<u8>) -> Option<Self> {
        Array4::from_shape_vec((1, height, width, 3), data)
            .ok()
            .and_then(Self::from_array)
    }

    /// Shape as `[batch, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn view(&self) -> ArrayView4<'_, u8> {
        self.data.view()
    }

    pub fn into_inner(self) -> Array4<u8> {
        self.data
    }
}

/// Declared input or output of a loaded model. Dynamic dimensions are `-1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TensorDescriptor {
    pub name: String,
    pub shape: Vec<i64>,
    pub dtype: String,
}

impl TensorDescriptor {
    pub fn new(name: impl Into<String>, shape: Vec<i64>, dtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype: dtype.into(),
        }
    }
}

/// One named output tensor, extracted as `f32`.
#[derive(Clone, Debug, PartialEq)]
pub struct RawOutput {
    pub name: String,
    pub shape: Vec<i64>,
    pub data: Vec<f32>,
}

impl RawOutput {
    pub fn new(name: impl Into<String>, shape: Vec<i64>, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            shape,
            data,
        }
    }

    /// All values in row-major order, ignoring the shape.
    pub fn flattened(&self) -> &[f32] {
        &self.data
    }
}

/// Outputs of one `run`, in the order the model declares them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionOutputs {
    outputs: Vec<RawOutput>,
}

impl SessionOutputs {
    pub fn new(outputs: Vec<RawOutput>) -> Self {
        Self { outputs }
    }

    pub fn first(&self) -> Option<&RawOutput> {
        self.outputs.first()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensor_requires_single_batch_rgb_shape() {
        assert!(PreprocessedTensor::from_array(Array4::zeros((2, 4, 4, 3))).is_none());
        assert!(PreprocessedTensor::from_array(Array4::zeros((1, 3, 4, 4))).is_none());
        let tensor = PreprocessedTensor::from_array(Array4::zeros((1, 5, 7, 3))).unwrap();
        assert_eq!(tensor.shape(), [1, 5, 7, 3]);
        assert_eq!((tensor.height(), tensor.width()), (5, 7));
    }

    #[test]
    fn hwc_bytes_keep_channel_order() {
        let data = vec![1, 2, 3, 4, 5, 6];
        let tensor = PreprocessedTensor::from_hwc(1, 2, data).unwrap();
        assert_eq!(tensor.view()[[0, 0, 1, 0]], 4);
        assert_eq!(tensor.view()[[0, 0, 0, 2]], 3);
        assert!(PreprocessedTensor::from_hwc(2, 2, vec![0; 5]).is_none());
    }

    #[test]
    fn outputs_keep_declared_order() {
        let outputs = SessionOutputs::new(vec![
            RawOutput::new("logits", vec![1, 3], vec![0.1, 0.2, 0.3]),
            RawOutput::new("features", vec![1, 2], vec![1.0, 2.0]),
        ]);
        assert_eq!(outputs.first().map(|o| o.name.as_str()), Some("logits"));
        assert_eq!(outputs.first().unwrap().flattened(), &[0.1, 0.2, 0.3]);
        assert!(SessionOutputs::default().first().is_none());
    }
}
