use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, Module, VarBuilder};
use image::imageops::FilterType;

use super::{classify, InferenceError};

/// Input raster edge length; the classifier was trained on 128x128 crops.
pub const IMAGE_SIZE: usize = 128;

/// Binary real-vs-fake classifier: three conv/pool blocks into two linear
/// layers with a sigmoid head producing one scalar in [0, 1].
pub struct DetectorModel {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl DetectorModel {
    /// Reads the safetensors artifact at `path`. Any read or parse failure
    /// surfaces here so the caller can fall back to `ModelState::Unloaded`.
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(path, &device)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        Ok(Self::new(vb, device)?)
    }

    pub fn new(vb: VarBuilder, device: Device) -> Result<Self, candle_core::Error> {
        let cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };
        let conv1 = conv2d(3, 32, 3, cfg, vb.pp("conv1"))?;
        let conv2 = conv2d(32, 64, 3, cfg, vb.pp("conv2"))?;
        let conv3 = conv2d(64, 128, 3, cfg, vb.pp("conv3"))?;
        // Three 2x poolings bring 128 down to 16.
        let flat = 128 * (IMAGE_SIZE / 8) * (IMAGE_SIZE / 8);
        let fc1 = linear(flat, 128, vb.pp("fc1"))?;
        let fc2 = linear(128, 1, vb.pp("fc2"))?;
        Ok(Self {
            conv1,
            conv2,
            conv3,
            fc1,
            fc2,
            device,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor, candle_core::Error> {
        let xs = self.conv1.forward(xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv2.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv3.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        let xs = self.fc2.forward(&xs)?;
        candle_nn::ops::sigmoid(&xs)
    }

    /// Decodes the image at `file_path`, resizes it to the fixed raster,
    /// runs a single-item batch through the network and classifies the
    /// lone scalar output. Failures surface to the caller; there are no
    /// retries and no default verdict.
    pub fn predict(&self, file_path: &Path) -> Result<(&'static str, f32), InferenceError> {
        let img = image::open(file_path)?;
        let rgb = img
            .resize_exact(IMAGE_SIZE as u32, IMAGE_SIZE as u32, FilterType::Triangle)
            .to_rgb8();
        let pixels: Vec<f32> = rgb
            .into_raw()
            .into_iter()
            .map(|v| f32::from(v) / 255.0)
            .collect();

        let input = Tensor::from_vec(pixels, (IMAGE_SIZE, IMAGE_SIZE, 3), &self.device)?
            .permute((2, 0, 1))?
            .unsqueeze(0)?;
        let output = self.forward(&input)?;
        let p = output.flatten_all()?.to_vec1::<f32>()?[0];
        Ok(classify(p))
    }
}
