use std::path::Path;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::vit::{Config, Model};
use hf_hub::{api::sync::Api, Repo, RepoType};
use image::imageops::FilterType;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Error;

use super::Classifier;

const IMAGE_SIZE: u32 = 224;


/// Vision transformer classifier.
pub struct VitClassifier {
    model: Model,
    labels: Vec<String>,
    device: Device,
}

impl VitClassifier {
    /// Create a new instance, downloading the model files on first use.
    pub fn new(model_id: String, device: Device) -> Result<Self, Error> {
        info!("Loading image classification model {model_id}");

        let (config_filename, weights_filename) = {
            let api = Api::new()?;
            let api = api.repo(Repo::new(model_id, RepoType::Model));
            (api.get("config.json")?, api.get("model.safetensors")?)
        };

        let config = std::fs::read_to_string(config_filename.clone())
            .map_err(|e| Error::Error(format!("Failed to load {}: {}", config_filename.to_string_lossy(), e)))?;
        let labels = Self::parse_labels(&serde_json::from_str(&config)?)?;

        debug!("Image classifier has {} labels", labels.len());

        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_filename], DType::F32, &device)? };
        let model = Model::new(&Config::vit_base_patch16_224(), labels.len(), vb)?;

        Ok(VitClassifier {
            model,
            labels,
            device,
        })
    }

    /// Labels ordered by class index, from the `id2label` map of the model config.
    fn parse_labels(config: &Value) -> Result<Vec<String>, Error> {
        let id2label = config["id2label"]
            .as_object()
            .ok_or(Error::ConfigError("model config has no id2label map"))?;

        let mut labels = vec![String::new(); id2label.len()];
        for (id, label) in id2label {
            let idx = id.parse::<usize>()
                .ok()
                .filter(|idx| *idx < labels.len())
                .ok_or(Error::ConfigError("id2label keys must be class indices"))?;
            labels[idx] = label
                .as_str()
                .ok_or(Error::ConfigError("id2label values must be strings"))?
                .to_owned();
        }

        Ok(labels)
    }

    /// Resize to 224x224 RGB and scale pixels to [-1, 1] (mean 0.5, std 0.5).
    fn load_image(&self, path: &Path) -> Result<Tensor, Error> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle)
            .to_rgb8();

        let data = img.into_raw();
        let size = IMAGE_SIZE as usize;
        let tensor = Tensor::from_vec(data, (size, size, 3), &self.device)?
            .permute((2, 0, 1))?
            .to_dtype(DType::F32)?
            .affine(2. / 255., -1.)?;

        Ok(tensor)
    }
}

impl Classifier for VitClassifier {

    fn classify(&self, image: &Path) -> Result<String, Error> {
        let pixels = self.load_image(image)?.unsqueeze(0)?;

        let logits = self.model.forward(&pixels)?.squeeze(0)?.to_vec1::<f32>()?;

        let (idx, _) = logits
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or(Error::Error("model returned no logits".to_owned()))?;

        debug!("Image {} classified as class {}", image.display(), idx);

        Ok(self.labels[idx].clone())
    }
}


#[cfg(test)]
mod tests {

    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_labels() {
        let config = json!({
            "id2label": {
                "1": "goldfish, Carassius auratus",
                "0": "tench, Tinca tinca",
                "2": "water bottle"
            }
        });

        let labels = VitClassifier::parse_labels(&config).unwrap();
        assert_eq!(labels, vec!["tench, Tinca tinca", "goldfish, Carassius auratus", "water bottle"]);

        assert!(VitClassifier::parse_labels(&json!({})).is_err());
        assert!(VitClassifier::parse_labels(&json!({"id2label": {"5": "x"}})).is_err());
        assert!(VitClassifier::parse_labels(&json!({"id2label": {"a": "x"}})).is_err());
        assert!(VitClassifier::parse_labels(&json!({"id2label": {"0": 1}})).is_err());
    }
}
