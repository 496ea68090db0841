use candle_core::{Device, Tensor};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{Tokenizer, TruncationParams};
use candle_transformers::models::bert::{BertModel, Config, HiddenAct, DTYPE};
use candle_nn::VarBuilder;
use tracing::{debug, info};

use crate::error::Error;

use super::Embedding;

const MAX_TOKENS: usize = 512;


/// Embeddings generator.
pub struct GenEmbeddings {
    model: BertModel,
    tokenizer: Tokenizer,
}

impl GenEmbeddings {
    /// Create a new instance, downloading the model files on first use.
    pub fn new(model_id: String, 
        revision: String,
        use_pth: bool,
        device: Device,
        approximate_gelu: bool) -> Result<Self, Error> 
    {
        info!("Loading embedding model {model_id} ({revision})");

        let repo = Repo::with_revision(model_id, RepoType::Model, revision);
        let (config_filename, tokenizer_filename, weights_filename) = {

            let api = Api::new()?;
            let api = api.repo(repo);
            let config = api.get("config.json")?;
            let tokenizer = api.get("tokenizer.json")?;
            let weights = if use_pth {
                api.get("pytorch_model.bin")?
            } else {
                api.get("model.safetensors")?
            };
            (config, tokenizer, weights)
        };

        debug!("Embedding model files at {}", weights_filename.to_string_lossy());

        let config = std::fs::read_to_string(config_filename.clone())
            .map_err(|e| Error::Error(format!("Failed to load {}: {}", config_filename.to_string_lossy(), e)))?;
        let mut config: Config = serde_json::from_str(&config)
            .map_err(|e| Error::Error(format!("Failed to parse json from {}: {}", config_filename.to_string_lossy(), e)))?;
        let mut tokenizer = Tokenizer::from_file(tokenizer_filename.clone())
            .map_err(|e| Error::Error(format!("Failed to load tokenizer from {}: {}", tokenizer_filename.to_string_lossy(), e)))?;

        // Single sentences only, so no padding; long chunks are cut at the position embedding limit.
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams { max_length: MAX_TOKENS, ..Default::default() }))
            .map_err(|e| Error::Error(format!("tokenizer build error: {}", e)))?;

        let vb = if use_pth {
            VarBuilder::from_pth(&weights_filename, DTYPE, &device)?
        } else {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_filename], DTYPE, &device)? }
        };

        if approximate_gelu {
            config.hidden_act = HiddenAct::GeluApproximate;
        }
        let model = BertModel::load(vb, &config)?;

        Ok(GenEmbeddings {
            model,
            tokenizer,
        })
    }   

    fn normalize_l2(v: &Tensor) -> Result<Tensor, Error> {
        Ok(v.broadcast_div(&v.sqr()?.sum_keepdim(1)?.sqrt()?)?)
    }
}

impl Embedding for GenEmbeddings {

    fn get_embeddings(&self, text: &str) -> Result<Vec<f32>, Error>  {

        let device = &self.model.device;

        let tokens = self.tokenizer
            .encode(text, true)
            .map_err(|e| Error::Error(format!("tokenization error: {}", e)))?
            .get_ids()
            .to_vec();

        let token_ids = Tensor::new(&tokens[..], device)?.unsqueeze(0)?;
        let token_type_ids = token_ids.zeros_like()?;

        let embeddings = self.model.forward(&token_ids, &token_type_ids, None)?;

        // mean pooling over tokens
        let (_n_sentence, n_tokens, _hidden_size) = embeddings.dims3()?;
        let embeddings = (embeddings.sum(1)? / (n_tokens as f64))?;
        let embeddings = Self::normalize_l2(&embeddings)?;

        Ok(embeddings.squeeze(0)?.to_vec1::<f32>()?)
    }
}
