use std::path::PathBuf;

use wastesort_lib::lookup::{LookupParams, DEFAULT_THRESHOLD, DEFAULT_TOP_K};
use wastesort_lib::rag::{TextSplitter, CHUNK_OVERLAP, CHUNK_SIZE, DEFAULT_TOP_K as DEFAULT_RETRIEVE_K, DEFAULT_URL};
use wastesort_lib::{embedding, vision, LlmConfig};

use crate::{error::AppError, options::{Action, Options}};

/// Default disposal guide location.
pub const DEFAULT_GUIDE_PATH: &str = "data/waste_guide.csv";

/// Default vector index location.
pub const DEFAULT_INDEX_PATH: &str = "vectorstore/index.json";

/// Pretrained models.
#[derive(Clone, Debug)]
pub struct Models {
    /// Sentence embedding model.
    pub embedding: String,
    /// Sentence embedding model revision.
    pub embedding_revision: String,
    /// Image classification model.
    pub vision: String,
}

/// Website question answering settings.
#[derive(Clone, Debug)]
pub struct RagSettings {
    /// Waste guide web page.
    pub url: String,
    /// Vector index file.
    pub index_path: PathBuf,
    /// Text splitter used when building the index.
    pub splitter: TextSplitter,
    /// Chunks retrieved per question.
    pub top_k: usize,
}

/// Application settings.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Colored output.
    pub color: bool,
}

/// App config
#[derive(Clone, Debug)]
pub struct Config {
    /// What to do.
    pub action: Action,
    /// Disposal guide CSV.
    pub guide_path: PathBuf,
    /// Disposal lookup parameters.
    pub lookup: LookupParams,
    /// Models.
    pub models: Models,
    /// Question answering settings.
    pub rag: RagSettings,
    /// LLM parameters, present when an API key is configured.
    pub llm: Option<LlmConfig>,
    /// Custom instructions to add to the question answering prompt.
    pub prompt: Option<String>,
    /// Settings
    pub settings: Settings,
}

fn to_usize(val: Option<i64>, default: usize, allow_zero: bool, err: &'static str) -> Result<usize, AppError> {
    match val {
        None => Ok(default),
        Some(v) => usize::try_from(v)
            .ok()
            .filter(|v| allow_zero || *v > 0)
            .ok_or(AppError::InvalidArgError(err)),
    }
}

impl TryFrom<Options> for Config {
    type Error = AppError;

    fn try_from(options: Options) -> Result<Self, AppError> {
        let action = options.action.ok_or(AppError::MissingArgError("command is not specified."))?;

        let lookup = LookupParams::new(
            options.threshold.map(|t| t as f32).unwrap_or(DEFAULT_THRESHOLD),
            to_usize(options.top_k, DEFAULT_TOP_K, false, "top_k must be greater than zero")?,
        )?;

        let models = Models {
            embedding: options.embedding_model.unwrap_or(embedding::DEFAULT_MODEL.to_owned()),
            embedding_revision: options.embedding_revision.unwrap_or(embedding::DEFAULT_REVISION.to_owned()),
            vision: options.vision_model.unwrap_or(vision::DEFAULT_MODEL.to_owned()),
        };

        let splitter = TextSplitter::new(
            to_usize(options.chunk_size, CHUNK_SIZE, false, "chunk_size must be greater than zero")?,
            to_usize(options.chunk_overlap, CHUNK_OVERLAP, true, "chunk_overlap must not be negative")?,
        )?;

        let rag = RagSettings {
            url: options.url.unwrap_or(DEFAULT_URL.to_owned()),
            index_path: PathBuf::from(options.index_path.unwrap_or(DEFAULT_INDEX_PATH.to_owned())),
            splitter,
            top_k: to_usize(options.retrieve_k, DEFAULT_RETRIEVE_K, false, "retrieve_k must be greater than zero")?,
        };

        let llm = options.api_key.map(|api_key| {
            let mut llm = LlmConfig::new(api_key);
            if let Some(model) = options.model {
                llm.name = model;
            }
            if let Some(api_url) = options.api_url {
                llm.api_url = api_url;
            }
            llm.max_tokens = options.max_tokens.or(llm.max_tokens);
            llm.temperature = options.temperature.or(llm.temperature);
            llm.top_p = options.top_p.or(llm.top_p);
            llm.stop_sequence = options.stop_sequence;
            llm
        });

        if matches!(action, Action::Ask(_)) && llm.is_none() {
            return Err(AppError::MissingArgError("API key is not specified."));
        }

        Ok(Config {
            action,
            guide_path: PathBuf::from(options.guide_path.unwrap_or(DEFAULT_GUIDE_PATH.to_owned())),
            lookup,
            models,
            rag,
            llm,
            prompt: options.prompt,
            settings: Settings {
                color: options.color.unwrap_or(true),
            },
        })
    }
}
