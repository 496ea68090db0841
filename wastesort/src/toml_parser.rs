use toml::Table;
use toml::Value;
use crate::options::Options;
use crate::error::AppError;

fn get_str_val<'a>(val: &'a Value, err: &'static str) -> Result<&'a str, AppError> {
    val.as_str().ok_or(AppError::ConfigParseError(err))
}

fn get_int_val(val: &Value, err: &'static str) -> Result<i64, AppError> {
    val.as_integer().ok_or(AppError::ConfigParseError(err))
}

// integers are accepted too, `threshold = 1` reads naturally
fn get_float_val(val: &Value, err: &'static str) -> Result<f64, AppError> {
    match val {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        _ => Err(AppError::ConfigParseError(err)),
    }
}

fn get_bool_val(val: &Value, err: &'static str) -> Result<bool, AppError> {
    val.as_bool().ok_or(AppError::ConfigParseError(err))
}

fn section<'a>(config: &'a Table, name: &str, err: &'static str) -> Result<Option<&'a Table>, AppError> {
    match config.get(name) {
        Some(val) => val.as_table().map(Some).ok_or(AppError::ConfigParseError(err)),
        None => Ok(None),
    }
}

pub fn parse_toml_config(content: &str, options: &mut Options) -> Result<(), AppError> {

    let toml_config: Table = toml::from_str(content)?;

    if let Some(guide) = section(&toml_config, "guide", "guide must be a table")? {
        if let Some(val) = guide.get("path") {
            options.guide_path.replace(get_str_val(val, "guide.path must be a string value")?.to_owned());
        }
        if let Some(val) = guide.get("threshold") {
            options.threshold.replace(get_float_val(val, "guide.threshold must be a number")?);
        }
        if let Some(val) = guide.get("top_k") {
            options.top_k.replace(get_int_val(val, "guide.top_k must be an integer value")?);
        }
    }

    if let Some(models) = section(&toml_config, "models", "models must be a table")? {
        if let Some(val) = models.get("embedding") {
            options.embedding_model.replace(get_str_val(val, "models.embedding must be a string value")?.to_owned());
        }
        if let Some(val) = models.get("embedding_revision") {
            options.embedding_revision.replace(get_str_val(val, "models.embedding_revision must be a string value")?.to_owned());
        }
        if let Some(val) = models.get("vision") {
            options.vision_model.replace(get_str_val(val, "models.vision must be a string value")?.to_owned());
        }
    }

    if let Some(rag) = section(&toml_config, "rag", "rag must be a table")? {
        if let Some(val) = rag.get("url") {
            options.url.replace(get_str_val(val, "rag.url must be a string value")?.to_owned());
        }
        if let Some(val) = rag.get("index") {
            options.index_path.replace(get_str_val(val, "rag.index must be a string value")?.to_owned());
        }
        if let Some(val) = rag.get("chunk_size") {
            options.chunk_size.replace(get_int_val(val, "rag.chunk_size must be an integer value")?);
        }
        if let Some(val) = rag.get("chunk_overlap") {
            options.chunk_overlap.replace(get_int_val(val, "rag.chunk_overlap must be an integer value")?);
        }
        if let Some(val) = rag.get("top_k") {
            options.retrieve_k.replace(get_int_val(val, "rag.top_k must be an integer value")?);
        }
        if let Some(val) = rag.get("prompt") {
            options.prompt.replace(get_str_val(val, "rag.prompt must be a string value")?.to_owned());
        }
    }

    if let Some(llm) = section(&toml_config, "llm", "llm must be a table")? {
        if let Some(val) = llm.get("model") {
            options.model.replace(get_str_val(val, "llm.model must be a string value")?.to_owned());
        }
        if let Some(val) = llm.get("api_key") {
            options.api_key.replace(get_str_val(val, "llm.api_key must be a string value")?.to_owned());
        }
        if let Some(val) = llm.get("api_url") {
            options.api_url.replace(get_str_val(val, "llm.api_url must be a string value")?.to_owned());
        }
        if let Some(val) = llm.get("max_tokens") {
            options.max_tokens.replace(get_int_val(val, "llm.max_tokens must be an integer value")?);
        }
        if let Some(val) = llm.get("temperature") {
            options.temperature.replace(get_float_val(val, "llm.temperature must be a number")?);
        }
        if let Some(val) = llm.get("top_p") {
            options.top_p.replace(get_float_val(val, "llm.top_p must be a number")?);
        }
        if let Some(val) = llm.get("stop_sequence") {
            options.stop_sequence.replace(get_str_val(val, "llm.stop_sequence must be a string value")?.to_owned());
        }
    }

    if let Some(settings) = section(&toml_config, "settings", "settings must be a table")? {
        if let Some(val) = settings.get("color") {
            options.color.replace(get_bool_val(val, "settings.color must be a boolean value")?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parser() {
        const SAMPLE_CONTENT: &str = "
[guide]
path = \"data/waste_guide.csv\"   # CSV with clip_label, paderborn_disposal, notes
threshold = 0.45
top_k = 2

[models]
embedding = \"sentence-transformers/all-MiniLM-L12-v2\"
embedding_revision = \"main\"
vision = \"google/vit-base-patch16-224\"

[rag]
url = \"https://www.asp-paderborn.de/abfall-abc/\"
index = \"vectorstore/index.json\"
chunk_size = 400
chunk_overlap = 40
top_k = 3
prompt = \"Answer in Japanese.\"

[llm]
model = \"meta-llama/Meta-Llama-3-8B-Instruct\"
api_url = \"https://router.huggingface.co/v1/chat/completions\"
api_key = \"<your-api-key>\"
max_tokens = 256
temperature = 1
top_p = 0.9
stop_sequence = \"seq\"

[settings]
color = false
";

        let mut options = Options::new();
        assert!(parse_toml_config(SAMPLE_CONTENT, &mut options).is_ok());

        assert_eq!(options.guide_path, Some("data/waste_guide.csv".into()));
        assert_eq!(options.threshold, Some(0.45));
        assert_eq!(options.top_k, Some(2));
        assert_eq!(options.embedding_model, Some("sentence-transformers/all-MiniLM-L12-v2".into()));
        assert_eq!(options.embedding_revision, Some("main".into()));
        assert_eq!(options.vision_model, Some("google/vit-base-patch16-224".into()));
        assert_eq!(options.url, Some("https://www.asp-paderborn.de/abfall-abc/".into()));
        assert_eq!(options.index_path, Some("vectorstore/index.json".into()));
        assert_eq!(options.chunk_size, Some(400));
        assert_eq!(options.chunk_overlap, Some(40));
        assert_eq!(options.retrieve_k, Some(3));
        assert_eq!(options.prompt, Some("Answer in Japanese.".into()));
        assert_eq!(options.model, Some("meta-llama/Meta-Llama-3-8B-Instruct".into()));
        assert_eq!(options.api_url, Some("https://router.huggingface.co/v1/chat/completions".into()));
        assert_eq!(options.api_key, Some("<your-api-key>".into()));
        assert_eq!(options.max_tokens, Some(256));
        assert_eq!(options.temperature, Some(1.0));
        assert_eq!(options.top_p, Some(0.9));
        assert_eq!(options.stop_sequence, Some("seq".into()));
        assert_eq!(options.color, Some(false));
        assert_eq!(options.action, None);
    }

    #[test]
    fn test_toml_parser_errors() {
        let mut options = Options::new();
        assert!(matches!(parse_toml_config("[guide]\nthreshold = \"high\"", &mut options), Err(AppError::ConfigParseError(_))));
        assert!(matches!(parse_toml_config("[guide]\npath = 1", &mut options), Err(AppError::ConfigParseError(_))));
        assert!(matches!(parse_toml_config("guide = 1", &mut options), Err(AppError::ConfigParseError(_))));
        assert!(matches!(parse_toml_config("[settings]\ncolor = \"no\"", &mut options), Err(AppError::ConfigParseError(_))));
        assert!(matches!(parse_toml_config("[guide", &mut options), Err(AppError::TomlError(_))));

        let mut options = Options::new();
        assert!(parse_toml_config("", &mut options).is_ok());
        assert_eq!(options.guide_path, None);
    }
}
