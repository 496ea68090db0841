//! App initialization functions.

use anstyle::Style;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use crate::error::AppError;
use crate::toml_parser::parse_toml_config;
use dirs::home_dir;

/// Requested action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Classify an image and look up its disposal.
    Classify(PathBuf),
    /// Look up the disposal of a label.
    Lookup(String),
    /// Scrape the waste guide website and build the vector index.
    BuildIndex,
    /// Answer a question, or start a dialogue if there is none.
    Ask(Option<String>),
}

/// App options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Requested action.
    pub action: Option<Action>,
    /// Disposal guide CSV path.
    pub guide_path: Option<String>,
    /// Similarity threshold for a disposal match.
    pub threshold: Option<f64>,
    /// Ranked candidates considered by the lookup.
    pub top_k: Option<i64>,
    /// Sentence embedding model.
    pub embedding_model: Option<String>,
    /// Sentence embedding model revision.
    pub embedding_revision: Option<String>,
    /// Image classification model.
    pub vision_model: Option<String>,
    /// Waste guide web page.
    pub url: Option<String>,
    /// Vector index file.
    pub index_path: Option<String>,
    /// Chunk size, characters.
    pub chunk_size: Option<i64>,
    /// Chunk overlap, characters.
    pub chunk_overlap: Option<i64>,
    /// Chunks retrieved per question.
    pub retrieve_k: Option<i64>,
    /// LLM name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// LLM API URL.
    pub api_url: Option<String>,
    /// Maximum number of tokens that will be generated.
    pub max_tokens: Option<i64>,
    /// Level of randomization when choosing tokens.
    pub temperature: Option<f64>,
    /// Only the tokens comprising the top_p probability mass will be considered.
    pub top_p: Option<f64>,
    /// Sequence at which model will stop generating.
    pub stop_sequence: Option<String>,
    /// Custom instructions to add to the question answering prompt.
    pub prompt: Option<String>,
    /// Colored output.
    pub color: Option<bool>,
}


macro_rules! check_and_set_float_arg {
    ($arg:literal, $m:ident, $option:expr) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            if let Ok(val) = f64::from_str(x) {
                $option.replace(val);
            } else {
                return Err(AppError::InvalidArgError(concat!($arg, " must be floating point number")));
            }
        }
    }
}

macro_rules! check_and_set_positive_arg {
    ($arg:literal, $m:ident, $option:expr) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            if let Ok(val) = x.parse::<i64>() {
                if val <= 0 { return Err(AppError::InvalidArgError(concat!($arg, " must be greater than zero"))) };
                $option.replace(val);
            } else {
                return Err(AppError::InvalidArgError(concat!($arg, " must be integer")));
            }
        }
    }
}

macro_rules! check_and_set_str_arg {
    ($arg:literal, $m:ident, $option:expr) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            $option.replace(x.clone());
        }
    }
}

fn opt(name: &'static str, help: &'static str, env: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .env(env)
        .required(false)
}

impl Options {

    /// Create new unfilled options.
    pub fn new() -> Self {
        Options::default()
    }

    fn argument_parser<T>(args: impl IntoIterator<Item = T>) -> ArgMatches where T: Into<OsString> + Clone {
        let bold_underline = Style::new().underline().bold();
        let bold = Style::new().bold();

        Command::new("wastesort")
            .about("Classifies a photo of waste and tells how to dispose of it in Paderborn.")
            .version(env!("CARGO_PKG_VERSION"))
            .arg(opt("config", "Config file path", "WASTESORT_CONFIG").short('c'))
            .arg(opt("guide", "Disposal guide CSV (columns clip_label, paderborn_disposal, notes)", "WASTESORT_GUIDE").short('g'))
            .arg(opt("threshold", "Minimum label similarity for a disposal match (exclusive)", "WASTESORT_THRESHOLD"))
            .arg(opt("top-k", "Number of ranked guide entries considered per lookup", "WASTESORT_TOP_K"))
            .arg(opt("embedding-model", "Sentence embedding model on Hugging Face hub", "WASTESORT_EMBEDDING_MODEL"))
            .arg(opt("embedding-revision", "Sentence embedding model revision", "WASTESORT_EMBEDDING_REVISION"))
            .arg(opt("vision-model", "Image classification model on Hugging Face hub", "WASTESORT_VISION_MODEL"))
            .arg(opt("url", "Waste guide web page used to build the vector index", "WASTESORT_URL"))
            .arg(opt("index", "Vector index file", "WASTESORT_INDEX").short('i'))
            .arg(opt("retrieve-k", "Number of text chunks retrieved per question", "WASTESORT_RETRIEVE_K"))
            .arg(opt("model", "LLM name", "WASTESORT_MODEL").short('m'))
            .arg(opt("api-key", "LLM API key", "WASTESORT_API_KEY").short('k'))
            .arg(opt("api-url", "LLM chat completions API URL", "WASTESORT_API_URL").short('u'))
            .arg(opt("max-tokens", "Maximum number of tokens that will be generated", "WASTESORT_MAX_TOKENS"))
            .arg(opt("temperature", "Level of randomization when LLM choose tokens", "WASTESORT_TEMPERATURE"))
            .arg(opt("top-p", "Only the tokens comprising the top_p probability mass will be considered", "WASTESORT_TOP_P"))
            .arg(opt("stop-sequence", "Sequence at which model will stop generating", "WASTESORT_STOP_SEQUENCE"))
            .arg(opt("prompt", "Custom instructions to use in the question answering prompt", "WASTESORT_PROMPT"))
            .arg(
                Arg::new("no-color")
                .long("no-color")
                .help("Plain output without colors")
                .action(ArgAction::SetTrue)
            )
            .subcommand(
                Command::new("classify")
                .about("Classify an image and show how to dispose of it")
                .arg(Arg::new("image").help("Image file (jpg, jpeg, png)").required(true))
            )
            .subcommand(
                Command::new("lookup")
                .about("Show how to dispose of a waste label")
                .arg(Arg::new("label").help("Waste label, e.g. 'water bottle'").required(true))
            )
            .subcommand(
                Command::new("build-index")
                .about("Scrape the waste guide web page and build the vector index")
            )
            .subcommand(
                Command::new("ask")
                .about("Answer a question about waste disposal using the vector index and an LLM")
                .arg(Arg::new("question").help("Question; starts a dialogue if omitted").required(false))
            )
            .after_help(format!("{bold_underline}Example:{bold_underline:#} {bold}

    wastesort classify photo.jpg
    wastesort --api-key=<your-key> ask 'Where do I put an old frying pan?'{bold:#}

Wastesort uses the configuration file .wastesort.toml from user's home directory, or the one specified with -c option (see sample_config.toml for the reference).
The configuration options can be overridden with the command line arguments or environment variables.
Set WASTESORT_LOG (e.g. 'info' or 'wastesort_lib=debug') to see log messages."))
            .get_matches_from(args)
    }

    fn load_config_file(path: Option<&str>) -> Result<Option<String>, std::io::Error> {
        Ok(if let Some(p) = path {
            Some(std::fs::read_to_string(p)?)
        } else if let Some(mut p) = home_dir() {
            p.push(".wastesort.toml");
            if std::fs::exists(p.as_path())? {
                Some(std::fs::read_to_string(p.as_path())?)
            } else {
                None
            }
        } else {
            None
        })
    }

    fn parse_action(m: &ArgMatches) -> Option<Action> {
        match m.subcommand() {
            Some(("classify", sub)) => sub.get_one::<String>("image").map(|p| Action::Classify(PathBuf::from(p))),
            Some(("lookup", sub)) => sub.get_one::<String>("label").map(|l| Action::Lookup(l.clone())),
            Some(("build-index", _)) => Some(Action::BuildIndex),
            Some(("ask", sub)) => Some(Action::Ask(sub.get_one::<String>("question").cloned())),
            _ => None,
        }
    }

    fn validate_mandatory_options(options: &Options) -> Result<(), AppError> {
        if options.action.is_none() {
            return Err(AppError::MissingArgError("command is not specified."));
        }
        if let Some(Action::Ask(_)) = options.action {
            if options.api_key.is_none() {
                return Err(AppError::MissingArgError("API key is not specified."));
            }
        }

        Ok(())
    }

    /// Load and validate options from env, command line arguments, config file.
    pub fn load<T>(args: impl IntoIterator<Item = T>) -> Result<Self, AppError>
        where T: Into<OsString> + Clone
    {
        let m = Self::argument_parser(args);

        let mut options = Options::new();

        let config_path = m.get_one("config").map(|s: &String| s.as_ref());

        if let Some(content) = Self::load_config_file(config_path)
            .map_err(|err| AppError::Error(format!("Error loading config file: {}", err)))?
        {
            parse_toml_config(&content, &mut options)?;
        }

        check_and_set_str_arg!("guide", m, options.guide_path);
        check_and_set_float_arg!("threshold", m, options.threshold);
        check_and_set_positive_arg!("top-k", m, options.top_k);
        check_and_set_str_arg!("embedding-model", m, options.embedding_model);
        check_and_set_str_arg!("embedding-revision", m, options.embedding_revision);
        check_and_set_str_arg!("vision-model", m, options.vision_model);
        check_and_set_str_arg!("url", m, options.url);
        check_and_set_str_arg!("index", m, options.index_path);
        check_and_set_positive_arg!("retrieve-k", m, options.retrieve_k);
        check_and_set_str_arg!("model", m, options.model);
        check_and_set_str_arg!("api-key", m, options.api_key);
        check_and_set_str_arg!("api-url", m, options.api_url);
        check_and_set_positive_arg!("max-tokens", m, options.max_tokens);
        check_and_set_float_arg!("temperature", m, options.temperature);
        check_and_set_float_arg!("top-p", m, options.top_p);
        check_and_set_str_arg!("stop-sequence", m, options.stop_sequence);
        check_and_set_str_arg!("prompt", m, options.prompt);

        if m.get_flag("no-color") {
            options.color.replace(false);
        }

        options.action = Self::parse_action(&m);

        Self::validate_mandatory_options(&options)?;

        Ok(options)
    }
}


#[cfg(test)]
mod tests {

    use std::io::Write;

    use super::*;

    fn empty_config() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().expect("temp config file")
    }

    #[test]
    fn test_load_options() {
        let config = empty_config();
        let config_arg = format!("--config={}", config.path().display());

        let args = vec![
            OsString::from("/bin/path"),
            OsString::from(&config_arg),
            OsString::from("--guide=<guide>"),
            OsString::from("--threshold=0.55"),
            OsString::from("--top-k=3"),
            OsString::from("--embedding-model=<embedding-model>"),
            OsString::from("--embedding-revision=<embedding-revision>"),
            OsString::from("--vision-model=<vision-model>"),
            OsString::from("--url=<url>"),
            OsString::from("--index=<index>"),
            OsString::from("--retrieve-k=4"),
            OsString::from("--model=<model>"),
            OsString::from("--api-key=<api-key>"),
            OsString::from("--api-url=<api-url>"),
            OsString::from("--max-tokens=789"),
            OsString::from("--temperature=0.456"),
            OsString::from("--top-p=0.123"),
            OsString::from("--stop-sequence=<stop-sequence>"),
            OsString::from("--prompt=<prompt>"),
            OsString::from("--no-color"),
            OsString::from("ask"),
            OsString::from("Where does a pizza box go?"),
        ];

        let options = Options::load(args.clone()).expect("load options");

        assert_eq!(options.action, Some(Action::Ask(Some("Where does a pizza box go?".into()))));
        assert_eq!(options.guide_path, Some("<guide>".into()));
        assert_eq!(options.threshold, Some(0.55));
        assert_eq!(options.top_k, Some(3));
        assert_eq!(options.embedding_model, Some("<embedding-model>".into()));
        assert_eq!(options.embedding_revision, Some("<embedding-revision>".into()));
        assert_eq!(options.vision_model, Some("<vision-model>".into()));
        assert_eq!(options.url, Some("<url>".into()));
        assert_eq!(options.index_path, Some("<index>".into()));
        assert_eq!(options.retrieve_k, Some(4));
        assert_eq!(options.model, Some("<model>".into()));
        assert_eq!(options.api_key, Some("<api-key>".into()));
        assert_eq!(options.api_url, Some("<api-url>".into()));
        assert_eq!(options.max_tokens, Some(789));
        assert_eq!(options.temperature, Some(0.456));
        assert_eq!(options.top_p, Some(0.123));
        assert_eq!(options.stop_sequence, Some("<stop-sequence>".into()));
        assert_eq!(options.prompt, Some("<prompt>".into()));
        assert_eq!(options.color, Some(false));

        // ask without API key
        let mut args2 = args.clone();
        args2.remove(12);
        assert!(matches!(Options::load(args2), Err(AppError::MissingArgError(_))));

        // no command
        let args2 = args[..args.len() - 2].to_vec();
        assert!(matches!(Options::load(args2), Err(AppError::MissingArgError(_))));

        let mut args2 = args.clone();
        args2[3] = "--threshold=high".into();
        assert!(matches!(Options::load(args2), Err(AppError::InvalidArgError(_))));

        let mut args2 = args.clone();
        args2[4] = "--top-k=0".into();
        assert!(matches!(Options::load(args2), Err(AppError::InvalidArgError(_))));
    }

    #[test]
    fn test_load_actions() {
        let config = empty_config();
        let config_arg = format!("--config={}", config.path().display());

        let options = Options::load(["wastesort", config_arg.as_str(), "classify", "photo.jpg"]).unwrap();
        assert_eq!(options.action, Some(Action::Classify("photo.jpg".into())));
        assert_eq!(options.color, None);

        let options = Options::load(["wastesort", config_arg.as_str(), "lookup", "water bottle"]).unwrap();
        assert_eq!(options.action, Some(Action::Lookup("water bottle".into())));

        let options = Options::load(["wastesort", config_arg.as_str(), "build-index"]).unwrap();
        assert_eq!(options.action, Some(Action::BuildIndex));

        let options = Options::load(["wastesort", config_arg.as_str(), "--api-key=k", "ask"]).unwrap();
        assert_eq!(options.action, Some(Action::Ask(None)));
    }

    #[test]
    fn test_command_line_overrides_config_file() {
        let mut config = empty_config();
        write!(config, "[guide]\npath = \"from_file.csv\"\nthreshold = 0.3\n").unwrap();
        let config_arg = format!("--config={}", config.path().display());

        let options = Options::load(["wastesort", config_arg.as_str(), "--threshold=0.6", "lookup", "bottle"]).unwrap();
        assert_eq!(options.guide_path, Some("from_file.csv".into()));
        assert_eq!(options.threshold, Some(0.6));
    }
}
