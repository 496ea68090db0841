use tracing::{info, warn};
use wastesort_lib::embedding::{get_embedding_with, Embedding};
use wastesort_lib::llm::{get_llm, Llm};
use wastesort_lib::lookup::DisposalGuide;
use wastesort_lib::rag::{self, QaChain, VectorIndex};
use wastesort_lib::request::get_reqwest_client;
use wastesort_lib::vision::get_classifier;
use wastesort_lib::Error;

use crate::config::Config;
use crate::error::AppError;
use crate::options::Action;
use crate::prompts::Prompts;
use crate::term::Term;

type Chain = QaChain<Box<dyn Embedding>, Box<dyn Llm>>;

/// Application.
pub struct App {
    config: Config,
    term: Term,
}

impl App {

    /// Create new application.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let term = Term::new(&config);

        Ok(App {
            config,
            term,
        })
    }

    /// Run the configured command.
    pub fn run(&mut self) -> Result<(), AppError> {
        match self.config.action.clone() {
            Action::Classify(image) => {
                self.term.status("Classifying image...");
                let classifier = get_classifier(&self.config.models.vision)?;
                let label = classifier.classify(&image)?;
                self.term.print_label(&label);
                self.show_disposal(&label)
            },
            Action::Lookup(label) => self.show_disposal(&label),
            Action::BuildIndex => self.build_index(),
            Action::Ask(question) => self.ask(question),
        }
    }

    fn embedding(&self) -> Result<Box<dyn Embedding>, AppError> {
        Ok(get_embedding_with(&self.config.models.embedding, &self.config.models.embedding_revision)?)
    }

    fn show_disposal(&self, label: &str) -> Result<(), AppError> {
        let guide = DisposalGuide::open(&self.config.guide_path, self.embedding()?, self.config.lookup);

        if let Some(err) = guide.load_error() {
            return Err(AppError::GuideUnavailable(err.to_string()));
        }

        let result = guide.find(label)?;
        self.term.print_answer(&result.to_string());

        Ok(())
    }

    fn build_index(&self) -> Result<(), AppError> {
        let rag = &self.config.rag;

        self.term.status(&format!("Fetching {}...", rag.url));
        let client = get_reqwest_client()?;
        let embedder = self.embedding()?;

        let index = rag::build_index(client.as_ref(), &rag.url, &rag.splitter, &embedder, &self.config.models.embedding)?;
        index.save(&rag.index_path)?;

        self.term.status(&format!("Stored {} chunks in {}", index.len(), rag.index_path.display()));

        Ok(())
    }

    fn load_chain(&self) -> Result<Chain, AppError> {
        let llm_config = self.config.llm.clone().ok_or(AppError::MissingArgError("API key is not specified."))?;
        let rag = &self.config.rag;

        let index = match VectorIndex::load(&rag.index_path) {
            Ok(index) => index,
            Err(Error::IndexNotFound(path)) => return Err(AppError::IndexMissing(path)),
            Err(err) => return Err(err.into()),
        };

        if index.model != self.config.models.embedding {
            warn!("Index was built with {}, questions are embedded with {}", index.model, self.config.models.embedding);
        }

        let llm = get_llm(llm_config, get_reqwest_client()?);
        let prompts = Prompts::new(&self.config.prompt);

        Ok(QaChain::new(index, self.embedding()?, llm, prompts.template().to_owned(), rag.top_k)?)
    }

    fn ask(&mut self, question: Option<String>) -> Result<(), AppError> {
        let chain = self.load_chain()?;

        if let Some(question) = question {
            return self.answer(&chain, &question);
        }

        self.term.print_intro();

        while let Some(line) = self.term.user_input()? {
            let question = line.trim();
            if question.is_empty() {
                continue;
            }

            if let Err(err) = self.answer(&chain, question) {
                info!("Question failed: {err}");
                self.term.print_error(&err.to_string());
            }
        }

        Ok(())
    }

    fn answer(&self, chain: &Chain, question: &str) -> Result<(), AppError> {
        let answer = chain.answer(question)?;

        self.term.print_answer(&answer.text);
        self.term.print_sources(&answer.sources);

        Ok(())
    }
}
