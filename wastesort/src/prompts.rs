use wastesort_lib::rag::DEFAULT_TEMPLATE;

/// Question answering prompt.
pub struct Prompts {
    template: String,
}

impl Prompts {

    /// Create a new instance, adding custom instructions before the context.
    pub fn new(custom: &Option<String>) -> Self {
        let template = match custom {
            Some(instr) => DEFAULT_TEMPLATE.replacen(
                "\nContext:",
                &format!("\nIn addition, consider the following instructions from the user:\n-----\n{}\n-----\n\nContext:", instr.trim()),
                1
            ),
            None => DEFAULT_TEMPLATE.to_owned(),
        };

        Prompts {
            template,
        }
    }

    /// Prompt template with `{context}` and `{question}` placeholders.
    pub fn template(&self) -> &str {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts() {
        assert_eq!(Prompts::new(&None).template(), DEFAULT_TEMPLATE);

        let prompts = Prompts::new(&Some(" Answer in Japanese. ".into()));
        let template = prompts.template();
        assert!(template.contains("-----\nAnswer in Japanese.\n-----\n\nContext:\n{context}"));
        assert!(template.contains("{question}"));
        assert_eq!(template.matches("Context:").count(), 1);
    }
}
