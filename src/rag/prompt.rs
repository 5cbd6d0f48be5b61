//! Grounding prompt for answer generation.
//!
//! The generator receives one templated prompt holding the retrieved context
//! and the user's question. Placeholders are `{context}`, `{question}` and the
//! optional `{fallback}`.

use crate::types::{AppError, Result};

/// Reply the model is told to give when the context has no answer.
pub const DEFAULT_FALLBACK_PHRASE: &str = "I'm sorry, I don't have information on that.";

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a friendly and helpful customer support assistant.
Answer the user's question based ONLY on the following context.
If the information is not in the context, you MUST politely say '{fallback}'.
Do not make up any information. Keep your answers concise and to the point.

CONTEXT:
{context}

USER'S QUESTION:
{question}

YOUR ANSWER:
";

const CONTEXT: &str = "context";
const QUESTION: &str = "question";
const FALLBACK: &str = "fallback";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    fallback_phrase: String,
}

impl PromptTemplate {
    /// Build a template, rejecting one that cannot carry context and question.
    pub fn new(template: &str, fallback_phrase: &str) -> Result<Self> {
        for name in [CONTEXT, QUESTION] {
            if !template.contains(&format!("{{{}}}", name)) {
                return Err(AppError::Configuration(format!(
                    "prompt template is missing the {{{}}} placeholder",
                    name
                )));
            }
        }
        if fallback_phrase.trim().is_empty() {
            return Err(AppError::Configuration(
                "prompt fallback phrase must not be empty".to_string(),
            ));
        }

        Ok(Self {
            template: template.to_string(),
            fallback_phrase: fallback_phrase.to_string(),
        })
    }

    /// Fill the placeholders in a single pass.
    ///
    /// Substituted text is never scanned again, so a question containing
    /// `{context}` stays literal. Unknown `{...}` sequences are copied as-is.
    pub fn render(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let substitution = after.find('}').and_then(|close| {
                let value = match &after[..close] {
                    CONTEXT => context,
                    QUESTION => question,
                    FALLBACK => self.fallback_phrase.as_str(),
                    _ => return None,
                };
                Some((value, close))
            });

            match substitution {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            fallback_phrase: DEFAULT_FALLBACK_PHRASE.to_string(),
        }
    }
}

/// Join retrieved chunk texts into the `{context}` block.
pub fn join_context<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    chunks.into_iter().collect::<Vec<_>>().join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_renders_all_parts() {
        let prompt = PromptTemplate::default().render(
            "Goodluck Cafe is open from 9am to 9pm daily.",
            "What time do you open?",
        );

        assert!(prompt.contains("based ONLY on the following context"));
        assert!(prompt.contains("'I'm sorry, I don't have information on that.'"));
        assert!(prompt.contains("CONTEXT:\nGoodluck Cafe is open from 9am to 9pm daily."));
        assert!(prompt.contains("USER'S QUESTION:\nWhat time do you open?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
        assert!(!prompt.contains("{fallback}"));
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let template = PromptTemplate::new("C={context} Q={question}", "n/a").unwrap();
        let prompt = template.render("ctx {question}", "q {context}");

        assert_eq!(prompt, "C=ctx {question} Q=q {context}");
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let template = PromptTemplate::new("{greeting} {context} {question} {", "n/a").unwrap();
        assert_eq!(template.render("c", "q"), "{greeting} c q {");
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let err = PromptTemplate::new("Only {question}", "n/a").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.to_string().contains("{context}"));

        let err = PromptTemplate::new("Only {context}", "n/a").unwrap_err();
        assert!(err.to_string().contains("{question}"));
    }

    #[test]
    fn test_custom_fallback_phrase() {
        let template =
            PromptTemplate::new("{context}|{question}|{fallback}", "Ask the counter.").unwrap();
        assert_eq!(template.render("a", "b"), "a|b|Ask the counter.");
    }

    #[test]
    fn test_join_context() {
        assert_eq!(join_context(["one", "two", "three"]), "one\n\ntwo\n\nthree");
        assert_eq!(join_context(Vec::<&str>::new()), "");
    }
}
