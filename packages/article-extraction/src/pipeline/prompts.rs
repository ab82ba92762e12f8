//! LLM prompts for the two per-article phases.
//!
//! Each phase has a canonical JSON-reply template and a legacy template for
//! the markdown-table / labelled-line contract. Templates are rendered by
//! placeholder substitution.

use sha2::{Digest, Sha256};

use crate::types::{
    config::ReplyFormat, record::ArticleRecord, vocabulary::Vocabularies,
};

/// First line of every classification prompt.
pub const CLASSIFICATION_HEADER: &str = "### Sport and Technology Classification ###";

/// First line of every PICO prompt.
pub const PICO_HEADER: &str = "### PICO Extraction ###";

/// Classification prompt, JSON reply.
pub const CLASSIFICATION_PROMPT: &str = r#"### Sport and Technology Classification ###

You will be given the title, publication year and abstract of a research article.

1. Identify the sport the article is **primarily about**.
   - Only classify the article if the sport is the main focus of the study.
   - Do not classify based on incidental mentions or comparisons.
   - Use exactly one label from this list, spelled exactly as written, or None:
     {sports}

2. Identify the **technology** areas the article focuses on.
   - Focus on tangible research tools, measurement technologies, data collection,
     modelling, sensors, AI systems and software frameworks.
   - Prefer labels from this list: {technologies}
   - Only list technologies that the title or abstract actually mentions.
   - Separate multiple technologies with commas.
   - If no technology focus is evident, use None.

Reply with a single JSON object and nothing else:
{"sport": "<label or None>", "technology": "<comma-separated labels or None>"}

### Article ###

Title: {title}
Year: {year}
Abstract: {abstract}
"#;

/// PICO prompt, JSON reply.
pub const PICO_PROMPT: &str = r#"### PICO Extraction ###

You will be given the title and abstract of a research article. Extract:

- population: the participants studied. Use one label from this list or None:
  {populations}
- outcome: the outcomes studied. Use labels from this list, separated by commas, or None:
  {outcomes}

Reply with a single JSON object and nothing else:
{"population": "<label or None>", "outcome": "<comma-separated labels or None>"}

### Article ###

Title: {title}
Abstract: {abstract}
"#;

/// Classification prompt, markdown-table reply.
pub const LEGACY_CLASSIFICATION_PROMPT: &str = r#"### Sport and Technology Classification ###

You will be given an article title, publication year, and abstract.
Your task is to identify the sport the provided article is **primarily about**.

Only classify an article if the sport is the main focus of the study.
Do not classify based on incidental mentions or comparisons.
Sports: {sports}

Identify any **technology** areas that the article focuses on.
   - Focus on tangible research tools, measurement technologies, data collection, modeling, sensors, AI systems, software frameworks, etc.
   - Examples include: {technologies}
   - Do **not** list general outcome variables (like "heart rate variability") unless a measurement technology is used to capture them (e.g., ECG, wearables).
   - If multiple technologies are involved, separate them with commas.
   - If no technology focus is evident, write {None}.

Return a markdown table with 4 columns:
1. Short title
2. The sport in curly braces like {Soccer}. Use {None} if unclear.
3. Publishing year.
4. Technology.

### Article ###

Title: {title}
Year: {year}
Abstract: {abstract}

### Result ###
"#;

/// PICO prompt, labelled-line reply.
pub const LEGACY_PICO_PROMPT: &str = r#"### PICO Extraction ###

You will be given the title and abstract of a research article. Extract the following PICO elements:

P = Population / Participants / Subjects (e.g. {populations})
I = Intervention / Exposure / Index factor
C = Comparison / Control (if any)
O = Outcome(s) studied (e.g. {outcomes})

If a component does not exist or cannot be identified, write {None}.

### Article ###

Title: {title}
Abstract: {abstract}

### Answer ###

P: ...
I: ...
C: ...
O: ...
"#;

/// Which phase a prompt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Classification,
    Pico,
}

impl PromptKind {
    /// Identify a rendered prompt by its header line.
    pub fn of(prompt: &str) -> Option<Self> {
        if prompt.starts_with(CLASSIFICATION_HEADER) {
            Some(Self::Classification)
        } else if prompt.starts_with(PICO_HEADER) {
            Some(Self::Pico)
        } else {
            None
        }
    }
}

fn classification_template(format: ReplyFormat) -> &'static str {
    match format {
        ReplyFormat::Json => CLASSIFICATION_PROMPT,
        ReplyFormat::Legacy => LEGACY_CLASSIFICATION_PROMPT,
    }
}

fn pico_template(format: ReplyFormat) -> &'static str {
    match format {
        ReplyFormat::Json => PICO_PROMPT,
        ReplyFormat::Legacy => LEGACY_PICO_PROMPT,
    }
}

/// Generate a hash of a prompt template for provenance logging.
pub fn prompt_hash(template: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(template.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hashes of the (classification, PICO) templates used for `format`.
pub fn prompt_hashes(format: ReplyFormat) -> (String, String) {
    (
        prompt_hash(classification_template(format)),
        prompt_hash(pico_template(format)),
    )
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Substituted text is never rescanned, so article text containing
/// placeholder-like braces is copied verbatim. Unknown braces are kept.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];

        let placeholder = values
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));

        match placeholder {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Format the classification prompt for one article.
pub fn format_classification_prompt(
    format: ReplyFormat,
    record: &ArticleRecord,
    vocabularies: &Vocabularies,
) -> String {
    render(
        classification_template(format),
        &[
            ("sports", vocabularies.sports.prompt_list().as_str()),
            ("technologies", vocabularies.technologies.prompt_list().as_str()),
            ("title", record.title.as_str()),
            ("year", record.year.as_str()),
            ("abstract", record.abstract_text.as_str()),
        ],
    )
}

/// Format the PICO prompt for one article.
pub fn format_pico_prompt(
    format: ReplyFormat,
    record: &ArticleRecord,
    vocabularies: &Vocabularies,
) -> String {
    render(
        pico_template(format),
        &[
            ("populations", vocabularies.populations.prompt_list().as_str()),
            ("outcomes", vocabularies.outcomes.prompt_list().as_str()),
            ("title", record.title.as_str()),
            ("abstract", record.abstract_text.as_str()),
        ],
    )
}
