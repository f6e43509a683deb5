use std::sync::Arc;

use tracing::{error, info};

use crate::{
    error::{FcktyError, Result},
    extract::parse_analysis,
    gemini::{Generation, GenerationRequest, GenerativeBackend, GroundingChunk, Turn},
    metadata::{MetadataSource, fetch_metadata},
    prompt::{ANALYSIS_TEMPERATURE, build_analysis_prompt},
    types::{AnalysisRequest, AnalysisResult, Source},
};

/// Runs one fact-check: metadata lookup, prompt, search-grounded generation,
/// reply parsing.
pub struct Analyzer {
    backend: Arc<dyn GenerativeBackend>,
    metadata: Arc<dyn MetadataSource>,
    model: String,
}

impl Analyzer {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        metadata: Arc<dyn MetadataSource>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            metadata,
            model: model.into(),
        }
    }

    pub fn backend(&self) -> Arc<dyn GenerativeBackend> {
        Arc::clone(&self.backend)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let metadata = fetch_metadata(self.metadata.as_ref(), &request.video_url).await;
        match &metadata {
            Some(meta) => info!(title = %meta.title, "analyzing video"),
            None => info!(url = %request.video_url, "analyzing video without metadata"),
        }

        let prompt = build_analysis_prompt(request, metadata.as_ref());

        let generation = self
            .backend
            .generate(GenerationRequest {
                model: self.model.clone(),
                system_instruction: prompt.system_instruction.to_string(),
                contents: vec![Turn::user(prompt.user_prompt)],
                web_search: true,
                temperature: Some(ANALYSIS_TEMPERATURE),
            })
            .await
            .inspect_err(|e| error!(error = %e, "analysis failed"))?;

        analyze_generation(generation).inspect_err(|e| error!(error = %e, "analysis failed"))
    }
}

/// Parse the reply text and attach the grounding sources from the same call.
pub fn analyze_generation(generation: Generation) -> Result<AnalysisResult> {
    let text = generation.text.ok_or(FcktyError::NoParseableResult)?;
    let mut result = parse_analysis(&text)?;
    result.sources = sources_from_grounding(&generation.grounding);
    Ok(result)
}

/// Keeps only web references that have both a title and a URI.
pub fn sources_from_grounding(chunks: &[GroundingChunk]) -> Vec<Source> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let title = web.title.as_deref().filter(|t| !t.is_empty())?;
            let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
            Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::WebReference;

    fn chunk(title: Option<&str>, uri: Option<&str>) -> GroundingChunk {
        GroundingChunk {
            web: Some(WebReference {
                title: title.map(String::from),
                uri: uri.map(String::from),
            }),
        }
    }

    #[test]
    fn incomplete_grounding_entries_are_dropped() {
        let chunks = vec![
            chunk(Some("A"), Some("https://a.example")),
            chunk(None, Some("https://b.example")),
            chunk(Some("C"), None),
            chunk(Some(""), Some("https://d.example")),
            GroundingChunk { web: None },
            chunk(Some("A"), Some("https://a.example")),
        ];

        let sources = sources_from_grounding(&chunks);
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().all(|s| s.title == "A"));
    }

    #[test]
    fn sources_replace_anything_the_model_wrote() {
        let generation = Generation {
            text: Some(
                r#"{"accuracyRating":8,"overallSentiment":"Positive","summary":"s","claims":[],"sources":[{"title":"fake","uri":"x"}]}"#
                    .into(),
            ),
            grounding: vec![chunk(Some("Real"), Some("https://real.example"))],
        };

        let result = analyze_generation(generation).unwrap();
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].title, "Real");
    }

    #[test]
    fn missing_text_is_unparseable() {
        let err = analyze_generation(Generation::default()).unwrap_err();
        assert!(matches!(err, FcktyError::NoParseableResult));
    }
}
