use crate::{
    error::Result,
    types::{AnalysisRequest, AnalysisResult, VideoMetadata},
};

pub static ANALYSIS_SYSTEM_PROMPT: &str = r#"
You are FCKTY, an elite Fact-Checking and Media Analysis Engine.
Your core directive is RIGOROUS TRUTH.

You will be provided with a YouTube Video Title, Author, and URL.
CRITICAL INSTRUCTION: You must ONLY analyze the content of the SPECIFIC video identified by the Title.
DO NOT analyze other videos by the same author.
DO NOT analyze the channel in general.
If you cannot find the transcript or specifics for THIS exact video, admit it and return an accuracy rating of 0.

EXECUTION STEPS:
1. Target Identification: Use Google Search to find the specific video by searching for its TITLE and AUTHOR.
2. Content Extraction: Extract the transcript, summary, and key arguments of THIS specific video.
3. Discourse Extraction: Search for comments and reactions specifically regarding THIS video title.
4. Fact Checking: Verify the claims found in Step 2.
5. Sentiment Analysis: Analyze the sentiment of the discourse.

OUTPUT FORMAT:
You must output a JSON object wrapped in a code block ```json ... ```.
The structure must be:
{
  "accuracyRating": number, // 1-10
  "overallSentiment": "Positive" | "Negative" | "Neutral",
  "summary": "string (Must start with: 'Analysis of [Video Title]: ...')",
  "keyTakeaways": ["string"], // 3-5 short, scannable bullet points
  "claims": [
    {
      "claim": "string",
      "verdict": "True" | "False" | "Misleading" | "Unverified" | "Mixed",
      "confidenceScore": number, // 0-10
      "explanation": "string",
      "sources": ["string"] // URLs backing this verdict, may be empty
    }
  ],
  "commentAnalysis": {
    "overallSentiment": "Positive" | "Negative" | "Neutral" | "Polarized",
    "sentimentScore": number, // -1 to 1
    "dominantEmotions": ["string"],
    "logicalFallacies": ["string"],
    "botProbabilityScore": number, // 0-10 rating of how artificial the discourse feels
    "summary": "string"
  } // or null when no discourse could be found
}
"#;

pub static CHAT_SYSTEM_PROMPT: &str = "You are FCKTY, a helpful assistant explaining the fact-checking analysis you just performed. Answer follow-up questions about the claims, sentiment, and sources. Be concise and objective.";

/// Low temperature keeps the model close to what the search results say.
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPrompt {
    pub system_instruction: &'static str,
    pub user_prompt: String,
}

/// Build the analysis prompt. With metadata the literal title and author
/// pin the model to this exact video; without it the model is told to
/// discover the title itself first.
pub fn build_analysis_prompt(
    request: &AnalysisRequest,
    metadata: Option<&VideoMetadata>,
) -> AnalysisPrompt {
    let url = &request.video_url;

    let target = match metadata {
        Some(meta) => format!(
            r#"TARGET VIDEO TITLE: "{title}"
TARGET VIDEO AUTHOR: "{author}"
TARGET URL: {url}

INSTRUCTION: Perform a Google Search specifically for "{title}" transcript and reviews. Ensure you are analyzing THIS video and not a related one."#,
            title = meta.title,
            author = meta.author_name,
        ),
        None => format!(
            "TARGET URL: {url}\n\nINSTRUCTION: Extract the specific video title from the URL search results first, then analyze that specific video."
        ),
    };

    let mut user_prompt = target;

    if let Some(transcript) = non_blank(request.raw_transcript.as_deref()) {
        user_prompt.push_str(&format!(
            "\n\nPROVIDED TRANSCRIPT (supplied by the user, treat it as the primary record of what the video says):\n<<<TRANSCRIPT\n{}\nTRANSCRIPT>>>",
            transcript.trim()
        ));
    }

    if let Some(comments) = non_blank(request.raw_comments.as_deref()) {
        user_prompt.push_str(&format!(
            "\n\nPROVIDED COMMENTS (supplied by the user, base the discourse analysis on them):\n<<<COMMENTS\n{}\nCOMMENTS>>>",
            comments.trim()
        ));
    }

    user_prompt.push_str(
        r#"

Please perform the "Web Scraping" and Analysis:
1. Search for the content of this specific video (Transcript/Summary).
2. Search for the comments/public reaction to this specific video.
3. Verify the claims and analyze the sentiment based on what you find.
Ground every verdict in what Google Search returns."#,
    );

    AnalysisPrompt {
        system_instruction: ANALYSIS_SYSTEM_PROMPT,
        user_prompt,
    }
}

/// The hidden first message of a chat session: gives the model the report
/// it is about to be asked about.
pub fn build_chat_context(video_url: &str, result: &AnalysisResult) -> Result<String> {
    let claims = serde_json::to_string(&result.claims)?;
    let comments = serde_json::to_string(&result.comment_analysis)?;

    Ok(format!(
        "CONTEXT OF ANALYSIS:\nURL: {video_url}\nSummary: {summary}\nClaims: {claims}\nComment Analysis: {comments}",
        summary = result.summary,
    ))
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
