use std::time::SystemTime;

use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

/// Scores arrive as arbitrary JSON numbers; round and clamp them into 0..=10.
fn score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(de::Error::custom(format!("score is not finite: {value}")));
    }
    Ok(value.round().clamp(0.0, 10.0) as u8)
}

/// A single analysis submission. The URL identifies it; the raw texts are only
/// present when the user pasted a transcript or comments by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_comments: Option<String>,
}

impl AnalysisRequest {
    pub fn new(video_url: impl Into<String>) -> Self {
        Self {
            video_url: video_url.into(),
            raw_transcript: None,
            raw_comments: None,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.raw_transcript = Some(transcript.into());
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.raw_comments = Some(comments.into());
        self
    }

    pub fn is_manual(&self) -> bool {
        self.raw_transcript.is_some() || self.raw_comments.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscourseSentiment {
    Positive,
    Negative,
    Neutral,
    Polarized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    True,
    False,
    Misleading,
    Unverified,
    Mixed,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::Misleading => "Misleading",
            Verdict::Unverified => "Unverified",
            Verdict::Mixed => "Mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(rename = "claim")]
    pub text: String,
    pub verdict: Verdict,
    /// 0 to 10
    #[serde(deserialize_with = "score")]
    pub confidence_score: u8,
    pub explanation: String,
    /// URLs the model cited for this particular claim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAnalysis {
    pub overall_sentiment: DiscourseSentiment,
    /// -1.0 to 1.0
    pub sentiment_score: f64,
    pub dominant_emotions: Vec<String>,
    pub logical_fallacies: Vec<String>,
    /// 0 to 10, how artificial the discourse feels
    #[serde(deserialize_with = "score")]
    pub bot_probability_score: u8,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// The structured report produced by one analysis run.
///
/// `claims`, `comment_analysis` and `sources` always come from the same
/// service call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 1 to 10; the model reports 0 when it could not find the video
    #[serde(deserialize_with = "score")]
    pub accuracy_rating: u8,
    pub overall_sentiment: Sentiment,
    pub summary: String,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub comment_analysis: Option<CommentAnalysis>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: SystemTime,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: SystemTime::now(),
        }
    }
}
