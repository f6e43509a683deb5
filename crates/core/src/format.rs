use crate::types::{AnalysisResult, CommentAnalysis, DiscourseSentiment, Sentiment};

fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Positive",
        Sentiment::Negative => "Negative",
        Sentiment::Neutral => "Neutral",
    }
}

fn discourse_label(sentiment: DiscourseSentiment) -> &'static str {
    match sentiment {
        DiscourseSentiment::Positive => "Positive",
        DiscourseSentiment::Negative => "Negative",
        DiscourseSentiment::Neutral => "Neutral",
        DiscourseSentiment::Polarized => "Polarized",
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none detected".to_string()
    } else {
        items.join(", ")
    }
}

fn push_comment_analysis(output: &mut String, analysis: &CommentAnalysis) {
    output.push_str("## Public Discourse\n\n");
    output.push_str(&format!(
        "**Sentiment:** {} ({:+.2}) | **Bot likelihood:** {}/10\n\n",
        discourse_label(analysis.overall_sentiment),
        analysis.sentiment_score,
        analysis.bot_probability_score
    ));
    output.push_str(&format!(
        "**Dominant emotions:** {}\n",
        join_or_none(&analysis.dominant_emotions)
    ));
    output.push_str(&format!(
        "**Logical fallacies:** {}\n\n",
        join_or_none(&analysis.logical_fallacies)
    ));
    output.push_str(&analysis.summary);
    output.push_str("\n\n");
}

/// Format a fact-check report as human-readable markdown
pub fn format_report_readable(report: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "**Accuracy:** {}/10 | **Overall sentiment:** {}\n\n",
        report.accuracy_rating,
        sentiment_label(report.overall_sentiment)
    ));

    output.push_str("## Summary\n\n");
    output.push_str(&report.summary);
    output.push_str("\n\n");

    if !report.key_takeaways.is_empty() {
        output.push_str("## Key Takeaways\n\n");
        for takeaway in &report.key_takeaways {
            output.push_str(&format!("• {}\n", takeaway));
        }
        output.push('\n');
    }

    output.push_str("## Claims\n\n");
    if report.claims.is_empty() {
        output.push_str("No verifiable claims were found.\n\n");
    }
    for (i, claim) in report.claims.iter().enumerate() {
        output.push_str(&format!(
            "### {}. [{}] {}\n\n",
            i + 1,
            claim.verdict.label(),
            claim.text
        ));
        output.push_str(&format!(
            "_Confidence {}/10._ {}\n\n",
            claim.confidence_score, claim.explanation
        ));
        if !claim.sources.is_empty() {
            for uri in &claim.sources {
                output.push_str(&format!("  ↳ <{}>\n", uri));
            }
            output.push('\n');
        }
    }

    if let Some(analysis) = &report.comment_analysis {
        push_comment_analysis(&mut output, analysis);
    }

    if !report.sources.is_empty() {
        output.push_str("## Sources\n\n");
        for (i, source) in report.sources.iter().enumerate() {
            output.push_str(&format!("{}. {} <{}>\n", i + 1, source.title, source.uri));
        }
        output.push('\n');
    }

    output
}
