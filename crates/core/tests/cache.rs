use fckty_core::{
    AnalysisResult, FcktyError, Source,
    cache::{cache_dir_in, get_report_path, load_report, save_report},
    types::Sentiment,
};

fn report() -> AnalysisResult {
    AnalysisResult {
        accuracy_rating: 9,
        overall_sentiment: Sentiment::Positive,
        summary: "Analysis of X: solid".into(),
        key_takeaways: vec!["Cites primary sources".into()],
        claims: vec![],
        comment_analysis: None,
        sources: vec![Source {
            title: "Paper".into(),
            uri: "https://doi.example/1".into(),
        }],
    }
}

#[tokio::test]
async fn saved_report_loads_back() {
    let root = tempfile::tempdir().unwrap();
    let dir = cache_dir_in(root.path(), "https://youtu.be/abc");
    let path = get_report_path(&dir, "gemini-2.5-flash");

    save_report(&report(), &path).await.unwrap();
    assert!(path.exists());

    let loaded = load_report(&path).await.unwrap();
    assert_eq!(loaded, report());

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"accuracyRating\": 9"));
    assert!(raw.contains("\"keyTakeaways\""));
}

#[tokio::test]
async fn missing_report_is_an_io_error() {
    let root = tempfile::tempdir().unwrap();
    let err = load_report(&root.path().join("nope.json")).await.unwrap_err();
    assert!(matches!(err, FcktyError::Io(_)));
}
