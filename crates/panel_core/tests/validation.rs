use panel_core::{
    truncate_excerpt, Field, OperationKind, SearchContext, ValidationError, DEFAULT_ARCHIVE_URL,
    EXCERPT_LIMIT,
};

#[test]
fn process_requires_a_trimmed_search_string() {
    let missing = SearchContext::new("https://archive.example/rpi/");
    assert_eq!(
        missing.validate(OperationKind::ProcessComplete),
        Err(ValidationError::MissingSearchString)
    );

    let blank = missing.clone().with_search("   ");
    let err = blank.validate(OperationKind::ProcessComplete).unwrap_err();
    assert_eq!(err.field(), Field::SearchString);

    let ok = missing
        .with_search("  patent  ")
        .validate(OperationKind::ProcessComplete)
        .unwrap();
    assert_eq!(ok.search_string.as_deref(), Some("patent"));
}

#[test]
fn search_string_is_optional_elsewhere() {
    let context = SearchContext::new("");
    let ok = context.validate(OperationKind::Verify).unwrap();
    assert_eq!(ok.url, DEFAULT_ARCHIVE_URL);
    assert_eq!(ok.search_string, None);
}

#[test]
fn malformed_urls_point_at_the_url_field() {
    let err = SearchContext::new("not a url")
        .validate(OperationKind::Verify)
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidUrl { .. }));
    assert_eq!(err.field(), Field::Url);
}

#[test]
fn excerpts_are_cut_at_the_limit() {
    let short = "line one\nline two";
    assert_eq!(truncate_excerpt(short), short);

    let exact = "x".repeat(EXCERPT_LIMIT);
    assert_eq!(truncate_excerpt(&exact), exact);

    let long = "é".repeat(EXCERPT_LIMIT + 5);
    let cut = truncate_excerpt(&long);
    assert!(cut.ends_with("..."));
    assert_eq!(cut.chars().count(), EXCERPT_LIMIT + 3);
}
