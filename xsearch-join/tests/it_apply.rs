//! End-to-end behavior of a single join against in-memory indexes.

mod support;

use std::io;
use support::{foreign_docs, recording_collector, Harness};
use xsearch_index::{Filter, SearchKind};
use xsearch_join::{ErrorCode, JoinError, JoinSpec, JoinType};

fn products_on_sku() -> JoinSpec {
    let mut spec = JoinSpec::new("products", "sku", "id").with_query_string("*:*");
    spec.set_return_fields(true);
    spec.set_return_scores(true);
    spec
}

#[tokio::test]
async fn inner_join_keeps_matched_rows_in_local_order() {
    let harness = Harness::new();
    let mut spec = products_on_sku();

    let (merged, join_result, facets) = harness.apply(&mut spec, 100).await;
    let merged = merged.unwrap();

    assert_eq!(merged.doc_ids(), vec![1, 3]);
    assert_eq!(foreign_docs(&merged, 0), vec![Some(10), Some(10)]);
    assert_eq!(merged.rows()[0].foreign(0).map(|m| m.score), Some(2.5));
    assert_eq!(join_result.position(), 0);
    assert_eq!(join_result.foreign_num_found(), 2);
    assert!(facets.is_empty());
}

#[tokio::test]
async fn outer_join_reports_unmatched_rows() {
    let harness = Harness::new();
    let (collector, calls) = recording_collector();
    let mut spec = products_on_sku().with_join_type(JoinType::Outer);
    spec.set_outer_collector(Some(collector));

    let merged = harness.apply(&mut spec, 100).await.0.unwrap();

    assert_eq!(merged.doc_ids(), vec![1, 2, 3]);
    assert_eq!(foreign_docs(&merged, 0), vec![Some(10), None, Some(10)]);
    assert_eq!(*calls.lock().unwrap(), vec![(2, "b".to_string())]);
}

#[tokio::test]
async fn row_cap_truncates_after_merge_order() {
    let harness = Harness::new();

    let merged = harness.apply(&mut products_on_sku(), 1).await.0.unwrap();
    assert_eq!(merged.doc_ids(), vec![1]);

    let merged = harness.apply(&mut products_on_sku(), 0).await.0.unwrap();
    assert!(merged.is_empty());
}

#[tokio::test]
async fn foreign_request_is_configured_from_join_and_primary_request() {
    let harness = Harness::new();
    let mut spec = products_on_sku();
    spec.filters_mut().push(Filter::negative_query("lang:fr"));

    harness.apply(&mut spec, 100).await.0.unwrap();

    let sent = harness.products().last_request().unwrap();
    assert_eq!(sent.kind, SearchKind::Field);
    assert_eq!(sent.start, 0);
    assert_eq!(sent.rows, 0);
    assert_eq!(sent.users, vec!["alice".to_string()]);
    assert_eq!(sent.groups, vec!["staff".to_string()]);
    assert_eq!(sent.query_string, "*:*");
    assert_eq!(
        sent.filters.iter().collect::<Vec<_>>(),
        vec![&Filter::negative_query("lang:fr")]
    );

    // The join's own filters are untouched.
    assert_eq!(spec.filters().len(), 1);
}

#[tokio::test]
async fn template_request_keeps_its_filters_and_gets_join_filters_appended() {
    let harness = Harness::new();
    let mut spec = JoinSpec::new("products", "sku", "id")
        .with_query_template("english")
        .with_query_string("*:*");
    spec.filters_mut().push(Filter::term("lang", "en"));

    let merged = harness.apply(&mut spec, 100).await.0.unwrap();
    assert_eq!(merged.doc_ids(), vec![1, 3]);

    let sent = harness.products().last_request().unwrap();
    assert_eq!(sent.kind, SearchKind::Pattern);
    assert_eq!(sent.rows, 0);
    assert_eq!(sent.query_string, "*:*");
    assert_eq!(
        sent.filters.iter().collect::<Vec<_>>(),
        vec![&Filter::term("title", "Anvil"), &Filter::term("lang", "en")]
    );
}

#[tokio::test]
async fn join_filters_narrow_the_foreign_set() {
    let harness = Harness::new();
    let mut spec = products_on_sku();
    spec.filters_mut().push(Filter::term("lang", "fr"));

    let (merged, join_result, _) = harness.apply(&mut spec, 100).await;

    assert!(merged.unwrap().is_empty());
    assert_eq!(join_result.foreign_num_found(), 1);
}

#[tokio::test]
async fn facets_are_captured_when_requested_and_always_cleared() {
    let harness = Harness::new();

    let mut spec = JoinSpec::new("products", "sku", "id").with_query_template("by-lang");
    spec.set_return_facets(true);
    let (merged, _, facets) = harness.apply(&mut spec, 100).await;
    merged.unwrap();

    assert_eq!(facets.len(), 1);
    assert_eq!(facets[0].position(), 0);
    assert_eq!(facets[0].fields()[0].field, "lang");
    let counts = facets[0].counts().unwrap();
    assert_eq!(counts[0].get("en"), Some(1));
    assert_eq!(counts[0].get("fr"), Some(1));
    // The foreign search ran with the facet request; the cached request no
    // longer carries it.
    assert!(harness.products().last_request().unwrap().is_facet());
    assert!(!spec.binding().request().unwrap().is_facet());

    let mut spec = JoinSpec::new("products", "sku", "id").with_query_template("by-lang");
    let (merged, _, facets) = harness.apply(&mut spec, 100).await;
    merged.unwrap();

    assert!(facets.is_empty());
    assert!(!spec.binding().request().unwrap().is_facet());
}

#[tokio::test]
async fn return_facets_without_facet_fields_captures_nothing() {
    let harness = Harness::new();
    let mut spec = products_on_sku();
    spec.set_return_facets(true);

    let (_, _, facets) = harness.apply(&mut spec, 100).await;
    assert!(facets.is_empty());
}

#[tokio::test]
async fn missing_local_field_fails_before_searching() {
    let harness = Harness::new();
    let mut spec = JoinSpec::new("products", "color", "id");

    let err = harness.apply(&mut spec, 100).await.0.unwrap_err();

    assert!(matches!(err, JoinError::MissingLocalFieldIndex { ref field } if field == "color"));
    assert_eq!(err.error_code(), ErrorCode::SearchLibrary);
    assert_eq!(harness.products().search_count(), 0);
}

#[tokio::test]
async fn missing_foreign_field_fails_after_recording_the_result() {
    let harness = Harness::new();
    let mut spec = JoinSpec::new("products", "sku", "color");

    let (merged, join_result, _) = harness.apply(&mut spec, 100).await;
    let err = merged.unwrap_err();

    assert!(matches!(err, JoinError::MissingForeignFieldIndex { ref field } if field == "color"));
    assert!(join_result.foreign_result().is_some());
    assert!(harness.timer.find("join 0 foreign search").is_some());
    assert!(harness.timer.find("join 0 join").is_none());
}

#[tokio::test]
async fn unresolvable_foreign_side_is_a_configuration_error() {
    let harness = Harness::new();

    let err = harness
        .apply(&mut JoinSpec::new("nowhere", "sku", "id"), 100)
        .await
        .0
        .unwrap_err();
    assert!(matches!(err, JoinError::IndexNotFound { ref name } if name == "nowhere"));

    let err = harness
        .apply(
            &mut JoinSpec::new("products", "sku", "id").with_query_template("missing"),
            100,
        )
        .await
        .0
        .unwrap_err();
    assert!(matches!(err, JoinError::TemplateNotFound { .. }));

    let err = harness
        .apply(
            &mut JoinSpec::new("products", "sku", "id").with_query_template("spell"),
            100,
        )
        .await
        .0
        .unwrap_err();
    assert!(matches!(err, JoinError::NotASearchTemplate { kind: "spellcheck", .. }));
    assert!(!err.is_bad_request());
}

#[tokio::test]
async fn incomplete_spec_is_rejected() {
    let harness = Harness::new();
    let err = harness
        .apply(&mut JoinSpec::new("products", "sku", ""), 100)
        .await
        .0
        .unwrap_err();
    assert!(matches!(err, JoinError::InvalidSpec { .. }));
}

#[tokio::test]
async fn search_failure_is_wrapped_as_io() {
    let harness = Harness::new();
    harness.products().fail_next_search(io::ErrorKind::TimedOut);

    let (merged, join_result, _) = harness.apply(&mut products_on_sku(), 100).await;

    match merged.unwrap_err() {
        JoinError::Io(err) => assert_eq!(err.kind(), io::ErrorKind::TimedOut),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(join_result.foreign_result().is_none());
    let search_timer = harness.timer.find("join 0 foreign search").unwrap();
    assert!(search_timer.is_stopped());
}

#[tokio::test]
async fn field_cache_failure_is_wrapped_as_io() {
    let harness = Harness::new();
    harness.products().reader().break_field("id");

    let err = harness.apply(&mut products_on_sku(), 100).await.0.unwrap_err();

    assert!(matches!(err, JoinError::Io(_)));
    assert_eq!(err.error_code(), ErrorCode::SearchLibrary);
}

#[tokio::test]
async fn timers_are_nested_under_the_caller_timer() {
    let harness = Harness::new();
    let mut spec = products_on_sku().with_position(4);

    harness.apply(&mut spec, 100).await.0.unwrap();

    let names: Vec<String> = harness
        .timer
        .children()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, vec!["join 4 foreign search", "join 4 join"]);
    assert!(harness.timer.children().iter().all(|t| t.is_stopped()));
}

#[tokio::test]
async fn merged_rows_resolve_foreign_fields() {
    let harness = Harness::new();
    let mut spec = products_on_sku().with_join_type(JoinType::Outer);

    let merged = harness.apply(&mut spec, 100).await.0.unwrap();

    assert_eq!(
        merged.foreign_value(0, 0, "title").unwrap().as_deref(),
        Some("Anvil")
    );
    assert_eq!(merged.foreign_value(1, 0, "title").unwrap(), None);
    assert_eq!(merged.foreign_value(0, 0, "missing").unwrap(), None);
    assert_eq!(merged.foreign_value(0, 1, "title").unwrap(), None);
}

#[tokio::test]
async fn binding_is_resolved_once_per_spec() {
    let harness = Harness::new();
    let mut spec = products_on_sku();
    spec.filters_mut().push(Filter::term("lang", "en"));

    harness.apply(&mut spec, 100).await.0.unwrap();
    assert!(spec.binding().is_resolved());
    harness.apply(&mut spec, 100).await.0.unwrap();

    // The cached request is reused, so join filters accumulate on it.
    let sent = harness.products().last_request().unwrap();
    assert_eq!(sent.filters.len(), 2);
    assert_eq!(harness.products().search_count(), 2);

    // A clone starts from a fresh request.
    let mut fresh = spec.clone();
    harness.apply(&mut fresh, 100).await.0.unwrap();
    assert_eq!(harness.products().last_request().unwrap().filters.len(), 1);
}

#[tokio::test]
async fn cleared_return_flags_hide_foreign_scores_and_fields() {
    let harness = Harness::new();
    let mut spec = products_on_sku();
    spec.set_return_fields(false);
    spec.set_return_scores(false);

    let merged = harness.apply(&mut spec, 100).await.0.unwrap();

    assert_eq!(merged.doc_ids(), vec![1, 3]);
    assert_eq!(foreign_docs(&merged, 0), vec![Some(10), Some(10)]);
    assert_eq!(merged.rows()[0].foreign(0).map(|m| m.score), Some(0.0));
    assert!(merged.foreign_reader(0).is_none());
    assert_eq!(merged.foreign_value(0, 0, "title").unwrap(), None);
}

#[tokio::test]
async fn return_flags_apply_independently() {
    let harness = Harness::new();

    let mut scores_only = products_on_sku();
    scores_only.set_return_fields(false);
    let merged = harness.apply(&mut scores_only, 100).await.0.unwrap();
    assert_eq!(merged.rows()[0].foreign(0).map(|m| m.score), Some(2.5));
    assert_eq!(merged.foreign_value(0, 0, "title").unwrap(), None);

    let mut fields_only = products_on_sku();
    fields_only.set_return_scores(false);
    let merged = harness.apply(&mut fields_only, 100).await.0.unwrap();
    assert_eq!(merged.rows()[0].foreign(0).map(|m| m.score), Some(0.0));
    assert_eq!(
        merged.foreign_value(0, 0, "title").unwrap().as_deref(),
        Some("Anvil")
    );
}
