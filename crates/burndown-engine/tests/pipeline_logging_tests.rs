// Operation boundary events emitted by pipeline runs, keyed by run id

mod common;

use burndown_core::cache::MemoryCache;
use burndown_core::errors::ExErrorKind;
use burndown_core::logging_facility::init_test_capture;
use burndown_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_RUN_ID};
use burndown_core_types::RunContext;
use burndown_engine::{run_pipeline, PipelineOptions, PipelinePorts};
use common::{date, FakeContentRepo, FakeResolver};

#[test]
fn test_successful_run_logs_start_and_end_with_run_id() {
    let capture = init_test_capture();
    let mut resolver = FakeResolver::new(&["fetch"]);
    let content = FakeContentRepo::new();
    let mut cache = MemoryCache::new();
    let mut ports = PipelinePorts {
        corpora: &mut resolver,
        content: &content,
        content_cache: &mut cache,
        traffic: None,
    };
    let ctx = RunContext::new();

    let output = run_pipeline(&ctx, date("2024-01-08T00:00:00Z"), &mut ports, &PipelineOptions::default()).unwrap();
    assert_eq!(output.run_id, ctx.run_id);

    let run_id = ctx.run_id.to_string();
    let ours = |event: &str| {
        capture
            .matching("run_pipeline", event)
            .into_iter()
            .filter(|e| e.field(FIELD_RUN_ID) == Some(run_id.as_str()))
            .collect::<Vec<_>>()
    };
    assert_eq!(ours(EVENT_START).len(), 1);
    let ends = ours(EVENT_END);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].field("key_count"), Some("4"));
    assert!(ours(EVENT_END_ERROR).is_empty());
}

#[test]
fn test_failed_run_logs_error_code() {
    let capture = init_test_capture();
    let mut resolver = FakeResolver::new(&["fetch"]);
    resolver.fail_with = Some(ExErrorKind::ExternalTool);
    let content = FakeContentRepo::new();
    let mut cache = MemoryCache::new();
    let mut ports = PipelinePorts {
        corpora: &mut resolver,
        content: &content,
        content_cache: &mut cache,
        traffic: None,
    };
    let ctx = RunContext::new();

    let err = run_pipeline(&ctx, date("2024-01-08T00:00:00Z"), &mut ports, &PipelineOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ExternalTool);

    let run_id = ctx.run_id.to_string();
    let errors: Vec<_> = capture
        .matching("run_pipeline", EVENT_END_ERROR)
        .into_iter()
        .filter(|e| e.field(FIELD_RUN_ID) == Some(run_id.as_str()))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_EXTERNAL_TOOL"));
    assert_eq!(content.checkouts.get(), 0);
}

#[test]
fn test_batch_label_is_logged_on_start() {
    let capture = init_test_capture();
    let mut resolver = FakeResolver::new(&["fetch"]);
    let content = FakeContentRepo::new();
    let mut cache = MemoryCache::new();
    let mut ports = PipelinePorts {
        corpora: &mut resolver,
        content: &content,
        content_cache: &mut cache,
        traffic: None,
    };
    let ctx = RunContext::new().with_label("2024-01-08");

    run_pipeline(&ctx, date("2024-01-08T00:00:00Z"), &mut ports, &PipelineOptions::default()).unwrap();

    let run_id = ctx.run_id.to_string();
    let starts: Vec<_> = capture
        .matching("run_pipeline", EVENT_START)
        .into_iter()
        .filter(|e| e.field(FIELD_RUN_ID) == Some(run_id.as_str()))
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].field("label"), Some("2024-01-08"));
}
