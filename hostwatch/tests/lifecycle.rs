use hostwatch::{
    BoxError, DiagnosticHandler, DiagnosticSource, DispatchOutcome, HostedService, Notification,
    names,
};
use tokio_util::sync::CancellationToken;

mod common;
use common::{Call, Recorder, ctx, start, stop, subscribed};

#[test]
fn test_stop_before_start_is_noop() {
    let source = DiagnosticSource::new("hosting");
    let handler = DiagnosticHandler::new(source.clone(), Recorder::new());

    assert!(!handler.unsubscribe());
    assert!(!handler.is_subscribed());
    assert_eq!(source.subscriber_count(), 0);
}

#[test]
fn test_double_start_does_not_duplicate() {
    let source = DiagnosticSource::new("hosting");
    let (handler, recorder) = subscribed(&source);

    assert!(!handler.subscribe());
    assert_eq!(source.subscriber_count(), 1);

    source.write(names::REQUEST_START, &start(ctx(1, "/")));
    assert_eq!(recorder.count(), 1);
}

#[test]
fn test_double_stop_is_noop() {
    let source = DiagnosticSource::new("hosting");
    let (handler, _recorder) = subscribed(&source);

    assert!(handler.unsubscribe());
    assert!(!handler.unsubscribe());
    assert_eq!(source.subscriber_count(), 0);
}

#[test]
fn test_no_callbacks_after_stop() {
    let source = DiagnosticSource::new("hosting");
    let (handler, recorder) = subscribed(&source);

    source.write(names::REQUEST_START, &start(ctx(1, "/")));
    handler.unsubscribe();
    source.write(names::REQUEST_STOP, &stop(ctx(1, "/")));

    let outcome = handler.dispatch(&Notification::new(names::REQUEST_STOP, &stop(ctx(1, "/"))));

    assert_eq!(outcome.unwrap(), DispatchOutcome::Inactive);
    assert_eq!(recorder.calls(), vec![Call::Start(ctx(1, "/"))]);
}

#[test]
fn test_restart_after_stop() {
    let source = DiagnosticSource::new("hosting");
    let (handler, recorder) = subscribed(&source);

    handler.unsubscribe();
    assert!(handler.subscribe());
    source.write(names::REQUEST_STOP, &stop(ctx(2, "/")));

    assert_eq!(recorder.calls(), vec![Call::Stop(ctx(2, "/"))]);
    assert_eq!(source.subscriber_count(), 1);
}

#[test]
fn test_drop_releases_subscription() {
    let source = DiagnosticSource::new("hosting");
    let recorder = {
        let (_handler, recorder) = subscribed(&source);
        assert_eq!(source.subscriber_count(), 1);
        recorder
    };

    source.write(names::REQUEST_START, &start(ctx(1, "/")));

    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(recorder.count(), 0);
}

#[test]
fn test_source_signals_do_not_reach_callbacks() {
    let source = DiagnosticSource::new("hosting");
    let (handler, recorder) = subscribed(&source);

    let error: BoxError = "publisher failed".into();
    source.report_error(&error);
    source.complete();
    source.write(names::REQUEST_START, &start(ctx(1, "/")));

    assert_eq!(recorder.count(), 0);
    assert!(recorder.errors().is_empty());
    assert_eq!(handler.faults(), 0);
    assert!(handler.unsubscribe());
}

#[tokio::test]
async fn test_hosted_service_start_stop() {
    let source = DiagnosticSource::new("hosting");
    let recorder = Recorder::new();
    let handler = DiagnosticHandler::new(source.clone(), recorder.clone());

    handler.start(CancellationToken::new()).await.unwrap();
    assert!(handler.is_subscribed());
    source.write(names::REQUEST_START, &start(ctx(1, "/")));

    handler.stop(CancellationToken::new()).await.unwrap();
    handler.stop(CancellationToken::new()).await.unwrap();
    source.write(names::REQUEST_STOP, &stop(ctx(1, "/")));

    assert_eq!(recorder.calls(), vec![Call::Start(ctx(1, "/"))]);
}

#[tokio::test]
async fn test_hosted_service_ignores_cancelled_token() {
    let source = DiagnosticSource::new("hosting");
    let services: Vec<Box<dyn HostedService>> = vec![Box::new(DiagnosticHandler::new(
        source.clone(),
        Recorder::new(),
    ))];

    let cancel = CancellationToken::new();
    cancel.cancel();

    for service in &services {
        service.start(cancel.clone()).await.unwrap();
    }
    assert_eq!(source.subscriber_count(), 1);

    for service in services.iter().rev() {
        service.stop(cancel.clone()).await.unwrap();
    }
    assert_eq!(source.subscriber_count(), 0);
}
