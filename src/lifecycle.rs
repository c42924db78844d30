//! Per-surface asynchronous request lifecycle.
//!
//! Each feature surface (the copy validator, one persona's simulator) owns
//! one [`RequestLifecycle`]. Submissions supersede each other rather than
//! queue: every submission bumps a sequence number, and a completion is
//! applied only if its sequence number is still current when it resolves.
//! In-flight calls are never cancelled, only ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::completion::CompletionBackend;

/// Which feature a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    CopyCheck,
    PersonaQuery,
}

/// One submission to a feature surface. Ephemeral; never persisted.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub kind: RequestKind,
    /// The fully merged prompt (brand guidelines + feature instructions +
    /// subject text), built by [`crate::brand`].
    pub prompt: String,
    /// The raw operator input, kept for the empty-input guard and for the
    /// archive record's `input` field.
    pub subject_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// The visible result of the latest non-superseded submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub status: AnalysisStatus,
    pub text: Option<String>,
}

impl AnalysisOutcome {
    pub const fn idle() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            text: None,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == AnalysisStatus::Succeeded
    }
}

/// Async request controller for one feature surface.
///
/// At most one submission is authoritative at a time. Submitting again
/// while a request is pending does not block or queue; it changes which
/// eventual resolution is honored.
pub struct RequestLifecycle {
    backend: Arc<dyn CompletionBackend>,
    outcome: Arc<watch::Sender<AnalysisOutcome>>,
    seq: Arc<AtomicU64>,
}

impl RequestLifecycle {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            outcome: Arc::new(watch::Sender::new(AnalysisOutcome::idle())),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Submit a request. Empty input is ignored and leaves the surface as
    /// it was; otherwise the surface moves to `Pending` and the previous
    /// submission, resolved or not, is superseded.
    pub fn submit(&self, request: AnalysisRequest) {
        if request.subject_text.trim().is_empty() {
            return;
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.outcome.send_replace(AnalysisOutcome {
            status: AnalysisStatus::Pending,
            text: None,
        });

        let backend = Arc::clone(&self.backend);
        let outcome = Arc::clone(&self.outcome);
        let current = Arc::clone(&self.seq);
        tokio::spawn(async move {
            let resolved = match backend.complete(&request.prompt).await {
                Some(text) => AnalysisOutcome {
                    status: AnalysisStatus::Succeeded,
                    text: Some(text),
                },
                None => AnalysisOutcome {
                    status: AnalysisStatus::Failed,
                    text: None,
                },
            };

            // The sequence check and the outcome write happen under the
            // channel's internal lock, so a superseding submission can
            // never lose to a stale resolution.
            let applied = outcome.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != seq {
                    return false;
                }
                *slot = resolved;
                true
            });
            if !applied {
                debug!(seq, kind = ?request.kind, "discarding superseded completion");
            }
        });
    }

    /// Reset the surface to `Idle`, superseding any in-flight submission.
    /// Used when an unrelated UI action (e.g. switching personas) clears
    /// the surface.
    pub fn reset(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.outcome.send_replace(AnalysisOutcome::idle());
    }

    /// Snapshot of the current outcome.
    pub fn outcome(&self) -> AnalysisOutcome {
        self.outcome.borrow().clone()
    }

    /// Watch the outcome for changes.
    pub fn watch(&self) -> watch::Receiver<AnalysisOutcome> {
        self.outcome.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::{mpsc, oneshot};

    fn request(subject: &str) -> AnalysisRequest {
        AnalysisRequest {
            kind: RequestKind::CopyCheck,
            prompt: format!("analyze: {subject}"),
            subject_text: subject.to_string(),
        }
    }

    /// Backend that always answers with a fixed reply.
    struct StaticBackend {
        reply: Option<String>,
        calls: AtomicUsize,
    }

    impl StaticBackend {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for StaticBackend {
        async fn complete(&self, _prompt: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    /// Backend that parks every call until the test resolves it, so the
    /// test controls resolution order exactly.
    struct HoldBackend {
        calls: mpsc::UnboundedSender<oneshot::Sender<Option<String>>>,
    }

    impl HoldBackend {
        fn new() -> (
            Arc<Self>,
            mpsc::UnboundedReceiver<oneshot::Sender<Option<String>>>,
        ) {
            let (calls, rx) = mpsc::unbounded_channel();
            (Arc::new(Self { calls }), rx)
        }
    }

    #[async_trait]
    impl CompletionBackend for HoldBackend {
        async fn complete(&self, _prompt: &str) -> Option<String> {
            let (resolve, resolved) = oneshot::channel();
            self.calls.send(resolve).unwrap();
            resolved.await.unwrap_or(None)
        }
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn empty_input_stays_idle_without_backend_call() {
        let backend = Arc::new(StaticBackend::new(Some("unused")));
        let surface = RequestLifecycle::new(Arc::clone(&backend) as _);

        surface.submit(request(""));
        surface.submit(request("   "));
        settle().await;

        assert_eq!(surface.outcome().status, AnalysisStatus::Idle);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_completion_reaches_succeeded() {
        let backend = Arc::new(StaticBackend::new(Some("on brand")));
        let surface = RequestLifecycle::new(backend as _);

        surface.submit(request("PROPER snack time"));
        assert_eq!(surface.outcome().status, AnalysisStatus::Pending);

        let mut rx = surface.watch();
        let outcome = rx
            .wait_for(|o| o.status != AnalysisStatus::Pending)
            .await
            .unwrap()
            .clone();
        assert_eq!(outcome.status, AnalysisStatus::Succeeded);
        assert_eq!(outcome.text.as_deref(), Some("on brand"));
    }

    #[tokio::test]
    async fn null_completion_reaches_failed_with_no_text() {
        let backend = Arc::new(StaticBackend::new(None));
        let surface = RequestLifecycle::new(backend as _);

        surface.submit(request("anything"));
        let mut rx = surface.watch();
        let outcome = rx
            .wait_for(|o| o.status != AnalysisStatus::Pending)
            .await
            .unwrap()
            .clone();
        assert_eq!(outcome.status, AnalysisStatus::Failed);
        assert!(outcome.text.is_none());
    }

    #[tokio::test]
    async fn superseded_resolution_never_overwrites_newer_one() {
        let (backend, mut calls) = HoldBackend::new();
        let surface = RequestLifecycle::new(backend as _);

        surface.submit(request("first"));
        let resolve_first = calls.recv().await.unwrap();

        surface.submit(request("second"));
        let resolve_second = calls.recv().await.unwrap();

        // The newer submission resolves first and becomes visible.
        resolve_second.send(Some("second answer".into())).unwrap();
        let mut rx = surface.watch();
        rx.wait_for(|o| o.status == AnalysisStatus::Succeeded)
            .await
            .unwrap();

        // The stale resolution arrives later and must be discarded.
        resolve_first.send(Some("first answer".into())).unwrap();
        settle().await;

        assert_eq!(surface.outcome().text.as_deref(), Some("second answer"));
    }

    #[tokio::test]
    async fn stale_failure_does_not_disturb_newer_success() {
        let (backend, mut calls) = HoldBackend::new();
        let surface = RequestLifecycle::new(backend as _);

        surface.submit(request("first"));
        let resolve_first = calls.recv().await.unwrap();
        surface.submit(request("second"));
        let resolve_second = calls.recv().await.unwrap();

        resolve_second.send(Some("kept".into())).unwrap();
        let mut rx = surface.watch();
        rx.wait_for(|o| o.status == AnalysisStatus::Succeeded)
            .await
            .unwrap();

        resolve_first.send(None).unwrap();
        settle().await;

        assert_eq!(surface.outcome().status, AnalysisStatus::Succeeded);
        assert_eq!(surface.outcome().text.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn resubmission_after_terminal_state_goes_pending_again() {
        let backend = Arc::new(StaticBackend::new(Some("answer")));
        let surface = RequestLifecycle::new(backend as _);

        surface.submit(request("one"));
        let mut rx = surface.watch();
        rx.wait_for(|o| o.status == AnalysisStatus::Succeeded)
            .await
            .unwrap();

        surface.submit(request("two"));
        // Either still pending or already resolved, never the stale answer
        // of a state the surface left.
        let outcome = surface.outcome();
        assert!(matches!(
            outcome.status,
            AnalysisStatus::Pending | AnalysisStatus::Succeeded
        ));
    }

    #[tokio::test]
    async fn reset_clears_surface_and_discards_in_flight_resolution() {
        let (backend, mut calls) = HoldBackend::new();
        let surface = RequestLifecycle::new(backend as _);

        surface.submit(request("doomed"));
        let resolve = calls.recv().await.unwrap();

        surface.reset();
        assert_eq!(surface.outcome(), AnalysisOutcome::idle());

        resolve.send(Some("too late".into())).unwrap();
        settle().await;
        assert_eq!(surface.outcome(), AnalysisOutcome::idle());
    }
}
