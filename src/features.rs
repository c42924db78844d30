//! Feature controllers: the copy validator and the persona simulator.
//!
//! Each controller owns one request lifecycle surface and composes it with
//! the archive writer and the current identity. They carry no logic of
//! their own beyond remembering the operator's last input so an accepted
//! result can be archived with it.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::archive::{ArchiveRecord, ArchiveWriter};
use crate::brand::{self, BRAND_BOOK, Persona};
use crate::completion::CompletionBackend;
use crate::errors::ArchiveError;
use crate::lifecycle::{AnalysisOutcome, AnalysisRequest, RequestKind, RequestLifecycle};
use crate::session::Identity;

/// Archive record type for accepted copy checks.
const COPY_CHECK_TYPE: &str = "Copy Check";

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ── Copy validator ───────────────────────────────────────────────────

/// Validates candidate marketing copy against the brand book.
pub struct CopyValidator {
    surface: RequestLifecycle,
    writer: ArchiveWriter,
    identity: watch::Receiver<Option<Identity>>,
    last_input: Mutex<String>,
}

impl CopyValidator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        writer: ArchiveWriter,
        identity: watch::Receiver<Option<Identity>>,
    ) -> Self {
        Self {
            surface: RequestLifecycle::new(backend),
            writer,
            identity,
            last_input: Mutex::new(String::new()),
        }
    }

    /// Submit copy for validation. Empty input is ignored.
    pub fn check(&self, text: &str) {
        *relock(&self.last_input) = text.to_string();
        self.surface.submit(AnalysisRequest {
            kind: RequestKind::CopyCheck,
            prompt: brand::copy_check_prompt(text),
            subject_text: text.to_string(),
        });
    }

    pub fn outcome(&self) -> AnalysisOutcome {
        self.surface.outcome()
    }

    pub fn watch(&self) -> watch::Receiver<AnalysisOutcome> {
        self.surface.watch()
    }

    /// Persist the current successful result to the team archive.
    pub async fn save_to_archive(&self) -> Result<ArchiveRecord, ArchiveError> {
        let input = relock(&self.last_input).clone();
        let identity = self.identity.borrow().clone();
        self.writer
            .save(COPY_CHECK_TYPE, &input, &self.surface.outcome(), identity.as_ref())
            .await
    }
}

// ── Persona simulator ────────────────────────────────────────────────

struct SimulatorState {
    persona: Persona,
    last_query: String,
}

/// Role-plays a target customer persona against operator proposals.
pub struct PersonaSimulator {
    surface: RequestLifecycle,
    writer: ArchiveWriter,
    identity: watch::Receiver<Option<Identity>>,
    state: Mutex<SimulatorState>,
}

impl PersonaSimulator {
    /// Starts with the first persona in the brand book selected.
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        writer: ArchiveWriter,
        identity: watch::Receiver<Option<Identity>>,
    ) -> Self {
        Self {
            surface: RequestLifecycle::new(backend),
            writer,
            identity,
            state: Mutex::new(SimulatorState {
                persona: BRAND_BOOK.personas[0].clone(),
                last_query: String::new(),
            }),
        }
    }

    pub fn persona(&self) -> Persona {
        relock(&self.state).persona.clone()
    }

    /// Select a persona. Always resets the surface to `Idle` and clears
    /// the prior output, even when reselecting the current persona.
    pub fn select_persona(&self, persona: Persona) {
        let mut state = relock(&self.state);
        state.persona = persona;
        state.last_query.clear();
        self.surface.reset();
    }

    /// Select a persona by its brand-book name. Returns `false` and leaves
    /// the surface untouched when no persona has that name.
    pub fn select_persona_named(&self, name: &str) -> bool {
        match brand::find_persona(name) {
            Some(persona) => {
                self.select_persona(persona.clone());
                true
            }
            None => false,
        }
    }

    /// Ask the selected persona about a proposal. Empty input is ignored.
    pub fn ask(&self, query: &str) {
        let persona = {
            let mut state = relock(&self.state);
            state.last_query = query.to_string();
            state.persona.clone()
        };
        self.surface.submit(AnalysisRequest {
            kind: RequestKind::PersonaQuery,
            prompt: brand::persona_prompt(&persona, query),
            subject_text: query.to_string(),
        });
    }

    pub fn outcome(&self) -> AnalysisOutcome {
        self.surface.outcome()
    }

    pub fn watch(&self) -> watch::Receiver<AnalysisOutcome> {
        self.surface.watch()
    }

    /// Persist the current successful answer, typed with the persona name.
    pub async fn save_to_archive(&self) -> Result<ArchiveRecord, ArchiveError> {
        let (record_type, input) = {
            let state = relock(&self.state);
            (
                format!("Persona: {}", state.persona.name),
                state.last_query.clone(),
            )
        };
        let identity = self.identity.borrow().clone();
        self.writer
            .save(&record_type, &input, &self.surface.outcome(), identity.as_ref())
            .await
    }
}
