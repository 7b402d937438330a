/// The preview session
///
/// Owns the single "current preview" slot and the open-file state machine:
///
/// ```text
/// Idle --begin_open--> Loading --complete(Ok)--> Content
///                         |
///                         +--complete(Err)/cancel--> Idle
/// ```
///
/// Every `begin_open` hands out an `OpenTicket` with a new generation.
/// Only the ticket of the most recent open may commit a result; anything
/// older is dropped on arrival.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::data::{CardBackground, PreviewState};
use crate::metainfo::ColorScheme;

/// Token identifying one open-file operation
#[derive(Debug, Clone)]
pub struct OpenTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl OpenTicket {
    /// False once a newer open has started
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Welcome page, nothing loaded
    Idle,
    /// A file was picked and is being read/fetched/decoded
    Loading,
    Content(PreviewState),
}

/// What `Session::complete` did with a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The preview replaced whatever was shown
    Shown,
    /// The open failed and the session went back to idle
    Reset,
    /// The result belonged to an outdated open and was dropped
    Discarded,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    color_scheme: ColorScheme,
    latest: Arc<AtomicU64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ColorScheme::default())
    }
}

impl Session {
    pub fn new(color_scheme: ColorScheme) -> Self {
        Self {
            phase: Phase::Idle,
            color_scheme,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn preview(&self) -> Option<&PreviewState> {
        match &self.phase {
            Phase::Content(state) => Some(state),
            _ => None,
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    /// Enter `Loading` and invalidate every earlier ticket
    pub fn begin_open(&mut self) -> OpenTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.phase = Phase::Loading;
        tracing::debug!(generation, "open started");
        OpenTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Commit the outcome of the open identified by `ticket`
    pub fn complete<E: Display>(
        &mut self,
        ticket: &OpenTicket,
        result: Result<PreviewState, E>,
    ) -> Commit {
        if !self.owns(ticket) {
            tracing::debug!(generation = ticket.generation, "discarding result of outdated open");
            return Commit::Discarded;
        }

        match result {
            Ok(mut state) => {
                state.color_scheme = self.color_scheme;
                tracing::info!(title = %state.title, file = %state.subtitle, "preview ready");
                self.phase = Phase::Content(state);
                Commit::Shown
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not open metainfo file");
                self.phase = Phase::Idle;
                Commit::Reset
            }
        }
    }

    /// Abandon the current open, e.g. when the file dialog is dismissed
    pub fn cancel(&mut self, ticket: &OpenTicket) {
        if self.owns(ticket) && self.phase == Phase::Loading {
            self.phase = Phase::Idle;
        }
    }

    /// Flip light/dark and return the card background for the new scheme
    pub fn toggle_color_scheme(&mut self) -> CardBackground {
        self.color_scheme = self.color_scheme.toggled();
        match &mut self.phase {
            Phase::Content(state) => {
                state.color_scheme = self.color_scheme;
                state.background_color()
            }
            _ => CardBackground::NoBranding,
        }
    }

    fn owns(&self, ticket: &OpenTicket) -> bool {
        Arc::ptr_eq(&self.latest, &ticket.latest) && ticket.is_current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use crate::metainfo::{Branding, ColorString};
    use crate::state::data::tests::sample_state;

    fn titled(title: &str) -> PreviewState {
        let mut state = sample_state(None);
        state.title = title.to_string();
        state
    }

    #[test]
    fn test_open_goes_loading_then_content() {
        let mut session = Session::default();
        assert_eq!(session.phase(), &Phase::Idle);

        let ticket = session.begin_open();
        assert_eq!(session.phase(), &Phase::Loading);

        assert_eq!(
            session.complete(&ticket, Ok::<_, PreviewError>(titled("A"))),
            Commit::Shown
        );
        assert_eq!(session.preview().unwrap().title, "A");
    }

    #[test]
    fn test_error_resets_to_idle() {
        let mut session = Session::default();
        let first = session.begin_open();
        session.complete(&first, Ok::<_, PreviewError>(titled("A")));

        let second = session.begin_open();
        let result = session.complete(
            &second,
            Err(PreviewError::Fetch {
                status: 404,
                reason: "Not Found".to_string(),
            }),
        );
        assert_eq!(result, Commit::Reset);
        assert_eq!(session.phase(), &Phase::Idle);
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_late_result_does_not_replace_newer_preview() {
        let mut session = Session::default();
        let a = session.begin_open();
        let b = session.begin_open();
        assert!(!a.is_current());
        assert!(b.is_current());

        assert_eq!(session.complete(&b, Ok::<_, PreviewError>(titled("B"))), Commit::Shown);
        assert_eq!(session.complete(&a, Ok::<_, PreviewError>(titled("A"))), Commit::Discarded);
        assert_eq!(session.preview().unwrap().title, "B");

        // A late failure must not reset the newer preview either
        assert_eq!(
            session.complete(&a, Err(PreviewError::EmptyContents)),
            Commit::Discarded
        );
        assert_eq!(session.preview().unwrap().title, "B");
    }

    #[test]
    fn test_ticket_from_other_session_is_rejected() {
        let mut session = Session::default();
        let mut other = Session::default();
        let foreign = other.begin_open();
        session.begin_open();

        assert_eq!(
            session.complete(&foreign, Ok::<_, PreviewError>(titled("X"))),
            Commit::Discarded
        );
    }

    #[test]
    fn test_cancel_returns_to_idle_only_for_current_ticket() {
        let mut session = Session::default();
        let old = session.begin_open();
        let current = session.begin_open();

        session.cancel(&old);
        assert_eq!(session.phase(), &Phase::Loading);
        session.cancel(&current);
        assert_eq!(session.phase(), &Phase::Idle);
    }

    #[test]
    fn test_toggle_updates_scheme_and_background() {
        let mut session = Session::new(ColorScheme::Light);
        assert_eq!(session.toggle_color_scheme(), CardBackground::NoBranding);
        assert_eq!(session.color_scheme(), ColorScheme::Dark);

        let ticket = session.begin_open();
        let mut state = titled("A");
        state.branding = Some(Branding {
            light: ColorString::new("white"),
            dark: ColorString::new("black"),
        });
        session.complete(&ticket, Ok::<_, PreviewError>(state));
        assert_eq!(session.preview().unwrap().color_scheme, ColorScheme::Dark);

        assert_eq!(
            session.toggle_color_scheme(),
            CardBackground::Branded(ColorString::new("white"))
        );
        assert_eq!(session.preview().unwrap().color_scheme, ColorScheme::Light);
    }
}
