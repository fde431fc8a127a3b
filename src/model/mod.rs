mod transcriptions_panel;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::pagination::{
    FetchOutcome, FetchRequest, NavigationRequest, PageTransition, PaginationCoordinator,
    RequestToken,
};
use crate::session::Profile;
use crate::transcript::TranscriptionPage;

pub use transcriptions_panel::{LoadedTable, SummaryRow, TranscriptionsPanel};

#[derive(Debug)]
pub enum AppEvent {
    PageLoaded {
        token: RequestToken,
        result: Result<TranscriptionPage, AppError>,
    },
    ProfileLoaded {
        result: Result<Profile, AppError>,
    },
}

/// State of the single transcriptions view. Only the event loop mutates it.
#[derive(Debug)]
pub struct AppState {
    pub location: String,
    pub pagination: PaginationCoordinator,
    pub transcriptions: TranscriptionsPanel,
    pub profile: Option<Profile>,
    pub profile_error: Option<String>,
}

impl AppState {
    pub fn mount(location: &str, show_transcription: bool) -> (Self, FetchRequest) {
        let (pagination, fetch) = PaginationCoordinator::mount(location);
        let transcriptions = TranscriptionsPanel {
            show_transcription,
            ..TranscriptionsPanel::default()
        };
        let state = Self {
            location: location.to_string(),
            pagination,
            transcriptions,
            profile: None,
            profile_error: None,
        };
        (state, fetch)
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.is_loading()
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageLoaded { token, result } => self.apply_page(token, result),
            AppEvent::ProfileLoaded { result } => match result {
                Ok(profile) => {
                    self.profile = Some(profile);
                    self.profile_error = None;
                }
                Err(err) => {
                    warn!(error = %err, "Profile fetch failed");
                    self.profile_error = Some(err.to_string());
                }
            },
        }
    }

    fn apply_page(&mut self, token: RequestToken, result: Result<TranscriptionPage, AppError>) {
        match self.pagination.complete(token, result) {
            FetchOutcome::Applied { page, data } => {
                let (table, meta) = data.into_parts();
                self.pagination.record_meta(meta);
                self.transcriptions.replace(page, table);
            }
            FetchOutcome::Stale => {}
            FetchOutcome::Failed { error, restore } => {
                warn!(error = %error, "Failed to fetch transcriptions");
                self.transcriptions.error = Some(format!("Failed to fetch transcriptions: {error}"));
                if let Some(nav) = restore {
                    self.navigate(nav);
                }
            }
        }
    }

    pub fn navigate(&mut self, request: NavigationRequest) {
        info!(?request, "Navigation");
        self.location = request.location().to_string();
    }

    fn start(&mut self, transition: PageTransition) -> FetchRequest {
        self.navigate(transition.navigation);
        transition.fetch
    }

    pub fn next_page(&mut self) -> Option<FetchRequest> {
        let transition = self.pagination.next_page()?;
        Some(self.start(transition))
    }

    pub fn previous_page(&mut self) -> Option<FetchRequest> {
        let transition = self.pagination.previous_page()?;
        Some(self.start(transition))
    }

    pub fn reload(&mut self) -> FetchRequest {
        self.transcriptions.error = None;
        self.pagination.reload()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::AppErrorKind;
    use crate::pagination::PageNumber;

    fn page_payload(name: &str) -> TranscriptionPage {
        serde_json::from_value(json!({
            "headers": ["ID", "Name", "Time", "overall_score"],
            "table_data": [[1, name, "2024-01-05 13:30:00", 9]],
            "total_count": 1,
            "current_page": 1,
            "total_pages": 3
        }))
        .expect("payload")
    }

    fn first_name(state: &AppState) -> String {
        state.transcriptions.table.as_ref().unwrap().summaries()[0].cells[1].clone()
    }

    #[test]
    fn initial_fetch_populates_table() {
        let (mut state, fetch) = AppState::mount("/transcriptions?page=2", true);
        assert_eq!(fetch.page, PageNumber::clamped(2));
        assert!(state.is_loading());
        state.apply(AppEvent::PageLoaded {
            token: fetch.token,
            result: Ok(page_payload("Kickoff")),
        });
        assert!(!state.is_loading());
        assert_eq!(first_name(&state), "Kickoff");
        assert_eq!(state.pagination.total_pages(), Some(3));
    }

    #[test]
    fn stale_page_is_not_applied() {
        let (mut state, initial) = AppState::mount("/transcriptions", true);
        state.apply(AppEvent::PageLoaded {
            token: initial.token,
            result: Ok(page_payload("One")),
        });
        let two = state.next_page().expect("next");
        let three = state.next_page().expect("next again");
        assert_eq!(state.location, "/transcriptions?page=3");

        state.apply(AppEvent::PageLoaded {
            token: two.token,
            result: Ok(page_payload("Two")),
        });
        assert!(state.is_loading());
        assert_eq!(first_name(&state), "One");

        state.apply(AppEvent::PageLoaded {
            token: three.token,
            result: Ok(page_payload("Three")),
        });
        assert_eq!(first_name(&state), "Three");
        assert_eq!(state.pagination.current_page(), PageNumber::clamped(3));
    }

    #[test]
    fn failed_fetch_keeps_previous_table_and_restores_location() {
        let (mut state, initial) = AppState::mount("/transcriptions", true);
        state.apply(AppEvent::PageLoaded {
            token: initial.token,
            result: Ok(page_payload("Kept")),
        });
        let next = state.next_page().expect("next");
        assert_eq!(state.location, "/transcriptions?page=2");
        state.apply(AppEvent::PageLoaded {
            token: next.token,
            result: Err(AppError::new(AppErrorKind::Network, "connection reset")),
        });
        assert!(!state.is_loading());
        assert_eq!(first_name(&state), "Kept");
        assert!(state
            .transcriptions
            .error
            .as_deref()
            .is_some_and(|msg| msg.contains("connection reset")));
        assert_eq!(state.location, "/transcriptions?page=1");
    }

    #[test]
    fn previous_is_unavailable_on_first_page() {
        let (mut state, _) = AppState::mount("/transcriptions?page=1", true);
        assert!(state.previous_page().is_none());
        assert_eq!(state.location, "/transcriptions?page=1");
    }

    #[test]
    fn profile_failure_is_non_fatal() {
        let (mut state, _) = AppState::mount("/transcriptions", false);
        state.apply(AppEvent::ProfileLoaded {
            result: Err(AppError::new(AppErrorKind::Auth, "expired token")),
        });
        assert!(state.profile.is_none());
        assert!(state.profile_error.is_some());
        state.apply(AppEvent::ProfileLoaded {
            result: Ok(Profile {
                minutes: 42,
                ..Profile::default()
            }),
        });
        assert_eq!(state.profile.as_ref().map(|p| p.minutes), Some(42));
        assert!(state.profile_error.is_none());
    }
}
