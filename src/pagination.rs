use std::fmt;
use std::num::NonZeroU32;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::transcript::PageMeta;

pub const TRANSCRIPTIONS_PATH: &str = "/transcriptions";
const PAGE_PARAM: &str = "page";

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("leading integer pattern"));

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(NonZeroU32::MIN);

    /// Requests below 1 are treated as page 1.
    pub fn clamped(requested: i64) -> Self {
        let bounded = requested.clamp(1, i64::from(u32::MAX)) as u32;
        NonZeroU32::new(bounded).map_or(Self::FIRST, PageNumber)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn next(self) -> Self {
        PageNumber(self.0.saturating_add(1))
    }

    pub fn prev(self) -> Option<Self> {
        NonZeroU32::new(self.get() - 1).map(PageNumber)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read the `page` query parameter of a location such as
/// `/transcriptions?page=3`. Absent or non-numeric values yield page 1.
/// Like a browser `parseInt`, only the leading integer is read.
pub fn page_from_location(location: &str) -> PageNumber {
    let query = location
        .split_once('?')
        .map(|(_, rest)| rest.split('#').next().unwrap_or_default())
        .unwrap_or_default();
    let requested = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| parse_leading_int(&value));
    match requested {
        Some(n) => PageNumber::clamped(n),
        None => PageNumber::FIRST,
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let caps = LEADING_INT.captures(text)?;
    let digits = caps.get(1)?.as_str();
    match digits.parse::<i64>() {
        Ok(n) => Some(n),
        // Overflow: keep the sign so huge positives clamp high and negatives low.
        Err(_) if digits.starts_with('-') => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}

pub fn location_for(page: PageNumber) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(PAGE_PARAM, &page.to_string())
        .finish();
    format!("{TRANSCRIPTIONS_PATH}?{query}")
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Idle {
        page: PageNumber,
    },
    Transitioning {
        from: PageNumber,
        to: PageNumber,
        token: RequestToken,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub page: PageNumber,
    pub token: RequestToken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationRequest {
    Push(String),
    Replace(String),
}

impl NavigationRequest {
    pub fn location(&self) -> &str {
        match self {
            NavigationRequest::Push(loc) | NavigationRequest::Replace(loc) => loc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageTransition {
    pub navigation: NavigationRequest,
    pub fetch: FetchRequest,
}

#[derive(Debug, PartialEq)]
pub enum FetchOutcome<T> {
    Applied {
        page: PageNumber,
        data: T,
    },
    /// A response for a page that is no longer wanted.
    Stale,
    Failed {
        error: AppError,
        restore: Option<NavigationRequest>,
    },
}

/// Keeps the current page in step with the navigable location and makes
/// sure only the newest fetch is ever applied.
#[derive(Debug)]
pub struct PaginationCoordinator {
    state: PageState,
    next_token: u64,
    total_pages: Option<u32>,
    total_count: Option<u64>,
    has_displayed: bool,
}

impl PaginationCoordinator {
    pub fn mount(location: &str) -> (Self, FetchRequest) {
        let page = page_from_location(location);
        let mut coordinator = Self {
            state: PageState::Idle { page },
            next_token: 0,
            total_pages: None,
            total_count: None,
            has_displayed: false,
        };
        let fetch = coordinator.begin(page, page);
        info!(page = page.get(), location, "Transcriptions view mounted");
        (coordinator, fetch)
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// The page the user asked for most recently.
    pub fn current_page(&self) -> PageNumber {
        match self.state {
            PageState::Idle { page } => page,
            PageState::Transitioning { to, .. } => to,
        }
    }

    /// The page whose data is (or was last) on screen.
    pub fn displayed_page(&self) -> PageNumber {
        match self.state {
            PageState::Idle { page } => page,
            PageState::Transitioning { from, .. } => from,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PageState::Transitioning { .. })
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page().prev().is_some()
    }

    /// Next stays available unless the server reported a last page.
    pub fn can_go_next(&self) -> bool {
        match self.total_pages {
            Some(total) => self.current_page().get() < total,
            None => true,
        }
    }

    pub fn go_to_page(&mut self, requested: i64) -> PageTransition {
        let to = PageNumber::clamped(requested);
        let from = self.displayed_page();
        let fetch = self.begin(from, to);
        info!(from = from.get(), to = to.get(), "Page change requested");
        PageTransition {
            navigation: NavigationRequest::Push(location_for(to)),
            fetch,
        }
    }

    pub fn next_page(&mut self) -> Option<PageTransition> {
        if !self.can_go_next() {
            return None;
        }
        let next = self.current_page().next();
        Some(self.go_to_page(i64::from(next.get())))
    }

    pub fn previous_page(&mut self) -> Option<PageTransition> {
        let prev = self.current_page().prev()?;
        Some(self.go_to_page(i64::from(prev.get())))
    }

    pub fn reload(&mut self) -> FetchRequest {
        let page = self.current_page();
        let from = self.displayed_page();
        self.begin(from, page)
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn record_meta(&mut self, meta: PageMeta) {
        if let Some(reported) = meta.current_page {
            if reported != self.displayed_page().get() {
                debug!(
                    reported,
                    displayed = self.displayed_page().get(),
                    "Server reported a different page"
                );
            }
        }
        self.total_pages = meta.total_pages.filter(|total| *total > 0);
        self.total_count = meta.total_count;
    }

    /// Settle a fetch. Only the response matching the newest token is applied.
    pub fn complete<T>(&mut self, token: RequestToken, result: Result<T, AppError>) -> FetchOutcome<T> {
        let PageState::Transitioning {
            from,
            to,
            token: expected,
        } = self.state
        else {
            debug!(?token, "Response arrived while idle; discarding");
            return FetchOutcome::Stale;
        };
        if token != expected {
            debug!(?token, ?expected, "Discarding stale page response");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(data) => {
                self.state = PageState::Idle { page: to };
                self.has_displayed = true;
                FetchOutcome::Applied { page: to, data }
            }
            // Nothing on screen yet: stay on the requested page so a reload retries it.
            Err(error) if !self.has_displayed => {
                self.state = PageState::Idle { page: to };
                FetchOutcome::Failed {
                    error,
                    restore: None,
                }
            }
            Err(error) => {
                self.state = PageState::Idle { page: from };
                let restore = (from != to).then(|| NavigationRequest::Replace(location_for(from)));
                FetchOutcome::Failed { error, restore }
            }
        }
    }

    fn begin(&mut self, from: PageNumber, to: PageNumber) -> FetchRequest {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.state = PageState::Transitioning { from, to, token };
        FetchRequest { page: to, token }
    }
}
