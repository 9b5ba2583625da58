//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check (registered in `app`)
//! GET  /                         - Redirect to dashboard
//!
//! # Auth
//! GET  /auth/login               - Login page
//! POST /auth/login               - Authenticate against the backend
//! GET  /auth/logout              - Logout confirmation
//! POST /auth/logout              - Clear session
//!
//! # Dashboard
//! GET  /dashboard?tanggal=       - Charts for one day
//!
//! # Gerbang (gate master data)
//! GET  /gerbang?q=&page=         - Gate list
//! GET  /gerbang/new              - Create form
//! POST /gerbang                  - Create gate
//! GET  /gerbang/{id}/edit        - Edit form
//! POST /gerbang/{id}             - Update gate
//! GET  /gerbang/{id}/delete      - Delete confirmation
//! POST /gerbang/{id}/delete      - Delete gate
//!
//! # Lalin (traffic report)
//! GET  /lalin?tanggal=&q=&page=  - Traffic table
//! GET  /lalin/export?tanggal=    - CSV download
//! ```
//!
//! Notifications travel through the `success`, `error` and `info` query
//! parameters of the page a handler redirects to.

pub mod auth;
pub mod dashboard;
pub mod gerbang;
pub mod lalin;

use askama::Template;
use axum::{
    Router,
    response::{Html, Redirect},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::state::AppState;

/// Build the dashboard router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(gerbang::router())
        .merge(lalin::router())
}

// =============================================================================
// Notices
// =============================================================================

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    /// Query parameter carrying this kind.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A notification shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// CSS modifier for the toast.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
            NoticeKind::Info => "notice-info",
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Berhasil",
            NoticeKind::Error => "Gagal",
            NoticeKind::Info => "Info",
        }
    }
}

/// Query parameters for notification display.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub success: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
}

impl NoticeQuery {
    /// The notices present in the query, errors first.
    #[must_use]
    pub fn into_notices(self) -> Vec<Notice> {
        [
            self.error.map(Notice::error),
            self.success.map(Notice::success),
            self.info.map(Notice::info),
        ]
        .into_iter()
        .flatten()
        .filter(|n| !n.message.trim().is_empty())
        .collect()
    }
}

/// `path` with `notice` appended as a query parameter.
#[must_use]
pub fn notice_href(path: &str, notice: &Notice) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!(
        "{path}{separator}{}={}",
        notice.kind.param(),
        urlencoding::encode(&notice.message)
    )
}

/// Redirect (303) to `path` carrying `notice`.
#[must_use]
pub fn redirect_with(path: &str, notice: &Notice) -> Redirect {
    Redirect::to(&notice_href(path, notice))
}

// =============================================================================
// Layout
// =============================================================================

/// Sidebar entry.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

const NAV: [(&str, &str); 3] = [
    ("Dashboard", "/dashboard"),
    ("Gerbang Master", "/gerbang"),
    ("Lalin Report", "/lalin"),
];

/// Data the base layout needs on every authenticated page.
#[derive(Debug, Clone)]
pub struct LayoutView {
    pub username: String,
    pub page_title: &'static str,
    pub nav: Vec<NavItem>,
    /// Logout link returning here if the operator cancels.
    pub logout_href: String,
}

impl LayoutView {
    #[must_use]
    pub fn new(username: &str, page_title: &'static str, current_path: &'static str) -> Self {
        Self {
            username: username.to_string(),
            page_title,
            nav: NAV
                .iter()
                .map(|&(label, href)| NavItem {
                    label,
                    href,
                    active: href == current_path,
                })
                .collect(),
            logout_href: format!("/auth/logout?from={}", urlencoding::encode(current_path)),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Query parameters shared by the list screens.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub tanggal: Option<String>,
}

impl ListQuery {
    /// Trimmed search string (empty when absent).
    #[must_use]
    pub fn search(&self) -> String {
        self.q.as_deref().unwrap_or_default().trim().to_string()
    }

    /// Requested page; anything unparsable is page 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }

    /// Requested date, or `default` when absent or malformed.
    #[must_use]
    pub fn date_or(&self, default: NaiveDate) -> NaiveDate {
        self.tanggal
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
            .unwrap_or(default)
    }
}

/// Render a template, falling back to a plain error page.
pub fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}
