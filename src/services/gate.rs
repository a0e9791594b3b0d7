//! Session/role gate for the department library pages.
//!
//! Every page of the web client is a [`Route`]. [`evaluate`] decides, from
//! the current session, whether the page renders or where the visitor is
//! sent instead. The API extractors apply the same rules to endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    profile::{ProfileStatus, Role},
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    About,
    Search,
    Login,
    Signup,
    PendingApproval,
    Rejected,
    Dashboard,
    DashboardSearch,
    Borrowed,
    Registrations,
    Books,
    Borrows,
    Magazines,
    Journals,
    Csp,
    Reports,
}

const MEMBERS: &[Role] = &[Role::Student, Role::Faculty];
const LIBRARIAN: &[Role] = &[Role::Librarian];

impl Route {
    pub const ALL: [Route; 17] = [
        Route::Home,
        Route::About,
        Route::Search,
        Route::Login,
        Route::Signup,
        Route::PendingApproval,
        Route::Rejected,
        Route::Dashboard,
        Route::DashboardSearch,
        Route::Borrowed,
        Route::Registrations,
        Route::Books,
        Route::Borrows,
        Route::Magazines,
        Route::Journals,
        Route::Csp,
        Route::Reports,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Search => "/search",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::PendingApproval => "/pending-approval",
            Route::Rejected => "/rejected",
            Route::Dashboard => "/dashboard",
            Route::DashboardSearch => "/dashboard/search",
            Route::Borrowed => "/dashboard/borrowed",
            Route::Registrations => "/dashboard/registrations",
            Route::Books => "/dashboard/books",
            Route::Borrows => "/dashboard/borrows",
            Route::Magazines => "/dashboard/magazines",
            Route::Journals => "/dashboard/journals",
            Route::Csp => "/dashboard/csp",
            Route::Reports => "/dashboard/reports",
        }
    }

    /// Match a page path, ignoring a trailing slash and any query string
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Home
                | Route::About
                | Route::Search
                | Route::Login
                | Route::Signup
                | Route::PendingApproval
                | Route::Rejected
        )
    }

    /// Roles allowed on a protected page. Empty means any signed-in role.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Route::Borrowed => MEMBERS,
            Route::Registrations | Route::Books | Route::Borrows | Route::Reports => LIBRARIAN,
            _ => &[],
        }
    }
}

/// Outcome of a gate check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Render,
    RedirectToLogin,
    RedirectToPending,
    RedirectToRejected,
    RedirectToDashboard,
}

impl GateDecision {
    /// Where the visitor is sent, if anywhere
    pub fn redirect_to(&self) -> Option<Route> {
        match self {
            GateDecision::Render => None,
            GateDecision::RedirectToLogin => Some(Route::Login),
            GateDecision::RedirectToPending => Some(Route::PendingApproval),
            GateDecision::RedirectToRejected => Some(Route::Rejected),
            GateDecision::RedirectToDashboard => Some(Route::Dashboard),
        }
    }
}

pub fn evaluate(session: Option<&Session>, route: Route) -> GateDecision {
    if route.is_public() {
        return GateDecision::Render;
    }

    let Some(session) = session else {
        return GateDecision::RedirectToLogin;
    };

    match session.profile.status {
        ProfileStatus::Pending => return GateDecision::RedirectToPending,
        ProfileStatus::Rejected => return GateDecision::RedirectToRejected,
        ProfileStatus::Active => {}
    }

    let allowed = route.allowed_roles();
    if !allowed.is_empty() && !allowed.contains(&session.role()) {
        return GateDecision::RedirectToDashboard;
    }

    GateDecision::Render
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MenuItem {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
}

const MEMBER_MENU: &[(&str, Route, &str)] = &[
    ("Dashboard", Route::Dashboard, "LayoutDashboard"),
    ("Search Books", Route::DashboardSearch, "Search"),
    ("My Borrowed Books", Route::Borrowed, "BookOpen"),
    ("Magazines", Route::Magazines, "Newspaper"),
    ("Journals", Route::Journals, "FileText"),
    ("CSP Projects", Route::Csp, "FolderOpen"),
];

const LIBRARIAN_MENU: &[(&str, Route, &str)] = &[
    ("Dashboard", Route::Dashboard, "LayoutDashboard"),
    ("Registrations", Route::Registrations, "Users"),
    ("Books", Route::Books, "Library"),
    ("Borrow Records", Route::Borrows, "ClipboardList"),
    ("Magazines", Route::Magazines, "Newspaper"),
    ("Journals", Route::Journals, "FileText"),
    ("CSP Projects", Route::Csp, "FolderOpen"),
    ("Reports", Route::Reports, "FileSpreadsheet"),
];

const PUBLIC_MENU: &[(&str, Route, &str)] = &[
    ("Home", Route::Home, ""),
    ("About", Route::About, ""),
    ("Search Books", Route::Search, ""),
];

/// Navigation entries shown to a role; public entries when signed out
pub fn menu(role: Option<Role>) -> Vec<MenuItem> {
    let entries = match role {
        Some(Role::Librarian) => LIBRARIAN_MENU,
        Some(Role::Student) | Some(Role::Faculty) => MEMBER_MENU,
        None => PUBLIC_MENU,
    };
    entries
        .iter()
        .map(|&(label, route, icon)| MenuItem {
            label,
            href: route.path(),
            icon,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Profile;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(role: Role, status: ProfileStatus) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            profile: Profile {
                id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
                name: "Ravi".to_string(),
                role,
                external_id: "aids_12345".to_string(),
                phone: "9876543210".to_string(),
                status,
                created_at: now,
            },
            created_at: now,
            expires_at: now,
        }
    }

    #[test]
    fn public_pages_always_render() {
        for route in Route::ALL.into_iter().filter(Route::is_public) {
            assert_eq!(evaluate(None, route), GateDecision::Render);
            let pending = session(Role::Student, ProfileStatus::Pending);
            assert_eq!(evaluate(Some(&pending), route), GateDecision::Render);
        }
    }

    #[test]
    fn protected_pages_need_a_session() {
        for route in Route::ALL.into_iter().filter(|r| !r.is_public()) {
            assert_eq!(evaluate(None, route), GateDecision::RedirectToLogin);
        }
    }

    #[test]
    fn status_redirects_come_before_role_checks() {
        let pending = session(Role::Librarian, ProfileStatus::Pending);
        assert_eq!(evaluate(Some(&pending), Route::Books), GateDecision::RedirectToPending);

        let rejected = session(Role::Student, ProfileStatus::Rejected);
        assert_eq!(evaluate(Some(&rejected), Route::Books), GateDecision::RedirectToRejected);
        assert_eq!(evaluate(Some(&rejected), Route::Dashboard), GateDecision::RedirectToRejected);
    }

    #[test]
    fn roles_are_enforced_on_restricted_pages() {
        let student = session(Role::Student, ProfileStatus::Active);
        let faculty = session(Role::Faculty, ProfileStatus::Active);
        let librarian = session(Role::Librarian, ProfileStatus::Active);

        assert_eq!(evaluate(Some(&student), Route::Borrowed), GateDecision::Render);
        assert_eq!(evaluate(Some(&faculty), Route::Borrowed), GateDecision::Render);
        assert_eq!(evaluate(Some(&librarian), Route::Borrowed), GateDecision::RedirectToDashboard);

        for route in [Route::Registrations, Route::Books, Route::Borrows, Route::Reports] {
            assert_eq!(evaluate(Some(&student), route), GateDecision::RedirectToDashboard);
            assert_eq!(evaluate(Some(&librarian), route), GateDecision::Render);
        }

        for route in [Route::Dashboard, Route::Magazines, Route::Journals, Route::Csp] {
            assert_eq!(evaluate(Some(&faculty), route), GateDecision::Render);
            assert_eq!(evaluate(Some(&librarian), route), GateDecision::Render);
        }
    }

    #[test]
    fn paths_resolve_to_routes() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/dashboard/books?page=2"), Some(Route::Books));
        assert_eq!(Route::from_path("/nowhere"), None);
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn redirect_targets() {
        assert_eq!(GateDecision::Render.redirect_to(), None);
        assert_eq!(
            GateDecision::RedirectToPending.redirect_to().map(|r| r.path()),
            Some("/pending-approval")
        );
    }

    #[test]
    fn menus_only_list_reachable_pages() {
        for role in [Role::Student, Role::Faculty, Role::Librarian] {
            let s = session(role, ProfileStatus::Active);
            for entry in menu(Some(role)) {
                let route = Route::from_path(entry.href).unwrap();
                assert_eq!(evaluate(Some(&s), route), GateDecision::Render, "{}", entry.href);
            }
        }
        assert_eq!(menu(Some(Role::Librarian)).len(), 8);
        assert_eq!(menu(None).len(), 3);
    }
}
