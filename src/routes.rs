//! Application route table.
//!
//! Mirrors the client-side router: a few public pages and a set of
//! dashboard views that sit behind the [`RouteGuard`](crate::guard::RouteGuard).

use std::collections::BTreeMap;

use serde::Serialize;

/// Views the front-end can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    SignUp,
    Login,
    UserHome,
    Lists,
    Expenses,
    Family,
    FamilyDashboard,
    Profile,
    CreateList,
    AddExpense,
    CreateFamily,
    InviteFamily,
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Pattern such as `/family/:familyId`.
    pub pattern: &'static str,
    pub view: View,
    /// Whether the view sits behind the route guard.
    pub protected: bool,
}

impl Route {
    const fn public(pattern: &'static str, view: View) -> Self {
        Self {
            pattern,
            view,
            protected: false,
        }
    }

    const fn protected(pattern: &'static str, view: View) -> Self {
        Self {
            pattern,
            view,
            protected: true,
        }
    }

    /// Number of `:param` segments; literal routes win ties.
    fn param_count(&self) -> usize {
        segments(self.pattern)
            .filter(|s| s.starts_with(':'))
            .count()
    }

    fn matches(&self, path_segments: &[&str]) -> Option<BTreeMap<String, String>> {
        let pattern: Vec<&str> = segments(self.pattern).collect();
        if pattern.len() != path_segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in pattern.iter().zip(path_segments) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), (*actual).to_string());
                }
                None if expected == actual => {}
                None => return None,
            }
        }
        Some(params)
    }
}

/// The full route table.
pub const ROUTES: &[Route] = &[
    Route::public("/", View::Home),
    Route::public("/signup", View::SignUp),
    Route::public("/login", View::Login),
    Route::protected("/home", View::UserHome),
    Route::protected("/lists", View::Lists),
    Route::protected("/expenses", View::Expenses),
    Route::protected("/family", View::Family),
    Route::protected("/family/:familyId", View::FamilyDashboard),
    Route::protected("/profile", View::Profile),
    Route::protected("/lists/create", View::CreateList),
    Route::protected("/expenses/add", View::AddExpense),
    Route::protected("/family/create", View::CreateFamily),
    Route::protected("/family/invite", View::InviteFamily),
];

/// A resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    pub view: View,
    pub protected: bool,
    /// Values captured by `:param` segments.
    pub params: BTreeMap<String, String>,
}

/// Resolve `path` against [`ROUTES`].
///
/// Query strings and fragments are ignored, as are trailing slashes.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if !path.starts_with('/') {
        return None;
    }
    let path_segments: Vec<&str> = segments(path).collect();

    ROUTES
        .iter()
        .filter_map(|route| route.matches(&path_segments).map(|params| (route, params)))
        .min_by_key(|(route, _)| route.param_count())
        .map(|(route, params)| RouteMatch {
            view: route.view,
            protected: route.protected,
            params,
        })
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        for (path, view) in [
            ("/", View::Home),
            ("/signup", View::SignUp),
            ("/login", View::Login),
        ] {
            let m = resolve(path).unwrap();
            assert_eq!(m.view, view);
            assert!(!m.protected);
        }
    }

    #[test]
    fn test_protected_routes() {
        for path in [
            "/home",
            "/lists",
            "/expenses",
            "/family",
            "/profile",
            "/lists/create",
            "/expenses/add",
            "/family/invite",
        ] {
            assert!(resolve(path).unwrap().protected, "{path} should be protected");
        }
    }

    #[test]
    fn test_family_param() {
        let m = resolve("/family/17").unwrap();
        assert_eq!(m.view, View::FamilyDashboard);
        assert_eq!(m.params.get("familyId").map(String::as_str), Some("17"));
    }

    #[test]
    fn test_literal_beats_param() {
        assert_eq!(resolve("/family/create").unwrap().view, View::CreateFamily);
        assert_eq!(resolve("/family/invite").unwrap().view, View::InviteFamily);
    }

    #[test]
    fn test_trailing_slash_and_query() {
        assert_eq!(resolve("/lists/").unwrap().view, View::Lists);
        assert_eq!(resolve("/expenses?month=3").unwrap().view, View::Expenses);
        assert_eq!(resolve("/profile#settings").unwrap().view, View::Profile);
    }

    #[test]
    fn test_unknown_paths() {
        assert!(resolve("/nope").is_none());
        assert!(resolve("/family/1/extra").is_none());
        assert!(resolve("lists").is_none());
    }

    #[test]
    fn test_view_serialization() {
        let json = serde_json::to_value(View::FamilyDashboard).unwrap();
        assert_eq!(json, "family_dashboard");
    }
}
