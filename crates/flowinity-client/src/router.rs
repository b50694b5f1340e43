//! Path → named view resolution and the session guard applied to every
//! navigation.
//!
//! Patterns use `:name` for a required segment and `:name?` for an optional
//! one. Static segments match case-insensitively and a trailing slash is
//! ignored. When several patterns match, the most specific one wins: segment
//! by segment, static beats required beats optional.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::{debug, info};

pub const HOME: &str = "Home";
pub const LOGIN: &str = "Login";
pub const REGISTER: &str = "Register";
pub const NOT_FOUND: &str = "404";

/// Route names reachable without a session.
pub const PUBLIC_ROUTES: &[&str] = &[
    LOGIN,
    REGISTER,
    NOT_FOUND,
    "Collection Item",
    "Content Policy",
    "Slideshow",
    "Password Reset",
    "Email Verify",
    "Workspace Item",
    "Note",
    "Notes Workspaces Redirect",
    "Privacy Policy",
    "Attachment Item",
    "Credits",
    "TPU Setup Wizard",
    "User",
    "OAuth",
    "Join Chat",
    HOME,
];

// Redirect chains longer than this resolve to 404.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryType {
    Personal,
    Starred,
}

/// Screen a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    HomeHandler,
    Gallery(GalleryType),
    CollectionManage,
    Collection,
    AutoCollectsGallery,
    AutoCollects,
    AutoCollectsSettingsRule,
    AutoCollectsSettings,
    Chat,
    SettingsMain,
    SettingsAccount,
    SettingsSetup,
    SettingsAbout,
    SettingsSecurity,
    SettingsDomains,
    SettingsPrivacy,
    UserProfile,
    Login,
    Register,
    NotFound,
}

pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy)]
enum Target {
    View(View),
    Redirect(fn(&Params) -> String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(&'static str),
    Param(&'static str),
    Optional(&'static str),
}

impl Segment {
    fn rank(&self) -> u8 {
        match self {
            Segment::Static(_) => 3,
            Segment::Param(_) => 2,
            Segment::Optional(_) => 1,
        }
    }
}

fn parse_pattern(path: &'static str) -> Vec<Segment> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => match name.strip_suffix('?') {
                Some(name) => Segment::Optional(name),
                None => Segment::Param(name),
            },
            None => Segment::Static(segment),
        })
        .collect()
}

/// A declared route, possibly with nested children.
pub struct Route {
    path: &'static str,
    name: Option<&'static str>,
    target: Target,
    children: Vec<Route>,
}

impl Route {
    pub fn view(path: &'static str, name: &'static str, view: View) -> Self {
        Self {
            path,
            name: Some(name),
            target: Target::View(view),
            children: Vec::new(),
        }
    }

    pub fn redirect(path: &'static str, to: fn(&Params) -> String) -> Self {
        Self {
            path,
            name: None,
            target: Target::Redirect(to),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

// A route flattened with the views of its ancestors.
struct Record {
    name: Option<&'static str>,
    path: &'static str,
    pattern: Vec<Segment>,
    target: Target,
    views: Vec<View>,
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: &'static str,
    /// Normalized requested path (after redirects).
    pub path: String,
    pub params: Params,
    /// Views from the outermost route to the matched one.
    pub views: Vec<View>,
}

impl ResolvedRoute {
    /// Innermost view.
    pub fn view(&self) -> View {
        self.views.last().copied().unwrap_or(View::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed(ResolvedRoute),
    Redirect(ResolvedRoute),
}

impl Navigation {
    pub fn route(&self) -> &ResolvedRoute {
        match self {
            Navigation::Proceed(route) | Navigation::Redirect(route) => route,
        }
    }
}

pub struct Router {
    records: Vec<Record>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(routes())
    }
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        let mut records = Vec::new();
        flatten(routes, &[], &mut records);
        Self { records }
    }

    /// Resolve `path` to a named route, following redirects. Unmatched paths
    /// resolve to `404`.
    pub fn resolve(&self, path: &str) -> ResolvedRoute {
        let mut current = normalize(path);
        for _ in 0..MAX_REDIRECTS {
            let Some((record, params)) = self.best_match(&current) else {
                return not_found(current);
            };
            match record.target {
                Target::Redirect(to) => {
                    let next = normalize(&to(&params));
                    debug!(from = %current, to = %next, "route redirect");
                    current = next;
                }
                Target::View(_) => {
                    return ResolvedRoute {
                        name: record.name.unwrap_or(NOT_FOUND),
                        path: current,
                        params,
                        views: record.views.clone(),
                    };
                }
            }
        }
        not_found(current)
    }

    /// Path of a named route without parameters.
    pub fn path_for(&self, name: &str) -> Option<String> {
        self.records
            .iter()
            .find(|record| record.name == Some(name))
            .filter(|record| record.pattern.iter().all(|s| matches!(s, Segment::Static(_))))
            .map(|record| normalize(record.path))
    }

    /// Resolve `path` and apply the session guard.
    pub fn navigate(&self, path: &str, has_session: bool) -> Navigation {
        let target = self.resolve(path);
        match guard(target.name, has_session) {
            None => Navigation::Proceed(target),
            Some(name) => {
                let path = self.path_for(name).unwrap_or_else(|| "/".to_string());
                Navigation::Redirect(self.resolve(&path))
            }
        }
    }

    fn best_match(&self, path: &str) -> Option<(&Record, Params)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut best: Option<(&Record, Params)> = None;
        for record in &self.records {
            let mut params = Params::new();
            if !match_segments(&record.pattern, &segments, &mut params) {
                continue;
            }
            let better = match &best {
                None => true,
                Some((current, _)) => specificity(&record.pattern, &current.pattern) == Ordering::Greater,
            };
            if better {
                best = Some((record, params));
            }
        }
        best
    }
}

fn flatten(routes: Vec<Route>, ancestors: &[View], out: &mut Vec<Record>) {
    for route in routes {
        let mut views = ancestors.to_vec();
        if let Target::View(view) = route.target {
            views.push(view);
        }
        out.push(Record {
            name: route.name,
            path: route.path,
            pattern: parse_pattern(route.path),
            target: route.target,
            views: views.clone(),
        });
        flatten(route.children, &views, out);
    }
}

fn specificity(a: &[Segment], b: &[Segment]) -> Ordering {
    let a: Vec<u8> = a.iter().map(Segment::rank).collect();
    let b: Vec<u8> = b.iter().map(Segment::rank).collect();
    a.cmp(&b)
}

fn match_segments(pattern: &[Segment], path: &[&str], params: &mut Params) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return path.is_empty();
    };
    match head {
        Segment::Static(expected) => match path.split_first() {
            Some((segment, tail)) if segment.eq_ignore_ascii_case(expected) => {
                match_segments(rest, tail, params)
            }
            _ => false,
        },
        Segment::Param(name) => bind(name, rest, path, params),
        Segment::Optional(name) => {
            bind(name, rest, path, params) || match_segments(rest, path, params)
        }
    }
}

fn bind(name: &str, rest: &[Segment], path: &[&str], params: &mut Params) -> bool {
    let Some((value, tail)) = path.split_first() else {
        return false;
    };
    params.insert(name.to_string(), value.to_string());
    if match_segments(rest, tail, params) {
        return true;
    }
    params.remove(name);
    false
}

/// Strip query and fragment, collapse duplicate and trailing slashes.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn not_found(path: String) -> ResolvedRoute {
    ResolvedRoute {
        name: NOT_FOUND,
        path,
        params: Params::new(),
        views: vec![View::NotFound],
    }
}

/// Where a navigation to `target` must go instead, if anywhere.
///
/// Without a session only public routes are reachable; with one, the login
/// and registration pages are not.
pub fn guard(target: &str, has_session: bool) -> Option<&'static str> {
    if !has_session && !PUBLIC_ROUTES.contains(&target) {
        info!(%target, "No session, redirecting home");
        return Some(HOME);
    }
    if has_session && (target == LOGIN || target == REGISTER) {
        info!(%target, "Already signed in, redirecting home");
        return Some(HOME);
    }
    None
}

/// The client's route table.
pub fn routes() -> Vec<Route> {
    vec![
        Route::view("/", HOME, View::HomeHandler),
        Route::view("/gallery", "My Files", View::Gallery(GalleryType::Personal)),
        Route::view("/starred", "Starred", View::Gallery(GalleryType::Starred)),
        Route::view("/collections/manage", "Manage Collections", View::CollectionManage),
        Route::view("/collections/:id", "Collection", View::Collection),
        Route::view("/auto-collects/:id", "AutoCollect", View::AutoCollectsGallery),
        Route::view("/auto-collects", "AutoCollects", View::AutoCollects),
        Route::view(
            "/auto-collects/settings/:id",
            "AutoCollects Settings Rule",
            View::AutoCollectsSettingsRule,
        ),
        Route::view(
            "/auto-collects/settings",
            "AutoCollects Settings",
            View::AutoCollectsSettings,
        ),
        Route::redirect("/autoCollects/:id?/:page?", |params| match params.get("id") {
            Some(id) => format!("/auto-collects/{id}"),
            None => "/auto-collects".to_string(),
        }),
        Route::view("/communications/:id", "Chat", View::Chat),
        Route::view("/settings", "Settings", View::SettingsMain).with_children(vec![
            Route::view("/settings/account", "Account Settings", View::SettingsAccount),
            Route::view("/settings/setup", "Client Setup", View::SettingsSetup),
            Route::view("/settings/about", "About Flowinity", View::SettingsAbout),
            Route::view("/settings/security", "Account Security", View::SettingsSecurity),
            Route::view("/settings/domains", "Account Domain", View::SettingsDomains),
            Route::view("/settings/privacy", "Account Privacy", View::SettingsPrivacy),
        ]),
        Route::view("/u/:username", "User Profile", View::UserProfile),
        Route::view("/login", LOGIN, View::Login),
        Route::view("/register", REGISTER, View::Register),
    ]
}
