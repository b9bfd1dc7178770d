// ── Route table and auth guard ──
//
// One static table describes every screen the client can reach. All
// navigation goes through `guard`, which reads the authorized flag at the
// moment of navigation; nothing is cached between calls.

use latchkey_api::Session;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

// ── Route ───────────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Landing,
    Login,
    Dashboard,
    Cards,
    CardReads,
    Wifi,
    Config,
    Logs,
    RestartSchedules,
    FirmwareUpdate,
}

/// What a route resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    View,
    Redirect(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteMeta {
    /// Reachable without authentication.
    pub public: bool,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub show_in_nav: bool,
    pub icon: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
struct RouteRecord {
    path: &'static str,
    target: Target,
    meta: RouteMeta,
}

const fn view(
    path: &'static str,
    title: &'static str,
    subtitle: &'static str,
    icon: &'static str,
) -> RouteRecord {
    RouteRecord {
        path,
        target: Target::View,
        meta: RouteMeta {
            public: false,
            title,
            subtitle,
            show_in_nav: true,
            icon: Some(icon),
        },
    }
}

const LANDING: RouteRecord = RouteRecord {
    path: "/",
    target: Target::Redirect(Route::Dashboard),
    meta: RouteMeta {
        public: false,
        title: "",
        subtitle: "",
        show_in_nav: false,
        icon: None,
    },
};

const LOGIN: RouteRecord = RouteRecord {
    path: "/login",
    target: Target::View,
    meta: RouteMeta {
        public: true,
        title: "Login",
        subtitle: "Connect to Device",
        show_in_nav: false,
        icon: None,
    },
};

const DASHBOARD: RouteRecord = view(
    "/dashboard",
    "Device Dashboard",
    "System Monitor and Statistics",
    "gauge",
);
const CARDS: RouteRecord = view(
    "/cards",
    "Cards Management",
    "Manage Access Cards",
    "credit-card",
);
const CARD_READS: RouteRecord = view(
    "/card-reads",
    "Card Reads",
    "View Card Read History",
    "history",
);
const WIFI: RouteRecord = view(
    "/wifi",
    "WiFi Settings",
    "Configure Network Settings",
    "wifi",
);
const CONFIG: RouteRecord = view(
    "/config",
    "Configuration",
    "System Configuration",
    "settings",
);
const LOGS: RouteRecord = view("/logs", "Logs", "Device Event Log", "list");
const RESTART_SCHEDULES: RouteRecord = view(
    "/restart-schedules",
    "Restart Schedules",
    "Plan Automatic Restarts",
    "clock",
);
const FIRMWARE_UPDATE: RouteRecord = view(
    "/firmware-update",
    "Firmware Update",
    "Update Device Firmware",
    "upload",
);

impl Route {
    fn record(self) -> &'static RouteRecord {
        match self {
            Self::Landing => &LANDING,
            Self::Login => &LOGIN,
            Self::Dashboard => &DASHBOARD,
            Self::Cards => &CARDS,
            Self::CardReads => &CARD_READS,
            Self::Wifi => &WIFI,
            Self::Config => &CONFIG,
            Self::Logs => &LOGS,
            Self::RestartSchedules => &RESTART_SCHEDULES,
            Self::FirmwareUpdate => &FIRMWARE_UPDATE,
        }
    }

    pub fn path(self) -> &'static str {
        self.record().path
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn target(self) -> Target {
        self.record().target
    }

    pub fn meta(self) -> RouteMeta {
        self.record().meta
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::iter().find(|r| r.path() == path)
    }
}

// ── Guard ───────────────────────────────────────────────────────────

/// Outcome of one guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed(Route),
    Redirect(Route),
}

/// Decide a single navigation step.
///
/// Redirect routes point at their target, the login screen bounces an
/// authenticated user to the dashboard, and every non-public route sends
/// an unauthenticated user to login.
pub fn guard(to: Route, authenticated: bool) -> Decision {
    if let Target::Redirect(next) = to.target() {
        return Decision::Redirect(next);
    }
    if to == Route::Login && authenticated {
        return Decision::Redirect(Route::Dashboard);
    }
    if !to.meta().public && !authenticated {
        return Decision::Redirect(Route::Login);
    }
    Decision::Proceed(to)
}

/// Follow redirects until the guard lets navigation proceed.
pub fn resolve(to: Route, authenticated: bool) -> Route {
    let mut current = to;
    for _ in 0..Route::iter().len() {
        match guard(current, authenticated) {
            Decision::Proceed(route) => return route,
            Decision::Redirect(next) => {
                debug!(from = %current, to = %next, "navigation redirected");
                current = next;
            }
        }
    }
    Route::Login
}

/// [`resolve`] with the authorized flag read from `session` right now.
pub fn navigate(session: &Session, to: Route) -> Route {
    resolve(to, session.is_authorized())
}

// ── Navigation menu ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub route: Route,
    pub name: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    pub icon: Option<&'static str>,
}

/// Routes that render a view, are not redirects, and are not hidden.
pub fn navigation_menu() -> Vec<NavItem> {
    Route::iter()
        .filter(|r| r.target() == Target::View && r.meta().show_in_nav)
        .map(|route| NavItem {
            route,
            name: route.name(),
            path: route.path(),
            title: route.meta().title,
            icon: route.meta().icon,
        })
        .collect()
}
