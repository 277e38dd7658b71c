//! Navigation composition: icon lookup, per-role fallback tables, and
//! conversion of persisted menu trees into [`NavItem`]s.
//!
//! When a role has no active menu at its location, [`fallback_navigation`]
//! provides a built-in table so the navigation endpoint always has
//! something to return.

use serde::{Deserialize, Serialize};

use crate::roles::{ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STUDENT};
use crate::tree::TreeBranch;

/// Icon used when neither the item nor the title map provides one.
pub const DEFAULT_ICON: &str = "circle";

/// Legacy title -> icon mapping for menu items stored without an icon.
const TITLE_ICONS: &[(&str, &str)] = &[
    ("Dashboard", "layout-dashboard"),
    ("Courses", "book-open"),
    ("All Courses", "book-open"),
    ("My Courses", "book-open"),
    ("Categories", "folder-tree"),
    ("Enrollments", "clipboard-list"),
    ("Users", "users"),
    ("Students", "users"),
    ("Instructors", "user-check"),
    ("Payments", "credit-card"),
    ("Withdrawals", "wallet"),
    ("Earnings", "wallet"),
    ("Content", "layers"),
    ("Pages", "file-text"),
    ("Blog", "newspaper"),
    ("Media", "image"),
    ("Menus", "menu"),
    ("Extensions", "puzzle"),
    ("Plugins", "plug"),
    ("Themes", "palette"),
    ("Settings", "settings"),
    ("Reviews", "star"),
    ("Wishlist", "heart"),
    ("Certificates", "award"),
    ("Profile", "user"),
];

/// Look up the legacy icon for a display title (exact match).
pub fn icon_for_title(title: &str) -> Option<&'static str> {
    TITLE_ICONS
        .iter()
        .find(|(t, _)| *t == title)
        .map(|(_, icon)| *icon)
}

/// Pick the icon for an item: its own icon, else the title map, else the default.
pub fn resolve_icon(explicit: Option<&str>, title: &str) -> String {
    explicit
        .filter(|icon| !icon.trim().is_empty())
        .or_else(|| icon_for_title(title))
        .unwrap_or(DEFAULT_ICON)
        .to_string()
}

/// One entry of a resolved navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub target: String,
    pub has_children: bool,
    pub children: Vec<NavItem>,
    pub is_active: bool,
    pub css_class: String,
}

/// Fields a persisted menu row must expose to be rendered as navigation.
pub trait NavigationSource {
    fn nav_id(&self) -> String;
    fn title(&self) -> &str;
    fn url(&self) -> &str;
    fn target(&self) -> &str;
    fn explicit_icon(&self) -> Option<&str>;
    fn css_class(&self) -> Option<&str>;
}

/// Convert a materialized menu forest into navigation items.
pub fn from_forest<T: NavigationSource>(forest: Vec<TreeBranch<T>>) -> Vec<NavItem> {
    forest
        .into_iter()
        .map(|branch| {
            let children = from_forest(branch.children);
            let node = branch.node;
            NavItem {
                id: node.nav_id(),
                title: node.title().to_string(),
                url: node.url().to_string(),
                icon: resolve_icon(node.explicit_icon(), node.title()),
                target: node.target().to_string(),
                has_children: !children.is_empty(),
                children,
                is_active: false,
                css_class: node.css_class().unwrap_or_default().to_string(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Built-in fallback tables
// ---------------------------------------------------------------------------

struct StaticItem {
    key: &'static str,
    title: &'static str,
    url: &'static str,
    children: &'static [StaticItem],
}

const fn leaf(key: &'static str, title: &'static str, url: &'static str) -> StaticItem {
    StaticItem {
        key,
        title,
        url,
        children: &[],
    }
}

const ADMIN_ITEMS: &[StaticItem] = &[
    StaticItem {
        key: "courses",
        title: "Courses",
        url: "#",
        children: &[
            leaf("courses-all", "All Courses", "/admin/courses"),
            leaf("categories", "Categories", "/admin/categories"),
            leaf("enrollments", "Enrollments", "/admin/enrollments"),
        ],
    },
    StaticItem {
        key: "users",
        title: "Users",
        url: "#",
        children: &[
            leaf("students", "Students", "/admin/students"),
            leaf("instructors", "Instructors", "/admin/instructors"),
        ],
    },
    StaticItem {
        key: "payments",
        title: "Payments",
        url: "#",
        children: &[
            leaf("payments-all", "Payments", "/admin/payments"),
            leaf("withdrawals", "Withdrawals", "/admin/withdrawals"),
        ],
    },
    StaticItem {
        key: "content",
        title: "Content",
        url: "#",
        children: &[
            leaf("pages", "Pages", "/admin/pages"),
            leaf("blog", "Blog", "/admin/blog"),
            leaf("media", "Media", "/admin/media"),
            leaf("menus", "Menus", "/admin/menus"),
        ],
    },
    StaticItem {
        key: "extensions",
        title: "Extensions",
        url: "#",
        children: &[
            leaf("plugins", "Plugins", "/admin/plugins"),
            leaf("themes", "Themes", "/admin/themes"),
        ],
    },
    leaf("settings", "Settings", "/admin/settings"),
];

const INSTRUCTOR_ITEMS: &[StaticItem] = &[
    leaf("my-courses", "My Courses", "/instructor/courses"),
    leaf("students", "Students", "/instructor/students"),
    leaf("reviews", "Reviews", "/instructor/reviews"),
    leaf("earnings", "Earnings", "/instructor/earnings"),
    leaf("withdrawals", "Withdrawals", "/instructor/withdrawals"),
];

const STUDENT_ITEMS: &[StaticItem] = &[
    leaf("my-courses", "My Courses", "/student/courses"),
    leaf("wishlist", "Wishlist", "/student/wishlist"),
    leaf("certificates", "Certificates", "/student/certificates"),
    leaf("payments", "Payments", "/student/payments"),
];

fn role_items(role: &str) -> &'static [StaticItem] {
    match role {
        ROLE_ADMIN => ADMIN_ITEMS,
        ROLE_INSTRUCTOR => INSTRUCTOR_ITEMS,
        ROLE_STUDENT => STUDENT_ITEMS,
        _ => &[],
    }
}

fn static_nav(key: &str, title: &str, url: String, children: Vec<NavItem>) -> NavItem {
    NavItem {
        id: format!("static-{key}"),
        title: title.to_string(),
        url,
        icon: resolve_icon(None, title),
        target: "_self".to_string(),
        has_children: !children.is_empty(),
        children,
        is_active: false,
        css_class: String::new(),
    }
}

fn from_static(item: &StaticItem) -> NavItem {
    let children = item.children.iter().map(from_static).collect();
    static_nav(item.key, item.title, item.url.to_string(), children)
}

/// Built-in navigation for a role with no persisted menu.
///
/// Every role, known or not, gets the shared Dashboard and Profile entries;
/// known roles get their own section in between.
pub fn fallback_navigation(role: &str) -> Vec<NavItem> {
    let prefix = match role {
        ROLE_ADMIN | ROLE_INSTRUCTOR | ROLE_STUDENT => format!("/{role}"),
        _ => String::new(),
    };

    let mut items = vec![static_nav(
        "dashboard",
        "Dashboard",
        format!("{prefix}/dashboard"),
        Vec::new(),
    )];
    items.extend(role_items(role).iter().map(from_static));
    items.push(static_nav("profile", "Profile", "/profile".to_string(), Vec::new()));
    items
}

// ---------------------------------------------------------------------------
// Active-path marking
// ---------------------------------------------------------------------------

fn url_matches(url: &str, path: &str) -> bool {
    let url = url.trim_end_matches('/');
    let path = path.trim_end_matches('/');
    if url.is_empty() || url == "#" {
        return false;
    }
    path == url || path.strip_prefix(url).is_some_and(|rest| rest.starts_with('/'))
}

/// Mark items whose url matches `path` (exactly or as a parent segment) as
/// active. Parents of an active item are active as well.
///
/// Returns `true` if anything in `items` was marked.
pub fn mark_active(items: &mut [NavItem], path: &str) -> bool {
    let mut any = false;
    for item in items.iter_mut() {
        let child_active = mark_active(&mut item.children, path);
        item.is_active = child_active || url_matches(&item.url, path);
        any |= item.is_active;
    }
    any
}
