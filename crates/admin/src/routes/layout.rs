//! Shared admin page chrome: sidebar, current admin, flash banner.

use devburger_core::Flash;
use tower_sessions::Session;

use crate::middleware::take_flash;
use crate::models::CurrentAdmin;

/// Sidebar navigation entries: (path, label).
pub const NAV: [(&str, &str); 3] = [
    ("/orders", "Pedidos"),
    ("/products", "Produtos"),
    ("/categories", "Categorias"),
];

/// Sidebar link with its active state resolved.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Data every admin page template receives.
#[derive(Debug, Clone)]
pub struct AdminLayout {
    pub admin_name: String,
    pub nav: Vec<NavLink>,
    pub flash: Option<Flash>,
}

impl AdminLayout {
    /// Build the layout for `section`, consuming any pending flash message.
    pub async fn load(session: &Session, admin: &CurrentAdmin, section: &str) -> Self {
        Self::new(admin, section, take_flash(session).await)
    }

    /// Build the layout with an explicit flash (for same-response notices).
    #[must_use]
    pub fn new(admin: &CurrentAdmin, section: &str, flash: Option<Flash>) -> Self {
        Self {
            admin_name: admin.name.clone(),
            nav: NAV
                .iter()
                .map(|&(href, label)| NavLink {
                    href,
                    label,
                    active: href == section,
                })
                .collect(),
            flash,
        }
    }
}
