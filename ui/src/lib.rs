//! Shared UI crate for KPI Board: chart logic, rendering, export and views.

pub mod chart;
pub mod core;
pub mod i18n;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
