use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Generator,
    Library,
    Pricing,
    Admin,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Generator => "generator",
            View::Library => "library",
            View::Pricing => "pricing",
            View::Admin => "admin",
        }
    }

    /// Anything unrecognised lands on the generator screen.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "generator" => View::Generator,
            "library" => View::Library,
            "pricing" => View::Pricing,
            "admin" => View::Admin,
            _ => View::Generator,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    current: View,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Selects `view`. The admin screen is only reachable for admins.
    pub fn navigate(&mut self, view: View, role: Role) -> View {
        self.current = match view {
            View::Admin if role != Role::Admin => {
                log::warn!("Admin view requested without admin role, showing generator");
                View::Generator
            }
            other => other,
        };
        log::debug!("Navigated to {}", self.current);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        assert_eq!(View::parse_or_default("library"), View::Library);
        assert_eq!(View::parse_or_default(" Pricing "), View::Pricing);
        assert_eq!(View::parse_or_default("admin"), View::Admin);
        assert_eq!(View::parse_or_default("settings"), View::Generator);
        assert_eq!(View::parse_or_default(""), View::Generator);
    }

    #[test]
    fn test_router_starts_on_generator() {
        assert_eq!(Router::new().current(), View::Generator);
    }

    #[test]
    fn test_navigate() {
        let mut router = Router::new();
        assert_eq!(router.navigate(View::Library, Role::User), View::Library);
        assert_eq!(router.navigate(View::Pricing, Role::User), View::Pricing);
        assert_eq!(router.current(), View::Pricing);
    }

    #[test]
    fn test_admin_requires_admin_role() {
        let mut router = Router::new();
        assert_eq!(router.navigate(View::Admin, Role::User), View::Generator);
        assert_eq!(router.navigate(View::Admin, Role::Admin), View::Admin);
    }
}
