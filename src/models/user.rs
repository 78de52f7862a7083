use serde::{Deserialize, Serialize};

use super::common::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub credits: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, credits: u32) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            credits,
            google_id: None,
            role: Role::User,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
