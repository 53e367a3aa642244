use crate::models::response::{into_result, ValidationResponse};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

#[derive(Debug, Display, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[display("guest")]
    Guest,
    #[display("author")]
    Author,
    #[display("editor")]
    Editor,
    #[display("admin")]
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub affiliation: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub affiliation: String,
}

impl UserForm {
    pub fn validate(&self) -> Result<(), Vec<ValidationResponse>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationResponse::new("name", "Name cannot be empty"));
        }
        if !self.email.trim().validate_email() {
            errors.push(ValidationResponse::new("email", "Invalid email address"));
        }

        into_result(errors)
    }

    pub fn into_user(self, id: String, previous: Option<&User>) -> User {
        let name = self.name.trim().to_string();
        let avatar = previous.and_then(|p| p.avatar.clone()).or_else(|| {
            Some(format!(
                "https://ui-avatars.com/api/?name={}&background=random",
                name.replace(' ', "+")
            ))
        });

        User {
            id,
            name,
            email: self.email.trim().to_string(),
            role: self.role,
            affiliation: self.affiliation.trim().to_string(),
            avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_users_get_a_generated_avatar() {
        let user = UserForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Author,
            affiliation: String::new(),
        }
        .into_user("u9".to_string(), None);
        assert_eq!(
            user.avatar.as_deref(),
            Some("https://ui-avatars.com/api/?name=Ada+Lovelace&background=random")
        );
    }

    #[test]
    fn role_parses_lowercase() {
        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::Editor);
        assert_eq!(Role::default(), Role::Guest);
    }
}
