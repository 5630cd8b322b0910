use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Tutor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Tutor => "TUTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "TUTOR" => Ok(Role::Tutor),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_keeps_canonical_name() {
        assert_eq!("TUTOR".parse::<Role>(), Ok(Role::Tutor));
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert!("ROLE_USER".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_as_stored() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, "\"USER\"");
    }
}
