use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::Date;

use crate::users::dto::User;

/// Lifecycle flag stored in `use_status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Pending,
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown user status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for UserStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UserStatus::Pending),
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Raw `use_users` row as the driver returns it.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub use_id: i64,
    pub use_name: String,
    pub use_email: String,
    pub use_birth: Date,
    pub use_register: Date,
    pub use_status: String,
}

impl TryFrom<UserRow> for User {
    type Error = UnknownStatus;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            use_id: r.use_id,
            use_name: r.use_name,
            use_email: r.use_email,
            use_birth: r.use_birth,
            use_register: r.use_register,
            use_status: r.use_status.parse()?,
        })
    }
}
