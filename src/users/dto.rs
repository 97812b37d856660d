use serde::{Deserialize, Serialize};
use time::Date;

use crate::users::repo_types::UserStatus;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A `use_users` row on the wire; field names mirror the columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub use_id: i64,
    pub use_name: String,
    pub use_email: String,
    #[serde(with = "iso_date")]
    pub use_birth: Date,
    #[serde(with = "iso_date")]
    pub use_register: Date,
    pub use_status: UserStatus,
}

/// Body of `POST /users/create`. Status is not accepted here.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub use_name: String,
    pub use_email: String,
    #[serde(with = "iso_date")]
    pub use_birth: Date,
    #[serde(with = "iso_date")]
    pub use_register: Date,
}

/// Body of `PUT /users/update/:id`, a full overwrite of the mutable columns.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub use_name: String,
    pub use_email: String,
    #[serde(with = "iso_date")]
    pub use_birth: Date,
    #[serde(with = "iso_date")]
    pub use_register: Date,
    pub use_status: UserStatus,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}
