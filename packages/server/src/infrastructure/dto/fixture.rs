//! Directory fixture DTOs.
//!
//! ```json
//! {
//!   "users": [{"id": 1, "username": "alice", "token": "alice-token"}],
//!   "circles": [{"room": "team1", "members": [1]}]
//! }
//! ```

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryFixture {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub circles: Vec<CircleFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserFixture {
    pub id: i64,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CircleFixture {
    pub room: String,
    #[serde(default)]
    pub members: Vec<i64>,
}
