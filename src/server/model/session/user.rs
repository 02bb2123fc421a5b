//! Logged in user stored in the session.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

/// Session key the user name is stored under
pub const SESSION_USER_KEY: &str = "pushmanager:user";

/// Name of the logged in user as stored in the session.
#[derive(Default, Deserialize, Serialize, Debug)]
pub struct SessionUser(pub String);

impl SessionUser {
    /// Insert the logged in user into session
    pub async fn insert(session: &Session, user: &str) -> Result<(), Error> {
        session
            .insert(SESSION_USER_KEY, SessionUser(user.to_string()))
            .await?;

        Ok(())
    }

    /// Get the logged in user from session
    pub async fn get(session: &Session) -> Result<Option<String>, Error> {
        Ok(session
            .get::<SessionUser>(SESSION_USER_KEY)
            .await?
            .map(|SessionUser(user)| user))
    }
}
