// SPDX-License-Identifier: Apache-2.0

use noticeboard_core::Clock;
use noticeboard_model::{LoginKind, RequestContext};
use noticeboard_store::{load_user_by_email, record_login};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::{QueryError, QueryErrorCode};

/// Binds an identity already verified by the login provider to a local
/// account and records the login.
pub fn establish_session(
    conn: &Connection,
    verified_email: &str,
    login: LoginKind,
    clock: &dyn Clock,
) -> Result<RequestContext, QueryError> {
    let Some(user) = load_user_by_email(conn, verified_email)? else {
        warn!(email = %verified_email, "login for unknown account");
        return Err(QueryError::new(
            QueryErrorCode::Unauthorized,
            "no account is registered for this address",
        ));
    };
    if !user.enabled {
        warn!(user = %user.id, "login for disabled account");
        return Err(QueryError::new(
            QueryErrorCode::Unauthorized,
            "account is disabled",
        ));
    }
    let previous_login = record_login(conn, user.id, clock.now())?;
    info!(user = %user.id, role = %user.role, ?login, "session established");
    Ok(RequestContext {
        user: user.id,
        role: user.role,
        login,
        previous_login,
    })
}
