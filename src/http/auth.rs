// ============================================================================
// Ownership Checks
// ============================================================================
//
// The edge gateway authenticates callers and forwards a verified identity in
// request headers; this service never sees credentials. Ownership
// enforcement is optional (off by default) so the documented 400/404/500
// contract holds for deployments that gate access upstream.
//
// ============================================================================

use actix_web::HttpRequest;
use thiserror::Error;

use crate::store::{EntityStore, StoreError};

/// Header carrying the authenticated user id, set by the gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role, set by the gateway.
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: Role,
}

/// The entity a request is scoped to, before ownership is resolved.
#[derive(Debug, Clone, Copy)]
pub enum Subject {
    User(i64),
    Buyer(i64),
    Seller(i64),
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("access denied")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reads the gateway identity headers. A missing or malformed user id means
/// no caller; an unrecognized role falls back to the ordinary member role.
pub fn caller_from(req: &HttpRequest) -> Option<Caller> {
    let raw = req.headers().get(USER_ID_HEADER)?.to_str().ok()?;
    let user_id: i64 = raw.trim().parse().ok()?;
    if user_id < 1 {
        return None;
    }

    let role = match req.headers().get(ROLE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(role) if role.eq_ignore_ascii_case("admin") => Role::Admin,
        _ => Role::Member,
    };

    Some(Caller { user_id, role })
}

/// Checks that the caller may read the subject's activity.
///
/// Admins see everything. A subject whose owning row is gone passes the
/// check so the aggregation can report it as not found instead of leaking a
/// 403 for an id that does not exist.
pub async fn authorize(
    enforce: bool,
    caller: Option<Caller>,
    subject: Subject,
    store: &dyn EntityStore,
) -> Result<(), AccessError> {
    if !enforce {
        return Ok(());
    }

    let caller = caller.ok_or(AccessError::Unauthenticated)?;
    if caller.role == Role::Admin {
        return Ok(());
    }

    let owner = match subject {
        Subject::User(user_id) => Some(user_id),
        Subject::Buyer(buyer_id) => store.buyer_by_id(buyer_id).await?.map(|b| b.user_id),
        Subject::Seller(seller_id) => store.seller_by_id(seller_id).await?.map(|s| s.user_id),
    };

    match owner {
        Some(user_id) if user_id != caller.user_id => Err(AccessError::Forbidden),
        _ => Ok(()),
    }
}
