//! Request-scope identity middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{
    domain::{Identity, Token},
    ui::state::AppState,
};

/// Identity attached to the request scope (`None` for anonymous requests)
#[derive(Debug, Clone, Default)]
pub struct AuthenticatedScope(pub Option<Identity>);

/// Resolve `Authorization: Bearer <token>` and attach the result to the request
///
/// Requests without a header, or with a token that cannot be resolved, continue
/// with an anonymous scope. Routes decide whether that is acceptable.
pub async fn attach_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match bearer_token(request.headers()) {
        Some(token) => match state.connect_participant_usecase.authenticate(&token).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!("Continuing with anonymous scope: {}", e);
                None
            }
        },
        None => None,
    };

    request
        .extensions_mut()
        .insert(AuthenticatedScope(identity));
    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<Token> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    Token::new(token.trim().to_string()).ok()
}
