#[allow(clippy::module_inception)]
pub mod session;

pub use session::{
    IssuedToken, SessionClaims, TOKEN_COOKIE, TOKEN_TTL_SECONDS, TokenService,
    token_from_cookie_header,
};
