pub mod jwt;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ok, Ready};

use jwt::JwtService;

/// Turns an optional `Authorization: Bearer` header into a boolean flag.
///
/// Authentication here is best-effort: a missing header, a malformed
/// header, or a token that fails verification all downgrade the caller to
/// guest instead of rejecting the request.
#[derive(Clone)]
pub struct Authenticator {
    jwt_service: Option<JwtService>,
}

impl Authenticator {
    /// With no secret configured every caller is a guest.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            jwt_service: secret.map(JwtService::new),
        }
    }

    pub fn is_authenticated(&self, req: &HttpRequest) -> bool {
        let Some(jwt_service) = &self.jwt_service else {
            return false;
        };
        let Some(header) = req.headers().get("Authorization") else {
            return false;
        };
        let Ok(value) = header.to_str() else {
            return false;
        };
        let Some(token) = value.strip_prefix("Bearer ") else {
            return false;
        };

        match jwt_service.verify_token(token) {
            Ok(claims) => {
                log::debug!("Request authenticated for subject {}", claims.sub);
                true
            }
            Err(err) => {
                log::debug!("Bearer token rejected, treating caller as guest: {err}");
                false
            }
        }
    }
}

/// Extractor handing handlers the authentication flag. Never fails.
pub struct AuthStatus {
    pub is_authenticated: bool,
}

impl FromRequest for AuthStatus {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let is_authenticated = req
            .app_data::<web::Data<Authenticator>>()
            .is_some_and(|auth| auth.is_authenticated(req));
        ok(AuthStatus { is_authenticated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn no_header_means_guest() {
        let auth = Authenticator::new(Some("unit-test-secret"));
        let req = TestRequest::default().to_http_request();
        assert!(!auth.is_authenticated(&req));
    }

    #[test]
    fn valid_bearer_token_authenticates() {
        let auth = Authenticator::new(Some("unit-test-secret"));
        let token = JwtService::new("unit-test-secret")
            .generate_token("user-1")
            .unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        assert!(auth.is_authenticated(&req));
    }

    #[test]
    fn non_bearer_scheme_means_guest() {
        let auth = Authenticator::new(Some("unit-test-secret"));
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert!(!auth.is_authenticated(&req));
    }

    #[test]
    fn garbage_token_means_guest() {
        let auth = Authenticator::new(Some("unit-test-secret"));
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_http_request();
        assert!(!auth.is_authenticated(&req));
    }

    #[test]
    fn without_a_secret_everyone_is_a_guest() {
        let auth = Authenticator::new(None);
        let token = JwtService::new("unit-test-secret")
            .generate_token("user-1")
            .unwrap();
        let req = TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request();
        assert!(!auth.is_authenticated(&req));
    }
}
