//! HTTP Basic authentication: turns the `Authorization` header into a `Caller`.

use actix_web::dev::Payload;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, FromRequest, HttpRequest};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::{self, LocalBoxFuture};

use super::authz::Caller;
use super::error::{Error, Result};
use super::store::Store;

/// Username and password taken from a Basic `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_header(value: &HeaderValue) -> Result<Credentials> {
        let value = value.to_str().map_err(|_| Error::Unauthenticated)?;

        let (scheme, encoded) = value.split_once(' ').ok_or(Error::Unauthenticated)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(Error::Unauthenticated);
        }

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| Error::Unauthenticated)?;
        let decoded = String::from_utf8(decoded).map_err(|_| Error::Unauthenticated)?;

        let (username, password) = decoded.split_once(':').ok_or(Error::Unauthenticated)?;
        Ok(Credentials {
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }
}

/// Hash a password into an Argon2id PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| Error::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Resolve credentials to a caller, failing with `Unauthenticated` on any mismatch.
pub fn authenticate(store: &dyn Store, credentials: &Credentials) -> Result<Caller> {
    let user = match store.find_user(&credentials.username)? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown user {}", credentials.username);
            return Err(Error::Unauthenticated);
        }
    };

    if !verify_password(&credentials.password, &user.password_hash)? {
        warn!("Wrong password for user {}", credentials.username);
        return Err(Error::Unauthenticated);
    }

    Ok(Caller::Authenticated {
        role: user.role(),
        username: user.username,
    })
}

/// Requests without an `Authorization` header are anonymous; a header that does not
/// identify a known user rejects the request outright.
impl FromRequest for Caller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Caller>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let credentials = match req.headers().get(header::AUTHORIZATION) {
            None => return Box::pin(future::ready(Ok(Caller::Anonymous))),
            Some(value) => Credentials::from_header(value),
        };
        let store = req.app_data::<web::Data<dyn Store>>().cloned();

        Box::pin(async move {
            let credentials = credentials?;
            let store = store.ok_or(Error::Internal("store is not configured"))?;

            web::block(move || authenticate(store.get_ref(), &credentials)).await?
        })
    }
}
