use secrecy::SecretString;

/// HTTP Basic credentials for the management API.
///
/// The password is kept in a [`SecretString`] so it never shows up in
/// `Debug` output or logs; it is only exposed when a request is built.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}
