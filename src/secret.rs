//! Where the shared webhook secret comes from

pub const WEBHOOK_SECRET_VAR: &str = "WEBHOOK_SECRET";

/// Supplies the HMAC key. `None` turns signature verification off.
pub trait SecretProvider: Send + Sync {
    fn secret(&self) -> Option<String>;
}

/// Reads the secret from the environment on every call, so rotating it needs no restart.
/// A variable that is set but empty still enables verification (with an empty key).
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new(WEBHOOK_SECRET_VAR)
    }
}

impl SecretProvider for EnvSecret {
    fn secret(&self) -> Option<String> {
        std::env::var_os(&self.var).map(|v| v.to_string_lossy().into_owned())
    }
}

/// Fixed secret, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSecret(pub Option<String>);

impl StaticSecret {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn new(secret: impl Into<String>) -> Self {
        Self(Some(secret.into()))
    }
}

impl SecretProvider for StaticSecret {
    fn secret(&self) -> Option<String> {
        self.0.clone()
    }
}
