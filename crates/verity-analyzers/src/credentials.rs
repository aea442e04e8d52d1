//! Backend credentials
//!
//! Analyzers never read credentials from the environment themselves; they ask
//! a `CredentialProvider` at call time.

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use verity_core::BackendConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    TextApiKey,
    MediaApiUser,
    MediaApiSecret,
}

impl CredentialKey {
    pub fn env_name(&self) -> &'static str {
        match self {
            CredentialKey::TextApiKey => "TEXT_API_KEY",
            CredentialKey::MediaApiUser => "IMAGE_API_USER",
            CredentialKey::MediaApiSecret => "IMAGE_API_SECRET",
        }
    }
}

/// A credential value whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Secret([REDACTED])")
    }
}

pub trait CredentialProvider: Send + Sync + Debug {
    fn get(&self, key: CredentialKey) -> Option<Secret>;
}

/// Credentials fixed at startup.
#[derive(Default, Clone)]
pub struct StaticCredentials {
    values: HashMap<CredentialKey, Secret>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: CredentialKey, value: impl Into<String>) -> Self {
        self.values.insert(key, Secret::new(value));
        self
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        let mut credentials = Self::new();
        let entries = [
            (CredentialKey::TextApiKey, &config.text_api_key),
            (CredentialKey::MediaApiUser, &config.image_api_user),
            (CredentialKey::MediaApiSecret, &config.image_api_secret),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                credentials = credentials.with(key, value.clone());
            }
        }
        credentials
    }
}

impl Debug for StaticCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut keys: Vec<&'static str> = self.values.keys().map(|k| k.env_name()).collect();
        keys.sort_unstable();
        f.debug_struct("StaticCredentials")
            .field("configured", &keys)
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn get(&self, key: CredentialKey) -> Option<Secret> {
        self.values.get(&key).cloned()
    }
}
