use std::collections::HashMap;

use super::RemoteError;

pub(crate) const SERVICE_NAME: &str = "zenstudy";

/// The two remote collaborators that need an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiService {
    Gemini,
    Youtube,
}

impl ApiService {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::Youtube => "YouTube",
        }
    }

    /// Environment variable checked before the keyring.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::Youtube => "YOUTUBE_API_KEY",
        }
    }

    fn keyring_server(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-api",
            Self::Youtube => "youtube-api",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gemini" => Some(Self::Gemini),
            "youtube" => Some(Self::Youtube),
            _ => None,
        }
    }
}

/// Resolve a service's API key: environment first, then the system keyring.
pub async fn resolve_key(service: ApiService) -> Result<String, RemoteError> {
    if let Ok(key) = std::env::var(service.env_var()) {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    match load_key(service).await {
        Ok(Some(key)) => Ok(key),
        Ok(None) => Err(RemoteError::MissingKey(service.label())),
        Err(e) => {
            log::warn!("Keyring lookup failed: {}", e);
            Err(RemoteError::MissingKey(service.label()))
        }
    }
}

/// Store an API key in the system keyring.
pub async fn store_key(service: ApiService, key: &str) -> Result<(), String> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| format!("Failed to connect to keyring: {}", e))?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", service.keyring_server());

    keyring
        .create_item(
            &format!("ZenStudy {} API Key", service.label()),
            &attrs,
            key.as_bytes(),
            true,
        )
        .await
        .map_err(|e| format!("Failed to store API key: {}", e))?;

    Ok(())
}

/// Load an API key from the system keyring.
pub async fn load_key(service: ApiService) -> Result<Option<String>, String> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| format!("Failed to connect to keyring: {}", e))?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", service.keyring_server());

    let items = keyring
        .search_items(&attrs)
        .await
        .map_err(|e| format!("Failed to search keyring: {}", e))?;

    if let Some(item) = items.first() {
        let secret_bytes = item
            .secret()
            .await
            .map_err(|e| format!("Failed to read secret: {}", e))?;
        let key = String::from_utf8(secret_bytes.to_vec())
            .map_err(|e| format!("Invalid UTF-8 in secret: {}", e))?;
        if !key.is_empty() {
            return Ok(Some(key));
        }
    }

    Ok(None)
}

/// Delete a stored API key from the system keyring.
pub async fn delete_key(service: ApiService) -> Result<(), String> {
    let keyring = oo7::Keyring::new()
        .await
        .map_err(|e| format!("Failed to connect to keyring: {}", e))?;

    let mut attrs = HashMap::new();
    attrs.insert("service", SERVICE_NAME);
    attrs.insert("server", service.keyring_server());

    let items = keyring
        .search_items(&attrs)
        .await
        .map_err(|e| format!("Failed to search keyring: {}", e))?;

    for item in items {
        item.delete()
            .await
            .map_err(|e| format!("Failed to delete API key: {}", e))?;
    }

    Ok(())
}
