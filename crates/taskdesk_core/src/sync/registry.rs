//! In-process provider registry and selection hooks.
//!
//! One registry holds every configured service binding; configuration picks
//! the single active one that create-side pushes go to.

use crate::sync::provider::{PushProvider, PushReceipt, PushRequest, SyncError, SyncResult};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Provider registration/selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
    ProviderNotFound(String),
}

impl Display for ProviderRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "provider id already registered: {value}")
            }
            Self::ProviderNotFound(value) => write!(f, "provider not found: {value}"),
        }
    }
}

impl Error for ProviderRegistryError {}

/// Runtime registry of push bindings.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn PushProvider>>,
    active_provider_id: Option<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one service binding.
    pub fn register(&mut self, provider: Arc<dyn PushProvider>) -> Result<(), ProviderRegistryError> {
        let provider_id = provider.provider_id().trim().to_string();
        if !is_valid_provider_id(&provider_id) {
            return Err(ProviderRegistryError::InvalidProviderId(provider_id));
        }
        if self.providers.contains_key(provider_id.as_str()) {
            return Err(ProviderRegistryError::DuplicateProviderId(provider_id));
        }

        self.providers.insert(provider_id, provider);
        Ok(())
    }

    /// Returns sorted provider ids.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    /// Selects the binding that pushes will go to.
    pub fn select_active(&mut self, provider_id: &str) -> Result<(), ProviderRegistryError> {
        let normalized = provider_id.trim();
        if !self.providers.contains_key(normalized) {
            return Err(ProviderRegistryError::ProviderNotFound(
                normalized.to_string(),
            ));
        }
        self.active_provider_id = Some(normalized.to_string());
        Ok(())
    }

    /// Returns active provider id.
    pub fn active_provider_id(&self) -> Option<&str> {
        self.active_provider_id.as_deref()
    }

    /// Returns one provider by id.
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn PushProvider>> {
        self.providers.get(provider_id.trim()).cloned()
    }

    /// Pushes through the selected binding.
    pub fn push_active(&self, request: &PushRequest) -> SyncResult<PushReceipt> {
        let provider = self
            .active_provider_id()
            .and_then(|id| self.get(id))
            .ok_or(SyncError::ProviderNotSelected)?;
        provider.push(request)
    }
}

fn is_valid_provider_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::{ProviderRegistry, ProviderRegistryError};
    use crate::sync::provider::{PushProvider, PushReceipt, PushRequest, SyncError, SyncResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockProvider {
        provider_id: String,
        pushes: AtomicUsize,
    }

    impl MockProvider {
        fn new(provider_id: &str) -> Self {
            Self {
                provider_id: provider_id.to_string(),
                pushes: AtomicUsize::new(0),
            }
        }
    }

    impl PushProvider for MockProvider {
        fn provider_id(&self) -> &str {
            &self.provider_id
        }

        fn push(&self, request: &PushRequest) -> SyncResult<PushReceipt> {
            self.pushes.fetch_add(1, Ordering::SeqCst);
            Ok(PushReceipt {
                remote_id: Some(format!("{}:{}", self.provider_id, request.title)),
                link: None,
            })
        }
    }

    fn request() -> PushRequest {
        PushRequest {
            title: "Buy milk".to_string(),
            scheduled_time: "2025-03-01 09:00".to_string(),
        }
    }

    #[test]
    fn registers_and_selects_provider() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(MockProvider::new("google_calendar")))
            .expect("provider should register");
        assert!(registry.active_provider_id().is_none());

        registry
            .select_active("google_calendar")
            .expect("provider should be selectable");
        assert_eq!(registry.active_provider_id(), Some("google_calendar"));
    }

    #[test]
    fn rejects_invalid_or_duplicate_provider_id() {
        let mut registry = ProviderRegistry::new();
        let invalid = registry.register(Arc::new(MockProvider::new("Google Calendar")));
        assert!(matches!(
            invalid,
            Err(ProviderRegistryError::InvalidProviderId(_))
        ));

        registry
            .register(Arc::new(MockProvider::new("google_calendar")))
            .expect("first provider should register");
        let duplicate = registry.register(Arc::new(MockProvider::new("google_calendar")));
        assert!(matches!(
            duplicate,
            Err(ProviderRegistryError::DuplicateProviderId(_))
        ));
    }

    #[test]
    fn select_active_rejects_unknown_provider() {
        let mut registry = ProviderRegistry::new();
        let missing = registry.select_active("microsoft_todo");
        assert!(matches!(
            missing,
            Err(ProviderRegistryError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn push_without_selection_reports_provider_not_selected() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(MockProvider::new("google_calendar")))
            .expect("provider should register");

        let err = registry.push_active(&request()).unwrap_err();
        assert_eq!(err, SyncError::ProviderNotSelected);
    }

    #[test]
    fn push_goes_to_the_selected_binding_only() {
        let calendar = Arc::new(MockProvider::new("google_calendar"));
        let tasks = Arc::new(MockProvider::new("google_tasks"));
        let mut registry = ProviderRegistry::new();
        registry
            .register(calendar.clone())
            .expect("calendar binding should register");
        registry
            .register(tasks.clone())
            .expect("tasks binding should register");
        registry
            .select_active("google_tasks")
            .expect("tasks binding should select");

        let receipt = registry.push_active(&request()).unwrap();
        assert_eq!(receipt.remote_id.as_deref(), Some("google_tasks:Buy milk"));
        assert_eq!(calendar.pushes.load(Ordering::SeqCst), 0);
        assert_eq!(tasks.pushes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn select_active_accepts_trimmed_input() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(Arc::new(MockProvider::new("google_calendar")))
            .expect("provider should register");
        registry
            .select_active("  google_calendar  ")
            .expect("trimmed provider id should be selectable");
        assert_eq!(registry.active_provider_id(), Some("google_calendar"));
    }
}
