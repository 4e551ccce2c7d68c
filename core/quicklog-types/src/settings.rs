use crate::descriptor::ProviderDescriptor;

/// The persisted provider set plus its environment label.
///
/// Names should be unique for [`Settings::provider`] to be meaningful; this
/// is not enforced and duplicates resolve to the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub environment: Option<String>,
    pub handle_uncatched_exceptions: bool,
    pub providers: Vec<ProviderDescriptor>,
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_environment(&mut self, environment: impl Into<String>) {
        self.environment = Some(environment.into());
    }

    pub fn add_provider(&mut self, provider: ProviderDescriptor) {
        self.providers.push(provider);
    }

    /// First provider with exactly this name.
    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.name() == name)
    }

    pub fn provider_mut(&mut self, name: &str) -> Option<&mut ProviderDescriptor> {
        self.providers.iter_mut().find(|p| p.name() == name)
    }

    /// Removes the first provider with this name.
    pub fn remove_provider(&mut self, name: &str) -> Option<ProviderDescriptor> {
        let index = self.providers.iter().position(|p| p.name() == name)?;
        Some(self.providers.remove(index))
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(ProviderDescriptor::name).collect()
    }
}
