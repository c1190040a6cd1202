use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if operation routing references unknown providers,
    /// a timeout is zero, or a rate-limit window does not parse
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_routing()?;
        self.validate_rate_limits()?;
        Ok(())
    }

    fn validate_routing(&self) -> anyhow::Result<()> {
        for (operation, routing) in &self.operations {
            for provider in &routing.providers {
                if !self.providers.contains_key(provider) {
                    anyhow::bail!("operation '{operation}' routes to unknown provider '{provider}'");
                }
            }
            if routing.timeout_secs == Some(0) {
                anyhow::bail!("operation '{operation}' has a zero provider timeout");
            }
        }
        Ok(())
    }

    fn validate_rate_limits(&self) -> anyhow::Result<()> {
        let windows = std::iter::once(&self.rate_limit.default.window)
            .chain(self.rate_limit.classes.values().map(|limit| &limit.window));

        for window in windows {
            duration_str::parse(window).map_err(|e| anyhow::anyhow!("invalid rate limit window '{window}': {e}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Config;

    #[test]
    fn empty_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn routing_to_unknown_provider_rejected() {
        let config: Config = toml::from_str("[operations.bio]\nproviders = [\"ghost\"]").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
            [providers.openai]
            type = "openai_text"
            api_key = "sk-test"
            model = "gpt-4o-mini"

            [providers.dalle]
            type = "openai_image"
            api_key = "sk-test"
            model = "dall-e-3"

            [operations.bio]
            providers = ["openai"]
            cache_ttl_secs = 600

            [operations.image]
            providers = ["dalle"]
            user_scoped = true

            [rate_limit.classes.ai-image]
            requests = 10
            window = "1m"

            [quota.tiers.free]
            ai_generations = 10
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(config.routing_for(muse_core::Operation::Image).user_scoped);
        assert!(!config.routing_for(muse_core::Operation::Bio).user_scoped);
    }

    #[test]
    fn cache_section_ttl_backfills_routings_without_one() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            default_ttl_seconds = 120

            [providers.openai]
            type = "openai_text"
            api_key = "sk-test"
            model = "gpt-4o-mini"

            [operations.bio]
            providers = ["openai"]

            [operations.description]
            providers = ["openai"]
            cache_ttl_secs = 600
            "#,
        )
        .unwrap();

        let bio = config.routing_for(muse_core::Operation::Bio);
        assert_eq!(bio.cache_ttl(), std::time::Duration::from_secs(120));

        // An explicit routing TTL is not overridden
        let description = config.routing_for(muse_core::Operation::Description);
        assert_eq!(description.cache_ttl(), std::time::Duration::from_secs(600));

        // Unconfigured operations inherit it too
        let image = config.routing_for(muse_core::Operation::Image);
        assert_eq!(image.cache_ttl(), std::time::Duration::from_secs(120));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config: Config = toml::from_str(
            "[providers.p]\ntype = \"openai_text\"\n[operations.bio]\nproviders = [\"p\"]\ntimeout_secs = 0",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
