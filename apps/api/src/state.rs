use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::provider::{select_provider, EnvironmentView};
use crate::llm_client::{resolve_backend, Backend, ClientSettings};
use crate::profile::InterestProfile;
use crate::speech::SpeechServices;
use crate::summary::Extractor;

/// Where provider credentials are read from on each request.
#[derive(Debug, Clone)]
pub enum EnvSource {
    /// Fresh snapshot of the process environment per request.
    Process,
    /// Fixed view, used by tests to pin a configuration.
    #[allow(dead_code)]
    Fixed(EnvironmentView),
}

impl EnvSource {
    fn snapshot(&self) -> EnvironmentView {
        match self {
            EnvSource::Process => EnvironmentView::from_process(),
            EnvSource::Fixed(view) => view.clone(),
        }
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub interests: Arc<InterestProfile>,
    pub extractor: Arc<Extractor>,
    /// Built once at startup; missing backends answer 503.
    pub speech: SpeechServices,
    pub env_source: EnvSource,
}

impl AppState {
    pub fn new(config: Config, speech: SpeechServices) -> Self {
        let interests = InterestProfile::with_extras(config.extra_interests.iter().cloned());
        let extractor = Extractor::new(&interests);
        Self {
            config: Arc::new(config),
            interests: Arc::new(interests),
            extractor: Arc::new(extractor),
            speech,
            env_source: EnvSource::Process,
        }
    }

    /// Selects a provider from the current credentials and resolves it into
    /// a backend under the configured no-provider policy.
    pub fn llm_backend(&self) -> Result<Backend, AppError> {
        let mut env = self.env_source.snapshot();
        let choice = select_provider(&mut env);
        resolve_backend(
            &choice,
            &env,
            self.config.no_provider_policy,
            &ClientSettings::from_config(&self.config),
        )
    }
}

#[cfg(test)]
pub mod test_support {
    use std::path::Path;

    use super::*;
    use crate::config::NoProviderPolicy;
    use crate::llm_client::provider::OPENAI_API_KEY;
    use crate::speech::Voice;

    /// State with no credentials, no speech and uploads under `upload_dir`.
    pub fn offline_state(upload_dir: &Path, policy: NoProviderPolicy) -> AppState {
        let mut config = Config::for_tests();
        config.upload_dir = upload_dir.to_path_buf();
        config.cv_path = upload_dir.join("cv.json");
        config.no_provider_policy = policy;

        let mut state = AppState::new(
            config,
            SpeechServices::unavailable("Speech services are not configured", Voice::Nova),
        );
        state.env_source = EnvSource::Fixed(EnvironmentView::default());
        state
    }

    /// State whose only credential is an OpenAI key, pointed at `base_url`.
    pub fn openai_state(upload_dir: &Path, base_url: &str) -> AppState {
        let mut state = offline_state(upload_dir, NoProviderPolicy::Unavailable);
        let mut config = (*state.config).clone();
        config.openai_base_url = base_url.to_string();
        state.config = Arc::new(config);
        state.env_source = EnvSource::Fixed(EnvironmentView::from_pairs([(
            OPENAI_API_KEY,
            "test-key",
        )]));
        state
    }
}
