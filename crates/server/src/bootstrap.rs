//! Wires configuration into the three service states. Every optional
//! capability falls back to a no-op or in-memory implementation so a keyless
//! local run still serves every endpoint.

use std::sync::Arc;

use paintd_core::{AppConfig, ConfigError, LoadOptions};
use paintd_enrich::{Enricher, OpenAiChatClient};
use paintd_outbound::{
    AnalyticsSink, Mailer, NoopAnalytics, NoopMailer, NoopQueue, ResendMailer, TaskQueue,
    TracingAnalytics,
};
use paintd_outbound::HttpQueue;
use paintd_store::{
    HttpObjectStore, HttpRecordStore, InMemoryObjectStore, InMemoryRecordStore, ObjectStore,
    PublicBucket, RecordStore,
};
use thiserror::Error;
use tracing::info;

use crate::dispatcher::DispatcherState;
use crate::gateway::GatewayState;
use crate::health::Capabilities;
use crate::notify::EmailRoutes;
use crate::site::SiteState;

pub struct Application {
    pub config: AppConfig,
    pub dispatcher: DispatcherState,
    pub gateway: GatewayState,
    pub site: SiteState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config))
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    let http = reqwest::Client::new();

    let enricher = Arc::new(match &config.llm.api_key {
        Some(api_key) => Enricher::new(Arc::new(OpenAiChatClient::new(
            http.clone(),
            api_key.clone(),
            config.llm.base_url.clone(),
            config.llm.model.clone(),
            config.llm.max_tokens,
            config.llm.temperature,
        ))),
        None => Enricher::unconfigured(),
    });

    let mailer: Arc<dyn Mailer> = match &config.email.api_key {
        Some(api_key) => Arc::new(ResendMailer::new(
            http.clone(),
            config.email.endpoint.clone(),
            api_key.clone(),
        )),
        None => Arc::new(NoopMailer),
    };

    let queue: Arc<dyn TaskQueue> = match &config.queue.endpoint {
        Some(endpoint) => {
            Arc::new(HttpQueue::new(http.clone(), endpoint.clone(), config.queue.token.clone()))
        }
        None => Arc::new(NoopQueue),
    };

    let records: Arc<dyn RecordStore> = match &config.storage.records_endpoint {
        Some(endpoint) => Arc::new(HttpRecordStore::new(
            http.clone(),
            endpoint.clone(),
            config.storage.api_token.clone(),
        )),
        None => Arc::new(InMemoryRecordStore::default()),
    };

    let objects: Arc<dyn ObjectStore> = match &config.storage.objects_endpoint {
        Some(endpoint) => Arc::new(HttpObjectStore::new(
            http.clone(),
            endpoint.clone(),
            config.storage.api_token.clone(),
        )),
        None => Arc::new(InMemoryObjectStore::default()),
    };

    let analytics: Arc<dyn AnalyticsSink> = if config.analytics.enabled {
        Arc::new(TracingAnalytics)
    } else {
        Arc::new(NoopAnalytics)
    };

    let capabilities = Capabilities {
        llm: enricher.is_configured(),
        email: config.email.api_key.is_some(),
        queue: config.queue.endpoint.is_some(),
        object_store: config.storage.objects_endpoint.is_some(),
    };

    let email_routes = EmailRoutes {
        source_address: config.email.source_address.clone(),
        operator_address: config.email.operator_address.clone(),
        company_name: config.site.company_name.clone(),
    };

    let dispatcher = DispatcherState {
        enricher: enricher.clone(),
        queue,
        mailer: mailer.clone(),
        email_routes: email_routes.clone(),
        capabilities,
    };

    let gateway = GatewayState {
        enricher,
        mailer,
        records,
        objects,
        analytics,
        bucket: PublicBucket::new(
            config.storage.bucket.clone(),
            config.storage.public_domain.clone(),
        ),
        email_routes,
        http,
        dispatcher_url: config.dispatcher_url(),
        capabilities,
    };

    let site = SiteState {
        ga_measurement_id: config.site.ga_measurement_id.clone(),
        inject: config.analytics.enabled,
    };

    info!(
        event_name = "system.bootstrap.wired",
        llm = capabilities.llm,
        email = capabilities.email,
        queue = capabilities.queue,
        object_store = capabilities.object_store,
        "application bootstrap complete"
    );

    Application { config, dispatcher, gateway, site }
}

#[cfg(test)]
mod tests {
    use paintd_core::{ConfigOverrides, LoadOptions};

    use super::bootstrap;

    #[tokio::test]
    async fn defaults_bootstrap_without_any_credentials() {
        let app = bootstrap(LoadOptions::default()).expect("bootstrap");

        assert!(!app.dispatcher.capabilities.llm);
        assert!(!app.dispatcher.capabilities.email);
        assert!(!app.dispatcher.capabilities.queue);
        assert_eq!(
            app.gateway.bucket.url_for("k"),
            "https://paint-uploads.r2.cloudflarestorage.com/k"
        );
        assert!(app.gateway.dispatcher_url.contains(&app.config.server.dispatcher_port.to_string()));
    }

    #[tokio::test]
    async fn overrides_flow_into_the_wired_states() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_api_key: Some("sk-test".to_string()),
                dispatcher_url: Some("http://dispatcher.internal:8787".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("bootstrap");

        assert!(app.dispatcher.capabilities.llm);
        assert_eq!(app.gateway.dispatcher_url, "http://dispatcher.internal:8787");
    }
}
