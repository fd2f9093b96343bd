use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::ContactFeatureServiceImpl;
use folio_core_health_impl::{HealthFeatureConfig, HealthFeatureServiceImpl};
use folio_persistence_postgres::contact::PostgresContactRepository;
use folio_shared_impl::time::TimeServiceImpl;

use types::{Database, RestServer};

pub mod types;

/// Explicit wiring of the service graph. The database handle is a pooled
/// client and cheap to clone into every service that needs it.
pub fn build_rest_server(config: &Config, database: Database) -> RestServer {
    let time = TimeServiceImpl;

    let health = HealthFeatureServiceImpl::new(
        time,
        database.clone(),
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    let contact = ContactFeatureServiceImpl::new(time, database, PostgresContactRepository);

    RestServer::new(
        health,
        contact,
        RestServerConfig {
            host: config.http.host,
            port: config.http.port,
            debug_errors: config.http.debug_errors,
        },
    )
}
