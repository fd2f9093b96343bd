use folio_core_contact_impl::ContactFeatureServiceImpl;
use folio_core_health_impl::HealthFeatureServiceImpl;
use folio_persistence_postgres::{contact::PostgresContactRepository, PostgresDatabase};
use folio_shared_impl::time::TimeServiceImpl;

// Persistence
pub type Database = PostgresDatabase;

// Repositories
pub type ContactRepo = PostgresContactRepository;

// Shared
pub type Time = TimeServiceImpl;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Time, Database, ContactRepo>;
pub type HealthFeature = HealthFeatureServiceImpl<Time, Database>;

// API
pub type RestServer = folio_api_rest::RestServer<HealthFeature, ContactFeature>;
