//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use talent_match_core::engine::{EngineConfig, EvaluationEngine, MatchAggregator, QueryService};
use talent_match_core::store::EvaluationStore;

use crate::auth::JwtConfig;
use crate::config::ServerConfig;
use crate::repository::{
    ChallengeRepository, CompanyRepository, ResponseRepository, SeaOrmChallengeRepository,
    SeaOrmCompanyRepository, SeaOrmEvaluationStore, SeaOrmResponseRepository,
    SeaOrmUserRepository, UserRepository,
};

/// Repositories, engine services and identity settings shared by all handlers.
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub challenges: Arc<dyn ChallengeRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub aggregator: Arc<MatchAggregator>,
    pub evaluations: EvaluationEngine,
    pub queries: QueryService,
    pub jwt: JwtConfig,
    pub allow_admin_registration: bool,
    /// Bound on every repository call made directly by a handler.
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &ServerConfig) -> anyhow::Result<Self> {
        let engine_config: EngineConfig = config.engine_config();
        let store: Arc<dyn EvaluationStore> = Arc::new(SeaOrmEvaluationStore::new(db.clone()));
        let aggregator = Arc::new(MatchAggregator::new(store.clone(), &engine_config));

        Ok(Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            companies: Arc::new(SeaOrmCompanyRepository::new(db.clone())),
            challenges: Arc::new(SeaOrmChallengeRepository::new(db.clone())),
            responses: Arc::new(SeaOrmResponseRepository::new(db)),
            evaluations: EvaluationEngine::new(store.clone(), aggregator.clone(), &engine_config),
            queries: QueryService::new(store, aggregator.clone(), &engine_config),
            aggregator,
            jwt: JwtConfig {
                secret: config.jwt_secret()?.to_string(),
                access_token_expiry_mins: config.auth.access_token_expiry_mins,
            },
            allow_admin_registration: config.auth.allow_admin_registration,
            store_timeout: engine_config.store_timeout,
        })
    }
}
