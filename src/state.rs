use std::sync::Arc;

use crate::{
    auth::{jwt::JwtKeys, repo::PgCredentialStore, AuthService, Authenticator},
    clock::{Clock, SystemClock},
    config::AppConfig,
    db,
    memory::MemoryStore,
    tasks::{repo::PgTaskStore, TaskManager, TaskService},
};

/// Shared per-process state. Both services are behind their capability
/// traits so handlers never see the concrete stores.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: Arc<dyn Authenticator>,
    pub tasks: Arc<dyn TaskManager>,
}

impl AppState {
    /// Postgres-backed wiring used by the binary.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let keys = JwtKeys::from(&config.jwt);

        let auth = Arc::new(AuthService::new(
            Arc::new(PgCredentialStore::new(pool.clone())),
            keys,
            clock.clone(),
        ));
        let tasks = Arc::new(TaskService::new(Arc::new(PgTaskStore::new(pool)), clock));

        Ok(Self::from_parts(Arc::new(config), auth, tasks))
    }

    /// Wiring with both stores held in memory; nothing survives a restart.
    pub fn in_memory(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let keys = JwtKeys::from(&config.jwt);
        let auth = Arc::new(AuthService::new(store.clone(), keys, clock.clone()));
        let tasks = Arc::new(TaskService::new(store, clock));
        Self::from_parts(Arc::new(config), auth, tasks)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        auth: Arc<dyn Authenticator>,
        tasks: Arc<dyn TaskManager>,
    ) -> Self {
        Self {
            config,
            auth,
            tasks,
        }
    }
}
