//! Test utilities with lazy testcontainers support
//!
//! The Postgres container is started on first use and shared by every test in
//! the binary. Tests that need it are skipped when no Docker daemon is
//! reachable.

pub mod containers {
    use sqlx::PgPool;
    use testcontainers::{runners::AsyncRunner, ContainerAsync};
    use testcontainers_modules::postgres::Postgres;
    use tokio::sync::OnceCell;

    use crate::db::run_migrations;

    struct SharedPostgres {
        _container: ContainerAsync<Postgres>,
        url: String,
    }

    static POSTGRES: OnceCell<Option<SharedPostgres>> = OnceCell::const_new();

    async fn start_postgres() -> Option<SharedPostgres> {
        let container = match Postgres::default()
            .with_user("codeguard")
            .with_password("codeguard_test")
            .with_db_name("codeguard_test")
            .start()
            .await
        {
            Ok(container) => container,
            Err(e) => {
                eprintln!("skipping Postgres-backed tests: {e}");
                return None;
            }
        };

        let host = container.get_host().await.ok()?;
        let port = container.get_host_port_ipv4(5432).await.ok()?;
        let url = format!(
            "postgres://codeguard:codeguard_test@{}:{}/codeguard_test",
            host, port
        );

        Some(SharedPostgres {
            _container: container,
            url,
        })
    }

    /// Connection URL of the shared container, `None` without Docker
    pub async fn postgres_url() -> Option<String> {
        POSTGRES
            .get_or_init(start_postgres)
            .await
            .as_ref()
            .map(|pg| pg.url.clone())
    }

    /// Fresh pool on the shared container with migrations applied
    pub async fn migrated_pool() -> Option<PgPool> {
        let url = postgres_url().await?;
        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        Some(pool)
    }
}
