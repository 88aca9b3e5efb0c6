use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection as SeaOrmDatabaseConnection,
    DatabaseBackend, DbErr, Statement,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// 预热时执行的探活查询次数
const WARM_UP_ROUNDS: u32 = 3;

/// 画廊数据库共享连接
pub type DatabaseConnection = Arc<SeaOrmDatabaseConnection>;

/// 建立 MySQL 连接池并预热
///
/// 画廊的列表与搜索回表都是短查询，连接池按配置的上下限伸缩；
/// 连接存活期由配置控制，默认不超过 MySQL 的 wait_timeout
pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(&config.url);

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .max_lifetime(Duration::from_secs(config.max_lifetime))
        .sqlx_logging(false);

    info!(
        "画廊数据库连接池: 连接数 {}~{}, 连接最长存活 {}s",
        config.min_connections, config.max_connections, config.max_lifetime
    );

    let db = Database::connect(opt).await?;
    let connection = Arc::new(db);

    match warm_up(&connection).await {
        Ok(_) => info!("数据库连接池预热完成"),
        Err(e) => tracing::warn!("⚠️  数据库连接池预热失败，首批请求可能变慢: {}", e),
    }

    Ok(connection)
}

/// 预热连接池，提前建立最小连接数对应的物理连接
async fn warm_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Statement::from_string(DatabaseBackend::MySql, "SELECT 1".to_owned());

    for round in 1..=WARM_UP_ROUNDS {
        db.execute(stmt.clone()).await.map_err(|e| {
            tracing::warn!("预热查询第 {} 轮失败: {}", round, e);
            e
        })?;
        tracing::debug!("预热查询第 {} 轮完成", round);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::MockDatabase;

    #[tokio::test]
    async fn warm_up_runs_all_probe_rounds() {
        let exec = sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let db: DatabaseConnection = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([exec.clone(), exec.clone(), exec])
                .into_connection(),
        );

        assert!(warm_up(&db).await.is_ok());
    }
}
