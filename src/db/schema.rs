use sqlx::PgPool;
use tracing::info;

/// 启动时建表 (不存在才创建); 外键级联删除由数据库负责
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Verifying database schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notas_processadas (
            id SERIAL PRIMARY KEY,
            url TEXT NOT NULL UNIQUE,
            nome_estabelecimento TEXT,
            numero_nota TEXT,
            data_emissao_nota TIMESTAMP,
            data_processamento TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS historico_precos (
            id SERIAL PRIMARY KEY,
            nota_id INTEGER REFERENCES notas_processadas(id) ON DELETE CASCADE,
            produto TEXT,
            codigo TEXT,
            quantidade DOUBLE PRECISION,
            unidade TEXT,
            valor_unitario DOUBLE PRECISION,
            valor_total DOUBLE PRECISION,
            data_coleta TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema verified");
    Ok(())
}
