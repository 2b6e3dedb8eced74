use crate::models::ItemNota;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, Transaction};

/// 按 URL 查询已处理的票据 (去重预检)
pub async fn find_nota_id(pool: &PgPool, url: &str) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        SELECT id FROM notas_processadas
        WHERE url = $1
        "#,
    )
    .bind(url)
    .fetch_optional(pool)
    .await
}

/// 在事务内插入票据头并返回新 id
pub async fn insert_nota(
    tx: &mut Transaction<'_, Postgres>,
    url: &str,
    nome_estabelecimento: &str,
    numero_nota: Option<&str>,
    data_emissao: Option<NaiveDateTime>,
    data_processamento: NaiveDateTime,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO notas_processadas
            (url, nome_estabelecimento, numero_nota, data_emissao_nota, data_processamento)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(url)
    .bind(nome_estabelecimento)
    .bind(numero_nota)
    .bind(data_emissao)
    .bind(data_processamento)
    .fetch_one(&mut **tx)
    .await
}

/// 在事务内批量插入明细行, 返回写入行数
pub async fn insert_itens(
    tx: &mut Transaction<'_, Postgres>,
    nota_id: i32,
    itens: &[ItemNota],
    data_coleta: NaiveDateTime,
) -> Result<u64, sqlx::Error> {
    if itens.is_empty() {
        return Ok(0);
    }

    let mut query_builder = sqlx::QueryBuilder::new(
        "INSERT INTO historico_precos (
            nota_id, produto, codigo, quantidade, unidade,
            valor_unitario, valor_total, data_coleta
        ) ",
    );

    query_builder.push_values(itens, |mut b, item| {
        b.push_bind(nota_id)
            .push_bind(&item.produto)
            .push_bind(&item.codigo)
            .push_bind(item.quantidade)
            .push_bind(&item.unidade)
            .push_bind(item.valor_unitario)
            .push_bind(item.valor_total)
            .push_bind(data_coleta);
    });

    let result = query_builder.build().execute(&mut **tx).await?;
    Ok(result.rows_affected())
}
