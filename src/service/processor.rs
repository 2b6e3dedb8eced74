use crate::db::queries;
use crate::error::ProcessError;
use crate::models::NotaProcessada;
use crate::scrape::{extract_nota, PageFetcher};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

/// 票据处理服务: 去重 -> 抓取 -> 提取 -> 事务写入
pub struct NotaService {
    pool: PgPool,
    fetcher: Arc<dyn PageFetcher>,
}

impl NotaService {
    pub fn new(pool: PgPool, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { pool, fetcher }
    }

    /// 处理一张票据 URL; 头表行和全部明细行要么同时落库要么全不落
    pub async fn process_nota(
        &self,
        url: &str,
        nome_estabelecimento: &str,
    ) -> Result<NotaProcessada, ProcessError> {
        info!("Processing nota URL: {}", url);

        // 1. 去重预检 (同 URL 并发竞争由唯一约束兜底)
        if queries::find_nota_id(&self.pool, url).await?.is_some() {
            warn!("URL already processed: {}", url);
            return Err(ProcessError::DuplicateSubmission);
        }

        // 2. 抓取渲染后的页面并提取结构化数据
        let html = self.fetcher.fetch_content(url).await?;
        let nota = extract_nota(&html);
        if nota.itens.is_empty() {
            warn!("No line items extracted from URL: {}", url);
            return Err(ProcessError::ExtractionFailure);
        }
        info!(
            "Nota extracted: numero {:?}, emissao {:?}, {} itens",
            nota.numero_nota,
            nota.data_emissao,
            nota.itens.len()
        );

        // 3. 事务写入: 头表 + 明细; 任何一步出错时事务随 drop 回滚
        let agora = Utc::now().naive_utc();
        let mut tx = self.pool.begin().await?;

        let nota_id = queries::insert_nota(
            &mut tx,
            url,
            nome_estabelecimento,
            nota.numero_nota.as_deref(),
            nota.data_emissao,
            agora,
        )
        .await?;

        let salvos = queries::insert_itens(&mut tx, nota_id, &nota.itens, agora).await?;

        tx.commit().await?;
        info!("Nota {} persisted with {} itens", nota_id, salvos);

        Ok(NotaProcessada {
            nota_id,
            itens_salvos: salvos as usize,
            numero_nota: nota.numero_nota,
        })
    }
}
