use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 无法解析的产品名/编码使用的占位标记
pub const SENTINELA_DESCONHECIDO: &str = "N/A";

/// 一行商品明细 (historico_precos)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemNota {
    pub produto: String,
    pub codigo: String,
    pub quantidade: f64,
    pub unidade: String,
    pub valor_unitario: f64,
    pub valor_total: f64,
}

/// 页面提取的中间结果: 明细行 + 票据号 + 开具时间
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotaExtraida {
    pub itens: Vec<ItemNota>,
    pub numero_nota: Option<String>,
    pub data_emissao: Option<NaiveDateTime>,
}

/// 持久化完成后的结果
#[derive(Debug, Clone, Serialize)]
pub struct NotaProcessada {
    pub nota_id: i32,
    pub itens_salvos: usize,
    pub numero_nota: Option<String>,
}
