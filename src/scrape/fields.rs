//! 字段级解析: 把页面上的原始文本片段转成类型化的值.
//!
//! 所有函数对残缺输入都不报错, 只退化到文档约定的默认值
//! (数值 0.0, 标识 "N/A", 可选字段 None).

use crate::models::SENTINELA_DESCONHECIDO;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

static RE_DIGITOS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static RE_NUMERO_NOTA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Número:\s*(\d+)").unwrap());
static RE_DATA_EMISSAO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Emissão:\s*(\d{2}/\d{2}/\d{4}\s\d{2}:\d{2}:\d{2})").unwrap());

/// 解析带标签的数值字段, 如 "Qtd.: 2,000" 或 "Vl. Unit.: 10,50".
/// 取最后一个冒号之后的部分, 逗号小数点换成英文句点; 解析失败返回 0.0
pub fn parse_valor(raw: &str) -> f64 {
    let sem_rotulo = raw.rsplit(':').next().unwrap_or(raw);
    sem_rotulo.replace(',', ".").trim().parse().unwrap_or(0.0)
}

/// 解析计量单位字段, 如 "UN: KG"; 只去标签和空白
pub fn parse_unidade(raw: &str) -> String {
    raw.rsplit(':').next().unwrap_or(raw).trim().to_string()
}

/// 从混合字段里提取第一段连续数字作为商品编码 (可能含换行);
/// 没有数字时返回 "N/A"
pub fn parse_codigo(raw: &str) -> String {
    let plano = raw.replace('\n', "");
    RE_DIGITOS
        .find(&plano)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| SENTINELA_DESCONHECIDO.to_string())
}

/// 从自由文本中匹配 "Número: <digits>"
pub fn parse_numero_nota(texto: &str) -> Option<String> {
    RE_NUMERO_NOTA
        .captures(texto)
        .map(|c| c[1].to_string())
}

/// 从自由文本中匹配 "Emissão: DD/MM/YYYY HH:MM:SS" 并解析成时间戳
pub fn parse_data_emissao(texto: &str) -> Option<NaiveDateTime> {
    let captura = RE_DATA_EMISSAO.captures(texto)?;
    NaiveDateTime::parse_from_str(&captura[1], "%d/%m/%Y %H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parse_valor_with_label_and_comma() {
        assert_eq!(parse_valor("Quantidade: 3,500"), 3.5);
        assert_eq!(parse_valor("Qtd.: 2,000"), 2.0);
        assert_eq!(parse_valor("Vl. Unit.:   10,50"), 10.5);
    }

    #[test]
    fn parse_valor_without_label() {
        assert_eq!(parse_valor("21,00"), 21.0);
    }

    #[test]
    fn parse_valor_malformed_defaults_to_zero() {
        assert_eq!(parse_valor(""), 0.0);
        assert_eq!(parse_valor("Quantidade:"), 0.0);
        assert_eq!(parse_valor("abc"), 0.0);
    }

    #[test]
    fn parse_unidade_strips_label() {
        assert_eq!(parse_unidade("UN: KG"), "KG");
        assert_eq!(parse_unidade("  UN  "), "UN");
        assert_eq!(parse_unidade(""), "");
    }

    #[test]
    fn parse_codigo_first_digit_run() {
        assert_eq!(parse_codigo("(Código: 123)"), "123");
        assert_eq!(parse_codigo("(Código:\n 78901\n)"), "78901");
        assert_eq!(parse_codigo("12a34"), "12");
    }

    #[test]
    fn parse_codigo_without_digits_is_sentinel() {
        assert_eq!(parse_codigo(""), "N/A");
        assert_eq!(parse_codigo("sem código"), "N/A");
    }

    #[test]
    fn parse_numero_nota_labeled_token() {
        assert_eq!(
            parse_numero_nota("Número: 4567 Série: 1"),
            Some("4567".to_string())
        );
        assert_eq!(parse_numero_nota("Série: 1"), None);
    }

    #[test]
    fn parse_data_emissao_fixed_pattern() {
        let esperado = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(10, 20, 30)
            .unwrap();
        assert_eq!(
            parse_data_emissao("Emissão: 01/02/2024 10:20:30"),
            Some(esperado)
        );
    }

    #[test]
    fn parse_data_emissao_no_match_is_none() {
        assert_eq!(parse_data_emissao("Emissão: ontem"), None);
        assert_eq!(parse_data_emissao(""), None);
    }
}
