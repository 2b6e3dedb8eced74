//! 文档提取: 在渲染后的 HTML 中定位明细表和票据信息块.
//!
//! 结构缺失从不报错: 没有 tabResult 表 => 空明细; 没有 infos 块 =>
//! 票据号/开具时间为 None. 空明细是否算失败由调用方决定.

use crate::models::{ItemNota, NotaExtraida, SENTINELA_DESCONHECIDO};
use crate::scrape::fields;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SEL_TABELA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#tabResult").unwrap());
static SEL_LINHA_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr[id^="Item"]"#).unwrap());
static SEL_PRODUTO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.txtTit").unwrap());
static SEL_CODIGO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.RCod").unwrap());
static SEL_QTD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.Rqtd").unwrap());
static SEL_UNIDADE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.RUN").unwrap());
static SEL_VL_UNIT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.RvlUnit").unwrap());
static SEL_VL_TOTAL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.valor").unwrap());
static SEL_INFOS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#infos").unwrap());
static SEL_INFOS_GERAIS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.ui-li-static").unwrap());

/// 提取整张票据: 明细行 (保持文档顺序) + 票据号 + 开具时间
pub fn extract_nota(html: &str) -> NotaExtraida {
    let documento = Html::parse_document(html);

    let itens = documento
        .select(&SEL_TABELA)
        .next()
        .map(extract_itens)
        .unwrap_or_default();

    let (numero_nota, data_emissao) = documento
        .select(&SEL_INFOS)
        .next()
        .and_then(|infos| infos.select(&SEL_INFOS_GERAIS).next())
        .map(|li| {
            let texto = texto_plano(li);
            (
                fields::parse_numero_nota(&texto),
                fields::parse_data_emissao(&texto),
            )
        })
        .unwrap_or((None, None));

    NotaExtraida {
        itens,
        numero_nota,
        data_emissao,
    }
}

fn extract_itens(tabela: ElementRef<'_>) -> Vec<ItemNota> {
    tabela
        .select(&SEL_LINHA_ITEM)
        .map(|linha| ItemNota {
            produto: texto_de(linha, &SEL_PRODUTO)
                .unwrap_or_else(|| SENTINELA_DESCONHECIDO.to_string()),
            codigo: fields::parse_codigo(&texto_de(linha, &SEL_CODIGO).unwrap_or_default()),
            quantidade: fields::parse_valor(&texto_de(linha, &SEL_QTD).unwrap_or_default()),
            unidade: fields::parse_unidade(&texto_de(linha, &SEL_UNIDADE).unwrap_or_default()),
            valor_unitario: fields::parse_valor(&texto_de(linha, &SEL_VL_UNIT).unwrap_or_default()),
            valor_total: fields::parse_valor(&texto_de(linha, &SEL_VL_TOTAL).unwrap_or_default()),
        })
        .collect()
}

/// 行内第一个匹配元素的文本 (去掉首尾空白)
fn texto_de(linha: ElementRef<'_>, seletor: &Selector) -> Option<String> {
    linha
        .select(seletor)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

/// 展平元素文本, 片段之间用单个空格连接 (等价 get_text(separator=' '))
fn texto_plano(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PAGINA_COMPLETA: &str = r#"
        <div data-role="content" class="ui-content">
          <table id="tabResult">
            <tr id="Item + 1">
              <td>
                <span class="txtTit">Arroz 5kg</span>
                <span class="RCod">(Código: 123 )</span>
                <span class="Rqtd"><strong>Qtd.:</strong>2,000</span>
                <span class="RUN"><strong>UN:</strong> UN</span>
                <span class="RvlUnit"><strong>Vl. Unit.:</strong> 10,50</span>
              </td>
              <td><span class="valor">21,00</span></td>
            </tr>
            <tr id="Item + 2">
              <td>
                <span class="txtTit">Feijao 1kg</span>
                <span class="RCod">(Código:
                456)</span>
                <span class="Rqtd"><strong>Qtd.:</strong>1,000</span>
                <span class="RUN"><strong>UN:</strong> UN</span>
                <span class="RvlUnit"><strong>Vl. Unit.:</strong> 8,90</span>
              </td>
              <td><span class="valor">8,90</span></td>
            </tr>
          </table>
          <div id="infos">
            <ul>
              <li class="ui-li-static">
                <strong>Número:</strong> 4567
                <strong>Série:</strong> 1
                <strong>Emissão:</strong> 15/03/2023 09:00:00
              </li>
            </ul>
          </div>
        </div>
    "#;

    #[test]
    fn extracts_items_in_document_order() {
        let nota = extract_nota(PAGINA_COMPLETA);
        assert_eq!(nota.itens.len(), 2);

        let primeiro = &nota.itens[0];
        assert_eq!(primeiro.produto, "Arroz 5kg");
        assert_eq!(primeiro.codigo, "123");
        assert_eq!(primeiro.quantidade, 2.0);
        assert_eq!(primeiro.unidade, "UN");
        assert_eq!(primeiro.valor_unitario, 10.5);
        assert_eq!(primeiro.valor_total, 21.0);

        // 第二行编码含换行, 仍取第一段数字
        assert_eq!(nota.itens[1].produto, "Feijao 1kg");
        assert_eq!(nota.itens[1].codigo, "456");
    }

    #[test]
    fn extracts_metadata_from_infos_block() {
        let nota = extract_nota(PAGINA_COMPLETA);
        assert_eq!(nota.numero_nota.as_deref(), Some("4567"));
        let esperado = NaiveDate::from_ymd_opt(2023, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(nota.data_emissao, Some(esperado));
    }

    #[test]
    fn missing_table_yields_empty_items() {
        let html = r#"<div class="ui-content"><p>sem tabela</p></div>"#;
        let nota = extract_nota(html);
        assert!(nota.itens.is_empty());
    }

    #[test]
    fn table_without_item_rows_yields_empty_items() {
        let html = r#"
            <table id="tabResult">
              <tr id="Total"><td>Total: 0,00</td></tr>
            </table>
        "#;
        let nota = extract_nota(html);
        assert!(nota.itens.is_empty());
    }

    #[test]
    fn missing_infos_block_yields_absent_metadata() {
        let html = r#"
            <table id="tabResult">
              <tr id="Item + 1"><td><span class="txtTit">Leite</span></td></tr>
            </table>
        "#;
        let nota = extract_nota(html);
        assert_eq!(nota.itens.len(), 1);
        assert!(nota.numero_nota.is_none());
        assert!(nota.data_emissao.is_none());
    }

    #[test]
    fn row_with_missing_fields_degrades_to_defaults() {
        let html = r#"
            <table id="tabResult">
              <tr id="Item + 1"><td><span class="RUN">UN: KG</span></td></tr>
            </table>
        "#;
        let nota = extract_nota(html);
        let item = &nota.itens[0];
        assert_eq!(item.produto, "N/A");
        assert_eq!(item.codigo, "N/A");
        assert_eq!(item.quantidade, 0.0);
        assert_eq!(item.unidade, "KG");
        assert_eq!(item.valor_unitario, 0.0);
        assert_eq!(item.valor_total, 0.0);
    }
}
