//! Template variable resolution.
//!
//! Element text, barcode values and QR values may contain `${...}`
//! placeholders that are substituted from a [`Product`] record at print
//! time. Token names match case-insensitively; unknown tokens are left
//! literal so a template saved by a newer version still renders
//! something visible.
//!
//! Price formatting follows pt-BR conventions (comma decimal separator,
//! `"R$ "` prefix by default).

use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Price rendering mode for `${preco}` and derived variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFormat {
    /// Two decimals, comma separator: `12,50`.
    #[default]
    Decimal,
    /// Floor to whole units: `12`.
    Integer,
}

fn default_price_prefix() -> String {
    "R$ ".to_string()
}

fn default_max_name_length() -> usize {
    20
}

fn default_installments() -> u32 {
    3
}

/// Print-time formatting options for variable resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptions {
    /// Prefix for formatted prices. Default: `"R$ "`.
    #[serde(default = "default_price_prefix")]
    pub price_prefix: String,
    #[serde(default)]
    pub price_format: PriceFormat,
    /// Truncate `${nome}` to `max_name_length` characters with a trailing `...`.
    #[serde(default)]
    pub truncate_names: bool,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Installment count for `${preco_parcelado}` / `${preco_cheio_parcelado}`.
    #[serde(default = "default_installments")]
    pub installments: u32,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            price_prefix: default_price_prefix(),
            price_format: PriceFormat::Decimal,
            truncate_names: false,
            max_name_length: default_max_name_length(),
            installments: default_installments(),
        }
    }
}

/// Resolve all `${...}` tokens in `template` against a product.
///
/// Pure function: unknown tokens and unterminated `${` sequences are kept
/// verbatim. Absent product fields resolve to an empty string, never to a
/// literal `"undefined"`.
pub fn resolve(template: &str, product: &Product, opts: &PrintOptions) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let token = &after[..end];
                match lookup(&token.to_lowercase(), product, opts) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                // No closing brace: keep the tail as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve, falling back to the original template when the result is all
/// whitespace (keeps an element visible when a variable is unknown or the
/// product field is empty).
pub fn resolve_or_keep(template: &str, product: &Product, opts: &PrintOptions) -> String {
    let resolved = resolve(template, product, opts);
    if resolved.trim().is_empty() && !template.trim().is_empty() {
        template.to_string()
    } else {
        resolved
    }
}

fn lookup(token: &str, product: &Product, opts: &PrintOptions) -> Option<String> {
    match token {
        "nome" => Some(formatted_name(product, opts)),
        "preco" => Some(format!(
            "{}{}",
            opts.price_prefix,
            format_amount(product.price, opts.price_format)
        )),
        "codigo" => Some(product.code.clone()),
        "barcode" => Some(product.barcode.clone()),
        "categoria" => Some(product.category.clone()),
        "descricao" => Some(product.description.clone()),
        "quantidade" => Some(product.quantity.to_string()),
        "preco_mascarado" => Some(masked_price(product)),
        "preco_parcelado" => Some(installment_price(product, opts)),
        "preco_cheio_parcelado" => Some(format!(
            "{}{} ou {}",
            opts.price_prefix,
            format_amount(product.price, opts.price_format),
            installment_price(product, opts)
        )),
        "nome_abreviado" => Some(abbreviated_name(&product.name)),
        _ => None,
    }
}

fn formatted_name(product: &Product, opts: &PrintOptions) -> String {
    if opts.truncate_names && product.name.chars().count() > opts.max_name_length {
        let truncated: String = product.name.chars().take(opts.max_name_length).collect();
        format!("{}...", truncated)
    } else {
        product.name.clone()
    }
}

/// Format a monetary amount without prefix: `12,50` or `12`.
fn format_amount(value: f64, format: PriceFormat) -> String {
    match format {
        PriceFormat::Decimal => format!("{:.2}", value).replace('.', ","),
        PriceFormat::Integer => format!("{}", value.floor() as i64),
    }
}

/// `preco_mascarado`: first 2 letters of the name uppercased + `"00"` +
/// the 2-digit cents of the price. Used for internal cost tagging.
fn masked_price(product: &Product) -> String {
    let initials: String = product
        .name
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(2)
        .collect::<String>()
        .to_uppercase();
    let cents = (product.price * 100.0).round() as i64 % 100;
    format!("{}00{:02}", initials, cents)
}

/// `preco_parcelado`: `"3x R$ 10,00"` for a 30.00 price at 3 installments.
fn installment_price(product: &Product, opts: &PrintOptions) -> String {
    let n = opts.installments.max(1);
    let per = product.price / n as f64;
    format!(
        "{}x {}{}",
        n,
        opts.price_prefix,
        format_amount(per, opts.price_format)
    )
}

/// `nome_abreviado`: first 4 characters of each whitespace-delimited word.
fn abbreviated_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.chars().take(4).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
