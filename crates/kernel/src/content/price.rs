//! Price data and markup for commerce items.

use vitrine_sdk::types::PriceInfo;

use crate::config::{CurrencyPosition, PriceFormat};
use crate::models::Item;

/// Formats commerce item prices according to the shop settings.
#[derive(Debug, Clone)]
pub struct PriceFormatter {
    format: PriceFormat,
}

impl PriceFormatter {
    pub fn new(format: PriceFormat) -> Self {
        Self { format }
    }

    /// Resolve price data from an item's `regular_price`, `sale_price` and
    /// `price` fields. Returns `None` when the item has no price at all.
    pub fn price_info(&self, item: &Item) -> Option<PriceInfo> {
        let regular = item.get_number("regular_price");
        let sale = item.get_number("sale_price");
        let plain = item.get_number("price");

        let on_sale = matches!((regular, sale), (Some(r), Some(s)) if s < r);
        let effective = if on_sale {
            sale
        } else {
            regular.or(plain).or(sale)
        }?;

        let price_html = match (on_sale, regular, sale) {
            (true, Some(r), Some(s)) => format!(
                "<span class=\"price\"><del aria-hidden=\"true\">{}</del> <ins>{}</ins></span>",
                self.amount_html(r),
                self.amount_html(s)
            ),
            _ => format!("<span class=\"price\">{}</span>", self.amount_html(effective)),
        };

        Some(PriceInfo {
            price: self.decimal(effective),
            regular_price: regular.map(|r| self.decimal(r)),
            sale_price: sale.map(|s| self.decimal(s)),
            on_sale,
            price_html,
        })
    }

    /// Plain decimal with the configured precision and no separators.
    fn decimal(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = usize::from(self.format.decimals))
    }

    /// Amount with currency symbol and separators, wrapped for styling.
    fn amount_html(&self, value: f64) -> String {
        let number = format_number(
            value,
            self.format.decimals,
            &self.format.decimal_separator,
            &self.format.thousand_separator,
        );
        let symbol = format!(
            "<span class=\"currency-symbol\">{}</span>",
            ammonia::clean_text(&self.format.symbol)
        );
        let amount = match self.format.position {
            CurrencyPosition::Left => format!("{symbol}{number}"),
            CurrencyPosition::Right => format!("{number}{symbol}"),
            CurrencyPosition::LeftSpace => format!("{symbol}&nbsp;{number}"),
            CurrencyPosition::RightSpace => format!("{number}&nbsp;{symbol}"),
        };
        format!("<span class=\"amount\">{amount}</span>")
    }
}

/// Format a number with fixed decimals and grouped thousands.
pub fn format_number(value: f64, decimals: u8, decimal_sep: &str, thousand_sep: &str) -> String {
    let fixed = format!("{:.prec$}", value.abs(), prec = usize::from(decimals));
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (fixed, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(thousand_sep);
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 && fixed_is_nonzero(&grouped, frac_part.as_deref()) {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}{decimal_sep}{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn fixed_is_nonzero(int_part: &str, frac_part: Option<&str>) -> bool {
    int_part.chars().chain(frac_part.unwrap_or("").chars()).any(|c| c.is_ascii_digit() && c != '0')
}
