//! Agreement PDF rendering for the investment ledger.
//!
//! A single A4 page: centered bold title banner, then one line per field
//! (investor, vendor, amount, return percent, terms, date). Rendered once per
//! investment, immediately after the row obtains its durable id.

use chrono::{DateTime, FixedOffset};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while rendering an agreement document.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to render agreement PDF: {0}")]
    Render(String),
}

/// The fields printed on an agreement page.
#[derive(Debug, Clone)]
pub struct AgreementData<'a> {
    pub investor_name: &'a str,
    pub vendor_name: &'a str,
    pub amount: Decimal,
    pub return_percent: Decimal,
    pub terms: &'a str,
    pub date_invested: DateTime<FixedOffset>,
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 9.0;

/// Renders a one-page agreement document and returns the PDF bytes.
pub fn render_agreement_pdf(data: &AgreementData<'_>) -> Result<Vec<u8>, PdfError> {
    let (doc, page, layer) = PdfDocument::new(
        "Investment Agreement",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Render(e.to_string()))?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Render(e.to_string()))?;

    // Title banner, roughly centered for the fixed banner text.
    layer.use_text(
        "Investment Agreement",
        16.0,
        Mm(PAGE_WIDTH_MM / 2.0 - 35.0),
        Mm(PAGE_HEIGHT_MM - 35.0),
        &bold,
    );

    let lines = [
        format!("Investor: {}", data.investor_name),
        format!("Vendor: {}", data.vendor_name),
        format!("Amount Invested: {}", data.amount),
        format!("Return: {}%", data.return_percent),
        format!("Terms: {}", data.terms),
        format!("Date: {}", data.date_invested.format("%d-%m-%Y")),
    ];

    let mut y = PAGE_HEIGHT_MM - 55.0;
    for line in &lines {
        layer.use_text(latinize(line), 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &regular);
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes().map_err(|e| PdfError::Render(e.to_string()))
}

/// Maps text onto what the builtin Helvetica font can encode. The stored
/// terms keep the rupee sign; only the rendered page transliterates it.
fn latinize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{20b9}' => out.push_str("Rs. "),
            ch if (ch as u32) < 0x100 => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_render_agreement_pdf_produces_pdf() {
        let data = AgreementData {
            investor_name: "bob",
            vendor_name: "alice",
            amount: Decimal::from(10000),
            return_percent: Decimal::from(5),
            terms: "Minimum investment \u{20b9}5000, guaranteed return 5% for 1 year",
            date_invested: Utc::now().into(),
        };

        let bytes = render_agreement_pdf(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_latinize_transliterates_rupee_sign() {
        assert_eq!(latinize("\u{20b9}5000"), "Rs. 5000");
        assert_eq!(latinize("plain ascii"), "plain ascii");
        assert_eq!(latinize("caf\u{e9} \u{2603}"), "caf\u{e9} ?");
    }
}
