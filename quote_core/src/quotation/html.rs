//! HTML quotation: one self-contained page, inline CSS, no external assets.

use super::{money, Quotation, RodSummary};

const STYLE: &str = r#"
@page { size: A4; margin: 0.5in; }
@media print {
  body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }
  .no-print { display: none; }
}
body { font-family: Arial, sans-serif; font-size: 12px; line-height: 1.4; color: #333;
       max-width: 210mm; margin: 0 auto; padding: 20px; }
.header { text-align: center; margin-bottom: 24px; border-bottom: 3px solid #333; padding-bottom: 12px; }
.company-name { font-size: 26px; font-weight: bold; color: #2c3e50; letter-spacing: 2px; }
.company-details { font-size: 11px; color: #666; }
.quotation-title { font-size: 20px; font-weight: bold; text-align: center; margin: 16px 0;
                   color: #2c3e50; background: #f8f9fa; padding: 8px; border-radius: 5px; }
.customer-info { background: #f8f9fa; padding: 15px; border-radius: 8px; margin-bottom: 20px;
                 border: 1px solid #dee2e6; }
.customer-row { display: flex; justify-content: space-between; margin-bottom: 8px; }
.customer-row:last-child { margin-bottom: 0; }
.table-container { margin-bottom: 20px; border: 1px solid #dee2e6; border-radius: 8px; overflow: hidden; }
table { width: 100%; border-collapse: collapse; font-size: 10px; }
th { background: #343a40; color: white; padding: 10px 5px; text-align: center; border: 1px solid #dee2e6; }
td { padding: 8px 5px; text-align: center; border: 1px solid #dee2e6; }
tbody tr:nth-child(even) { background: #f8f9fa; }
.rod-block { margin-bottom: 20px; background: #f8f9fa; padding: 15px; border-radius: 8px;
             border: 1px solid #dee2e6; }
.rod-block h3 { font-size: 16px; margin: 0 0 15px; color: #2c3e50; text-align: center; }
.rod-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; }
.rod-card { background: white; padding: 12px; border-radius: 6px; border: 1px solid #dee2e6; text-align: center; }
.rod-card .label { font-size: 12px; color: #666; margin-bottom: 5px; }
.rod-card .value { font-size: 18px; font-weight: bold; color: #2c3e50; }
.rod-card .note { font-size: 10px; color: #888; }
.summary-section { display: flex; justify-content: flex-end; margin-bottom: 30px; }
.summary-box { background: #e3f2fd; border: 2px solid #2196f3; border-radius: 8px; padding: 20px; min-width: 300px; }
.summary-title { font-size: 14px; font-weight: bold; text-align: center; margin-bottom: 15px; color: #1976d2; }
.summary-row { display: flex; justify-content: space-between; padding: 5px 0; }
.summary-rod { border-top: 1px solid #dee2e6; margin-top: 8px; padding-top: 8px; }
.summary-total { border-top: 2px solid #1976d2; margin-top: 10px; padding-top: 10px; font-weight: bold; font-size: 14px; }
.print-button { position: fixed; top: 20px; right: 20px; padding: 10px 20px; background: #2196f3; color: white;
                border: none; border-radius: 5px; cursor: pointer; font-size: 14px; }
.print-button:hover { background: #1976d2; }
"#;

/// Render a quotation as a printable HTML document.
///
/// Operator-entered text is escaped. The print button calls the browser's
/// print dialog and is hidden when printing.
pub fn render_html(quote: &Quotation) -> String {
    let mut out = String::with_capacity(8 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    out.push_str(&format!(
        "<title>{} {}</title>\n",
        escape_html(&quote.options.business_name),
        escape_html(&quote.quote_number)
    ));
    out.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    out.push_str(
        "<button class=\"print-button no-print\" onclick=\"window.print()\">Print / Save as PDF</button>\n",
    );

    out.push_str(&format!(
        "<div class=\"header\">\n<div class=\"company-name\">{}</div>\n<div class=\"company-details\">{}</div>\n</div>\n",
        escape_html(&quote.options.business_name),
        escape_html(&quote.options.business_details)
    ));
    out.push_str(&format!(
        "<div class=\"quotation-title\">{}</div>\n",
        escape_html(&quote.options.title)
    ));

    out.push_str(&customer_block(quote));
    out.push_str(&line_items_table(quote));
    if let Some(rod) = &quote.rod {
        out.push_str(&rod_block(rod));
    }
    out.push_str(&summary_box(quote));

    out.push_str("</body>\n</html>\n");
    out
}

fn customer_block(quote: &Quotation) -> String {
    let rows = [
        ("Customer:", or_na(&quote.client_name), "Date:", quote.issue_date()),
        (
            "Project:",
            escape_html(&quote.project_title),
            "Quote #:",
            escape_html(&quote.quote_number),
        ),
        ("Phone:", or_na(&quote.phone_number), "Address:", or_na(&quote.address)),
    ];
    let rows: String = rows
        .iter()
        .map(|(left_label, left, right_label, right)| {
            format!(
                "<div class=\"customer-row\"><div><strong>{}</strong> {}</div><div><strong>{}</strong> {}</div></div>\n",
                left_label, left, right_label, right
            )
        })
        .collect();
    format!("<div class=\"customer-info\">\n{}</div>\n", rows)
}

fn line_items_table(quote: &Quotation) -> String {
    let currency = super::CURRENCY_SYMBOL;
    let mut headings: String = [
        ("S.No", 6),
        ("Room Label", 18),
        ("Width", 8),
        ("Height", 8),
        ("Pieces", 8),
        ("Meter", 8),
        ("Fabric Type", 10),
    ]
    .iter()
    .map(|(heading, width)| format!("<th style=\"width: {}%\">{}</th>", width, heading))
    .collect();
    headings.push_str(&format!(
        "<th style=\"width: 12%\">Cloth Price ({c})</th><th style=\"width: 12%\">Stitching Price ({c})</th><th style=\"width: 10%\">Total Price ({c})</th>",
        c = currency
    ));

    let rows: String = quote
        .line_items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}&quot;</td><td>{}&quot;</td><td>{}</td><td>{}m</td><td>{}</td><td>{}</td><td>{}</td><td><strong>{}</strong></td></tr>\n",
                item.index,
                escape_html(&item.room_label),
                item.width_inches,
                item.height_inches,
                item.pieces,
                escape_html(&item.total_meters),
                item.curtain_type,
                money(item.cloth_cost, 0),
                money(item.stitching_cost, 0),
                money(item.total_cost, 0)
            )
        })
        .collect();

    format!(
        "<div class=\"table-container\">\n<table>\n<thead>\n<tr>{}</tr>\n</thead>\n<tbody>\n{}</tbody>\n</table>\n</div>\n",
        headings, rows
    )
}

fn rod_block(rod: &RodSummary) -> String {
    let cards: String = [
        ("Total Coverage", format!("{:.1}&quot;", rod.total_width_inches), "Combined window width"),
        ("Rod Length Required", format!("{:.2} units", rod.rod_length), "Standard measurement"),
        ("Rate per Unit", money(rod.rate_per_length, 0), "Installation cost"),
    ]
    .iter()
    .map(|(label, value, note)| {
        format!(
            "<div class=\"rod-card\"><div class=\"label\">{}</div><div class=\"value\">{}</div><div class=\"note\">{}</div></div>\n",
            label, value, note
        )
    })
    .collect();
    format!(
        "<div class=\"rod-block\">\n<h3>Rod Installation Requirements</h3>\n<div class=\"rod-grid\">\n{}</div>\n</div>\n",
        cards
    )
}

fn summary_box(quote: &Quotation) -> String {
    let s = &quote.summary;
    let mut rows: String = [
        ("Cloth Total:", s.cloth_total),
        ("Stitching Total:", s.stitching_total),
        ("Curtain Sub-Total:", s.curtain_subtotal),
    ]
    .iter()
    .map(|(label, amount)| {
        format!(
            "<div class=\"summary-row\"><span>{}</span><span>{}</span></div>\n",
            label,
            money(*amount, 2)
        )
    })
    .collect();
    if quote.has_rod_cost() {
        rows.push_str(&format!(
            "<div class=\"summary-row summary-rod\"><span>Rod Installation:</span><span>{}</span></div>\n",
            money(s.rod_cost, 2)
        ));
    }
    rows.push_str(&format!(
        "<div class=\"summary-row summary-total\"><span>Grand Total:</span><span>{}</span></div>\n",
        money(s.grand_total, 2)
    ));
    format!(
        "<div class=\"summary-section\">\n<div class=\"summary-box\">\n<div class=\"summary-title\">QUOTATION SUMMARY</div>\n{}</div>\n</div>\n",
        rows
    )
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        escape_html(value)
    }
}

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::tests::{issued_at, sample_project};
    use crate::quotation::QuotationOptions;

    fn render(rod_rate: Option<f64>) -> String {
        let project = sample_project(rod_rate);
        let quote = Quotation::build(&project, &project.measurements, QuotationOptions::default(), issued_at());
        render_html(&quote)
    }

    #[test]
    fn test_document_is_self_contained() {
        let html = render(None);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("window.print()"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script src"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_line_item_rows() {
        let html = render(None);
        assert!(html.contains("<td>R1</td>"));
        assert!(html.contains("<td>30&quot;</td><td>60&quot;</td><td>2</td><td>3.85m</td><td>Eyelet</td>"));
        assert!(html.contains("<td>₹385</td><td>₹100</td><td><strong>₹485</strong></td>"));
        assert!(html.contains("<td>Rod Pocket</td>"));
        assert!(html.contains("<td>4.5</td>"));
    }

    #[test]
    fn test_rod_block_and_row() {
        let with_rate = render(Some(12.0));
        assert!(with_rate.contains("Rod Installation Requirements"));
        assert!(with_rate.contains("10.00 units"));
        assert!(with_rate.contains("120.0&quot;"));
        assert!(with_rate.contains("<span>Rod Installation:</span><span>₹120.00</span>"));

        // Rod length is still shown without a rate, but no cost row
        let without_rate = render(None);
        assert!(without_rate.contains("Rod Installation Requirements"));
        assert!(!without_rate.contains("Rod Installation:"));
    }

    #[test]
    fn test_no_rod_block_for_empty_quotation() {
        let project = sample_project(Some(12.0));
        let quote = Quotation::build(&project, &[], QuotationOptions::default(), issued_at());
        let html = render_html(&quote);
        assert!(!html.contains("Rod Installation"));
        assert!(html.contains("<span>Grand Total:</span><span>₹0.00</span>"));
    }

    #[test]
    fn test_header_fields() {
        let html = render(None);
        assert!(html.contains("<strong>Customer:</strong> A"));
        assert!(html.contains("<strong>Project:</strong> T"));
        assert!(html.contains("14/03/2025"));
        assert!(html.contains("<strong>Address:</strong> N/A"));
    }

    #[test]
    fn test_operator_text_is_escaped() {
        let mut project = sample_project(None);
        project.client_name = "<script>alert('x')</script>".to_string();
        project.measurements[0].room_label = "Kids & \"Guest\"".to_string();
        let quote = Quotation::build(&project, &project.measurements, QuotationOptions::default(), issued_at());
        let html = render_html(&quote);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Kids &amp; &quot;Guest&quot;"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape_html("plain"), "plain");
    }
}
