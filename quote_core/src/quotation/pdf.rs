//! # PDF Quotation
//!
//! Compiles a quotation to PDF with Typst, for hosts that have no browser
//! print dialog.
//!
//! - The Typst template is an embedded string constant
//! - Data is injected by placeholder replacement before compilation
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use super::{money, Quotation, CURRENCY_SYMBOL};
use crate::errors::{QuoteError, QuoteResult};

/// Bundled fonts, parsed on first use
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
        .collect()
});

/// Single-file Typst world: the quotation source and the bundled fonts.
struct QuoteWorld {
    main: Source,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl QuoteWorld {
    fn new(source: String) -> Self {
        QuoteWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for QuoteWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

const QUOTE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 0.6in, bottom: 0.6in, left: 0.5in, right: 0.5in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt)[Quote \# {{QUOTE_NUMBER}}]],
      align(right)[#text(size: 8pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(size: 10pt)

#align(center)[
  #text(size: 20pt, weight: "bold")[{{BUSINESS_NAME}}]
  #v(2pt)
  #text(size: 9pt, fill: gray)[{{BUSINESS_DETAILS}}]
]
#line(length: 100%, stroke: 2pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f8f9fa"), inset: 8pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{{TITLE}}]
  ]
]

#block(width: 100%, fill: rgb("#f8f9fa"), stroke: 0.5pt + rgb("#dee2e6"), inset: 10pt, radius: 4pt)[
  #grid(
    columns: (1fr, 1fr),
    row-gutter: 6pt,
    [*Customer:* {{CLIENT}}], align(right)[*Date:* {{DATE}}],
    [*Project:* {{PROJECT}}], align(right)[*Quote \#:* {{QUOTE_NUMBER}}],
    [*Phone:* {{PHONE}}], align(right)[*Address:* {{ADDRESS}}],
  )
]

#v(8pt)

#table(
  columns: (auto, 1fr, auto, auto, auto, auto, auto, auto, auto, auto),
  inset: 5pt,
  stroke: 0.5pt + rgb("#dee2e6"),
  align: center + horizon,
  fill: (_, y) => if y == 0 { rgb("#343a40") } else if calc.even(y) { rgb("#f8f9fa") },
  table.header(
    ..([S.No], [Room Label], [Width (in)], [Height (in)], [Pieces], [Meter], [Fabric Type],
       [Cloth Price ({{CURRENCY}})], [Stitching Price ({{CURRENCY}})], [Total Price ({{CURRENCY}})])
      .map(h => text(fill: white, weight: "bold", size: 8pt, h))
  ),
{{ROWS}}
)

{{ROD_BLOCK}}

#v(8pt)
#align(right)[
  #block(width: 45%, fill: rgb("#e3f2fd"), stroke: 1.5pt + rgb("#2196f3"), inset: 12pt, radius: 4pt)[
    #align(center)[#text(weight: "bold", fill: rgb("#1976d2"))[QUOTATION SUMMARY]]
    #v(4pt)
    #grid(
      columns: (1fr, auto),
      row-gutter: 6pt,
{{SUMMARY_ROWS}}
    )
  ]
]
"##;

const ROD_TEMPLATE: &str = r##"
#block(width: 100%, fill: rgb("#f8f9fa"), stroke: 0.5pt + rgb("#dee2e6"), inset: 10pt, radius: 4pt)[
  #align(center)[#text(size: 12pt, weight: "bold")[Rod Installation Requirements]]
  #v(4pt)
  #grid(
    columns: (1fr, 1fr, 1fr),
    gutter: 8pt,
    align(center)[Total Coverage \ #text(size: 14pt, weight: "bold")[{{ROD_WIDTH}} in]],
    align(center)[Rod Length Required \ #text(size: 14pt, weight: "bold")[{{ROD_LENGTH}} units]],
    align(center)[Rate per Unit \ #text(size: 14pt, weight: "bold")[{{ROD_RATE}}]],
  )
]
"##;

/// Render a quotation to PDF bytes.
///
/// # Example
///
/// ```rust,no_run
/// use quote_core::project::{MeasurementDraft, Project, ProjectDraft};
/// use quote_core::quotation::{render_pdf, Quotation, QuotationOptions};
///
/// let mut project = Project::from_draft(ProjectDraft::new("A", "123")).unwrap();
/// project.add_measurement(
///     MeasurementDraft::new("R1", 30.0, 60.0, 100.0, 50.0).into_measurement().unwrap(),
/// );
/// let quote = Quotation::new(&project, &project.measurements, QuotationOptions::default());
/// let pdf = render_pdf(&quote).unwrap();
/// std::fs::write("quotation.pdf", pdf).unwrap();
/// ```
pub fn render_pdf(quote: &Quotation) -> QuoteResult<Vec<u8>> {
    let source = build_source(quote);

    let world = QuoteWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::Render {
            reason: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        QuoteError::Render {
            reason: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    tracing::info!(quote = %quote.quote_number, bytes = pdf_bytes.len(), "rendered quotation pdf");
    Ok(pdf_bytes)
}

/// Fill the template with quotation data.
fn build_source(quote: &Quotation) -> String {
    let rod_block = match &quote.rod {
        Some(rod) => ROD_TEMPLATE
            .replace("{{ROD_WIDTH}}", &format!("{:.1}", rod.total_width_inches))
            .replace("{{ROD_LENGTH}}", &format!("{:.2}", rod.rod_length))
            .replace("{{ROD_RATE}}", &money(rod.rate_per_length, 0)),
        None => String::new(),
    };

    QUOTE_TEMPLATE
        .replace("{{BUSINESS_NAME}}", &escape_typst(&quote.options.business_name))
        .replace("{{BUSINESS_DETAILS}}", &escape_typst(&quote.options.business_details))
        .replace("{{TITLE}}", &escape_typst(&quote.options.title))
        .replace("{{CLIENT}}", &escape_typst(or_na(&quote.client_name)))
        .replace("{{PHONE}}", &escape_typst(or_na(&quote.phone_number)))
        .replace("{{ADDRESS}}", &escape_typst(or_na(&quote.address)))
        .replace("{{PROJECT}}", &escape_typst(&quote.project_title))
        .replace("{{DATE}}", &quote.issue_date())
        .replace("{{QUOTE_NUMBER}}", &quote.quote_number)
        .replace("{{CURRENCY}}", CURRENCY_SYMBOL)
        .replace("{{ROWS}}", &build_rows(quote))
        .replace("{{ROD_BLOCK}}", &rod_block)
        .replace("{{SUMMARY_ROWS}}", &build_summary_rows(quote))
}

fn build_rows(quote: &Quotation) -> String {
    quote
        .line_items
        .iter()
        .map(|item| {
            format!(
                "  [{}], [{}], [{}], [{}], [{}], [{}m], [{}], [{}], [{}], [*{}*],",
                item.index,
                escape_typst(&item.room_label),
                item.width_inches,
                item.height_inches,
                item.pieces,
                escape_typst(&item.total_meters),
                item.curtain_type,
                money(item.cloth_cost, 0),
                money(item.stitching_cost, 0),
                money(item.total_cost, 0)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_summary_rows(quote: &Quotation) -> String {
    let s = &quote.summary;
    let mut rows = vec![
        ("Cloth Total:", s.cloth_total),
        ("Stitching Total:", s.stitching_total),
        ("Curtain Sub-Total:", s.curtain_subtotal),
    ];
    if quote.has_rod_cost() {
        rows.push(("Rod Installation:", s.rod_cost));
    }
    let mut lines: Vec<String> = rows
        .into_iter()
        .map(|(label, amount)| format!("      [{}], align(right)[{}],", label, money(amount, 2)))
        .collect();
    lines.push(format!(
        "      [*Grand Total:*], align(right)[*{}*],",
        money(s.grand_total, 2)
    ));
    lines.join("\n")
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Escape Typst markup characters in operator text
fn escape_typst(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '=' | '-' | '+' | '/' | '~') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
