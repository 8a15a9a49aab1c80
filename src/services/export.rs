// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Excel export of the bike list.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Url, Workbook, Worksheet, XlsxError};

use crate::error::AppError;
use crate::models::Bike;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "Bikes";

const MIN_COLUMN_WIDTH: usize = 8;
const MAX_COLUMN_WIDTH: usize = 40;
const WIDTH_PADDING: usize = 2;

const HEADER_FILL: u32 = 0x1F4E78;
const STRIPE_FILL: u32 = 0xDDEBF7;
const PRICE_FORMAT: &str = "#,##0.00";

/// Columns available for export, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportColumn {
    ModelNumber,
    ModelName,
    ModelYear,
    Category,
    Color,
    Battery,
    Price,
    PromoPrice,
    Pieces,
}

enum Cell {
    Text(String),
    Number(f64),
    Money(f64),
    Link { text: String, url: String },
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(s) => s.chars().count(),
            Cell::Link { text, .. } => text.chars().count(),
            Cell::Number(n) => n.to_string().len(),
            Cell::Money(n) => {
                let digits = format!("{:.0}", n.abs().trunc()).len();
                format!("{n:.2}").len() + digits.saturating_sub(1) / 3
            }
        }
    }
}

impl ExportColumn {
    pub const ALL: [ExportColumn; 9] = [
        ExportColumn::ModelNumber,
        ExportColumn::ModelName,
        ExportColumn::ModelYear,
        ExportColumn::Category,
        ExportColumn::Color,
        ExportColumn::Battery,
        ExportColumn::Price,
        ExportColumn::PromoPrice,
        ExportColumn::Pieces,
    ];

    /// Name used in export requests.
    pub fn key(&self) -> &'static str {
        match self {
            ExportColumn::ModelNumber => "modelNumber",
            ExportColumn::ModelName => "modelName",
            ExportColumn::ModelYear => "modelYear",
            ExportColumn::Category => "category",
            ExportColumn::Color => "color",
            ExportColumn::Battery => "battery",
            ExportColumn::Price => "price",
            ExportColumn::PromoPrice => "promoPrice",
            ExportColumn::Pieces => "pieces",
        }
    }

    /// Header row label.
    pub fn title(&self) -> &'static str {
        match self {
            ExportColumn::ModelNumber => "Model number",
            ExportColumn::ModelName => "Model name",
            ExportColumn::ModelYear => "Year",
            ExportColumn::Category => "Category",
            ExportColumn::Color => "Color",
            ExportColumn::Battery => "Battery",
            ExportColumn::Price => "Price",
            ExportColumn::PromoPrice => "Promo price",
            ExportColumn::Pieces => "Pieces",
        }
    }

    pub fn from_key(key: &str) -> Option<ExportColumn> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    fn cell(&self, bike: &Bike) -> Cell {
        match self {
            ExportColumn::ModelNumber => Cell::Text(bike.model_number.clone()),
            ExportColumn::ModelName => match &bike.link {
                Some(url) => Cell::Link {
                    text: bike.model_name.clone(),
                    url: url.clone(),
                },
                None => Cell::Text(bike.model_name.clone()),
            },
            ExportColumn::ModelYear => Cell::Number(bike.model_year as f64),
            ExportColumn::Category => Cell::Text(bike.category.to_string()),
            ExportColumn::Color => Cell::Text(bike.color.clone()),
            ExportColumn::Battery => Cell::Text(bike.battery.clone()),
            ExportColumn::Price => Cell::Money(bike.price),
            ExportColumn::PromoPrice => Cell::Money(bike.promo_price),
            ExportColumn::Pieces => Cell::Number(bike.pieces as f64),
        }
    }
}

/// Validate requested column names and put them in sheet order.
pub fn parse_columns(requested: &[String]) -> Result<Vec<ExportColumn>, AppError> {
    if requested.is_empty() {
        return Err(AppError::BadRequest(
            "at least one export column is required".to_string(),
        ));
    }

    let mut columns = requested
        .iter()
        .map(|key| {
            ExportColumn::from_key(key.trim())
                .ok_or_else(|| AppError::BadRequest(format!("unknown export column: {key}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    columns.sort();
    columns.dedup();
    Ok(columns)
}

fn clamp_width(chars: usize) -> f64 {
    (chars + WIDTH_PADDING).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as f64
}

/// Render the workbook: styled header, striped rows, frozen header row and
/// first column, linked model names, fitted column widths.
pub fn build_workbook(bikes: &[Bike], columns: &[ExportColumn]) -> Result<Vec<u8>, XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let stripe = Format::new().set_background_color(Color::RGB(STRIPE_FILL));
    let plain = Format::new();
    let money_plain = Format::new().set_num_format(PRICE_FORMAT);
    let money_stripe = Format::new()
        .set_num_format(PRICE_FORMAT)
        .set_background_color(Color::RGB(STRIPE_FILL));
    let link_plain = Format::new().set_hyperlink();
    let link_stripe = Format::new()
        .set_hyperlink()
        .set_background_color(Color::RGB(STRIPE_FILL));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let mut widths: Vec<usize> = columns.iter().map(|c| c.title().chars().count()).collect();

    for (col, column) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.title(), &header_format)?;
    }

    for (idx, bike) in bikes.iter().enumerate() {
        let row = (idx + 1) as u32;
        let striped = idx % 2 == 1;
        let (text_format, money_format, link_format) = if striped {
            worksheet.set_row_format(row, &stripe)?;
            (&stripe, &money_stripe, &link_stripe)
        } else {
            (&plain, &money_plain, &link_plain)
        };

        for (col, column) in columns.iter().enumerate() {
            let col_idx = col as u16;
            let cell = column.cell(bike);
            widths[col] = widths[col].max(cell.display_len());

            match cell {
                Cell::Text(text) => {
                    worksheet.write_string_with_format(row, col_idx, &text, text_format)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number_with_format(row, col_idx, n, text_format)?;
                }
                Cell::Money(n) => {
                    worksheet.write_number_with_format(row, col_idx, n, money_format)?;
                }
                Cell::Link { text, url } => {
                    write_link(worksheet, (row, col_idx), &text, &url, link_format, text_format)?;
                }
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, clamp_width(*width))?;
    }
    worksheet.set_freeze_panes(1, 1)?;

    workbook.save_to_buffer()
}

/// Write a hyperlink cell, or plain text when the stored link is unusable.
fn write_link(
    worksheet: &mut Worksheet,
    (row, col): (u32, u16),
    text: &str,
    url: &str,
    link_format: &Format,
    text_format: &Format,
) -> Result<(), XlsxError> {
    match worksheet.write_url_with_format(row, col, Url::new(url).set_text(text), link_format) {
        Ok(_) => Ok(()),
        Err(XlsxError::UnknownUrlType(_) | XlsxError::MaxUrlLengthExceeded) => {
            tracing::debug!(url = %url, "Exporting link as plain text");
            worksheet.write_string_with_format(row, col, text, text_format)?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}
