//! Quotation - branded quotation PDF layout engine
//!
//! This crate provides:
//! - The quotation model (`QuotationData`, `PdfOptions`, `LayoutConfig`)
//! - JSON parsing with validation
//! - Stage renderers (watermark, header, customer box, items table,
//!   summary, notes/terms/signatures, QR and signature overlays, footer)
//!   written against the `pdf_core::Canvas` trait
//! - Measure-first pagination through a `Pager`
//! - The top-level [`generate_quotation_pdf`] entry point
//!
//! # Example
//!
//! ```ignore
//! use quotation::{generate_quotation_pdf, parse_options, parse_quotation};
//!
//! let data = parse_quotation(data_json)?;
//! let options = parse_options(options_json)?;
//! let pdf_bytes = generate_quotation_pdf(&data, &options)?;
//! std::fs::write("quotation.pdf", pdf_bytes)?;
//! ```

pub mod assets;
pub mod layout;
mod model;
pub mod parser;
mod renderer;
pub mod stages;

pub use assets::{BundledLogo, DataUrlLogo, LogoSource};
pub use model::*;
pub use parser::{parse_options, parse_quotation};
pub use renderer::{generate_quotation_pdf, QuotationRenderer, RenderContext};

use thiserror::Error;

/// Errors that can occur while generating a quotation
#[derive(Debug, Error)]
pub enum QuotationError {
    #[error("Failed to parse quotation: {0}")]
    ParseError(String),

    #[error("Invalid quotation: {0}")]
    InvalidInput(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("Text error: {0}")]
    TextError(#[from] quote_text::TextError),

    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("QR code error: {0}")]
    QrCodeError(String),

    #[error("failed to generate quotation PDF")]
    GenerationFailed(#[source] Box<QuotationError>),
}

/// Result type for quotation operations
pub type Result<T> = std::result::Result<T, QuotationError>;
