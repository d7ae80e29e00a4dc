//! Render a sample quotation to disk
//! Run with: cargo run -p quotation --example quotation_demo [data.json] [options.json]
//!
//! Without arguments a built-in sample is rendered. Set RUST_LOG=debug to
//! follow the layout stages.

use anyhow::Context;
use quotation::{generate_quotation_pdf, parse_options, parse_quotation};
use std::fs;

const SAMPLE_DATA: &str = r#"{
    "invoiceNumber": "QT-2024-0042",
    "date": "2024-03-04T11:15:00.000Z",
    "customerName": "Meera Deshpande",
    "customerPhone": "+91 98220 11223",
    "customerEmail": "meera.deshpande@example.com",
    "customerAddress": "B-12, Lakeview Apartments, Baner, Pune 411045",
    "items": [
        { "name": "Living Room Sliding Window", "type": "window", "width": 6, "height": 4.5, "area": 27, "rate": 480, "total": 12960, "glassType": "Toughened 5mm", "profileType": "2-Track" },
        { "name": "Bedroom Casement", "type": "window", "width": 3, "height": 4, "area": 12, "rate": 520, "total": 6240, "quantity": 2, "glassType": "Clear 5mm", "profileType": "Casement" },
        { "name": "Balcony Door", "type": "door", "width": 4, "height": 7, "area": 28, "rate": 610, "total": 17080, "glassType": "Toughened 8mm", "profileType": "Slim 3-Track" }
    ],
    "subtotal": 36280,
    "tax": 6530.4,
    "grandTotal": 42810,
    "roundOff": -0.4,
    "advancePaid": 15000,
    "notes": "Mosquito mesh included on all sliding shutters.",
    "termsAndConditions": "50% advance along with the order\nBalance on completion of installation\nDelivery within 21 working days"
}"#;

const SAMPLE_OPTIONS: &str = r#"{
    "branding": {
        "companyName": "Crystal Aluminium Works",
        "tagline": "Windows, Doors & Facades",
        "phone": "+91 20 2567 8901",
        "email": "sales@crystal.example",
        "website": "crystal.example"
    },
    "qrCode": { "url": "https://crystal.example/q/QT-2024-0042", "label": "Scan to view online" },
    "digitalSignature": { "signerName": "Anil Jadhav", "signerTitle": "Proprietor", "date": "2024-03-04" }
}"#;

fn read_or(path: Option<&String>, fallback: &str) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}")),
        None => Ok(fallback.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let data = parse_quotation(&read_or(args.first(), SAMPLE_DATA)?)?;
    let options = parse_options(&read_or(args.get(1), SAMPLE_OPTIONS)?)?;

    fs::create_dir_all("output")?;
    let bytes = generate_quotation_pdf(&data, &options)?;
    let path = format!("output/{}.pdf", data.invoice_number);
    fs::write(&path, &bytes)?;

    println!("Wrote {} ({} bytes)", path, bytes.len());
    Ok(())
}
