#![allow(dead_code)]

use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `lines` after `header` into a temporary CSV file.
pub fn csv_file(header: &str, lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", header).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

pub fn invoices_file(lines: &[&str]) -> NamedTempFile {
    csv_file("reference, amount, type", lines)
}

pub fn payments_file(lines: &[&str]) -> NamedTempFile {
    csv_file("reference, amount", lines)
}

/// Generates `invoices` standard invoices of 100.00 and a payments file that pays
/// each of them in four instalments of 25.00.
pub fn generate_workload(
    invoices_path: &Path,
    payments_path: &Path,
    invoices: usize,
) -> Result<(), Error> {
    let mut inv = csv::WriterBuilder::new().from_writer(File::create(invoices_path)?);
    inv.write_record(["reference", "amount", "type"])?;
    for i in 1..=invoices {
        let reference = format!("INV-{}", i);
        inv.write_record([reference.as_str(), "100.00", "standard"])?;
    }
    inv.flush()?;

    let mut pay = csv::WriterBuilder::new().from_writer(File::create(payments_path)?);
    pay.write_record(["reference", "amount"])?;
    for _ in 0..4 {
        for i in 1..=invoices {
            let reference = format!("INV-{}", i);
            pay.write_record([reference.as_str(), "25.00"])?;
        }
    }
    pay.flush()?;
    Ok(())
}
