//! Comma-delimited persistence of records.
//!
//! Every table starts with a header row listing the record's fields, so a table without records
//! still carries its full column set.

use crate::Result;
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub trait Record: Serialize + DeserializeOwned {
    /// Field names in serialization order.
    const HEADERS: &'static [&'static str];
}

pub fn write<R: Record, W: Write>(writer: W, records: &[R]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(R::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read<R: Record, RD: Read>(reader: RD) -> Result<Vec<R>> {
    let records = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<std::result::Result<Vec<R>, csv::Error>>()?;
    Ok(records)
}

pub fn save<R: Record>(path: impl AsRef<Path>, records: &[R]) -> Result<()> {
    let path = path.as_ref();
    write(BufWriter::new(File::create(path)?), records)?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

pub fn load<R: Record>(path: impl AsRef<Path>) -> Result<Vec<R>> {
    let path = path.as_ref();
    let records = read(BufReader::new(File::open(path)?))?;
    info!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}
