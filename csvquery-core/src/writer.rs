use std::io::Write;

use crate::error::Result;

/// Write `rows` as standard CSV, preceded by `header` unless it is empty.
///
/// Unlike the tokenizer, the output is RFC 4180 quoted: fields holding
/// commas, quotes or line breaks are wrapped and inner quotes doubled.
pub fn write_rows<W, I, R>(out: W, header: &[String], rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: AsRef<[String]>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(out);

    if !header.is_empty() {
        writer.write_record(header)?;
    }
    for row in rows {
        writer.write_record(row.as_ref())?;
    }
    writer.flush()?;

    Ok(())
}
