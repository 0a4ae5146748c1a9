use std::io::Write;

use anyhow::Result;

use super::PackReport;

/// Write one `<rid> <bid> <x> <y> <rotation>` line per placed item, in
/// ascending item id. Items staged without an id cannot be listed and are
/// skipped; unplaced items are absent by contract.
pub fn write_text<W: Write>(mut out: W, report: &PackReport) -> Result<()> {
    for placement in &report.placements {
        let Some(rid) = placement.rid else { continue };
        writeln!(
            out,
            "{} {} {} {} {}",
            rid,
            placement.bid,
            placement.x,
            placement.y,
            u8::from(placement.rotated)
        )?;
    }
    Ok(())
}
