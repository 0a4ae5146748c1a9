use std::io::Write;

use anyhow::Result;

use super::PackReport;

/// Serialize the full report as pretty-printed JSON.
pub fn write_json<W: Write>(out: W, report: &PackReport) -> Result<()> {
    serde_json::to_writer_pretty(out, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_shape() {
        let report = PackReport {
            total_cost: 15,
            bins: Vec::new(),
            placements: Vec::new(),
            unplaced: vec![4],
        };

        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total_cost"], 15);
        assert_eq!(value["unplaced"][0], 4);
    }
}
