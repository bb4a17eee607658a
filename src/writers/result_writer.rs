use crate::error::Result;
use crate::models::Measurements;
use crate::utils::constants::{FORMAT_BRACES, FORMAT_JSON, FORMAT_LINES};
use clap::ValueEnum;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One `name = min/mean/max` line per station
    #[default]
    Lines,
    /// Single `{name=min/mean/max, ...}` line
    Braces,
    /// JSON object keyed by station name
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Lines => FORMAT_LINES,
            OutputFormat::Braces => FORMAT_BRACES,
            OutputFormat::Json => FORMAT_JSON,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders the final measurements sorted by station name.
///
/// Values are rounded half away from zero to one decimal here and nowhere
/// earlier.
pub struct ResultWriter {
    format: OutputFormat,
}

impl ResultWriter {
    pub fn new() -> Self {
        Self {
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn write_to<W: Write>(&self, measurements: &Measurements, out: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Lines => {
                for (name, stats) in measurements.sorted() {
                    let summary = stats.summary();
                    writeln!(
                        out,
                        "{} = {:.1}/{:.1}/{:.1}",
                        name, summary.min, summary.mean, summary.max
                    )?;
                }
            }
            OutputFormat::Braces if measurements.is_empty() => {}
            OutputFormat::Braces => {
                let entries: Vec<String> = measurements
                    .sorted()
                    .into_iter()
                    .map(|(name, stats)| {
                        let summary = stats.summary();
                        format!(
                            "{}={:.1}/{:.1}/{:.1}",
                            name, summary.min, summary.mean, summary.max
                        )
                    })
                    .collect();
                writeln!(out, "{{{}}}", entries.join(", "))?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &measurements.summaries())?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    pub fn render(&self, measurements: &Measurements) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(measurements, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StationMap, StationStats};
    use pretty_assertions::assert_eq;

    fn sample() -> Measurements {
        let mut stations = StationMap::new();
        let mut hamburg = StationStats::new(12.0);
        hamburg.observe(-4.1);
        hamburg.observe(34.2);
        stations.insert("Hamburg".to_string(), hamburg);
        stations.insert("Abha".to_string(), StationStats::new(-0.04));
        Measurements::new(stations)
    }

    #[test]
    fn test_lines_format_sorted_and_rounded() {
        let text = ResultWriter::new().render(&sample()).unwrap();
        assert_eq!(text, "Abha = 0.0/0.0/0.0\nHamburg = -4.1/14.0/34.2\n");
    }

    #[test]
    fn test_braces_format() {
        let text = ResultWriter::with_format(OutputFormat::Braces)
            .render(&sample())
            .unwrap();
        assert_eq!(text, "{Abha=0.0/0.0/0.0, Hamburg=-4.1/14.0/34.2}\n");
    }

    #[test]
    fn test_json_format() {
        let text = ResultWriter::with_format(OutputFormat::Json)
            .render(&sample())
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["Hamburg"]["mean"], 14.0);
        assert_eq!(parsed["Abha"]["max"], 0.0);
    }

    #[test]
    fn test_empty_result_prints_nothing() {
        let text = ResultWriter::new().render(&Measurements::default()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_empty_result_prints_nothing_in_braces() {
        let text = ResultWriter::with_format(OutputFormat::Braces)
            .render(&Measurements::default())
            .unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_rounds_mean_half_away_from_zero() {
        let mut stations = StationMap::new();
        let mut stats = StationStats::new(-2.0);
        stats.observe(-2.5);
        // mean -2.25
        stations.insert("Nuuk".to_string(), stats);

        let text = ResultWriter::new().render(&Measurements::new(stations)).unwrap();
        assert_eq!(text, "Nuuk = -2.5/-2.3/-2.0\n");
    }
}
