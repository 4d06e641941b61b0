//! CSV report rendering
//!
//! One header row followed by one row per artifact. The creator columns are
//! filled from whatever creator the caller joined in; a missing creator or a
//! missing optional value becomes an empty cell.

use crate::error::{RelicError, RelicResult};
use crate::{Artifact, Creator};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

/// Column titles, in output order.
pub const REPORT_HEADER: [&str; 9] = [
    "Id",
    "Name",
    "Origin",
    "Tags",
    "Year Created",
    "Power Level",
    "Creator Name",
    "Creator Race",
    "Creator Realm",
];

/// An artifact joined with its (possibly absent) creator.
#[derive(Debug, Clone, Copy)]
pub struct ReportRow<'a> {
    pub artifact: &'a Artifact,
    pub creator: Option<&'a Creator>,
}

impl<'a> ReportRow<'a> {
    pub fn new(artifact: &'a Artifact, creator: Option<&'a Creator>) -> Self {
        Self { artifact, creator }
    }

    fn cells(&self) -> [String; 9] {
        let a = self.artifact;
        let text = |v: Option<&str>| v.unwrap_or_default().to_string();
        let number = |v: Option<i32>| v.map(|n| n.to_string()).unwrap_or_default();
        [
            a.id.to_string(),
            a.name.clone(),
            text(a.origin.as_deref()),
            text(a.tags.as_deref()),
            number(a.year_created),
            number(a.power_level),
            text(self.creator.map(|c| c.name.as_str())),
            text(self.creator.and_then(|c| c.race.as_deref())),
            text(self.creator.and_then(|c| c.realm.as_deref())),
        ]
    }
}

fn report_error(err: csv::Error) -> RelicError {
    RelicError::Report {
        reason: err.to_string(),
    }
}

/// Write the header and every row to `sink`.
///
/// Fields containing a comma, quote, CR or LF are quoted with inner quotes
/// doubled. Rows end in `\n`.
pub fn write_artifact_report<'a, W, I>(sink: W, rows: I) -> RelicResult<()>
where
    W: Write,
    I: IntoIterator<Item = ReportRow<'a>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(REPORT_HEADER).map_err(report_error)?;
    for row in rows {
        writer.write_record(row.cells()).map_err(report_error)?;
    }
    writer.flush().map_err(|e| RelicError::Report {
        reason: e.to_string(),
    })
}

/// Render the report into an in-memory buffer.
pub fn render_artifact_report<'a, I>(rows: I) -> RelicResult<Vec<u8>>
where
    I: IntoIterator<Item = ReportRow<'a>>,
{
    let mut buf = Vec::new();
    write_artifact_report(&mut buf, rows)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArtifactId, CreatorId};

    fn sauron() -> Creator {
        Creator {
            id: CreatorId(1),
            name: "Sauron".to_string(),
            race: Some("Maia".to_string()),
            realm: Some("Mordor".to_string()),
        }
    }

    fn ring() -> Artifact {
        Artifact {
            id: ArtifactId(7),
            name: "One Ring".to_string(),
            creator_id: CreatorId(1),
            origin: Some("Mordor".to_string()),
            tags: Some("ring,dark".to_string()),
            year_created: Some(1600),
            power_level: Some(9000),
        }
    }

    fn render(rows: Vec<ReportRow<'_>>) -> String {
        let bytes = render_artifact_report(rows).expect("render report");
        String::from_utf8(bytes).expect("utf-8 report")
    }

    #[test]
    fn test_header_only_when_empty() {
        let out = render(Vec::new());
        assert_eq!(
            out,
            "Id,Name,Origin,Tags,Year Created,Power Level,Creator Name,Creator Race,Creator Realm\n"
        );
    }

    #[test]
    fn test_row_with_creator() {
        let creator = sauron();
        let artifact = ring();
        let out = render(vec![ReportRow::new(&artifact, Some(&creator))]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "7,One Ring,Mordor,\"ring,dark\",1600,9000,Sauron,Maia,Mordor");
    }

    #[test]
    fn test_quotes_are_doubled() {
        let mut artifact = ring();
        artifact.name = "a,\"b\"".to_string();
        artifact.tags = None;
        let out = render(vec![ReportRow::new(&artifact, None)]);
        let row = out.lines().nth(1).expect("data row");
        assert!(row.starts_with("7,\"a,\"\"b\"\"\",Mordor,,1600,9000,,,"));
    }

    #[test]
    fn test_missing_values_are_empty_cells() {
        let artifact = Artifact {
            id: ArtifactId(3),
            name: "Sting".to_string(),
            creator_id: CreatorId(2),
            origin: None,
            tags: None,
            year_created: None,
            power_level: None,
        };
        let out = render(vec![ReportRow::new(&artifact, None)]);
        assert_eq!(out.lines().nth(1), Some("3,Sting,,,,,,,"));
    }

    #[test]
    fn test_newline_in_field_is_quoted() {
        let mut artifact = ring();
        artifact.origin = Some("Mount\nDoom".to_string());
        let out = render(vec![ReportRow::new(&artifact, None)]);
        assert!(out.contains("\"Mount\nDoom\""));
        assert!(out.ends_with('\n'));
    }
}
