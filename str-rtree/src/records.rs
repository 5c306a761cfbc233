//! Tab-separated input and query records.
//!
//! Both formats hold five fields per line: an identifier followed by
//! `x_low`, `x_high`, `y_low` and `y_high`. Entry ids are unsigned integers;
//! query ids are kept verbatim. Blank lines are skipped. The first malformed
//! line aborts parsing.

use std::io::BufRead;

use crate::rect::Rect;
use crate::rtree::rtree_types::{Entry, EntryId, SpatialError, SpatialResult};

const FIELD_COUNT: usize = 5;

/// One query rectangle read from a query file
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub id: String,
    pub rect: Rect,
}

/// Reads entry records from `reader`.
///
/// # Errors
///
/// Returns [`SpatialError::Parse`] for a line with the wrong number of fields
/// or a non-numeric value, [`SpatialError::InvalidRectangle`] for inverted
/// bounds, and [`SpatialError::Io`] if reading fails.
pub fn parse_entries<R: BufRead>(reader: R) -> SpatialResult<Vec<Entry>> {
    let mut entries = Vec::new();
    for_each_record(reader, |line_no, fields| {
        let id: EntryId = fields[0].trim().parse().map_err(|e| SpatialError::Parse {
            line: line_no,
            reason: format!("invalid entry id '{}': {}", fields[0], e),
        })?;
        entries.push(Entry::new(id, parse_rect(line_no, &fields[1..])?)?);
        Ok(())
    })?;
    log::debug!("Parsed {} entries", entries.len());
    Ok(entries)
}

/// Reads query records from `reader`.
///
/// # Errors
///
/// Same conditions as [`parse_entries`], except that any text is accepted as
/// a query id.
pub fn parse_queries<R: BufRead>(reader: R) -> SpatialResult<Vec<QueryRecord>> {
    let mut queries = Vec::new();
    for_each_record(reader, |line_no, fields| {
        queries.push(QueryRecord {
            id: fields[0].to_string(),
            rect: parse_rect(line_no, &fields[1..])?,
        });
        Ok(())
    })?;
    log::debug!("Parsed {} queries", queries.len());
    Ok(queries)
}

fn for_each_record<R, F>(reader: R, mut handle: F) -> SpatialResult<()>
where
    R: BufRead,
    F: FnMut(usize, &[&str]) -> SpatialResult<()>,
{
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let line_no = index + 1;
        if fields.len() != FIELD_COUNT {
            return Err(SpatialError::Parse {
                line: line_no,
                reason: format!(
                    "expected {} tab-separated fields, found {}",
                    FIELD_COUNT,
                    fields.len()
                ),
            });
        }
        handle(line_no, &fields)?;
    }
    Ok(())
}

fn parse_rect(line_no: usize, fields: &[&str]) -> SpatialResult<Rect> {
    let mut coords = [0.0; 4];
    for (coord, field) in coords.iter_mut().zip(fields) {
        *coord = field.trim().parse().map_err(|e| SpatialError::Parse {
            line: line_no,
            reason: format!("invalid coordinate '{}': {}", field, e),
        })?;
    }
    Rect::new(coords[0], coords[1], coords[2], coords[3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_entries() {
        let input = "1\t0.0\t1.0\t0.0\t1.0\n2\t2\t3\t-1.5\t0.5\n";
        let entries = parse_entries(Cursor::new(input)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[1].rect, Rect::new(2.0, 3.0, -1.5, 0.5).unwrap());
    }

    #[test]
    fn test_parse_skips_blank_lines_and_crlf() {
        let input = "1\t0\t1\t0\t1\r\n\n   \n2\t0\t1\t0\t1\r\n";
        let entries = parse_entries(Cursor::new(input)).unwrap();
        assert_eq!(entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let input = "1\t0\t1\t0\t1\n2\t0\t1\t0\n";
        match parse_entries(Cursor::new(input)) {
            Err(SpatialError::Parse { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("found 4"), "{}", reason);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_numeric() {
        let input = "1\t0\tabc\t0\t1\n";
        assert!(matches!(
            parse_entries(Cursor::new(input)),
            Err(SpatialError::Parse { line: 1, .. })
        ));

        let input = "x1\t0\t1\t0\t1\n";
        assert!(matches!(
            parse_entries(Cursor::new(input)),
            Err(SpatialError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_inverted_rectangle() {
        let input = "1\t0\t1\t0\t1\n2\t5\t1\t0\t1\n";
        assert!(matches!(
            parse_entries(Cursor::new(input)),
            Err(SpatialError::InvalidRectangle { .. })
        ));
    }

    #[test]
    fn test_parse_queries_keeps_text_ids() {
        let input = "q-7\t-1\t4\t-1\t4\n0\t0.4\t0.6\t0.4\t0.6\n";
        let queries = parse_queries(Cursor::new(input)).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].id, "q-7");
        assert_eq!(queries[0].rect, Rect::new(-1.0, 4.0, -1.0, 4.0).unwrap());
        assert_eq!(queries[1].id, "0");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_entries(Cursor::new("")).unwrap().is_empty());
        assert!(parse_queries(Cursor::new("\n\n")).unwrap().is_empty());
    }
}
