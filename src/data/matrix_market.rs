//! Matrix-market adjacency parsing
//!
//! Supports `coordinate` (real, integer, pattern) and `array` (real, integer)
//! matrices with general, symmetric, skew-symmetric or hermitian symmetry.
//! Row/column `k` (1-based in the file) becomes the node labelled `k - 1`.

use crate::error::ParseError;
use crate::graph::GraphBuilder;

/// Reserved first-line token identifying the format
pub const HEADER: &str = "%%MatrixMarket";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Coordinate,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symmetry {
    General,
    Symmetric,
    SkewSymmetric,
    Hermitian,
}

#[derive(Debug, Clone, Copy)]
struct Header {
    layout: Layout,
    field: Field,
    symmetry: Symmetry,
}

fn parse_header(line: &str) -> Result<Header, ParseError> {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();

    if tokens.len() != 5 || tokens[0] != HEADER.to_ascii_lowercase() {
        return Err(ParseError::Header(line.to_string()));
    }
    if tokens[1] != "matrix" {
        return Err(ParseError::Header(format!(
            "unsupported object '{}'",
            tokens[1]
        )));
    }

    let layout = match tokens[2].as_str() {
        "coordinate" => Layout::Coordinate,
        "array" => Layout::Array,
        other => return Err(ParseError::Header(format!("unknown format '{}'", other))),
    };
    let field = match tokens[3].as_str() {
        "real" | "double" => Field::Real,
        "integer" => Field::Integer,
        "pattern" if layout == Layout::Coordinate => Field::Pattern,
        other => return Err(ParseError::UnsupportedField(other.to_string())),
    };
    let symmetry = match tokens[4].as_str() {
        "general" => Symmetry::General,
        "symmetric" => Symmetry::Symmetric,
        "skew-symmetric" => Symmetry::SkewSymmetric,
        "hermitian" => Symmetry::Hermitian,
        other => return Err(ParseError::Header(format!("unknown symmetry '{}'", other))),
    };

    Ok(Header {
        layout,
        field,
        symmetry,
    })
}

fn parse_usize(token: Option<&str>, line: usize, what: &str) -> Result<usize, ParseError> {
    token
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| ParseError::Line {
            line,
            message: format!("expected {}", what),
        })
}

fn parse_value(token: Option<&str>, field: Field, line: usize) -> Result<f64, ParseError> {
    match field {
        Field::Pattern => Ok(1.0),
        Field::Integer => token
            .and_then(|t| t.parse::<i64>().ok())
            .map(|v| v as f64)
            .ok_or_else(|| ParseError::Line {
                line,
                message: "expected an integer value".to_string(),
            }),
        Field::Real => token
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(|| ParseError::Line {
                line,
                message: "expected a real value".to_string(),
            }),
    }
}

/// Stored entries of an `array` matrix, or `None` if the count overflows
fn array_entry_count(rows: usize, symmetry: Symmetry) -> Option<usize> {
    match symmetry {
        Symmetry::General => rows.checked_mul(rows),
        Symmetry::Symmetric | Symmetry::Hermitian => {
            rows.checked_mul(rows.checked_add(1)?).map(|v| v / 2)
        }
        Symmetry::SkewSymmetric => rows.checked_mul(rows.saturating_sub(1)).map(|v| v / 2),
    }
}

/// Column-major walk over the stored positions of an `array` matrix
///
/// Non-general matrices store only the lower triangle.
struct ArrayCursor {
    rows: usize,
    symmetry: Symmetry,
    row: usize,
    col: usize,
}

impl ArrayCursor {
    fn new(rows: usize, symmetry: Symmetry) -> Self {
        let mut cursor = Self {
            rows,
            symmetry,
            row: 0,
            col: 0,
        };
        cursor.row = cursor.first_row(0);
        cursor
    }

    fn first_row(&self, col: usize) -> usize {
        match self.symmetry {
            Symmetry::General => 0,
            Symmetry::Symmetric | Symmetry::Hermitian => col,
            Symmetry::SkewSymmetric => col + 1,
        }
    }
}

impl Iterator for ArrayCursor {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        while self.col < self.rows && self.row >= self.rows {
            self.col += 1;
            self.row = self.first_row(self.col);
        }
        if self.col >= self.rows {
            return None;
        }
        let position = (self.row, self.col);
        self.row += 1;
        Some(position)
    }
}

/// Parse a whole matrix-market document into a builder
///
/// Nodes are created by the entries that mention them, never from the size
/// line alone, so a declared dimension costs nothing until entries use it.
/// Rows that only carry diagonal or zero entries do not become nodes.
pub fn parse(content: &str) -> Result<GraphBuilder, ParseError> {
    let mut lines = content.lines().enumerate();

    let header = match lines.next() {
        Some((_, line)) => parse_header(line.trim())?,
        None => return Err(ParseError::Header("missing header".to_string())),
    };

    // Remaining non-comment lines, 1-based line numbers
    let mut body = lines
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('%'));

    let (size_line, size) = body
        .next()
        .ok_or_else(|| ParseError::Header("missing size line".to_string()))?;
    let mut size_tokens = size.split_whitespace();
    let rows = parse_usize(size_tokens.next(), size_line, "row count")?;
    let cols = parse_usize(size_tokens.next(), size_line, "column count")?;
    if rows != cols {
        return Err(ParseError::Header(format!(
            "adjacency matrix must be square, got {}x{}",
            rows, cols
        )));
    }

    let expected = match header.layout {
        Layout::Coordinate => parse_usize(size_tokens.next(), size_line, "entry count")?,
        Layout::Array => array_entry_count(rows, header.symmetry).ok_or_else(|| {
            ParseError::Header(format!("{}x{} array is too large to store", rows, cols))
        })?,
    };

    // Sized from the entry lines, never from the declared dimension
    let remaining = content.lines().count().saturating_sub(size_line);
    let mut builder = GraphBuilder::with_capacity(expected.min(remaining));
    let mut add_entry = |row: usize, col: usize, value: f64| {
        if value != 0.0 {
            builder.add_edge(&row.to_string(), &col.to_string());
        }
    };

    let mut found = 0;
    match header.layout {
        Layout::Coordinate => {
            for (line, text) in body {
                let mut tokens = text.split_whitespace();
                let row = parse_usize(tokens.next(), line, "row index")?;
                let col = parse_usize(tokens.next(), line, "column index")?;
                if row == 0 || col == 0 || row > rows || col > cols {
                    return Err(ParseError::OutOfRange {
                        row,
                        col,
                        rows,
                        cols,
                    });
                }
                let value = parse_value(tokens.next(), header.field, line)?;
                add_entry(row - 1, col - 1, value);
                found += 1;
            }
        }
        Layout::Array => {
            let mut positions = ArrayCursor::new(rows, header.symmetry);
            for (line, text) in body {
                let value = parse_value(Some(text), header.field, line)?;
                if let Some((i, j)) = positions.next() {
                    add_entry(i, j, value);
                }
                found += 1;
            }
        }
    }

    if found != expected {
        return Err(ParseError::EntryCount { expected, found });
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_pattern() {
        let doc = "%%MatrixMarket matrix coordinate pattern symmetric\n% comment\n4 4 3\n2 1\n3 2\n4 4\n";
        let (graph, loops) = parse(doc).unwrap().build();
        assert_eq!(loops, 1);
        assert_eq!(graph.node_count(), 3);
        assert!(!graph.contains("3"));
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge("0", "1"));
        assert!(graph.has_edge("1", "2"));
    }

    #[test]
    fn test_coordinate_real_skips_zero_values() {
        let doc = "%%MatrixMarket matrix coordinate real general\n3 3 3\n1 2 0.5\n2 3 0.0\n3 1 -2\n";
        let (graph, _) = parse(doc).unwrap().build();
        assert!(graph.has_edge("0", "1"));
        assert!(!graph.has_edge("1", "2"));
        assert!(graph.has_edge("2", "0"));
    }

    #[test]
    fn test_array_symmetric() {
        // lower triangle of [[0,1,0],[1,0,1],[0,1,0]] column by column
        let doc = "%%MatrixMarket matrix array integer symmetric\n3 3\n0\n1\n0\n0\n1\n0\n";
        let (graph, _) = parse(doc).unwrap().build();
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge("0", "1"));
        assert!(graph.has_edge("1", "2"));
    }

    #[test]
    fn test_rejects_non_square() {
        let doc = "%%MatrixMarket matrix coordinate pattern general\n2 3 0\n";
        assert!(matches!(parse(doc), Err(ParseError::Header(_))));
    }

    #[test]
    fn test_rejects_out_of_range_entry() {
        let doc = "%%MatrixMarket matrix coordinate pattern general\n2 2 1\n3 1\n";
        assert!(matches!(parse(doc), Err(ParseError::OutOfRange { row: 3, .. })));
    }

    #[test]
    fn test_rejects_wrong_entry_count() {
        let doc = "%%MatrixMarket matrix coordinate pattern general\n2 2 2\n1 2\n";
        assert!(matches!(
            parse(doc),
            Err(ParseError::EntryCount {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_diagonal_only_rows_are_not_nodes() {
        let doc = "%%MatrixMarket matrix coordinate pattern symmetric\n2 2 2\n1 1\n2 2\n";
        let (graph, loops) = parse(doc).unwrap().build();
        assert_eq!(loops, 2);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_huge_declared_size_is_not_allocated() {
        let doc = "%%MatrixMarket matrix coordinate pattern general\n100000000000 100000000000 1\n1 2\n";
        let (graph, _) = parse(doc).unwrap().build();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.has_edge("0", "1"));

        let array = "%%MatrixMarket matrix array real general\n1000000 1000000\n1\n";
        assert!(matches!(parse(array), Err(ParseError::EntryCount { found: 1, .. })));

        let overflow = "%%MatrixMarket matrix array real general\n18446744073709551615 18446744073709551615\n";
        assert!(matches!(parse(overflow), Err(ParseError::Header(_))));
    }

    #[test]
    fn test_array_skew_symmetric_positions() {
        let positions: Vec<(usize, usize)> = ArrayCursor::new(3, Symmetry::SkewSymmetric).collect();
        assert_eq!(positions, vec![(1, 0), (2, 0), (2, 1)]);
        assert_eq!(array_entry_count(3, Symmetry::SkewSymmetric), Some(3));
        assert_eq!(array_entry_count(3, Symmetry::Symmetric), Some(6));
    }

    #[test]
    fn test_rejects_complex_field() {
        let doc = "%%MatrixMarket matrix coordinate complex general\n1 1 0\n";
        assert!(matches!(parse(doc), Err(ParseError::UnsupportedField(_))));
    }
}
