//! ASCII STL grammar:
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//! endsolid name
//! ```
//!
//! Tokens are split on any whitespace, so line layout does not matter: a
//! whole file on one line, CR-only line endings and names on their own line
//! all decode. Names after `solid` and `endsolid` run up to the next
//! keyword. Keywords are case-insensitive. Several `solid` blocks in one
//! stream are concatenated. Line numbers are tracked for error messages only.

use shared::{ParseError, RawMesh, Triangle, Vec3};

/// Decode an ASCII STL stream.
pub fn parse_ascii(bytes: &[u8]) -> Result<RawMesh, ParseError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
    let mut tokens = Tokens::new(text);
    let mut triangles = Vec::new();

    tokens.expect_keyword("solid")?;
    loop {
        tokens.skip_until(&["facet", "endsolid"]);

        loop {
            let (line, tok) = tokens.next_or_eof("`facet` or `endsolid`")?;
            if is_keyword(tok, "facet") {
                triangles.push(parse_facet(&mut tokens)?);
            } else if is_keyword(tok, "endsolid") {
                break;
            } else {
                return Err(malformed(
                    line,
                    format!("expected `facet` or `endsolid`, found `{tok}`"),
                ));
            }
        }

        tokens.skip_until(&["solid"]);
        if tokens.peek().is_none() {
            break;
        }
        tokens.expect_keyword("solid")?;
    }

    if triangles.is_empty() {
        return Err(ParseError::EmptyMesh);
    }
    Ok(RawMesh::new(triangles))
}

fn parse_facet(tokens: &mut Tokens<'_>) -> Result<Triangle, ParseError> {
    tokens.expect_keyword("normal")?;
    let normal = tokens.expect_vec3()?;
    tokens.expect_keyword("outer")?;
    tokens.expect_keyword("loop")?;

    let mut vertices = [[0.0f32; 3]; 3];
    for vertex in &mut vertices {
        tokens.expect_keyword("vertex")?;
        *vertex = tokens.expect_vec3()?;
    }

    tokens.expect_keyword("endloop")?;
    tokens.expect_keyword("endfacet")?;
    Ok(Triangle { normal, vertices })
}

fn is_keyword(tok: &str, keyword: &str) -> bool {
    tok.eq_ignore_ascii_case(keyword)
}

fn malformed(line: usize, reason: String) -> ParseError {
    ParseError::MalformedAscii { line, reason }
}

// ── Tokenizer ────────────────────────────────────────────────

/// Whitespace tokenizer that remembers 1-based line numbers
struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    peeked: Option<(usize, &'a str)>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            peeked: None,
            last_line: 1,
        }
    }

    fn next_token(&mut self) -> Option<(usize, &'a str)> {
        if let Some(tok) = self.peeked.take() {
            return Some(tok);
        }

        let bytes = self.text.as_bytes();
        while let Some(&b) = bytes.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            // LF, CRLF and lone CR each end one line
            if b == b'\n' || (b == b'\r' && bytes.get(self.pos + 1) != Some(&b'\n')) {
                self.line += 1;
            }
            self.pos += 1;
        }
        if self.pos >= bytes.len() {
            return None;
        }

        let start = self.pos;
        while bytes.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.last_line = self.line;
        // Split points are ASCII whitespace, hence char boundaries
        Some((self.line, &self.text[start..self.pos]))
    }

    fn peek(&mut self) -> Option<(usize, &'a str)> {
        if self.peeked.is_none() {
            self.peeked = self.next_token();
        }
        self.peeked
    }

    /// Drop name tokens until one of `keywords` (or the end) is next
    fn skip_until(&mut self, keywords: &[&str]) {
        while let Some((_, tok)) = self.peek() {
            if keywords.iter().any(|k| is_keyword(tok, k)) {
                break;
            }
            self.next_token();
        }
    }

    fn next_or_eof(&mut self, expected: &str) -> Result<(usize, &'a str), ParseError> {
        self.next_token().ok_or_else(|| {
            malformed(
                self.last_line,
                format!("unexpected end of file, expected {expected}"),
            )
        })
    }

    /// Consume `keyword` and return its line
    fn expect_keyword(&mut self, keyword: &str) -> Result<usize, ParseError> {
        let (line, tok) = self.next_or_eof(&format!("`{keyword}`"))?;
        if is_keyword(tok, keyword) {
            Ok(line)
        } else {
            Err(malformed(
                line,
                format!("expected `{keyword}`, found `{tok}`"),
            ))
        }
    }

    fn expect_f32(&mut self) -> Result<f32, ParseError> {
        let (line, tok) = self.next_or_eof("a number")?;
        tok.parse::<f32>()
            .map_err(|_| malformed(line, format!("expected a number, found `{tok}`")))
    }

    fn expect_vec3(&mut self) -> Result<Vec3, ParseError> {
        Ok([self.expect_f32()?, self.expect_f32()?, self.expect_f32()?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_FACET: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    #[test]
    fn test_single_facet() {
        let mesh = parse_ascii(ONE_FACET.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.triangles[0].vertices[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_keywords_case_insensitive_and_scientific() {
        let text = "SOLID\nFACET NORMAL 0 0 0\nOUTER LOOP\nVERTEX 1e-3 0 0\nVertex 0 2.5E1 0\nvertex 0 0 -3\nENDLOOP\nENDFACET\nENDSOLID\n";
        let mesh = parse_ascii(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangles[0].vertices[0], [1e-3, 0.0, 0.0]);
        assert_eq!(mesh.triangles[0].vertices[1], [0.0, 25.0, 0.0]);
    }

    #[test]
    fn test_multi_word_solid_name() {
        let text = ONE_FACET.replace("solid tri\n", "solid my fancy part\n");
        assert_eq!(parse_ascii(text.as_bytes()).unwrap().triangle_count(), 1);
    }

    #[test]
    fn test_two_solids_concatenate() {
        let text = format!("{ONE_FACET}{ONE_FACET}");
        assert_eq!(parse_ascii(text.as_bytes()).unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_missing_vertex_reports_line() {
        let text = ONE_FACET.replace("      vertex 0 1 0\n", "");
        let err = parse_ascii(text.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedAscii {
                line: 6,
                reason: "expected `vertex`, found `endloop`".to_string()
            }
        );
    }

    #[test]
    fn test_bad_number() {
        let text = ONE_FACET.replace("vertex 1 0 0", "vertex 1 zero 0");
        let err = parse_ascii(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedAscii { line: 5, .. }));
    }

    #[test]
    fn test_missing_endsolid() {
        let text = ONE_FACET.replace("endsolid tri\n", "");
        let err = parse_ascii(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedAscii { line: 8, .. }));
    }

    #[test]
    fn test_single_line_stream() {
        let text = ONE_FACET.split_whitespace().collect::<Vec<_>>().join(" ");
        let mesh = parse_ascii(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles[0].vertices[2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_cr_only_line_endings() {
        let text = ONE_FACET.replace('\n', "\r");
        assert_eq!(parse_ascii(text.as_bytes()).unwrap().triangle_count(), 1);

        // Lines are still counted for errors
        let broken = text.replace("vertex 1 0 0", "vertex 1 zero 0");
        let err = parse_ascii(broken.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedAscii { line: 5, .. }));
    }

    #[test]
    fn test_endsolid_name_on_next_line() {
        let text = ONE_FACET.replace("endsolid tri\n", "endsolid\ntri\n");
        assert_eq!(parse_ascii(text.as_bytes()).unwrap().triangle_count(), 1);

        let twice = format!("{text}{text}");
        assert_eq!(parse_ascii(twice.as_bytes()).unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let text = format!("\u{FEFF}{ONE_FACET}");
        assert_eq!(parse_ascii(text.as_bytes()).unwrap().triangle_count(), 1);
    }

    #[test]
    fn test_crlf_counts_one_line() {
        let text = ONE_FACET.replace('\n', "\r\n").replace("vertex 1 0 0", "vertex 1 zero 0");
        let err = parse_ascii(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedAscii { line: 5, .. }));
    }

    #[test]
    fn test_no_facets_is_empty() {
        assert_eq!(
            parse_ascii(b"solid empty\nendsolid empty\n"),
            Err(ParseError::EmptyMesh)
        );
    }
}
