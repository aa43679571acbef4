use std::io::BufRead;

use tracing::warn;

use super::{DecodeWarning, RawGeometry};
use crate::{PlyError, PlyHeader};

/// Lines with at most this many tokens (faces, blanks) are not vertex lines.
const MAX_NON_VERTEX_TOKENS: usize = 6;

/// Decode an ascii body.
///
/// Columns are fixed: x y z in tokens 0..3, red green blue in tokens 6..9. Lines that
/// fail to parse are skipped and recorded as warnings; only stream errors are fatal.
pub(crate) fn decode<R: BufRead>(
    mut reader: R,
    header: &PlyHeader,
) -> Result<RawGeometry, PlyError> {
    let mut geometry = RawGeometry::with_capacity(header.vertex_count, 0);
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(&buf);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() <= MAX_NON_VERTEX_TOKENS {
            continue;
        }

        match parse_vertex(&tokens) {
            Ok((position, color)) => geometry.push_point(position, color),
            Err(message) => {
                warn!("skipping malformed line {line_number}: {}", line.trim_end());
                geometry.warnings.push(DecodeWarning {
                    line: line_number,
                    message,
                });
            }
        }
    }

    Ok(geometry)
}

fn parse_vertex(tokens: &[&str]) -> Result<([f32; 3], [u8; 3]), String> {
    let float = |i: usize| -> Result<f32, String> {
        let token = tokens.get(i).ok_or_else(|| format!("missing column {i}"))?;
        let value = token
            .parse::<f32>()
            .map_err(|e| format!("column {i} '{token}': {e}"))?;
        if !value.is_finite() {
            return Err(format!("column {i} '{token}': not a finite number"));
        }
        Ok(value)
    };
    let byte = |i: usize| -> Result<u8, String> {
        let token = tokens.get(i).ok_or_else(|| format!("missing column {i}"))?;
        token
            .parse::<u8>()
            .map_err(|e| format!("column {i} '{token}': {e}"))
    };

    Ok((
        [float(0)?, float(1)?, float(2)?],
        [byte(6)?, byte(7)?, byte(8)?],
    ))
}
