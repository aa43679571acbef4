use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{PlyError, PropertyKind};

const BINARY_FORMAT_LINE: &str = "format binary_little_endian 1.0";

/// PLY body encoding. Anything other than little-endian binary is read as ascii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
        }
    }
}

/// The `property list <count_type> <index_type> <name>` line declared for faces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceListDef {
    pub count_type: String,
    pub index_type: String,
    pub name: String,
}

/// Header schema: which body decoder runs and how a vertex record is laid out.
#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: String,
    pub vertex_count: usize,
    pub face_count: usize,
    /// Vertex properties in declared order.
    pub properties: Vec<PropertyKind>,
    pub face_list: Option<FaceListDef>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementMode {
    None,
    Vertex,
    Face,
    Skip,
}

impl PlyHeader {
    /// Parse a PLY header from a reader.
    ///
    /// Reads strictly line by line and stops right after `end_header`. Returns the header
    /// and the number of bytes it occupied, line terminators included.
    pub fn parse<R: BufRead>(mut reader: R) -> Result<(Self, usize), PlyError> {
        let mut line = String::new();
        let mut bytes_read = 0;

        bytes_read += reader.read_line(&mut line)?;
        let magic = strip_terminator(&line);
        if magic != "ply" {
            return Err(PlyError::BadMagic {
                found: magic.to_string(),
            });
        }

        line.clear();
        let line_bytes = reader.read_line(&mut line)?;
        if line_bytes == 0 {
            return Err(PlyError::InvalidHeader(
                "Unexpected end of file".to_string(),
            ));
        }
        bytes_read += line_bytes;
        let format_line = strip_terminator(&line);
        let format = if format_line == BINARY_FORMAT_LINE {
            PlyFormat::BinaryLittleEndian
        } else {
            PlyFormat::Ascii
        };
        let version = format_line
            .split_whitespace()
            .nth(2)
            .unwrap_or_default()
            .to_string();

        let mut header = PlyHeader {
            format,
            version,
            vertex_count: 0,
            face_count: 0,
            properties: Vec::new(),
            face_list: None,
            comments: Vec::new(),
            obj_info: Vec::new(),
        };
        let mut mode = ElementMode::None;

        loop {
            line.clear();
            let line_bytes = reader.read_line(&mut line)?;
            if line_bytes == 0 {
                return Err(PlyError::InvalidHeader(
                    "Unexpected end of file".to_string(),
                ));
            }
            bytes_read += line_bytes;

            let line = strip_terminator(&line);
            if line == "end_header" {
                break;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some(&keyword) = parts.first() else {
                continue;
            };

            match keyword {
                "comment" => header.comments.push(parts[1..].join(" ")),
                "obj_info" => header.obj_info.push(parts[1..].join(" ")),
                "element" => {
                    if parts.len() < 3 {
                        return Err(PlyError::InvalidHeader(format!(
                            "Invalid element line: {line}"
                        )));
                    }
                    let count = parts[2].parse::<usize>().map_err(|_| {
                        PlyError::InvalidHeader(format!("Invalid element count: {}", parts[2]))
                    })?;

                    mode = match parts[1] {
                        "vertex" => {
                            header.vertex_count = count;
                            ElementMode::Vertex
                        }
                        "face" => {
                            header.face_count = count;
                            ElementMode::Face
                        }
                        _ => ElementMode::Skip,
                    };
                    debug!(element = parts[1], count, "entering element");
                }
                "property" => header.parse_property(mode, &parts, line)?,
                _ => debug!("ignoring header line: {line}"),
            }
        }

        Ok((header, bytes_read))
    }

    fn parse_property(
        &mut self,
        mode: ElementMode,
        parts: &[&str],
        line: &str,
    ) -> Result<(), PlyError> {
        if parts.len() < 3 {
            return Err(PlyError::InvalidHeader(format!(
                "Invalid property line: {line}"
            )));
        }
        let is_list = parts[1] == "list";

        match mode {
            ElementMode::None => Err(PlyError::InvalidHeader(
                "Property without element".to_string(),
            )),
            ElementMode::Skip => {
                debug!("skipping property of unsupported element: {line}");
                Ok(())
            }
            ElementMode::Vertex if is_list => {
                warn!("list properties on vertices are not supported, ignoring: {line}");
                Ok(())
            }
            ElementMode::Vertex => {
                let kind = PropertyKind::resolve(parts[1], parts[2], line)?;
                debug!(?kind, "vertex property");
                self.properties.push(kind);
                Ok(())
            }
            ElementMode::Face if is_list && parts.len() >= 5 => {
                self.face_list = Some(FaceListDef {
                    count_type: parts[2].to_string(),
                    index_type: parts[3].to_string(),
                    name: parts[4].to_string(),
                });
                Ok(())
            }
            ElementMode::Face => {
                debug!("ignoring face property: {line}");
                Ok(())
            }
        }
    }

    pub fn is_binary(&self) -> bool {
        self.format == PlyFormat::BinaryLittleEndian
    }

    /// Size in bytes of one binary vertex record.
    pub fn vertex_size(&self) -> usize {
        self.properties.iter().map(PropertyKind::size_bytes).sum()
    }
}

fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}
