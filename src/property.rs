//! Per-vertex property kinds recognized by the decoder.

use crate::PlyError;

/// A vertex property as the binary decoder sees it: a semantic slot plus a storage width.
///
/// The order of kinds in a [`crate::PlyHeader`] is the byte order of every vertex record.
/// `Pad*` kinds are properties without a semantic mapping (normals, confidence, ...);
/// they are skipped but still advance the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Red8,
    Green8,
    Blue8,
    Alpha8,
    Red16,
    Green16,
    Blue16,
    Alpha16,
    X32,
    Y32,
    Z32,
    X64,
    Y64,
    Z64,
    Pad8,
    Pad16,
    Pad32,
    Pad64,
}

impl PropertyKind {
    pub fn size_bytes(&self) -> usize {
        match self {
            PropertyKind::Red8
            | PropertyKind::Green8
            | PropertyKind::Blue8
            | PropertyKind::Alpha8
            | PropertyKind::Pad8 => 1,
            PropertyKind::Red16
            | PropertyKind::Green16
            | PropertyKind::Blue16
            | PropertyKind::Alpha16
            | PropertyKind::Pad16 => 2,
            PropertyKind::X32 | PropertyKind::Y32 | PropertyKind::Z32 | PropertyKind::Pad32 => 4,
            PropertyKind::X64 | PropertyKind::Y64 | PropertyKind::Z64 | PropertyKind::Pad64 => 8,
        }
    }

    /// Semantic kind implied by a property name, at its default width.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "red" => Some(PropertyKind::Red8),
            "green" => Some(PropertyKind::Green8),
            "blue" => Some(PropertyKind::Blue8),
            "alpha" => Some(PropertyKind::Alpha8),
            "x" => Some(PropertyKind::X32),
            "y" => Some(PropertyKind::Y32),
            "z" => Some(PropertyKind::Z32),
            _ => None,
        }
    }

    pub fn is_padding(&self) -> bool {
        matches!(
            self,
            PropertyKind::Pad8 | PropertyKind::Pad16 | PropertyKind::Pad32 | PropertyKind::Pad64
        )
    }

    /// Resolves a `property <type> <name>` declaration.
    ///
    /// The name picks the semantic slot, the type picks the width. A slot is moved to
    /// its same-family variant when one exists at the declared width (`red` + `ushort`
    /// becomes [`PropertyKind::Red16`]); otherwise the widths must already agree.
    /// `line` is only used for the error message.
    pub fn resolve(type_name: &str, name: &str, line: &str) -> Result<Self, PlyError> {
        let width = scalar_width(type_name).ok_or_else(|| PlyError::UnsupportedPropertyType {
            type_name: type_name.to_string(),
        })?;

        let kind = match PropertyKind::from_name(name) {
            None => PropertyKind::padding(width),
            Some(kind) => kind.with_width(width).unwrap_or(kind),
        };

        if kind.size_bytes() != width {
            return Err(PlyError::PropertyTypeMismatch {
                line: line.to_string(),
            });
        }
        Ok(kind)
    }

    fn padding(width: usize) -> Self {
        match width {
            1 => PropertyKind::Pad8,
            2 => PropertyKind::Pad16,
            4 => PropertyKind::Pad32,
            _ => PropertyKind::Pad64,
        }
    }

    /// Same-family variant stored in `width` bytes, if the family has one.
    fn with_width(self, width: usize) -> Option<Self> {
        use PropertyKind::*;
        let kind = match (self, width) {
            (Red8 | Red16, 1) => Red8,
            (Green8 | Green16, 1) => Green8,
            (Blue8 | Blue16, 1) => Blue8,
            (Alpha8 | Alpha16, 1) => Alpha8,
            (Red8 | Red16, 2) => Red16,
            (Green8 | Green16, 2) => Green16,
            (Blue8 | Blue16, 2) => Blue16,
            (Alpha8 | Alpha16, 2) => Alpha16,
            (X32 | X64, 4) => X32,
            (Y32 | Y64, 4) => Y32,
            (Z32 | Z64, 4) => Z32,
            (X32 | X64, 8) => X64,
            (Y32 | Y64, 8) => Y64,
            (Z32 | Z64, 8) => Z64,
            _ => return None,
        };
        Some(kind)
    }
}

/// Storage width of a PLY scalar type token.
pub fn scalar_width(type_name: &str) -> Option<usize> {
    match type_name {
        "char" | "uchar" | "int8" | "uint8" => Some(1),
        "short" | "ushort" | "int16" | "uint16" => Some(2),
        "int" | "uint" | "float" | "int32" | "uint32" | "float32" => Some(4),
        "int64" | "uint64" | "double" | "float64" => Some(8),
        _ => None,
    }
}
