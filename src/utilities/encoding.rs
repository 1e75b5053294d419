//! Material map serialization
//!
//! The on-wire contract for material state round-trips: a flat run of
//! single-precision floats, `[tag, width, height, (ε,µ,σ)…]` in row-major
//! order, little-endian when byte-packed and optionally deflate-compressed
//! for transport. A legacy untagged 2-channel layout `[width, height,
//! (ε,µ)…]` (conductivity defaulted to zero) remains decodable; the sign of
//! the first float discriminates the two formats.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::domain::material::{Material, CH_EPS, CH_MU, CH_SIGMA};
use crate::engine::array::VectorField;
use crate::Error;

/// Version sentinel of the 3-channel layout. Legacy payloads start with
/// their width instead, which is always >= 1.
const VERSION_TAG: f32 = -3.0;

/// A decoded material map, detached from any simulation session.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialMap {
    pub width: usize,
    pub height: usize,
    /// Per-cell (ε, µ, σ) triples
    pub cells: VectorField,
}

impl MaterialMap {
    /// A map with every cell set to the same material
    pub fn uniform(width: usize, height: usize, material: Material) -> Self {
        Self {
            width,
            height,
            cells: VectorField::from_sample(width, height, material.as_sample()),
        }
    }

    /// Encode to the flat float layout (current, 3-channel format)
    pub fn encode(&self) -> Vec<f32> {
        let mut floats = Vec::with_capacity(3 + self.width * self.height * 3);
        floats.push(VERSION_TAG);
        floats.push(self.width as f32);
        floats.push(self.height as f32);
        for y in 0..self.height {
            for x in 0..self.width {
                floats.push(self.cells.data[[x, y, CH_EPS]]);
                floats.push(self.cells.data[[x, y, CH_MU]]);
                floats.push(self.cells.data[[x, y, CH_SIGMA]]);
            }
        }
        floats
    }

    /// Decode either the tagged 3-channel layout or the legacy untagged
    /// 2-channel layout.
    pub fn decode(floats: &[f32]) -> Result<Self, Error> {
        let first = *floats
            .first()
            .ok_or_else(|| Error::CorruptMaterialMap("empty payload".into()))?;

        if first < 0.0 {
            let version = -first as i32;
            if version != 3 {
                return Err(Error::UnsupportedVersion(version));
            }
            let (width, height) = read_dimensions(floats.get(1), floats.get(2))?;
            Self::decode_cells(&floats[3..], width, height, 3)
        } else {
            let (width, height) = read_dimensions(floats.first(), floats.get(1))?;
            Self::decode_cells(&floats[2..], width, height, 2)
        }
    }

    fn decode_cells(
        body: &[f32],
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<Self, Error> {
        let expected = width * height * channels;
        if body.len() != expected {
            return Err(Error::CorruptMaterialMap(format!(
                "expected {} cell values for {}x{}, got {}",
                expected,
                width,
                height,
                body.len()
            )));
        }

        let mut cells = VectorField::zeros(width, height);
        for y in 0..height {
            for x in 0..width {
                let at = (y * width + x) * channels;
                let eps = body[at];
                let mu = body[at + 1];
                let sigma = if channels == 3 { body[at + 2] } else { 0.0 };

                if !eps.is_finite() || !mu.is_finite() || !sigma.is_finite() {
                    return Err(Error::CorruptMaterialMap(format!(
                        "non-finite material value at cell ({x},{y})"
                    )));
                }
                if eps <= 0.0 || mu <= 0.0 || sigma < 0.0 {
                    return Err(Error::CorruptMaterialMap(format!(
                        "material value out of range at cell ({x},{y})"
                    )));
                }

                cells.set_cell(x, y, [eps, mu, sigma]);
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Byte-pack the float layout, little-endian
    pub fn to_bytes(&self) -> Vec<u8> {
        let floats = self.encode();
        let mut bytes = Vec::with_capacity(floats.len() * 4);
        for value in floats {
            // Writing into a Vec cannot fail
            bytes.write_f32::<LittleEndian>(value).unwrap();
        }
        bytes
    }

    /// Decode from little-endian packed bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() % 4 != 0 {
            return Err(Error::CorruptMaterialMap(format!(
                "byte length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        let mut cursor = bytes;
        let mut floats = Vec::with_capacity(bytes.len() / 4);
        while !cursor.is_empty() {
            floats.push(cursor.read_f32::<LittleEndian>()?);
        }
        Self::decode(&floats)
    }

    /// Byte-pack and deflate-compress for transport
    pub fn to_deflate(&self) -> Result<Vec<u8>, Error> {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.to_bytes())?;
        Ok(encoder.finish()?)
    }

    /// Inflate and decode a transport payload
    pub fn from_deflate(bytes: &[u8]) -> Result<Self, Error> {
        let mut decoder = DeflateDecoder::new(bytes);
        let mut raw = Vec::new();
        decoder.read_to_end(&mut raw)?;
        Self::from_bytes(&raw)
    }
}

fn read_dimensions(width: Option<&f32>, height: Option<&f32>) -> Result<(usize, usize), Error> {
    let (&width, &height) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(Error::CorruptMaterialMap("truncated header".into())),
    };
    for dim in [width, height] {
        if !dim.is_finite() || dim < 1.0 || dim.fract() != 0.0 {
            return Err(Error::CorruptMaterialMap(format!(
                "bad dimension value {dim}"
            )));
        }
    }
    Ok((width as usize, height as usize))
}
