//! Minimal PNG reader for validating the encoder.
//! Only what the encoder emits is supported: RGBA8, non-interlaced,
//! filter type 0 on every row. Anything else is reported as an error.
//!
//! Lengths and CRCs are big-endian per the PNG specification.

#![allow(dead_code)]

use flate2::read::ZlibDecoder;
use std::io::Read;

pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// One parsed chunk
#[derive(Debug, Clone)]
pub struct RawChunk {
    pub tag: [u8; 4],
    pub payload: Vec<u8>,
    pub crc: u32,
}

/// Decoded IHDR fields: (width, height, bit depth, color type, compression, filter, interlace)
pub type Header = (u32, u32, u8, u8, u8, u8, u8);

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Split a PNG file into chunks, verifying the signature and every CRC
pub fn parse_chunks(data: &[u8]) -> Result<Vec<RawChunk>, String> {
    if data.len() < 8 || data[..8] != SIGNATURE {
        return Err("bad signature".to_string());
    }

    let mut chunks = Vec::new();
    let mut offset = 8;
    while offset < data.len() {
        if data.len() - offset < 12 {
            return Err(format!("truncated chunk header at {offset}"));
        }
        let len = be_u32(&data[offset..]) as usize;
        let end = offset + 12 + len;
        if end > data.len() {
            return Err(format!("chunk at {offset} overruns file"));
        }
        let tag: [u8; 4] = data[offset + 4..offset + 8].try_into().unwrap();
        let payload = data[offset + 8..offset + 8 + len].to_vec();
        let crc = be_u32(&data[offset + 8 + len..]);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&tag);
        hasher.update(&payload);
        if hasher.finalize() != crc {
            return Err(format!(
                "bad CRC on {} chunk",
                String::from_utf8_lossy(&tag)
            ));
        }

        chunks.push(RawChunk { tag, payload, crc });
        offset = end;
    }
    Ok(chunks)
}

/// Decode a 13-byte IHDR payload
pub fn parse_header(payload: &[u8]) -> Result<Header, String> {
    if payload.len() != 13 {
        return Err(format!("IHDR payload is {} bytes", payload.len()));
    }
    Ok((
        be_u32(&payload[0..4]),
        be_u32(&payload[4..8]),
        payload[8],
        payload[9],
        payload[10],
        payload[11],
        payload[12],
    ))
}

/// Inflate the concatenated IDAT payloads
pub fn inflate(idat: &[u8]) -> Result<Vec<u8>, String> {
    let mut decoder = ZlibDecoder::new(idat);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| format!("IDAT decompression failed: {e}"))?;
    Ok(raw)
}

/// Strip the per-row filter bytes (type 0 only)
pub fn unfilter(raw: &[u8], width: u32, height: u32) -> Result<Vec<u8>, String> {
    let stride = width as usize * 4;
    if raw.len() != (stride + 1) * height as usize {
        return Err(format!(
            "scanline stream is {} bytes, expected {}",
            raw.len(),
            (stride + 1) * height as usize
        ));
    }
    let mut pixels = Vec::with_capacity(stride * height as usize);
    for row in raw.chunks_exact(stride + 1) {
        if row[0] != 0 {
            return Err(format!("unsupported filter type {}", row[0]));
        }
        pixels.extend_from_slice(&row[1..]);
    }
    Ok(pixels)
}

/// Full decode: returns the header and the RGBA8 pixels
pub fn decode_png(data: &[u8]) -> Result<(Header, Vec<u8>), String> {
    let chunks = parse_chunks(data)?;
    let tags: Vec<&[u8; 4]> = chunks.iter().map(|c| &c.tag).collect();
    if tags.first() != Some(&b"IHDR") || tags.last() != Some(&b"IEND") {
        return Err(format!("unexpected chunk order: {tags:?}"));
    }
    let header = parse_header(&chunks[0].payload)?;
    if (header.2, header.3, header.6) != (8, 6, 0) {
        return Err(format!("unsupported format: {header:?}"));
    }

    let idat: Vec<u8> = chunks
        .iter()
        .filter(|c| &c.tag == b"IDAT")
        .flat_map(|c| c.payload.iter().copied())
        .collect();
    let raw = inflate(&idat)?;
    let pixels = unfilter(&raw, header.0, header.1)?;
    Ok((header, pixels))
}
