// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Minimal PNG writer for 8-bit truecolor-with-alpha images.
//!
//! Only the subset needed for test assets is produced: a single non-interlaced
//! RGBA8 frame with every scanline stored under filter type 0 (None).
//!
//! # File Layout
//!
//! ```text
//! [89 50 4E 47 0D 0A 1A 0A]                      signature
//! [len=13][IHDR][w][h][8][6][0][0][0][crc]       header
//! [len=n ][IDAT][zlib(scanlines)    ][crc]       data
//! [len=0 ][IEND]                     [crc]       trailer
//! ```
//!
//! Every length and CRC is big-endian. The CRC covers the 4-byte chunk type
//! followed by the payload and never the length field.
//!
//! The scanline stream is `height` rows of `[0x00][width * 4 RGBA bytes]`,
//! compressed as one zlib stream at the best compression level. The output
//! carries no timestamps or other ancillary chunks, so encoding the same
//! buffer twice yields identical bytes.

use bytes::{BufMut, BytesMut};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use crate::error::{AssetError, Result};
use crate::pixel::PixelBuffer;

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Size of the IHDR payload.
pub const IHDR_LEN: usize = 13;

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;
const COMPRESSION_METHOD: u8 = 0;
const FILTER_METHOD: u8 = 0;
const INTERLACE_NONE: u8 = 0;
const FILTER_TYPE_NONE: u8 = 0;

/// Largest payload a chunk length field may declare (`2^31 - 1`).
pub const MAX_CHUNK_LEN: usize = i32::MAX as usize;

/// Length + type + CRC framing around every payload.
const CHUNK_OVERHEAD: usize = 12;

/// Contents of the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits per channel.
    pub bit_depth: u8,
    /// PNG color type (6 = truecolor with alpha).
    pub color_type: u8,
    /// Compression method (0 = deflate).
    pub compression_method: u8,
    /// Filter method (0 = adaptive, five filter types).
    pub filter_method: u8,
    /// Interlace method (0 = none).
    pub interlace_method: u8,
}

impl ImageHeader {
    /// Header for a non-interlaced RGBA8 image.
    #[must_use]
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BIT_DEPTH,
            color_type: COLOR_TYPE_RGBA,
            compression_method: COMPRESSION_METHOD,
            filter_method: FILTER_METHOD,
            interlace_method: INTERLACE_NONE,
        }
    }

    /// Serializes the 13-byte IHDR payload.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; IHDR_LEN] {
        let mut out = [0u8; IHDR_LEN];
        out[0..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..8].copy_from_slice(&self.height.to_be_bytes());
        out[8] = self.bit_depth;
        out[9] = self.color_type;
        out[10] = self.compression_method;
        out[11] = self.filter_method;
        out[12] = self.interlace_method;
        out
    }
}

/// One PNG chunk emitted by this encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// `IHDR`: image dimensions and format.
    Header(ImageHeader),
    /// `IDAT`: the compressed scanline stream.
    Data(Vec<u8>),
    /// `IEND`: empty trailer.
    End,
}

impl Chunk {
    /// The 4-byte ASCII chunk type.
    #[must_use]
    pub fn tag(&self) -> [u8; 4] {
        match self {
            Self::Header(_) => *b"IHDR",
            Self::Data(_) => *b"IDAT",
            Self::End => *b"IEND",
        }
    }

    /// The chunk payload.
    #[must_use]
    pub fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Header(header) => Cow::Owned(header.to_bytes().to_vec()),
            Self::Data(data) => Cow::Borrowed(data.as_slice()),
            Self::End => Cow::Borrowed(&[]),
        }
    }

    /// Total bytes this chunk occupies in the file.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        CHUNK_OVERHEAD + self.payload().len()
    }

    /// Appends `length, type, payload, crc` to `buf`.
    ///
    /// The CRC is computed here from the current payload every time. Payloads
    /// must not exceed [`MAX_CHUNK_LEN`]; [`encode`] checks this before
    /// assembling a file.
    #[allow(clippy::cast_possible_truncation)] // payload.len() <= MAX_CHUNK_LEN
    pub fn write_to(&self, buf: &mut BytesMut) {
        let tag = self.tag();
        let payload = self.payload();
        debug_assert!(payload.len() <= MAX_CHUNK_LEN);

        buf.reserve(CHUNK_OVERHEAD + payload.len());
        buf.put_u32(payload.len() as u32);
        buf.put_slice(&tag);
        buf.put_slice(&payload);
        buf.put_u32(chunk_crc(&tag, &payload));

        log::debug!(
            "PNG: wrote {} chunk ({} byte payload)",
            String::from_utf8_lossy(&tag),
            payload.len()
        );
    }
}

/// CRC-32 (ISO-HDLC, as used by PNG) over `tag` then `payload`.
#[must_use]
pub fn chunk_crc(tag: &[u8; 4], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(tag);
    hasher.update(payload);
    hasher.finalize()
}

/// Lays out the raw scanline stream: each row prefixed with filter type 0.
#[must_use]
pub fn scanlines(buffer: &PixelBuffer) -> Vec<u8> {
    let mut raw = Vec::with_capacity((buffer.stride() + 1) * buffer.height() as usize);
    for row in buffer.rows() {
        raw.push(FILTER_TYPE_NONE);
        raw.extend_from_slice(row);
    }
    raw
}

/// Checks that a payload of `len` bytes fits a chunk length field.
///
/// # Errors
///
/// Returns [`AssetError::ChunkTooLarge`] above [`MAX_CHUNK_LEN`].
pub fn check_chunk_len(len: usize) -> Result<()> {
    if len > MAX_CHUNK_LEN {
        return Err(AssetError::ChunkTooLarge {
            len,
            max: MAX_CHUNK_LEN,
        });
    }
    Ok(())
}

/// Compresses `raw` into a single zlib stream at the best compression level.
///
/// # Errors
///
/// Returns [`AssetError::Compression`] if the compressor fails.
pub fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(raw).map_err(AssetError::Compression)?;
    let compressed = encoder.finish().map_err(AssetError::Compression)?;

    log::debug!(
        "PNG: compressed {} -> {} bytes",
        raw.len(),
        compressed.len()
    );
    Ok(compressed)
}

/// A complete PNG file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
}

impl EncodedImage {
    /// Assembles the signature followed by `chunks` in order.
    #[must_use]
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let total = PNG_SIGNATURE.len() + chunks.iter().map(Chunk::encoded_len).sum::<usize>();
        let mut buf = BytesMut::with_capacity(total);
        buf.put_slice(&PNG_SIGNATURE);
        for chunk in chunks {
            chunk.write_to(&mut buf);
        }
        Self {
            bytes: buf.to_vec(),
        }
    }

    /// The encoded file contents.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the image and returns the file contents.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Byte length of the file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the file has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the file to `path`, replacing anything already there.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed over `path`, so readers never observe a partial file. Missing
    /// parent directories are created. On failure the temporary file is
    /// removed and `path` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Io`] if the directory, temporary file or rename fails.
    pub fn write_atomic(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| AssetError::io(dir, e))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(".png-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode as a plain create, before the umask.
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder
            .tempfile_in(dir)
            .map_err(|e| AssetError::io(dir, e))?;
        tmp.write_all(&self.bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| AssetError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| AssetError::io(path, e.error))?;

        log::info!("wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(())
    }
}

/// Encodes `buffer` as an RGBA8 PNG.
///
/// # Errors
///
/// Returns [`AssetError::Compression`] if the zlib stream cannot be produced
/// and [`AssetError::ChunkTooLarge`] if it does not fit in one IDAT chunk.
pub fn encode(buffer: &PixelBuffer) -> Result<EncodedImage> {
    let header = ImageHeader::rgba8(buffer.width(), buffer.height());
    let idat = compress(&scanlines(buffer))?;
    check_chunk_len(idat.len())?;
    Ok(EncodedImage::from_chunks(&[
        Chunk::Header(header),
        Chunk::Data(idat),
        Chunk::End,
    ]))
}
