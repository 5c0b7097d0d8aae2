//! Binary PPM (P6) format support.
//!
//! Layout:
//!
//! ```text
//! P6\n
//! <width> <height>\n
//! <max>\n
//! width*height*3 raw bytes, row-major, R G B
//! ```
//!
//! Comments, ASCII bodies and 16-bit samples are not supported. The header
//! is parsed strictly (see [`read_header`]), so every accepted input
//! decodes and re-encodes byte for byte.

use crate::{ImageReader, ImageWriter, IoError, IoResult};
use pixfork_core::{alloc_pixels, pixel_count, Error as CoreError, Image, Rgb};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, trace};

const PPM_MAGIC: &str = "P6";

/// Parsed three-line header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Maximum channel value, `1..=255`
    pub max_value: u32,
}

impl Header {
    /// Number of body bytes that follow the header.
    pub fn body_len(&self) -> IoResult<usize> {
        let count = pixel_count(self.width, self.height)
            .map_err(|e| IoError::format(e.to_string()))?;
        count
            .checked_mul(3)
            .ok_or_else(|| IoError::format("pixel body size overflows"))
    }
}

/// Reads a PPM file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    trace!(path = %path.display(), "ppm::read");
    let file = File::open(path)?;
    read_from(BufReader::new(file))
}

/// Writes a PPM file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), "ppm::write");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Decodes an image from an in-memory byte buffer.
pub fn decode(data: &[u8]) -> IoResult<Image> {
    read_from(data)
}

/// Encodes an image into a new byte buffer.
pub fn encode(image: &Image) -> IoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(image.len() * 3 + 32);
    write_to(&mut out, image)?;
    Ok(out)
}

/// Decodes an image from any buffered reader.
///
/// The reader must hold exactly one image; bytes after the pixel body are a
/// format error.
pub fn read_from<R: BufRead>(mut reader: R) -> IoResult<Image> {
    let header = read_header(&mut reader)?;
    let body_len = header.body_len()?;
    debug!(
        width = header.width,
        height = header.height,
        max_value = header.max_value,
        "Decoded PPM header"
    );

    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(body_len)
        .map_err(|e| CoreError::allocation_failed(body_len / 3, e.to_string()))?;
    (&mut reader).take(body_len as u64).read_to_end(&mut bytes)?;
    if bytes.len() < body_len {
        return Err(IoError::format(format!(
            "truncated pixel data: expected {} bytes, got {}",
            body_len,
            bytes.len()
        )));
    }

    let mut extra = [0u8; 1];
    if reader.read(&mut extra)? != 0 {
        return Err(IoError::format("unexpected trailing bytes after pixel data"));
    }

    let mut pixels = alloc_pixels(body_len / 3)?;
    pixels.extend(bytes.chunks_exact(3).map(|c| Rgb::new(c[0], c[1], c[2])));

    Image::from_pixels(header.width, header.height, header.max_value, pixels).map_err(|e| match e {
        CoreError::AllocationFailed { .. } => IoError::Image(e),
        other => IoError::format(other.to_string()),
    })
}

/// Encodes an image into any writer.
pub fn write_to<W: Write>(writer: &mut W, image: &Image) -> IoResult<()> {
    write!(
        writer,
        "{}\n{} {}\n{}\n",
        PPM_MAGIC,
        image.width(),
        image.height(),
        image.max_value()
    )?;

    let mut scanline = Vec::with_capacity(image.width() as usize * 3);
    for row in image.rows() {
        scanline.clear();
        for p in row {
            scanline.extend_from_slice(&[p.r, p.g, p.b]);
        }
        writer.write_all(&scanline)?;
    }
    Ok(())
}

/// Parses the magic, dimension and max-value lines.
///
/// The header must be canonical: each line ends in a bare `\n`, the magic
/// is exactly `P6`, width and height are separated by one space, and every
/// number is plain decimal with no sign or leading zero. Anything else is a
/// format error, so every accepted file re-encodes to the same bytes.
pub fn read_header<R: BufRead>(reader: &mut R) -> IoResult<Header> {
    let magic = read_header_line(reader)?
        .ok_or_else(|| IoError::format("missing magic number"))?;
    if magic.is_empty() {
        return Err(IoError::format("missing magic number"));
    }
    if magic != PPM_MAGIC {
        return Err(IoError::format(format!("unsupported magic number '{}'", magic)));
    }

    let dims = read_header_line(reader)?
        .ok_or_else(|| IoError::format("missing width/height line"))?;
    let (width, height) = parse_dimensions(&dims)?;

    let max_line = read_header_line(reader)?
        .ok_or_else(|| IoError::format("missing maximum channel value"))?;
    let max_value = parse_max_value(&max_line)?;

    Ok(Header {
        width,
        height,
        max_value,
    })
}

/// Reads one `\n`-terminated header line without its terminator; `None` at
/// end of input.
fn read_header_line<R: BufRead>(reader: &mut R) -> IoResult<Option<String>> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }
    if raw.pop() != Some(b'\n') {
        return Err(IoError::format("header line is not terminated by a newline"));
    }
    if !raw.iter().all(|&b| b.is_ascii_graphic() || b == b' ') {
        return Err(IoError::format(format!(
            "header line '{}' contains control characters",
            String::from_utf8_lossy(&raw).escape_default()
        )));
    }
    // Only printable ASCII remains.
    Ok(Some(raw.into_iter().map(char::from).collect()))
}

fn parse_dimensions(line: &str) -> IoResult<(u32, u32)> {
    let (w, h) = line
        .split_once(' ')
        .ok_or_else(|| IoError::format(format!("invalid dimension line '{}'", line)))?;
    let width = parse_positive(w, "width")?;
    let height = parse_positive(h, "height")?;
    Ok((width, height))
}

/// Parses a canonical decimal: ASCII digits only, no leading zero.
fn parse_decimal(token: &str, what: &str) -> IoResult<u32> {
    let canonical = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if !canonical {
        return Err(IoError::format(format!("invalid {} '{}'", what, token)));
    }
    token
        .parse()
        .map_err(|_| IoError::format(format!("{} {} is too large", what, token)))
}

fn parse_positive(token: &str, what: &str) -> IoResult<u32> {
    let value = parse_decimal(token, what)?;
    if value == 0 {
        return Err(IoError::format(format!("{} must be positive, got 0", what)));
    }
    Ok(value)
}

fn parse_max_value(line: &str) -> IoResult<u32> {
    let value = parse_decimal(line, "maximum channel value")?;
    if value == 0 || value > 255 {
        return Err(IoError::format(format!(
            "maximum channel value {} outside 1..=255",
            value
        )));
    }
    Ok(value)
}

/// PPM reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpmReader;

impl PpmReader {
    /// Creates a reader.
    pub fn new() -> Self {
        Self
    }
}

impl ImageReader for PpmReader {
    fn read<P: AsRef<Path>>(&self, path: P) -> IoResult<Image> {
        read(path)
    }

    fn read_from_memory(&self, data: &[u8]) -> IoResult<Image> {
        decode(data)
    }
}

/// PPM writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpmWriter;

impl PpmWriter {
    /// Creates a writer.
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for PpmWriter {
    fn write<P: AsRef<Path>>(&self, path: P, image: &Image) -> IoResult<()> {
        write(path, image)
    }

    fn write_to_memory(&self, image: &Image) -> IoResult<Vec<u8>> {
        encode(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(header: &str, body: &[u8]) -> Vec<u8> {
        let mut data = header.as_bytes().to_vec();
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_decode_two_pixels() {
        let data = file("P6\n2 1\n255\n", &[10, 20, 30, 200, 150, 100]);
        let img = decode(&data).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.max_value(), 255);
        assert_eq!(img.pixels(), &[Rgb::new(10, 20, 30), Rgb::new(200, 150, 100)]);
    }

    #[test]
    fn test_high_bytes_are_unsigned() {
        let data = file("P6\n1 1\n255\n", &[0xFF, 0x80, 0x7F]);
        let img = decode(&data).unwrap();
        assert_eq!(img.pixel(0, 0), Rgb::new(255, 128, 127));
    }

    #[test]
    fn test_roundtrip_is_byte_identical() {
        let body: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7 % 256) as u8).collect();
        let data = file("P6\n4 3\n255\n", &body);
        let img = decode(&data).unwrap();
        assert_eq!(encode(&img).unwrap(), data);
    }

    #[test]
    fn test_non_canonical_headers_rejected() {
        let headers = [
            "P6\n2  1\n255\n",
            "P6\n+2 1\n255\n",
            "P6\n02 1\n255\n",
            "P6\n2 1\n0255\n",
            " P6 \n2 1\n255\n",
            "P6 \n2 1\n255\n",
            "P6\n2\t1\n255\n",
            "P6\n 2 1\n255\n",
            "P6\n2 1 \n255\n",
            "P6\r\n2 1\r\n255\r\n",
            "P6\n2 1\n+255\n",
        ];
        let body = [10, 20, 30, 200, 150, 100];
        for header in headers {
            let data = file(header, &body);
            match decode(&data) {
                Err(err) => assert!(err.is_format_error(), "{header:?}: {err}"),
                Ok(img) => assert_eq!(encode(&img).unwrap(), data, "{header:?}"),
            }
        }
    }

    #[test]
    fn test_accepted_headers_roundtrip() {
        for header in ["P6\n2 1\n255\n", "P6\n2 1\n200\n", "P6\n1 2\n201\n"] {
            let data = file(header, &[10, 20, 30, 200, 150, 100]);
            let img = decode(&data).unwrap();
            assert_eq!(encode(&img).unwrap(), data, "{header:?}");
        }
    }

    #[test]
    fn test_oversized_dimension_rejected() {
        let err = decode(&file("P6\n4294967296 1\n255\n", &[])).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_missing_magic() {
        assert!(decode(b"").unwrap_err().is_format_error());
        assert!(decode(b"\n1 1\n255\n\x01\x02\x03").unwrap_err().is_format_error());
    }

    #[test]
    fn test_unsupported_magic() {
        let err = decode(&file("P3\n1 1\n255\n", &[1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("unsupported magic"));
    }

    #[test]
    fn test_non_positive_dimensions() {
        for header in ["P6\n0 1\n255\n", "P6\n1 0\n255\n", "P6\n-2 1\n255\n"] {
            let err = decode(&file(header, &[])).unwrap_err();
            assert!(err.is_format_error(), "{header:?}: {err}");
        }
    }

    #[test]
    fn test_malformed_dimension_line() {
        for header in ["P6\n1\n255\n", "P6\n1 2 3\n255\n", "P6\na b\n255\n"] {
            assert!(decode(&file(header, &[])).unwrap_err().is_format_error());
        }
    }

    #[test]
    fn test_max_value_range() {
        assert!(decode(&file("P6\n1 1\n0\n", &[0, 0, 0])).unwrap_err().is_format_error());
        assert!(decode(&file("P6\n1 1\n65535\n", &[0; 6])).unwrap_err().is_format_error());
        assert!(decode(&file("P6\n1 1\n", &[])).unwrap_err().is_format_error());
    }

    #[test]
    fn test_truncated_body() {
        let err = decode(&file("P6\n2 2\n255\n", &[0; 11])).unwrap_err();
        assert!(err.to_string().contains("expected 12 bytes, got 11"));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let err = decode(&file("P6\n1 1\n255\n", &[1, 2, 3, 4])).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_channel_above_max_rejected() {
        let err = decode(&file("P6\n1 1\n100\n", &[1, 101, 3])).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_body_may_contain_newlines() {
        let data = file("P6\n2 1\n255\n", &[b'\n', b'\n', b'\n', 10, 13, 10]);
        let img = decode(&data).unwrap();
        assert_eq!(img.pixel(0, 0), Rgb::grey(10));
        assert_eq!(encode(&img).unwrap(), data);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ramp.ppm");
        let img = Image::from_fn(5, 4, 200, |x, y| Rgb::new((x * 40) as u8, (y * 50) as u8, 7)).unwrap();

        PpmWriter::new().write(&path, &img).unwrap();
        let loaded = PpmReader::new().read(&path).unwrap();
        assert_eq!(loaded, img);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(PpmWriter::new().write_to_memory(&img).unwrap(), bytes);
        assert_eq!(PpmReader::new().read_from_memory(&bytes).unwrap(), img);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(dir.path().join("absent.ppm")).unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }
}
