// src/forms.rs
use astra::Request;
use std::collections::HashMap;
use std::io::Read;

use crate::errors::ServerError;
use crate::storage::MAX_UPLOAD_BYTES;

/// Form posts are small; only uploads get the larger limit.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

/// Decode `a=1&b=two+words` pairs. Later keys win.
pub fn parse_urlencoded(raw: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(raw).into_owned().collect()
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| parse_urlencoded(q.as_bytes()))
        .unwrap_or_default()
}

/// Read the request body, failing with BadRequest past `limit` bytes.
pub fn read_body(req: &mut Request, limit: usize) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("could not read body: {e}")))?;

    if buf.len() > limit {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(buf)
}

pub fn parse_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let body = read_body(req, MAX_FORM_BYTES)?;
    Ok(parse_urlencoded(&body))
}

pub fn read_upload(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    read_body(req, MAX_UPLOAD_BYTES)
}

/// An uploaded file: the name the browser sent and its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Value of one `name=value` parameter in a Content-Disposition line.
/// Separators inside a quoted value are part of the value.
fn disposition_param(line: &str, name: &str) -> Option<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ';' if !quoted => params.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    params.push(current);

    params.iter().find_map(|p| {
        let (key, value) = p.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

/// First file part of a `multipart/form-data` body. Only what the image
/// upload form sends is understood: one part carrying `filename="..."`.
pub fn first_file_part(content_type: &str, body: &[u8]) -> Option<UploadedFile> {
    let boundary = content_type
        .split(';')
        .map(str::trim)
        .find_map(|p| p.strip_prefix("boundary="))?
        .trim_matches('"');
    let delimiter = format!("--{boundary}");
    let closing = format!("\r\n--{boundary}");

    let mut rest = body;
    while let Some(start) = find(rest, delimiter.as_bytes()) {
        rest = &rest[start + delimiter.len()..];
        let header_end = find(rest, b"\r\n\r\n")?;
        let headers = String::from_utf8_lossy(&rest[..header_end]);
        let content = &rest[header_end + 4..];
        let end = find(content, closing.as_bytes())?;

        let filename = headers
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with("content-disposition:"))
            .and_then(|l| disposition_param(l, "filename"))
            .filter(|f| !f.is_empty());
        if let Some(filename) = filename {
            return Some(UploadedFile {
                filename,
                bytes: content[..end].to_vec(),
            });
        }
        rest = &content[end..];
    }
    None
}
