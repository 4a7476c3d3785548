//! `multipart/form-data` bodies for attachment uploads.
//!
//! The server expects exactly two parts: the attachment entity as JSON and
//! the raw content. The boundary is fixed so bodies are byte-for-byte
//! reproducible.

/// Boundary separating the parts of an upload body.
pub const MULTIPART_BOUNDARY: &str = "---------------------------92348603315617859231724135434";

const ENTITY_PART_DISPOSITION: &str = r#"form-data; name="entity"; filename="blob""#;
const ENTITY_PART_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Binary payload of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryContent {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl BinaryContent {
    pub fn new(data: Vec<u8>, content_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            filename: filename.into(),
        }
    }
}

/// Value of the `Content-Type` header for an upload body.
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

/// Encodes the entity JSON and the binary content as a two-part body.
pub fn encode_multipart(entity_json: &str, content: &BinaryContent) -> Vec<u8> {
    let mut body = Vec::with_capacity(entity_json.len() + content.data.len() + 512);

    push_part_header(&mut body, ENTITY_PART_DISPOSITION, ENTITY_PART_CONTENT_TYPE);
    body.extend_from_slice(entity_json.as_bytes());
    body.extend_from_slice(b"\r\n");

    let disposition = format!(
        r#"form-data; name="content"; filename="{}""#,
        content.filename.replace('"', "%22")
    );
    push_part_header(&mut body, &disposition, &content.content_type);
    body.extend_from_slice(&content.data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

fn push_part_header(body: &mut Vec<u8>, disposition: &str, content_type: &str) {
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
}
