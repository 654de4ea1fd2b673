use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// Incremental `multipart/form-data` writer (RFC 7578).
///
/// Covers exactly what the backend consumes: text fields plus file parts.
/// Each form gets a fresh random boundary; callers send the body with the
/// header value from [`MultipartForm::content_type`] and must not set a JSON
/// content type alongside it.
#[derive(Debug)]
pub struct MultipartForm {
    boundary: String,
    buf: BytesMut,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----client-{}", Uuid::new_v4().simple()),
            buf: BytesMut::new(),
        }
    }

    /// Append a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.buf.put_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.buf.put_slice(value.as_bytes());
        self.buf.put_slice(b"\r\n");
        self
    }

    /// Append a file field with its own content type.
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &Bytes) -> Self {
        self.open_part();
        self.buf.put_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n")
                .as_bytes(),
        );
        self.buf
            .put_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        self.buf.put_slice(bytes);
        self.buf.put_slice(b"\r\n");
        self
    }

    fn open_part(&mut self) {
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"\r\n");
    }

    /// `Content-Type` header value carrying the boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Write the closing delimiter and yield the finished body.
    pub fn into_body(mut self) -> Bytes {
        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"--\r\n");
        self.buf.freeze()
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}
