//! Hand-built `multipart/form-data` bodies for `sendPhoto`.
//!
//! The Bot API validates the field names and the photo part's filename and
//! content type, so the body is assembled byte for byte here instead of being
//! left to a generic form builder.

use std::path::Path;

use rand::Rng;
use rand::distr::Alphanumeric;

/// Content type used when the extension does not map to a known type.
pub const DEFAULT_PHOTO_MIME: &str = "image/jpeg";

const BOUNDARY_PREFIX: &str = "----HeraldFormBoundary";
const CRLF: &[u8] = b"\r\n";

/// Guesses a content type from the file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_PHOTO_MIME)
}

/// Random boundary token, unlikely to collide with binary payloads.
pub fn random_boundary() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("{BOUNDARY_PREFIX}{suffix}")
}

/// Incremental `multipart/form-data` encoder.
///
/// # Example
/// ```ignore
/// let form = MultipartForm::new()
///     .text("chat_id", "42")
///     .file("photo", "cover.png", "image/png", &bytes);
/// let content_type = form.content_type();
/// let body = form.finish();
/// ```
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
    parts: usize,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(random_boundary())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Number of parts written so far.
    pub fn part_count(&self) -> usize {
        self.parts
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Appends a plain text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                escape_quoted(name)
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(CRLF);
        self
    }

    /// Appends a binary file field.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                escape_quoted(name),
                escape_quoted(filename),
                content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(CRLF);
        self
    }

    /// Writes the closing boundary and returns the encoded body.
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }

    fn open_part(&mut self) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.parts += 1;
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

// Header parameters cannot carry raw quotes or line breaks.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOUNDARY: &str = "----HeraldFormBoundaryTEST";

    fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .filter(|window| *window == needle)
            .count()
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type(Path::new("cover.png")), "image/png");
        assert_eq!(guess_mime_type(Path::new("cover.gif")), "image/gif");
        assert_eq!(guess_mime_type(Path::new("cover.jpg")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("cover.unknownext")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("no_extension")), "image/jpeg");
    }

    #[test]
    fn test_random_boundary_shape() {
        let a = random_boundary();
        let b = random_boundary();
        assert!(a.starts_with(BOUNDARY_PREFIX));
        assert_eq!(a.len(), BOUNDARY_PREFIX.len() + 24);
        assert_ne!(a, b);
    }

    #[test]
    fn test_photo_form_with_caption() {
        let photo = [0xFFu8, 0xD8, 0xFF, 0x00, 0x10];
        let form = MultipartForm::with_boundary(BOUNDARY)
            .text("chat_id", "42")
            .file("photo", "cover.jpg", "image/jpeg", &photo)
            .text("caption", "hello")
            .text("parse_mode", "HTML");
        assert_eq!(form.part_count(), 4);
        assert_eq!(
            form.content_type(),
            format!("multipart/form-data; boundary={BOUNDARY}")
        );

        let body = form.finish();
        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"------HeraldFormBoundaryTEST\r\nContent-Disposition: form-data; name=\"chat_id\"\r\n\r\n42\r\n",
        );
        expected.extend_from_slice(
            b"------HeraldFormBoundaryTEST\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"cover.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n",
        );
        expected.extend_from_slice(&photo);
        expected.extend_from_slice(b"\r\n");
        expected.extend_from_slice(
            b"------HeraldFormBoundaryTEST\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nhello\r\n",
        );
        expected.extend_from_slice(
            b"------HeraldFormBoundaryTEST\r\nContent-Disposition: form-data; name=\"parse_mode\"\r\n\r\nHTML\r\n",
        );
        expected.extend_from_slice(b"------HeraldFormBoundaryTEST--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_closing_marker_is_last() {
        let body = MultipartForm::with_boundary(BOUNDARY)
            .text("chat_id", "42")
            .finish();
        assert!(body.ends_with(format!("--{BOUNDARY}--\r\n").as_bytes()));
    }

    #[test]
    fn test_filename_quotes_are_escaped() {
        let body = MultipartForm::with_boundary(BOUNDARY)
            .file("photo", "evil\"\r\nname.png", "image/png", b"x")
            .finish();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("filename=\"evil%22%0D%0Aname.png\""));
    }

    proptest! {
        #[test]
        fn prop_every_part_uses_the_same_boundary(
            chat_id in "-?[0-9]{1,13}",
            caption in "[a-zA-Z0-9 <>/]{0,64}",
            data in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let mut form = MultipartForm::with_boundary(BOUNDARY)
                .text("chat_id", &chat_id)
                .file("photo", "cover.png", "image/png", &data);
            if !caption.is_empty() {
                form = form.text("caption", &caption).text("parse_mode", "HTML");
            }
            let parts = form.part_count();
            prop_assert_eq!(parts, if caption.is_empty() { 2 } else { 4 });

            let body = form.finish();
            let opening = format!("--{BOUNDARY}\r\n");
            let closing = format!("--{BOUNDARY}--\r\n");
            prop_assert_eq!(count_occurrences(&body, opening.as_bytes()), parts);
            prop_assert_eq!(count_occurrences(&body, closing.as_bytes()), 1);
            prop_assert!(body.starts_with(opening.as_bytes()));
            prop_assert!(body.ends_with(closing.as_bytes()));
        }
    }
}
