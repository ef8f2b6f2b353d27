//! Image file loading for detector uploads

use std::path::{Path, PathBuf};

use lookey_core::types::ImagePart;

use crate::error::CliError;

/// Guess the MIME type from the file extension.
///
/// Unknown extensions map to `application/octet-stream` and are rejected
/// later by the engine's content type check.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Read one image file into an upload part.
pub async fn read_image(path: &Path) -> Result<ImagePart, CliError> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        CliError::Command(format!("failed to read image {}: {e}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    Ok(ImagePart::new(file_name, content_type_for(path), data))
}

/// Read several image files, preserving argument order.
pub async fn read_images(paths: &[PathBuf]) -> Result<Vec<ImagePart>, CliError> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        parts.push(read_image(path).await?);
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("shelf.png")), "image/png");
        assert_eq!(content_type_for(Path::new("shelf.webp")), "image/webp");
        assert_eq!(
            content_type_for(Path::new("notes.txt")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn read_images_keeps_order_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("left.jpg");
        let second = dir.path().join("right.jpg");
        std::fs::write(&first, [0xFF_u8, 0xD8, 0x01]).unwrap();
        std::fs::write(&second, [0xFF_u8, 0xD8, 0x02, 0x03]).unwrap();

        let parts = read_images(&[first, second]).await.unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].file_name, "left.jpg");
        assert_eq!(parts[0].content_type, "image/jpeg");
        assert_eq!(parts[0].len(), 3);
        assert_eq!(parts[1].file_name, "right.jpg");
        assert_eq!(parts[1].len(), 4);
    }

    #[tokio::test]
    async fn missing_file_is_command_error() {
        let err = read_image(Path::new("/nonexistent/frame.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Command(_)));
        assert!(err.to_string().contains("frame.jpg"));
    }
}
