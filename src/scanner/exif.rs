use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF を持つ画像かどうか
pub fn has_metadata(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut bufreader = BufReader::new(file);
    let exif_reader = exif::Reader::new();
    match exif_reader.read_from_container(&mut bufreader) {
        Ok(exif) => exif.fields().next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_plain_png_has_no_metadata() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("plain.png");
        image::RgbImage::new(2, 2).save(&path).unwrap();
        assert!(!has_metadata(&path));
    }

    #[test]
    fn test_missing_or_broken_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(!has_metadata(&dir.path().join("none.jpg")));

        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"dummy").unwrap();
        assert!(!has_metadata(&broken));
    }
}
