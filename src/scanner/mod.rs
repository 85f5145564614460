mod exif;
pub mod strip;

pub use exif::has_metadata;
pub use strip::{strip_metadata, StripSummary};

use crate::error::{ReportError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 写真フォルダ直下の画像を列挙する（ファイル名順 = 発見順）
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(ReportError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            if is_image_extension(&ext_str) {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();

                images.push(ImageInfo {
                    path: path.to_path_buf(),
                    file_name,
                });
            }
        }
    }

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    tracing::debug!(folder = %folder.display(), count = images.len(), "画像を列挙");

    Ok(images)
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension("jpg"));
        assert!(is_image_extension("JPG"));
        assert!(is_image_extension("jpeg"));
        assert!(is_image_extension("png"));
        assert!(is_image_extension("Jpg"));
        assert!(is_image_extension("jPeg"));
        assert!(!is_image_extension("txt"));
        assert!(!is_image_extension("docx"));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(ReportError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let result = scan_folder(dir.path()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_scan_folder_sorted_and_filtered() {
        let dir = tempdir().expect("Failed to create temp dir");
        let names = [
            "L2_1_销钉缺失_严重.jpg",
            "L1_5_杆塔倾斜_一般.JPG",
            "L1_5_杆塔倾斜_一般_特写.png",
            "L3_2_导线断股_危急.jPeg",
            "readme.txt",
        ];
        for name in names {
            File::create(dir.path().join(name))
                .unwrap()
                .write_all(b"dummy")
                .unwrap();
        }
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("L9_9_杆塔倾斜_一般.jpg")).unwrap();

        let result = scan_folder(dir.path()).unwrap();
        let found: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(
            found,
            vec![
                "L1_5_杆塔倾斜_一般.JPG",
                "L1_5_杆塔倾斜_一般_特写.png",
                "L2_1_销钉缺失_严重.jpg",
                "L3_2_导线断股_危急.jPeg",
            ]
        );
    }
}
