//! Native file dialog integration using the rfd crate
//!
//! Dialogs for picking a photo, choosing where to save a download and
//! choosing the default export folder.

use crate::export::ExportFormat;
use crate::state::PHOTO_EXTENSIONS;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Opens a native file dialog for selecting a photo.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn open_photo_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Choose Photo")
        .add_filter("Images", PHOTO_EXTENSIONS);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Opens a native save dialog for a card download.
///
/// Returns the chosen directory and file stem, `None` if cancelled.
pub fn save_download_dialog(
    initial_dir: &Path,
    format: ExportFormat,
    file_stem: &str,
) -> Option<(PathBuf, String)> {
    let filter_name = match format {
        ExportFormat::Pdf => "PDF Document",
        ExportFormat::Image => "PNG Image",
    };
    let extension = format.extension();

    let path = FileDialog::new()
        .set_title(format.label())
        .add_filter(filter_name, &[extension])
        .set_directory(initial_dir)
        .set_file_name(format!("{}.{}", file_stem, extension))
        .save_file()?;

    split_save_path(&path, extension)
}

/// Opens a native folder picker for the default export directory.
pub fn pick_export_folder(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Choose Download Folder");

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_folder()
}

/// Split a chosen save path into its directory and a stem without `extension`.
fn split_save_path(path: &Path, extension: &str) -> Option<(PathBuf, String)> {
    let dir = path.parent()?.to_path_buf();
    let name = path.file_name()?.to_string_lossy().into_owned();
    let suffix = format!(".{}", extension);
    let stem = if name.to_ascii_lowercase().ends_with(&suffix) {
        name[..name.len() - suffix.len()].to_string()
    } else {
        name
    };
    if stem.is_empty() {
        None
    } else {
        Some((dir, stem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_save_path_strips_extension() {
        let (dir, stem) =
            split_save_path(Path::new("/home/a/Alex Johnson-ID-Card.PDF"), "pdf").unwrap();
        assert_eq!(dir, PathBuf::from("/home/a"));
        assert_eq!(stem, "Alex Johnson-ID-Card");
    }

    #[test]
    fn test_split_save_path_without_extension() {
        let (_, stem) = split_save_path(Path::new("/tmp/card"), "png").unwrap();
        assert_eq!(stem, "card");
    }

    #[test]
    fn test_split_save_path_rejects_bare_extension() {
        assert!(split_save_path(Path::new("/tmp/.png"), "png").is_none());
    }
}
