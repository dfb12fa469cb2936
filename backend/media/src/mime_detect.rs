//! Video MIME detection by file extension.
//!
//! Decoders sniff containers partly by extension, so the temporary copy keeps
//! the source file's suffix whenever it is a known video type.

use std::path::Path;

/// Detect a video MIME type by file extension.
pub fn detect_video_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mime = match ext.as_str() {
        "mp4" | "m4v"  => "video/mp4",
        "webm"         => "video/webm",
        "mkv"          => "video/x-matroska",
        "mov"          => "video/quicktime",
        "avi"          => "video/x-msvideo",
        "ogv"          => "video/ogg",
        "mpg" | "mpeg" => "video/mpeg",
        "ts"           => "video/mp2t",
        "3gp"          => "video/3gpp",
        "flv"          => "video/x-flv",
        "wmv"          => "video/x-ms-wmv",
        _              => return None,
    };
    Some(mime)
}

/// Suffix for the temporary copy of `name`; `.mp4` for anything unrecognised.
pub fn temp_suffix_for(name: &str) -> String {
    let path = Path::new(name);
    match (detect_video_mime(path), path.extension().and_then(|e| e.to_str())) {
        (Some(_), Some(ext)) => format!(".{}", ext.to_lowercase()),
        _ => ".mp4".to_string(),
    }
}
