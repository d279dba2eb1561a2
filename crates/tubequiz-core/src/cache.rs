use std::path::{Path, PathBuf};

use crate::video_id::VideoId;

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("tubequiz")
}

/// Scratch directory yt-dlp writes subtitle tracks into. Files are removed
/// once read; nothing is reused between runs.
pub fn get_subtitle_dir() -> PathBuf {
    get_root_cache_dir().join("subtitles")
}

/// Path yt-dlp uses for a `json3` subtitle track of `video_id` in `lang`
pub fn get_subtitle_path(dir: &Path, video_id: &VideoId, lang: &str) -> PathBuf {
    dir.join(format!("{}.{}.json3", video_id, lang))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video_id::extract_video_id;

    #[test]
    fn subtitle_path_uses_language_suffix() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(
            get_subtitle_path(Path::new("/scratch"), &vid, "en-US"),
            PathBuf::from("/scratch/dQw4w9WgXcQ.en-US.json3")
        );
        assert!(get_subtitle_dir().ends_with("tubequiz/subtitles"));
    }
}
