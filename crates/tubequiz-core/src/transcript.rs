use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::{fs, process::Command};
use tracing::{debug, info, warn};

use crate::{
    cache::{get_subtitle_dir, get_subtitle_path},
    error::{Result, TubequizError},
    types::{Segment, Transcript},
    video_id::VideoId,
};

/// Anything that can turn a video id into caption text.
#[async_trait]
pub trait TranscriptService: Send + Sync {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript>;
}

/// Fetches manual or auto-generated captions through `yt-dlp`.
pub struct YtDlpTranscripts {
    program: PathBuf,
    languages: Vec<String>,
    work_dir: PathBuf,
}

impl Default for YtDlpTranscripts {
    fn default() -> Self {
        Self::new(vec!["en".to_string(), "en-US".to_string()])
    }
}

impl YtDlpTranscripts {
    /// `languages` are tried in order; the first one with a subtitle file wins.
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            languages,
            work_dir: get_subtitle_dir(),
        }
    }

    /// Run a different `yt-dlp` executable, e.g. one outside `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = work_dir;
        self
    }

    fn subtitle_path(&self, video_id: &VideoId, lang: &str) -> PathBuf {
        get_subtitle_path(&self.work_dir, video_id, lang)
    }

    async fn cleanup(&self, video_id: &VideoId) {
        for lang in &self.languages {
            let path = self.subtitle_path(video_id, lang);
            if path.exists() {
                if let Err(e) = fs::remove_file(&path).await {
                    debug!(path = %path.display(), error = %e, "could not remove subtitle file");
                }
            }
        }
    }
}

#[async_trait]
impl TranscriptService for YtDlpTranscripts {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript> {
        fs::create_dir_all(&self.work_dir).await?;
        let output_template = self.work_dir.join(format!("{}.%(ext)s", video_id));

        let output = Command::new(&self.program)
            .arg(video_id.watch_url())
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-format")
            .arg("json3")
            .arg("--sub-langs")
            .arg(self.languages.join(","))
            .arg("-o")
            .arg(&output_template)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TubequizError::ToolNotFound {
                    tool: self.program.display().to_string(),
                },
                _ => TubequizError::IoError(e),
            })?;

        if !output.status.success() {
            self.cleanup(video_id).await;
            return Err(TubequizError::NoSubtitlesAvailable {
                video_id: video_id.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut found = None;
        for lang in &self.languages {
            let path = self.subtitle_path(video_id, lang);
            if path.exists() {
                found = Some((lang.clone(), path));
                break;
            }
        }

        let Some((language, path)) = found else {
            warn!(%video_id, languages = ?self.languages, "yt-dlp wrote no subtitle file");
            return Err(TubequizError::NoSubtitlesAvailable {
                video_id: video_id.to_string(),
                reason: format!("no subtitles in {}", self.languages.join(", ")),
            });
        };

        let result = load_json3(&path, video_id, &language).await;
        self.cleanup(video_id).await;
        let transcript = result?;

        if transcript.is_empty() {
            return Err(TubequizError::NoSubtitlesAvailable {
                video_id: video_id.to_string(),
                reason: "subtitle track is empty".to_string(),
            });
        }

        info!(
            %video_id,
            %language,
            segments = transcript.segments.len(),
            "transcript fetched"
        );
        Ok(transcript)
    }
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

async fn load_json3(path: &Path, video_id: &VideoId, language: &str) -> Result<Transcript> {
    let content = fs::read_to_string(path).await?;
    parse_json3(&content, video_id, language)
}

/// Convert a YouTube `json3` caption track into transcript segments
pub fn parse_json3(content: &str, video_id: &VideoId, language: &str) -> Result<Transcript> {
    let track: Json3 = serde_json::from_str(content)?;

    let segments = track
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(Segment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(Transcript {
        video_id: video_id.to_string(),
        language: language.to_string(),
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video_id::extract_video_id;

    #[test]
    fn json3_events_become_segments() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let content = r#"{
            "wireMagic": "pb3",
            "events": [
                {"tStartMs": 0, "dDurationMs": 2500, "segs": [{"utf8": "never gonna"}, {"utf8": " give you up"}]},
                {"tStartMs": 2500, "dDurationMs": 10, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 3000, "dDurationMs": 1500},
                {"tStartMs": 4000, "dDurationMs": 2000, "segs": [{"utf8": "never gonna\nlet you down"}]}
            ]
        }"#;

        let transcript = parse_json3(content, &vid, "en").unwrap();
        assert_eq!(transcript.language, "en");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "never gonna give you up");
        assert_eq!(transcript.segments[0].duration, 2.5);
        assert_eq!(transcript.segments[1].text, "never gonna let you down");
        assert_eq!(transcript.segments[1].start, 4.0);
    }

    #[test]
    fn broken_json3_is_an_error() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert!(matches!(
            parse_json3("{\"events\": [", &vid, "en"),
            Err(TubequizError::JsonError(_))
        ));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tubequiz-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn missing_binary_is_a_typed_error() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let service = YtDlpTranscripts::default()
            .with_program("tubequiz-no-such-yt-dlp")
            .with_work_dir(scratch_dir("missing"));

        let err = service.fetch(&vid).await.unwrap_err();
        assert!(
            matches!(&err, TubequizError::ToolNotFound { tool } if tool == "tubequiz-no-such-yt-dlp"),
            "{err:?}"
        );
        assert!(err.user_message().contains("PATH"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_run_removes_partial_subtitles() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let dir = scratch_dir("failed");
        let service = YtDlpTranscripts::default()
            .with_program("false")
            .with_work_dir(dir.clone());
        fs::create_dir_all(&dir).await.unwrap();
        let partial = service.subtitle_path(&vid, "en");
        fs::write(&partial, "{\"events\": [").await.unwrap();

        let err = service.fetch(&vid).await.unwrap_err();
        assert!(matches!(err, TubequizError::NoSubtitlesAvailable { .. }));
        assert!(!partial.exists());
        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn languages_are_tried_in_order() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let service = YtDlpTranscripts::new(vec!["de".into(), "en".into()])
            .with_work_dir(PathBuf::from("/scratch"));
        assert_eq!(service.languages, vec!["de", "en"]);
        assert_eq!(
            service.subtitle_path(&vid, "de"),
            PathBuf::from("/scratch/dQw4w9WgXcQ.de.json3")
        );
    }
}
