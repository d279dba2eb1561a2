use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

impl Transcript {
    /// Spoken text only, one caption line per row
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn duration_seconds(&self) -> f64 {
        self.segments.last().map(Segment::end).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|seg| seg.text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(texts: &[(&str, f64, f64)]) -> Transcript {
        Transcript {
            video_id: "dQw4w9WgXcQ".into(),
            language: "en".into(),
            segments: texts
                .iter()
                .map(|(text, start, duration)| Segment {
                    text: text.to_string(),
                    start: *start,
                    duration: *duration,
                })
                .collect(),
        }
    }

    #[test]
    fn plain_text_skips_blank_segments() {
        let t = transcript(&[(" hello ", 0.0, 1.5), ("\n", 1.5, 0.2), ("world", 1.7, 2.0)]);
        assert_eq!(t.plain_text(), "hello\nworld");
        assert!(!t.is_empty());
    }

    #[test]
    fn duration_is_end_of_last_segment() {
        let t = transcript(&[("a", 0.0, 1.0), ("b", 10.0, 2.5)]);
        assert_eq!(t.duration_seconds(), 12.5);
        assert_eq!(transcript(&[]).duration_seconds(), 0.0);
        assert!(transcript(&[(" ", 0.0, 1.0)]).is_empty());
    }
}
