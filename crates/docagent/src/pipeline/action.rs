use std::fmt;

use crate::document::ExtractionKind;

/// A named operation the decision loop can run in one turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    ClassifyDocument,
    AnalyzeImage,
    Extract(ExtractionKind),
    SaveData,
    Stop,
    /// Any name the executor does not know. Kept verbatim for history.
    Other(String),
}

pub const CLASSIFY_DOCUMENT: &str = "classify_document";
pub const ANALYZE_IMAGE: &str = "analyze_image";
pub const EXTRACT_INVOICE: &str = "extract_invoice";
pub const SCORE_RESUME: &str = "score_resume";
pub const SUMMARIZE_RESEARCH_PAPER: &str = "summarize_research_paper";
pub const EXTRACT_LEGAL_DOC: &str = "extract_legal_doc";
pub const SUMMARIZE_AUDIO_NOTE: &str = "summarize_audio_note";
pub const SUMMARIZE_UNKNOWN: &str = "summarize_unknown";
pub const SAVE_DATA: &str = "save_data";
pub const STOP: &str = "STOP";

impl Action {
    /// Parses a wire name. `STOP` is matched case-insensitively; other names
    /// must match exactly (surrounding whitespace ignored).
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case(STOP) {
            return Self::Stop;
        }
        match name {
            CLASSIFY_DOCUMENT => Self::ClassifyDocument,
            ANALYZE_IMAGE => Self::AnalyzeImage,
            EXTRACT_INVOICE => Self::Extract(ExtractionKind::Invoice),
            SCORE_RESUME => Self::Extract(ExtractionKind::Resume),
            SUMMARIZE_RESEARCH_PAPER => Self::Extract(ExtractionKind::ResearchPaper),
            EXTRACT_LEGAL_DOC => Self::Extract(ExtractionKind::LegalDoc),
            SUMMARIZE_AUDIO_NOTE => Self::Extract(ExtractionKind::AudioNote),
            SUMMARIZE_UNKNOWN => Self::Extract(ExtractionKind::Unknown),
            SAVE_DATA => Self::SaveData,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn extraction(kind: ExtractionKind) -> Self {
        Self::Extract(kind)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::ClassifyDocument => CLASSIFY_DOCUMENT,
            Self::AnalyzeImage => ANALYZE_IMAGE,
            Self::Extract(ExtractionKind::Invoice) => EXTRACT_INVOICE,
            Self::Extract(ExtractionKind::Resume) => SCORE_RESUME,
            Self::Extract(ExtractionKind::ResearchPaper) => SUMMARIZE_RESEARCH_PAPER,
            Self::Extract(ExtractionKind::LegalDoc) => EXTRACT_LEGAL_DOC,
            Self::Extract(ExtractionKind::AudioNote) => SUMMARIZE_AUDIO_NOTE,
            Self::Extract(ExtractionKind::Unknown) => SUMMARIZE_UNKNOWN,
            Self::SaveData => SAVE_DATA,
            Self::Stop => STOP,
            Self::Other(name) => name,
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(Action::parse("classify_document"), Action::ClassifyDocument);
        assert_eq!(
            Action::parse(" score_resume "),
            Action::Extract(ExtractionKind::Resume)
        );
        assert_eq!(Action::parse("save_data"), Action::SaveData);
    }

    #[test]
    fn test_stop_is_case_insensitive() {
        assert_eq!(Action::parse("STOP"), Action::Stop);
        assert_eq!(Action::parse("stop"), Action::Stop);
        assert!(Action::parse("Stop").is_stop());
    }

    #[test]
    fn test_unknown_name_kept_verbatim() {
        let action = Action::parse("launch_rocket");
        assert_eq!(action, Action::Other("launch_rocket".to_string()));
        assert_eq!(action.name(), "launch_rocket");
    }

    #[test]
    fn test_name_matches_parse_for_extractions() {
        for kind in ExtractionKind::ALL {
            let action = Action::extraction(kind);
            assert_eq!(Action::parse(action.name()), action);
        }
    }
}
