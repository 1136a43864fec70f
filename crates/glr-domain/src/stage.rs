//! Stage module - the per-request state machine

use std::fmt;

/// Stage of a single generation request
///
/// Requests move forward through the stages in a fixed order:
/// Idle → ExtractingText → ExtractingFields → FillingTemplate → Assembling → Done.
/// Any active stage may instead move to `Failed`. There is no resumption;
/// a failed request starts over from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Nothing started yet
    Idle,

    /// Reading PDF evidence and the docx template
    ExtractingText,

    /// Model call #1: structured field extraction
    ExtractingFields,

    /// Model call #2: template rewrite
    FillingTemplate,

    /// Writing the docx and optional pdf
    Assembling,

    /// Finished successfully
    Done,

    /// Terminal failure
    Failed,
}

impl PipelineStage {
    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::ExtractingText => "extracting text",
            PipelineStage::ExtractingFields => "extracting fields",
            PipelineStage::FillingTemplate => "filling template",
            PipelineStage::Assembling => "assembling",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        }
    }

    /// Get the next stage on the success path
    pub fn next(&self) -> Option<Self> {
        match self {
            PipelineStage::Idle => Some(PipelineStage::ExtractingText),
            PipelineStage::ExtractingText => Some(PipelineStage::ExtractingFields),
            PipelineStage::ExtractingFields => Some(PipelineStage::FillingTemplate),
            PipelineStage::FillingTemplate => Some(PipelineStage::Assembling),
            PipelineStage::Assembling => Some(PipelineStage::Done),
            PipelineStage::Done | PipelineStage::Failed => None,
        }
    }

    /// Whether the request has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }

    /// Whether moving from `self` to `to` is a legal transition
    pub fn can_transition_to(&self, to: PipelineStage) -> bool {
        if to == PipelineStage::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
