use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Which timeline point explanation set 0 belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationAlignment {
    /// Set 0 explains the forecast origin (the "Today" point).
    #[default]
    Breakpoint,
    /// Set 0 explains the first predicted point after the origin.
    FirstPrediction,
}

impl ExplanationAlignment {
    /// Timeline index that maps to explanation set 0.
    pub fn origin(&self, breakpoint: isize) -> isize {
        match self {
            ExplanationAlignment::Breakpoint => breakpoint,
            ExplanationAlignment::FirstPrediction => breakpoint.saturating_add(1),
        }
    }
}

impl fmt::Display for ExplanationAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplanationAlignment::Breakpoint => f.write_str("breakpoint"),
            ExplanationAlignment::FirstPrediction => f.write_str("first_prediction"),
        }
    }
}

impl FromStr for ExplanationAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "breakpoint" => Ok(ExplanationAlignment::Breakpoint),
            "first_prediction" => Ok(ExplanationAlignment::FirstPrediction),
            other => Err(format!(
                "unknown alignment '{}', expected 'breakpoint' or 'first_prediction'",
                other
            )),
        }
    }
}

/// Maps clicked timeline positions onto the explanation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionMapper {
    alignment: ExplanationAlignment,
}

impl SelectionMapper {
    pub fn new(alignment: ExplanationAlignment) -> Self {
        Self { alignment }
    }

    pub fn alignment(&self) -> ExplanationAlignment {
        self.alignment
    }

    /// Explanation index for a click on `global_index`, `None` when no set matches.
    #[instrument(skip(self))]
    pub fn on_click(
        &self,
        global_index: usize,
        breakpoint: isize,
        explanation_count: usize,
    ) -> Option<usize> {
        let candidate = isize::try_from(global_index)
            .ok()
            .and_then(|index| index.checked_sub(self.alignment.origin(breakpoint)));
        let selected = candidate
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < explanation_count);
        debug!("Click candidate {:?} resolved to {:?}", candidate, selected);
        selected
    }

    /// Timeline index explained by `explanation_index`.
    pub fn timeline_index(&self, explanation_index: usize, breakpoint: isize) -> Option<usize> {
        isize::try_from(explanation_index)
            .ok()
            .and_then(|index| self.alignment.origin(breakpoint).checked_add(index))
            .and_then(|index| usize::try_from(index).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_maps_relative_to_breakpoint() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.on_click(2, 1, 2), Some(1));
        assert_eq!(mapper.on_click(3, 1, 2), None);
    }

    #[test]
    fn test_click_far_beyond_timeline_selects_nothing() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.on_click(1usize << 63, 1, 2), None);
        assert_eq!(mapper.on_click(usize::MAX, -1, usize::MAX), None);
        assert_eq!(mapper.on_click(isize::MAX as usize, isize::MIN, 2), None);

        let shifted = SelectionMapper::new(ExplanationAlignment::FirstPrediction);
        assert_eq!(shifted.on_click(usize::MAX, isize::MAX, 2), None);
    }

    #[test]
    fn test_timeline_index_for_huge_explanation_index_is_none() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.timeline_index(usize::MAX, 1), None);
        assert_eq!(mapper.timeline_index(isize::MAX as usize, 1), None);
        assert_eq!(mapper.timeline_index(0, 1), Some(1));
    }

    #[test]
    fn test_click_on_breakpoint_selects_first_set() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.on_click(1, 1, 2), Some(0));
    }

    #[test]
    fn test_click_on_history_selects_nothing() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.on_click(0, 1, 2), None);
        assert_eq!(mapper.on_click(0, 5, 10), None);
    }

    #[test]
    fn test_click_without_explanations() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.on_click(4, 1, 0), None);
    }

    #[test]
    fn test_click_without_history() {
        let mapper = SelectionMapper::default();
        assert_eq!(mapper.on_click(0, -1, 3), Some(1));
        assert_eq!(mapper.on_click(2, -1, 3), None);
    }

    #[test]
    fn test_first_prediction_alignment() {
        let mapper = SelectionMapper::new(ExplanationAlignment::FirstPrediction);
        assert_eq!(mapper.on_click(1, 1, 2), None);
        assert_eq!(mapper.on_click(2, 1, 2), Some(0));
        assert_eq!(mapper.on_click(3, 1, 2), Some(1));
        assert_eq!(mapper.timeline_index(0, 1), Some(2));
    }

    #[test]
    fn test_timeline_index_inverts_click() {
        let mapper = SelectionMapper::default();
        for global in 1..6 {
            if let Some(selected) = mapper.on_click(global, 1, 10) {
                assert_eq!(mapper.timeline_index(selected, 1), Some(global));
            }
        }
        assert_eq!(mapper.timeline_index(0, -1), None);
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!("breakpoint".parse::<ExplanationAlignment>(), Ok(ExplanationAlignment::Breakpoint));
        assert_eq!("first-prediction".parse::<ExplanationAlignment>(), Ok(ExplanationAlignment::FirstPrediction));
        assert!("middle".parse::<ExplanationAlignment>().is_err());
        assert_eq!(ExplanationAlignment::FirstPrediction.to_string(), "first_prediction");
    }
}
