//! Data model: chart generation, judgement, note lifecycle, stats, settings.

pub mod chart;
pub mod judgement;
pub mod note;
pub mod settings;
pub mod stats;
