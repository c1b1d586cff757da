// Humanizer Core Services

pub mod text_processor;
pub mod config_store;
pub mod sentence_segmenter;
pub mod humanizer;

pub use text_processor::*;
pub use config_store::*;
pub use sentence_segmenter::*;

pub use humanizer::{
    builtin_rules,
    detect_topics,
    humanize,
    report_changes,
    Humanizer,
    IntensityProfile,
    RuleTables,
    Stage,
};
