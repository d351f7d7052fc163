pub mod config;
pub mod domain;

pub use domain::compliance::{Checkpoint, CheckpointItem, CheckpointSet, ComplianceCheck};
pub use domain::customer::{BusinessInsights, Customer, NextStep, ProductMatch};
pub use domain::interaction::{ConversationAnalysis, Interaction, KeyTopic, NewInteraction};
