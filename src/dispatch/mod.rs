//! Commits, persistence and side-effect delivery

pub mod collaborators;
pub mod dispatcher;
pub mod recording;

pub use collaborators::{
    Collaborators, FeatureModules, FrameLimiter, FrameLimits, RenderResources, WindowController,
    WindowPlacement,
};
pub use dispatcher::{Dispatcher, QueuedEffect};
pub use recording::{Call, RecordingHost};
