mod builder;
mod callout;
mod document;
mod highlight;
mod markdown;
mod paths;
mod pipeline;
mod preprocess;
mod render;
mod watch;

pub use builder::{BuildError, BuildResult, Builder};
pub use paths::default_output_path;
pub use watch::{FileWatcher, WatchEvent, WatchPaths};
