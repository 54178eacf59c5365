pub mod content;
pub mod diff;
pub mod history;
pub mod ignore;
pub mod repository;
pub mod sniff;
pub mod status;
pub mod worktree;

pub use history::CommitWalk;
pub use ignore::{GitignoreFilter, IgnorePredicate, NoIgnore};
pub use repository::GitRepository;
