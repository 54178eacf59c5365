use std::fmt;

use serde::{Deserialize, Serialize};

/// The three places a path's content can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Revision {
    WorkingTree,
    Index,
    Head,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Revision::WorkingTree => "working tree",
            Revision::Index => "index",
            Revision::Head => "HEAD",
        };
        f.write_str(name)
    }
}
