use serde::{Deserialize, Serialize};

/// The member who submitted a listing, with the signals used to weigh their data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submitter {
    pub username: String,
    pub trusted: bool,
    pub is_owner: bool,
    #[serde(default)]
    pub ambassador_level: i32,
    /// Region an ambassador covers, matched against the listing's category path
    #[serde(default)]
    pub ambassador_region: Option<String>,
}

impl Submitter {
    pub fn is_ambassador(&self) -> bool {
        self.ambassador_level > 0
    }
}
