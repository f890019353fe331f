use serde::{Deserialize, Serialize};

use super::Named;

/// A named group of bins. Ticket-to-board membership is not exposed by the
/// API, so boards are only useful as a search filter.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bins: Vec<String>,
}

impl Named for Board {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
