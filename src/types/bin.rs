use serde::{Deserialize, Serialize};

use super::Named;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl Named for Bin {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
