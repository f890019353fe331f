use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

const UNKNOWN_STATUS: &str = "Unknown";

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Ticket {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bin_id: String,
    /// Copied from the bin when the ticket was fetched; may be stale.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bin_name: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_ids: Vec<String>,
}

impl Ticket {
    /// Bin name, falling back to the bin ID, then to "Unknown".
    pub fn status(&self) -> &str {
        if !self.bin_name.is_empty() {
            &self.bin_name
        } else if !self.bin_id.is_empty() {
            &self.bin_id
        } else {
            UNKNOWN_STATUS
        }
    }

    /// `None` when the ticket carries no assignee list, in which case the
    /// search filter is all we know.
    pub fn is_assigned_to(&self, user_id: &str) -> Option<bool> {
        if self.assigned_ids.is_empty() {
            None
        } else {
            Some(self.assigned_ids.iter().any(|id| id == user_id))
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
