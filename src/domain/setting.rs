use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Record;

/// One user preference row in the `settings` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setting {
    pub id: String,
    pub value: Value,
}

impl Record for Setting {
    fn id(&self) -> &str {
        &self.id
    }
}
