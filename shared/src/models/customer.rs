//! Customer model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A wholesale customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}
