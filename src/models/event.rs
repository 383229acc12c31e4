use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Identified;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "Location")]
    pub location: String,
    #[serde(with = "super::datetime")]
    pub date: NaiveDateTime,
    pub total_seats: i32,
    pub available_seats: i32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Event {
    pub fn is_sold_out(&self) -> bool {
        self.available_seats <= 0
    }
}

impl Identified for Event {
    fn id(&self) -> i64 {
        self.id
    }
}

// Урезанное событие внутри брони
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: i64,
    pub title: String,
    #[serde(default, alias = "Location")]
    pub location: String,
    #[serde(with = "super::datetime")]
    pub date: NaiveDateTime,
}
