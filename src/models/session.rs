use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};

pub type SessionId = i64;
pub type ItemId = i64;

/// One shopping trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: SessionId,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
}

impl Session {
    /// Human readable label in Turkish, e.g. "16 Ekim 14:05"
    pub fn title(&self) -> String {
        format_timestamp_to_title(self.created_at)
    }
}

/// One scanned product within a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: ItemId,
    pub session_id: SessionId,
    pub product_name: String,
    pub price: f64,
    pub quantity: u32,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// A session together with its items and running total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub session: Session,
    pub title: String,
    pub items: Vec<LineItem>,
    pub total: f64,
}

impl SessionSummary {
    pub fn new(session: Session, items: Vec<LineItem>) -> Self {
        let total = items.iter().map(LineItem::line_total).sum();
        Self {
            title: session.title(),
            session,
            items,
            total,
        }
    }
}

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

fn format_timestamp_to_title(timestamp_millis: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_millis).single() {
        Some(datetime) => format_title(&datetime),
        None => format!("#{}", timestamp_millis),
    }
}

/// Day, long month name and time: "5 Ocak 09:30"
fn format_title<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} {} {}",
        datetime.day(),
        MONTHS_TR[datetime.month0() as usize],
        datetime.format("%H:%M")
    )
}
