use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRecord {
    pub slug: String,
    pub name: String,
    pub period: String,
    pub script: String,
    #[serde(rename = "textCount")]
    pub text_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub language: String,
    #[serde(rename = "languageScript")]
    pub language_script: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub language: String,
    pub period: String,
    pub excerpt: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeAck {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAffairRecord {
    pub state: String,
    pub title: String,
    pub summary: String,
    pub date: NaiveDate,
}
