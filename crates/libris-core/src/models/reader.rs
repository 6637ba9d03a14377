use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reader {
    pub id: i64,
    pub ticket_number: String,
    pub full_name: String,
    pub passport_number: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone_number: String,
    pub education_level: String,
    #[serde(default)]
    pub has_academic_degree: bool,
    pub assigned_room: Option<i64>,
    pub registration_date: NaiveDate,
    #[serde(default)]
    pub re_registered: bool,
}

impl Reader {
    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.birth_date).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReader {
    pub ticket_number: String,
    pub full_name: String,
    pub passport_number: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone_number: String,
    pub education_level: String,
    pub has_academic_degree: bool,
    pub assigned_room: Option<i64>,
    pub registration_date: NaiveDate,
}
