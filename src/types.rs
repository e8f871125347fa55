use serde::{Deserialize, Serialize};

/// Top-level shape of the calendarByDistrict response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub centers: Vec<Center>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Center {
    pub name: String,

    pub address: String,

    pub pincode: u32,

    pub block_name: String,

    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,

    pub vaccine: String,

    pub min_age_limit: u32,

    pub available_capacity: u32,

    pub available_capacity_dose1: u32,

    pub available_capacity_dose2: u32,

    pub date: String,
}
