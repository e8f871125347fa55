use crate::error::{Result, ScannerError};
use crate::types::CalendarResponse;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;

const COWIN_API_BASE: &str = "https://cdn-api.co-vin.in/api/v2";

pub struct CowinClient {
    client: Client,
}

impl CowinClient {
    pub fn new() -> Result<Self> {
        // CoWIN rejects clients that don't look like a browser
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (X11; Linux x86_64; rv:88.0) Gecko/20100101 Firefox/88.0",
            ),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.cowin.gov.in"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.cowin.gov.in/"));

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the week of vaccination sessions for a district, starting at `date` (DD-MM-YYYY, IST).
    ///
    /// The body is read as text before decoding so that both HTTP and decode
    /// failures keep the raw response for error reports.
    pub async fn sessions_by_district(
        &self,
        district_id: u32,
        date: &str,
    ) -> Result<CalendarResponse> {
        let url = format!("{}/appointment/sessions/public/calendarByDistrict", COWIN_API_BASE);

        debug!("requesting sessions: {} district_id={} date={}", url, district_id, date);

        let response = self
            .client
            .get(&url)
            .query(&[("district_id", district_id.to_string()), ("date", date.to_string())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("API request failed [{}]: {}", status, body);
            return Err(ScannerError::Api { status, body });
        }

        let calendar: CalendarResponse =
            serde_json::from_str(&body).map_err(|source| ScannerError::Parse { source, body })?;

        debug!("got {} centers", calendar.centers.len());

        Ok(calendar)
    }
}
