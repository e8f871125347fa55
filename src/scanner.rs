use crate::api::CowinClient;
use crate::config::Config;
use crate::error::{Result, ScannerError};
use crate::notify::Notifier;
use crate::seen::SeenSlots;
use crate::types::Center;
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use std::sync::Arc;

/// Sessions at or above this minimum age are not alerted.
const MAX_ALERT_AGE: u32 = 45;

const ALERT_FOOTER: &str = "\nCoWIN: https://selfregistration.cowin.gov.in\n";

/// Query-date cursor: the `date` parameter starts at the launch date (IST)
/// and advances by one calendar day per full day of real elapsed time.
pub struct DateCursor {
    start: DateTime<Utc>,
    days_passed: i64,
}

impl DateCursor {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            days_passed: 0,
        }
    }

    /// Credit one more day when elapsed time minus already-credited days
    /// exceeds a full day. At most one day per call, so jitter in the sleep
    /// never skips a date.
    pub fn advance_if_due(&mut self, now: DateTime<Utc>) -> bool {
        let uncredited = now.signed_duration_since(self.start) - Duration::days(self.days_passed);
        if uncredited > Duration::days(1) {
            self.days_passed += 1;
            true
        } else {
            false
        }
    }

    /// Current `date` query parameter, DD-MM-YYYY in IST (UTC+5:30).
    pub fn query_date(&self) -> String {
        let ist = self.start + Duration::minutes(330) + Duration::days(self.days_passed);
        ist.format("%d-%m-%Y").to_string()
    }
}

/// Build the alert message for one cycle: every qualifying session that is
/// not suppressed by the seen-slots map gets a numbered bullet and is
/// recorded at `now`. Returns an empty string when nothing new was found.
pub fn build_alert(
    centers: &[Center],
    seen: &mut SeenSlots,
    window: Duration,
    now: DateTime<Utc>,
) -> String {
    let mut message = String::new();
    let mut bullet_no = 0;

    for center in centers {
        for session in &center.sessions {
            if session.min_age_limit >= MAX_ALERT_AGE || session.available_capacity == 0 {
                continue;
            }
            if !seen.should_alert(&session.session_id, now, window) {
                continue;
            }

            seen.record(session.session_id.clone(), now);
            bullet_no += 1;
            message.push('\n');
            message.push_str(&format!("{}) Center Name: {}\n", bullet_no, center.name));
            message.push_str(&format!("Address: {}\n", center.address));
            message.push_str(&format!(
                "Pincode (Block): {} ({})\n",
                center.pincode, center.block_name
            ));
            message.push_str(&format!("Vaccine Name: {}\n", session.vaccine));
            message.push_str(&format!(
                "Total {} slots on {} for {}+\n",
                session.available_capacity, session.date, session.min_age_limit
            ));
            message.push_str(&format!(
                "(Dose1: {}, Dose2: {})\n",
                session.available_capacity_dose1, session.available_capacity_dose2
            ));
        }
    }

    message
}

/// Error-channel report: request number, error text, and the raw response
/// body when the error captured one.
pub fn error_report(request_no: u64, err: &ScannerError) -> String {
    let mut text = format!("\nERROR (in request #{}) >\n{}\n", request_no, err);
    if let Some(body) = err.response_body() {
        text.push_str(&format!("\nRESPONSE >\n{}\n", body));
    }
    text
}

pub struct SlotScanner {
    client: CowinClient,
    notifier: Arc<dyn Notifier>,
    district_id: u32,
    alert_chat_id: String,
    error_chat_id: String,
    realert_window: Duration,
    poll_interval: std::time::Duration,
}

impl SlotScanner {
    pub fn new(client: CowinClient, notifier: Arc<dyn Notifier>, config: &Config) -> Self {
        Self {
            client,
            notifier,
            district_id: config.district_id,
            alert_chat_id: config.alert_chat_id.clone(),
            error_chat_id: config.error_chat_id.clone(),
            realert_window: config.realert_window,
            poll_interval: config.poll_interval,
        }
    }

    /// Poll indefinitely: fetch, filter, alert, sleep. Request and parse
    /// failures are reported to the error chat and the loop carries on with
    /// the next cycle.
    pub async fn run(&self, seen: &mut SeenSlots) -> Result<()> {
        info!(
            "scanning district {} every {:?}, re-alert window {}h",
            self.district_id,
            self.poll_interval,
            self.realert_window.num_hours()
        );

        let mut cursor = DateCursor::new(Utc::now());
        let mut request_no: u64 = 0;

        loop {
            if cursor.advance_if_due(Utc::now()) {
                banner(&format!(
                    "Updated date (IST) to check from for vaccine to {} at {}",
                    cursor.query_date(),
                    Utc::now()
                ));
            }

            request_no += 1;
            let date = cursor.query_date();
            let summary = match self.scan_once(seen, &date).await {
                Ok(message) => message,
                Err(err) => {
                    error!("request #{} failed: {}", request_no, err);
                    self.report_error(request_no, &err).await
                }
            };

            banner(&format!(
                "Sending request #{} at {} to check slot availability:-\n{}",
                request_no,
                Utc::now(),
                summary
            ));

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One cycle: fetch the calendar, build the alert, send it if non-empty.
    async fn scan_once(&self, seen: &mut SeenSlots, date: &str) -> Result<String> {
        let calendar = self.client.sessions_by_district(self.district_id, date).await?;

        let mut message = build_alert(&calendar.centers, seen, self.realert_window, Utc::now());

        if !message.is_empty() {
            message.push_str(ALERT_FOOTER);
            self.notifier
                .send_message(&self.alert_chat_id, &message)
                .await?;
            info!("alert sent ({} chars)", message.len());
        }

        Ok(message)
    }

    /// Best-effort delivery to the error chat; a delivery failure only
    /// appends a note to the local diagnostic text.
    async fn report_error(&self, request_no: u64, err: &ScannerError) -> String {
        let mut text = error_report(request_no, err);

        if let Err(notify_err) = self.notifier.send_message(&self.error_chat_id, &text).await {
            warn!("could not deliver error report: {}", notify_err);
            text.push_str("\nCan't notify about this in telegram!\n");
        }

        text
    }
}

fn banner(outcome: &str) {
    println!("\n{}", "*".repeat(100));
    println!("{}", outcome);
    println!("{}\n", "*".repeat(100));
}
