//! Booking backend HTTP client
//!
//! Each call is a single round trip: no retries, no timeout, no cancellation.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use rb_core::config::normalize_base_url;
use rb_core::{ApiConfig, BookingCreated, BookingPayload, Room};

use crate::error::{BookingError, Result, CREATE_BOOKING_FALLBACK};

/// Client for the room booking backend
#[derive(Clone, Debug)]
pub struct BookingClient {
    client: Client,
    base_url: String,
}

impl BookingClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url)
    }

    /// Create a client for an explicit base URL. A trailing `/` is dropped.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        let base_url = normalize_base_url(base_url);

        info!("Booking client initialized for: {}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL every request is issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List bookable room types
    pub async fn fetch_rooms(&self) -> Result<Vec<Room>> {
        let url = format!("{}/api/rooms", self.base_url);

        debug!("Fetching rooms from: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Fetch rooms failed: {}", status);
            return Err(BookingError::FetchRooms);
        }

        let rooms: Vec<Room> = parse_json(response).await?;

        info!("Fetched {} room types", rooms.len());
        Ok(rooms)
    }

    /// Submit a booking
    pub async fn create_booking(&self, payload: &BookingPayload) -> Result<BookingCreated> {
        let url = format!("{}/api/bookings", self.base_url);

        debug!("Creating booking: {} {} -> {}", payload.room_type, payload.check_in, payload.check_out);

        // .json() sets `Content-Type: application/json`
        let response = self.client.post(&url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = extract_error_message(&body);
            error!("Create booking failed: {} - {}", status, message);
            return Err(BookingError::CreateBooking(message));
        }

        let created: BookingCreated = parse_json(response).await?;

        info!("Created booking: {}", created.id);
        Ok(created)
    }
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| BookingError::Parse(e.to_string()))
}

/// Pick the backend's `error` string out of an error body, or fall back
fn extract_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .filter(|e| !e.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| CREATE_BOOKING_FALLBACK.to_string())
}
