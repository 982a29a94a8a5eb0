//! Booking domain types shared by the API client and the app

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Bookable room category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomCode {
    Single,
    Double,
    Family,
}

impl RoomCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            "family" => Ok(Self::Family),
            _ => Err(Error::UnknownRoomCode(s.to_string())),
        }
    }
}

/// Room type as served by `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub code: RoomCode,
    pub name: String,
    pub total_rooms: i64,
    /// `null` and a missing field both mean "unknown"
    #[serde(default)]
    pub capacity: Option<i64>,
}

/// Request body for `POST /api/bookings`
///
/// Dates are passed through as the caller wrote them; the backend owns validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub check_in: String,
    pub check_out: String,
    pub room_type: RoomCode,
    pub people: u32,
    pub name: String,
    pub phone: String,
    pub need_pickup: bool,
    pub line_user_id: String,
    pub line_display_name: String,
}

impl BookingPayload {
    /// Create a payload for a stay. Guest and LINE fields start empty.
    pub fn new(
        check_in: impl Into<String>,
        check_out: impl Into<String>,
        room_type: RoomCode,
        people: u32,
    ) -> Self {
        Self {
            check_in: check_in.into(),
            check_out: check_out.into(),
            room_type,
            people,
            name: String::new(),
            phone: String::new(),
            need_pickup: false,
            line_user_id: String::new(),
            line_display_name: String::new(),
        }
    }

    /// Set the guest contact details
    pub fn with_guest(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.name = name.into();
        self.phone = phone.into();
        self
    }

    /// Request a pickup
    pub fn with_pickup(mut self, need_pickup: bool) -> Self {
        self.need_pickup = need_pickup;
        self
    }

    /// Attach the LINE identity of the person booking
    pub fn with_line_user(
        mut self,
        user_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        self.line_user_id = user_id.into();
        self.line_display_name = display_name.into();
        self
    }
}

/// Successful booking response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingCreated {
    pub id: String,
}
