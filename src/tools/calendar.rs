//! Calendar and appointment tools
//!
//! Calendar endpoints are served under the `2021-04-15` API version.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{encode_segment as seg, GhlClient, LEGACY_API_VERSION};
use crate::registry::{parse_args, ToolArgs, ToolDescriptor, ToolError, ToolModule};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarsParams {
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
    /// Only calendars in this group
    pub group_id: Option<String>,
    pub show_drafted: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarIdParams {
    /// Calendar id
    pub calendar_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarParams {
    pub name: String,
    pub description: Option<String>,
    /// round_robin, event, class_booking, collective, service_booking or personal
    pub calendar_type: Option<String>,
    pub group_id: Option<String>,
    /// Booking page slug
    pub slug: Option<String>,
    /// Slot length in minutes
    pub slot_duration: Option<u32>,
    /// Team members: [{"userId": "...", "priority": 0.5}]
    pub team_members: Option<Vec<Value>>,
    /// Weekly availability rules
    pub open_hours: Option<Vec<Value>>,
    #[serde(default = "active")]
    pub is_active: bool,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

fn active() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventsParams {
    /// Start of the range, epoch milliseconds
    pub start_time: String,
    /// End of the range, epoch milliseconds
    pub end_time: String,
    /// One of calendarId, userId or groupId is required
    pub calendar_id: Option<String>,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlotsParams {
    /// Calendar id
    #[serde(skip_serializing)]
    pub calendar_id: String,
    /// Start date, epoch milliseconds
    pub start_date: String,
    /// End date, epoch milliseconds
    pub end_date: String,
    /// IANA timezone for the returned slots
    pub timezone: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentParams {
    pub calendar_id: String,
    pub contact_id: String,
    /// ISO 8601 start time
    pub start_time: String,
    /// ISO 8601 end time (defaults to the calendar slot length)
    pub end_time: Option<String>,
    pub title: Option<String>,
    /// new, confirmed, cancelled, showed, noshow or invalid
    pub appointment_status: Option<String>,
    pub assigned_user_id: Option<String>,
    pub address: Option<String>,
    /// Skip the calendar's availability checks
    pub ignore_date_range: Option<bool>,
    pub to_notify: Option<bool>,
    /// Location id (defaults to the configured location)
    pub location_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentIdParams {
    /// Appointment (event) id
    pub appointment_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentParams {
    /// Appointment (event) id
    #[serde(skip_serializing)]
    pub appointment_id: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub title: Option<String>,
    pub appointment_status: Option<String>,
    pub assigned_user_id: Option<String>,
    pub address: Option<String>,
    pub ignore_date_range: Option<bool>,
    pub to_notify: Option<bool>,
}

pub struct CalendarTools {
    client: Arc<GhlClient>,
}

impl CalendarTools {
    pub fn new(client: Arc<GhlClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ToolModule for CalendarTools {
    fn namespace(&self) -> &str {
        "calendar"
    }

    fn description(&self) -> &str {
        "Manage calendars, free slots and appointments"
    }

    fn tools(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new::<LocationParams>("get_calendar_groups", "List calendar groups"),
            ToolDescriptor::new::<CalendarsParams>("get_calendars", "List calendars in a location"),
            ToolDescriptor::new::<CalendarIdParams>("get_calendar", "Get a calendar by id"),
            ToolDescriptor::new::<CreateCalendarParams>("create_calendar", "Create a calendar"),
            ToolDescriptor::new::<CalendarIdParams>("delete_calendar", "Delete a calendar"),
            ToolDescriptor::new::<CalendarEventsParams>(
                "get_calendar_events",
                "List appointments in a time range",
            ),
            ToolDescriptor::new::<FreeSlotsParams>(
                "get_free_slots",
                "List bookable slots of a calendar",
            ),
            ToolDescriptor::new::<CreateAppointmentParams>("create_appointment", "Book an appointment"),
            ToolDescriptor::new::<AppointmentIdParams>("get_appointment", "Get an appointment by id"),
            ToolDescriptor::new::<UpdateAppointmentParams>(
                "update_appointment",
                "Reschedule or update an appointment",
            ),
            ToolDescriptor::new::<AppointmentIdParams>("delete_appointment", "Delete an appointment"),
        ]
    }

    async fn execute(&self, tool: &str, args: ToolArgs) -> Result<Value, ToolError> {
        let client = &self.client;
        let request = match tool {
            "get_calendar_groups" => {
                let p: LocationParams = parse_args(args)?;
                client
                    .get("/calendars/groups")
                    .param("locationId", client.location_or_default(p.location_id))
            }
            "get_calendars" => {
                let mut p: CalendarsParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.get("/calendars/").query(&p)?
            }
            "get_calendar" => {
                let p: CalendarIdParams = parse_args(args)?;
                client.get(format!("/calendars/{}", seg(&p.calendar_id)))
            }
            "create_calendar" => {
                let mut p: CreateCalendarParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post("/calendars/").json(&p)?
            }
            "delete_calendar" => {
                let p: CalendarIdParams = parse_args(args)?;
                client.delete(format!("/calendars/{}", seg(&p.calendar_id)))
            }
            "get_calendar_events" => {
                let mut p: CalendarEventsParams = parse_args(args)?;
                if p.calendar_id.is_none() && p.user_id.is_none() && p.group_id.is_none() {
                    return Err(ToolError::InvalidArguments(
                        "one of calendarId, userId or groupId is required".to_string(),
                    ));
                }
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.get("/calendars/events").query(&p)?
            }
            "get_free_slots" => {
                let p: FreeSlotsParams = parse_args(args)?;
                client
                    .get(format!("/calendars/{}/free-slots", seg(&p.calendar_id)))
                    .query(&p)?
            }
            "create_appointment" => {
                let mut p: CreateAppointmentParams = parse_args(args)?;
                p.location_id = Some(client.location_or_default(p.location_id.take()));
                client.post("/calendars/events/appointments").json(&p)?
            }
            "get_appointment" => {
                let p: AppointmentIdParams = parse_args(args)?;
                client.get(format!("/calendars/events/appointments/{}", seg(&p.appointment_id)))
            }
            "update_appointment" => {
                let p: UpdateAppointmentParams = parse_args(args)?;
                client
                    .put(format!("/calendars/events/appointments/{}", seg(&p.appointment_id)))
                    .json(&p)?
            }
            "delete_appointment" => {
                let p: AppointmentIdParams = parse_args(args)?;
                client.delete(format!("/calendars/events/{}", seg(&p.appointment_id)))
            }
            _ => return Err(ToolError::UnknownTool(tool.to_string())),
        };
        Ok(request.version(LEGACY_API_VERSION).send().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{call, call_ok};
    use serde_json::json;

    #[tokio::test]
    async fn test_free_slots_query() {
        let req = call_ok(
            CalendarTools::new,
            "get_free_slots",
            json!({"calendarId": "cal1", "startDate": "1700000000000", "endDate": "1700600000000"}),
        )
        .await;
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/calendars/cal1/free-slots");
        assert_eq!(req.header("version").as_deref(), Some(LEGACY_API_VERSION));
        let query = req.query.unwrap_or_default();
        assert!(query.contains("startDate=1700000000000"));
        assert!(query.contains("endDate=1700600000000"));
        assert!(!query.contains("calendarId"));
    }

    #[tokio::test]
    async fn test_events_require_an_owner() {
        let (result, requests) = call(
            CalendarTools::new,
            "get_calendar_events",
            json!({"startTime": "1", "endTime": "2"}),
        )
        .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_create_appointment_body() {
        let req = call_ok(
            CalendarTools::new,
            "create_appointment",
            json!({
                "calendarId": "cal1",
                "contactId": "c1",
                "startTime": "2024-01-01T10:00:00Z"
            }),
        )
        .await;
        assert_eq!(req.path, "/calendars/events/appointments");
        assert_eq!(
            req.json(),
            json!({
                "calendarId": "cal1",
                "contactId": "c1",
                "startTime": "2024-01-01T10:00:00Z",
                "locationId": "test-location"
            })
        );
    }

    #[tokio::test]
    async fn test_create_calendar_is_active_by_default() {
        let req = call_ok(CalendarTools::new, "create_calendar", json!({"name": "Demos"})).await;
        assert_eq!(req.json()["isActive"], true);
    }
}
