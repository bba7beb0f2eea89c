use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

pub const DEFAULT_CITY: &str = "Ranchi";
pub const DEFAULT_EVENT_WINDOW_DAYS: u32 = 30;
const MAX_EVENT_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    pub day: String,
    pub high: i16,
    pub low: i16,
    pub condition: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub temperature: i16,
    pub condition: String,
    pub humidity: u8,
    pub wind_speed: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub location: String,
    pub safety_score: f32,
    pub level: String,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub emergency_contacts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveTransportKind {
    Buses,
    Trains,
    Flights,
}

impl LiveTransportKind {
    /// Unknown or missing kinds fall back to buses.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("train" | "trains") => Self::Trains,
            Some("flight" | "flights") => Self::Flights,
            _ => Self::Buses,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub from: Option<String>,
    pub to: Option<String>,
    pub mode: String,
    pub distance: String,
    pub duration: String,
    pub route: Vec<RoutePoint>,
    pub instructions: Vec<String>,
    pub traffic: String,
    pub tolls: String,
    pub fuel_cost: String,
}

fn forecast(days: [(&str, i16, i16, &str); 3]) -> Vec<ForecastDay> {
    days.into_iter()
        .map(|(day, high, low, condition)| ForecastDay {
            day: day.to_string(),
            high,
            low,
            condition: condition.to_string(),
        })
        .collect()
}

fn known_city(city: &str) -> &'static str {
    ["Ranchi", "Jamshedpur", "Dhanbad", "Hazaribagh"]
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(city.trim()))
        .unwrap_or(DEFAULT_CITY)
}

/// Canned weather. Unknown cities get Ranchi's numbers under the requested
/// name.
pub fn weather_for(city: Option<&str>) -> WeatherReport {
    let requested = city
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CITY)
        .to_string();

    let (temperature, condition, humidity, wind_speed, days) = match known_city(&requested) {
        "Jamshedpur" => (
            31,
            "Sunny",
            58,
            8,
            [
                ("Today", 35, 24, "Hot"),
                ("Tomorrow", 33, 23, "Sunny"),
                ("Day 3", 32, 22, "Partly Cloudy"),
            ],
        ),
        "Dhanbad" => (
            29,
            "Cloudy",
            72,
            15,
            [
                ("Today", 31, 21, "Overcast"),
                ("Tomorrow", 28, 19, "Rain"),
                ("Day 3", 27, 18, "Heavy Rain"),
            ],
        ),
        _ => (
            28,
            "Partly Cloudy",
            65,
            12,
            [
                ("Today", 32, 22, "Sunny"),
                ("Tomorrow", 30, 20, "Cloudy"),
                ("Day 3", 29, 21, "Light Rain"),
            ],
        ),
    };

    WeatherReport {
        city: requested,
        current: CurrentWeather {
            temperature,
            condition: condition.to_string(),
            humidity,
            wind_speed,
        },
        forecast: forecast(days),
    }
}

pub fn safety_for(location: Option<&str>) -> SafetyReport {
    let requested = location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_CITY)
        .to_string();

    let mut contacts = BTreeMap::from([
        ("police".to_string(), "100".to_string()),
        ("medical".to_string(), "108".to_string()),
    ]);

    let (score, level, alerts, recommendations): (f32, &str, &[&str], &[&str]) =
        match known_city(&requested) {
            "Jamshedpur" => (
                9.0,
                "Very Safe",
                &[],
                &[
                    "Industrial city with good security",
                    "Well-lit roads and public areas",
                    "Regular police patrolling",
                ],
            ),
            "Hazaribagh" => (
                7.5,
                "Moderately Safe",
                &[
                    "Wildlife crossing areas - drive carefully",
                    "Limited mobile connectivity in forest areas",
                ],
                &[
                    "Travel in groups in forest areas",
                    "Inform someone about your itinerary",
                    "Carry first aid kit for wildlife areas",
                ],
            ),
            _ => (
                8.5,
                "Safe",
                &[],
                &[
                    "Carry valid ID while traveling",
                    "Avoid isolated areas after dark",
                    "Keep emergency contacts handy",
                ],
            ),
        };

    if known_city(&requested) == "Hazaribagh" {
        contacts.insert("forest_dept".to_string(), "1926".to_string());
    } else {
        contacts.insert("tourist_helpline".to_string(), "1363".to_string());
    }

    SafetyReport {
        location: requested,
        safety_score: score,
        level: level.to_string(),
        alerts: alerts.iter().map(|a| a.to_string()).collect(),
        recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        emergency_contacts: contacts,
    }
}

pub fn live_transport(kind: LiveTransportKind) -> Vec<Value> {
    match kind {
        LiveTransportKind::Buses => vec![
            json!({
                "id": "JH01-2345",
                "route": "Ranchi - Jamshedpur",
                "currentLocation": "Mango",
                "nextStop": "Adityapur",
                "eta": "15 mins",
                "delay": "5 mins",
                "occupancy": "75%"
            }),
            json!({
                "id": "JH02-6789",
                "route": "Ranchi - Dhanbad",
                "currentLocation": "Ramgarh",
                "nextStop": "Bokaro",
                "eta": "25 mins",
                "delay": "On time",
                "occupancy": "60%"
            }),
        ],
        LiveTransportKind::Trains => vec![json!({
            "id": "18622",
            "name": "Patliputra Express",
            "route": "Ranchi - Delhi",
            "currentLocation": "Muri",
            "nextStop": "Chandil",
            "eta": "12 mins",
            "delay": "10 mins",
            "platform": "2"
        })],
        LiveTransportKind::Flights => vec![json!({
            "id": "6E-7891",
            "route": "Ranchi - Delhi",
            "status": "On Time",
            "departure": "14:30",
            "gate": "A2",
            "terminal": "1"
        })],
    }
}

pub fn route_between(from: Option<&str>, to: Option<&str>, mode: Option<&str>) -> RoutePlan {
    let point = |lat, lng, name: &str| RoutePoint {
        lat,
        lng,
        name: name.to_string(),
    };

    RoutePlan {
        from: from.map(str::to_string),
        to: to.map(str::to_string),
        mode: mode
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or("driving")
            .to_string(),
        distance: "45.2 km".to_string(),
        duration: "1h 15m".to_string(),
        route: vec![
            point(23.3441, 85.3096, "Ranchi"),
            point(23.4559, 85.2401, "Kanke Dam"),
            point(23.5204, 85.1685, "Hundru Falls"),
        ],
        instructions: [
            "Head north on Main Road",
            "Turn right onto NH-33",
            "Continue for 35 km",
            "Turn left at Hundru Falls sign",
            "Arrive at destination",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        traffic: "Light".to_string(),
        tolls: "₹45".to_string(),
        fuel_cost: "₹320".to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub category: String,
    pub description: String,
    pub ticket_price: u32,
    pub organizer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventListing {
    pub location: String,
    pub days: u32,
    pub events: Vec<LocalEvent>,
}

fn events() -> Vec<LocalEvent> {
    let event = |id: &str, title: &str, date: &str, location: &str, category: &str, description: &str, ticket_price, organizer: &str| LocalEvent {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        location: location.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        ticket_price,
        organizer: organizer.to_string(),
    };

    vec![
        event("event_001", "Sarhul Festival Celebration", "2024-03-15", "Ranchi", "Cultural Festival", "Traditional spring festival celebrated by tribal communities", 0, "Jharkhand Tourism Board"),
        event("event_002", "Dokra Art Workshop", "2024-03-20", "Hazaribagh", "Art & Craft", "Learn traditional metal casting techniques", 1500, "Local Artisan Cooperative"),
    ]
}

/// Events at `location` (case-insensitive; `all` lists everything). `days`
/// falls back to 30 when missing or unparseable and is capped at a year.
pub fn local_events(location: &str, days: Option<&str>) -> EventListing {
    let wanted = location.trim().to_lowercase();
    let days = days
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_EVENT_WINDOW_DAYS)
        .min(MAX_EVENT_WINDOW_DAYS);

    let events = events()
        .into_iter()
        .filter(|event| {
            wanted.is_empty() || wanted == "all" || event.location.to_lowercase() == wanted
        })
        .collect();

    EventListing {
        location: location.trim().to_string(),
        days,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_city_uses_ranchi_data_with_requested_name() {
        let report = weather_for(Some("Gumla"));
        assert_eq!(report.city, "Gumla");
        assert_eq!(report.current.temperature, 28);
        assert_eq!(report.forecast.len(), 3);
    }

    #[test]
    fn city_lookup_ignores_case() {
        assert_eq!(weather_for(Some("dhanbad")).current.humidity, 72);
        assert_eq!(weather_for(None).city, "Ranchi");
    }

    #[test]
    fn hazaribagh_has_forest_contact_and_alerts() {
        let report = safety_for(Some("Hazaribagh"));
        assert_eq!(report.alerts.len(), 2);
        assert!(report.emergency_contacts.contains_key("forest_dept"));
        assert!(!report.emergency_contacts.contains_key("tourist_helpline"));
    }

    #[test]
    fn live_transport_kind_defaults_to_buses() {
        assert_eq!(LiveTransportKind::parse(Some("ferry")), LiveTransportKind::Buses);
        assert_eq!(LiveTransportKind::parse(Some("Trains")), LiveTransportKind::Trains);
        assert_eq!(live_transport(LiveTransportKind::Buses).len(), 2);
    }

    #[test]
    fn route_mode_defaults_to_driving() {
        let plan = route_between(Some("Ranchi"), Some("Hundru Falls"), None);
        assert_eq!(plan.mode, "driving");
        assert_eq!(plan.route.len(), 3);
    }

    #[test]
    fn events_match_location_without_case() {
        let ranchi = local_events("ranchi", None);
        assert_eq!(ranchi.days, DEFAULT_EVENT_WINDOW_DAYS);
        assert_eq!(ranchi.events.len(), 1);
        assert_eq!(ranchi.events[0].title, "Sarhul Festival Celebration");

        assert_eq!(local_events("All", Some("7")).events.len(), 2);
        assert!(local_events("Gumla", None).events.is_empty());
    }

    #[test]
    fn event_window_is_bounded() {
        assert_eq!(local_events("Ranchi", Some("soon")).days, 30);
        assert_eq!(local_events("Ranchi", Some("0")).days, 30);
        assert_eq!(local_events("Ranchi", Some("9999")).days, 365);
        assert_eq!(local_events("Ranchi", Some(" 14 ")).days, 14);
    }
}
