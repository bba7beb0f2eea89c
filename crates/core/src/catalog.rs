use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::payment::booking_reference;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
    pub experience_years: u8,
    pub price_per_day: u32,
    pub rating: f32,
    pub total_reviews: u32,
    pub availability: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub location: String,
    pub duration: String,
    pub group_size: String,
    pub price: u32,
    pub rating: f32,
    pub total_reviews: u32,
    pub description: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub location: String,
    pub rating: f32,
    pub total_reviews: u32,
    pub price_per_night: u32,
    pub amenities: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportOption {
    pub id: u32,
    pub transport_type: String,
    pub name: String,
    pub from_location: String,
    pub to_location: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: u32,
    pub class_type: String,
    pub availability: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "confirmed" => Some(Self::Confirmed),
            "pending" => Some(Self::Pending),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub reference: String,
    pub booking_type: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub guests: u8,
    pub amount: u32,
    pub status: BookingStatus,
    pub payment_status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A booking request as posted by the checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingDraft {
    #[serde(default)]
    pub user: BookingContact,
    #[serde(default)]
    pub booking_type: Option<String>,
    #[serde(default)]
    pub booking_data: Value,
    #[serde(default)]
    pub total_amount: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum BookingError {
    #[error("booking_type is required")]
    MissingType,
    #[error("user email is required")]
    MissingEmail,
    #[error("total_amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: u64,
    pub reference: String,
    pub booking_type: String,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

impl PriceRange {
    /// Parses `"2000-3000"`. Anything else means "no price filter".
    pub fn parse(value: &str) -> Option<Self> {
        let (min, max) = value.trim().split_once('-')?;
        let min = min.trim().parse::<u32>().ok()?;
        let max = max.trim().parse::<u32>().ok()?;
        Some(Self { min, max })
    }

    pub fn contains(&self, price: u32) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuideFilter {
    pub location: Option<String>,
    pub specialty: Option<String>,
    pub price_range: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub price_range: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelFilter {
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportSearch {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub transport_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingFilter {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// A filter value that is empty or one of the "show everything" labels
/// offered by the booking forms.
fn active_filter(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match value.to_lowercase().as_str() {
        "all" | "all locations" | "all categories" | "all prices" => None,
        _ => Some(value),
    }
}

fn active_price_range(value: Option<&str>) -> Option<PriceRange> {
    active_filter(value).and_then(PriceRange::parse)
}

pub fn search_guides(filter: &GuideFilter) -> Vec<Guide> {
    let location = active_filter(filter.location.as_deref());
    let specialty = active_filter(filter.specialty.as_deref()).map(str::to_lowercase);
    let price = active_price_range(filter.price_range.as_deref());

    guides()
        .into_iter()
        .filter(|guide| location.is_none_or(|loc| guide.location.eq_ignore_ascii_case(loc)))
        .filter(|guide| {
            specialty.as_deref().is_none_or(|wanted| {
                guide
                    .specialties
                    .iter()
                    .any(|s| s.to_lowercase().contains(wanted))
            })
        })
        .filter(|guide| price.is_none_or(|range| range.contains(guide.price_per_day)))
        .collect()
}

pub fn search_activities(filter: &ActivityFilter) -> Vec<Activity> {
    let category = active_filter(filter.category.as_deref());
    let location = active_filter(filter.location.as_deref());
    let price = active_price_range(filter.price_range.as_deref());

    activities()
        .into_iter()
        .filter(|a| category.is_none_or(|c| a.category.eq_ignore_ascii_case(c)))
        .filter(|a| location.is_none_or(|l| a.location.eq_ignore_ascii_case(l)))
        .filter(|a| price.is_none_or(|range| range.contains(a.price)))
        .collect()
}

pub fn search_hotels(filter: &HotelFilter) -> Vec<Hotel> {
    let location = active_filter(filter.location.as_deref());
    hotels()
        .into_iter()
        .filter(|hotel| location.is_none_or(|l| hotel.location.eq_ignore_ascii_case(l)))
        .collect()
}

pub fn search_transport(search: &TransportSearch) -> Vec<TransportOption> {
    let from = active_filter(search.from.as_deref());
    let to = active_filter(search.to.as_deref());
    let kind = active_filter(search.transport_type.as_deref());

    transport_options()
        .into_iter()
        .filter(|t| t.availability == "available")
        .filter(|t| from.is_none_or(|f| t.from_location.eq_ignore_ascii_case(f)))
        .filter(|t| to.is_none_or(|d| t.to_location.eq_ignore_ascii_case(d)))
        .filter(|t| kind.is_none_or(|k| t.transport_type.eq_ignore_ascii_case(k)))
        .collect()
}

pub fn search_bookings(filter: &BookingFilter) -> Vec<Booking> {
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let status = active_filter(filter.status.as_deref()).map(BookingStatus::parse);

    bookings()
        .into_iter()
        .filter(|b| {
            needle.is_empty()
                || b.title.to_lowercase().contains(&needle)
                || b.reference.to_lowercase().contains(&needle)
        })
        .filter(|b| match status {
            None => true,
            Some(Some(wanted)) => b.status == wanted,
            Some(None) => false,
        })
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn guides() -> Vec<Guide> {
    vec![
        Guide {
            id: 1,
            name: "Rajesh Kumar".to_string(),
            location: "Ranchi".to_string(),
            specialties: strings(&["Cultural Heritage", "Tribal History", "Local Festivals"]),
            languages: strings(&["Hindi", "English", "Santhali"]),
            experience_years: 8,
            price_per_day: 2500,
            rating: 4.9,
            total_reviews: 127,
            availability: "Available".to_string(),
            description: "Expert in Jharkhand's tribal culture and traditional festivals. Certified guide with deep knowledge of Sohrai art and local customs.".to_string(),
        },
        Guide {
            id: 2,
            name: "Priya Devi".to_string(),
            location: "Jamshedpur".to_string(),
            specialties: strings(&["Art & Crafts", "Dokra Workshops", "Women's Cooperatives"]),
            languages: strings(&["Hindi", "English", "Bengali"]),
            experience_years: 6,
            price_per_day: 2200,
            rating: 4.8,
            total_reviews: 89,
            availability: "Available".to_string(),
            description: "Specializes in traditional crafts and women's empowerment programs. Connects visitors with local artisan communities.".to_string(),
        },
        Guide {
            id: 3,
            name: "Amit Singh".to_string(),
            location: "Hazaribagh".to_string(),
            specialties: strings(&["Adventure Tourism", "Trekking", "Wildlife"]),
            languages: strings(&["Hindi", "English"]),
            experience_years: 10,
            price_per_day: 3000,
            rating: 4.7,
            total_reviews: 156,
            availability: "Busy until Dec 15".to_string(),
            description: "Adventure specialist with extensive knowledge of Jharkhand's national parks and trekking routes. Safety certified.".to_string(),
        },
        Guide {
            id: 4,
            name: "Sunita Kumari".to_string(),
            location: "Deoghar".to_string(),
            specialties: strings(&["Spiritual Sites", "Temple History", "Meditation"]),
            languages: strings(&["Hindi", "English", "Sanskrit"]),
            experience_years: 12,
            price_per_day: 2800,
            rating: 4.9,
            total_reviews: 203,
            availability: "Available".to_string(),
            description: "Spiritual guide with deep knowledge of Jharkhand's sacred sites and religious traditions. Meditation instructor.".to_string(),
        },
    ]
}

pub fn activities() -> Vec<Activity> {
    let activity = |id, title: &str, category: &str, location: &str, duration: &str, group: &str, price, rating, reviews, description: &str, highlights: &[&str]| Activity {
        id,
        title: title.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        duration: duration.to_string(),
        group_size: group.to_string(),
        price,
        rating,
        total_reviews: reviews,
        description: description.to_string(),
        highlights: strings(highlights),
    };

    vec![
        activity(
            1,
            "Sohrai Art Workshop",
            "Art & Culture",
            "Hazaribagh",
            "4 hours",
            "6-12 people",
            1500,
            4.8,
            45,
            "Learn the traditional Sohrai wall painting technique from local artists. Includes materials and lunch.",
            &["UNESCO recognized art form", "Local artist instruction", "Take home your artwork", "Traditional lunch"],
        ),
        activity(
            2,
            "Dokra Metal Craft Experience",
            "Art & Culture",
            "Ranchi",
            "6 hours",
            "4-8 people",
            2200,
            4.9,
            32,
            "Hands-on experience creating traditional Dokra metal artifacts using ancient lost-wax casting technique.",
            &["Ancient casting technique", "Create your own piece", "Master craftsman guidance", "Cultural storytelling"],
        ),
        activity(
            3,
            "Netarhat Sunrise Trek",
            "Adventure",
            "Netarhat",
            "8 hours",
            "8-15 people",
            1800,
            4.7,
            89,
            "Early morning trek to witness spectacular sunrise from Queen of Chotanagpur plateau.",
            &["Spectacular sunrise views", "Professional guide", "Breakfast included", "Photography spots"],
        ),
        activity(
            4,
            "Betla National Park Safari",
            "Wildlife",
            "Betla",
            "5 hours",
            "6-10 people",
            2500,
            4.6,
            67,
            "Wildlife safari in Betla National Park with chances to spot elephants, tigers, and various bird species.",
            &["Wildlife photography", "Expert naturalist", "Jeep safari", "Bird watching"],
        ),
        activity(
            5,
            "Deoghar Temple Circuit",
            "Spiritual",
            "Deoghar",
            "6 hours",
            "10-20 people",
            1200,
            4.8,
            156,
            "Spiritual journey covering major temples including Baidyanath Jyotirlinga with cultural insights.",
            &["Sacred Jyotirlinga", "Cultural significance", "Local guide", "Prasad included"],
        ),
        activity(
            6,
            "Karma Festival Celebration",
            "Festival",
            "Various Villages",
            "Full Day",
            "15-25 people",
            3000,
            4.9,
            78,
            "Participate in authentic Karma festival celebrations with tribal communities.",
            &["Traditional dance", "Community feast", "Cultural immersion", "Festival participation"],
        ),
    ]
}

pub fn hotels() -> Vec<Hotel> {
    let hotel = |id, name: &str, category: &str, location: &str, rating, reviews, price, amenities: &[&str], description: &str| Hotel {
        id,
        name: name.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        rating,
        total_reviews: reviews,
        price_per_night: price,
        amenities: strings(amenities),
        description: description.to_string(),
    };

    vec![
        hotel(
            1,
            "Ranchi Heritage Hotel",
            "Heritage",
            "Ranchi",
            4.5,
            234,
            4500,
            &["Free WiFi", "Restaurant", "Parking", "Room Service"],
            "Beautifully restored heritage property in the heart of Ranchi with traditional architecture.",
        ),
        hotel(
            2,
            "Eco Lodge Netarhat",
            "Eco-Lodge",
            "Netarhat",
            4.7,
            89,
            3200,
            &["Nature Views", "Organic Food", "Trekking", "Bonfire"],
            "Sustainable eco-lodge surrounded by pristine forests with panoramic hill views.",
        ),
        hotel(
            3,
            "Jamshedpur Business Hotel",
            "Business",
            "Jamshedpur",
            4.3,
            456,
            3800,
            &["Business Center", "Gym", "Conference Hall", "Airport Shuttle"],
            "Modern business hotel with excellent connectivity and professional amenities.",
        ),
        hotel(
            4,
            "Deoghar Spiritual Retreat",
            "Spiritual",
            "Deoghar",
            4.6,
            167,
            2800,
            &["Meditation Hall", "Vegetarian Food", "Temple Proximity", "Yoga Classes"],
            "Peaceful retreat near sacred temples, perfect for spiritual seekers and pilgrims.",
        ),
    ]
}

pub fn transport_options() -> Vec<TransportOption> {
    let option = |id, kind: &str, name: &str, from: &str, to: &str, dep: &str, arr: &str, duration: &str, price, class: &str, availability: &str| TransportOption {
        id,
        transport_type: kind.to_string(),
        name: name.to_string(),
        from_location: from.to_string(),
        to_location: to.to_string(),
        departure_time: dep.to_string(),
        arrival_time: arr.to_string(),
        duration: duration.to_string(),
        price,
        class_type: class.to_string(),
        availability: availability.to_string(),
    };

    vec![
        option(1, "train", "Rajdhani Express", "Delhi", "Ranchi", "06:00", "18:30", "12h 30m", 2450, "3AC", "available"),
        option(2, "train", "Hatia Express", "Delhi", "Ranchi", "14:20", "08:45", "18h 25m", 1850, "SL", "available"),
        option(3, "flight", "IndiGo 6E-123", "Delhi", "Ranchi", "09:15", "11:30", "2h 15m", 8500, "Economy", "available"),
        option(4, "train", "Shatabdi Express", "Kolkata", "Ranchi", "13:50", "21:05", "7h 15m", 1150, "CC", "available"),
        option(5, "bus", "JSRTC Volvo", "Ranchi", "Jamshedpur", "07:30", "11:00", "3h 30m", 450, "AC Seater", "available"),
        option(6, "flight", "Air India AI-9711", "Mumbai", "Ranchi", "16:40", "19:05", "2h 25m", 7200, "Economy", "sold_out"),
    ]
}

/// Accepts a booking as pending. Nothing is stored; the caller hands out
/// `booking_id`.
pub fn create_booking(
    draft: &BookingDraft,
    booking_id: u64,
    now: DateTime<Utc>,
) -> Result<BookingConfirmation, BookingError> {
    let booking_type = draft
        .booking_type
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .ok_or(BookingError::MissingType)?;
    let has_email = draft
        .user
        .email
        .as_deref()
        .is_some_and(|email| !email.trim().is_empty());
    if !has_email {
        return Err(BookingError::MissingEmail);
    }
    if !draft.total_amount.is_finite() || draft.total_amount < 0.0 {
        return Err(BookingError::InvalidAmount(draft.total_amount));
    }

    Ok(BookingConfirmation {
        booking_id,
        reference: booking_reference(now.timestamp_millis()),
        booking_type: booking_type.to_lowercase(),
        total_amount: draft.total_amount,
        status: BookingStatus::Pending,
        message: "Booking created successfully".to_string(),
        created_at: now.to_rfc3339(),
    })
}

pub fn bookings() -> Vec<Booking> {
    let booking = |id: &str, reference: &str, kind: &str, title: &str, date: &str, location: &str, guests, amount, status, payment: &str, created: &str| Booking {
        id: id.to_string(),
        reference: reference.to_string(),
        booking_type: kind.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        location: location.to_string(),
        guests,
        amount,
        status,
        payment_status: payment.to_string(),
        created_at: created.to_string(),
    };

    vec![
        booking("1", "PRH-123456", "activity", "Hundru Falls Adventure Tour", "2024-01-15", "Hundru Falls, Ranchi", 2, 3500, BookingStatus::Confirmed, "paid", "2024-01-10"),
        booking("2", "PRH-789012", "guide", "Local Guide - Ravi Kumar", "2024-01-20", "Betla National Park", 4, 2000, BookingStatus::Confirmed, "paid", "2024-01-12"),
        booking("3", "PRH-345678", "hotel", "Hotel Radisson Blu", "2024-01-25", "Ranchi", 2, 8500, BookingStatus::Pending, "pending", "2024-01-14"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_range_parses_bounds() {
        let range = PriceRange::parse("2000-2600").unwrap();
        assert!(range.contains(2000));
        assert!(range.contains(2600));
        assert!(!range.contains(2601));
        assert!(PriceRange::parse("cheap").is_none());
    }

    #[test]
    fn guide_filters_combine() {
        let all = search_guides(&GuideFilter::default());
        assert_eq!(all.len(), 4);

        let filtered = search_guides(&GuideFilter {
            location: Some("all".to_string()),
            specialty: Some("trek".to_string()),
            price_range: Some("2500-3000".to_string()),
        });
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Amit Singh");

        let none = search_guides(&GuideFilter {
            location: Some("Ranchi".to_string()),
            specialty: None,
            price_range: Some("0-1000".to_string()),
        });
        assert!(none.is_empty());
    }

    #[test]
    fn activity_placeholders_mean_no_filter() {
        let filtered = search_activities(&ActivityFilter {
            category: Some("All categories".to_string()),
            location: Some("All locations".to_string()),
            price_range: Some("All prices".to_string()),
        });
        assert_eq!(filtered.len(), activities().len());

        let art = search_activities(&ActivityFilter {
            category: Some("Art & Culture".to_string()),
            ..ActivityFilter::default()
        });
        assert_eq!(art.len(), 2);
    }

    #[test]
    fn transport_search_skips_unavailable_and_ignores_case() {
        let results = search_transport(&TransportSearch {
            from: Some("delhi".to_string()),
            to: Some("ranchi".to_string()),
            ..TransportSearch::default()
        });
        assert_eq!(results.len(), 3);

        let mumbai = search_transport(&TransportSearch {
            from: Some("Mumbai".to_string()),
            ..TransportSearch::default()
        });
        assert!(mumbai.is_empty());
    }

    #[test]
    fn bookings_filter_by_text_and_status() {
        let by_reference = search_bookings(&BookingFilter {
            search: Some("prh-789".to_string()),
            status: None,
        });
        assert_eq!(by_reference.len(), 1);

        let pending = search_bookings(&BookingFilter {
            search: None,
            status: Some("pending".to_string()),
        });
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].reference, "PRH-345678");

        let unknown_status = search_bookings(&BookingFilter {
            search: None,
            status: Some("refunded".to_string()),
        });
        assert!(unknown_status.is_empty());
    }

    fn draft(booking_type: Option<&str>, email: Option<&str>, total_amount: f64) -> BookingDraft {
        BookingDraft {
            user: BookingContact {
                name: Some("Asha".to_string()),
                email: email.map(str::to_string),
                phone: None,
            },
            booking_type: booking_type.map(str::to_string),
            booking_data: serde_json::json!({ "hotel_id": 2, "nights": 2 }),
            total_amount,
        }
    }

    #[test]
    fn new_bookings_start_pending() {
        use chrono::TimeZone;
        let now = Utc.timestamp_millis_opt(1_704_067_200_123).unwrap();

        let confirmation =
            create_booking(&draft(Some(" Hotel "), Some("asha@example.com"), 8500.0), 4, now)
                .unwrap();

        assert_eq!(confirmation.booking_id, 4);
        assert_eq!(confirmation.status, BookingStatus::Pending);
        assert_eq!(confirmation.booking_type, "hotel");
        assert_eq!(confirmation.reference, "PRH-200123");
        assert_eq!(confirmation.message, "Booking created successfully");
    }

    #[test]
    fn incomplete_bookings_are_rejected() {
        let now = Utc::now();
        assert_eq!(
            create_booking(&draft(None, Some("a@b.in"), 10.0), 1, now).unwrap_err(),
            BookingError::MissingType
        );
        assert_eq!(
            create_booking(&draft(Some("guide"), Some("  "), 10.0), 1, now).unwrap_err(),
            BookingError::MissingEmail
        );
        assert!(matches!(
            create_booking(&draft(Some("guide"), Some("a@b.in"), -1.0), 1, now),
            Err(BookingError::InvalidAmount(_))
        ));
        // A free booking is allowed.
        assert!(create_booking(&draft(Some("event"), Some("a@b.in"), 0.0), 1, now).is_ok());
    }
}
