//! Read-only analytics for the tourism department dashboard. All datasets are
//! fixed; the summaries are computed from them on each call.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TourismMetrics {
    pub total_visitors: String,
    pub monthly_growth: String,
    pub active_monuments: String,
    pub avg_rating: String,
    pub revenue_generated: String,
    pub revenue_growth: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotSpot {
    pub id: u32,
    pub name: String,
    pub visitors: u64,
    pub growth: String,
    pub rating: f32,
    pub category: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentSplit {
    pub positive: u8,
    pub neutral: u8,
    pub negative: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f32,
    pub trend: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: u32,
    pub location: String,
    pub rating: u8,
    pub comment: String,
    pub sentiment: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackData {
    pub overall: SentimentSplit,
    pub categories: Vec<CategoryScore>,
    pub recent_reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestorationProject {
    pub id: u32,
    pub name: String,
    pub location: String,
    pub status: String,
    pub start_date: String,
    pub completion_date: String,
    pub budget: String,
    pub contractor: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceItem {
    pub id: u32,
    pub monument: String,
    pub location: String,
    pub priority: String,
    pub issue: String,
    pub estimated_cost: String,
    pub reported_date: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitorTrend {
    pub month: String,
    pub visitors: u64,
    pub revenue: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub value: u8,
    pub visitors: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub metrics: TourismMetrics,
    pub visitor_trends: Vec<VisitorTrend>,
    pub category_breakdown: Vec<CategoryShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceSummary {
    pub total_issues: usize,
    pub high_priority: usize,
    pub total_estimated_cost_inr: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestorationSummary {
    pub total_projects: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub total_budget_inr: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceReport {
    pub items: Vec<MaintenanceItem>,
    pub summary: MaintenanceSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestorationReport {
    pub projects: Vec<RestorationProject>,
    pub summary: RestorationSummary,
}

/// Parses display amounts such as `₹850K` or `₹1.2M` into rupees.
/// Unparseable amounts count as zero.
pub fn parse_rupee_amount(value: &str) -> f64 {
    let cleaned = value.trim().trim_start_matches('₹').replace(',', "");
    let (number, multiplier) = if let Some(rest) = cleaned.strip_suffix(['M', 'm']) {
        (rest, 1_000_000.0)
    } else if let Some(rest) = cleaned.strip_suffix(['K', 'k']) {
        (rest, 1_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };

    number
        .trim()
        .parse::<f64>()
        .map(|amount| amount * multiplier)
        .unwrap_or(0.0)
}

pub fn summarize_maintenance(items: &[MaintenanceItem]) -> MaintenanceSummary {
    MaintenanceSummary {
        total_issues: items.len(),
        high_priority: items
            .iter()
            .filter(|item| item.priority.eq_ignore_ascii_case("high"))
            .count(),
        total_estimated_cost_inr: items
            .iter()
            .map(|item| parse_rupee_amount(&item.estimated_cost))
            .sum(),
    }
}

pub fn summarize_restoration(projects: &[RestorationProject]) -> RestorationSummary {
    let with_status = |status: &str| {
        projects
            .iter()
            .filter(|p| p.status.eq_ignore_ascii_case(status))
            .count()
    };

    RestorationSummary {
        total_projects: projects.len(),
        completed: with_status("Completed"),
        in_progress: with_status("In Progress"),
        total_budget_inr: projects.iter().map(|p| parse_rupee_amount(&p.budget)).sum(),
    }
}

pub fn overview() -> DashboardOverview {
    DashboardOverview {
        metrics: TourismMetrics {
            total_visitors: "2,847,392".to_string(),
            monthly_growth: "+12.5%".to_string(),
            active_monuments: "156".to_string(),
            avg_rating: "4.7".to_string(),
            revenue_generated: "₹45.2M".to_string(),
            revenue_growth: "+18.3%".to_string(),
        },
        visitor_trends: [
            ("Jul", 180_000, 2.8),
            ("Aug", 220_000, 3.4),
            ("Sep", 195_000, 3.1),
            ("Oct", 285_000, 4.2),
            ("Nov", 315_000, 4.8),
            ("Dec", 340_000, 5.1),
            ("Jan", 298_000, 4.5),
        ]
        .into_iter()
        .map(|(month, visitors, revenue)| VisitorTrend {
            month: month.to_string(),
            visitors,
            revenue,
        })
        .collect(),
        category_breakdown: [
            ("Religious Sites", 35, 996_590),
            ("Natural Attractions", 28, 797_470),
            ("Wildlife Parks", 20, 569_478),
            ("Historical Sites", 12, 341_687),
            ("Cultural Centers", 5, 142_237),
        ]
        .into_iter()
        .map(|(name, value, visitors)| CategoryShare {
            name: name.to_string(),
            value,
            visitors,
        })
        .collect(),
    }
}

/// Hot spots ordered by visitor count, busiest first.
pub fn hot_spots() -> Vec<HotSpot> {
    let mut spots = [
        (1, "Ranchi Hill", 45_823, "+23%", 4.8, "Natural", "Ranchi"),
        (2, "Jagannath Temple", 38_472, "+15%", 4.6, "Religious", "Ranchi"),
        (3, "Betla National Park", 29_384, "+31%", 4.9, "Wildlife", "Palamu"),
        (4, "Hundru Falls", 27_192, "+8%", 4.5, "Natural", "Ranchi"),
        (5, "Dassam Falls", 24_816, "+19%", 4.7, "Natural", "Ranchi"),
    ]
    .into_iter()
    .map(|(id, name, visitors, growth, rating, category, location)| HotSpot {
        id,
        name: name.to_string(),
        visitors,
        growth: growth.to_string(),
        rating,
        category: category.to_string(),
        location: location.to_string(),
    })
    .collect::<Vec<_>>();

    spots.sort_by(|a, b| b.visitors.cmp(&a.visitors));
    spots
}

pub fn feedback() -> FeedbackData {
    FeedbackData {
        overall: SentimentSplit {
            positive: 78,
            neutral: 16,
            negative: 6,
        },
        categories: [
            ("Cleanliness", 4.2, "+0.3"),
            ("Accessibility", 3.8, "+0.1"),
            ("Facilities", 4.1, "+0.4"),
            ("Staff Behavior", 4.5, "+0.2"),
            ("Safety", 4.3, "+0.1"),
        ]
        .into_iter()
        .map(|(category, score, trend)| CategoryScore {
            category: category.to_string(),
            score,
            trend: trend.to_string(),
        })
        .collect(),
        recent_reviews: [
            (1, "Ranchi Hill", 5, "Absolutely beautiful view and well maintained trails.", "positive", "2024-01-15"),
            (2, "Betla National Park", 4, "Great wildlife experience but could use better road connectivity.", "positive", "2024-01-14"),
            (3, "Hundru Falls", 3, "Nice place but overcrowded during weekends.", "neutral", "2024-01-13"),
        ]
        .into_iter()
        .map(|(id, location, rating, comment, sentiment, date)| Review {
            id,
            location: location.to_string(),
            rating,
            comment: comment.to_string(),
            sentiment: sentiment.to_string(),
            date: date.to_string(),
        })
        .collect(),
    }
}

pub fn restoration_projects() -> Vec<RestorationProject> {
    [
        (1, "Jagannath Temple Restoration", "Ranchi", "Completed", "2023-08-15", "2024-01-10", "₹2.5M", "Heritage Works Ltd."),
        (2, "Ranchi Hill Trail Enhancement", "Ranchi", "In Progress", "2023-12-01", "2024-03-15", "₹1.8M", "Green Infrastructure Co."),
        (3, "Betla Visitor Center Upgrade", "Palamu", "Planning", "2024-02-01", "2024-07-30", "₹3.2M", "TBD"),
    ]
    .into_iter()
    .map(|(id, name, location, status, start, end, budget, contractor)| RestorationProject {
        id,
        name: name.to_string(),
        location: location.to_string(),
        status: status.to_string(),
        start_date: start.to_string(),
        completion_date: end.to_string(),
        budget: budget.to_string(),
        contractor: contractor.to_string(),
    })
    .collect()
}

pub fn maintenance_items() -> Vec<MaintenanceItem> {
    [
        (1, "Deogarh Temple Complex", "Deoghar", "High", "Structural damage to main entrance", "₹850K", "2024-01-10", "Structural"),
        (2, "Palamau Fort", "Palamu", "Medium", "Weathering of stone walls", "₹450K", "2024-01-08", "Conservation"),
        (3, "Maluti Temples", "Dumka", "High", "Water seepage in foundation", "₹1.2M", "2024-01-05", "Structural"),
        (4, "Rajrappa Falls Viewing Area", "Ramgarh", "Low", "Railing maintenance required", "₹120K", "2024-01-12", "Safety"),
    ]
    .into_iter()
    .map(|(id, monument, location, priority, issue, cost, reported, category)| MaintenanceItem {
        id,
        monument: monument.to_string(),
        location: location.to_string(),
        priority: priority.to_string(),
        issue: issue.to_string(),
        estimated_cost: cost.to_string(),
        reported_date: reported.to_string(),
        category: category.to_string(),
    })
    .collect()
}

pub fn maintenance_report() -> MaintenanceReport {
    let items = maintenance_items();
    let summary = summarize_maintenance(&items);
    MaintenanceReport { items, summary }
}

pub fn restoration_report() -> RestorationReport {
    let projects = restoration_projects();
    let summary = summarize_restoration(&projects);
    RestorationReport { projects, summary }
}
