//! Insight synthesis: variation, anomalies, forecast, alerts, suggestions
//!
//! Every rule is independent and cumulative; list order follows rule order.
//! Randomness (surface variation, stable-trend jitter) is drawn from the
//! caller's generator so a seeded generator pins the output.

use rand::Rng;

use super::analysis::{Alert, Anomaly, ForecastPoint, Severity};
use super::water_index::{IndexTrend, WaterIndex};
use super::weather::WeatherSnapshot;
use super::zone::AgricultureStats;

/// Computed surfaces at or below this are replaced by zone area (ha)
pub const MIN_MEASURED_SURFACE_HECTARES: f64 = 10.0;

/// Surface used when neither geometry nor zones provide one (ha)
pub const DEFAULT_SURFACE_HECTARES: f64 = 1000.0;

/// Number of forecast days
pub const FORECAST_DAYS: u32 = 7;

/// Daily growth under an increasing trend
pub const INCREASING_DAILY_FACTOR: f64 = 0.01;

/// Daily shrink under a decreasing trend
pub const DECREASING_DAILY_FACTOR: f64 = -0.015;

/// Half width of the stable-trend jitter per day
pub const STABLE_JITTER: f64 = 0.005;

/// Confidence of the first forecast day
pub const INITIAL_CONFIDENCE: f64 = 0.95;

/// Confidence lost per forecast day
pub const CONFIDENCE_DECAY: f64 = 0.05;

/// Confidence never drops below this
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Pick the surface the forecast is built on
pub fn final_surface(surface_hectares: f64, agriculture: &AgricultureStats) -> f64 {
    if surface_hectares > MIN_MEASURED_SURFACE_HECTARES {
        surface_hectares
    } else if agriculture.total_surface > 0.0 {
        agriculture.total_surface
    } else {
        DEFAULT_SURFACE_HECTARES
    }
}

/// Draw a surface variation (%) in the regime implied by the index
///
/// Dry (< 0.25): [-10, -2). Wet (> 0.45): [1, 7). Otherwise [-2, 2).
pub fn surface_variation<R: Rng + ?Sized>(index: f64, rng: &mut R) -> f64 {
    let draw: f64 = rng.gen();
    if index < 0.25 {
        -draw * 8.0 - 2.0
    } else if index > 0.45 {
        draw * 6.0 + 1.0
    } else {
        draw * 4.0 - 2.0
    }
}

/// Detect anomalies; emits a single low-severity entry when nothing fires
pub fn detect_anomalies(index: f64, variation: f64, weather: &WeatherSnapshot) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();
    let mut push = |kind: &str, severity: Severity, description: String| {
        anomalies.push(Anomaly {
            kind: kind.to_string(),
            severity,
            description,
        })
    };

    if index < 0.2 {
        push(
            "Very low water index",
            Severity::High,
            format!("Critical water index ({}). Severe water stress risk.", index),
        );
    } else if index < 0.3 {
        push(
            "Low water index",
            Severity::Medium,
            format!("Water index below the optimal threshold ({}). Monitoring recommended.", index),
        );
    }

    if variation < -5.0 {
        push(
            "Significant reduction",
            Severity::High,
            format!(
                "Water surface down {:.1}%. Probable water stress.",
                variation.abs()
            ),
        );
    } else if variation > 8.0 {
        push(
            "Significant increase",
            Severity::Medium,
            format!("Water surface up {:.1}%. Watch for flood risk.", variation),
        );
    }

    if weather.temperature > 38.0 {
        push(
            "Extreme temperature",
            Severity::High,
            format!(
                "Temperature of {}°C. Accelerated evaporation expected.",
                weather.temperature
            ),
        );
    }

    if weather.precipitation_mm < 0.1 && weather.humidity < 30.0 {
        push(
            "Drought conditions",
            Severity::High,
            "No precipitation and low humidity. Water stress risk.".to_string(),
        );
    }

    if anomalies.is_empty() {
        anomalies.push(Anomaly {
            kind: "Normal conditions".to_string(),
            severity: Severity::Low,
            description: format!(
                "Water body in good condition. Water index: {}, favorable weather.",
                index
            ),
        });
    }

    anomalies
}

/// Seven-day surface extrapolation with decaying confidence
pub fn forecast_surface<R: Rng + ?Sized>(
    final_surface: f64,
    trend: IndexTrend,
    rng: &mut R,
) -> Vec<ForecastPoint> {
    (1..=FORECAST_DAYS)
        .map(|day| {
            let per_day = match trend {
                IndexTrend::Increasing => INCREASING_DAILY_FACTOR,
                IndexTrend::Decreasing => DECREASING_DAILY_FACTOR,
                IndexTrend::Stable => rng.gen_range(-STABLE_JITTER..STABLE_JITTER),
            };
            let factor = per_day * f64::from(day);
            let confidence = (INITIAL_CONFIDENCE - f64::from(day - 1) * CONFIDENCE_DECAY)
                .max(MIN_CONFIDENCE);

            ForecastPoint {
                day,
                predicted_surface: (final_surface * (1.0 + factor)).round(),
                confidence: (confidence * 100.0).round() / 100.0,
            }
        })
        .collect()
}

/// Derive alerts; emits a single low-priority entry when nothing fires
pub fn derive_alerts(index: f64, weather: &WeatherSnapshot) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let mut push = |kind: &str, priority: Severity, message: String| {
        alerts.push(Alert {
            kind: kind.to_string(),
            priority,
            message,
        })
    };
    let precipitation = weather.precipitation_mm;

    if precipitation > 20.0 {
        push(
            "High flood risk",
            Severity::High,
            format!(
                "Very heavy precipitation ({}mm). Urgent overflow monitoring.",
                precipitation
            ),
        );
    } else if precipitation > 10.0 {
        push(
            "Moderate flood risk",
            Severity::Medium,
            format!(
                "Heavy precipitation ({}mm). Water level monitoring recommended.",
                precipitation
            ),
        );
    }

    if index < 0.25 && precipitation < 1.0 {
        push(
            "Drought alert",
            Severity::High,
            format!(
                "Critical water index ({}) and no rain. Risk for crops and water supply.",
                index
            ),
        );
    } else if index < 0.3 && precipitation < 2.0 {
        push(
            "Water stress",
            Severity::Medium,
            format!("Low water index ({}). Monitor water resources.", index),
        );
    }

    if weather.temperature > 40.0 {
        push(
            "Extreme heat",
            Severity::High,
            format!(
                "Very high temperature ({}°C). Accelerated evaporation and heat stress.",
                weather.temperature
            ),
        );
    }

    if weather.wind_speed_kmh > 40.0 {
        push(
            "Strong wind",
            Severity::Medium,
            format!(
                "Strong winds ({} km/h). Increased evaporation.",
                weather.wind_speed_kmh
            ),
        );
    }

    if alerts.is_empty() {
        alerts.push(Alert {
            kind: "Normal conditions".to_string(),
            priority: Severity::Low,
            message: format!(
                "Favorable conditions. Temp: {}°C, Humidity: {}%, Precip.: {}mm",
                weather.temperature, weather.humidity, precipitation
            ),
        });
    }

    alerts
}

/// Free-text recommendations, in rule order
pub fn suggestions(
    index: f64,
    agriculture: &AgricultureStats,
    weather: &WeatherSnapshot,
    final_surface: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    if index < 0.25 {
        out.push("Put an emergency water management plan in place".to_string());
        out.push("Identify alternative water sources for crops".to_string());
    } else if index < 0.35 {
        out.push("Optimize irrigation and reduce evaporation losses".to_string());
        out.push("Step up weekly monitoring of water levels".to_string());
    } else {
        out.push("Water conditions are satisfactory for agriculture".to_string());
    }

    if !agriculture.crop_breakdown.is_empty() {
        out.push(format!(
            "Detected crops: {} ({} ha)",
            agriculture.crop_types().join(", "),
            group_thousands(agriculture.total_surface)
        ));

        if agriculture.average_yield < 1.0 {
            out.push("Low yields detected. Assess additional irrigation needs".to_string());
        } else {
            out.push(format!(
                "Average yield: {:.1} t/ha - acceptable performance",
                agriculture.average_yield
            ));
        }
    }

    if weather.temperature > 35.0 {
        out.push("High temperatures - schedule irrigation early morning or evening".to_string());
    }

    let dry_tomorrow = weather
        .forecast_precipitation(1)
        .map_or(false, |p| p < 2.0);
    if weather.precipitation_mm < 1.0 && dry_tomorrow {
        out.push("Dry spell ahead - plan irrigation for the coming days".to_string());
    } else if weather.precipitation_mm > 10.0 {
        out.push("Heavy precipitation - check drainage and prevent erosion".to_string());
    }

    out.push(format!(
        "Analyzed surface: {} ha - keep up satellite monitoring",
        group_thousands(final_surface)
    ));

    out
}

/// Everything the synthesizer produces for one request
#[derive(Debug, Clone)]
pub struct Insights {
    pub final_surface: f64,
    pub variation_percent: f64,
    pub anomalies: Vec<Anomaly>,
    pub forecast: Vec<ForecastPoint>,
    pub alerts: Vec<Alert>,
    pub suggestions: Vec<String>,
}

/// Run all synthesis rules
pub fn synthesize<R: Rng + ?Sized>(
    surface_hectares: f64,
    water_index: WaterIndex,
    agriculture: &AgricultureStats,
    weather: &WeatherSnapshot,
    rng: &mut R,
) -> Insights {
    let final_surface = final_surface(surface_hectares, agriculture);
    let variation = surface_variation(water_index.average, rng);

    Insights {
        final_surface,
        variation_percent: variation,
        anomalies: detect_anomalies(water_index.average, variation, weather),
        forecast: forecast_surface(final_surface, water_index.trend, rng),
        alerts: derive_alerts(water_index.average, weather),
        suggestions: suggestions(water_index.average, agriculture, weather, final_surface),
    }
}

/// Integer rendering with comma thousands separators
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
