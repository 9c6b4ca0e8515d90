//! Route computation between shipment origins and destinations.
//!
//! Directions come from a [`RouteProvider`]. Real providers are remote
//! services, so the trait is async. [`GazetteerRouteProvider`] is a local
//! provider that resolves place names from a built-in table and measures the
//! great-circle distance between them.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::query::normalize_search;
use crate::shipment::ShipmentRecord;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default average road speed used for duration estimates.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 50.0;

/// Slowest average speed accepted for duration estimates.
pub const MIN_AVERAGE_SPEED_KMH: f64 = 1.0;

/// Errors that can occur while computing a route.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    /// A place label was empty.
    #[error("route endpoint '{0}' is missing")]
    MissingPlace(&'static str),

    /// The provider does not know the place.
    #[error("unknown place: {0}")]
    UnknownPlace(String),

    /// A place was given coordinates outside the valid range.
    #[error("invalid position for place '{0}'")]
    InvalidPosition(String),

    /// The provider could not produce a usable route.
    #[error("route provider unavailable: {0}")]
    Unavailable(String),
}

/// A point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both coordinates are finite and within latitude/longitude range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance to another point, in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1 for near-antipodal points
        2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
    }
}

/// A named route endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    /// Label as requested.
    pub label: String,
    /// Resolved position.
    pub point: GeoPoint,
}

/// A computed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Start of the route.
    pub origin: Waypoint,
    /// End of the route.
    pub destination: Waypoint,
    /// Route length in kilometres.
    pub distance_km: f64,
    /// Estimated travel time.
    pub estimated_duration: Duration,
}

impl Route {
    /// Estimated travel time in whole minutes, rounded to nearest.
    #[must_use]
    pub fn duration_minutes(&self) -> u64 {
        (self.estimated_duration.as_secs() + 30) / 60
    }
}

/// Capability to compute a route between two place labels.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Name of this provider (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Compute a driving route from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if either place cannot be resolved or the provider
    /// fails.
    async fn compute_route(&self, origin: &str, destination: &str) -> Result<Route, RouteError>;
}

/// Local provider backed by a place-name table.
#[derive(Debug, Clone)]
pub struct GazetteerRouteProvider {
    places: HashMap<String, GeoPoint>,
    average_speed_kmh: f64,
}

impl GazetteerRouteProvider {
    /// Create an empty provider.
    ///
    /// A non-finite speed, or one below [`MIN_AVERAGE_SPEED_KMH`], falls back
    /// to [`DEFAULT_AVERAGE_SPEED_KMH`].
    #[must_use]
    pub fn new(average_speed_kmh: f64) -> Self {
        let average_speed_kmh = if average_speed_kmh.is_finite()
            && average_speed_kmh >= MIN_AVERAGE_SPEED_KMH
        {
            average_speed_kmh
        } else {
            DEFAULT_AVERAGE_SPEED_KMH
        };
        Self {
            places: HashMap::new(),
            average_speed_kmh,
        }
    }

    /// Create a provider preloaded with the hub cities shipments run between.
    #[must_use]
    pub fn with_builtin_places(average_speed_kmh: f64) -> Self {
        let mut provider = Self::new(average_speed_kmh);
        for (label, lat, lng) in [
            ("Mumbai", 19.076, 72.8777),
            ("Delhi", 28.6139, 77.209),
            ("New Delhi", 28.6139, 77.209),
            ("Bengaluru", 12.9716, 77.5946),
            ("Bangalore", 12.9716, 77.5946),
            ("Chennai", 13.0827, 80.2707),
            ("Pune", 18.5204, 73.8567),
            ("Kolkata", 22.5726, 88.3639),
            ("Hyderabad", 17.385, 78.4867),
            ("Jaipur", 26.9124, 75.7873),
            ("Ahmedabad", 23.0225, 72.5714),
            ("Lucknow", 26.8467, 80.9462),
        ] {
            provider.places.insert(place_key(label), GeoPoint::new(lat, lng));
        }
        provider
    }

    /// Register or replace a place. Labels are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is blank or the point is not a valid
    /// position.
    pub fn add_place(&mut self, label: &str, point: GeoPoint) -> Result<(), RouteError> {
        if label.trim().is_empty() {
            return Err(RouteError::MissingPlace("label"));
        }
        if !point.is_valid() {
            return Err(RouteError::InvalidPosition(label.to_string()));
        }
        self.places.insert(place_key(label), point);
        Ok(())
    }

    /// Resolve a label to a position.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<GeoPoint> {
        self.places.get(&place_key(label)).copied()
    }

    /// Average speed used for duration estimates.
    #[must_use]
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }

    fn waypoint(&self, label: &str, role: &'static str) -> Result<Waypoint, RouteError> {
        if label.trim().is_empty() {
            return Err(RouteError::MissingPlace(role));
        }
        let point = self
            .resolve(label)
            .ok_or_else(|| RouteError::UnknownPlace(label.to_string()))?;
        Ok(Waypoint {
            label: label.to_string(),
            point,
        })
    }
}

impl Default for GazetteerRouteProvider {
    fn default() -> Self {
        Self::with_builtin_places(DEFAULT_AVERAGE_SPEED_KMH)
    }
}

fn place_key(label: &str) -> String {
    normalize_search(label.trim())
}

#[async_trait]
impl RouteProvider for GazetteerRouteProvider {
    fn name(&self) -> &'static str {
        "gazetteer"
    }

    async fn compute_route(&self, origin: &str, destination: &str) -> Result<Route, RouteError> {
        let origin = self.waypoint(origin, "origin")?;
        let destination = self.waypoint(destination, "destination")?;

        let distance_km = origin.point.distance_km(&destination.point);
        let hours = distance_km / self.average_speed_kmh;
        let estimated_duration = Duration::try_from_secs_f64(hours * 3600.0).map_err(|e| {
            RouteError::Unavailable(format!(
                "cannot estimate duration for {distance_km:.1} km at {} km/h: {e}",
                self.average_speed_kmh
            ))
        })?;

        trace!(
            origin = %origin.label,
            destination = %destination.label,
            distance_km,
            "Computed gazetteer route"
        );

        Ok(Route {
            origin,
            destination,
            distance_km,
            estimated_duration,
        })
    }
}

/// Compute the route for a shipment's origin and destination.
///
/// # Errors
///
/// Returns an error if the record lacks a place label or the provider fails.
pub async fn route_for<P>(provider: &P, record: &ShipmentRecord) -> Result<Route, RouteError>
where
    P: RouteProvider + ?Sized,
{
    debug!(id = %record.id, provider = provider.name(), "Requesting route");
    provider
        .compute_route(record.origin_or_empty(), record.destination_or_empty())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_same_point() {
        let p = GeoPoint::new(19.076, 72.8777);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_mumbai_delhi() {
        let mumbai = GeoPoint::new(19.076, 72.8777);
        let delhi = GeoPoint::new(28.6139, 77.209);
        let d = mumbai.distance_km(&delhi);
        assert!((1100.0..1200.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(12.9716, 77.5946);
        let b = GeoPoint::new(22.5726, 88.3639);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let provider = GazetteerRouteProvider::default();
        assert!(provider.resolve("mumbai").is_some());
        assert!(provider.resolve("  CHENNAI ").is_some());
        assert!(provider.resolve("Atlantis").is_none());
    }

    #[test]
    fn test_invalid_speed_falls_back() {
        assert!(
            (GazetteerRouteProvider::new(0.0).average_speed_kmh() - DEFAULT_AVERAGE_SPEED_KMH)
                .abs()
                < f64::EPSILON
        );
        assert!(
            (GazetteerRouteProvider::new(f64::NAN).average_speed_kmh()
                - DEFAULT_AVERAGE_SPEED_KMH)
                .abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_add_place() {
        let mut provider = GazetteerRouteProvider::new(60.0);
        provider.add_place("Depot 7", GeoPoint::new(1.0, 2.0)).unwrap();
        assert_eq!(provider.resolve("depot 7"), Some(GeoPoint::new(1.0, 2.0)));
    }

    #[test]
    fn test_add_place_rejects_invalid_points() {
        let mut provider = GazetteerRouteProvider::new(60.0);
        for point in [
            GeoPoint::new(f64::NAN, 0.0),
            GeoPoint::new(0.0, f64::INFINITY),
            GeoPoint::new(91.0, 0.0),
            GeoPoint::new(0.0, -180.5),
        ] {
            assert_eq!(
                provider.add_place("Nowhere", point),
                Err(RouteError::InvalidPosition("Nowhere".to_string()))
            );
        }
        assert!(provider.resolve("Nowhere").is_none());
        assert_eq!(
            provider.add_place("  ", GeoPoint::new(1.0, 2.0)),
            Err(RouteError::MissingPlace("label"))
        );
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = a.distance_km(&b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6, "got {d}");

        let c = GeoPoint::new(-89.999_999, -179.999_999);
        let e = GeoPoint::new(89.999_999, 0.000_001);
        assert!(c.distance_km(&e).is_finite());
    }

    #[test]
    fn test_speed_below_minimum_falls_back() {
        let provider = GazetteerRouteProvider::new(1e-20);
        assert!((provider.average_speed_kmh() - DEFAULT_AVERAGE_SPEED_KMH).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_tiny_speed_route_succeeds() {
        let provider = GazetteerRouteProvider::with_builtin_places(1e-20);
        let route = provider.compute_route("Mumbai", "Delhi").await.unwrap();
        assert!(route.duration_minutes() > 0);
    }

    #[tokio::test]
    async fn test_unrepresentable_duration_is_an_error() {
        let mut provider = GazetteerRouteProvider::default();
        provider.average_speed_kmh = 1e-20;
        let err = provider.compute_route("Mumbai", "Delhi").await.unwrap_err();
        assert!(matches!(err, RouteError::Unavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_compute_route() {
        let provider = GazetteerRouteProvider::with_builtin_places(50.0);
        let route = provider.compute_route("Mumbai", "Delhi").await.unwrap();

        assert_eq!(route.origin.label, "Mumbai");
        assert_eq!(route.destination.label, "Delhi");
        assert!(route.distance_km > 1100.0);
        // ~1150 km at 50 km/h is roughly 23 hours
        let minutes = route.duration_minutes();
        assert!((1320..1440).contains(&minutes), "got {minutes}");
    }

    #[tokio::test]
    async fn test_compute_route_same_place() {
        let provider = GazetteerRouteProvider::default();
        let route = provider.compute_route("Pune", "pune").await.unwrap();
        assert!(route.distance_km.abs() < 1e-9);
        assert_eq!(route.duration_minutes(), 0);
    }

    #[tokio::test]
    async fn test_compute_route_unknown_place() {
        let provider = GazetteerRouteProvider::default();
        let err = provider.compute_route("Mumbai", "Atlantis").await.unwrap_err();
        assert_eq!(err, RouteError::UnknownPlace("Atlantis".to_string()));
    }

    #[tokio::test]
    async fn test_route_for_record_missing_destination() {
        let provider = GazetteerRouteProvider::default();
        let record: ShipmentRecord =
            serde_json::from_str(r#"{"id": "SHIP-1", "origin": "Mumbai"}"#).unwrap();
        let err = route_for(&provider, &record).await.unwrap_err();
        assert_eq!(err, RouteError::MissingPlace("destination"));
    }

    #[tokio::test]
    async fn test_route_for_through_trait_object() {
        let provider: Box<dyn RouteProvider> = Box::new(GazetteerRouteProvider::default());
        let record = ShipmentRecord::new("SHIP-1023", "Mumbai", "Delhi", "Delayed");
        let route = route_for(provider.as_ref(), &record).await.unwrap();
        assert_eq!(route.destination.label, "Delhi");
    }

    #[test]
    fn test_route_error_display() {
        assert_eq!(
            RouteError::UnknownPlace("Atlantis".to_string()).to_string(),
            "unknown place: Atlantis"
        );
        assert!(RouteError::MissingPlace("origin")
            .to_string()
            .contains("origin"));
        assert!(RouteError::Unavailable("timeout".to_string())
            .to_string()
            .contains("timeout"));
    }
}
