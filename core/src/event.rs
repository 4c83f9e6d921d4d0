//! The ad event record: the funnel's central output.
//!
//! RULE: A click or conversion is only ever built from its parent
//! impression through `AdEvent::derive_from`. That constructor is the
//! single place that decides which fields are inherited and which are
//! recomputed, so the two sets cannot drift apart.

use crate::{
    reference_data::{
        AdFormat, CreativeType, DeviceType, PlacementPosition, PlacementSlot, Surface,
    },
    types::EntityId,
    writer::CsvTable,
};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Impression,
    Click,
    Conversion,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttributionType {
    ClickThrough,
    ViewThrough,
}

/// One row of `ad_events.csv`. Field order is the column order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdEvent {
    pub event_id: EntityId,
    pub session_id: EntityId,
    pub user_id: EntityId,
    pub ad_id: EntityId,
    pub ad_format: AdFormat,
    pub creative_type: CreativeType,
    pub campaign_id: EntityId,
    pub event_type: EventType,
    pub event_timestamp: NaiveDateTime,
    pub device_type: DeviceType,
    pub os: &'static str,
    pub country: &'static str,
    pub region: &'static str,
    pub city: &'static str,
    pub surface: Surface,
    pub placement: PlacementSlot,
    pub position: PlacementPosition,
    pub revenue_usd: f64,
    pub cost_usd: f64,
    pub view_duration_ms: u64,
    pub is_billable: bool,
    /// Originating impression. On an impression this is its own id.
    pub impression_id: EntityId,
    /// Set only on click-through conversions.
    pub click_id: Option<EntityId>,
    pub attribution_type: Option<AttributionType>,
}

impl CsvTable for AdEvent {
    const COLUMNS: &'static [&'static str] = &[
        "event_id",
        "session_id",
        "user_id",
        "ad_id",
        "ad_format",
        "creative_type",
        "campaign_id",
        "event_type",
        "event_timestamp",
        "device_type",
        "os",
        "country",
        "region",
        "city",
        "surface",
        "placement",
        "position",
        "revenue_usd",
        "cost_usd",
        "view_duration_ms",
        "is_billable",
        "impression_id",
        "click_id",
        "attribution_type",
    ];
}

/// The fields a derived event recomputes. Everything else comes from
/// the parent impression.
#[derive(Debug, Clone)]
pub struct DerivedFields {
    pub event_id: EntityId,
    pub event_type: EventType,
    pub event_timestamp: NaiveDateTime,
    pub revenue_usd: f64,
    pub cost_usd: f64,
    pub view_duration_ms: u64,
    pub click_id: Option<EntityId>,
    pub attribution_type: AttributionType,
}

impl AdEvent {
    /// Build a click or conversion from its parent impression.
    ///
    /// Inherited: session, user, ad, format, creative type, campaign,
    /// device/OS, geo, placement fields and billability.
    /// Recomputed: everything in [`DerivedFields`].
    /// Linked: `impression_id` is always the parent's `event_id`.
    pub fn derive_from(impression: &AdEvent, derived: DerivedFields) -> AdEvent {
        debug_assert_eq!(impression.event_type, EventType::Impression);
        AdEvent {
            event_id: derived.event_id,
            session_id: impression.session_id.clone(),
            user_id: impression.user_id.clone(),
            ad_id: impression.ad_id.clone(),
            ad_format: impression.ad_format,
            creative_type: impression.creative_type,
            campaign_id: impression.campaign_id.clone(),
            event_type: derived.event_type,
            event_timestamp: derived.event_timestamp,
            device_type: impression.device_type,
            os: impression.os,
            country: impression.country,
            region: impression.region,
            city: impression.city,
            surface: impression.surface,
            placement: impression.placement,
            position: impression.position,
            revenue_usd: derived.revenue_usd,
            cost_usd: derived.cost_usd,
            view_duration_ms: derived.view_duration_ms,
            is_billable: impression.is_billable,
            impression_id: impression.event_id.clone(),
            click_id: derived.click_id,
            attribution_type: Some(derived.attribution_type),
        }
    }

    pub fn is(&self, event_type: EventType) -> bool {
        self.event_type == event_type
    }
}
