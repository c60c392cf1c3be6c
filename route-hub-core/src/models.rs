//! Core domain models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

/// Comparison operator of a label matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "=~")]
    Regex,
    #[serde(rename = "!~")]
    NotRegex,
}

impl MatchOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOperator::Equal => "=",
            MatchOperator::NotEqual => "!=",
            MatchOperator::Regex => "=~",
            MatchOperator::NotRegex => "!~",
        }
    }
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (label, operator, value) condition used to route alerts to policies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectMatcher {
    pub label: String,
    pub operator: MatchOperator,
    pub value: String,
}

impl ObjectMatcher {
    pub fn new(label: impl Into<String>, operator: MatchOperator, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for ObjectMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.label, self.operator, self.value)
    }
}

impl FromStr for ObjectMatcher {
    type Err = CoreError;

    /// Parse the textual `label<op>value` form, e.g. `team=~ops-.*`.
    /// The split happens at the left-most operator occurrence; at that
    /// position a two-character operator beats its one-character prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut found: Option<(usize, MatchOperator)> = None;
        for op in [
            MatchOperator::Regex,
            MatchOperator::NotRegex,
            MatchOperator::NotEqual,
            MatchOperator::Equal,
        ] {
            if let Some(idx) = s.find(op.as_str()) {
                if found.map_or(true, |(best, _)| idx < best) {
                    found = Some((idx, op));
                }
            }
        }

        let Some((idx, op)) = found else {
            return Err(CoreError::InvalidMatcher(format!(
                "matcher '{}' contains no operator",
                s
            )));
        };

        let label = s[..idx].trim();
        let value = s[idx + op.as_str().len()..].trim();
        if label.is_empty() {
            return Err(CoreError::InvalidMatcher(format!(
                "matcher '{}' has an empty label",
                s
            )));
        }

        Ok(ObjectMatcher::new(label, op, value))
    }
}

/// A set of alert labels used for routing preview
pub type AlertLabels = BTreeMap<String, String>;

/// A notification routing policy as it appears in external configuration.
///
/// Unset attributes are inherited from the nearest ancestor that sets them.
/// The shape mirrors the alertmanager route schema and is accepted as-is;
/// nothing beyond traversal is validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    /// Contact point this policy notifies; inherited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Label conditions an alert must satisfy to enter this policy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_matchers: Vec<ObjectMatcher>,
    /// Labels to group alerts by; inherited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    /// Initial wait before sending a new group, e.g. "30s"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    /// Wait between notifications for an existing group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    /// Wait before repeating a notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    /// Named mute time intervals; inherited when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,
    /// When true, siblings keep being evaluated after this policy matches
    #[serde(default, rename = "continue")]
    pub continue_matching: bool,
    /// Child policies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteNode>,
}

/// A route tree node with a stable identity.
///
/// Identities are assigned at ingestion and survive inheritance resolution;
/// they are stripped again before the tree is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWithId {
    /// Unique identifier of this node within the tree
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_matchers: Vec<ObjectMatcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,
    #[serde(default, rename = "continue")]
    pub continue_matching: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteWithId>,
}

/// Filter predicates over the route tree. Both fields unset means
/// "no filtering active".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_point: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_matchers: Vec<ObjectMatcher>,
}

impl RouteFilters {
    /// Whether any filter predicate is set
    pub fn is_active(&self) -> bool {
        self.contact_point.is_some() || !self.label_matchers.is_empty()
    }
}

/// A named notification destination (receiver)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactPoint {
    /// Unique name, referenced by route receivers
    pub name: String,
    /// Integration kinds behind this contact point, e.g. "email", "webhook"
    pub integrations: Vec<String>,
    /// When this contact point was created
    pub created_at: DateTime<Utc>,
}

impl ContactPoint {
    pub fn new(name: String, integrations: Vec<String>) -> Self {
        Self {
            name,
            integrations,
            created_at: Utc::now(),
        }
    }
}

/// The stored route tree together with its optimistic-concurrency version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedRouteTree {
    pub version: u64,
    pub root: RouteWithId,
}

/// Position of a newly inserted route relative to a reference route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Above,
    Below,
    Child,
}

/// Partial route update; only the provided fields are replaced
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_matchers: Option<Vec<ObjectMatcher>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_time_intervals: Option<Vec<String>>,
    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_matching: Option<bool>,
}

// ==================== API request/response types ====================

/// Request to replace the whole route tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRouteTreeRequest {
    /// Version the client last saw; replacement fails when stale
    pub version: u64,
    pub root: RouteNode,
}

/// Request to filter the route tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRoutesRequest {
    #[serde(default)]
    pub contact_point: Option<String>,
    #[serde(default)]
    pub label_matchers: Vec<ObjectMatcher>,
}

/// A single matched route with its root-first ancestor path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedRoute {
    pub route_id: Uuid,
    /// Node ids from the root down to, and including, the matched route
    pub path: Vec<Uuid>,
}

/// Response to a filter request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRoutesResponse {
    pub filters_applied: bool,
    pub matched_count: usize,
    pub matches: Vec<MatchedRoute>,
}

/// Request to preview which policies an alert label set routes to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRoutingRequest {
    pub labels: AlertLabels,
}

/// A policy an alert label set routed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewMatch {
    pub route_id: Uuid,
    /// Effective (inherited) receiver of the matched policy
    pub receiver: Option<String>,
}

/// Response to a routing preview request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRoutingResponse {
    pub matches: Vec<PreviewMatch>,
}

/// Request to insert a route relative to an existing one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRouteRequest {
    pub position: InsertPosition,
    pub route: RouteNode,
}

/// Request to create a contact point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactPointRequest {
    pub name: String,
    #[serde(default)]
    pub integrations: Vec<String>,
}
