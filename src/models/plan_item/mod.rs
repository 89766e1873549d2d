// Plan item module
// A schedulable unit of a trip: activity, meal, transit leg...

use serde::{Deserialize, Serialize};

/// Stable identifier of a plan item. Survives moves between the pool and
/// day tracks; only a clone gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanItemId(pub u64);

impl std::fmt::Display for PlanItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of plan item, used for grouping and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanItemCategory {
    Sightseeing,
    Food,
    Activity,
    Shopping,
    Lodging,
    Transit,
    #[default]
    Other,
}

impl PlanItemCategory {
    pub const ALL: [PlanItemCategory; 7] = [
        PlanItemCategory::Sightseeing,
        PlanItemCategory::Food,
        PlanItemCategory::Activity,
        PlanItemCategory::Shopping,
        PlanItemCategory::Lodging,
        PlanItemCategory::Transit,
        PlanItemCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlanItemCategory::Sightseeing => "sightseeing",
            PlanItemCategory::Food => "food",
            PlanItemCategory::Activity => "activity",
            PlanItemCategory::Shopping => "shopping",
            PlanItemCategory::Lodging => "lodging",
            PlanItemCategory::Transit => "transit",
            PlanItemCategory::Other => "other",
        }
    }
}

/// Place attached to an item, filled from a place-search candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRef {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A schedulable unit. Whether it sits in the pool or on a day track is
/// decided by the schedule store, not by the item itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: PlanItemId,
    pub title: String,
    pub category: PlanItemCategory,
    pub duration_minutes: u32,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub place: Option<PlaceRef>,
}

impl PlanItem {
    /// Create a new item with the required fields.
    ///
    /// # Examples
    /// ```
    /// use trip_planner::models::plan_item::{PlanItem, PlanItemCategory, PlanItemId};
    ///
    /// let item =
    ///     PlanItem::new(PlanItemId(1), "Museum", PlanItemCategory::Sightseeing, 90).unwrap();
    /// assert_eq!(item.duration_parts(), (1, 30));
    /// ```
    pub fn new(
        id: PlanItemId,
        title: impl Into<String>,
        category: PlanItemCategory,
        duration_minutes: u32,
    ) -> Result<Self, PlanItemValidationError> {
        let item = Self {
            id,
            title: title.into(),
            category,
            duration_minutes,
            cost: None,
            memo: None,
            place: None,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn builder() -> PlanItemBuilder {
        PlanItemBuilder::new()
    }

    pub fn validate(&self) -> Result<(), PlanItemValidationError> {
        if self.title.trim().is_empty() {
            return Err(PlanItemValidationError::EmptyTitle);
        }
        if self.duration_minutes == 0 {
            return Err(PlanItemValidationError::ZeroDuration);
        }
        if let Some(cost) = self.cost {
            if !cost.is_finite() || cost < 0.0 {
                return Err(PlanItemValidationError::InvalidCost);
            }
        }
        Ok(())
    }

    /// Duration split into `(hours, minutes)` as the item form shows it.
    pub fn duration_parts(&self) -> (u32, u32) {
        (self.duration_minutes / 60, self.duration_minutes % 60)
    }

    /// Copy of this item under a new identifier.
    pub fn cloned_as(&self, id: PlanItemId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

/// Validation errors for PlanItem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanItemValidationError {
    #[error("Plan item title cannot be empty")]
    EmptyTitle,
    #[error("Plan item duration must be greater than zero")]
    ZeroDuration,
    #[error("Plan item cost must be a non-negative number")]
    InvalidCost,
}

/// Builder for items with optional fields. The id is assigned by the
/// schedule store when the item is added.
#[derive(Debug, Default)]
pub struct PlanItemBuilder {
    title: Option<String>,
    category: PlanItemCategory,
    duration_minutes: u32,
    cost: Option<f64>,
    memo: Option<String>,
    place: Option<PlaceRef>,
}

impl PlanItemBuilder {
    pub fn new() -> Self {
        Self {
            duration_minutes: 60,
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category(mut self, category: PlanItemCategory) -> Self {
        self.category = category;
        self
    }

    /// Duration as the form enters it: hours plus minutes.
    pub fn duration(mut self, hours: u32, minutes: u32) -> Self {
        self.duration_minutes = hours * 60 + minutes;
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn place(mut self, place: PlaceRef) -> Self {
        self.place = Some(place);
        self
    }

    pub fn build(self, id: PlanItemId) -> Result<PlanItem, PlanItemValidationError> {
        let item = PlanItem {
            id,
            title: self.title.unwrap_or_default(),
            category: self.category,
            duration_minutes: self.duration_minutes,
            cost: self.cost,
            memo: self.memo,
            place: self.place,
        };
        item.validate()?;
        Ok(item)
    }
}
