//! Schema alignment for raw event frames.
//!
//! A raw frame is coerced into a fixed, ordered column set: every target field
//! is present and typed, absent fields become typed nulls, and fields outside
//! the target are dropped and reported.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::{debug, warn};

use pbp_model::{IssueKind, ReconcileIssue};

/// Storage type of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int32,
    Float32,
}

impl FieldType {
    pub fn dtype(self) -> DataType {
        match self {
            FieldType::Text => DataType::String,
            FieldType::Int32 => DataType::Int32,
            FieldType::Float32 => DataType::Float32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    pub field_type: FieldType,
}

/// Ordered field name to type mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetSchema {
    fields: Vec<SchemaField>,
}

impl TargetSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. A repeated name replaces the earlier type in place.
    pub fn with_field(mut self, name: &str, field_type: FieldType) -> Self {
        if let Some(existing) = self.fields.iter_mut().find(|field| field.name == name) {
            existing.field_type = field_type;
        } else {
            self.fields.push(SchemaField {
                name: name.to_string(),
                field_type,
            });
        }
        self
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(&'static str, FieldType)> for TargetSchema {
    fn from_iter<I: IntoIterator<Item = (&'static str, FieldType)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TargetSchema::new(), |schema, (name, field_type)| {
                schema.with_field(name, field_type)
            })
    }
}

/// The fixed shape every raw play is coerced into before semantic mapping.
///
/// Team and participant ids are carried as text; they are parsed into typed
/// ids during semantic mapping.
pub fn raw_event_schema() -> TargetSchema {
    use FieldType::{Float32, Int32, Text};
    [
        ("id", Int32),
        ("gameDate", Text),
        ("season", Int32),
        ("sortOrder", Int32),
        ("gameType", Int32),
        ("period", Int32),
        ("periodType", Text),
        ("timeRemaining", Text),
        ("timeInPeriod", Text),
        ("situationCode", Text),
        ("homeTeamDefendingSide", Text),
        ("eventOwnerTeamId", Text),
        ("awayTeam.id", Text),
        ("awayTeam.abbrev", Text),
        ("awayScore", Float32),
        ("homeTeam.id", Text),
        ("homeTeam.abbrev", Text),
        ("homeScore", Float32),
        ("eventId", Int32),
        ("typeCode", Int32),
        ("penaltyTypeCode", Text),
        ("typeDescKey", Text),
        ("descKey", Text),
        ("reason", Text),
        ("secondaryReason", Text),
        ("shotType", Text),
        ("zoneCode", Text),
        ("xCoord", Float32),
        ("yCoord", Float32),
        ("scoringPlayerId", Text),
        ("shootingPlayerId", Text),
        ("goalieInNetId", Text),
        ("blockingPlayerId", Text),
        ("committedByPlayerId", Text),
        ("drawnByPlayerId", Text),
        ("servedByPlayerId", Text),
        ("duration", Text),
        ("hittingPlayerId", Text),
        ("hitteePlayerId", Text),
        ("winningPlayerId", Text),
        ("losingPlayerId", Text),
        ("assist1PlayerId", Text),
        ("assist2PlayerId", Text),
        ("playerId", Text),
    ]
    .into_iter()
    .collect()
}

/// Result of aligning a frame to a target schema.
#[derive(Debug, Clone)]
pub struct AlignedFrame {
    pub frame: DataFrame,
    /// Input fields with no place in the schema (dropped).
    pub extra_fields: Vec<String>,
    /// Schema fields absent from the input (null-filled).
    pub missing_fields: Vec<String>,
}

impl AlignedFrame {
    /// Drift findings as issues: one per extra or missing field.
    pub fn drift_issues(&self) -> Vec<ReconcileIssue> {
        let extra = self.extra_fields.iter().map(|field| {
            ReconcileIssue::new(
                IssueKind::SchemaDriftWarning,
                format!("field {field} is not in the target schema and was dropped"),
            )
            .with_field(field.clone())
        });
        let missing = self.missing_fields.iter().map(|field| {
            ReconcileIssue::new(
                IssueKind::SchemaDriftWarning,
                format!("field {field} is absent and was null-filled"),
            )
            .with_field(field.clone())
        });
        extra.chain(missing).collect()
    }
}

/// Coerce `df` into exactly the columns of `schema`, in schema order.
///
/// Casts are best-effort: a value that cannot be cast becomes a null in that
/// row. Drift is logged and returned, never raised.
pub fn align_and_cast(df: &DataFrame, schema: &TargetSchema) -> Result<AlignedFrame> {
    let height = df.height();

    let extra_fields: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .filter(|name| !schema.contains(name))
        .collect();

    let mut missing_fields = Vec::new();
    let mut columns: Vec<Column> = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let dtype = field.field_type.dtype();
        let column = match df.column(&field.name) {
            Ok(existing) if existing.dtype() == &dtype => existing.clone(),
            Ok(existing) => existing
                .cast(&dtype)
                .with_context(|| format!("cast {} to {dtype}", field.name))?,
            Err(_) => {
                missing_fields.push(field.name.clone());
                Column::full_null(field.name.as_str().into(), height, &dtype)
            }
        };
        columns.push(column);
    }

    if !extra_fields.is_empty() {
        warn!(fields = ?extra_fields, "dropping fields outside the target schema");
    }
    if !missing_fields.is_empty() {
        debug!(fields = ?missing_fields, "null-filling absent schema fields");
    }

    let frame = DataFrame::new(columns).context("build aligned frame")?;
    Ok(AlignedFrame {
        frame,
        extra_fields,
        missing_fields,
    })
}
