//! Ordered event-stage pipeline.
//!
//! Once a raw frame has been aligned and mapped into typed events, the
//! remaining per-event stages run through an [`EventPipeline`]. Each stage
//! implements [`EventStep`], reads the previous stage's events by reference
//! and returns a new set.
//!
//! # Standard Pipeline Order
//!
//! 1. **OrderCheckStep** - Reject games whose event indices repeat
//! 2. **AttributionStep** - Fill the four participant slots
//! 3. **CoordinateStep** - Normalize coordinates into the attacking frame
//!
//! # Example
//!
//! ```ignore
//! use pbp_core::pipeline::build_default_pipeline;
//!
//! let pipeline = build_default_pipeline();
//! let events = pipeline.execute(&mapped.events, &options)?;
//! ```

use anyhow::{Context, Result};
use tracing::trace;

use pbp_model::{Event, ReconcileIssue, ReconcileOptions};
use pbp_transform::{attribute_events, normalize_coordinates};

use crate::validate::validate_event_order;

/// A single stage in the event pipeline.
pub trait EventStep: Send + Sync {
    /// Run this stage, returning the derived events.
    ///
    /// # Arguments
    /// * `events` - Output of the previous stage
    /// * `options` - Reconciliation options
    /// * `state` - Mutable pipeline state for issues and the step log
    fn execute(
        &self,
        events: &[Event],
        options: &ReconcileOptions,
        state: &mut PipelineState,
    ) -> Result<Vec<Event>>;

    /// Human-readable name for this step (for logging/debugging).
    fn step_name(&self) -> &str;

    /// Whether this step should be skipped for the given options.
    ///
    /// Default implementation always runs the step.
    fn should_skip(&self, _options: &ReconcileOptions) -> bool {
        false
    }
}

/// Mutable state shared across pipeline steps.
#[derive(Debug, Default)]
pub struct PipelineState {
    /// Data-quality findings raised by the steps.
    pub issues: Vec<ReconcileIssue>,
    /// Step execution log for debugging.
    pub executed_steps: Vec<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// An ordered pipeline of event steps.
pub struct EventPipeline {
    steps: Vec<Box<dyn EventStep>>,
}

impl Default for EventPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the end of the pipeline.
    pub fn add_step(mut self, step: Box<dyn EventStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Insert a step at a specific position.
    pub fn insert_step(mut self, index: usize, step: Box<dyn EventStep>) -> Self {
        self.steps.insert(index, step);
        self
    }

    /// Remove a step by name.
    pub fn remove_step(mut self, step_name: &str) -> Self {
        self.steps.retain(|s| s.step_name() != step_name);
        self
    }

    /// Execute all steps in order.
    pub fn execute(&self, events: &[Event], options: &ReconcileOptions) -> Result<Vec<Event>> {
        let mut state = PipelineState::new();
        self.execute_with_state(events, options, &mut state)
    }

    /// Execute all steps with provided state.
    pub fn execute_with_state(
        &self,
        events: &[Event],
        options: &ReconcileOptions,
        state: &mut PipelineState,
    ) -> Result<Vec<Event>> {
        let mut current = events.to_vec();
        for step in &self.steps {
            if step.should_skip(options) {
                trace!(step = step.step_name(), "skipping step");
                continue;
            }
            current = step
                .execute(&current, options, state)
                .with_context(|| format!("step {}", step.step_name()))?;
            state.executed_steps.push(step.step_name().to_string());
        }
        Ok(current)
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}

// ============================================================================
// Standard Event Steps
// ============================================================================

/// Step 1: Reject repeated or decreasing event indices.
pub struct OrderCheckStep;

impl EventStep for OrderCheckStep {
    fn execute(
        &self,
        events: &[Event],
        _options: &ReconcileOptions,
        _state: &mut PipelineState,
    ) -> Result<Vec<Event>> {
        validate_event_order(events)?;
        Ok(events.to_vec())
    }

    fn step_name(&self) -> &str {
        "event_order"
    }
}

/// Step 2: Fill participant slots.
pub struct AttributionStep;

impl EventStep for AttributionStep {
    fn execute(
        &self,
        events: &[Event],
        options: &ReconcileOptions,
        state: &mut PipelineState,
    ) -> Result<Vec<Event>> {
        let attributed = attribute_events(events, options.strict_taxonomy)?;
        state.issues.extend(attributed.issues);
        Ok(attributed.events)
    }

    fn step_name(&self) -> &str {
        "attribution"
    }
}

/// Step 3: Normalize coordinates and derive shot geometry.
pub struct CoordinateStep;

impl EventStep for CoordinateStep {
    fn execute(
        &self,
        events: &[Event],
        options: &ReconcileOptions,
        state: &mut PipelineState,
    ) -> Result<Vec<Event>> {
        let normalized = normalize_coordinates(events, options);
        state.issues.extend(normalized.issues);
        Ok(normalized.events)
    }

    fn step_name(&self) -> &str {
        "coordinates"
    }
}

/// Build the default event pipeline with all standard steps.
pub fn build_default_pipeline() -> EventPipeline {
    EventPipeline::new()
        .add_step(Box::new(OrderCheckStep))
        .add_step(Box::new(AttributionStep))
        .add_step(Box::new(CoordinateStep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_order() {
        let pipeline = build_default_pipeline();
        assert_eq!(
            pipeline.step_names(),
            vec!["event_order", "attribution", "coordinates"]
        );
    }

    #[test]
    fn remove_and_insert_steps() {
        let pipeline = build_default_pipeline()
            .remove_step("event_order")
            .insert_step(2, Box::new(OrderCheckStep));
        assert_eq!(
            pipeline.step_names(),
            vec!["attribution", "coordinates", "event_order"]
        );
    }

    #[test]
    fn empty_input_runs_every_step() {
        let pipeline = build_default_pipeline();
        let mut state = PipelineState::new();
        let events = pipeline
            .execute_with_state(&[], &ReconcileOptions::default(), &mut state)
            .expect("empty pipeline run");
        assert!(events.is_empty());
        assert_eq!(state.executed_steps.len(), 3);
        assert!(state.issues.is_empty());
    }
}
