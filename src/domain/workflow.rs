//! Core workflow domain types
//!
//! This module maps Jira statuses onto an ordered sequence of workflow
//! categories and reconstructs, for a single issue, the date each category
//! was first durably entered by replaying the issue's status changelog.
//!
//! The replay follows a strict Kanban reading of the history: moving forward
//! stamps every category passed through, moving backward erases the stamps of
//! every category beyond the one moved back to.

use std::collections::HashMap;

use tracing::debug;

use super::error::ExporterError;

/// A single historical fact: an issue moved from one status to another
/// at a point in time.
///
/// One instance exists per status change of one issue. Instances are built
/// from the raw changelog delivered by Jira, consumed once by
/// [`Workflow::category_timestamps`] and then discarded.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    /// Status the issue was in before the transition
    pub from_status: String,
    /// Status the issue was moved to
    pub to_status:   String,
    /// When the transition happened, already normalized to the output
    /// date granularity (e.g. `2023-01-15`)
    pub occurred_at: String,
}

impl StatusTransition {
    pub fn new(from_status: &str, to_status: &str, occurred_at: &str) -> Self {
        Self {
            from_status: from_status.to_string(),
            to_status:   to_status.to_string(),
            occurred_at: occurred_at.to_string(),
        }
    }
}

/// The per-issue result of a changelog replay: for every category, the date
/// the issue first durably entered it, or `None` if it never got there
/// (or a backward move revoked it).
///
/// Entries keep the category order of the [`Workflow`] that produced them.
/// The entry at position 0 always carries the issue creation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTimestamps {
    entries: Vec<(String, Option<String>)>,
}

impl CategoryTimestamps {
    /// Look up the entry date of a category by name.
    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .and_then(|(_, date)| date.as_deref())
    }

    /// Iterate entries in workflow category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(name, date)| (name.as_str(), date.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An immutable mapping from individual Jira statuses to an ordered sequence
/// of workflow categories.
///
/// The category order as supplied at construction is the single source of
/// truth for "forward" vs "backward" movement: position 0 is the entry
/// category, the last position the terminal one. Statuses within one category
/// carry no relative ordering; they are equivalent for timestamp purposes.
///
/// Built once from the `Workflow` section of the YAML configuration and
/// shared read-only across all issues of a run.
///
/// # Example YAML structure
/// ```yaml
/// Workflow:
///   To Do: ["Open", "Reopened"]
///   In Progress: ["In Development", "Code Review"]
///   Done: ["Resolved", "Closed"]
/// ```
#[derive(Debug, Clone)]
pub struct Workflow {
    /// Category names in authoritative progression order
    categories:        Vec<String>,
    /// Status name -> index into `categories`
    status_categories: HashMap<String, usize>,
}

impl Workflow {
    /// Build a workflow from ordered `(category, statuses)` pairs.
    ///
    /// The pair order is preserved exactly and becomes the progression
    /// sequence. A status listed under two categories is rejected, since the
    /// classification of every status must be unambiguous.
    pub fn new<C, S>(mapping: &[(C, Vec<S>)]) -> Result<Self, ExporterError>
    where
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut categories = Vec::with_capacity(mapping.len());
        let mut status_categories = HashMap::new();

        debug!("Start loading workflow.");

        for (index, (category, statuses)) in mapping.iter().enumerate() {
            let category = category.as_ref();
            categories.push(category.to_string());
            debug!("Created status category: {category}");

            for status in statuses {
                let status = status.as_ref();
                if status_categories.insert(status.to_string(), index).is_some() {
                    return Err(ExporterError::Validation(format!(
                        "status '{status}' is mapped to more than one workflow category"
                    )));
                }
                debug!("Added status: {category} -> {status}");
            }
        }

        Ok(Self { categories, status_categories })
    }

    /// All category names in progression order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// All status names defined in the workflow, in no particular order.
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.status_categories.keys().map(String::as_str)
    }

    /// Total count of status categories.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total count of statuses across all categories.
    pub fn status_count(&self) -> usize {
        self.status_categories.len()
    }

    /// The category a given status belongs to.
    ///
    /// A status absent from the mapping is a hard error: silently
    /// misclassifying it would corrupt every downstream timestamp.
    pub fn category_of(&self, status: &str) -> Result<&str, ExporterError> {
        self.category_index_of_status(status).map(|index| self.categories[index].as_str())
    }

    /// Zero-based position of a category in the progression sequence.
    pub fn index_of_category(&self, category: &str) -> Result<usize, ExporterError> {
        self.categories
            .iter()
            .position(|name| name == category)
            .ok_or_else(|| ExporterError::UnknownCategory(category.to_string()))
    }

    fn category_index_of_status(&self, status: &str) -> Result<usize, ExporterError> {
        self.status_categories
            .get(status)
            .copied()
            .ok_or_else(|| ExporterError::UnknownStatus(status.to_string()))
    }

    /// Reconstruct the date each category was first durably entered.
    ///
    /// The changelog is taken exactly as delivered by the Jira API, i.e. most
    /// recent transition first. It is reversed internally (stably, no
    /// re-sorting) to chronological order before replay; callers never
    /// pre-sort.
    ///
    /// Replay rules, applied per transition in chronological order:
    /// - same category: no-op, internal moves don't touch any timestamp
    /// - forward: every category in `(from, to]` gets the transition date,
    ///   so categories skipped in one jump are stamped as entered and left
    ///   at that same moment
    /// - backward: every category in `(to, from]` is reset to `None`; the
    ///   issue has to re-earn those entries through later forward moves
    ///
    /// The first category always carries `creation_date`, since every issue
    /// is born into the entry category.
    ///
    /// # Arguments
    /// * `creation_date` - issue creation date, already normalized (e.g. `2023-01-10`)
    /// * `changelog` - status transitions, most recent first
    ///
    /// # Returns
    /// * `Ok(CategoryTimestamps)` - one entry per category, in order
    /// * `Err(ExporterError)` - a transition referenced an unknown status;
    ///   no partial result is produced
    pub fn category_timestamps(
        &self,
        creation_date: &str,
        changelog: &[StatusTransition],
    ) -> Result<CategoryTimestamps, ExporterError> {
        let mut dates: Vec<Option<String>> = vec![None; self.categories.len()];
        // Every issue gets created with the very first status of the
        // workflow, so the first category carries the creation date.
        if let Some(first) = dates.first_mut() {
            *first = Some(creation_date.to_string());
        }

        // The changelog arrives most-recent-first; replay needs it in
        // chronological order.
        for transition in changelog.iter().rev() {
            self.apply_transition(&mut dates, transition)?;
        }

        let entries = self.categories.iter().cloned().zip(dates).collect();
        Ok(CategoryTimestamps { entries })
    }

    /// Apply one transition to the evolving per-category dates.
    fn apply_transition(
        &self,
        dates: &mut [Option<String>],
        transition: &StatusTransition,
    ) -> Result<(), ExporterError> {
        let from_index = self.category_index_of_status(&transition.from_status)?;
        let to_index = self.category_index_of_status(&transition.to_status)?;

        debug!(
            "Transition on {}: {}({}) -> {}({})",
            transition.occurred_at,
            transition.from_status,
            self.categories[from_index],
            transition.to_status,
            self.categories[to_index]
        );

        if from_index == to_index {
            // A move within the same category, nothing to stamp.
            debug!("Same category, no dates to set.");
        } else if from_index < to_index {
            // Forward move: stamp the destination and everything skipped on
            // the way there.
            for index in from_index + 1..=to_index {
                debug!("Set date {} for category: {}", transition.occurred_at, self.categories[index]);
                dates[index] = Some(transition.occurred_at.clone());
            }
        } else {
            // Backward move: the destination keeps its date, every category
            // after it loses its stamp.
            for index in to_index + 1..=from_index {
                debug!("Unset date for category: {}", self.categories[index]);
                dates[index] = None;
            }
        }

        Ok(())
    }
}
