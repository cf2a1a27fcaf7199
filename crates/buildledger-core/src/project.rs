//! # Projects
//!
//! Project records and their lifecycle vocabulary.
//!
//! A project moves through the stages
//! `Proposed → Design → Execution → Delivered`, with `Stopped` and
//! `Delayed` as side states. The [`ProjectKind`] records which phase of
//! work a record represents; it stays `Design` on a design record that was
//! archived when its execution project opened.

use crate::primitives::{MAX_NAME_LENGTH, MAX_NOTES_LENGTH};
use crate::validation::{optional_text, require_non_negative, require_text};
use crate::{LedgerError, Money, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// PROJECT STATUS
// =============================================================================

/// Lifecycle stage of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// New projects start as proposals.
    #[default]
    Proposed,
    Design,
    Execution,
    Delivered,
    Stopped,
    Delayed,
}

impl ProjectStatus {
    /// All statuses in display order.
    pub const ALL: [ProjectStatus; 6] = [
        ProjectStatus::Proposed,
        ProjectStatus::Design,
        ProjectStatus::Execution,
        ProjectStatus::Delivered,
        ProjectStatus::Stopped,
        ProjectStatus::Delayed,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ProjectStatus::Proposed => "Proposed",
            ProjectStatus::Design => "Design",
            ProjectStatus::Execution => "Execution",
            ProjectStatus::Delivered => "Delivered",
            ProjectStatus::Stopped => "Stopped",
            ProjectStatus::Delayed => "Delayed",
        }
    }

    /// Closed projects no longer accrue work or debt on the dashboard.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, ProjectStatus::Delivered | ProjectStatus::Stopped)
    }

    /// Stages counted as "active" on the dashboard.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ProjectStatus::Design | ProjectStatus::Execution | ProjectStatus::Delayed
        )
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LedgerError::SerializationError(format!("Unknown project status: {}", s)))
    }
}

// =============================================================================
// PROJECT KIND
// =============================================================================

/// Which phase of work a project record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    #[default]
    Design,
    Execution,
}

impl ProjectKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ProjectKind::Design => "Design",
            ProjectKind::Execution => "Execution",
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "design" => Ok(ProjectKind::Design),
            "execution" => Ok(ProjectKind::Execution),
            _ => Err(LedgerError::SerializationError(format!(
                "Unknown project kind: {}",
                s
            ))),
        }
    }
}

// =============================================================================
// CONTRACT TERMS
// =============================================================================

/// How the client is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    LumpSum,
    CostPlus,
    FixedFee,
}

impl FromStr for ContractType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "lump_sum" => Ok(ContractType::LumpSum),
            "cost_plus" => Ok(ContractType::CostPlus),
            "fixed_fee" => Ok(ContractType::FixedFee),
            _ => Err(LedgerError::SerializationError(format!(
                "Unknown contract type: {}",
                s
            ))),
        }
    }
}

/// Contract terms agreed with the client for one phase of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContractTerms {
    pub contract_type: ContractType,
    /// Contract value; becomes the budget of the phase it governs.
    pub value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ContractTerms {
    #[must_use]
    pub fn new(contract_type: ContractType, value: Money) -> Self {
        Self {
            contract_type,
            value,
            start_date: None,
            notes: None,
        }
    }

    /// Validate and normalize the terms.
    pub fn validated(self) -> Result<Self, LedgerError> {
        Ok(Self {
            contract_type: self.contract_type,
            value: require_non_negative("contract.value", self.value)?,
            start_date: self.start_date,
            notes: optional_text("contract.notes", self.notes.as_deref(), MAX_NOTES_LENGTH)?,
        })
    }
}

// =============================================================================
// PROJECT
// =============================================================================

/// A project tracked on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Client reference.
    pub client: String,
    #[serde(default)]
    pub category: String,
    pub budget: Money,
    pub status: ProjectStatus,
    #[serde(default)]
    pub kind: ProjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<ContractTerms>,
    /// Recognized revenue (completed receipts plus opening balance).
    #[serde(default)]
    pub revenue: Money,
    /// Recorded expenses (completed payments plus opening balance).
    #[serde(default)]
    pub expenses: Money,
    /// Predecessor or successor created by a stage transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_project_id: Option<ProjectId>,
}

impl Project {
    /// Budget not yet covered by revenue. Negative when overpaid.
    #[must_use]
    pub fn design_debt(&self) -> Money {
        self.budget.saturating_sub(self.revenue)
    }

    /// Revenue minus expenses.
    #[must_use]
    pub fn margin(&self) -> Money {
        self.revenue.saturating_sub(self.expenses)
    }

    /// Re-run the draft checks on a record loaded from outside the ledger.
    pub fn validated(self) -> Result<Self, LedgerError> {
        let related_project_id = self.related_project_id;
        let project = ProjectDraft {
            name: self.name,
            client: self.client,
            category: self.category,
            budget: self.budget,
            status: self.status,
            kind: self.kind,
            contract: self.contract,
            revenue: self.revenue,
            expenses: self.expenses,
        }
        .into_project(self.id)?;
        Ok(Project {
            related_project_id,
            ..project
        })
    }

    /// Case-insensitive match on name, client and category.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        [&self.name, &self.client, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

// =============================================================================
// DRAFT & PATCH
// =============================================================================

/// Fields for creating a project. The ledger assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectDraft {
    pub name: String,
    pub client: String,
    #[serde(default)]
    pub category: String,
    pub budget: Money,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub kind: ProjectKind,
    #[serde(default)]
    pub contract: Option<ContractTerms>,
    /// Opening revenue balance.
    #[serde(default)]
    pub revenue: Money,
    /// Opening expense balance.
    #[serde(default)]
    pub expenses: Money,
}

impl ProjectDraft {
    /// Convenience constructor for the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, client: impl Into<String>, budget: Money) -> Self {
        Self {
            name: name.into(),
            client: client.into(),
            budget,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_revenue(mut self, revenue: Money) -> Self {
        self.revenue = revenue;
        self
    }

    /// Validate the draft and build the project under the given id.
    pub fn into_project(self, id: ProjectId) -> Result<Project, LedgerError> {
        Ok(Project {
            id,
            name: require_text("name", &self.name, MAX_NAME_LENGTH)?,
            client: require_text("client", &self.client, MAX_NAME_LENGTH)?,
            category: optional_text("category", Some(&self.category), MAX_NAME_LENGTH)?
                .unwrap_or_default(),
            budget: require_non_negative("budget", self.budget)?,
            status: self.status,
            kind: self.kind,
            contract: self.contract.map(ContractTerms::validated).transpose()?,
            revenue: require_non_negative("revenue", self.revenue)?,
            expenses: require_non_negative("expenses", self.expenses)?,
            related_project_id: None,
        })
    }
}

/// Editable project fields. Status only changes through a stage transition
/// and accumulators only through transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub budget: Option<Money>,
    #[serde(default)]
    pub contract: Option<ContractTerms>,
}

impl ProjectPatch {
    /// Apply the patch to a copy of `project`, validating every changed field.
    pub fn apply_to(self, project: &Project) -> Result<Project, LedgerError> {
        let mut updated = project.clone();
        if let Some(name) = self.name {
            updated.name = require_text("name", &name, MAX_NAME_LENGTH)?;
        }
        if let Some(client) = self.client {
            updated.client = require_text("client", &client, MAX_NAME_LENGTH)?;
        }
        if let Some(category) = self.category {
            updated.category =
                optional_text("category", Some(&category), MAX_NAME_LENGTH)?.unwrap_or_default();
        }
        if let Some(budget) = self.budget {
            updated.budget = require_non_negative("budget", budget)?;
        }
        if let Some(contract) = self.contract {
            updated.contract = Some(contract.validated()?);
        }
        Ok(updated)
    }
}

// =============================================================================
// TESTS
// =============================================================================
