//! # Stage Transitions
//!
//! The project lifecycle rules.
//!
//! ## Rules
//!
//! | From | To | Behavior |
//! |------|----|----------|
//! | any | same stage | no-op |
//! | Design-kind with successor | Execution | rejected |
//! | Design, debt ≤ 0 | Execution | archive the design record, create linked Execution project |
//! | Design, debt > 0 | Execution | keep design live, create linked Execution project |
//! | any, debt > 0 | Delivered | requires confirmation |
//! | anything else | any | plain status update |
//!
//! `debt = budget - revenue`.
//!
//! Every check runs before the first write, so a rejected transition leaves
//! the store exactly as it was.

use crate::primitives::{ARCHIVE_NAME_SUFFIX, EXECUTION_NAME_SUFFIX, MAX_NAME_LENGTH};
use crate::project::{ContractTerms, Project, ProjectKind, ProjectStatus};
use crate::store::LedgerStore;
use crate::{LedgerError, Money, ProjectId};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUEST / OUTCOME
// =============================================================================

/// A request to move a project to another stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub target: ProjectStatus,
    /// Contract terms for the execution phase. Required when a Design
    /// project moves to Execution.
    #[serde(default)]
    pub contract: Option<ContractTerms>,
    /// Close the project even though part of the budget is unpaid.
    #[serde(default)]
    pub confirm_outstanding: bool,
}

impl TransitionRequest {
    #[must_use]
    pub fn to(target: ProjectStatus) -> Self {
        Self {
            target,
            contract: None,
            confirm_outstanding: false,
        }
    }

    #[must_use]
    pub fn with_contract(mut self, contract: ContractTerms) -> Self {
        self.contract = Some(contract);
        self
    }

    #[must_use]
    pub fn confirmed(mut self) -> Self {
        self.confirm_outstanding = true;
        self
    }
}

/// What a transition did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// Target equals the current stage.
    Unchanged {
        project: ProjectId,
        status: ProjectStatus,
    },
    /// Only the status field changed.
    StatusUpdated {
        project: ProjectId,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    /// Fully paid design record archived in place; a new Execution project was created.
    Converted {
        execution: ProjectId,
        archive: ProjectId,
    },
    /// Design kept live with its debt; a separate Execution project was created.
    Split {
        design: ProjectId,
        execution: ProjectId,
        outstanding: Money,
    },
    /// Project delivered, possibly with a confirmed unpaid balance.
    Closed {
        project: ProjectId,
        outstanding: Money,
    },
}

impl TransitionOutcome {
    /// Projects whose records were written by this transition.
    #[must_use]
    pub fn affected(&self) -> Vec<ProjectId> {
        match self {
            TransitionOutcome::Unchanged { .. } => Vec::new(),
            TransitionOutcome::StatusUpdated { project, .. }
            | TransitionOutcome::Closed { project, .. } => vec![*project],
            TransitionOutcome::Converted { execution, archive } => vec![*execution, *archive],
            TransitionOutcome::Split {
                design, execution, ..
            } => vec![*design, *execution],
        }
    }

    /// Short label for logs and CLI output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TransitionOutcome::Unchanged { .. } => "unchanged",
            TransitionOutcome::StatusUpdated { .. } => "status_updated",
            TransitionOutcome::Converted { .. } => "converted",
            TransitionOutcome::Split { .. } => "split",
            TransitionOutcome::Closed { .. } => "closed",
        }
    }
}

// =============================================================================
// TRANSITION ENGINE
// =============================================================================

/// Applies lifecycle rules to projects held in a [`LedgerStore`].
pub struct StageTransition;

impl StageTransition {
    /// Move project `id` to `request.target`.
    pub fn apply<S: LedgerStore>(
        store: &mut S,
        id: ProjectId,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome, LedgerError> {
        let project = store
            .get_project(id)
            .cloned()
            .ok_or(LedgerError::ProjectNotFound(id))?;

        if project.status == request.target {
            return Ok(TransitionOutcome::Unchanged {
                project: id,
                status: project.status,
            });
        }

        match request.target {
            ProjectStatus::Execution if project.kind == ProjectKind::Design => {
                if let Some(successor) = store.successor_of(id) {
                    return Err(LedgerError::AlreadyTransitioned {
                        project: id,
                        successor,
                    });
                }
                if project.status == ProjectStatus::Design {
                    let terms = request
                        .contract
                        .ok_or(LedgerError::MissingField("contract"))?
                        .validated()?;
                    return Ok(Self::start_execution(store, project, terms));
                }
                Ok(Self::set_status(store, project, request.target))
            }
            ProjectStatus::Delivered => {
                let outstanding = project.design_debt();
                if outstanding.is_positive() && !request.confirm_outstanding {
                    return Err(LedgerError::ConfirmationRequired {
                        project: id,
                        outstanding,
                    });
                }
                let mut closed = project;
                closed.status = ProjectStatus::Delivered;
                store.put_project(closed);
                Ok(TransitionOutcome::Closed {
                    project: id,
                    outstanding: if outstanding.is_positive() {
                        outstanding
                    } else {
                        Money::ZERO
                    },
                })
            }
            target => Ok(Self::set_status(store, project, target)),
        }
    }

    /// Design → Execution once the successor check has passed.
    fn start_execution<S: LedgerStore>(
        store: &mut S,
        design: Project,
        terms: ContractTerms,
    ) -> TransitionOutcome {
        let debt = design.design_debt();
        if debt.is_positive() {
            Self::split(store, design, terms, debt)
        } else {
            Self::convert(store, design, terms)
        }
    }

    /// Fully paid: the design record itself is archived (Delivered, renamed,
    /// history kept) and a new Execution project carries the new terms.
    fn convert<S: LedgerStore>(
        store: &mut S,
        design: Project,
        terms: ContractTerms,
    ) -> TransitionOutcome {
        let execution_id = store.allocate_project_id();
        let archive_id = design.id;

        let execution = Project {
            id: execution_id,
            name: design.name.clone(),
            client: design.client.clone(),
            category: design.category.clone(),
            budget: terms.value,
            status: ProjectStatus::Execution,
            kind: ProjectKind::Execution,
            contract: Some(terms),
            revenue: Money::ZERO,
            expenses: Money::ZERO,
            related_project_id: Some(archive_id),
        };
        let archive = Project {
            name: suffixed_name(&design.name, ARCHIVE_NAME_SUFFIX),
            status: ProjectStatus::Delivered,
            related_project_id: Some(execution_id),
            ..design
        };

        store.put_project(execution);
        store.put_project(archive);

        TransitionOutcome::Converted {
            execution: execution_id,
            archive: archive_id,
        }
    }

    /// Unpaid: leave the design project live and open a linked Execution project.
    fn split<S: LedgerStore>(
        store: &mut S,
        design: Project,
        terms: ContractTerms,
        outstanding: Money,
    ) -> TransitionOutcome {
        let execution_id = store.allocate_project_id();
        let design_id = design.id;

        let execution = Project {
            id: execution_id,
            name: suffixed_name(&design.name, EXECUTION_NAME_SUFFIX),
            client: design.client.clone(),
            category: design.category.clone(),
            budget: terms.value,
            status: ProjectStatus::Execution,
            kind: ProjectKind::Execution,
            contract: Some(terms),
            revenue: Money::ZERO,
            expenses: Money::ZERO,
            related_project_id: Some(design_id),
        };
        let design = Project {
            related_project_id: Some(execution_id),
            ..design
        };

        store.put_project(execution);
        store.put_project(design);

        TransitionOutcome::Split {
            design: design_id,
            execution: execution_id,
            outstanding,
        }
    }

    fn set_status<S: LedgerStore>(
        store: &mut S,
        mut project: Project,
        target: ProjectStatus,
    ) -> TransitionOutcome {
        let from = project.status;
        let id = project.id;
        project.status = target;
        store.put_project(project);
        TransitionOutcome::StatusUpdated {
            project: id,
            from,
            to: target,
        }
    }
}

/// `name` with `suffix` appended, trimming the base so the result stays
/// within [`MAX_NAME_LENGTH`] bytes.
fn suffixed_name(name: &str, suffix: &str) -> String {
    let mut end = MAX_NAME_LENGTH.saturating_sub(suffix.len()).min(name.len());
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", name[..end].trim_end(), suffix)
}

// =============================================================================
// TESTS
// =============================================================================
