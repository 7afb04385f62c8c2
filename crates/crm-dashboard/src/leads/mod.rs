//! Lead data entry and removal.
//!
//! Both mutations are a single parameter-bound statement; the store enforces
//! the foreign keys and its verdict is mapped onto [`LeadError`].

mod form;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::presentation::SelectionError;
use crate::store::{QueryExecutor, SqlValue, StoreError};

pub use form::{delete_choices, parse_lead_choice, LeadForm, LeadFormOptions};

const INSERT_LEAD: &str =
    "INSERT INTO Leads (FirstName, LastName, CampaignID, AssignedAgentID) VALUES (?1, ?2, ?3, ?4)";
const DELETE_LEAD: &str = "DELETE FROM Leads WHERE LeadID = ?1";

/// Store-assigned lead identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub i64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Values captured by the lead form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub first_name: String,
    pub last_name: String,
    pub campaign_id: i64,
    pub agent_id: i64,
}

impl NewLead {
    fn validated(&self) -> Result<(&str, &str), LeadError> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(LeadError::MissingField("first_name"));
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(LeadError::MissingField("last_name"));
        }
        Ok((first_name, last_name))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Error raised by lead mutations.
#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("lead {0} must not be empty")]
    MissingField(&'static str),
    #[error("campaign {campaign_id} or agent {agent_id} does not exist: {message}")]
    UnknownReference {
        campaign_id: i64,
        agent_id: i64,
        message: String,
    },
    #[error(
        "could not delete lead {lead_id}; it might be linked to a customer record: {message}"
    )]
    ReferentialIntegrity { lead_id: LeadId, message: String },
    #[error("lead {0} not found")]
    NotFound(LeadId),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Inserts a lead and returns the id the store assigned to it.
pub fn insert_lead<E>(executor: &E, lead: &NewLead) -> Result<LeadId, LeadError>
where
    E: QueryExecutor + ?Sized,
{
    let (first_name, last_name) = lead.validated()?;
    let params = [
        SqlValue::from(first_name),
        SqlValue::from(last_name),
        SqlValue::Integer(lead.campaign_id),
        SqlValue::Integer(lead.agent_id),
    ];

    let ack = executor
        .execute(INSERT_LEAD, &params)
        .map_err(|err| match err {
            StoreError::Constraint(message) => LeadError::UnknownReference {
                campaign_id: lead.campaign_id,
                agent_id: lead.agent_id,
                message,
            },
            other => LeadError::Store(other),
        })?;

    let id = ack
        .last_insert_id
        .map(LeadId)
        .ok_or_else(|| StoreError::Query("insert did not report a row id".to_string()))?;
    info!(lead_id = id.0, name = %lead.full_name(), "lead added");
    Ok(id)
}

/// Deletes a lead that no customer references.
pub fn delete_lead<E>(executor: &E, lead_id: LeadId) -> Result<(), LeadError>
where
    E: QueryExecutor + ?Sized,
{
    let ack = executor
        .execute(DELETE_LEAD, &[SqlValue::Integer(lead_id.0)])
        .map_err(|err| match err {
            StoreError::Constraint(message) => {
                warn!(lead_id = lead_id.0, %message, "lead delete blocked by dependent row");
                LeadError::ReferentialIntegrity { lead_id, message }
            }
            other => LeadError::Store(other),
        })?;

    if ack.affected_rows == 0 {
        return Err(LeadError::NotFound(lead_id));
    }
    info!(lead_id = lead_id.0, "lead removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected_before_reaching_the_store() {
        let lead = NewLead {
            first_name: "  ".to_string(),
            last_name: "Lovelace".to_string(),
            campaign_id: 1,
            agent_id: 2,
        };
        assert!(matches!(
            lead.validated(),
            Err(LeadError::MissingField("first_name"))
        ));

        let lead = NewLead {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            ..lead
        };
        assert!(matches!(
            lead.validated(),
            Err(LeadError::MissingField("last_name"))
        ));
    }

    #[test]
    fn referential_integrity_message_mentions_customer_link() {
        let err = LeadError::ReferentialIntegrity {
            lead_id: LeadId(7),
            message: "FOREIGN KEY constraint failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not delete lead 7; it might be linked to a customer record: FOREIGN KEY constraint failed"
        );
    }
}
