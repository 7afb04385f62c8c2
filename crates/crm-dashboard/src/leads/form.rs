use serde::{Deserialize, Serialize};

use super::{LeadError, LeadId, NewLead};
use crate::presentation::{Choice, SelectionError};
use crate::reports::ReportKind;
use crate::store::{QueryExecutor, ResultSet, StoreError};

/// Lead form as submitted from a UI: campaign and agent are the selected
/// labels (campaign name, agent last name) or their numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub first_name: String,
    pub last_name: String,
    pub campaign: String,
    pub agent: String,
}

/// Options offered by the lead form's two select boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadFormOptions {
    pub campaigns: Vec<Choice>,
    pub agents: Vec<Choice>,
}

impl LeadFormOptions {
    pub fn load<E>(executor: &E) -> Result<Self, StoreError>
    where
        E: QueryExecutor + ?Sized,
    {
        let campaigns = ReportKind::CampaignOptions.run(executor)?;
        let agents = ReportKind::AgentOptions.run(executor)?;
        Ok(Self {
            campaigns: Choice::from_result_set(&campaigns, "CampaignID", "CampaignName"),
            agents: Choice::from_result_set(&agents, "AgentID", "LastName"),
        })
    }

    /// Maps the form's selections back onto ids.
    pub fn resolve(&self, form: &LeadForm) -> Result<NewLead, LeadError> {
        let campaign = Choice::resolve("campaign", &self.campaigns, &form.campaign)?;
        let agent = Choice::resolve("agent", &self.agents, &form.agent)?;

        Ok(NewLead {
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            campaign_id: campaign.id,
            agent_id: agent.id,
        })
    }
}

/// Builds `"<id>: <first> <last>"` entries from the lead directory.
pub fn delete_choices(directory: &ResultSet) -> Vec<Choice> {
    let (Some(id), Some(first), Some(last)) = (
        directory.column_index("LeadID"),
        directory.column_index("FirstName"),
        directory.column_index("LastName"),
    ) else {
        return Vec::new();
    };

    directory
        .rows
        .iter()
        .filter_map(|row| {
            let lead_id = row[id].as_i64()?;
            Some(Choice {
                id: lead_id,
                label: format!("{lead_id}: {} {}", row[first], row[last]),
            })
        })
        .collect()
}

/// Parses a delete selection, either `"12: Ada Lovelace"` or a bare `"12"`.
pub fn parse_lead_choice(selection: &str) -> Result<LeadId, SelectionError> {
    let raw = selection.split(':').next().unwrap_or_default().trim();
    raw.parse::<i64>()
        .map(LeadId)
        .map_err(|_| SelectionError::Malformed {
            kind: "lead",
            value: selection.to_string(),
        })
}
