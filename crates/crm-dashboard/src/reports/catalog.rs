//! Fixed SQL text for every report. Nothing here is assembled at runtime.

pub(super) const TOTAL_REVENUE: &str = "
SELECT SUM(TotalAmount) AS Total
FROM Deals
WHERE Stage = 'Closed-Won'";

pub(super) const RECENT_CLOSED_DEALS: &str = "
SELECT D.DealDate,
       C.FirstName || ' ' || C.LastName AS Customer,
       A.LastName AS Agent,
       D.TotalAmount
FROM Deals D
    JOIN Customers C ON D.CustomerID = C.CustomerID
    JOIN SalesAgents A ON D.AgentID = A.AgentID
WHERE D.Stage = 'Closed-Won'
ORDER BY D.DealDate DESC, D.DealID DESC";

pub(super) const AGENT_WORKLOAD: &str = "
SELECT SA.FirstName,
       SA.LastName,
       R.RegionName,
       COUNT(L.LeadID) AS ActiveLeads
FROM SalesAgents SA
    JOIN Regions R ON SA.RegionID = R.RegionID
    LEFT JOIN Leads L ON SA.AgentID = L.AssignedAgentID
GROUP BY SA.AgentID, SA.FirstName, SA.LastName, R.RegionName
ORDER BY SA.AgentID";

pub(super) const NEGLECTED_LEADS: &str = "
SELECT L.FirstName, L.LastName, MC.CampaignName
FROM Leads L
    LEFT JOIN MarketingCampaigns MC ON L.CampaignID = MC.CampaignID
WHERE L.LeadID NOT IN (SELECT LeadID FROM Customers WHERE LeadID IS NOT NULL)
ORDER BY L.LeadID";

pub(super) const LEAD_DIRECTORY: &str = "
SELECT L.LeadID, L.FirstName, L.LastName, MC.CampaignName, SA.LastName AS AssignedAgent
FROM Leads L
    LEFT JOIN MarketingCampaigns MC ON L.CampaignID = MC.CampaignID
    LEFT JOIN SalesAgents SA ON L.AssignedAgentID = SA.AgentID
ORDER BY L.LeadID";

macro_rules! deal_listing {
    ($order:literal) => {
        concat!(
            "
SELECT D.DealID,
       C.FirstName || ' ' || C.LastName AS Customer,
       D.TotalAmount,
       D.DealDate,
       D.Stage
FROM Deals D
    JOIN Customers C ON D.CustomerID = C.CustomerID
",
            $order
        )
    };
}

pub(super) const DEALS_BY_VALUE: &str = deal_listing!("ORDER BY D.TotalAmount DESC, D.DealID ASC");
pub(super) const DEALS_BY_DATE: &str = deal_listing!("ORDER BY D.DealDate DESC, D.DealID ASC");
pub(super) const DEALS_BY_STAGE: &str = deal_listing!("ORDER BY D.Stage ASC, D.DealID ASC");

pub(super) const TOP_AGENTS: &str = "
SELECT SA.FirstName,
       SA.LastName,
       SUM(D.TotalAmount) AS RevenueGenerated
FROM SalesAgents SA
    JOIN Deals D ON SA.AgentID = D.AgentID
WHERE D.Stage = 'Closed-Won'
GROUP BY SA.AgentID, SA.FirstName, SA.LastName
ORDER BY RevenueGenerated DESC
LIMIT ?1";

pub(super) const LEAD_PIPELINE: &str = "
SELECT L.FirstName || ' ' || L.LastName AS Name,
       MC.CampaignName AS Source,
       C.CustomerID
FROM Leads L
    LEFT JOIN Customers C ON L.LeadID = C.LeadID
    LEFT JOIN MarketingCampaigns MC ON L.CampaignID = MC.CampaignID
ORDER BY L.LeadID";

pub(super) const CAMPAIGN_OPTIONS: &str = "
SELECT CampaignID, CampaignName
FROM MarketingCampaigns
ORDER BY CampaignID";

pub(super) const AGENT_OPTIONS: &str = "
SELECT AgentID, LastName
FROM SalesAgents
ORDER BY AgentID";
