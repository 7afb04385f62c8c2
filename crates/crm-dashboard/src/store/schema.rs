use tracing::info;

use super::{SqliteStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Regions (
    RegionID   INTEGER PRIMARY KEY,
    RegionName TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS SalesAgents (
    AgentID   INTEGER PRIMARY KEY,
    FirstName TEXT NOT NULL,
    LastName  TEXT NOT NULL,
    RegionID  INTEGER NOT NULL REFERENCES Regions (RegionID)
);

CREATE TABLE IF NOT EXISTS MarketingCampaigns (
    CampaignID   INTEGER PRIMARY KEY,
    CampaignName TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Leads (
    LeadID          INTEGER PRIMARY KEY AUTOINCREMENT,
    FirstName       TEXT NOT NULL,
    LastName        TEXT NOT NULL,
    CampaignID      INTEGER REFERENCES MarketingCampaigns (CampaignID),
    AssignedAgentID INTEGER REFERENCES SalesAgents (AgentID)
);

CREATE TABLE IF NOT EXISTS Customers (
    CustomerID INTEGER PRIMARY KEY,
    FirstName  TEXT NOT NULL,
    LastName   TEXT NOT NULL,
    LeadID     INTEGER REFERENCES Leads (LeadID)
);

CREATE TABLE IF NOT EXISTS Deals (
    DealID      INTEGER PRIMARY KEY,
    CustomerID  INTEGER NOT NULL REFERENCES Customers (CustomerID),
    AgentID     INTEGER NOT NULL REFERENCES SalesAgents (AgentID),
    DealDate    TEXT NOT NULL,
    TotalAmount REAL NOT NULL,
    Stage       TEXT NOT NULL
);
";

const DEMO_DATA: &str = "
INSERT INTO Regions (RegionID, RegionName) VALUES
    (1, 'North'),
    (2, 'South');

INSERT INTO SalesAgents (AgentID, FirstName, LastName, RegionID) VALUES
    (1, 'Grace', 'Hopper', 1),
    (2, 'Alan', 'Turing', 2),
    (3, 'Katherine', 'Johnson', 1);

INSERT INTO MarketingCampaigns (CampaignID, CampaignName) VALUES
    (1, 'Spring Webinar'),
    (2, 'Trade Show'),
    (3, 'Referral Program');

INSERT INTO Leads (LeadID, FirstName, LastName, CampaignID, AssignedAgentID) VALUES
    (1, 'Marie', 'Curie', 1, 1),
    (2, 'Nikola', 'Tesla', 2, 2),
    (3, 'Rosalind', 'Franklin', 1, 1),
    (4, 'Carl', 'Sagan', 3, 3),
    (5, 'Lise', 'Meitner', 2, 2);

INSERT INTO Customers (CustomerID, FirstName, LastName, LeadID) VALUES
    (1, 'Marie', 'Curie', 1),
    (2, 'Nikola', 'Tesla', 2),
    (3, 'Richard', 'Feynman', NULL);

INSERT INTO Deals (DealID, CustomerID, AgentID, DealDate, TotalAmount, Stage) VALUES
    (1, 1, 1, '2024-03-15', 12500.00, 'Closed-Won'),
    (2, 2, 2, '2024-05-02', 8300.50, 'Closed-Won'),
    (3, 3, 1, '2024-06-20', 15000.00, 'Negotiation'),
    (4, 1, 3, '2024-07-11', 4200.00, 'Closed-Lost'),
    (5, 3, 2, '2024-08-30', 9900.00, 'Closed-Won'),
    (6, 2, 3, '2024-01-05', 2100.25, 'Prospecting');
";

/// Creates the CRM tables when they do not exist yet.
pub fn bootstrap_schema(store: &SqliteStore) -> Result<(), StoreError> {
    store.execute_batch(SCHEMA)?;
    info!("crm schema ready");
    Ok(())
}

/// Loads the deterministic demo dataset into an empty schema.
pub fn seed_demo_data(store: &SqliteStore) -> Result<(), StoreError> {
    let mut conn = store.acquire()?;
    let tx = conn.transaction().map_err(StoreError::from_statement)?;
    tx.execute_batch(DEMO_DATA).map_err(StoreError::from_statement)?;
    tx.commit().map_err(StoreError::from_statement)?;
    info!("demo dataset loaded");
    Ok(())
}
