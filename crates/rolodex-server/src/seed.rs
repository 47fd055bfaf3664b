//! Sample data for local development.

use rand::Rng;
use rand::seq::IndexedRandom;
use rolodex_auth::hash_credential;
use sqlx::SqlitePool;

use crate::store::{ClientStore, CommissionStore, IdentityStore};

const SAMPLE_USERS: &[(&str, &str, &str, bool)] = &[
    ("admin@crm.com", "Admin User", "admin123", true),
    ("john.doe@crm.com", "John Doe", "password123", true),
    ("jane.smith@crm.com", "Jane Smith", "password123", true),
    ("bob.wilson@crm.com", "Bob Wilson", "password123", false),
];

const SAMPLE_CLIENTS: &[(&str, &str, &str)] = &[
    ("Tech Corp", "contact@techcorp.com", "+1-555-0101"),
    ("Global Industries", "info@globalind.com", "+1-555-0102"),
    ("StartupXYZ", "hello@startupxyz.com", "+1-555-0103"),
    ("Enterprise Solutions", "sales@enterprise.com", "+1-555-0104"),
    ("Innovation Labs", "contact@innovlabs.com", "+1-555-0105"),
    ("Digital Dynamics", "team@digitaldyn.com", "+1-555-0106"),
    ("Future Systems", "info@futuresys.com", "+1-555-0107"),
    ("Alpha Technologies", "support@alphatech.com", "+1-555-0108"),
];

const COMMISSION_SOURCES: &[&str] = &[
    "Website Lead",
    "Referral",
    "Cold Call",
    "Social Media",
    "Email Campaign",
    "Conference",
];

const COMMISSION_COUNT: usize = 25;

/// Populate an empty database with sample identities, clients, and
/// commissions. A database that already has users is left untouched.
pub async fn populate(pool: &SqlitePool) -> anyhow::Result<()> {
    let identities = IdentityStore::new(pool.clone());
    if identities.count().await? > 0 {
        tracing::info!("sample data already present, skipping seed");
        return Ok(());
    }

    for (email, name, password, is_active) in SAMPLE_USERS {
        identities
            .insert(email, name, &hash_credential(password), *is_active)
            .await?;
    }
    tracing::info!(count = SAMPLE_USERS.len(), "created sample users");

    let clients = ClientStore::new(pool.clone());
    let mut client_ids = Vec::with_capacity(SAMPLE_CLIENTS.len());
    for (name, email, phone) in SAMPLE_CLIENTS {
        let client = clients.insert(name, email, Some(phone)).await?;
        client_ids.push(client.id);
    }
    tracing::info!(count = SAMPLE_CLIENTS.len(), "created sample clients");

    let commissions = CommissionStore::new(pool.clone());
    let mut rng = rand::rng();
    for _ in 0..COMMISSION_COUNT {
        let client_id = *client_ids
            .choose(&mut rng)
            .ok_or_else(|| anyhow::anyhow!("no clients seeded"))?;
        let amount = (rng.random_range(100.0..5000.0_f64) * 100.0).round() / 100.0;
        let source = COMMISSION_SOURCES
            .choose(&mut rng)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no commission sources"))?;
        commissions.insert(client_id, amount, Some(source)).await?;
    }
    tracing::info!(count = COMMISSION_COUNT, "created sample commissions");

    tracing::info!("sample data ready; sign in with admin@crm.com / admin123");
    Ok(())
}
