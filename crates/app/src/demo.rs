//! Demo data for local runs of the binary.

use punchcard_auth::{Account, AccountRecord, Session};
use punchcard_core::{AccountId, DomainResult, EventLog, KeyValueStore};
use punchcard_rewards::{PunchCard, PunchCardEvent};

use crate::service::LoyaltyService;

pub const DEMO_EMAIL: &str = "john@example.com";
pub const DEMO_SECRET: &str = "password123";

/// (name, email, starting punches)
const MEMBERS: [(&str, &str, u8); 3] = [
    ("John Doe", DEMO_EMAIL, 5),
    ("Sarah Lee", "sarah@example.com", 8),
    ("Mike Chen", "mike@example.com", 2),
];

pub const DEMO_ADMIN_NAME: &str = "Black Kettle Tea Shoppe";

/// Register the demo members (all with [`DEMO_SECRET`]) and give each its
/// starting punches. When `admin_email` is given, an administrator account
/// with the same secret is registered too.
pub async fn seed<D, L, H>(
    service: &LoyaltyService<D, L, H>,
    admin_email: Option<&str>,
) -> DomainResult<Vec<Account>>
where
    D: KeyValueStore<AccountId, AccountRecord>,
    L: KeyValueStore<AccountId, PunchCard>,
    H: EventLog<AccountId, PunchCardEvent>,
{
    let mut seeded = Vec::new();

    for (name, email, punches) in MEMBERS {
        let mut session = Session::new();
        let account = service.register(&mut session, name, email, DEMO_SECRET).await?;
        for _ in 0..punches {
            service.ledger().earn_punch(account.id)?;
        }
        seeded.push(account);
    }

    if let Some(email) = admin_email {
        let mut session = Session::new();
        seeded.push(
            service
                .register(&mut session, DEMO_ADMIN_NAME, email, DEMO_SECRET)
                .await?,
        );
    }

    tracing::info!(accounts = seeded.len(), "demo data seeded");
    Ok(seeded)
}
