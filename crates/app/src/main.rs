use punchcard_app::{InMemoryLoyaltyService, UserFacingError, demo};
use punchcard_auth::Session;
use punchcard_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    punchcard_observability::init();

    let config = AppConfig::from_env()?;
    let service = InMemoryLoyaltyService::in_memory(&config);

    if !config.seed_demo {
        tracing::info!("demo seeding disabled; nothing to show");
        return Ok(());
    }

    let admin_email = config.admin_emails.first().map(String::as_str);
    demo::seed(&service, admin_email).await?;

    // Member flow: log in, fill the card, redeem, try again.
    let mut session = Session::new();
    service
        .sign_in(&mut session, demo::DEMO_EMAIL, demo::DEMO_SECRET)
        .await?;
    let mut entry = service.my_rewards(&session).await?;
    while entry.punch_count < punchcard_rewards::MAX_PUNCHES {
        entry = service.earn_punch(&session).await?;
    }
    println!("{}", serde_json::to_string(&entry)?);
    println!("{}", serde_json::to_string(&service.redeem(&session).await?)?);

    if let Err(err) = service.redeem(&session).await {
        println!("{}", serde_json::to_string(&UserFacingError::from(err))?);
    }
    println!("{}", serde_json::to_string(&service.my_history(&session).await?)?);
    service.sign_out(&mut session).await;

    // Admin flow: dashboard, then bump the first member's card.
    if let Some(email) = admin_email {
        service.sign_in(&mut session, email, demo::DEMO_SECRET).await?;
        let admin = service.admin();
        let rows = admin.dashboard(&session).await?;
        for row in &rows {
            println!("{}", serde_json::to_string(row)?);
        }
        if let Some(first) = rows.first() {
            let entry = admin
                .update_rewards(&session, first.account.id, "add")
                .await?;
            println!("{}", serde_json::to_string(&entry)?);
        }
        service.sign_out(&mut session).await;
    }

    Ok(())
}
