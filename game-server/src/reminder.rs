use anyhow::Result;

use crate::service::GameService;

/// One pass of the reminder sweep: logs a reminder for every user who has an
/// email address and at least one game in progress. Runs on a fixed interval
/// from `main`; actual delivery is out of scope.
pub async fn run_sweep(service: &GameService) {
    match sweep_messages(service).await {
        Ok(messages) => {
            for message in &messages {
                tracing::info!("reminder: {message}");
            }
            tracing::debug!(reminders = messages.len(), "reminder sweep complete");
        }
        Err(err) => {
            tracing::error!("reminder sweep failed: {err:#}");
        }
    }
}

/// Compose the reminder bodies without sending anything.
pub async fn sweep_messages(service: &GameService) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    for user in service.users_with_email().await? {
        let games = service.user_games(&user.name).await?;
        if games.is_empty() {
            continue;
        }
        let keys: Vec<String> = games.iter().map(|g| g.id.to_string()).collect();
        messages.push(format!(
            "Hello {}, you have {} games in progress. Their keys are: {}",
            user.name,
            games.len(),
            keys.join(", ")
        ));
    }
    Ok(messages)
}
