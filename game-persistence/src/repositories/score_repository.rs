use anyhow::Result;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, scores, users};
use game_types::ScoreEntry;

/// Append-only ledger of game outcomes. The winning/losing append happens
/// inside the game transaction; this repository serves the read paths and a
/// standalone `record` for callers outside that path.
pub struct ScoreRepository {
    db: DatabaseConnection,
}

fn to_entry(score: scores::Model, owner: Option<users::Model>) -> Result<ScoreEntry> {
    let owner = owner.ok_or_else(|| anyhow::anyhow!("score {} has no owner row", score.id))?;
    Ok(ScoreEntry {
        user_name: owner.name,
        date: score.date.to_string(),
        won: score.won,
    })
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn record(&self, user_id: Uuid, won: bool, date: chrono::NaiveDate) -> Result<()> {
        let model = scores::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id),
            date: ActiveValue::Set(date),
            won: ActiveValue::Set(won),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
        };
        Scores::insert(model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<ScoreEntry>> {
        let rows = Scores::find()
            .find_also_related(Users)
            .all(&self.db)
            .await?;
        rows.into_iter()
            .map(|(score, owner)| to_entry(score, owner))
            .collect()
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ScoreEntry>> {
        let rows = Scores::find()
            .filter(scores::Column::UserId.eq(user_id))
            .find_also_related(Users)
            .all(&self.db)
            .await?;
        rows.into_iter()
            .map(|(score, owner)| to_entry(score, owner))
            .collect()
    }
}
