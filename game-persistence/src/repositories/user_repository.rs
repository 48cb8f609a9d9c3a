use anyhow::Result;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use game_types::{GameError, User};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            wins: model.wins,
            total_played: model.total_played,
            best_move_count: model.best_move_count,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    /// Create a user with a unique, case-sensitive name. The unique index on
    /// the name column backs up the lookup-then-insert check.
    pub async fn create_user(&self, name: &str, email: Option<String>) -> Result<User> {
        if self.find_by_name(name).await?.is_some() {
            return Err(GameError::DuplicateUser {
                name: name.to_string(),
            }
            .into());
        }

        let user = User::new(name, email);
        let now = chrono::Utc::now();
        let model = users::ActiveModel {
            id: ActiveValue::Set(user.id),
            name: ActiveValue::Set(user.name.clone()),
            email: ActiveValue::Set(user.email.clone()),
            wins: ActiveValue::Set(user.wins),
            total_played: ActiveValue::Set(user.total_played),
            best_move_count: ActiveValue::Set(user.best_move_count),
            created_at: ActiveValue::Set(now.into()),
            updated_at: ActiveValue::Set(now.into()),
        };
        Users::insert(model).exec(&self.db).await?;

        let created = Users::find_by_id(user.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to retrieve created user"))?;
        Ok(Self::model_to_user(created))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let model = Users::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Self::model_to_user))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let model = Users::find()
            .filter(users::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(Self::model_to_user))
    }

    pub async fn all_users(&self) -> Result<Vec<User>> {
        let models = Users::find().all(&self.db).await?;
        Ok(models.into_iter().map(Self::model_to_user).collect())
    }

    /// Users the reminder sweep can contact.
    pub async fn users_with_email(&self) -> Result<Vec<User>> {
        let models = Users::find()
            .filter(users::Column::Email.is_not_null())
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Self::model_to_user).collect())
    }
}
