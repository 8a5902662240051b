use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::model::ProfileFields;

/// Body metrics on file for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: ProfileFields,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<StoredProfile>>;
    /// Replaces all six fields, absent ones included.
    async fn upsert(&self, user_id: Uuid, fields: &ProfileFields) -> anyhow::Result<StoredProfile>;
    async fn count(&self) -> anyhow::Result<i64>;
}

#[derive(Debug, FromRow)]
struct ProfileRow {
    user_id: Uuid,
    age: Option<i32>,
    gender: Option<String>,
    height: Option<f64>,
    weight: Option<f64>,
    activity_level: Option<String>,
    goal: Option<String>,
    updated_at: OffsetDateTime,
}

impl From<ProfileRow> for StoredProfile {
    fn from(row: ProfileRow) -> Self {
        StoredProfile {
            user_id: row.user_id,
            fields: ProfileFields {
                // negative ages cannot be written through upsert
                age: row.age.and_then(|a| u32::try_from(a).ok()),
                gender: row.gender,
                height: row.height,
                weight: row.weight,
                activity_level: row.activity_level,
                goal: row.goal,
            },
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgProfileStore {
    db: PgPool,
}

impl PgProfileStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<StoredProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, age, gender, height, weight, activity_level, goal, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("select profile")?;
        Ok(row.map(StoredProfile::from))
    }

    async fn upsert(&self, user_id: Uuid, fields: &ProfileFields) -> anyhow::Result<StoredProfile> {
        let age = fields
            .age
            .map(i32::try_from)
            .transpose()
            .context("age out of range")?;

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, age, gender, height, weight, activity_level, goal, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                height = EXCLUDED.height,
                weight = EXCLUDED.weight,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                updated_at = now()
            RETURNING user_id, age, gender, height, weight, activity_level, goal, updated_at
            "#,
        )
        .bind(user_id)
        .bind(age)
        .bind(fields.gender.as_deref())
        .bind(fields.height)
        .bind(fields.weight)
        .bind(fields.activity_level.as_deref())
        .bind(fields.goal.as_deref())
        .fetch_one(&self.db)
        .await
        .context("upsert profile")?;
        Ok(row.into())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.db)
            .await
            .context("count profiles")?;
        Ok(n)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryProfileStore {
    rows: tokio::sync::RwLock<std::collections::HashMap<Uuid, StoredProfile>>,
}

#[cfg(test)]
#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: Uuid) -> anyhow::Result<Option<StoredProfile>> {
        Ok(self.rows.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, fields: &ProfileFields) -> anyhow::Result<StoredProfile> {
        let stored = StoredProfile {
            user_id,
            fields: fields.clone(),
            updated_at: OffsetDateTime::now_utc(),
        };
        self.rows.write().await.insert(user_id, stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.rows.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ProfileFields {
        ProfileFields {
            age: Some(41),
            gender: Some("female".into()),
            height: Some(168.0),
            weight: Some(62.5),
            activity_level: Some("light".into()),
            goal: None,
        }
    }

    #[tokio::test]
    async fn memory_store_upsert_replaces_everything() {
        let store = MemoryProfileStore::default();
        let user = Uuid::new_v4();
        assert!(store.get(user).await.unwrap().is_none());

        store.upsert(user, &fields()).await.unwrap();
        let replaced = store
            .upsert(user, &ProfileFields { weight: Some(60.0), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(replaced.fields.weight, Some(60.0));
        assert_eq!(replaced.fields.age, None);

        let got = store.get(user).await.unwrap().unwrap();
        assert_eq!(got, replaced);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[test]
    fn row_conversion_drops_negative_age() {
        let row = ProfileRow {
            user_id: Uuid::nil(),
            age: Some(-4),
            gender: None,
            height: Some(170.0),
            weight: None,
            activity_level: None,
            goal: Some("gain".into()),
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let stored = StoredProfile::from(row);
        assert_eq!(stored.fields.age, None);
        assert_eq!(stored.fields.height, Some(170.0));
        assert_eq!(stored.fields.goal.as_deref(), Some("gain"));
    }

    #[test]
    fn stored_profile_serializes_flat() {
        let stored = StoredProfile {
            user_id: Uuid::nil(),
            fields: fields(),
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["age"], 41);
        assert_eq!(json["activity_level"], "light");
        assert_eq!(json["updated_at"], "1970-01-01T00:00:00Z");
        assert!(json["goal"].is_null());
    }
}
