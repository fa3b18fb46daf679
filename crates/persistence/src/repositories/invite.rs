//! Game invite repository for database operations.

use domain::models::invite::{GameInvite, InviteGameInfo, InviteType};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GameInviteEntity, InviteRecipientEntity, InviteTypeDb, SportTypeDb};
use crate::metrics::QueryTimer;

/// Repository for game invite database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist an invite with its recipient list atomically. Recipient order
    /// is preserved via the position column.
    pub async fn create_invite(&self, invite: &GameInvite) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let invite_type_db: InviteTypeDb = invite.invite_type.into();
        let sport_db: SportTypeDb = invite.sport_type.into();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO game_invites (id, game_id, game_name, park_id, park_name, court_id, court_number, sport_type, sender_id, sender_name, invite_type, scheduled_time, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(invite.id)
        .bind(invite.game_id)
        .bind(&invite.game_name)
        .bind(invite.park_id)
        .bind(&invite.park_name)
        .bind(invite.court_id)
        .bind(invite.court_number)
        .bind(sport_db)
        .bind(invite.sender_id)
        .bind(&invite.sender_name)
        .bind(invite_type_db)
        .bind(invite.scheduled_time)
        .bind(invite.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, (user_id, user_name)) in invite.recipients().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invite_recipients (invite_id, user_id, user_name, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(invite.id)
            .bind(user_id)
            .bind(user_name)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        Ok(())
    }

    /// List invites addressed to a user, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<GameInvite>, sqlx::Error> {
        let timer = QueryTimer::new("list_invites_for_user");
        let entities = sqlx::query_as::<_, GameInviteEntity>(
            r#"
            SELECT i.id, i.game_id, i.game_name, i.park_id, i.park_name, i.court_id, i.court_number, i.sport_type, i.sender_id, i.sender_name, i.invite_type, i.scheduled_time, i.created_at
            FROM game_invites i
            JOIN invite_recipients r ON r.invite_id = i.id
            WHERE r.user_id = $1
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut invites = Vec::with_capacity(entities.len());
        for entity in entities {
            let recipients = self.list_recipients(entity.id).await?;
            invites.push(Self::into_domain(entity, recipients));
        }
        timer.record();
        Ok(invites)
    }

    /// List the recipients of an invite in their stored order.
    async fn list_recipients(
        &self,
        invite_id: Uuid,
    ) -> Result<Vec<InviteRecipientEntity>, sqlx::Error> {
        sqlx::query_as::<_, InviteRecipientEntity>(
            r#"
            SELECT invite_id, user_id, user_name, position
            FROM invite_recipients
            WHERE invite_id = $1
            ORDER BY position
            "#,
        )
        .bind(invite_id)
        .fetch_all(&self.pool)
        .await
    }

    fn into_domain(entity: GameInviteEntity, recipients: Vec<InviteRecipientEntity>) -> GameInvite {
        let mut invite = GameInvite::new(
            InviteGameInfo {
                game_id: entity.game_id,
                game_name: entity.game_name,
                park_id: entity.park_id,
                park_name: entity.park_name,
                court_id: entity.court_id,
                court_number: entity.court_number,
                sport_type: entity.sport_type.into(),
                scheduled_time: entity.scheduled_time,
            },
            entity.sender_id,
            &entity.sender_name,
            recipients
                .into_iter()
                .map(|r| (r.user_id, r.user_name))
                .collect(),
        );
        invite.id = entity.id;
        invite.created_at = entity.created_at;
        // InviteType is derived from scheduled_time in the constructor; the
        // stored column is authoritative for old rows.
        debug_assert_eq!(InviteType::from(entity.invite_type), invite.invite_type);
        invite
    }
}

#[cfg(test)]
mod tests {
    // Note: InviteRepository tests require database connection and are covered by integration tests
}
