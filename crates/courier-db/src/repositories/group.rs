//! PostgreSQL implementation of GroupRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{
    Group, GroupMember, GroupMemberRole, GroupRepository, RepoResult, UserGroup,
};

use crate::models::{GroupMemberModel, GroupModel, UserGroupModel};

use super::error::map_db_error;

/// PostgreSQL implementation of GroupRepository
#[derive(Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    #[instrument(skip(self, group), fields(group_id = %group.group_id))]
    async fn create(&self, group: &Group) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO groups (group_id, name, creator_id, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(group.group_id)
        .bind(&group.name)
        .bind(group.creator_id)
        .bind(group.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Creator is implicitly an admin member
        sqlx::query(
            r"
            INSERT INTO group_members (group_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, NOW())
            ",
        )
        .bind(group.group_id)
        .bind(group.creator_id)
        .bind(GroupMemberRole::Admin.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Group>> {
        let result = sqlx::query_as::<_, GroupModel>(
            "SELECT group_id, name, creator_id, created_at FROM groups WHERE group_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Group::from))
    }

    #[instrument(skip(self))]
    async fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupMemberRole,
    ) -> RepoResult<bool> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r"
            INSERT INTO group_members (group_id, user_id, role, joined_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (group_id, user_id) DO NOTHING
            RETURNING user_id
            ",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(inserted.is_some())
    }

    #[instrument(skip(self))]
    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn member_ids(&self, group_id: Uuid) -> RepoResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM group_members WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn members(&self, group_id: Uuid) -> RepoResult<Vec<GroupMember>> {
        let rows = sqlx::query_as::<_, GroupMemberModel>(
            r"
            SELECT group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = $1
            ORDER BY joined_at
            ",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(GroupMember::from).collect())
    }

    #[instrument(skip(self))]
    async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(
                SELECT 1 FROM group_members WHERE group_id = $1 AND user_id = $2
            )
            ",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn member_role(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> RepoResult<Option<GroupMemberRole>> {
        let role = sqlx::query_scalar::<_, String>(
            "SELECT role FROM group_members WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(role.map(|r| r.parse().unwrap_or(GroupMemberRole::Member)))
    }

    #[instrument(skip(self))]
    async fn groups_for_user(&self, user_id: Uuid) -> RepoResult<Vec<UserGroup>> {
        let rows = sqlx::query_as::<_, UserGroupModel>(
            r"
            SELECT g.group_id, g.name, g.creator_id, g.created_at, gm.role,
                   (SELECT COUNT(*) FROM group_members WHERE group_id = g.group_id) AS member_count
            FROM groups g
            JOIN group_members gm ON g.group_id = gm.group_id
            WHERE gm.user_id = $1
            ORDER BY g.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(UserGroup::from).collect())
    }
}
