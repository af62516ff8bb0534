//! Membership repository.

use async_trait::async_trait;
use patungan_core::ledger::{MembershipInfo, MembershipStore};
use patungan_core::permission::{PermissionOverrides, Role};
use patungan_core::store::StoreError;
use patungan_shared::types::{BusinessId, MembershipId, UserId};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::store_err;
use crate::entities::{memberships, users};

/// A membership's permission inputs, as the resolver consumes them.
#[derive(Debug, Clone)]
pub struct MembershipPermissions {
    /// The member's role.
    pub role: Role,
    /// Sparse per-membership overrides.
    pub overrides: PermissionOverrides,
    /// Whether the membership is active.
    pub is_active: bool,
}

/// Membership repository backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    db: DatabaseConnection,
}

impl MembershipRepository {
    /// Creates a new membership repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the permission inputs for one membership.
    ///
    /// Returns `None` when the pairing is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored override map does
    /// not deserialize.
    pub async fn permission_context(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<Option<MembershipPermissions>, StoreError> {
        let Some(membership) = memberships::Entity::find_by_id(membership_id.into_inner())
            .filter(memberships::Column::BusinessId.eq(business_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?
        else {
            return Ok(None);
        };

        let overrides: PermissionOverrides =
            serde_json::from_value(membership.permission_overrides).map_err(|e| {
                StoreError::Backend(format!(
                    "invalid permission overrides for membership {membership_id}: {e}"
                ))
            })?;

        Ok(Some(MembershipPermissions {
            role: membership.role.into(),
            overrides,
            is_active: membership.is_active,
        }))
    }

    fn to_info(membership: memberships::Model, user: &users::Model) -> MembershipInfo {
        MembershipInfo {
            id: MembershipId::from_uuid(membership.id),
            business_id: BusinessId::from_uuid(membership.business_id),
            user_id: UserId::from_uuid(membership.user_id),
            role: membership.role.into(),
            is_active: membership.is_active,
            display_name: user.full_name.clone(),
        }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn find_membership(
        &self,
        business_id: BusinessId,
        membership_id: MembershipId,
    ) -> Result<Option<MembershipInfo>, StoreError> {
        let result = memberships::Entity::find_by_id(membership_id.into_inner())
            .filter(memberships::Column::BusinessId.eq(business_id.into_inner()))
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .map_err(store_err)?;

        Ok(result
            .and_then(|(membership, user)| user.map(|u| Self::to_info(membership, &u))))
    }

    async fn active_memberships(
        &self,
        business_id: BusinessId,
    ) -> Result<Vec<MembershipInfo>, StoreError> {
        let results = memberships::Entity::find()
            .filter(memberships::Column::BusinessId.eq(business_id.into_inner()))
            .filter(memberships::Column::IsActive.eq(true))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(results
            .into_iter()
            .filter_map(|(membership, user)| user.map(|u| Self::to_info(membership, &u)))
            .collect())
    }
}
