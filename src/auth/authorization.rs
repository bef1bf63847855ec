use sea_orm::{ConnectionTrait, EntityTrait};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::contests;
use crate::models::products;
use crate::models::users::{Actor, Roles};

pub fn require_role(actor: &Actor, required: Roles) -> Result<(), AppError> {
    if actor.role == required {
        Ok(())
    } else {
        Err(AppError::RoleNotAllowed { required })
    }
}

pub fn require_admin(actor: &Actor) -> Result<(), AppError> {
    require_role(actor, Roles::Admin)
}

/// Load a contest and check the caller owns it. Admins pass for any contest.
pub async fn verify_contest_owner<C: ConnectionTrait>(
    db: &C,
    contest_id: Uuid,
    actor: &Actor,
) -> Result<contests::Model, AppError> {
    let contest = contests::Entity::find_by_id(contest_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Contest", contest_id))?;

    if actor.is_admin() || contest.brand_id == actor.id {
        Ok(contest)
    } else {
        Err(AppError::Forbidden("You do not own this contest".into()))
    }
}

pub fn verify_product_owner(actor: &Actor, product: &products::Model) -> Result<(), AppError> {
    if actor.is_admin() || product.brand_id == actor.id {
        Ok(())
    } else {
        Err(AppError::Forbidden("You do not own this product".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_mismatch_names_required_role() {
        let actor = Actor::new(Uuid::new_v4(), Roles::Creator);
        assert!(require_role(&actor, Roles::Creator).is_ok());
        assert!(matches!(
            require_admin(&actor),
            Err(AppError::RoleNotAllowed {
                required: Roles::Admin
            })
        ));
    }
}
