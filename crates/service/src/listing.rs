//! Optional pagination on top of any entity query.

use common::pagination::Pagination;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Select};

use crate::errors::ServiceError;

/// Run `select` returning every row, or one page when `page` is given.
pub async fn fetch_list<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: Option<Pagination>,
) -> Result<Vec<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Send + Sync + 'static,
{
    match page {
        None => Ok(select.all(db).await?),
        Some(p) => {
            let (page_idx, per_page) = p.normalize();
            // SeaORM's paginate uses 0-based page index internally via fetch_page
            Ok(select.paginate(db, per_page).fetch_page(page_idx).await?)
        }
    }
}
