use chrono::Utc;
use contracts::domain::a001_store_order::{PartnerRef, StoreOrder};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    Condition, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_store_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub status: String,
    pub partner_id: Option<String>,
    pub partner_name: Option<String>,
    pub partner_email: Option<String>,
    pub size: Option<String>,
    pub length: Option<String>,
    pub quantity: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StoreOrder {
    fn from(m: Model) -> Self {
        let partner = match (m.partner_id, m.partner_name) {
            (Some(id), Some(name)) => Some(PartnerRef {
                id,
                name,
                email: m.partner_email,
            }),
            _ => None,
        };

        StoreOrder {
            id: m.id,
            status: m.status,
            created_at: m.created_at,
            partner,
            size: m.size,
            length: m.length,
            quantity: m.quantity,
        }
    }
}

/// Страница заказов и общее количество по фильтру
pub struct OrderPage {
    pub items: Vec<StoreOrder>,
    pub total: u64,
}

/// Экранирует `%`, `_` и `\\`, чтобы поиск был буквальной подстрокой
fn like_pattern(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('%');
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn contains(column: Column, s: &str) -> SimpleExpr {
    Expr::col((column.entity_name(), column)).like(LikeExpr::new(like_pattern(s)).escape('\\'))
}

fn search_condition(search: Option<&str>) -> Condition {
    match search {
        // SQLite LIKE регистронезависим для ASCII
        Some(s) => Condition::any()
            .add(contains(Column::Id, s))
            .add(contains(Column::PartnerName, s))
            .add(contains(Column::PartnerEmail, s))
            .add(contains(Column::Size, s)),
        None => Condition::all(),
    }
}

/// Страница обзора, `page` начинается с 1, новые заказы сначала
pub async fn list_page(
    db: &DatabaseConnection,
    search: Option<&str>,
    page: u32,
    limit: u32,
) -> anyhow::Result<OrderPage> {
    let paginator = Entity::find()
        .filter(search_condition(search))
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .paginate(db, limit as u64);

    let total = paginator.num_items().await?;
    let items = paginator
        .fetch_page(page.saturating_sub(1) as u64)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(OrderPage { items, total })
}

pub async fn get_by_ids(db: &DatabaseConnection, ids: &[String]) -> anyhow::Result<Vec<StoreOrder>> {
    let items = Entity::find()
        .filter(Column::Id.is_in(ids.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Массовая смена статуса одним транзакционным UPDATE.
///
/// Меняются только строки, статус которых всё ещё входит в `from`. Если хотя
/// бы одна строка не подошла (её успел изменить параллельный запрос),
/// транзакция откатывается и возвращается `false`.
pub async fn update_status_from(
    db: &DatabaseConnection,
    ids: &[String],
    from: &[&str],
    status: &str,
) -> anyhow::Result<bool> {
    let txn = db.begin().await?;
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(status))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.is_in(ids.iter().cloned()))
        .filter(Column::Status.is_in(from.iter().copied()))
        .exec(&txn)
        .await?;

    if result.rows_affected != ids.len() as u64 {
        txn.rollback().await?;
        return Ok(false);
    }
    txn.commit().await?;
    Ok(true)
}

pub async fn insert(db: &DatabaseConnection, order: &StoreOrder) -> anyhow::Result<()> {
    let partner = order.partner.as_ref();
    let active = ActiveModel {
        id: Set(order.id.clone()),
        status: Set(order.status.clone()),
        partner_id: Set(partner.map(|p| p.id.clone())),
        partner_name: Set(partner.map(|p| p.name.clone())),
        partner_email: Set(partner.and_then(|p| p.email.clone())),
        size: Set(order.size.clone()),
        length: Set(order.length.clone()),
        quantity: Set(order.quantity),
        created_at: Set(order.created_at),
        updated_at: Set(Utc::now()),
    };
    active.insert(db).await?;
    Ok(())
}

pub async fn count_all(db: &DatabaseConnection) -> anyhow::Result<u64> {
    Ok(Entity::find().count(db).await?)
}
