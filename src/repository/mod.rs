//! Data access layer (Repository pattern)

pub mod category;
pub mod menu;
pub mod order;
pub mod payment;
pub mod restaurant;
pub mod review;
pub mod user;

pub use category::CategoryRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use restaurant::RestaurantRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;

use crate::domain::{like_pattern, StringUuid};
use sqlx::{MySql, QueryBuilder};

/// `AND <column> IN (...)`; an empty set matches nothing
pub(crate) fn push_in_ids(builder: &mut QueryBuilder<'_, MySql>, column: &str, ids: &[StringUuid]) {
    if ids.is_empty() {
        builder.push(" AND 1 = 0");
        return;
    }
    builder.push(" AND ").push(column).push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// `AND LOWER(<column>) LIKE '%term%'` with wildcards in `term` escaped
pub(crate) fn push_name_search(builder: &mut QueryBuilder<'_, MySql>, column: &str, term: &str) {
    builder
        .push(" AND LOWER(")
        .push(column)
        .push(") LIKE ")
        .push_bind(like_pattern(term));
}
