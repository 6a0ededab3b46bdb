//! SeaORM entities of the demo application.

pub mod blog_post;
pub mod sample;

pub use blog_post::Entity as BlogPost;
pub use sample::Entity as Sample;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{self, Set};

/// Stamp `created_at` on insert and `updated_at` on every save.
pub(crate) fn touch(
    created_at: &mut ActiveValue<DateTime<Utc>>,
    updated_at: &mut ActiveValue<DateTime<Utc>>,
    insert: bool,
) {
    let now = Utc::now();
    if insert && created_at.is_not_set() {
        *created_at = Set(now);
    }
    *updated_at = Set(now);
}
